use std::collections::{BTreeMap, HashMap};

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::period::BillingPeriod;
use crate::types::{ClientId, ClientStatus, PaymentId, PaymentRecord, PeriodRecord, PeriodStatus};

use super::LedgerStore;

#[derive(Debug, Clone, Default)]
struct State {
    plans: HashMap<ClientId, Money>,
    client_statuses: HashMap<ClientId, ClientStatus>,
    periods: BTreeMap<(ClientId, BillingPeriod), PeriodStatus>,
    payments: HashMap<PaymentId, PaymentRecord>,
}

/// in-memory store with snapshot-based transactions
///
/// `begin` snapshots the whole state; `rollback` restores it. Good enough
/// for tests and single-process embedders; a database-backed implementation
/// maps these to real transactions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: State,
    snapshots: Vec<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// register a client with its plan price and current status
    pub fn add_client(&mut self, client_id: ClientId, plan_price: Money, status: ClientStatus) {
        self.state.plans.insert(client_id, plan_price);
        self.state.client_statuses.insert(client_id, status);
    }

    /// register a client that has no plan
    pub fn add_client_without_plan(&mut self, client_id: ClientId, status: ClientStatus) {
        self.state.client_statuses.insert(client_id, status);
    }

    pub fn set_client_status(&mut self, client_id: ClientId, status: ClientStatus) {
        self.state.client_statuses.insert(client_id, status);
    }

    pub fn payment_count(&self) -> usize {
        self.state.payments.len()
    }
}

impl LedgerStore for MemoryStore {
    fn begin(&mut self) -> Result<()> {
        self.snapshots.push(self.state.clone());
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.snapshots
            .pop()
            .map(|_| ())
            .ok_or_else(|| LedgerError::storage("commit without begin"))
    }

    fn rollback(&mut self) -> Result<()> {
        let snapshot = self
            .snapshots
            .pop()
            .ok_or_else(|| LedgerError::storage("rollback without begin"))?;
        self.state = snapshot;
        Ok(())
    }

    fn plan_price(&self, client_id: ClientId) -> Result<Option<Money>> {
        Ok(self.state.plans.get(&client_id).copied())
    }

    fn client_status(&self, client_id: ClientId) -> Result<Option<ClientStatus>> {
        Ok(self.state.client_statuses.get(&client_id).copied())
    }

    fn period_status(
        &self,
        client_id: ClientId,
        period: BillingPeriod,
    ) -> Result<Option<PeriodStatus>> {
        Ok(self.state.periods.get(&(client_id, period)).copied())
    }

    fn latest_status_on_or_before(
        &self,
        client_id: ClientId,
        period: BillingPeriod,
    ) -> Result<Option<PeriodStatus>> {
        Ok(self
            .state
            .periods
            .iter()
            .filter(|((c, p), _)| *c == client_id && *p <= period)
            .next_back()
            .map(|(_, status)| *status))
    }

    fn periods_through(
        &self,
        client_id: ClientId,
        through: BillingPeriod,
    ) -> Result<Vec<PeriodRecord>> {
        // BTreeMap iterates oldest first; reverse for most-recent-first
        Ok(self
            .state
            .periods
            .iter()
            .filter(|((c, p), _)| *c == client_id && *p <= through)
            .rev()
            .map(|((_, period), status)| PeriodRecord {
                client_id,
                period: *period,
                status: *status,
            })
            .collect())
    }

    fn upsert_period(
        &mut self,
        client_id: ClientId,
        period: BillingPeriod,
        status: PeriodStatus,
    ) -> Result<()> {
        self.state.periods.insert((client_id, period), status);
        Ok(())
    }

    fn payment(&self, id: PaymentId) -> Result<Option<PaymentRecord>> {
        Ok(self.state.payments.get(&id).cloned())
    }

    fn payments_for_period(
        &self,
        client_id: ClientId,
        period: BillingPeriod,
    ) -> Result<Vec<PaymentRecord>> {
        Ok(self
            .state
            .payments
            .values()
            .filter(|p| p.client_id == client_id && p.applied_period == period)
            .cloned()
            .collect())
    }

    fn insert_payment(&mut self, payment: &PaymentRecord) -> Result<()> {
        if self.state.payments.contains_key(&payment.id) {
            return Err(LedgerError::storage(format!(
                "duplicate payment id {}",
                payment.id
            )));
        }
        self.state.payments.insert(payment.id, payment.clone());
        Ok(())
    }

    fn update_payment(&mut self, payment: &PaymentRecord) -> Result<()> {
        match self.state.payments.get_mut(&payment.id) {
            Some(row) => {
                *row = payment.clone();
                Ok(())
            }
            None => Err(LedgerError::storage(format!(
                "update of missing payment row {}",
                payment.id
            ))),
        }
    }

    fn delete_payment(&mut self, id: PaymentId) -> Result<()> {
        self.state
            .payments
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| LedgerError::storage(format!("delete of missing payment row {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn period(year: i32, month: u32) -> BillingPeriod {
        BillingPeriod::new(year, month).unwrap()
    }

    fn payment(client_id: ClientId, applied: BillingPeriod, amount: i64) -> PaymentRecord {
        PaymentRecord {
            id: Uuid::new_v4(),
            client_id,
            amount: Money::from_major(amount),
            payment_date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            applied_period: applied,
            reference: None,
            note: None,
            voided: false,
        }
    }

    #[test]
    fn test_rollback_restores_state() {
        let mut store = MemoryStore::new();
        let client = Uuid::new_v4();
        store.add_client(client, Money::from_major(500), ClientStatus::Active);

        store.begin().unwrap();
        store
            .upsert_period(client, period(2024, 3), PeriodStatus::Paid)
            .unwrap();
        store.insert_payment(&payment(client, period(2024, 3), 500)).unwrap();
        store.rollback().unwrap();

        assert_eq!(store.period_status(client, period(2024, 3)).unwrap(), None);
        assert_eq!(store.payment_count(), 0);
    }

    #[test]
    fn test_commit_keeps_writes() {
        let mut store = MemoryStore::new();
        let client = Uuid::new_v4();

        store.begin().unwrap();
        store
            .upsert_period(client, period(2024, 3), PeriodStatus::Pending)
            .unwrap();
        store.commit().unwrap();

        assert_eq!(
            store.period_status(client, period(2024, 3)).unwrap(),
            Some(PeriodStatus::Pending)
        );
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut store = MemoryStore::new();
        let client = Uuid::new_v4();
        let p = period(2024, 3);

        store.upsert_period(client, p, PeriodStatus::Pending).unwrap();
        store.upsert_period(client, p, PeriodStatus::Paid).unwrap();

        assert_eq!(store.period_status(client, p).unwrap(), Some(PeriodStatus::Paid));
        assert_eq!(store.periods_through(client, p).unwrap().len(), 1);
    }

    #[test]
    fn test_periods_through_most_recent_first() {
        let mut store = MemoryStore::new();
        let client = Uuid::new_v4();
        for month in 1..=4 {
            store
                .upsert_period(client, period(2024, month), PeriodStatus::Pending)
                .unwrap();
        }

        let rows = store.periods_through(client, period(2024, 3)).unwrap();
        let months: Vec<u32> = rows.iter().map(|r| r.period.month()).collect();
        assert_eq!(months, vec![3, 2, 1]);
    }

    #[test]
    fn test_latest_status_on_or_before() {
        let mut store = MemoryStore::new();
        let client = Uuid::new_v4();
        store
            .upsert_period(client, period(2024, 1), PeriodStatus::Suspended)
            .unwrap();

        assert_eq!(
            store
                .latest_status_on_or_before(client, period(2024, 6))
                .unwrap(),
            Some(PeriodStatus::Suspended)
        );
        assert_eq!(
            store
                .latest_status_on_or_before(client, period(2023, 12))
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_rows_scoped_per_client() {
        let mut store = MemoryStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.upsert_period(a, period(2024, 3), PeriodStatus::Paid).unwrap();

        assert_eq!(store.period_status(b, period(2024, 3)).unwrap(), None);
        assert!(store.periods_through(b, period(2024, 12)).unwrap().is_empty());
    }
}
