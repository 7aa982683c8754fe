use std::collections::BTreeSet;

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use uuid::Uuid;

use crate::config::LedgerConfig;
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::period::BillingPeriod;
use crate::reconcile::{allocation, pending, resolver, status};
use crate::store::LedgerStore;
use crate::types::{
    AppliedPayment, ClientId, MultiPaymentReceipt, MultiPeriodRequest, PaymentId, PaymentReceipt,
    PaymentRecord, PaymentRequest, PaymentUpdate, PendingPeriod, PeriodStatus, PeriodSummary,
    UpdateReceipt,
};

/// the reconciliation engine
///
/// One instance per product line, wired to that line's store. Every mutating
/// entry point runs inside one store transaction: the whole sequence of
/// resolve / write / recompute either commits or rolls back, so callers never
/// observe partial writes. Events are staged during the transaction and only
/// surface once the commit succeeds.
pub struct PaymentLedger<S: LedgerStore> {
    store: S,
    config: LedgerConfig,
    time: SafeTimeProvider,
    events: EventStore,
    staged: Vec<Event>,
}

impl<S: LedgerStore> PaymentLedger<S> {
    pub fn new(store: S, config: LedgerConfig, time: SafeTimeProvider) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            time,
            events: EventStore::new(),
            staged: Vec::new(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    fn current_period(&self) -> BillingPeriod {
        BillingPeriod::from_date(self.time.now().date_naive())
    }

    /// apply a single payment, resolving its period per policy
    pub fn apply_payment(&mut self, request: PaymentRequest) -> Result<PaymentReceipt> {
        self.run_tx(|ledger| ledger.apply_payment_tx(request))
    }

    /// split one total across several caller-chosen periods
    ///
    /// Suspended candidates are omitted, never substituted; the split is
    /// computed over what remains.
    pub fn apply_multi_period_payment(
        &mut self,
        request: MultiPeriodRequest,
    ) -> Result<MultiPaymentReceipt> {
        self.run_tx(|ledger| ledger.apply_multi_tx(request))
    }

    /// replace a payment's data, recomputing every period it moved between
    pub fn update_payment(&mut self, id: PaymentId, update: PaymentUpdate) -> Result<UpdateReceipt> {
        self.run_tx(|ledger| ledger.update_payment_tx(id, update))
    }

    /// delete a payment and recompute the period it applied to
    pub fn delete_payment(&mut self, id: PaymentId) -> Result<()> {
        self.run_tx(|ledger| ledger.delete_payment_tx(id))
    }

    /// periods still awaiting payment, bounded at the current month
    pub fn pending_periods(&self, client_id: ClientId) -> Result<Vec<PendingPeriod>> {
        pending::pending_periods(&self.store, client_id, self.current_period())
    }

    /// aggregate view of one period
    ///
    /// The stored row's status wins when a row exists (suspension stays
    /// visible); otherwise the status is derived from the sums.
    pub fn period_summary(&self, client_id: ClientId, period: BillingPeriod) -> Result<PeriodSummary> {
        let plan_price = self
            .store
            .plan_price(client_id)?
            .ok_or(LedgerError::NoPlanAssociated { client_id })?;
        let total_paid = status::paid_total(&self.store, client_id, period)?;
        let status = match self.store.period_status(client_id, period)? {
            Some(stored) => stored,
            None => status::derive_status(plan_price, total_paid),
        };
        Ok(PeriodSummary {
            plan_price,
            total_paid,
            status,
        })
    }

    pub fn payment(&self, id: PaymentId) -> Result<PaymentRecord> {
        self.store
            .payment(id)?
            .ok_or(LedgerError::PaymentNotFound { id })
    }

    /// get-or-create one Pending row per month from the install month
    /// through the current month; existing rows are never overwritten
    pub fn seed_periods(&mut self, client_id: ClientId, install_date: NaiveDate) -> Result<u32> {
        self.run_tx(|ledger| ledger.seed_periods_tx(client_id, install_date))
    }

    /// direct administrative edit of a period's status (how a period
    /// becomes Suspended)
    pub fn set_period_status(
        &mut self,
        client_id: ClientId,
        period: BillingPeriod,
        status: PeriodStatus,
    ) -> Result<()> {
        self.run_tx(|ledger| ledger.set_period_status_tx(client_id, period, status))
    }

    /// bracket one mutating operation in a store transaction
    ///
    /// Events pushed by `op` stay staged until the commit succeeds, then
    /// flush into the event store; rollback discards them, so observers
    /// never see events describing discarded writes. A failed commit goes
    /// through the same rollback path.
    fn run_tx<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.store.begin()?;
        let result = op(self).and_then(|value| self.store.commit().map(|()| value));
        match result {
            Ok(value) => {
                for event in std::mem::take(&mut self.staged) {
                    self.events.emit(event);
                }
                Ok(value)
            }
            Err(e) => {
                self.staged.clear();
                self.store.rollback()?;
                Err(e)
            }
        }
    }

    fn apply_payment_tx(&mut self, request: PaymentRequest) -> Result<PaymentReceipt> {
        if !request.amount.is_positive() {
            return Err(LedgerError::validation("payment amount must be positive"));
        }
        let current = self.current_period();
        let resolved = resolver::resolve(
            &self.store,
            &self.config,
            current,
            request.client_id,
            request.payment_date,
            request.applied_period,
        )?;

        let record = PaymentRecord {
            id: Uuid::new_v4(),
            client_id: request.client_id,
            amount: request.amount,
            payment_date: request.payment_date,
            applied_period: resolved.period,
            reference: request.reference,
            note: request.note,
            voided: false,
        };
        self.store.insert_payment(&record)?;

        // explicit application is the one path allowed to lift suspension
        let lift = request.applied_period.is_some();
        self.recompute_period(record.client_id, resolved.period, lift)?;

        self.staged.push(Event::PaymentApplied {
            payment_id: record.id,
            client_id: record.client_id,
            period: resolved.period,
            amount: record.amount,
            redirected: resolved.redirected,
            timestamp: self.time.now(),
        });

        Ok(PaymentReceipt {
            payment_id: record.id,
            applied_period: resolved.period,
            redirected: resolved.redirected,
        })
    }

    fn apply_multi_tx(&mut self, request: MultiPeriodRequest) -> Result<MultiPaymentReceipt> {
        if !request.total_amount.is_positive() {
            return Err(LedgerError::validation("total amount must be positive"));
        }
        if request.periods.is_empty() {
            return Err(LedgerError::NoMonthsSpecified);
        }

        let current = self.current_period();
        for &candidate in &request.periods {
            resolver::validate_candidate(&self.config, current, candidate, true)?;
        }

        let mut eligible = Vec::with_capacity(request.periods.len());
        for &candidate in &request.periods {
            let suspended = self.store.period_status(request.client_id, candidate)?
                == Some(PeriodStatus::Suspended);
            if !suspended {
                eligible.push(candidate);
            }
        }
        if eligible.is_empty() {
            return Err(LedgerError::EmptyEligibleSet);
        }

        let amounts = allocation::split_evenly(request.total_amount, eligible.len())?;

        let mut payments = Vec::with_capacity(eligible.len());
        for (&period, amount) in eligible.iter().zip(amounts) {
            let record = PaymentRecord {
                id: Uuid::new_v4(),
                client_id: request.client_id,
                amount,
                payment_date: request.payment_date,
                applied_period: period,
                reference: request.reference.clone(),
                note: request.note.clone(),
                voided: false,
            };
            self.store.insert_payment(&record)?;
            self.recompute_period(request.client_id, period, false)?;

            self.staged.push(Event::PaymentApplied {
                payment_id: record.id,
                client_id: record.client_id,
                period,
                amount,
                redirected: false,
                timestamp: self.time.now(),
            });
            payments.push(AppliedPayment {
                payment_id: record.id,
                period,
                amount,
            });
        }

        let requested = request.periods.len();
        let applied = payments.len();
        Ok(MultiPaymentReceipt {
            payments,
            requested,
            applied,
            omitted: requested - applied,
        })
    }

    fn update_payment_tx(&mut self, id: PaymentId, update: PaymentUpdate) -> Result<UpdateReceipt> {
        let old = self
            .store
            .payment(id)?
            .ok_or(LedgerError::PaymentNotFound { id })?;
        if !update.amount.is_positive() {
            return Err(LedgerError::validation("payment amount must be positive"));
        }

        let current = self.current_period();
        let resolved = resolver::resolve(
            &self.store,
            &self.config,
            current,
            update.client_id,
            update.payment_date,
            update.applied_period,
        )?;

        let record = PaymentRecord {
            id,
            client_id: update.client_id,
            amount: update.amount,
            payment_date: update.payment_date,
            applied_period: resolved.period,
            reference: update.reference,
            note: update.note,
            voided: update.voided,
        };
        self.store.update_payment(&record)?;

        // union of previous and new (client, period), deduped, stable order
        let explicit = update.applied_period.is_some();
        let mut affected = BTreeSet::new();
        affected.insert((old.client_id, old.applied_period));
        affected.insert((record.client_id, resolved.period));
        for (client_id, period) in affected {
            let lift = explicit && client_id == record.client_id && period == resolved.period;
            self.recompute_period(client_id, period, lift)?;
        }

        self.staged.push(Event::PaymentUpdated {
            payment_id: id,
            client_id: record.client_id,
            period: resolved.period,
            amount: record.amount,
            timestamp: self.time.now(),
        });

        Ok(UpdateReceipt {
            applied_period: resolved.period,
            redirected: resolved.redirected,
        })
    }

    fn delete_payment_tx(&mut self, id: PaymentId) -> Result<()> {
        let old = self
            .store
            .payment(id)?
            .ok_or(LedgerError::PaymentNotFound { id })?;
        self.store.delete_payment(id)?;
        self.recompute_period(old.client_id, old.applied_period, false)?;

        self.staged.push(Event::PaymentDeleted {
            payment_id: id,
            client_id: old.client_id,
            period: old.applied_period,
            timestamp: self.time.now(),
        });
        Ok(())
    }

    fn seed_periods_tx(&mut self, client_id: ClientId, install_date: NaiveDate) -> Result<u32> {
        let current = self.current_period();
        let first = BillingPeriod::from_date(install_date);
        if first > current {
            return Ok(0);
        }

        let mut created = 0u32;
        let mut period = first;
        loop {
            if self.store.period_status(client_id, period)?.is_none() {
                self.store
                    .upsert_period(client_id, period, PeriodStatus::Pending)?;
                created += 1;
            }
            if period == current {
                break;
            }
            period = period.next();
        }

        if created > 0 {
            self.staged.push(Event::PeriodsSeeded {
                client_id,
                first,
                last: current,
                created,
                timestamp: self.time.now(),
            });
        }
        Ok(created)
    }

    fn set_period_status_tx(
        &mut self,
        client_id: ClientId,
        period: BillingPeriod,
        status: PeriodStatus,
    ) -> Result<()> {
        resolver::validate_candidate(&self.config, self.current_period(), period, true)?;
        let old = self.store.period_status(client_id, period)?;
        self.store.upsert_period(client_id, period, status)?;
        if old != Some(status) {
            self.staged.push(Event::PeriodStatusChanged {
                client_id,
                period,
                old_status: old,
                new_status: status,
                timestamp: self.time.now(),
            });
        }
        Ok(())
    }

    /// recompute and upsert one period's status
    ///
    /// A Suspended row stays Suspended unless the mutation explicitly
    /// targeted this period; suspension is administrative, not derived.
    fn recompute_period(
        &mut self,
        client_id: ClientId,
        period: BillingPeriod,
        lift_suspension: bool,
    ) -> Result<PeriodStatus> {
        let old = self.store.period_status(client_id, period)?;
        if old == Some(PeriodStatus::Suspended) && !lift_suspension {
            return Ok(PeriodStatus::Suspended);
        }
        let new_status = status::recalculate(&self.store, client_id, period)?;
        self.store.upsert_period(client_id, period, new_status)?;
        if old != Some(new_status) {
            self.staged.push(Event::PeriodStatusChanged {
                client_id,
                period,
                old_status: old,
                new_status,
                timestamp: self.time.now(),
            });
        }
        Ok(new_status)
    }
}
