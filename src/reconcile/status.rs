use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::period::BillingPeriod;
use crate::store::LedgerStore;
use crate::types::{ClientId, PeriodStatus};

/// derive a period's status from the plan price and accumulated payments
///
/// Pure and idempotent. A zero/undefined price means any positive payment
/// settles the period.
pub fn derive_status(price: Money, paid: Money) -> PeriodStatus {
    if price.is_positive() {
        if paid >= price {
            PeriodStatus::Paid
        } else if paid.is_positive() {
            PeriodStatus::PartiallyPaid
        } else {
            PeriodStatus::Pending
        }
    } else if paid.is_positive() {
        PeriodStatus::Paid
    } else {
        PeriodStatus::Pending
    }
}

/// sum of non-voided payments applied to (client, period)
pub fn paid_total<S: LedgerStore + ?Sized>(
    store: &S,
    client_id: ClientId,
    period: BillingPeriod,
) -> Result<Money> {
    Ok(store
        .payments_for_period(client_id, period)?
        .iter()
        .filter(|p| !p.voided)
        .map(|p| p.amount)
        .sum())
}

/// recompute a period's status from the stored payment rows
///
/// Side-effect-free; persisting the result is a separate upsert owned by
/// the ledger.
pub fn recalculate<S: LedgerStore + ?Sized>(
    store: &S,
    client_id: ClientId,
    period: BillingPeriod,
) -> Result<PeriodStatus> {
    let price = store
        .plan_price(client_id)?
        .ok_or(LedgerError::NoPlanAssociated { client_id })?;
    let paid = paid_total(store, client_id, period)?;
    Ok(derive_status(price, paid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::{ClientStatus, PaymentRecord};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_derivation_mapping() {
        let price = Money::from_major(500);
        assert_eq!(derive_status(price, Money::ZERO), PeriodStatus::Pending);
        assert_eq!(
            derive_status(price, Money::from_major(200)),
            PeriodStatus::PartiallyPaid
        );
        assert_eq!(derive_status(price, price), PeriodStatus::Paid);
        assert_eq!(
            derive_status(price, Money::from_major(600)),
            PeriodStatus::Paid
        );
    }

    #[test]
    fn test_zero_price_plan() {
        assert_eq!(derive_status(Money::ZERO, Money::ZERO), PeriodStatus::Pending);
        assert_eq!(
            derive_status(Money::ZERO, Money::from_decimal(dec!(0.01))),
            PeriodStatus::Paid
        );
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let price = Money::from_decimal(dec!(49.99));
        let paid = Money::from_decimal(dec!(25.00));
        assert_eq!(derive_status(price, paid), derive_status(price, paid));
    }

    #[test]
    fn test_recalculate_ignores_voided_payments() {
        let mut store = MemoryStore::new();
        let client = Uuid::new_v4();
        store.add_client(client, Money::from_major(500), ClientStatus::Active);
        let period = BillingPeriod::new(2024, 3).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        store
            .insert_payment(&PaymentRecord {
                id: Uuid::new_v4(),
                client_id: client,
                amount: Money::from_major(500),
                payment_date: date,
                applied_period: period,
                reference: None,
                note: None,
                voided: true,
            })
            .unwrap();
        store
            .insert_payment(&PaymentRecord {
                id: Uuid::new_v4(),
                client_id: client,
                amount: Money::from_major(200),
                payment_date: date,
                applied_period: period,
                reference: None,
                note: None,
                voided: false,
            })
            .unwrap();

        assert_eq!(paid_total(&store, client, period).unwrap(), Money::from_major(200));
        assert_eq!(
            recalculate(&store, client, period).unwrap(),
            PeriodStatus::PartiallyPaid
        );
    }

    #[test]
    fn test_recalculate_requires_plan() {
        let mut store = MemoryStore::new();
        let client = Uuid::new_v4();
        store.add_client_without_plan(client, ClientStatus::Active);

        let err = recalculate(&store, client, BillingPeriod::new(2024, 3).unwrap());
        assert!(matches!(err, Err(LedgerError::NoPlanAssociated { .. })));
    }
}
