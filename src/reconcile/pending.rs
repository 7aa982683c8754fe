use crate::errors::{LedgerError, Result};
use crate::period::BillingPeriod;
use crate::store::LedgerStore;
use crate::types::{ClientId, PendingPeriod, PeriodStatus};

use super::status;

/// most recent period at or before `through` that is neither fully paid nor
/// suspended
///
/// Most-recent-eligible rather than oldest: new payments align with current
/// arrears instead of forcing a chronological backfill. Callers that want a
/// specific month use an explicit application instead.
pub fn latest_unpaid<S: LedgerStore + ?Sized>(
    store: &S,
    client_id: ClientId,
    through: BillingPeriod,
) -> Result<Option<BillingPeriod>> {
    let price = store
        .plan_price(client_id)?
        .ok_or(LedgerError::NoPlanAssociated { client_id })?;

    for row in store.periods_through(client_id, through)? {
        if row.status == PeriodStatus::Suspended {
            continue;
        }
        let total = status::paid_total(store, client_id, row.period)?;
        let complete = if price.is_positive() {
            total >= price
        } else {
            total.is_positive()
        };
        if !complete {
            return Ok(Some(row.period));
        }
    }
    Ok(None)
}

/// all periods at or before `through` still awaiting payment, most recent
/// first; suspended and fully paid rows are excluded
pub fn pending_periods<S: LedgerStore + ?Sized>(
    store: &S,
    client_id: ClientId,
    through: BillingPeriod,
) -> Result<Vec<PendingPeriod>> {
    let price = store
        .plan_price(client_id)?
        .ok_or(LedgerError::NoPlanAssociated { client_id })?;

    let mut rows = Vec::new();
    for row in store.periods_through(client_id, through)? {
        if matches!(row.status, PeriodStatus::Paid | PeriodStatus::Suspended) {
            continue;
        }
        rows.push(PendingPeriod {
            period: row.period,
            status: row.status,
            plan_price: price,
            total_paid: status::paid_total(store, client_id, row.period)?,
        });
    }
    Ok(rows)
}
