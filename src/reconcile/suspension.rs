use crate::errors::Result;
use crate::period::BillingPeriod;
use crate::store::LedgerStore;
use crate::types::{ClientId, ClientStatus, PeriodStatus};

/// whether (client, period) is administratively suspended
///
/// An exact period row decides directly. With `allow_fallback`, a missing
/// row defers to the nearest prior period's status, and a client with no
/// period rows at all defers to the client's current administrative status.
/// Without fallback a missing row means not suspended.
pub fn is_suspended<S: LedgerStore + ?Sized>(
    store: &S,
    client_id: ClientId,
    period: BillingPeriod,
    allow_fallback: bool,
) -> Result<bool> {
    if let Some(status) = store.period_status(client_id, period)? {
        return Ok(status == PeriodStatus::Suspended);
    }
    if !allow_fallback {
        return Ok(false);
    }
    match store.latest_status_on_or_before(client_id, period)? {
        Some(status) => Ok(status == PeriodStatus::Suspended),
        None => Ok(store.client_status(client_id)? == Some(ClientStatus::Suspended)),
    }
}
