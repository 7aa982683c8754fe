use chrono::NaiveDate;

use crate::config::LedgerConfig;
use crate::errors::{LedgerError, Result};
use crate::period::BillingPeriod;
use crate::store::LedgerStore;
use crate::types::ClientId;

use super::{pending, suspension};

/// outcome of period resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPeriod {
    pub period: BillingPeriod,
    /// true when the candidate was suspended and the payment was moved to
    /// the most recent eligible pending period
    pub redirected: bool,
}

/// check a candidate against the plausible year range and the future window
///
/// `allow_future` opens the bounded pre-payment window (explicit
/// applications); inferred candidates must not pass the current month.
pub fn validate_candidate(
    config: &LedgerConfig,
    current: BillingPeriod,
    candidate: BillingPeriod,
    allow_future: bool,
) -> Result<()> {
    let out_of_years = candidate.year() < config.min_year || candidate.year() > config.max_year;
    let limit = if allow_future {
        current.plus_months(config.max_future_months)
    } else {
        current
    };
    if out_of_years || candidate > limit {
        return Err(LedgerError::InvalidPeriod {
            month: candidate.month(),
            year: candidate.year(),
        });
    }
    Ok(())
}

/// decide the final period a payment applies to
///
/// Explicit mode honors the caller's stated period even when it is
/// suspended; paying a suspended month explicitly is the mechanism for
/// normalizing it. Inferred mode derives the candidate from the payment
/// date and redirects away from suspension.
pub fn resolve<S: LedgerStore + ?Sized>(
    store: &S,
    config: &LedgerConfig,
    current: BillingPeriod,
    client_id: ClientId,
    payment_date: NaiveDate,
    explicit: Option<BillingPeriod>,
) -> Result<ResolvedPeriod> {
    let explicit_mode = explicit.is_some();
    let candidate = match explicit {
        Some(period) => period,
        None => BillingPeriod::from_date(payment_date),
    };
    validate_candidate(config, current, candidate, explicit_mode)?;

    if explicit_mode {
        return Ok(ResolvedPeriod {
            period: candidate,
            redirected: false,
        });
    }

    if !suspension::is_suspended(store, client_id, candidate, config.suspension_fallback)? {
        return Ok(ResolvedPeriod {
            period: candidate,
            redirected: false,
        });
    }

    match pending::latest_unpaid(store, client_id, current)? {
        Some(period) => Ok(ResolvedPeriod {
            period,
            redirected: true,
        }),
        None => Err(LedgerError::NoEligiblePeriod { client_id }),
    }
}
