use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

/// policy constants for period resolution and validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// how many months ahead of the current month an explicit application
    /// may reach (pre-payment window)
    pub max_future_months: u32,
    /// earliest plausible year for an applied period
    pub min_year: i32,
    /// latest plausible year for an applied period
    pub max_year: i32,
    /// whether the suspension check may fall back to the nearest prior
    /// period (and ultimately the client's current status) when no exact
    /// period row exists
    pub suspension_fallback: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_future_months: 60,
            min_year: 2000,
            max_year: 2100,
            suspension_fallback: true,
        }
    }
}

impl LedgerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_year > self.max_year {
            return Err(LedgerError::validation(format!(
                "min_year {} exceeds max_year {}",
                self.min_year, self.max_year
            )));
        }
        Ok(())
    }
}
