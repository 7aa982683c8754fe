use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{LedgerError, Result};

/// a specific calendar month a payment can be applied to, independent of any
/// day-of-month or timezone concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BillingPeriod {
    // field order matters: derived Ord compares year first
    year: i32,
    month: u32,
}

impl BillingPeriod {
    /// create a period; month must be 1-12
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::InvalidPeriod { month, year });
        }
        Ok(Self { year, month })
    }

    /// the period a calendar date falls in
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// the following month
    pub fn next(&self) -> Self {
        self.plus_months(1)
    }

    /// the preceding month
    pub fn prev(&self) -> Self {
        let idx = self.index() - 1;
        Self::from_index(idx)
    }

    /// the period `months` months later
    pub fn plus_months(&self, months: u32) -> Self {
        Self::from_index(self.index() + months as i64)
    }

    fn index(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    fn from_index(idx: i64) -> Self {
        Self {
            year: idx.div_euclid(12) as i32,
            month: (idx.rem_euclid(12) + 1) as u32,
        }
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_range_validation() {
        assert!(BillingPeriod::new(2024, 0).is_err());
        assert!(BillingPeriod::new(2024, 13).is_err());
        assert!(BillingPeriod::new(2024, 12).is_ok());
    }

    #[test]
    fn test_ordering() {
        let a = BillingPeriod::new(2023, 12).unwrap();
        let b = BillingPeriod::new(2024, 1).unwrap();
        let c = BillingPeriod::new(2024, 5).unwrap();
        assert!(a < b);
        assert!(b < c);
        assert_eq!(b.max(a), b);
    }

    #[test]
    fn test_next_prev_across_year_boundary() {
        let dec = BillingPeriod::new(2023, 12).unwrap();
        let jan = BillingPeriod::new(2024, 1).unwrap();
        assert_eq!(dec.next(), jan);
        assert_eq!(jan.prev(), dec);
    }

    #[test]
    fn test_plus_months() {
        let p = BillingPeriod::new(2024, 3).unwrap();
        assert_eq!(p.plus_months(0), p);
        assert_eq!(p.plus_months(10), BillingPeriod::new(2025, 1).unwrap());
        assert_eq!(p.plus_months(60), BillingPeriod::new(2029, 3).unwrap());
    }

    #[test]
    fn test_from_date() {
        let d = NaiveDate::from_ymd_opt(2024, 7, 31).unwrap();
        assert_eq!(BillingPeriod::from_date(d), BillingPeriod::new(2024, 7).unwrap());
    }

    #[test]
    fn test_display() {
        let p = BillingPeriod::new(2024, 3).unwrap();
        assert_eq!(p.to_string(), "3/2024");
    }
}
