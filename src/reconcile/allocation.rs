use crate::decimal::Money;
use crate::errors::{LedgerError, Result};

/// split a total into `parts` amounts that sum exactly to the total
///
/// Works in integer cents: each part gets the base share, and the remainder
/// is distributed one cent at a time to the leading entries. Deterministic
/// and order-sensitive, so callers pass periods in a stable order.
pub fn split_evenly(total: Money, parts: usize) -> Result<Vec<Money>> {
    if parts == 0 {
        return Err(LedgerError::validation("cannot split across zero periods"));
    }
    if !total.is_positive() {
        return Err(LedgerError::validation(format!(
            "split total must be positive, got {total}"
        )));
    }
    let cents = total
        .to_minor()
        .ok_or_else(|| LedgerError::validation(format!("amount out of range: {total}")))?;

    let n = parts as i64;
    let base = cents / n;
    let remainder = (cents % n) as usize;

    Ok((0..parts)
        .map(|i| Money::from_minor(base + i64::from(i < remainder)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_exact_sum_preserved() {
        let total = Money::from_decimal(dec!(100.00));
        let parts = split_evenly(total, 3).unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts.iter().copied().sum::<Money>(), total);
        assert_eq!(parts[0], Money::from_decimal(dec!(33.34)));
        assert_eq!(parts[1], Money::from_decimal(dec!(33.33)));
        assert_eq!(parts[2], Money::from_decimal(dec!(33.33)));
    }

    #[test]
    fn test_parts_differ_by_at_most_one_cent() {
        for n in 1..=12 {
            let total = Money::from_decimal(dec!(123.45));
            let parts = split_evenly(total, n).unwrap();
            let min = parts.iter().copied().fold(parts[0], Money::min);
            let max = parts.iter().copied().fold(parts[0], Money::max);
            assert!(max - min <= Money::CENT, "n={n}: spread exceeds one cent");
            assert_eq!(parts.iter().copied().sum::<Money>(), total);
        }
    }

    #[test]
    fn test_single_part_is_identity() {
        let total = Money::from_decimal(dec!(57.99));
        assert_eq!(split_evenly(total, 1).unwrap(), vec![total]);
    }

    #[test]
    fn test_remainder_goes_to_leading_entries() {
        let parts = split_evenly(Money::from_minor(5), 3).unwrap();
        assert_eq!(
            parts,
            vec![Money::from_minor(2), Money::from_minor(2), Money::from_minor(1)]
        );
    }

    #[test]
    fn test_total_smaller_than_part_count_yields_zero_slices() {
        // trailing slices may be zero when the total has fewer cents than
        // there are parts; the sum is still exact
        let parts = split_evenly(Money::from_minor(2), 3).unwrap();
        assert_eq!(
            parts,
            vec![Money::from_minor(1), Money::from_minor(1), Money::ZERO]
        );
        assert_eq!(parts.iter().copied().sum::<Money>(), Money::from_minor(2));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(split_evenly(Money::from_major(10), 0).is_err());
        assert!(split_evenly(Money::ZERO, 2).is_err());
        assert!(split_evenly(Money::ZERO - Money::from_major(5), 2).is_err());
    }
}
