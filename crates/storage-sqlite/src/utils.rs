//! Helpers for storing decimals as SQLite TEXT.
//!
//! Amounts are written normalized (no trailing zeros) so that equality
//! filters such as the duplicate-expense check compare like with like.

use std::str::FromStr;

use budgetwatch_core::Result;
use rust_decimal::Decimal;

use crate::errors::StorageError;

pub fn decimal_to_text(value: Decimal) -> String {
    value.normalize().to_string()
}

pub fn text_to_decimal(column: &str, value: &str) -> Result<Decimal> {
    Decimal::from_str(value).map_err(|e| {
        StorageError::CorruptRow(format!("{} holds '{}': {}", column, value, e)).into()
    })
}

/// Sums a column of TEXT decimals.
pub fn sum_decimals(column: &str, values: &[String]) -> Result<Decimal> {
    values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| -> Result<Decimal> {
            acc.checked_add(text_to_decimal(column, v)?).ok_or_else(|| {
                StorageError::CorruptRow(format!("sum of {} is out of range", column)).into()
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use budgetwatch_core::errors::{DatabaseError, Error};
    use rust_decimal_macros::dec;

    #[test]
    fn test_decimal_to_text_normalizes() {
        assert_eq!(decimal_to_text(dec!(120.50)), "120.5");
        assert_eq!(decimal_to_text(dec!(100.00)), "100");
        assert_eq!(decimal_to_text(dec!(0.01)), "0.01");
    }

    #[test]
    fn test_text_to_decimal_reports_column() {
        assert_eq!(text_to_decimal("amount", "99.9").unwrap(), dec!(99.9));
        let err = text_to_decimal("amount", "abc").unwrap_err();
        assert!(matches!(
            err,
            Error::Database(DatabaseError::Internal(msg)) if msg.contains("amount")
        ));
    }

    #[test]
    fn test_sum_decimals() {
        let values = vec!["100".to_string(), "20.5".to_string(), "0.25".to_string()];
        assert_eq!(sum_decimals("amount", &values).unwrap(), dec!(120.75));
        assert_eq!(sum_decimals("amount", &[]).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_sum_decimals_overflow_is_an_error() {
        let max = Decimal::MAX.to_string();
        let err = sum_decimals("amount", &[max.clone(), max]).unwrap_err();
        assert!(matches!(
            err,
            Error::Database(DatabaseError::Internal(msg)) if msg.contains("out of range")
        ));
    }
}
