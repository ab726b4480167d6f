//! Tests for the budget aggregate: construction, mutators and classification.

#[cfg(test)]
mod tests {
    use crate::budgets::{Budget, BudgetPerformance, BudgetRecord, BudgetStatus, NewBudget};
    use crate::constants::MAX_AMOUNT;
    use crate::errors::{Error, ValidationError};
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn new_budget(amount: Decimal) -> NewBudget {
        NewBudget {
            user_id: 7,
            category_id: Some(3),
            year: 2025,
            amount,
            warning_threshold: None,
            critical_threshold: None,
            enforce_hard_limit: false,
            group_id: None,
        }
    }

    fn budget(amount: Decimal) -> Budget {
        Budget::new("b-1".to_string(), &new_budget(amount), ts()).unwrap()
    }

    // ==================== Construction ====================

    #[test]
    fn test_new_budget_applies_defaults() {
        let b = budget(dec!(1000));
        assert_eq!(b.warning_threshold(), dec!(80));
        assert_eq!(b.critical_threshold(), dec!(100));
        assert!(!b.enforce_hard_limit());
        assert_eq!(b.created_at(), ts());
    }

    #[test]
    fn test_new_budget_rejects_non_positive_amount() {
        for amount in [dec!(0), dec!(-5)] {
            let err = Budget::new("b".into(), &new_budget(amount), ts()).unwrap_err();
            assert!(matches!(
                err,
                Error::Validation(ValidationError::NonPositiveAmount(_))
            ));
        }
    }

    #[test]
    fn test_new_budget_rejects_amount_above_maximum() {
        let huge = dec!(1000000000000000000000000000);
        let err = Budget::new("b".into(), &new_budget(huge), ts()).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::AmountTooLarge(_))
        ));
        assert!(Budget::new("b".into(), &new_budget(MAX_AMOUNT), ts()).is_ok());
    }

    #[test]
    fn test_new_budget_rejects_year_out_of_range() {
        for year in [1999, 2101] {
            let mut input = new_budget(dec!(100));
            input.year = year;
            let err = Budget::new("b".into(), &input, ts()).unwrap_err();
            assert!(matches!(
                err,
                Error::Validation(ValidationError::YearOutOfRange(y)) if y == year
            ));
        }
        let mut edge = new_budget(dec!(100));
        edge.year = 2100;
        assert!(Budget::new("b".into(), &edge, ts()).is_ok());
    }

    #[test]
    fn test_new_budget_applies_thresholds_only_when_both_supplied() {
        let mut input = new_budget(dec!(100));
        input.warning_threshold = Some(dec!(60));
        let b = Budget::new("b".into(), &input, ts()).unwrap();
        assert_eq!(b.warning_threshold(), dec!(80));

        input.critical_threshold = Some(dec!(90));
        input.enforce_hard_limit = true;
        let b = Budget::new("b".into(), &input, ts()).unwrap();
        assert_eq!(b.warning_threshold(), dec!(60));
        assert_eq!(b.critical_threshold(), dec!(90));
        assert!(b.enforce_hard_limit());
    }

    // ==================== Mutators ====================

    #[test]
    fn test_set_thresholds_rejects_invalid_pairs_and_keeps_previous() {
        let mut b = budget(dec!(1000));
        let invalid = [
            (dec!(0), dec!(100)),
            (dec!(101), dec!(120)),
            (dec!(50), dec!(0)),
            (dec!(50), dec!(151)),
            (dec!(90), dec!(90)),
            (dec!(95), dec!(90)),
        ];
        for (warning, critical) in invalid {
            let err = b.set_thresholds(warning, critical, ts()).unwrap_err();
            assert!(
                matches!(err, Error::Validation(ValidationError::InvalidThresholds(_))),
                "expected InvalidThresholds for ({warning}, {critical})"
            );
            assert_eq!(b.warning_threshold(), dec!(80));
            assert_eq!(b.critical_threshold(), dec!(100));
        }
    }

    #[test]
    fn test_set_thresholds_accepts_upper_bounds() {
        let mut b = budget(dec!(1000));
        b.set_thresholds(dec!(100), dec!(150), ts()).unwrap();
        assert_eq!(b.warning_threshold(), dec!(100));
        assert_eq!(b.critical_threshold(), dec!(150));
    }

    #[test]
    fn test_update_amount_rejects_non_positive_and_keeps_previous() {
        let mut b = budget(dec!(1000));
        assert!(b.update_amount(dec!(0), ts()).is_err());
        assert!(b.update_amount(dec!(-1), ts()).is_err());
        assert_eq!(b.amount(), dec!(1000));

        let later = ts() + chrono::Duration::hours(1);
        b.update_amount(dec!(1500), later).unwrap();
        assert_eq!(b.amount(), dec!(1500));
        assert_eq!(b.updated_at(), later);
    }

    #[test]
    fn test_toggle_hard_limit() {
        let mut b = budget(dec!(1000));
        b.enable_hard_limit(ts());
        assert!(b.enforce_hard_limit());
        b.disable_hard_limit(ts());
        assert!(!b.enforce_hard_limit());
    }

    // ==================== Classification ====================

    #[test]
    fn test_compute_usage() {
        let b = budget(dec!(1000));
        assert_eq!(b.compute_usage(dec!(950)), dec!(95));
        assert_eq!(b.compute_usage(dec!(1050)), dec!(105));
        assert_eq!(b.compute_usage(Decimal::ZERO), Decimal::ZERO);
        assert_eq!(b.compute_usage(Decimal::MAX), Decimal::MAX);
    }

    #[test]
    fn test_is_over_critical_is_inclusive() {
        let b = budget(dec!(1000));
        assert_eq!(b.is_over_critical(dec!(1000)), (true, dec!(100)));
        assert_eq!(b.is_over_critical(dec!(999)), (false, dec!(99.9)));
    }

    #[test]
    fn test_is_in_warning_zone_bounds() {
        let b = budget(dec!(1000));
        assert!(!b.is_in_warning_zone(dec!(799.99)));
        assert!(b.is_in_warning_zone(dec!(800)));
        assert!(b.is_in_warning_zone(dec!(999.99)));
        assert!(!b.is_in_warning_zone(dec!(1000)));
    }

    #[test]
    fn test_status_classification() {
        let mut b = budget(dec!(1000));
        assert_eq!(b.status(dec!(100)), BudgetStatus::Safe);
        assert_eq!(b.status(dec!(800)), BudgetStatus::Warning);
        assert_eq!(b.status(dec!(1000)), BudgetStatus::Critical);
        assert_eq!(b.status(dec!(1000.01)), BudgetStatus::Over);

        // A critical threshold above 100% leaves room for Over before Critical.
        b.set_thresholds(dec!(80), dec!(120), ts()).unwrap();
        assert_eq!(b.status(dec!(1100)), BudgetStatus::Over);
        assert_eq!(b.status(dec!(1000)), BudgetStatus::Warning);
    }

    #[test]
    fn test_performance_from_spent() {
        let b = budget(dec!(1000));
        let perf = BudgetPerformance::from_spent(&b, dec!(850));
        assert_eq!(perf.remaining_amount, dec!(150));
        assert_eq!(perf.percentage_used, dec!(85));
        assert_eq!(perf.status, BudgetStatus::Warning);
    }

    // ==================== Records ====================

    #[test]
    fn test_record_round_trip_and_rejects_corrupt_rows() {
        let b = budget(dec!(1000));
        let record = BudgetRecord::from(&b);
        assert_eq!(Budget::try_from(record.clone()).unwrap(), b);

        let mut corrupt = record;
        corrupt.warning_threshold = dec!(120);
        corrupt.critical_threshold = dec!(110);
        assert!(Budget::try_from(corrupt).is_err());
    }
}
