use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Warning threshold applied to new budgets, in percent of the budget amount
pub const DEFAULT_WARNING_THRESHOLD: Decimal = dec!(80.00);

/// Critical threshold applied to new budgets, in percent of the budget amount
pub const DEFAULT_CRITICAL_THRESHOLD: Decimal = dec!(100.00);

/// Upper bound (inclusive) for a warning threshold
pub const MAX_WARNING_THRESHOLD: Decimal = dec!(100);

/// Upper bound (inclusive) for a critical threshold
pub const MAX_CRITICAL_THRESHOLD: Decimal = dec!(150);

/// Largest budget or expense amount accepted (fits a decimal(18,2) column)
pub const MAX_AMOUNT: Decimal = dec!(9999999999999999.99);

/// Budget years accepted on creation
pub const MIN_BUDGET_YEAR: i32 = 2000;
pub const MAX_BUDGET_YEAR: i32 = 2100;

/// Maximum length of a budget alert message
pub const MAX_ALERT_MESSAGE_LEN: usize = 500;

/// Maximum length of an expense description or approval document reference
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Maximum length of an approval or rejection note
pub const MAX_APPROVAL_NOTE_LEN: usize = 1000;

/// Default page size when listing a user's alerts
pub const DEFAULT_ALERT_PAGE_SIZE: i64 = 50;

/// Notification preference defaults
pub const DEFAULT_NOTIFY_AT_LOW: Decimal = dec!(50.00);
pub const DEFAULT_NOTIFY_AT_MEDIUM: Decimal = dec!(80.00);
pub const DEFAULT_NOTIFY_AT_HIGH: Decimal = dec!(100.00);

/// Decimal places used when rendering percentages in alert messages
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;
