//! Budget domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CRITICAL_THRESHOLD, DEFAULT_WARNING_THRESHOLD, MAX_AMOUNT, MAX_BUDGET_YEAR,
    MAX_CRITICAL_THRESHOLD, MAX_WARNING_THRESHOLD, MIN_BUDGET_YEAR,
};
use crate::errors::{Error, Result, ValidationError};

/// The `(user, category|none, year, group|none)` key identifying one budget.
///
/// Matching is exact on the optional parts: a scope without a category only
/// matches overall budgets and never a category budget, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetScope {
    pub user_id: i64,
    pub category_id: Option<i64>,
    pub year: i32,
    pub group_id: Option<i64>,
}

impl BudgetScope {
    pub fn new(user_id: i64, category_id: Option<i64>, year: i32, group_id: Option<i64>) -> Self {
        Self {
            user_id,
            category_id,
            year,
            group_id,
        }
    }

    pub fn is_overall(&self) -> bool {
        self.category_id.is_none()
    }
}

/// Classification of spend against a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetStatus {
    /// Below the warning threshold
    Safe,
    /// At or above warning, below critical
    Warning,
    /// At or above critical, not above the budget amount
    Critical,
    /// Spend exceeds the budget amount
    Over,
}

/// A yearly spending ceiling.
///
/// Fields are private so the amount and threshold invariants can only be
/// changed through the validating mutators.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    id: String,
    user_id: i64,
    category_id: Option<i64>,
    year: i32,
    amount: Decimal,
    warning_threshold: Decimal,
    critical_threshold: Decimal,
    enforce_hard_limit: bool,
    group_id: Option<i64>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl Budget {
    /// Builds a budget from validated input, applying default thresholds
    /// unless both thresholds were supplied.
    pub fn new(id: String, new_budget: &NewBudget, now: NaiveDateTime) -> Result<Self> {
        validate_amount(new_budget.amount)?;
        validate_year(new_budget.year)?;

        let mut budget = Budget {
            id,
            user_id: new_budget.user_id,
            category_id: new_budget.category_id,
            year: new_budget.year,
            amount: new_budget.amount,
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
            critical_threshold: DEFAULT_CRITICAL_THRESHOLD,
            enforce_hard_limit: false,
            group_id: new_budget.group_id,
            created_at: now,
            updated_at: now,
        };

        if let (Some(warning), Some(critical)) =
            (new_budget.warning_threshold, new_budget.critical_threshold)
        {
            budget.set_thresholds(warning, critical, now)?;
        }
        if new_budget.enforce_hard_limit {
            budget.enable_hard_limit(now);
        }
        Ok(budget)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn category_id(&self) -> Option<i64> {
        self.category_id
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn group_id(&self) -> Option<i64> {
        self.group_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn warning_threshold(&self) -> Decimal {
        self.warning_threshold
    }

    pub fn critical_threshold(&self) -> Decimal {
        self.critical_threshold
    }

    pub fn enforce_hard_limit(&self) -> bool {
        self.enforce_hard_limit
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> NaiveDateTime {
        self.updated_at
    }

    pub fn scope(&self) -> BudgetScope {
        BudgetScope::new(self.user_id, self.category_id, self.year, self.group_id)
    }

    /// Percentage of the budget consumed by `spent`.
    ///
    /// Saturates at `Decimal::MAX` when the ratio does not fit.
    pub fn compute_usage(&self, spent: Decimal) -> Decimal {
        spent
            .checked_div(self.amount)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::MAX)
    }

    /// Whether `spent` reaches the critical threshold, with the percentage used.
    pub fn is_over_critical(&self, spent: Decimal) -> (bool, Decimal) {
        let percentage_used = self.compute_usage(spent);
        (percentage_used >= self.critical_threshold, percentage_used)
    }

    pub fn is_in_warning_zone(&self, spent: Decimal) -> bool {
        let percentage_used = self.compute_usage(spent);
        percentage_used >= self.warning_threshold && percentage_used < self.critical_threshold
    }

    pub fn status(&self, spent: Decimal) -> BudgetStatus {
        if spent > self.amount {
            return BudgetStatus::Over;
        }
        let (over_critical, percentage_used) = self.is_over_critical(spent);
        if over_critical {
            BudgetStatus::Critical
        } else if percentage_used >= self.warning_threshold {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Safe
        }
    }

    /// Replaces both thresholds at once. On error nothing changes.
    pub fn set_thresholds(
        &mut self,
        warning: Decimal,
        critical: Decimal,
        now: NaiveDateTime,
    ) -> Result<()> {
        validate_thresholds(warning, critical)?;
        self.warning_threshold = warning;
        self.critical_threshold = critical;
        self.updated_at = now;
        Ok(())
    }

    pub fn update_amount(&mut self, new_amount: Decimal, now: NaiveDateTime) -> Result<()> {
        validate_amount(new_amount)?;
        self.amount = new_amount;
        self.updated_at = now;
        Ok(())
    }

    pub fn enable_hard_limit(&mut self, now: NaiveDateTime) {
        self.enforce_hard_limit = true;
        self.updated_at = now;
    }

    pub fn disable_hard_limit(&mut self, now: NaiveDateTime) {
        self.enforce_hard_limit = false;
        self.updated_at = now;
    }
}

/// Persisted shape of a budget, used by storage implementations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRecord {
    pub id: String,
    pub user_id: i64,
    pub category_id: Option<i64>,
    pub year: i32,
    pub amount: Decimal,
    pub warning_threshold: Decimal,
    pub critical_threshold: Decimal,
    pub enforce_hard_limit: bool,
    pub group_id: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<BudgetRecord> for Budget {
    type Error = Error;

    /// Rehydrates a stored budget, rejecting rows that break the invariants.
    fn try_from(record: BudgetRecord) -> Result<Self> {
        validate_amount(record.amount)?;
        validate_thresholds(record.warning_threshold, record.critical_threshold)?;
        Ok(Budget {
            id: record.id,
            user_id: record.user_id,
            category_id: record.category_id,
            year: record.year,
            amount: record.amount,
            warning_threshold: record.warning_threshold,
            critical_threshold: record.critical_threshold,
            enforce_hard_limit: record.enforce_hard_limit,
            group_id: record.group_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

impl From<&Budget> for BudgetRecord {
    fn from(budget: &Budget) -> Self {
        Self {
            id: budget.id.clone(),
            user_id: budget.user_id,
            category_id: budget.category_id,
            year: budget.year,
            amount: budget.amount,
            warning_threshold: budget.warning_threshold,
            critical_threshold: budget.critical_threshold,
            enforce_hard_limit: budget.enforce_hard_limit,
            group_id: budget.group_id,
            created_at: budget.created_at,
            updated_at: budget.updated_at,
        }
    }
}

/// Input model for creating a new budget.
///
/// Thresholds are only applied when both are supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub user_id: i64,
    pub category_id: Option<i64>,
    pub year: i32,
    pub amount: Decimal,
    pub warning_threshold: Option<Decimal>,
    pub critical_threshold: Option<Decimal>,
    #[serde(default)]
    pub enforce_hard_limit: bool,
    pub group_id: Option<i64>,
}

impl NewBudget {
    pub fn scope(&self) -> BudgetScope {
        BudgetScope::new(self.user_id, self.category_id, self.year, self.group_id)
    }
}

/// Input model for updating an existing budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUpdate {
    /// The user performing the update; must own the budget.
    pub user_id: i64,
    pub amount: Decimal,
    pub warning_threshold: Option<Decimal>,
    pub critical_threshold: Option<Decimal>,
    #[serde(default)]
    pub enforce_hard_limit: bool,
}

/// Spend against a budget at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPerformance {
    pub budget_id: String,
    pub budget_amount: Decimal,
    pub spent_amount: Decimal,
    pub remaining_amount: Decimal,
    pub percentage_used: Decimal,
    pub status: BudgetStatus,
    pub warning_threshold: Decimal,
    pub critical_threshold: Decimal,
}

impl BudgetPerformance {
    pub fn from_spent(budget: &Budget, spent: Decimal) -> Self {
        Self {
            budget_id: budget.id().to_string(),
            budget_amount: budget.amount(),
            spent_amount: spent,
            remaining_amount: budget.amount() - spent,
            percentage_used: budget.compute_usage(spent),
            status: budget.status(spent),
            warning_threshold: budget.warning_threshold(),
            critical_threshold: budget.critical_threshold(),
        }
    }
}

fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(amount).into());
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge(amount).into());
    }
    Ok(())
}

fn validate_year(year: i32) -> Result<()> {
    if !(MIN_BUDGET_YEAR..=MAX_BUDGET_YEAR).contains(&year) {
        return Err(ValidationError::YearOutOfRange(year).into());
    }
    Ok(())
}

fn validate_thresholds(warning: Decimal, critical: Decimal) -> Result<()> {
    if warning <= Decimal::ZERO || warning > MAX_WARNING_THRESHOLD {
        return Err(ValidationError::InvalidThresholds(format!(
            "warning threshold must be within (0, {}], got {}",
            MAX_WARNING_THRESHOLD, warning
        ))
        .into());
    }
    if critical <= Decimal::ZERO || critical > MAX_CRITICAL_THRESHOLD {
        return Err(ValidationError::InvalidThresholds(format!(
            "critical threshold must be within (0, {}], got {}",
            MAX_CRITICAL_THRESHOLD, critical
        ))
        .into());
    }
    if warning >= critical {
        return Err(ValidationError::InvalidThresholds(format!(
            "warning threshold ({}) must be less than critical threshold ({})",
            warning, critical
        ))
        .into());
    }
    Ok(())
}
