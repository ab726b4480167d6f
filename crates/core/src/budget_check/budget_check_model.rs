//! Budget check input and decision record.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::budgets::{BudgetScope, BudgetStatus};

/// A candidate expense to be checked against its budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCheckRequest {
    pub user_id: i64,
    pub category_id: Option<i64>,
    pub amount: Decimal,
    pub expense_date: NaiveDate,
    pub group_id: Option<i64>,
}

impl BudgetCheckRequest {
    /// The budget scope this request is evaluated against; the year comes
    /// from the expense date.
    pub fn scope(&self) -> BudgetScope {
        BudgetScope::new(
            self.user_id,
            self.category_id,
            self.expense_date.year(),
            self.group_id,
        )
    }
}

/// Decision record for one candidate expense. Built fresh per evaluation
/// and never cached or persisted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCheckResult {
    pub has_budget: bool,
    pub budget_id: Option<String>,
    pub budget_amount: Decimal,
    /// Spend persisted before the candidate expense
    pub current_spent: Decimal,
    /// `current_spent` plus the candidate amount
    pub projected_spent: Decimal,
    pub percentage_used: Decimal,
    pub status: Option<BudgetStatus>,
    pub is_over_budget: bool,
    pub requires_approval: bool,
    pub should_trigger_alert: bool,
}

impl BudgetCheckResult {
    /// Result for a scope with no budget: no constraint applies.
    pub fn no_budget() -> Self {
        Self::default()
    }
}
