//! Collaborator traits consumed by the budget check evaluator.
//!
//! Each trait is a single read capability so the evaluator can be driven by
//! in-memory fakes. The repository traits extend these, so any repository
//! can be handed to the evaluator directly.

use rust_decimal::Decimal;

use super::budget_check_model::{BudgetCheckRequest, BudgetCheckResult};
use crate::alerts::BudgetAlert;
use crate::budgets::{Budget, BudgetScope};
use crate::errors::Result;

/// Finds the budget for an exact scope tuple.
pub trait BudgetLookup {
    fn get_budget(&self, scope: &BudgetScope) -> Result<Option<Budget>>;
}

/// Sums persisted expenses for a scope.
///
/// A scope without a category sums every category; the group part always
/// matches exactly, with no group meaning "personal expenses only".
pub trait SpendAggregator {
    fn get_total_spent(&self, scope: &BudgetScope) -> Result<Decimal>;
}

/// Supplies the most recent alert (by creation time) issued for a budget.
pub trait AlertHistory {
    fn get_last_alert(&self, budget_id: &str) -> Result<Option<BudgetAlert>>;
}

/// Service surface exposing the evaluation to the expense flow.
pub trait BudgetCheckServiceTrait: Send + Sync {
    fn evaluate_budget_check(&self, request: &BudgetCheckRequest) -> Result<BudgetCheckResult>;
}
