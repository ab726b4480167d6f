//! Budget check module - evaluates a candidate expense against its budget.

mod budget_check_evaluator;
mod budget_check_model;
mod budget_check_service;
mod budget_check_traits;

pub use budget_check_evaluator::{evaluate, should_trigger_alert};
pub use budget_check_model::{BudgetCheckRequest, BudgetCheckResult};
pub use budget_check_service::BudgetCheckService;
pub use budget_check_traits::{AlertHistory, BudgetCheckServiceTrait, BudgetLookup, SpendAggregator};
