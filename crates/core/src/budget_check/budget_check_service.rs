use std::sync::Arc;

use super::budget_check_evaluator::evaluate;
use super::budget_check_model::{BudgetCheckRequest, BudgetCheckResult};
use super::budget_check_traits::BudgetCheckServiceTrait;
use crate::alerts::AlertRepositoryTrait;
use crate::budgets::BudgetRepositoryTrait;
use crate::errors::Result;
use crate::expenses::ExpenseRepositoryTrait;

/// Runs the evaluator against the configured repositories.
pub struct BudgetCheckService {
    budget_repository: Arc<dyn BudgetRepositoryTrait>,
    expense_repository: Arc<dyn ExpenseRepositoryTrait>,
    alert_repository: Arc<dyn AlertRepositoryTrait>,
}

impl BudgetCheckService {
    pub fn new(
        budget_repository: Arc<dyn BudgetRepositoryTrait>,
        expense_repository: Arc<dyn ExpenseRepositoryTrait>,
        alert_repository: Arc<dyn AlertRepositoryTrait>,
    ) -> Self {
        Self {
            budget_repository,
            expense_repository,
            alert_repository,
        }
    }
}

impl BudgetCheckServiceTrait for BudgetCheckService {
    fn evaluate_budget_check(&self, request: &BudgetCheckRequest) -> Result<BudgetCheckResult> {
        evaluate(
            self.budget_repository.as_ref(),
            self.expense_repository.as_ref(),
            self.alert_repository.as_ref(),
            request,
        )
    }
}
