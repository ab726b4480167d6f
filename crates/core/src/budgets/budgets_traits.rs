use async_trait::async_trait;

use super::budgets_model::{Budget, BudgetPerformance, BudgetScope, BudgetUpdate, NewBudget};
use crate::budget_check::BudgetLookup;
use crate::errors::Result;

/// Trait for budget repository operations
#[async_trait]
pub trait BudgetRepositoryTrait: BudgetLookup + Send + Sync {
    async fn create(&self, budget: Budget) -> Result<Budget>;
    async fn update(&self, budget: Budget) -> Result<Budget>;
    async fn delete(&self, budget_id: &str) -> Result<usize>;
    fn get_by_id(&self, budget_id: &str) -> Result<Option<Budget>>;
    fn exists(&self, scope: &BudgetScope) -> Result<bool>;
    fn list_by_year(&self, user_id: i64, year: i32) -> Result<Vec<Budget>>;
}

/// Trait for budget service operations
#[async_trait]
pub trait BudgetServiceTrait: Send + Sync {
    async fn create_budget(&self, new_budget: NewBudget) -> Result<Budget>;
    async fn update_budget(&self, budget_id: &str, update: BudgetUpdate) -> Result<Budget>;
    async fn delete_budget(&self, budget_id: &str, user_id: i64) -> Result<()>;
    fn get_budget(&self, budget_id: &str, user_id: i64) -> Result<Budget>;
    fn get_budgets_by_year(&self, user_id: i64, year: i32) -> Result<Vec<Budget>>;
    fn get_budget_performance(&self, budget_id: &str, user_id: i64) -> Result<BudgetPerformance>;
}
