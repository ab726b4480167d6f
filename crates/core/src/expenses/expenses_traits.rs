use async_trait::async_trait;
use chrono::NaiveDate;

use super::expenses_model::{Expense, ExpenseCreation, ExpenseUpdate, NewExpense};
use super::expenses_summary::ExpenseSummary;
use crate::budget_check::SpendAggregator;
use crate::errors::Result;

/// Trait for expense repository operations
#[async_trait]
pub trait ExpenseRepositoryTrait: SpendAggregator + Send + Sync {
    async fn create(&self, expense: Expense) -> Result<Expense>;
    async fn update(&self, expense: Expense) -> Result<Expense>;
    async fn delete(&self, expense_id: &str) -> Result<usize>;
    fn get_by_id(&self, expense_id: &str) -> Result<Option<Expense>>;
    /// Expenses dated within `[start, end]`, newest first.
    fn list_by_date_range(&self, user_id: i64, start: NaiveDate, end: NaiveDate) -> Result<Vec<Expense>>;
    fn list_by_category(&self, user_id: i64, category_id: i64, year: i32) -> Result<Vec<Expense>>;
    /// Expenses dated within one calendar month, newest first.
    fn list_by_month(&self, user_id: i64, year: i32, month: u32) -> Result<Vec<Expense>>;
    fn list_by_date(&self, user_id: i64, date: NaiveDate) -> Result<Vec<Expense>>;
    /// Whether an expense with the same user, date, amount, category and
    /// description is already stored.
    fn exists_duplicate(&self, expense: &Expense) -> Result<bool>;
}

/// Trait for expense service operations
#[async_trait]
pub trait ExpenseServiceTrait: Send + Sync {
    async fn add_expense(&self, new_expense: NewExpense) -> Result<ExpenseCreation>;
    async fn update_expense(&self, expense_id: &str, update: ExpenseUpdate) -> Result<Expense>;
    async fn delete_expense(&self, expense_id: &str, user_id: i64) -> Result<()>;
    async fn approve_expense(
        &self,
        expense_id: &str,
        note: &str,
        document: Option<String>,
    ) -> Result<Expense>;
    async fn reject_expense(&self, expense_id: &str, note: &str) -> Result<Expense>;
    fn get_expense(&self, expense_id: &str, user_id: i64) -> Result<Expense>;
    fn get_expenses_by_date_range(&self, user_id: i64, start: NaiveDate, end: NaiveDate) -> Result<Vec<Expense>>;
    fn get_expenses_by_category(&self, user_id: i64, category_id: i64, year: i32) -> Result<Vec<Expense>>;
    /// Per-category totals for a month, each compared against the user's
    /// budget for that category and year.
    fn get_monthly_summary(&self, user_id: i64, year: i32, month: u32) -> Result<ExpenseSummary>;
    fn get_daily_summary(&self, user_id: i64, date: NaiveDate) -> Result<ExpenseSummary>;
}
