use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use log::{debug, error, warn};
use uuid::Uuid;

use super::approval_gate::decide;
use super::expenses_model::{Expense, ExpenseCreation, ExpenseUpdate, NewExpense};
use super::expenses_summary::{totals_by_category, CategoryBreakdown, ExpenseSummary};
use super::expenses_traits::{ExpenseRepositoryTrait, ExpenseServiceTrait};
use super::scope_lock::ScopeLocks;
use crate::alerts::{AlertServiceTrait, BudgetAlert};
use crate::budget_check::{BudgetCheckResult, BudgetCheckServiceTrait, BudgetLookup};
use crate::budgets::BudgetScope;
use crate::categories::CategoryRepositoryTrait;
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::utils::time_utils::{month_bounds, Clock};

/// Service for recording expenses against budgets.
///
/// Every change to a scope's spend runs under that scope's lock, so a budget
/// check and the write it authorizes are never interleaved with another
/// writer on the same scope.
pub struct ExpenseService {
    repository: Arc<dyn ExpenseRepositoryTrait>,
    category_repository: Arc<dyn CategoryRepositoryTrait>,
    budgets: Arc<dyn BudgetLookup + Send + Sync>,
    budget_check_service: Arc<dyn BudgetCheckServiceTrait>,
    alert_service: Arc<dyn AlertServiceTrait>,
    event_sink: Arc<dyn DomainEventSink>,
    clock: Arc<dyn Clock>,
    scope_locks: ScopeLocks,
}

impl ExpenseService {
    pub fn new(
        repository: Arc<dyn ExpenseRepositoryTrait>,
        category_repository: Arc<dyn CategoryRepositoryTrait>,
        budgets: Arc<dyn BudgetLookup + Send + Sync>,
        budget_check_service: Arc<dyn BudgetCheckServiceTrait>,
        alert_service: Arc<dyn AlertServiceTrait>,
        event_sink: Arc<dyn DomainEventSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            category_repository,
            budgets,
            budget_check_service,
            alert_service,
            event_sink,
            clock,
            scope_locks: ScopeLocks::new(),
        }
    }

    /// Shares a lock table with other services writing the same store.
    pub fn with_scope_locks(mut self, scope_locks: ScopeLocks) -> Self {
        self.scope_locks = scope_locks;
        self
    }

    fn find(&self, expense_id: &str) -> Result<Expense> {
        self.repository
            .get_by_id(expense_id)?
            .ok_or_else(|| Error::not_found("Expense", expense_id))
    }

    fn get_owned(&self, expense_id: &str, user_id: i64, action: &'static str) -> Result<Expense> {
        let expense = self.find(expense_id)?;
        if expense.user_id != user_id {
            warn!(
                "User {} attempted to {} expense {} owned by {}",
                user_id, action, expense_id, expense.user_id
            );
            return Err(Error::Unauthorized {
                user_id,
                entity: "Expense",
                action,
            });
        }
        Ok(expense)
    }

    fn ensure_category(&self, category_id: i64, require_active: bool) -> Result<()> {
        let category = self
            .category_repository
            .get_by_id(category_id)?
            .ok_or_else(|| Error::not_found("Category", category_id))?;
        if require_active && !category.is_active {
            return Err(Error::BusinessRule(
                "Cannot add expenses to inactive categories".to_string(),
            ));
        }
        Ok(())
    }

    /// Records the alert for a stored expense. Failures are logged and
    /// swallowed: the expense is already committed.
    async fn raise_alert(&self, check: &BudgetCheckResult, user_id: i64) -> Option<BudgetAlert> {
        let budget_id = check.budget_id.as_deref()?;
        match self
            .alert_service
            .create_budget_alert(budget_id, user_id, check.percentage_used)
            .await
        {
            Ok(alert) => Some(alert),
            Err(e) => {
                error!(
                    "Failed to record alert for budget {} at {}%: {}",
                    budget_id,
                    check.percentage_used.round_dp(2),
                    e
                );
                None
            }
        }
    }

    /// Turns expenses into per-category breakdowns, named after their
    /// category. With `year`, each is compared against the user's personal
    /// budget for that category and year.
    fn breakdown(
        &self,
        user_id: i64,
        expenses: &[Expense],
        year: Option<i32>,
    ) -> Result<Vec<CategoryBreakdown>> {
        let mut breakdown = Vec::new();
        for (category_id, (amount, count)) in totals_by_category(expenses)? {
            let category_name = self
                .category_repository
                .get_by_id(category_id)?
                .map(|c| c.name)
                .ok_or_else(|| Error::not_found("Category", category_id))?;
            let budget = match year {
                Some(year) => self
                    .budgets
                    .get_budget(&BudgetScope::new(user_id, Some(category_id), year, None))?,
                None => None,
            };
            breakdown.push(
                CategoryBreakdown::new(category_id, category_name, amount, count)
                    .with_budget(budget.as_ref()),
            );
        }
        Ok(breakdown)
    }

    fn emit_changed(&self, expense_id: &str, scopes: Vec<BudgetScope>) {
        self.event_sink.emit(DomainEvent::expenses_changed(
            vec![expense_id.to_string()],
            scopes,
        ));
    }
}

#[async_trait]
impl ExpenseServiceTrait for ExpenseService {
    async fn add_expense(&self, new_expense: NewExpense) -> Result<ExpenseCreation> {
        self.ensure_category(new_expense.category_id, true)?;

        let now = self.clock.now();
        let mut expense = Expense::new(
            Uuid::new_v4().to_string(),
            &new_expense,
            self.clock.today(),
            now,
        )?;
        let scope = expense.scope();

        let _guard = self.scope_locks.lock(scope).await;

        if self.repository.exists_duplicate(&expense)? {
            return Err(Error::Duplicate(format!(
                "expense on {} of {} in category {}",
                expense.expense_date, expense.amount, expense.category_id
            )));
        }

        let budget_check = self
            .budget_check_service
            .evaluate_budget_check(&new_expense.budget_check_request())?;

        let decision = decide(
            &budget_check,
            expense.amount,
            new_expense.approval_document.as_deref(),
        );
        if let Err(required) = decision.apply(&mut expense, now) {
            warn!(
                "Expense of {} for scope {:?} blocked by hard limit on budget {:?}",
                expense.amount, scope, budget_check.budget_id
            );
            return Ok(ExpenseCreation::ApprovalRequired(required));
        }

        let expense = self.repository.create(expense).await?;
        debug!(
            "Created expense {} (over_budget={}, approval={})",
            expense.id,
            expense.is_over_budget,
            expense.approval.as_str()
        );

        let alert = if budget_check.should_trigger_alert {
            self.raise_alert(&budget_check, expense.user_id).await
        } else {
            None
        };

        self.emit_changed(&expense.id, vec![scope]);
        Ok(ExpenseCreation::Created {
            expense,
            budget_check,
            alert,
        })
    }

    async fn update_expense(&self, expense_id: &str, update: ExpenseUpdate) -> Result<Expense> {
        let existing = self.get_owned(expense_id, update.user_id, "update")?;
        self.ensure_category(update.category_id, false)?;

        let old_scope = existing.scope();
        let new_scope = BudgetScope::new(
            existing.user_id,
            Some(update.category_id),
            update.expense_date.year(),
            existing.group_id,
        );
        let _guards = self.scope_locks.lock_all([old_scope, new_scope]).await;

        // Re-read under the locks.
        let mut expense = self.find(expense_id)?;
        expense.update_details(&update, self.clock.today(), self.clock.now())?;
        let updated = self.repository.update(expense).await?;

        self.emit_changed(&updated.id, vec![old_scope, new_scope]);
        Ok(updated)
    }

    async fn delete_expense(&self, expense_id: &str, user_id: i64) -> Result<()> {
        let expense = self.get_owned(expense_id, user_id, "delete")?;
        if !expense.can_be_modified(self.clock.current_year()) {
            warn!(
                "Refused to delete expense {} dated {} in the current year",
                expense_id, expense.expense_date
            );
            return Err(Error::InvalidOperation(
                "Current year expenses cannot be deleted without approval".to_string(),
            ));
        }

        let scope = expense.scope();
        let _guard = self.scope_locks.lock(scope).await;
        self.repository.delete(expense_id).await?;
        debug!("Deleted expense {}", expense_id);

        self.emit_changed(expense_id, vec![scope]);
        Ok(())
    }

    async fn approve_expense(
        &self,
        expense_id: &str,
        note: &str,
        document: Option<String>,
    ) -> Result<Expense> {
        let mut expense = self.find(expense_id)?;
        expense.approve(note, document, self.clock.now())?;
        let approved = self.repository.update(expense).await?;
        self.emit_changed(&approved.id, vec![approved.scope()]);
        Ok(approved)
    }

    async fn reject_expense(&self, expense_id: &str, note: &str) -> Result<Expense> {
        let mut expense = self.find(expense_id)?;
        expense.reject(note, self.clock.now())?;
        let rejected = self.repository.update(expense).await?;
        self.emit_changed(&rejected.id, vec![rejected.scope()]);
        Ok(rejected)
    }

    fn get_expense(&self, expense_id: &str, user_id: i64) -> Result<Expense> {
        self.get_owned(expense_id, user_id, "view")
    }

    fn get_expenses_by_date_range(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Expense>> {
        if start > end {
            return Err(Error::invalid_input(format!(
                "Start date {} is after end date {}",
                start, end
            )));
        }
        self.repository.list_by_date_range(user_id, start, end)
    }

    fn get_expenses_by_category(
        &self,
        user_id: i64,
        category_id: i64,
        year: i32,
    ) -> Result<Vec<Expense>> {
        self.repository.list_by_category(user_id, category_id, year)
    }

    fn get_monthly_summary(&self, user_id: i64, year: i32, month: u32) -> Result<ExpenseSummary> {
        if month_bounds(year, month).is_none() {
            return Err(Error::invalid_input(format!(
                "Month {} of {} is not a valid calendar month",
                month, year
            )));
        }
        let expenses = self.repository.list_by_month(user_id, year, month)?;
        let breakdown = self.breakdown(user_id, &expenses, Some(year))?;
        debug!(
            "Monthly summary for user {} {}-{:02}: {} expenses in {} categories",
            user_id,
            year,
            month,
            expenses.len(),
            breakdown.len()
        );
        ExpenseSummary::new(year, month, None, breakdown)
    }

    fn get_daily_summary(&self, user_id: i64, date: NaiveDate) -> Result<ExpenseSummary> {
        let expenses = self.repository.list_by_date(user_id, date)?;
        let breakdown = self.breakdown(user_id, &expenses, None)?;
        ExpenseSummary::new(date.year(), date.month(), Some(date), breakdown)
    }
}
