use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use rust_decimal::Decimal;
use std::sync::Arc;

use budgetwatch_core::budget_check::SpendAggregator;
use budgetwatch_core::budgets::BudgetScope;
use budgetwatch_core::errors::ValidationError;
use budgetwatch_core::expenses::{Expense, ExpenseRepositoryTrait};
use budgetwatch_core::utils::time_utils::{month_bounds, year_bounds};
use budgetwatch_core::{Error, Result};

use super::model::ExpenseDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::expenses;
use crate::utils::{decimal_to_text, sum_decimals};

pub struct ExpenseRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl ExpenseRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }

    fn load(rows: Vec<ExpenseDB>) -> Result<Vec<Expense>> {
        rows.into_iter().map(Expense::try_from).collect()
    }

    fn list_between(&self, user_id: i64, start: NaiveDate, end: NaiveDate) -> Result<Vec<Expense>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = expenses::table
            .filter(expenses::user_id.eq(user_id))
            .filter(expenses::expense_date.between(start, end))
            .order((expenses::expense_date.desc(), expenses::created_at.desc()))
            .select(ExpenseDB::as_select())
            .load::<ExpenseDB>(&mut conn)
            .map_err(StorageError::from)?;
        Self::load(rows)
    }
}

fn bounds(year: i32) -> Result<(NaiveDate, NaiveDate)> {
    year_bounds(year).ok_or(Error::Validation(ValidationError::YearOutOfRange(year)))
}

impl SpendAggregator for ExpenseRepository {
    fn get_total_spent(&self, scope: &BudgetScope) -> Result<Decimal> {
        let (start, end) = bounds(scope.year)?;
        let mut conn = get_connection(&self.pool)?;

        let mut query = expenses::table
            .filter(expenses::user_id.eq(scope.user_id))
            .filter(expenses::expense_date.between(start, end))
            .select(expenses::amount)
            .into_boxed();
        if let Some(category_id) = scope.category_id {
            query = query.filter(expenses::category_id.eq(category_id));
        }
        query = match scope.group_id {
            Some(group_id) => query.filter(expenses::group_id.eq(group_id)),
            None => query.filter(expenses::group_id.is_null()),
        };

        let amounts = query
            .load::<String>(&mut conn)
            .map_err(StorageError::from)?;
        sum_decimals("expenses.amount", &amounts)
    }
}

#[async_trait]
impl ExpenseRepositoryTrait for ExpenseRepository {
    async fn create(&self, expense: Expense) -> Result<Expense> {
        let row = ExpenseDB::from(&expense);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Expense> {
                diesel::insert_into(expenses::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(expense)
            })
            .await
    }

    async fn update(&self, expense: Expense) -> Result<Expense> {
        let row = ExpenseDB::from(&expense);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Expense> {
                let affected = diesel::update(expenses::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(Error::not_found("Expense", &row.id));
                }
                Ok(expense)
            })
            .await
    }

    async fn delete(&self, expense_id: &str) -> Result<usize> {
        let id_owned = expense_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(expenses::table.find(id_owned))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    fn get_by_id(&self, expense_id: &str) -> Result<Option<Expense>> {
        let mut conn = get_connection(&self.pool)?;
        expenses::table
            .find(expense_id)
            .select(ExpenseDB::as_select())
            .first::<ExpenseDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(Expense::try_from)
            .transpose()
    }

    fn list_by_date_range(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Expense>> {
        self.list_between(user_id, start, end)
    }

    fn list_by_category(&self, user_id: i64, category_id: i64, year: i32) -> Result<Vec<Expense>> {
        let (start, end) = bounds(year)?;
        let mut conn = get_connection(&self.pool)?;
        let rows = expenses::table
            .filter(expenses::user_id.eq(user_id))
            .filter(expenses::category_id.eq(category_id))
            .filter(expenses::expense_date.between(start, end))
            .order((expenses::expense_date.desc(), expenses::created_at.desc()))
            .select(ExpenseDB::as_select())
            .load::<ExpenseDB>(&mut conn)
            .map_err(StorageError::from)?;
        Self::load(rows)
    }

    fn list_by_month(&self, user_id: i64, year: i32, month: u32) -> Result<Vec<Expense>> {
        let (start, end) = month_bounds(year, month).ok_or_else(|| {
            Error::invalid_input(format!("Month {} of {} is not a valid calendar month", month, year))
        })?;
        self.list_between(user_id, start, end)
    }

    fn list_by_date(&self, user_id: i64, date: NaiveDate) -> Result<Vec<Expense>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = expenses::table
            .filter(expenses::user_id.eq(user_id))
            .filter(expenses::expense_date.eq(date))
            .order(expenses::created_at.desc())
            .select(ExpenseDB::as_select())
            .load::<ExpenseDB>(&mut conn)
            .map_err(StorageError::from)?;
        Self::load(rows)
    }

    fn exists_duplicate(&self, expense: &Expense) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = expenses::table
            .filter(expenses::user_id.eq(expense.user_id))
            .filter(expenses::expense_date.eq(expense.expense_date))
            .filter(expenses::amount.eq(decimal_to_text(expense.amount)))
            .filter(expenses::category_id.eq(expense.category_id))
            .filter(expenses::id.ne(expense.id.clone()))
            .select(expenses::id)
            .into_boxed();
        query = match &expense.description {
            Some(description) => query.filter(expenses::description.eq(description.clone())),
            None => query.filter(expenses::description.is_null()),
        };
        let found = query
            .first::<String>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(found.is_some())
    }
}
