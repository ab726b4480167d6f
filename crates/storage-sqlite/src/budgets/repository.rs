use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::Sqlite;
use diesel::SqliteConnection;
use std::sync::Arc;

use budgetwatch_core::budget_check::BudgetLookup;
use budgetwatch_core::budgets::{Budget, BudgetRepositoryTrait, BudgetScope};
use budgetwatch_core::{Error, Result};

use super::model::BudgetDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::budgets;

pub struct BudgetRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl BudgetRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

/// Exact match on every scope part; a missing category or group only
/// matches NULL.
fn scope_query(scope: &BudgetScope) -> budgets::BoxedQuery<'static, Sqlite> {
    let mut query = budgets::table
        .filter(budgets::user_id.eq(scope.user_id))
        .filter(budgets::year.eq(scope.year))
        .into_boxed();
    query = match scope.category_id {
        Some(category_id) => query.filter(budgets::category_id.eq(category_id)),
        None => query.filter(budgets::category_id.is_null()),
    };
    match scope.group_id {
        Some(group_id) => query.filter(budgets::group_id.eq(group_id)),
        None => query.filter(budgets::group_id.is_null()),
    }
}

impl BudgetLookup for BudgetRepository {
    fn get_budget(&self, scope: &BudgetScope) -> Result<Option<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        scope_query(scope)
            .select(BudgetDB::as_select())
            .first::<BudgetDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(Budget::try_from)
            .transpose()
    }
}

#[async_trait]
impl BudgetRepositoryTrait for BudgetRepository {
    async fn create(&self, budget: Budget) -> Result<Budget> {
        let row = BudgetDB::from(&budget);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Budget> {
                diesel::insert_into(budgets::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(budget)
            })
            .await
    }

    async fn update(&self, budget: Budget) -> Result<Budget> {
        let row = BudgetDB::from(&budget);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Budget> {
                let affected = diesel::update(budgets::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(Error::not_found("Budget", &row.id));
                }
                Ok(budget)
            })
            .await
    }

    async fn delete(&self, budget_id: &str) -> Result<usize> {
        let id_owned = budget_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(budgets::table.find(id_owned))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    fn get_by_id(&self, budget_id: &str) -> Result<Option<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        budgets::table
            .find(budget_id)
            .select(BudgetDB::as_select())
            .first::<BudgetDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(Budget::try_from)
            .transpose()
    }

    fn exists(&self, scope: &BudgetScope) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let found = scope_query(scope)
            .select(budgets::id)
            .first::<String>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(found.is_some())
    }

    fn list_by_year(&self, user_id: i64, year: i32) -> Result<Vec<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        budgets::table
            .filter(budgets::user_id.eq(user_id))
            .filter(budgets::year.eq(year))
            .order((budgets::category_id.asc(), budgets::created_at.asc()))
            .select(BudgetDB::as_select())
            .load::<BudgetDB>(&mut conn)
            .map_err(StorageError::from)?
            .into_iter()
            .map(Budget::try_from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer, DbPool};
    use budgetwatch_core::budgets::NewBudget;
    use budgetwatch_core::errors::DatabaseError;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::{tempdir, TempDir};

    fn setup() -> (BudgetRepository, Arc<DbPool>, TempDir) {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let pool = create_pool(db_path.to_str().unwrap()).unwrap();
        run_migrations(&pool).unwrap();

        let mut conn = get_connection(&pool).unwrap();
        diesel::sql_query(
            "INSERT INTO categories (id, name, is_default, is_active) VALUES (3, 'Travel', 0, 1), (4, 'Office', 0, 1)",
        )
        .execute(&mut conn)
        .unwrap();

        let writer = spawn_writer((*pool).clone());
        (
            BudgetRepository::new(Arc::clone(&pool), writer),
            pool,
            temp_dir,
        )
    }

    fn budget(id: &str, category_id: Option<i64>, group_id: Option<i64>) -> Budget {
        let input = NewBudget {
            user_id: 7,
            category_id,
            year: 2025,
            amount: dec!(1000.00),
            warning_threshold: Some(dec!(75.5)),
            critical_threshold: Some(dec!(95)),
            enforce_hard_limit: true,
            group_id,
        };
        let now = NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        Budget::new(id.to_string(), &input, now).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_round_trips_decimals() {
        let (repo, _pool, _dir) = setup();
        let created = repo.create(budget("b-1", Some(3), None)).await.unwrap();

        let loaded = repo.get_by_id("b-1").unwrap().unwrap();
        assert_eq!(loaded, created);
        assert_eq!(loaded.amount(), dec!(1000));
        assert_eq!(loaded.warning_threshold(), dec!(75.5));
        assert!(loaded.enforce_hard_limit());
    }

    #[tokio::test]
    async fn test_scope_lookup_is_exact() {
        let (repo, _pool, _dir) = setup();
        repo.create(budget("cat", Some(3), None)).await.unwrap();
        repo.create(budget("overall", None, None)).await.unwrap();
        repo.create(budget("group", Some(3), Some(9))).await.unwrap();

        let found = |c, g| {
            repo.get_budget(&BudgetScope::new(7, c, 2025, g))
                .unwrap()
                .map(|b| b.id().to_string())
        };
        assert_eq!(found(Some(3), None).as_deref(), Some("cat"));
        assert_eq!(found(None, None).as_deref(), Some("overall"));
        assert_eq!(found(Some(3), Some(9)).as_deref(), Some("group"));
        assert_eq!(found(Some(4), None), None);
        assert_eq!(found(None, Some(9)), None);

        assert!(repo.exists(&BudgetScope::new(7, Some(3), 2025, None)).unwrap());
        assert!(!repo.exists(&BudgetScope::new(7, Some(3), 2024, None)).unwrap());
        assert!(!repo.exists(&BudgetScope::new(8, Some(3), 2025, None)).unwrap());
    }

    #[tokio::test]
    async fn test_unique_scope_index_covers_null_parts() {
        let (repo, _pool, _dir) = setup();
        repo.create(budget("a", None, None)).await.unwrap();

        let err = repo.create(budget("b", None, None)).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Database(DatabaseError::UniqueViolation(_))
        ));

        repo.create(budget("c", Some(3), None)).await.unwrap();
        let err = repo.create(budget("d", Some(3), None)).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Database(DatabaseError::UniqueViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (repo, _pool, _dir) = setup();
        let mut b = repo.create(budget("b-1", Some(3), None)).await.unwrap();
        let later = NaiveDate::from_ymd_opt(2025, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        b.update_amount(dec!(2500), later).unwrap();
        b.disable_hard_limit(later);
        repo.update(b).await.unwrap();

        let loaded = repo.get_by_id("b-1").unwrap().unwrap();
        assert_eq!(loaded.amount(), dec!(2500));
        assert!(!loaded.enforce_hard_limit());
        assert_eq!(loaded.updated_at(), later);

        assert!(matches!(
            repo.update(budget("missing", Some(4), None)).await.unwrap_err(),
            Error::NotFound { .. }
        ));

        assert_eq!(repo.delete("b-1").await.unwrap(), 1);
        assert_eq!(repo.delete("b-1").await.unwrap(), 0);
        assert!(repo.get_by_id("b-1").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_year() {
        let (repo, _pool, _dir) = setup();
        repo.create(budget("cat", Some(3), None)).await.unwrap();
        repo.create(budget("overall", None, None)).await.unwrap();

        assert_eq!(repo.list_by_year(7, 2025).unwrap().len(), 2);
        assert!(repo.list_by_year(7, 2026).unwrap().is_empty());
        assert!(repo.list_by_year(8, 2025).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_row_is_reported() {
        let (repo, pool, _dir) = setup();
        let mut conn = get_connection(&pool).unwrap();
        diesel::sql_query(
            "INSERT INTO budgets (id, user_id, category_id, year, amount, warning_threshold, \
             critical_threshold, enforce_hard_limit, group_id, created_at, updated_at) \
             VALUES ('bad', 7, 3, 2025, 'lots', '80', '100', 0, NULL, \
             '2025-01-01 00:00:00', '2025-01-01 00:00:00')",
        )
        .execute(&mut conn)
        .unwrap();

        assert!(matches!(
            repo.get_by_id("bad").unwrap_err(),
            Error::Database(DatabaseError::Internal(_))
        ));
    }
}
