use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use budgetwatch_core::alerts::{AlertRepositoryTrait, BudgetAlert};
use budgetwatch_core::budget_check::AlertHistory;
use budgetwatch_core::{Error, Result};

use super::model::BudgetAlertDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::budget_alerts;

/// Alerts are append-only apart from the read flag.
pub struct AlertRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl AlertRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }

    fn load(rows: Vec<BudgetAlertDB>) -> Result<Vec<BudgetAlert>> {
        rows.into_iter().map(BudgetAlert::try_from).collect()
    }
}

impl AlertHistory for AlertRepository {
    fn get_last_alert(&self, budget_id: &str) -> Result<Option<BudgetAlert>> {
        let mut conn = get_connection(&self.pool)?;
        // Ids are time-ordered, so they break ties between equal timestamps.
        budget_alerts::table
            .filter(budget_alerts::budget_id.eq(budget_id))
            .order((budget_alerts::created_at.desc(), budget_alerts::id.desc()))
            .select(BudgetAlertDB::as_select())
            .first::<BudgetAlertDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(BudgetAlert::try_from)
            .transpose()
    }
}

#[async_trait]
impl AlertRepositoryTrait for AlertRepository {
    async fn create(&self, alert: BudgetAlert) -> Result<BudgetAlert> {
        let row = BudgetAlertDB::from(&alert);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<BudgetAlert> {
                diesel::insert_into(budget_alerts::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(alert)
            })
            .await
    }

    fn get_by_id(&self, alert_id: &str) -> Result<Option<BudgetAlert>> {
        let mut conn = get_connection(&self.pool)?;
        budget_alerts::table
            .find(alert_id)
            .select(BudgetAlertDB::as_select())
            .first::<BudgetAlertDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(BudgetAlert::try_from)
            .transpose()
    }

    fn get_unread(&self, user_id: i64) -> Result<Vec<BudgetAlert>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = budget_alerts::table
            .filter(budget_alerts::user_id.eq(user_id))
            .filter(budget_alerts::is_read.eq(false))
            .order((budget_alerts::created_at.desc(), budget_alerts::id.desc()))
            .select(BudgetAlertDB::as_select())
            .load::<BudgetAlertDB>(&mut conn)
            .map_err(StorageError::from)?;
        Self::load(rows)
    }

    fn list_by_user(&self, user_id: i64, limit: i64) -> Result<Vec<BudgetAlert>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = budget_alerts::table
            .filter(budget_alerts::user_id.eq(user_id))
            .order((budget_alerts::created_at.desc(), budget_alerts::id.desc()))
            .limit(limit)
            .select(BudgetAlertDB::as_select())
            .load::<BudgetAlertDB>(&mut conn)
            .map_err(StorageError::from)?;
        Self::load(rows)
    }

    async fn set_read(&self, alert_id: &str, is_read: bool) -> Result<BudgetAlert> {
        let id_owned = alert_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<BudgetAlert> {
                let updated = diesel::update(budget_alerts::table.find(&id_owned))
                    .set(budget_alerts::is_read.eq(is_read))
                    .returning(BudgetAlertDB::as_returning())
                    .get_result(conn)
                    .optional()
                    .map_err(StorageError::from)?;
                match updated {
                    Some(row) => BudgetAlert::try_from(row),
                    None => Err(Error::not_found("BudgetAlert", id_owned)),
                }
            })
            .await
    }
}
