//! Database models for budget alerts.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use budgetwatch_core::alerts::BudgetAlert;
use budgetwatch_core::{Error, Result};

use crate::utils::{decimal_to_text, text_to_decimal};

#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::budget_alerts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct BudgetAlertDB {
    pub id: String,
    pub budget_id: String,
    pub user_id: i64,
    pub threshold_level: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

impl TryFrom<BudgetAlertDB> for BudgetAlert {
    type Error = Error;

    fn try_from(db: BudgetAlertDB) -> Result<Self> {
        Ok(Self {
            threshold_level: text_to_decimal("budget_alerts.threshold_level", &db.threshold_level)?,
            id: db.id,
            budget_id: db.budget_id,
            user_id: db.user_id,
            message: db.message,
            is_read: db.is_read,
            created_at: db.created_at,
        })
    }
}

impl From<&BudgetAlert> for BudgetAlertDB {
    fn from(alert: &BudgetAlert) -> Self {
        Self {
            id: alert.id.clone(),
            budget_id: alert.budget_id.clone(),
            user_id: alert.user_id,
            threshold_level: decimal_to_text(alert.threshold_level),
            message: alert.message.clone(),
            is_read: alert.is_read,
            created_at: alert.created_at,
        }
    }
}
