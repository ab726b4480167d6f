//! Database models for budgets.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use budgetwatch_core::budgets::{Budget, BudgetRecord};
use budgetwatch_core::{Error, Result};

use crate::utils::{decimal_to_text, text_to_decimal};

/// Database model for budgets. Decimals are kept as TEXT.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::budgets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
#[serde(rename_all = "camelCase")]
pub struct BudgetDB {
    pub id: String,
    pub user_id: i64,
    pub category_id: Option<i64>,
    pub year: i32,
    pub amount: String,
    pub warning_threshold: String,
    pub critical_threshold: String,
    pub enforce_hard_limit: bool,
    pub group_id: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<BudgetDB> for Budget {
    type Error = Error;

    fn try_from(db: BudgetDB) -> Result<Self> {
        Budget::try_from(BudgetRecord {
            amount: text_to_decimal("budgets.amount", &db.amount)?,
            warning_threshold: text_to_decimal("budgets.warning_threshold", &db.warning_threshold)?,
            critical_threshold: text_to_decimal(
                "budgets.critical_threshold",
                &db.critical_threshold,
            )?,
            id: db.id,
            user_id: db.user_id,
            category_id: db.category_id,
            year: db.year,
            enforce_hard_limit: db.enforce_hard_limit,
            group_id: db.group_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<&Budget> for BudgetDB {
    fn from(budget: &Budget) -> Self {
        let record = BudgetRecord::from(budget);
        Self {
            id: record.id,
            user_id: record.user_id,
            category_id: record.category_id,
            year: record.year,
            amount: decimal_to_text(record.amount),
            warning_threshold: decimal_to_text(record.warning_threshold),
            critical_threshold: decimal_to_text(record.critical_threshold),
            enforce_hard_limit: record.enforce_hard_limit,
            group_id: record.group_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
