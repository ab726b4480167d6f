//! Database models for categories.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use budgetwatch_core::categories::{Category, NewCategory};

#[derive(
    Queryable,
    Identifiable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct CategoryDB {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
    pub is_active: bool,
    pub created_by_user_id: Option<i64>,
}

/// Insert model; the id is assigned by SQLite.
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::categories)]
#[serde(rename_all = "camelCase")]
pub struct NewCategoryDB {
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
    pub is_active: bool,
    pub created_by_user_id: Option<i64>,
}

impl From<CategoryDB> for Category {
    fn from(db: CategoryDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            description: db.description,
            is_default: db.is_default,
            is_active: db.is_active,
            created_by_user_id: db.created_by_user_id,
        }
    }
}

impl From<NewCategory> for NewCategoryDB {
    fn from(domain: NewCategory) -> Self {
        Self {
            name: domain.name.trim().to_string(),
            description: domain.description,
            is_default: domain.is_default,
            is_active: true,
            created_by_user_id: domain.created_by_user_id,
        }
    }
}
