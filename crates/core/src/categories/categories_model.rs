use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Maximum length of a category name
const MAX_CATEGORY_NAME_LEN: usize = 50;

/// Expense category. Inactive categories accept no new expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
    pub is_active: bool,
    pub created_by_user_id: Option<i64>,
}

/// Input model for creating a new category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    pub created_by_user_id: Option<i64>,
}

impl NewCategory {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_input("Category name cannot be empty"));
        }
        if self.name.chars().count() > MAX_CATEGORY_NAME_LEN {
            return Err(Error::invalid_input(format!(
                "Category name cannot exceed {} characters",
                MAX_CATEGORY_NAME_LEN
            )));
        }
        Ok(())
    }
}
