//! Database models for expenses.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use budgetwatch_core::expenses::{ApprovalState, Expense};
use budgetwatch_core::{Error, Result};

use crate::errors::StorageError;
use crate::utils::{decimal_to_text, text_to_decimal};

/// Database model for expenses.
///
/// The approval state is flattened into a status column plus optional note
/// and document columns.
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
#[diesel(table_name = crate::schema::expenses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDB {
    pub id: String,
    pub user_id: i64,
    pub category_id: i64,
    pub amount: String,
    pub expense_date: NaiveDate,
    pub description: Option<String>,
    pub group_id: Option<i64>,
    pub is_over_budget: bool,
    pub approval_status: String,
    pub approval_note: Option<String>,
    pub approval_document: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn approval_columns(state: &ApprovalState) -> (Option<String>, Option<String>) {
    match state {
        ApprovalState::NotRequired => (None, None),
        ApprovalState::Pending { document } => (None, Some(document.clone())),
        ApprovalState::Approved { note, document } => (Some(note.clone()), document.clone()),
        ApprovalState::Rejected { note } => (Some(note.clone()), None),
    }
}

fn approval_state(
    id: &str,
    status: &str,
    note: Option<String>,
    document: Option<String>,
) -> Result<ApprovalState> {
    let corrupt = |what: &str| -> Error {
        StorageError::CorruptRow(format!("expense {}: {} approval {}", id, status, what)).into()
    };
    match status {
        "NOT_REQUIRED" => Ok(ApprovalState::NotRequired),
        "PENDING" => Ok(ApprovalState::Pending {
            document: document.ok_or_else(|| corrupt("has no document"))?,
        }),
        "APPROVED" => Ok(ApprovalState::Approved {
            note: note.ok_or_else(|| corrupt("has no note"))?,
            document,
        }),
        "REJECTED" => Ok(ApprovalState::Rejected {
            note: note.ok_or_else(|| corrupt("has no note"))?,
        }),
        _ => Err(corrupt("is unknown")),
    }
}

impl TryFrom<ExpenseDB> for Expense {
    type Error = Error;

    fn try_from(db: ExpenseDB) -> Result<Self> {
        let approval = approval_state(
            &db.id,
            &db.approval_status,
            db.approval_note,
            db.approval_document,
        )?;
        Ok(Self {
            amount: text_to_decimal("expenses.amount", &db.amount)?,
            id: db.id,
            user_id: db.user_id,
            category_id: db.category_id,
            expense_date: db.expense_date,
            description: db.description,
            group_id: db.group_id,
            is_over_budget: db.is_over_budget,
            approval,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<&Expense> for ExpenseDB {
    fn from(expense: &Expense) -> Self {
        let (approval_note, approval_document) = approval_columns(&expense.approval);
        Self {
            id: expense.id.clone(),
            user_id: expense.user_id,
            category_id: expense.category_id,
            amount: decimal_to_text(expense.amount),
            expense_date: expense.expense_date,
            description: expense.description.clone(),
            group_id: expense.group_id,
            is_over_budget: expense.is_over_budget,
            approval_status: expense.approval.as_str().to_string(),
            approval_note,
            approval_document,
            created_at: expense.created_at,
            updated_at: expense.updated_at,
        }
    }
}
