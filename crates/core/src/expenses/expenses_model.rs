//! Expense domain models.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::approval_gate::ApprovalRequired;
use crate::alerts::BudgetAlert;
use crate::budget_check::{BudgetCheckRequest, BudgetCheckResult};
use crate::budgets::BudgetScope;
use crate::constants::{MAX_AMOUNT, MAX_APPROVAL_NOTE_LEN, MAX_DESCRIPTION_LEN};
use crate::errors::{Error, Result, ValidationError};

/// Where an expense stands in the approval workflow.
///
/// `NotRequired` is terminal. `Pending` moves to `Approved` or `Rejected`
/// exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalState {
    NotRequired,
    Pending {
        document: String,
    },
    Approved {
        note: String,
        document: Option<String>,
    },
    Rejected {
        note: String,
    },
}

impl ApprovalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalState::NotRequired => "NOT_REQUIRED",
            ApprovalState::Pending { .. } => "PENDING",
            ApprovalState::Approved { .. } => "APPROVED",
            ApprovalState::Rejected { .. } => "REJECTED",
        }
    }
}

/// Domain model representing a recorded expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub user_id: i64,
    pub category_id: i64,
    pub amount: Decimal,
    pub expense_date: NaiveDate,
    pub description: Option<String>,
    pub group_id: Option<i64>,
    /// Informational: the expense pushed its budget past the amount
    pub is_over_budget: bool,
    pub approval: ApprovalState,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Expense {
    pub fn new(id: String, new_expense: &NewExpense, today: NaiveDate, now: NaiveDateTime) -> Result<Self> {
        new_expense.validate(today)?;
        Ok(Self {
            id,
            user_id: new_expense.user_id,
            category_id: new_expense.category_id,
            amount: new_expense.amount,
            expense_date: new_expense.expense_date,
            description: new_expense.description.clone(),
            group_id: new_expense.group_id,
            is_over_budget: false,
            approval: ApprovalState::NotRequired,
            created_at: now,
            updated_at: now,
        })
    }

    /// The category budget scope whose spend this expense counts towards.
    pub fn scope(&self) -> BudgetScope {
        BudgetScope::new(
            self.user_id,
            Some(self.category_id),
            self.expense_date.year(),
            self.group_id,
        )
    }

    pub fn mark_over_budget(&mut self, now: NaiveDateTime) {
        self.is_over_budget = true;
        self.updated_at = now;
    }

    pub fn require_approval(&mut self, document: String, now: NaiveDateTime) {
        self.approval = ApprovalState::Pending { document };
        self.updated_at = now;
    }

    pub fn requires_approval(&self) -> bool {
        !matches!(self.approval, ApprovalState::NotRequired)
    }

    /// Expenses that never needed approval count as approved.
    pub fn is_approved(&self) -> bool {
        matches!(
            self.approval,
            ApprovalState::NotRequired | ApprovalState::Approved { .. }
        )
    }

    /// Approves a pending expense. Without a new document the one supplied
    /// at creation is kept.
    pub fn approve(&mut self, note: &str, document: Option<String>, now: NaiveDateTime) -> Result<()> {
        let ApprovalState::Pending {
            document: pending_document,
        } = &self.approval
        else {
            return Err(self.not_pending("approved"));
        };
        let note = validate_note(note)?;
        if note.trim().is_empty() {
            return Err(ValidationError::MissingField("approvalNote".to_string()).into());
        }
        let document = document
            .filter(|d| !d.trim().is_empty())
            .or_else(|| Some(pending_document.clone()));
        self.approval = ApprovalState::Approved { note, document };
        self.updated_at = now;
        Ok(())
    }

    pub fn reject(&mut self, note: &str, now: NaiveDateTime) -> Result<()> {
        if !matches!(self.approval, ApprovalState::Pending { .. }) {
            return Err(self.not_pending("rejected"));
        }
        let note = validate_note(note)?;
        self.approval = ApprovalState::Rejected { note };
        self.updated_at = now;
        Ok(())
    }

    /// Expenses dated in the current calendar year are locked.
    pub fn can_be_modified(&self, current_year: i32) -> bool {
        self.expense_date.year() != current_year
    }

    /// Replaces amount, category, date and description.
    ///
    /// Fails with `InvalidOperation` if either the stored or the new date
    /// falls in the current calendar year.
    pub fn update_details(&mut self, update: &ExpenseUpdate, today: NaiveDate, now: NaiveDateTime) -> Result<()> {
        validate_amount_and_date(update.amount, update.expense_date, today)?;
        validate_description(update.description.as_deref())?;

        let current_year = today.year();
        if !self.can_be_modified(current_year) || update.expense_date.year() == current_year {
            return Err(Error::InvalidOperation(
                "Cannot edit current year expenses without approval".to_string(),
            ));
        }

        self.amount = update.amount;
        self.category_id = update.category_id;
        self.expense_date = update.expense_date;
        self.description = update.description.clone();
        self.updated_at = now;
        Ok(())
    }

    fn not_pending(&self, action: &str) -> Error {
        Error::InvalidOperation(format!(
            "Expense {} cannot be {} from state {}",
            self.id,
            action,
            self.approval.as_str()
        ))
    }
}

/// Input model for creating a new expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub user_id: i64,
    pub category_id: i64,
    pub amount: Decimal,
    pub expense_date: NaiveDate,
    pub description: Option<String>,
    pub group_id: Option<i64>,
    /// Evidence reference demanded when the expense breaks a hard limit
    pub approval_document: Option<String>,
}

impl NewExpense {
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        validate_amount_and_date(self.amount, self.expense_date, today)?;
        validate_description(self.description.as_deref())?;
        if let Some(document) = &self.approval_document {
            if document.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(Error::invalid_input(format!(
                    "Approval document reference cannot exceed {} characters",
                    MAX_DESCRIPTION_LEN
                )));
            }
        }
        Ok(())
    }

    pub fn budget_check_request(&self) -> BudgetCheckRequest {
        BudgetCheckRequest {
            user_id: self.user_id,
            category_id: Some(self.category_id),
            amount: self.amount,
            expense_date: self.expense_date,
            group_id: self.group_id,
        }
    }
}

/// Input model for updating an existing expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseUpdate {
    /// The user performing the update; must own the expense.
    pub user_id: i64,
    pub category_id: i64,
    pub amount: Decimal,
    pub expense_date: NaiveDate,
    pub description: Option<String>,
}

/// Outcome of adding an expense.
///
/// A hard-limit rejection is an expected workflow outcome, so it is a
/// variant here rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpenseCreation {
    Created {
        expense: Expense,
        budget_check: BudgetCheckResult,
        /// Alert recorded for this expense, if one fired and was stored
        alert: Option<BudgetAlert>,
    },
    ApprovalRequired(ApprovalRequired),
}

impl ExpenseCreation {
    pub fn is_created(&self) -> bool {
        matches!(self, ExpenseCreation::Created { .. })
    }

    /// Converts an approval rejection into `Error::ApprovalRequired`.
    pub fn into_result(self) -> Result<Expense> {
        match self {
            ExpenseCreation::Created { expense, .. } => Ok(expense),
            ExpenseCreation::ApprovalRequired(required) => Err(required.into()),
        }
    }
}

fn validate_amount_and_date(amount: Decimal, expense_date: NaiveDate, today: NaiveDate) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(amount).into());
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge(amount).into());
    }
    if expense_date > today {
        return Err(Error::invalid_input("Expense date cannot be in the future"));
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> Result<()> {
    match description {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => Err(Error::invalid_input(format!(
            "Description cannot exceed {} characters",
            MAX_DESCRIPTION_LEN
        ))),
        _ => Ok(()),
    }
}

fn validate_note(note: &str) -> Result<String> {
    if note.chars().count() > MAX_APPROVAL_NOTE_LEN {
        return Err(Error::invalid_input(format!(
            "Approval note cannot exceed {} characters",
            MAX_APPROVAL_NOTE_LEN
        )));
    }
    Ok(note.to_string())
}
