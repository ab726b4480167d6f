//! Domain event types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::alerts::BudgetAlert;
use crate::budgets::BudgetScope;

/// Facts about budgeting data changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// Expenses were created, updated, approved, rejected or deleted.
    ExpensesChanged {
        expense_ids: Vec<String>,
        /// Budget scopes whose spend may have moved
        scopes: Vec<BudgetScope>,
    },

    /// Budgets were created, updated or deleted.
    BudgetsChanged { budget_ids: Vec<String> },

    /// A new threshold alert was recorded. Delivery adapters listen for this.
    BudgetAlertRaised {
        alert_id: String,
        budget_id: String,
        user_id: i64,
        threshold_level: Decimal,
    },
}

impl DomainEvent {
    pub fn expenses_changed(expense_ids: Vec<String>, scopes: Vec<BudgetScope>) -> Self {
        Self::ExpensesChanged {
            expense_ids,
            scopes,
        }
    }

    pub fn budgets_changed(budget_ids: Vec<String>) -> Self {
        Self::BudgetsChanged { budget_ids }
    }

    pub fn budget_alert_raised(alert: &BudgetAlert) -> Self {
        Self::BudgetAlertRaised {
            alert_id: alert.id.clone(),
            budget_id: alert.budget_id.clone(),
            user_id: alert.user_id,
            threshold_level: alert.threshold_level,
        }
    }
}
