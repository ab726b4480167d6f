//! Budget alert domain model.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DISPLAY_DECIMAL_PRECISION, MAX_ALERT_MESSAGE_LEN};
use crate::errors::{Error, Result};

/// Point-in-time notice that a budget crossed a threshold.
///
/// Alerts are an audit trail: only the read flag changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAlert {
    pub id: String,
    pub budget_id: String,
    pub user_id: i64,
    /// Percentage used at the moment the alert fired
    pub threshold_level: Decimal,
    pub message: String,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

impl BudgetAlert {
    pub fn new(
        id: String,
        budget_id: String,
        user_id: i64,
        threshold_level: Decimal,
        message: String,
        now: NaiveDateTime,
    ) -> Result<Self> {
        if threshold_level <= Decimal::ZERO {
            return Err(Error::invalid_input(format!(
                "Threshold level must be positive, got {}",
                threshold_level
            )));
        }
        if message.trim().is_empty() {
            return Err(Error::invalid_input("Alert message cannot be empty"));
        }
        if message.chars().count() > MAX_ALERT_MESSAGE_LEN {
            return Err(Error::invalid_input(format!(
                "Alert message cannot exceed {} characters",
                MAX_ALERT_MESSAGE_LEN
            )));
        }
        Ok(Self {
            id,
            budget_id,
            user_id,
            threshold_level,
            message,
            is_read: false,
            created_at: now,
        })
    }

    /// Standard message for a budget threshold alert.
    pub fn budget_message(percentage_used: Decimal) -> String {
        let mut display = percentage_used.round_dp(DISPLAY_DECIMAL_PRECISION);
        display.rescale(DISPLAY_DECIMAL_PRECISION);
        format!("Budget alert: You have used {}% of your budget.", display)
    }

    pub fn mark_read(&mut self) {
        self.is_read = true;
    }

    pub fn mark_unread(&mut self) {
        self.is_read = false;
    }
}
