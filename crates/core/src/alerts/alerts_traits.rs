//! Alert repository and service traits.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::alerts_model::BudgetAlert;
use crate::budget_check::AlertHistory;
use crate::errors::Result;

/// Persistence contract for budget alerts.
///
/// Extends [`AlertHistory`] so a repository can feed the evaluator directly.
#[async_trait]
pub trait AlertRepositoryTrait: AlertHistory + Send + Sync {
    async fn create(&self, alert: BudgetAlert) -> Result<BudgetAlert>;

    fn get_by_id(&self, alert_id: &str) -> Result<Option<BudgetAlert>>;

    /// Unread alerts for a user, newest first.
    fn get_unread(&self, user_id: i64) -> Result<Vec<BudgetAlert>>;

    /// The `limit` most recent alerts for a user, newest first.
    fn list_by_user(&self, user_id: i64, limit: i64) -> Result<Vec<BudgetAlert>>;

    async fn set_read(&self, alert_id: &str, is_read: bool) -> Result<BudgetAlert>;
}

#[async_trait]
pub trait AlertServiceTrait: Send + Sync {
    /// Records a threshold crossing for a budget.
    async fn create_budget_alert(
        &self,
        budget_id: &str,
        user_id: i64,
        percentage_used: Decimal,
    ) -> Result<BudgetAlert>;

    fn get_unread_alerts(&self, user_id: i64) -> Result<Vec<BudgetAlert>>;

    fn get_alerts(&self, user_id: i64, limit: Option<i64>) -> Result<Vec<BudgetAlert>>;

    async fn mark_alert_as_read(&self, alert_id: &str, user_id: i64) -> Result<BudgetAlert>;

    async fn mark_alert_as_unread(&self, alert_id: &str, user_id: i64) -> Result<BudgetAlert>;
}
