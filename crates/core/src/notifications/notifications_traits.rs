use async_trait::async_trait;

use super::notifications_model::{
    NotificationChannel, NotificationPreference, NotificationPreferenceUpdate,
};
use crate::alerts::BudgetAlert;
use crate::errors::Result;

/// Trait for notification preference persistence
#[async_trait]
pub trait NotificationRepositoryTrait: Send + Sync {
    fn get_preferences(&self, user_id: i64) -> Result<Option<NotificationPreference>>;
    /// Inserts or replaces the user's preferences.
    async fn save_preferences(&self, preference: NotificationPreference) -> Result<NotificationPreference>;
}

/// Trait for notification preference operations
#[async_trait]
pub trait NotificationServiceTrait: Send + Sync {
    /// Stored preferences, or the defaults if the user never saved any.
    fn get_preferences(&self, user_id: i64) -> Result<NotificationPreference>;
    async fn save_preferences(&self, update: NotificationPreferenceUpdate) -> Result<NotificationPreference>;
    /// Channels a delivery adapter should use for `alert`; empty when the
    /// user's levels say not to notify.
    fn channels_for_alert(&self, alert: &BudgetAlert) -> Result<Vec<NotificationChannel>>;
}
