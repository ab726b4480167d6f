use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::notifications_model::{
    NotificationChannel, NotificationPreference, NotificationPreferenceUpdate,
};
use super::notifications_traits::{NotificationRepositoryTrait, NotificationServiceTrait};
use crate::alerts::BudgetAlert;
use crate::errors::Result;
use crate::utils::time_utils::Clock;

pub struct NotificationService {
    repository: Arc<dyn NotificationRepositoryTrait>,
    clock: Arc<dyn Clock>,
}

impl NotificationService {
    pub fn new(repository: Arc<dyn NotificationRepositoryTrait>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

#[async_trait]
impl NotificationServiceTrait for NotificationService {
    fn get_preferences(&self, user_id: i64) -> Result<NotificationPreference> {
        Ok(self
            .repository
            .get_preferences(user_id)?
            .unwrap_or_else(|| NotificationPreference::new(user_id, self.clock.now())))
    }

    async fn save_preferences(
        &self,
        update: NotificationPreferenceUpdate,
    ) -> Result<NotificationPreference> {
        let now = self.clock.now();
        let mut preference = self.get_preferences(update.user_id)?;
        preference.update_thresholds(
            update.notify_at_low,
            update.notify_at_medium,
            update.notify_at_high,
            now,
        )?;
        preference.update_channels(
            update.enable_in_app,
            update.enable_email,
            update.enable_sms,
            now,
        );
        self.repository.save_preferences(preference).await
    }

    fn channels_for_alert(&self, alert: &BudgetAlert) -> Result<Vec<NotificationChannel>> {
        let preference = self.get_preferences(alert.user_id)?;
        if !preference.should_notify_at(alert.threshold_level) {
            debug!(
                "User {} opted out of alerts at {}%",
                alert.user_id,
                alert.threshold_level.round_dp(2)
            );
            return Ok(Vec::new());
        }
        Ok(preference.enabled_channels())
    }
}
