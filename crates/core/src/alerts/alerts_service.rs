use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::alerts_model::BudgetAlert;
use super::alerts_traits::{AlertRepositoryTrait, AlertServiceTrait};
use crate::constants::DEFAULT_ALERT_PAGE_SIZE;
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::utils::time_utils::Clock;

pub struct AlertService {
    repository: Arc<dyn AlertRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
    clock: Arc<dyn Clock>,
}

impl AlertService {
    pub fn new(
        repository: Arc<dyn AlertRepositoryTrait>,
        event_sink: Arc<dyn DomainEventSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            event_sink,
            clock,
        }
    }

    fn get_owned(&self, alert_id: &str, user_id: i64, action: &'static str) -> Result<BudgetAlert> {
        let alert = self
            .repository
            .get_by_id(alert_id)?
            .ok_or_else(|| Error::not_found("BudgetAlert", alert_id))?;
        if alert.user_id != user_id {
            return Err(Error::Unauthorized {
                user_id,
                entity: "BudgetAlert",
                action,
            });
        }
        Ok(alert)
    }
}

#[async_trait]
impl AlertServiceTrait for AlertService {
    async fn create_budget_alert(
        &self,
        budget_id: &str,
        user_id: i64,
        percentage_used: Decimal,
    ) -> Result<BudgetAlert> {
        // v7 ids sort by creation time, which keeps "last alert" stable when
        // two alerts share a timestamp.
        let alert = BudgetAlert::new(
            Uuid::now_v7().to_string(),
            budget_id.to_string(),
            user_id,
            percentage_used,
            BudgetAlert::budget_message(percentage_used),
            self.clock.now(),
        )?;
        let created = self.repository.create(alert).await?;
        debug!(
            "Created alert {} for budget {} at {}%",
            created.id,
            created.budget_id,
            created.threshold_level.round_dp(2)
        );
        self.event_sink
            .emit(DomainEvent::budget_alert_raised(&created));
        Ok(created)
    }

    fn get_unread_alerts(&self, user_id: i64) -> Result<Vec<BudgetAlert>> {
        self.repository.get_unread(user_id)
    }

    fn get_alerts(&self, user_id: i64, limit: Option<i64>) -> Result<Vec<BudgetAlert>> {
        let limit = limit.unwrap_or(DEFAULT_ALERT_PAGE_SIZE);
        if limit <= 0 {
            return Err(Error::invalid_input("Page size must be positive"));
        }
        self.repository.list_by_user(user_id, limit)
    }

    async fn mark_alert_as_read(&self, alert_id: &str, user_id: i64) -> Result<BudgetAlert> {
        let alert = self.get_owned(alert_id, user_id, "mark as read")?;
        if alert.is_read {
            return Ok(alert);
        }
        self.repository.set_read(alert_id, true).await
    }

    async fn mark_alert_as_unread(&self, alert_id: &str, user_id: i64) -> Result<BudgetAlert> {
        let alert = self.get_owned(alert_id, user_id, "mark as unread")?;
        if !alert.is_read {
            return Ok(alert);
        }
        self.repository.set_read(alert_id, false).await
    }
}
