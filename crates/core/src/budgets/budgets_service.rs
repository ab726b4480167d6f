use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use uuid::Uuid;

use super::budgets_model::{Budget, BudgetPerformance, BudgetUpdate, NewBudget};
use super::budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
use crate::budget_check::SpendAggregator;
use crate::errors::{DatabaseError, Error, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::utils::time_utils::Clock;

/// Service for managing budgets
pub struct BudgetService {
    repository: Arc<dyn BudgetRepositoryTrait>,
    spend: Arc<dyn SpendAggregator + Send + Sync>,
    event_sink: Arc<dyn DomainEventSink>,
    clock: Arc<dyn Clock>,
}

impl BudgetService {
    pub fn new(
        repository: Arc<dyn BudgetRepositoryTrait>,
        spend: Arc<dyn SpendAggregator + Send + Sync>,
        event_sink: Arc<dyn DomainEventSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            spend,
            event_sink,
            clock,
        }
    }

    fn get_owned(&self, budget_id: &str, user_id: i64, action: &'static str) -> Result<Budget> {
        let budget = self
            .repository
            .get_by_id(budget_id)?
            .ok_or_else(|| Error::not_found("Budget", budget_id))?;
        if budget.user_id() != user_id {
            warn!(
                "User {} attempted to {} budget {} owned by {}",
                user_id,
                action,
                budget_id,
                budget.user_id()
            );
            return Err(Error::Unauthorized {
                user_id,
                entity: "Budget",
                action,
            });
        }
        Ok(budget)
    }
}

#[async_trait]
impl BudgetServiceTrait for BudgetService {
    async fn create_budget(&self, new_budget: NewBudget) -> Result<Budget> {
        let scope = new_budget.scope();
        if self.repository.exists(&scope)? {
            return Err(Error::BudgetAlreadyExists {
                year: scope.year,
                category_id: scope.category_id,
            });
        }

        let budget = Budget::new(Uuid::new_v4().to_string(), &new_budget, self.clock.now())?;
        // The store's unique scope index catches a create that raced the
        // existence check above.
        let created = match self.repository.create(budget).await {
            Err(Error::Database(DatabaseError::UniqueViolation(_))) => {
                return Err(Error::BudgetAlreadyExists {
                    year: scope.year,
                    category_id: scope.category_id,
                })
            }
            other => other?,
        };
        debug!("Created budget {} for scope {:?}", created.id(), scope);

        self.event_sink
            .emit(DomainEvent::budgets_changed(vec![created.id().to_string()]));
        Ok(created)
    }

    async fn update_budget(&self, budget_id: &str, update: BudgetUpdate) -> Result<Budget> {
        let mut budget = self.get_owned(budget_id, update.user_id, "update")?;
        let now = self.clock.now();

        budget.update_amount(update.amount, now)?;
        if let (Some(warning), Some(critical)) = (update.warning_threshold, update.critical_threshold)
        {
            budget.set_thresholds(warning, critical, now)?;
        }
        if update.enforce_hard_limit {
            budget.enable_hard_limit(now);
        } else {
            budget.disable_hard_limit(now);
        }

        let updated = self.repository.update(budget).await?;
        self.event_sink
            .emit(DomainEvent::budgets_changed(vec![updated.id().to_string()]));
        Ok(updated)
    }

    async fn delete_budget(&self, budget_id: &str, user_id: i64) -> Result<()> {
        self.get_owned(budget_id, user_id, "delete")?;
        self.repository.delete(budget_id).await?;
        debug!("Deleted budget {}", budget_id);
        self.event_sink
            .emit(DomainEvent::budgets_changed(vec![budget_id.to_string()]));
        Ok(())
    }

    fn get_budget(&self, budget_id: &str, user_id: i64) -> Result<Budget> {
        self.get_owned(budget_id, user_id, "view")
    }

    fn get_budgets_by_year(&self, user_id: i64, year: i32) -> Result<Vec<Budget>> {
        self.repository.list_by_year(user_id, year)
    }

    fn get_budget_performance(&self, budget_id: &str, user_id: i64) -> Result<BudgetPerformance> {
        let budget = self.get_owned(budget_id, user_id, "view")?;
        let spent = self.spend.get_total_spent(&budget.scope())?;
        Ok(BudgetPerformance::from_spent(&budget, spent))
    }
}
