use log::debug;
use rust_decimal::Decimal;

use super::budget_check_model::{BudgetCheckRequest, BudgetCheckResult};
use super::budget_check_traits::{AlertHistory, BudgetLookup, SpendAggregator};
use crate::alerts::BudgetAlert;
use crate::budgets::Budget;
use crate::errors::{Error, Result};

/// Evaluates a candidate expense against the budget for its exact scope.
///
/// Reads only; alert creation and expense mutation are left to the caller.
/// Collaborator errors are returned unchanged: a failed budget lookup must
/// never be read as "no budget".
pub fn evaluate<B, S, H>(
    budgets: &B,
    spend: &S,
    alerts: &H,
    request: &BudgetCheckRequest,
) -> Result<BudgetCheckResult>
where
    B: BudgetLookup + ?Sized,
    S: SpendAggregator + ?Sized,
    H: AlertHistory + ?Sized,
{
    let scope = request.scope();
    let Some(budget) = budgets.get_budget(&scope)? else {
        debug!("No budget for scope {:?}; expense is unconstrained", scope);
        return Ok(BudgetCheckResult::no_budget());
    };

    let current_spent = spend.get_total_spent(&scope)?;
    let projected_spent = current_spent.checked_add(request.amount).ok_or_else(|| {
        Error::invalid_input(format!(
            "Projected spend {} + {} is out of range",
            current_spent, request.amount
        ))
    })?;
    let percentage_used = budget.compute_usage(projected_spent);
    let is_over_budget = projected_spent > budget.amount();

    let last_alert = alerts.get_last_alert(budget.id())?;
    let should_trigger_alert = should_trigger_alert(&budget, percentage_used, last_alert.as_ref());

    debug!(
        "Budget {} check: spent {} + {} = {} ({}%), over={}, alert={}",
        budget.id(),
        current_spent,
        request.amount,
        projected_spent,
        percentage_used.round_dp(2),
        is_over_budget,
        should_trigger_alert
    );

    Ok(BudgetCheckResult {
        has_budget: true,
        budget_id: Some(budget.id().to_string()),
        budget_amount: budget.amount(),
        current_spent,
        projected_spent,
        percentage_used,
        status: Some(budget.status(projected_spent)),
        is_over_budget,
        requires_approval: budget.enforce_hard_limit() && is_over_budget,
        should_trigger_alert,
    })
}

/// Two-tier escalation rule.
///
/// Fires at the critical tier unless the last alert was already at or above
/// critical, otherwise at the warning tier unless the last alert was already
/// at or above warning. Only the most recent alert is consulted.
pub fn should_trigger_alert(
    budget: &Budget,
    percentage_used: Decimal,
    last_alert: Option<&BudgetAlert>,
) -> bool {
    let last_level = last_alert.map(|alert| alert.threshold_level);
    let below = |threshold: Decimal| last_level.map_or(true, |level| level < threshold);

    if percentage_used >= budget.critical_threshold() && below(budget.critical_threshold()) {
        true
    } else {
        percentage_used >= budget.warning_threshold() && below(budget.warning_threshold())
    }
}
