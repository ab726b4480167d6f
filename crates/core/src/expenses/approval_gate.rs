//! Block/flag/approve policy applied to a new expense after its budget check.

use std::fmt;

use chrono::NaiveDateTime;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::expenses_model::Expense;
use crate::budget_check::BudgetCheckResult;

/// What the caller must supply before a hard-limited expense can be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequired {
    pub amount: Decimal,
    pub required: String,
}

impl ApprovalRequired {
    pub fn new(amount: Decimal, required: impl Into<String>) -> Self {
        Self {
            amount,
            required: required.into(),
        }
    }
}

impl fmt::Display for ApprovalRequired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Expense with amount {} requires approval. Please provide: {}",
            self.amount, self.required
        )
    }
}

/// Gate outcome for one candidate expense.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// Store the expense. `over_budget` only flags it.
    Allowed { over_budget: bool },
    /// Store the expense as pending approval, backed by `document`.
    RequiresApproval { reason: String, document: String },
    /// Do not store the expense.
    Rejected(ApprovalRequired),
}

/// Decides how a candidate expense proceeds given its budget check.
pub fn decide(
    check: &BudgetCheckResult,
    amount: Decimal,
    approval_document: Option<&str>,
) -> GateDecision {
    if !check.is_over_budget {
        return GateDecision::Allowed { over_budget: false };
    }
    if !check.requires_approval {
        return GateDecision::Allowed { over_budget: true };
    }

    match approval_document.map(str::trim).filter(|d| !d.is_empty()) {
        Some(document) => GateDecision::RequiresApproval {
            reason: format!(
                "Projected spend {} exceeds hard-limited budget of {}",
                check.projected_spent, check.budget_amount
            ),
            document: document.to_string(),
        },
        None => GateDecision::Rejected(ApprovalRequired::new(amount, "Approval document and note")),
    }
}

impl GateDecision {
    /// Applies the decision to the expense draft. A rejection leaves the
    /// draft untouched and hands back the missing precondition.
    pub fn apply(self, expense: &mut Expense, now: NaiveDateTime) -> Result<(), ApprovalRequired> {
        match self {
            GateDecision::Allowed { over_budget } => {
                if over_budget {
                    expense.mark_over_budget(now);
                }
                Ok(())
            }
            GateDecision::RequiresApproval { reason, document } => {
                debug!("Expense {} held for approval: {}", expense.id, reason);
                expense.mark_over_budget(now);
                expense.require_approval(document, now);
                Ok(())
            }
            GateDecision::Rejected(required) => Err(required),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expenses::{ApprovalState, NewExpense};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn check(over: bool, requires_approval: bool) -> BudgetCheckResult {
        BudgetCheckResult {
            has_budget: true,
            budget_id: Some("b-1".to_string()),
            budget_amount: dec!(1000),
            current_spent: dec!(900),
            projected_spent: dec!(1100),
            percentage_used: dec!(110),
            is_over_budget: over,
            requires_approval,
            ..Default::default()
        }
    }

    fn draft() -> Expense {
        let today = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let input = NewExpense {
            user_id: 7,
            category_id: 3,
            amount: dec!(200),
            expense_date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            description: None,
            group_id: None,
            approval_document: None,
        };
        Expense::new("e-1".to_string(), &input, today, today.and_hms_opt(0, 0, 0).unwrap()).unwrap()
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_under_budget_is_allowed_unflagged() {
        let decision = decide(&check(false, false), dec!(50), None);
        assert_eq!(decision, GateDecision::Allowed { over_budget: false });

        let mut expense = draft();
        decision.apply(&mut expense, now()).unwrap();
        assert!(!expense.is_over_budget);
        assert_eq!(expense.approval, ApprovalState::NotRequired);
    }

    #[test]
    fn test_no_budget_is_allowed() {
        let decision = decide(&BudgetCheckResult::no_budget(), dec!(50), None);
        assert_eq!(decision, GateDecision::Allowed { over_budget: false });
    }

    #[test]
    fn test_soft_limit_flags_only() {
        let mut expense = draft();
        decide(&check(true, false), dec!(200), None)
            .apply(&mut expense, now())
            .unwrap();
        assert!(expense.is_over_budget);
        assert!(expense.is_approved());
    }

    #[test]
    fn test_hard_limit_without_document_is_rejected() {
        for document in [None, Some("   ")] {
            let decision = decide(&check(true, true), dec!(200), document);
            let mut expense = draft();
            let err = decision.apply(&mut expense, now()).unwrap_err();
            assert_eq!(err.amount, dec!(200));
            assert_eq!(
                err.to_string(),
                "Expense with amount 200 requires approval. Please provide: Approval document and note"
            );
            assert!(!expense.is_over_budget);
        }
    }

    #[test]
    fn test_hard_limit_with_document_goes_pending() {
        let decision = decide(&check(true, true), dec!(200), Some(" invoice-42.pdf "));
        assert!(matches!(
            &decision,
            GateDecision::RequiresApproval { document, .. } if document == "invoice-42.pdf"
        ));
        assert!(matches!(
            &decision,
            GateDecision::RequiresApproval { reason, .. }
                if reason == "Projected spend 1100 exceeds hard-limited budget of 1000"
        ));

        let mut expense = draft();
        decision.apply(&mut expense, now()).unwrap();
        assert!(expense.is_over_budget);
        assert!(expense.requires_approval());
        assert!(!expense.is_approved());
    }
}
