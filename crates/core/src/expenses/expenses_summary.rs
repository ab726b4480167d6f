//! Monthly and daily spend summaries grouped by category.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::expenses_model::Expense;
use crate::budgets::Budget;
use crate::errors::{Error, Result};

/// Spend in one category over a summary period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category_id: i64,
    pub category_name: String,
    pub amount: Decimal,
    pub count: usize,
    /// Amount of the user's personal budget for this category and year
    pub budget_amount: Option<Decimal>,
    pub remaining_budget: Option<Decimal>,
    pub is_over_budget: bool,
}

impl CategoryBreakdown {
    pub fn new(category_id: i64, category_name: String, amount: Decimal, count: usize) -> Self {
        Self {
            category_id,
            category_name,
            amount,
            count,
            budget_amount: None,
            remaining_budget: None,
            is_over_budget: false,
        }
    }

    /// Compares the period's spend against `budget`. Without a budget the
    /// breakdown is left unconstrained.
    pub fn with_budget(mut self, budget: Option<&Budget>) -> Self {
        if let Some(budget) = budget {
            self.budget_amount = Some(budget.amount());
            self.remaining_budget = Some(budget.amount() - self.amount);
            self.is_over_budget = self.amount > budget.amount();
        }
        self
    }
}

/// Totals for a month, or for a single day when `date` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSummary {
    pub year: i32,
    pub month: u32,
    pub date: Option<NaiveDate>,
    pub total_amount: Decimal,
    pub transaction_count: usize,
    /// Largest spend first
    pub category_breakdown: Vec<CategoryBreakdown>,
    pub top_category: Option<String>,
    pub over_budget_categories: Vec<CategoryBreakdown>,
}

impl ExpenseSummary {
    pub fn new(
        year: i32,
        month: u32,
        date: Option<NaiveDate>,
        mut category_breakdown: Vec<CategoryBreakdown>,
    ) -> Result<Self> {
        category_breakdown.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then(a.category_id.cmp(&b.category_id))
        });

        let total_amount = checked_sum(category_breakdown.iter().map(|c| c.amount))?;
        let transaction_count = category_breakdown.iter().map(|c| c.count).sum();
        let top_category = category_breakdown
            .first()
            .map(|c| c.category_name.clone());
        let over_budget_categories = category_breakdown
            .iter()
            .filter(|c| c.is_over_budget)
            .cloned()
            .collect();

        Ok(Self {
            year,
            month,
            date,
            total_amount,
            transaction_count,
            category_breakdown,
            top_category,
            over_budget_categories,
        })
    }
}

/// Per-category `(amount, count)` totals, keyed by category id.
pub fn totals_by_category(expenses: &[Expense]) -> Result<BTreeMap<i64, (Decimal, usize)>> {
    let mut totals: BTreeMap<i64, (Decimal, usize)> = BTreeMap::new();
    for expense in expenses {
        let (amount, count) = totals.entry(expense.category_id).or_default();
        *amount = amount
            .checked_add(expense.amount)
            .ok_or_else(|| out_of_range(expense.category_id))?;
        *count += 1;
    }
    Ok(totals)
}

fn checked_sum(mut amounts: impl Iterator<Item = Decimal>) -> Result<Decimal> {
    amounts.try_fold(Decimal::ZERO, |acc, amount| {
        acc.checked_add(amount)
            .ok_or_else(|| Error::invalid_input("Summary total is out of range"))
    })
}

fn out_of_range(category_id: i64) -> Error {
    Error::invalid_input(format!(
        "Spend total for category {} is out of range",
        category_id
    ))
}
