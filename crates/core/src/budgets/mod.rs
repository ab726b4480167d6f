//! Budgets module - domain models, services, and traits.

mod budgets_model;
mod budgets_service;
mod budgets_traits;

#[cfg(test)]
mod budgets_model_tests;

pub use budgets_model::{
    Budget, BudgetPerformance, BudgetRecord, BudgetScope, BudgetStatus, BudgetUpdate, NewBudget,
};
pub use budgets_service::BudgetService;
pub use budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
