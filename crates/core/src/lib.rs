//! Budgetwatch Core - Domain entities, services, and traits.
//!
//! This crate holds the budget threshold evaluation, alert deduplication and
//! expense approval rules. It is database-agnostic and defines traits that
//! are implemented by the `storage-sqlite` crate.

pub mod alerts;
pub mod budget_check;
pub mod budgets;
pub mod categories;
pub mod constants;
pub mod errors;
pub mod events;
pub mod expenses;
pub mod notifications;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
