//! SQLite storage implementation for budget alerts.

mod model;
mod repository;

pub use model::BudgetAlertDB;
pub use repository::AlertRepository;
