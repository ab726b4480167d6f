//! Budget alerts module - alert records, history and read-state management.

mod alerts_model;
mod alerts_service;
mod alerts_traits;

pub use alerts_model::BudgetAlert;
pub use alerts_service::AlertService;
pub use alerts_traits::{AlertRepositoryTrait, AlertServiceTrait};
