//! Expenses module - domain models, the approval gate, summaries, services, and traits.

mod approval_gate;
mod expenses_model;
mod expenses_service;
mod expenses_summary;
mod expenses_traits;
mod scope_lock;


pub use approval_gate::{decide, ApprovalRequired, GateDecision};
pub use expenses_model::{ApprovalState, Expense, ExpenseCreation, ExpenseUpdate, NewExpense};
pub use expenses_service::ExpenseService;
pub use expenses_summary::{CategoryBreakdown, ExpenseSummary};
pub use expenses_traits::{ExpenseRepositoryTrait, ExpenseServiceTrait};
pub use scope_lock::{ScopeGuard, ScopeLocks};
