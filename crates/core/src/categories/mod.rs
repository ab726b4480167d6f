//! Categories module - the read-only view the expense flow needs.

mod categories_model;
mod categories_traits;

pub use categories_model::{Category, NewCategory};
pub use categories_traits::CategoryRepositoryTrait;
