//! SQLite storage implementation for budgetwatch.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `budgetwatch-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for budgets, alerts, expenses, categories and
//!   notification preferences
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place where Diesel dependencies exist. The core
//! crate is database-agnostic and works with traits.
//!
//! ```text
//!          core (domain)
//!                │
//!                ▼
//!     storage-sqlite (this crate)
//!                │
//!                ▼
//!            SQLite DB
//! ```
//!
//! Reads go through the r2d2 pool. Writes are serialized through a single
//! writer task (see [`db::spawn_writer`]), each inside an immediate
//! transaction.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod alerts;
pub mod budgets;
pub mod categories;
pub mod expenses;
pub mod notifications;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

pub use alerts::AlertRepository;
pub use budgets::BudgetRepository;
pub use categories::CategoryRepository;
pub use expenses::ExpenseRepository;
pub use notifications::NotificationRepository;

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from budgetwatch-core for convenience
pub use budgetwatch_core::errors::{DatabaseError, Error, Result};
