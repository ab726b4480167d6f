//! Core error types for budgetwatch.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use chrono::ParseError as ChronoParseError;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::expenses::ApprovalRequired;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the budgeting domain.
///
/// Expected workflow outcomes such as "this expense needs approval evidence"
/// are normally returned as values by the approval gate. The
/// `ApprovalRequired` variant exists for callers that prefer to surface that
/// outcome through `?`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("{0}")]
    ApprovalRequired(ApprovalRequired),

    #[error("{entity} with id '{id}' was not found")]
    NotFound { entity: &'static str, id: String },

    #[error("User {user_id} is not allowed to {action} this {entity}")]
    Unauthorized {
        user_id: i64,
        entity: &'static str,
        action: &'static str,
    },

    #[error("A budget already exists for year {year} and category {}", display_category(.category_id))]
    BudgetAlreadyExists { year: i32, category_id: Option<i64> },

    #[error("Duplicate {0}")]
    Duplicate(String),

    #[error("Business rule violated: {0}")]
    BusinessRule(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

fn display_category(category_id: &Option<i64>) -> String {
    match category_id {
        Some(id) => id.to_string(),
        None => "overall".to_string(),
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint was violated.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for caller-supplied values.
///
/// These are always caller-fixable and are never retried.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("Amount {0} exceeds the supported maximum")]
    AmountTooLarge(Decimal),

    #[error("Year {0} is outside the supported range")]
    YearOutOfRange(i32),

    #[error("Invalid thresholds: {0}")]
    InvalidThresholds(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

impl Error {
    /// Shorthand for `Error::Validation(ValidationError::InvalidInput(..))`.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::Validation(ValidationError::InvalidInput(message.into()))
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Error::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<ApprovalRequired> for Error {
    fn from(err: ApprovalRequired) -> Self {
        Error::ApprovalRequired(err)
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
