//! Error types for sqlbind

use std::sync::Arc;

use thiserror::Error;

/// Result type alias for sqlbind operations
pub type BindResult<T> = Result<T, BindError>;

/// Error type for binding construction and query execution.
///
/// The error is cheaply cloneable so that builders and [`crate::Clause`]
/// values can carry a deferred construction error and surface it again at
/// render or execution time.
#[derive(Debug, Clone, Error)]
pub enum BindError {
    /// Two fields of the same struct bind the same column name
    #[error("duplicate column '{0}' in bindings")]
    DuplicateColumn(String),

    /// A filter struct declared no bindable columns at all
    #[error("no bindable columns detected")]
    NoColumns,

    /// A strict single-row fetch matched more than one row
    #[error("too many rows: expected {expected}, actual {actual}")]
    TooManyRows { expected: usize, actual: usize },

    /// Row not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Row decode/mapping error
    #[error("decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Builder misuse detected before execution
    #[error("validation error: {0}")]
    Validation(String),

    /// Unique constraint violation
    #[error("unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("check constraint violation: {0}")]
    CheckViolation(String),

    /// Query execution error from the driver
    #[error("query error: {0}")]
    Query(Arc<tokio_postgres::Error>),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("pool error: {0}")]
    Pool(String),
}

impl BindError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a too-many-rows error
    pub fn too_many_rows(expected: usize, actual: usize) -> Self {
        Self::TooManyRows { expected, actual }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a duplicate column error
    pub fn is_duplicate_column(&self) -> bool {
        matches!(self, Self::DuplicateColumn(_))
    }

    /// Check if this is a no-columns error
    pub fn is_no_columns(&self) -> bool {
        matches!(self, Self::NoColumns)
    }

    /// Check if this is a too-many-rows error
    pub fn is_too_many_rows(&self) -> bool {
        matches!(self, Self::TooManyRows { .. })
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Parse a tokio_postgres error into a more specific BindError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                "23514" => return Self::CheckViolation(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Query(Arc::new(err))
    }
}

impl From<tokio_postgres::Error> for BindError {
    fn from(err: tokio_postgres::Error) -> Self {
        Self::Query(Arc::new(err))
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for BindError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
