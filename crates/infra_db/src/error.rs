//! Database error types
//!
//! This module defines the error types that can occur during database
//! operations, providing meaningful error messages and proper error
//! chaining.

use thiserror::Error;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Entity not found in database
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Transaction error
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Migration error
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A stored value could not be mapped back into a domain type
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Generic SQL error
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Creates a not found error for a specific entity type and identifier
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(format!("{} with id '{}' not found", entity, id))
    }

    /// Checks if this error indicates a record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }

    /// Checks if this error is a unique-constraint violation
    pub fn is_duplicate(&self) -> bool {
        matches!(self, DatabaseError::DuplicateEntry(_))
    }

    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted
        )
    }
}

/// Maps SQLx errors onto specific variants by PostgreSQL error code
///
/// https://www.postgresql.org/docs/current/errcodes-appendix.html
impl From<&sqlx::Error> for DatabaseError {
    fn from(error: &sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::Database(db_err) => {
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        "23505" => DatabaseError::DuplicateEntry(db_err.message().to_string()),
                        "23503" => {
                            DatabaseError::ForeignKeyViolation(db_err.message().to_string())
                        }
                        "23514" => {
                            DatabaseError::ConstraintViolation(db_err.message().to_string())
                        }
                        _ => DatabaseError::QueryFailed(db_err.message().to_string()),
                    }
                } else {
                    DatabaseError::QueryFailed(db_err.message().to_string())
                }
            }
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}

/// True when a raw sqlx error is a unique-constraint violation
///
/// Used on the command-audit insert, where a concurrent writer holding
/// the same idempotency key is the expected race, not a failure.
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
        }
        _ => false,
    }
}
