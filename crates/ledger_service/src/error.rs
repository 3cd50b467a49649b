//! Service-layer errors
//!
//! Domain errors pass through unchanged; storage failures collapse into
//! `PersistenceFailure`, which is safe to retry because every mutating
//! command is idempotency-keyed.

use domain_aging::AgingError;
use domain_credit::CreditError;
use domain_ledger::LedgerError;
use infra_db::DatabaseError;
use thiserror::Error;

/// Errors surfaced by the service layer
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Credit error: {0}")]
    Credit(#[from] CreditError),

    #[error("Aging error: {0}")]
    Aging(#[from] AgingError),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage unavailable or transaction aborted; retrying the whole
    /// operation is safe
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<DatabaseError> for ServiceError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound(message) => ServiceError::NotFound(message),
            DatabaseError::SerializationError(message) => ServiceError::Serialization(message),
            other => ServiceError::PersistenceFailure(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(error: serde_json::Error) -> Self {
        ServiceError::Serialization(error.to_string())
    }
}
