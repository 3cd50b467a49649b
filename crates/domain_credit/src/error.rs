//! Credit domain errors
//!
//! Denied decisions are not errors; they are valid negative outcomes
//! carried in [`crate::exposure::CreditDecision`]. Errors here are
//! malformed inputs and invalid lifecycle transitions.

use core_kernel::{MoneyError, TemporalError};
use thiserror::Error;

/// Errors that can occur in the credit domain
#[derive(Debug, Error)]
pub enum CreditError {
    /// Proposed or limit amount is zero or negative
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Lifecycle transition not permitted from the current status
    #[error("Invalid limit transition: {0}")]
    InvalidTransition(String),

    /// Money arithmetic error
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    /// Effective window error
    #[error("Temporal error: {0}")]
    Temporal(#[from] TemporalError),
}
