//! Aging domain errors

use core_kernel::MoneyError;
use thiserror::Error;

/// Errors that can occur in the aging domain
#[derive(Debug, Error)]
pub enum AgingError {
    /// Invoices passed to bucketing disagree on currency
    #[error("Mixed currencies in aging computation: {0} and {1}")]
    MixedCurrencies(String, String),

    /// Money arithmetic error
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),
}
