//! Ledger domain errors

use core_kernel::MoneyError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur in the ledger domain
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A transaction group with no legs
    #[error("Transaction group has no legs")]
    EmptyTransaction,

    /// Transaction group is not balanced
    #[error("Unbalanced transaction: debits={debits}, credits={credits}")]
    UnbalancedTransaction {
        debits: Decimal,
        credits: Decimal,
    },

    /// Legs within one group must share a currency
    #[error("Mixed currencies in transaction group: {0} and {1}")]
    MixedCurrencies(String, String),

    /// A leg carries both or neither of debit/credit, or a negative amount
    #[error("Invalid leg: {0}")]
    InvalidLeg(String),

    /// Event amount must be strictly positive
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Reversal exceeds what the originating payment recorded
    #[error("Reversal amount {requested} exceeds recorded payment amount {recorded}")]
    ReversalExceedsRecorded {
        requested: Decimal,
        recorded: Decimal,
    },

    /// Money arithmetic error
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),
}
