//! Ledger Domain - Double-Entry Posting for Payment Reconciliation
//!
//! This crate turns payment-lifecycle events into balanced double-entry
//! journal transaction groups:
//!
//! - Every group balances: the sum of debit legs equals the sum of credit
//!   legs to the currency's minor unit.
//! - Journal entries are immutable once committed; corrections are made by
//!   posting an equal-and-opposite group, never by mutation.
//! - Account codes come from a per-tenant chart of accounts; nothing in the
//!   posting logic hard-codes an account.
//!
//! The crate is pure: it validates events and builds [`TransactionGroup`]s.
//! Persistence (atomic commit of a group) lives in the infrastructure layer.

pub mod transaction;
pub mod accounts;
pub mod events;
pub mod posting;
pub mod error;

pub use transaction::{EntryKind, JournalEntry, JournalLegInput, LegSide, TransactionGroup};
pub use accounts::{ChartOfAccounts, PaymentMethod, ResolvedAccounts};
pub use events::{PaymentEvent, ReversalMethod};
pub use posting::{build_group, validate_reversal_bounds};
pub use error::LedgerError;
