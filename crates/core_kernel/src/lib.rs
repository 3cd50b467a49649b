//! Core Kernel - Foundational types for the ledger core
//!
//! This crate provides the building blocks shared by all domain modules:
//! - Money types with precise decimal arithmetic
//! - Strongly-typed entity identifiers
//! - Effective-window temporal types for time-bounded records

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod error;

pub use money::{Money, Currency, MoneyError, Rate};
pub use temporal::{EffectiveWindow, TemporalError, days_between};
pub use identifiers::{
    TenantId, ActorId, CustomerId, InvoiceId, PaymentId, AllocationId,
    ReversalId, JournalEntryId, TransactionGroupId, CreditLimitId, SnapshotId,
};
pub use error::CoreError;
