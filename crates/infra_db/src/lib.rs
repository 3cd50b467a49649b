//! Infrastructure Database Layer
//!
//! SQLx/PostgreSQL persistence for the ledger core. The crate follows the
//! repository pattern: domain crates stay storage-free, and every query
//! here is scoped by tenant id - no cross-tenant read or write is ever
//! valid.
//!
//! Queries use runtime binding rather than compile-time checked macros so
//! the workspace builds without a live database.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{DatabaseConfig, create_pool, JournalRepository};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/ledger")).await?;
//! let journal = JournalRepository::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod command_log;

pub use pool::{create_pool, create_pool_from_url, run_migrations, DatabaseConfig, DatabasePool};
pub use error::DatabaseError;
pub use repositories::aging::AgingSnapshotRepository;
pub use repositories::credit::CreditLimitRepository;
pub use repositories::journal::{AccountMovement, JournalRepository, PaymentLedgerSummary};
pub use repositories::receivables::ReceivablesRepository;
pub use command_log::{CommandLog, CommandOutcome};
