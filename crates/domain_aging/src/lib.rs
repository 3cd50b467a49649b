//! Aging Domain - Receivables Aging Buckets and Snapshots
//!
//! Classifies open invoice balances into time-since-due buckets as of a
//! reference date and models the immutable snapshots persisted for trend
//! analysis. Bucketing is pure; persistence and its insert-if-absent
//! idempotence live in the infrastructure layer.

pub mod bucket;
pub mod snapshot;
pub mod error;

pub use bucket::{classify, compute_buckets, AgingBucket, BucketSet, OpenInvoice};
pub use snapshot::{AgingSnapshot, GenerationMethod, SnapshotOutcome};
pub use error::AgingError;
