//! Immutable aging snapshots
//!
//! A snapshot freezes one customer's bucket set on one date. Snapshots
//! are append-only: at most one per (customer, tenant, date), never
//! overwritten, superseded only by a later date. The insert-if-absent
//! behavior is enforced by the storage layer; this module models the
//! record and the outcome of a snapshot request.

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{ActorId, CustomerId, SnapshotId, TenantId};
use serde::{Deserialize, Serialize};

use crate::bucket::BucketSet;

/// How a snapshot came to be generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMethod {
    OnDemand,
    Scheduled,
}

impl GenerationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMethod::OnDemand => "on_demand",
            GenerationMethod::Scheduled => "scheduled",
        }
    }
}

/// A point-in-time aging classification for one customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgingSnapshot {
    pub id: SnapshotId,
    pub customer_id: CustomerId,
    pub tenant_id: TenantId,
    pub snapshot_date: NaiveDate,
    pub buckets: BucketSet,
    pub method: GenerationMethod,
    pub generated_by: ActorId,
    pub created_at: DateTime<Utc>,
}

impl AgingSnapshot {
    pub fn new(
        customer_id: CustomerId,
        tenant_id: TenantId,
        snapshot_date: NaiveDate,
        buckets: BucketSet,
        method: GenerationMethod,
        generated_by: ActorId,
    ) -> Self {
        Self {
            id: SnapshotId::new_v7(),
            customer_id,
            tenant_id,
            snapshot_date,
            buckets,
            method,
            generated_by,
            created_at: Utc::now(),
        }
    }
}

/// The outcome of a snapshot request
///
/// Requesting a snapshot for a (customer, date) that already has one is
/// not an error: the existing snapshot is returned unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotOutcome {
    Created(AgingSnapshot),
    AlreadyExists(AgingSnapshot),
}

impl SnapshotOutcome {
    /// The snapshot, whichever way it was obtained
    pub fn snapshot(&self) -> &AgingSnapshot {
        match self {
            SnapshotOutcome::Created(s) | SnapshotOutcome::AlreadyExists(s) => s,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, SnapshotOutcome::Created(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;

    #[test]
    fn test_outcome_exposes_snapshot_either_way() {
        let snapshot = AgingSnapshot::new(
            CustomerId::new(),
            TenantId::new(),
            NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
            BucketSet::zero(Currency::USD),
            GenerationMethod::OnDemand,
            ActorId::new(),
        );

        let created = SnapshotOutcome::Created(snapshot.clone());
        assert!(created.was_created());
        assert_eq!(created.snapshot().id, snapshot.id);

        let existing = SnapshotOutcome::AlreadyExists(snapshot.clone());
        assert!(!existing.was_created());
        assert_eq!(existing.snapshot().id, snapshot.id);
    }
}
