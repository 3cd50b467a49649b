//! Aging service
//!
//! Computes bucket sets from the receivables read model and drives the
//! append-only snapshot store. The batch path is the one intentional
//! partial-failure mode in the system: per-customer errors are collected
//! and reported, never allowed to abort the rest of the batch.

use chrono::NaiveDate;
use tracing::{info, warn};

use core_kernel::{ActorId, Currency, CustomerId, TenantId};
use domain_aging::{
    compute_buckets, AgingSnapshot, BucketSet, GenerationMethod, SnapshotOutcome,
};
use infra_db::{AgingSnapshotRepository, DatabasePool, ReceivablesRepository};

use crate::error::ServiceError;

/// Aging computation and snapshot management
#[derive(Debug, Clone)]
pub struct AgingService {
    receivables: ReceivablesRepository,
    snapshots: AgingSnapshotRepository,
}

/// Per-customer results of a batch snapshot run
#[derive(Debug, Default)]
pub struct BatchSnapshotReport {
    pub created: Vec<CustomerId>,
    pub already_existed: Vec<CustomerId>,
    pub failed: Vec<(CustomerId, String)>,
}

impl BatchSnapshotReport {
    pub fn processed(&self) -> usize {
        self.created.len() + self.already_existed.len() + self.failed.len()
    }
}

impl AgingService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            receivables: ReceivablesRepository::new(pool.clone()),
            snapshots: AgingSnapshotRepository::new(pool),
        }
    }

    /// Buckets a customer's open invoices as of a reference date
    pub async fn compute_buckets(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
        currency: Currency,
        as_of: NaiveDate,
    ) -> Result<BucketSet, ServiceError> {
        let invoices = self
            .receivables
            .open_invoices(tenant_id, customer_id, as_of)
            .await?;
        Ok(compute_buckets(&invoices, as_of, currency)?)
    }

    /// Creates a snapshot for (customer, date), or returns the existing one
    pub async fn snapshot(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
        currency: Currency,
        as_of: NaiveDate,
        method: GenerationMethod,
        actor_id: ActorId,
    ) -> Result<SnapshotOutcome, ServiceError> {
        let buckets = self
            .compute_buckets(tenant_id, customer_id, currency, as_of)
            .await?;
        let snapshot =
            AgingSnapshot::new(customer_id, tenant_id, as_of, buckets, method, actor_id);

        let outcome = self.snapshots.insert_if_absent(snapshot).await?;
        info!(
            %tenant_id,
            %customer_id,
            snapshot_date = %as_of,
            created = outcome.was_created(),
            "aging snapshot requested"
        );
        Ok(outcome)
    }

    /// Snapshots every customer in the tenant, collecting failures
    pub async fn batch_snapshots(
        &self,
        tenant_id: TenantId,
        currency: Currency,
        as_of: NaiveDate,
        actor_id: ActorId,
    ) -> Result<BatchSnapshotReport, ServiceError> {
        let customer_ids = self.receivables.customer_ids(tenant_id).await?;
        let mut report = BatchSnapshotReport::default();

        for customer_id in customer_ids {
            match self
                .snapshot(
                    tenant_id,
                    customer_id,
                    currency,
                    as_of,
                    GenerationMethod::Scheduled,
                    actor_id,
                )
                .await
            {
                Ok(outcome) if outcome.was_created() => report.created.push(customer_id),
                Ok(_) => report.already_existed.push(customer_id),
                Err(error) => {
                    warn!(
                        %tenant_id,
                        %customer_id,
                        %error,
                        "aging snapshot failed, continuing batch"
                    );
                    report.failed.push((customer_id, error.to_string()));
                }
            }
        }

        info!(
            %tenant_id,
            created = report.created.len(),
            existing = report.already_existed.len(),
            failed = report.failed.len(),
            "aging snapshot batch complete"
        );
        Ok(report)
    }

    /// A customer's snapshot history, newest first, optionally bounded
    /// by an earliest snapshot date
    pub async fn history(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
        since: Option<NaiveDate>,
        limit: i64,
    ) -> Result<Vec<AgingSnapshot>, ServiceError> {
        Ok(self
            .snapshots
            .history(tenant_id, customer_id, since, limit)
            .await?)
    }
}
