//! Aging-snapshot repository
//!
//! The snapshot store is append-only. Idempotence per (tenant, customer,
//! date) is enforced by the unique key plus `ON CONFLICT DO NOTHING`:
//! a second request for the same date returns the existing row untouched.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{Currency, CustomerId, Money, SnapshotId, TenantId};
use domain_aging::{AgingSnapshot, BucketSet, GenerationMethod, SnapshotOutcome};

use crate::error::DatabaseError;

/// Repository for the append-only aging-snapshot store
#[derive(Debug, Clone)]
pub struct AgingSnapshotRepository {
    pool: PgPool,
}

impl AgingSnapshotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a snapshot unless one already exists for the same
    /// (tenant, customer, date)
    ///
    /// Returns which way it went; an existing snapshot is returned
    /// unchanged rather than recomputed.
    pub async fn insert_if_absent(
        &self,
        snapshot: AgingSnapshot,
    ) -> Result<SnapshotOutcome, DatabaseError> {
        let result = sqlx::query(
            r#"
            INSERT INTO aging_snapshots (
                id, customer_id, tenant_id, snapshot_date,
                bucket_current, bucket_1_30, bucket_31_60, bucket_61_90,
                bucket_90_plus, total_outstanding, invoice_count, currency,
                method, generated_by, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (tenant_id, customer_id, snapshot_date) DO NOTHING
            "#,
        )
        .bind(*snapshot.id.as_uuid())
        .bind(*snapshot.customer_id.as_uuid())
        .bind(*snapshot.tenant_id.as_uuid())
        .bind(snapshot.snapshot_date)
        .bind(snapshot.buckets.current.amount())
        .bind(snapshot.buckets.days_1_30.amount())
        .bind(snapshot.buckets.days_31_60.amount())
        .bind(snapshot.buckets.days_61_90.amount())
        .bind(snapshot.buckets.over_90.amount())
        .bind(snapshot.buckets.total_outstanding.amount())
        .bind(snapshot.buckets.invoice_count as i32)
        .bind(snapshot.buckets.total_outstanding.currency().code())
        .bind(snapshot.method.as_str())
        .bind(*snapshot.generated_by.as_uuid())
        .bind(snapshot.created_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(SnapshotOutcome::Created(snapshot));
        }

        let existing = self
            .find_by_date(
                snapshot.tenant_id,
                snapshot.customer_id,
                snapshot.snapshot_date,
            )
            .await?
            .ok_or_else(|| {
                DatabaseError::NotFound(format!(
                    "aging snapshot for customer {} on {} vanished after conflict",
                    snapshot.customer_id, snapshot.snapshot_date
                ))
            })?;
        Ok(SnapshotOutcome::AlreadyExists(existing))
    }

    /// The snapshot for one (customer, date), if present
    pub async fn find_by_date(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
        snapshot_date: NaiveDate,
    ) -> Result<Option<AgingSnapshot>, DatabaseError> {
        let row = sqlx::query_as::<_, AgingSnapshotRow>(
            r#"
            SELECT id, customer_id, tenant_id, snapshot_date,
                   bucket_current, bucket_1_30, bucket_31_60, bucket_61_90,
                   bucket_90_plus, total_outstanding, invoice_count, currency,
                   method, generated_by, created_at
            FROM aging_snapshots
            WHERE tenant_id = $1 AND customer_id = $2 AND snapshot_date = $3
            "#,
        )
        .bind(*tenant_id.as_uuid())
        .bind(*customer_id.as_uuid())
        .bind(snapshot_date)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AgingSnapshotRow::into_domain).transpose()
    }

    /// A customer's snapshot history, newest first, optionally bounded
    /// by an earliest snapshot date
    pub async fn history(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
        since: Option<NaiveDate>,
        limit: i64,
    ) -> Result<Vec<AgingSnapshot>, DatabaseError> {
        let rows = sqlx::query_as::<_, AgingSnapshotRow>(
            r#"
            SELECT id, customer_id, tenant_id, snapshot_date,
                   bucket_current, bucket_1_30, bucket_31_60, bucket_61_90,
                   bucket_90_plus, total_outstanding, invoice_count, currency,
                   method, generated_by, created_at
            FROM aging_snapshots
            WHERE tenant_id = $1 AND customer_id = $2
              AND ($3::date IS NULL OR snapshot_date >= $3)
            ORDER BY snapshot_date DESC
            LIMIT $4
            "#,
        )
        .bind(*tenant_id.as_uuid())
        .bind(*customer_id.as_uuid())
        .bind(since)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AgingSnapshotRow::into_domain).collect()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AgingSnapshotRow {
    id: Uuid,
    customer_id: Uuid,
    tenant_id: Uuid,
    snapshot_date: NaiveDate,
    bucket_current: Decimal,
    bucket_1_30: Decimal,
    bucket_31_60: Decimal,
    bucket_61_90: Decimal,
    bucket_90_plus: Decimal,
    total_outstanding: Decimal,
    invoice_count: i32,
    currency: String,
    method: String,
    generated_by: Uuid,
    created_at: DateTime<Utc>,
}

impl AgingSnapshotRow {
    fn into_domain(self) -> Result<AgingSnapshot, DatabaseError> {
        let currency = Currency::from_code(&self.currency).ok_or_else(|| {
            DatabaseError::SerializationError(format!(
                "unknown currency code '{}'",
                self.currency
            ))
        })?;
        let method = match self.method.as_str() {
            "on_demand" => GenerationMethod::OnDemand,
            "scheduled" => GenerationMethod::Scheduled,
            other => {
                return Err(DatabaseError::SerializationError(format!(
                    "unknown generation method '{}'",
                    other
                )))
            }
        };

        Ok(AgingSnapshot {
            id: SnapshotId::from(self.id),
            customer_id: self.customer_id.into(),
            tenant_id: self.tenant_id.into(),
            snapshot_date: self.snapshot_date,
            buckets: BucketSet {
                current: Money::new(self.bucket_current, currency),
                days_1_30: Money::new(self.bucket_1_30, currency),
                days_31_60: Money::new(self.bucket_31_60, currency),
                days_61_90: Money::new(self.bucket_61_90, currency),
                over_90: Money::new(self.bucket_90_plus, currency),
                total_outstanding: Money::new(self.total_outstanding, currency),
                invoice_count: self.invoice_count.max(0) as u32,
            },
            method,
            generated_by: self.generated_by.into(),
            created_at: self.created_at,
        })
    }
}
