//! Credit-limit repository
//!
//! Stores the full limit history per customer. Status changes update in
//! place (the lifecycle lives on the row); limits are never deleted.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{CreditLimitId, Currency, CustomerId, EffectiveWindow, Money, TenantId};
use domain_credit::{active_limit_on, CreditLimit, LimitStatus};

use crate::error::DatabaseError;

/// Repository for the credit-limits store
#[derive(Debug, Clone)]
pub struct CreditLimitRepository {
    pool: PgPool,
}

impl CreditLimitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a limit record
    pub async fn insert(&self, limit: &CreditLimit) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO credit_limits (
                id, customer_id, tenant_id, amount, currency,
                effective_from, effective_to, status, reason, approved_by,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(*limit.id.as_uuid())
        .bind(*limit.customer_id.as_uuid())
        .bind(*limit.tenant_id.as_uuid())
        .bind(limit.amount.amount())
        .bind(limit.amount.currency().code())
        .bind(limit.window.from)
        .bind(limit.window.to)
        .bind(limit.status.as_str())
        .bind(&limit.reason)
        .bind(limit.approved_by.map(|id| *id.as_uuid()))
        .bind(limit.created_at)
        .bind(limit.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Persists a lifecycle change (approve/revoke) made on the domain type
    pub async fn update_status(&self, limit: &CreditLimit) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE credit_limits
            SET status = $3, reason = $4, approved_by = $5, updated_at = $6
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(*limit.tenant_id.as_uuid())
        .bind(*limit.id.as_uuid())
        .bind(limit.status.as_str())
        .bind(&limit.reason)
        .bind(limit.approved_by.map(|id| *id.as_uuid()))
        .bind(limit.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("CreditLimit", limit.id));
        }
        Ok(())
    }

    /// Full limit history for a customer, oldest first
    pub async fn find_for_customer(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
    ) -> Result<Vec<CreditLimit>, DatabaseError> {
        let rows = sqlx::query_as::<_, CreditLimitRow>(
            r#"
            SELECT id, customer_id, tenant_id, amount, currency,
                   effective_from, effective_to, status, reason, approved_by,
                   created_at, updated_at
            FROM credit_limits
            WHERE tenant_id = $1 AND customer_id = $2
            ORDER BY effective_from, created_at
            "#,
        )
        .bind(*tenant_id.as_uuid())
        .bind(*customer_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CreditLimitRow::into_domain).collect()
    }

    /// The limit active on `date`, if any
    ///
    /// Overlapping approved limits are logged by the domain selection
    /// rule; the latest effective-from wins.
    pub async fn find_active(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
        date: NaiveDate,
    ) -> Result<Option<CreditLimit>, DatabaseError> {
        let limits = self.find_for_customer(tenant_id, customer_id).await?;
        Ok(active_limit_on(&limits, date).cloned())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CreditLimitRow {
    id: Uuid,
    customer_id: Uuid,
    tenant_id: Uuid,
    amount: Decimal,
    currency: String,
    effective_from: NaiveDate,
    effective_to: Option<NaiveDate>,
    status: String,
    reason: Option<String>,
    approved_by: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CreditLimitRow {
    fn into_domain(self) -> Result<CreditLimit, DatabaseError> {
        let currency = Currency::from_code(&self.currency).ok_or_else(|| {
            DatabaseError::SerializationError(format!(
                "unknown currency code '{}'",
                self.currency
            ))
        })?;
        let status = match self.status.as_str() {
            "pending" => LimitStatus::Pending,
            "approved" => LimitStatus::Approved,
            "revoked" => LimitStatus::Revoked,
            other => {
                return Err(DatabaseError::SerializationError(format!(
                    "unknown limit status '{}'",
                    other
                )))
            }
        };
        let window = EffectiveWindow::new(self.effective_from, self.effective_to)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

        Ok(CreditLimit {
            id: CreditLimitId::from(self.id),
            customer_id: self.customer_id.into(),
            tenant_id: self.tenant_id.into(),
            amount: Money::new(self.amount, currency),
            window,
            status,
            reason: self.reason,
            approved_by: self.approved_by.map(Into::into),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
