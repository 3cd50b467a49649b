//! Receivables read model
//!
//! Read-only queries over customers, invoices, and credit notes. The
//! credit and aging engines are pure; this repository gathers their
//! inputs. Open means a positive remaining balance on a non-draft,
//! non-cancelled document.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use core_kernel::{Currency, CustomerId, Money, TenantId};
use domain_aging::OpenInvoice;
use domain_credit::{CustomerCreditProfile, CustomerStatus};

use crate::error::DatabaseError;

/// Read-only repository over the receivables tables
#[derive(Debug, Clone)]
pub struct ReceivablesRepository {
    pool: PgPool,
}

impl ReceivablesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds the credit profile the exposure engine evaluates
    pub async fn credit_profile(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
        currency: Currency,
    ) -> Result<CustomerCreditProfile, DatabaseError> {
        let status = self.customer_status(tenant_id, customer_id).await?;
        let invoices = self
            .open_invoice_total(tenant_id, customer_id, currency)
            .await?;
        let credit_notes = self
            .open_credit_note_total(tenant_id, customer_id, currency)
            .await?;

        Ok(CustomerCreditProfile {
            customer_id,
            tenant_id,
            status,
            open_invoice_total: invoices,
            open_credit_note_total: credit_notes,
        })
    }

    /// The customer's account standing
    pub async fn customer_status(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
    ) -> Result<CustomerStatus, DatabaseError> {
        let row = sqlx::query(
            r#"
            SELECT status FROM customers
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(*tenant_id.as_uuid())
        .bind(*customer_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Customer", customer_id))?;

        let status: String = row.try_get("status")?;
        match status.as_str() {
            "active" => Ok(CustomerStatus::Active),
            "inactive" => Ok(CustomerStatus::Inactive),
            "blocked" => Ok(CustomerStatus::Blocked),
            other => Err(DatabaseError::SerializationError(format!(
                "unknown customer status '{}'",
                other
            ))),
        }
    }

    /// Sum of open invoice balances in one currency
    pub async fn open_invoice_total(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
        currency: Currency,
    ) -> Result<Money, DatabaseError> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(balance), 0) AS total
            FROM invoices
            WHERE tenant_id = $1 AND customer_id = $2
              AND currency = $3
              AND status NOT IN ('draft', 'cancelled')
              AND balance > 0
            "#,
        )
        .bind(*tenant_id.as_uuid())
        .bind(*customer_id.as_uuid())
        .bind(currency.code())
        .fetch_one(&self.pool)
        .await?;

        let total: Decimal = row.try_get("total")?;
        Ok(Money::new(total, currency))
    }

    /// Sum of open credit-note balances in one currency
    pub async fn open_credit_note_total(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
        currency: Currency,
    ) -> Result<Money, DatabaseError> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(balance), 0) AS total
            FROM credit_notes
            WHERE tenant_id = $1 AND customer_id = $2
              AND currency = $3
              AND status NOT IN ('draft', 'cancelled')
              AND balance > 0
            "#,
        )
        .bind(*tenant_id.as_uuid())
        .bind(*customer_id.as_uuid())
        .bind(currency.code())
        .fetch_one(&self.pool)
        .await?;

        let total: Decimal = row.try_get("total")?;
        Ok(Money::new(total, currency))
    }

    /// Open invoices for aging, already filtered to the reference date
    ///
    /// Every open invoice is returned with its stored currency; the
    /// bucket computation rejects a mixed-currency set rather than this
    /// query silently dropping part of the customer's debt.
    pub async fn open_invoices(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
        as_of: NaiveDate,
    ) -> Result<Vec<OpenInvoice>, DatabaseError> {
        let rows = sqlx::query(
            r#"
            SELECT id, balance, currency, issued_on, due_on, status
            FROM invoices
            WHERE tenant_id = $1 AND customer_id = $2
              AND status NOT IN ('cancelled')
              AND balance > 0
              AND issued_on <= $3
            ORDER BY due_on
            "#,
        )
        .bind(*tenant_id.as_uuid())
        .bind(*customer_id.as_uuid())
        .bind(as_of)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let id: Uuid = row.try_get("id")?;
                let balance: Decimal = row.try_get("balance")?;
                let code: String = row.try_get("currency")?;
                let issued_on: NaiveDate = row.try_get("issued_on")?;
                let due_on: NaiveDate = row.try_get("due_on")?;
                let status: String = row.try_get("status")?;
                let currency = Currency::from_code(&code).ok_or_else(|| {
                    DatabaseError::SerializationError(format!(
                        "unknown currency code '{}'",
                        code
                    ))
                })?;
                Ok(OpenInvoice {
                    invoice_id: id.into(),
                    balance: Money::new(balance, currency),
                    issued_on,
                    due_on,
                    is_draft: status == "draft",
                })
            })
            .collect()
    }

    /// All customer ids in a tenant, for the batch snapshot path
    pub async fn customer_ids(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<CustomerId>, DatabaseError> {
        let rows = sqlx::query(
            r#"
            SELECT id FROM customers
            WHERE tenant_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(*tenant_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let id: Uuid = row.try_get("id")?;
                Ok(id.into())
            })
            .collect()
    }
}
