//! Journal repository
//!
//! Persists balanced transaction groups as immutable journal-entry rows
//! and answers the read queries the orchestrator and reconciliation
//! reports need. All writes for one group happen inside one transaction;
//! concurrent readers never observe a half-committed group.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use core_kernel::{Currency, Money, PaymentId, TenantId, TransactionGroupId};
use domain_ledger::{EntryKind, JournalEntry, TransactionGroup};

use crate::error::DatabaseError;

/// Repository for the append-only journal store
#[derive(Debug, Clone)]
pub struct JournalRepository {
    pool: PgPool,
}

/// Net movement on one account: debits minus credits
#[derive(Debug, Clone, PartialEq)]
pub struct AccountMovement {
    pub account_code: String,
    pub net: Money,
    pub total_debits: Money,
    pub total_credits: Money,
}

/// Per-account totals across every group posted for one payment
///
/// `balanced` holds by construction for groups written through this
/// repository; a false value means the journal was written by something
/// else and needs investigation.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentLedgerSummary {
    pub payment_id: PaymentId,
    pub accounts: Vec<AccountMovement>,
    pub total_debits: Money,
    pub total_credits: Money,
    pub balanced: bool,
}

impl JournalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Commits a balanced group in its own transaction
    pub async fn commit_group(
        &self,
        group: TransactionGroup,
    ) -> Result<Vec<JournalEntry>, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let entries = Self::commit_group_in(&mut tx, group).await?;
        tx.commit().await?;
        Ok(entries)
    }

    /// Writes a group's entries inside a caller-owned transaction
    ///
    /// Used by the command log so the audit row and the ledger effect
    /// commit or roll back as one unit.
    pub async fn commit_group_in(
        tx: &mut Transaction<'static, Postgres>,
        group: TransactionGroup,
    ) -> Result<Vec<JournalEntry>, DatabaseError> {
        let entries = group.into_entries();
        for entry in &entries {
            sqlx::query(
                r#"
                INSERT INTO journal_entries (
                    id, group_id, tenant_id, customer_id, kind, account_code,
                    debit, credit, currency, description, reference,
                    transaction_date, metadata, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                "#,
            )
            .bind(*entry.id.as_uuid())
            .bind(*entry.group_id.as_uuid())
            .bind(*entry.tenant_id.as_uuid())
            .bind(entry.customer_id.map(|id| *id.as_uuid()))
            .bind(entry.kind.as_str())
            .bind(&entry.account_code)
            .bind(entry.debit.amount())
            .bind(entry.credit.amount())
            .bind(entry.debit.currency().code())
            .bind(&entry.description)
            .bind(&entry.reference)
            .bind(entry.transaction_date)
            .bind(&entry.metadata)
            .bind(entry.created_at)
            .execute(&mut **tx)
            .await?;
        }
        Ok(entries)
    }

    /// All entries of one transaction group, in insertion order
    pub async fn entries_for_group(
        &self,
        tenant_id: TenantId,
        group_id: TransactionGroupId,
    ) -> Result<Vec<JournalEntry>, DatabaseError> {
        let rows = sqlx::query_as::<_, JournalEntryRow>(
            r#"
            SELECT id, group_id, tenant_id, customer_id, kind, account_code,
                   debit, credit, currency, description, reference,
                   transaction_date, metadata, created_at
            FROM journal_entries
            WHERE tenant_id = $1 AND group_id = $2
            ORDER BY created_at, id
            "#,
        )
        .bind(*tenant_id.as_uuid())
        .bind(*group_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(JournalEntryRow::into_domain).collect()
    }

    /// All entries carrying a business reference, newest first
    pub async fn entries_for_reference(
        &self,
        tenant_id: TenantId,
        reference: &str,
    ) -> Result<Vec<JournalEntry>, DatabaseError> {
        let rows = sqlx::query_as::<_, JournalEntryRow>(
            r#"
            SELECT id, group_id, tenant_id, customer_id, kind, account_code,
                   debit, credit, currency, description, reference,
                   transaction_date, metadata, created_at
            FROM journal_entries
            WHERE tenant_id = $1 AND reference = $2
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(*tenant_id.as_uuid())
        .bind(reference)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(JournalEntryRow::into_domain).collect()
    }

    /// The amount the originating payment-created group recorded
    ///
    /// Reversals are bounded by this figure. Returns `None` when no
    /// payment group exists for the id.
    pub async fn recorded_payment_amount(
        &self,
        tenant_id: TenantId,
        payment_id: PaymentId,
    ) -> Result<Option<Money>, DatabaseError> {
        let row = sqlx::query(
            r#"
            SELECT currency, SUM(debit) AS total
            FROM journal_entries
            WHERE tenant_id = $1
              AND kind = 'payment'
              AND metadata ->> 'payment_id' = $2
            GROUP BY currency
            "#,
        )
        .bind(*tenant_id.as_uuid())
        .bind(payment_id.as_uuid().to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            let code: String = row.try_get("currency")?;
            let total: Decimal = row.try_get("total")?;
            let currency = parse_currency(&code)?;
            Ok(Money::new(total, currency))
        })
        .transpose()
    }

    /// Net movement per account over a date range, for reconciliation
    pub async fn account_movements(
        &self,
        tenant_id: TenantId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AccountMovement>, DatabaseError> {
        let rows = sqlx::query(
            r#"
            SELECT account_code, currency,
                   SUM(debit) AS debits, SUM(credit) AS credits
            FROM journal_entries
            WHERE tenant_id = $1
              AND transaction_date >= $2
              AND transaction_date <= $3
            GROUP BY account_code, currency
            ORDER BY account_code
            "#,
        )
        .bind(*tenant_id.as_uuid())
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let account_code: String = row.try_get("account_code")?;
                let code: String = row.try_get("currency")?;
                let debits: Decimal = row.try_get("debits")?;
                let credits: Decimal = row.try_get("credits")?;
                let currency = parse_currency(&code)?;
                Ok(AccountMovement {
                    account_code,
                    net: Money::new(debits - credits, currency),
                    total_debits: Money::new(debits, currency),
                    total_credits: Money::new(credits, currency),
                })
            })
            .collect()
    }

    /// Reconciliation totals across all of one payment's groups
    ///
    /// Returns `None` when the payment has no journal entries.
    pub async fn payment_ledger_summary(
        &self,
        tenant_id: TenantId,
        payment_id: PaymentId,
    ) -> Result<Option<PaymentLedgerSummary>, DatabaseError> {
        let rows = sqlx::query(
            r#"
            SELECT account_code, currency,
                   SUM(debit) AS debits, SUM(credit) AS credits
            FROM journal_entries
            WHERE tenant_id = $1
              AND metadata ->> 'payment_id' = $2
            GROUP BY account_code, currency
            ORDER BY account_code
            "#,
        )
        .bind(*tenant_id.as_uuid())
        .bind(payment_id.as_uuid().to_string())
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(None);
        }

        let mut accounts = Vec::with_capacity(rows.len());
        let mut currency = None;
        let mut debit_sum = Decimal::ZERO;
        let mut credit_sum = Decimal::ZERO;
        for row in rows {
            let account_code: String = row.try_get("account_code")?;
            let code: String = row.try_get("currency")?;
            let debits: Decimal = row.try_get("debits")?;
            let credits: Decimal = row.try_get("credits")?;
            let parsed = parse_currency(&code)?;
            currency.get_or_insert(parsed);
            debit_sum += debits;
            credit_sum += credits;
            accounts.push(AccountMovement {
                account_code,
                net: Money::new(debits - credits, parsed),
                total_debits: Money::new(debits, parsed),
                total_credits: Money::new(credits, parsed),
            });
        }
        let currency = currency.ok_or_else(|| {
            DatabaseError::SerializationError("payment summary without currency".to_string())
        })?;

        let total_debits = Money::new(debit_sum, currency);
        let total_credits = Money::new(credit_sum, currency);
        let balanced = total_debits.minor_units() == total_credits.minor_units();

        Ok(Some(PaymentLedgerSummary {
            payment_id,
            accounts,
            total_debits,
            total_credits,
            balanced,
        }))
    }
}

fn parse_currency(code: &str) -> Result<Currency, DatabaseError> {
    Currency::from_code(code).ok_or_else(|| {
        DatabaseError::SerializationError(format!("unknown currency code '{}'", code))
    })
}

#[derive(Debug, sqlx::FromRow)]
struct JournalEntryRow {
    id: Uuid,
    group_id: Uuid,
    tenant_id: Uuid,
    customer_id: Option<Uuid>,
    kind: String,
    account_code: String,
    debit: Decimal,
    credit: Decimal,
    currency: String,
    description: String,
    reference: String,
    transaction_date: NaiveDate,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl JournalEntryRow {
    fn into_domain(self) -> Result<JournalEntry, DatabaseError> {
        let currency = parse_currency(&self.currency)?;
        let kind = EntryKind::from_label(&self.kind).ok_or_else(|| {
            DatabaseError::SerializationError(format!("unknown entry kind '{}'", self.kind))
        })?;
        Ok(JournalEntry {
            id: self.id.into(),
            group_id: self.group_id.into(),
            tenant_id: self.tenant_id.into(),
            customer_id: self.customer_id.map(Into::into),
            kind,
            account_code: self.account_code,
            debit: Money::new(self.debit, currency),
            credit: Money::new(self.credit, currency),
            description: self.description,
            reference: self.reference,
            transaction_date: self.transaction_date,
            metadata: self.metadata,
            created_at: self.created_at,
        })
    }
}
