//! Payment posting service
//!
//! The orchestrator for payment lifecycle events. Validation happens
//! before any transaction opens; the ledger write and the command-audit
//! row then commit as one atomic unit through the command log.

use serde::{Deserialize, Serialize};
use tracing::info;

use core_kernel::{ActorId, Money, TenantId, TransactionGroupId};
use domain_ledger::{build_group, validate_reversal_bounds, JournalEntry, PaymentEvent};
use infra_db::{
    AccountMovement, CommandLog, DatabaseError, DatabasePool, JournalRepository,
    PaymentLedgerSummary,
};

use crate::config::TenantCharts;
use crate::error::ServiceError;

/// Applies payment events to the ledger, idempotently
#[derive(Debug, Clone)]
pub struct PaymentLedgerService {
    journal: JournalRepository,
    command_log: CommandLog,
    charts: TenantCharts,
}

/// The outcome of posting one payment event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentPostingResult {
    pub group_id: TransactionGroupId,
    pub reference: String,
    pub entries: Vec<JournalEntry>,
    /// True when this result was replayed from the command log rather
    /// than executed
    #[serde(skip)]
    pub duplicate: bool,
}

impl PaymentLedgerService {
    pub fn new(pool: DatabasePool, charts: TenantCharts) -> Self {
        Self {
            journal: JournalRepository::new(pool.clone()),
            command_log: CommandLog::new(pool),
            charts,
        }
    }

    /// Posts the balanced transaction group for one payment event
    ///
    /// Reversals and allocation reversals are bounded by the amount the
    /// originating payment recorded; the lookup happens before the
    /// transaction opens, so a rejected event writes nothing.
    ///
    /// Replaying the same (tenant, idempotency key) returns the first
    /// call's result with `duplicate` set, without touching the ledger.
    pub async fn apply(
        &self,
        tenant_id: TenantId,
        actor_id: ActorId,
        idempotency_key: &str,
        event: PaymentEvent,
    ) -> Result<PaymentPostingResult, ServiceError> {
        if let PaymentEvent::PaymentReversed {
            payment_id, amount, ..
        }
        | PaymentEvent::AllocationReversed {
            payment_id, amount, ..
        } = &event
        {
            let recorded = self
                .journal
                .recorded_payment_amount(tenant_id, *payment_id)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!(
                        "no originating payment group recorded for {}",
                        payment_id
                    ))
                })?;
            validate_reversal_bounds(*amount, recorded)?;
        }

        let group = build_group(tenant_id, self.charts.chart_for(tenant_id), &event)?;
        let group_id = group.id;
        let reference = group.reference.clone();
        let command_name = format!("ledger.{}", event.entry_kind().as_str());
        let params = serde_json::to_value(&event)?;

        let outcome = self
            .command_log
            .try_execute(
                tenant_id,
                idempotency_key,
                actor_id,
                &command_name,
                params,
                move |tx| {
                    Box::pin(async move {
                        let entries = JournalRepository::commit_group_in(tx, group).await?;
                        let result = PaymentPostingResult {
                            group_id,
                            reference,
                            entries,
                            duplicate: false,
                        };
                        serde_json::to_value(&result)
                            .map_err(|e| DatabaseError::SerializationError(e.to_string()))
                    })
                },
            )
            .await?;

        let duplicate = outcome.was_duplicate();
        let mut result: PaymentPostingResult =
            serde_json::from_value(outcome.result().clone())?;
        result.duplicate = duplicate;

        info!(
            %tenant_id,
            group_id = %result.group_id,
            reference = %result.reference,
            duplicate,
            "payment event posted"
        );
        Ok(result)
    }

    /// The amount recorded by a payment's originating group, if any
    pub async fn recorded_payment_amount(
        &self,
        tenant_id: TenantId,
        payment_id: core_kernel::PaymentId,
    ) -> Result<Option<Money>, ServiceError> {
        Ok(self
            .journal
            .recorded_payment_amount(tenant_id, payment_id)
            .await?)
    }

    /// Journal entries carrying one business reference
    pub async fn entries_for_reference(
        &self,
        tenant_id: TenantId,
        reference: &str,
    ) -> Result<Vec<JournalEntry>, ServiceError> {
        Ok(self.journal.entries_for_reference(tenant_id, reference).await?)
    }

    /// Net movement per account over a date range, for reconciliation
    pub async fn account_movements(
        &self,
        tenant_id: TenantId,
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    ) -> Result<Vec<AccountMovement>, ServiceError> {
        Ok(self.journal.account_movements(tenant_id, from, to).await?)
    }

    /// Per-account totals and balance check across one payment's groups
    pub async fn payment_ledger_summary(
        &self,
        tenant_id: TenantId,
        payment_id: core_kernel::PaymentId,
    ) -> Result<Option<PaymentLedgerSummary>, ServiceError> {
        Ok(self
            .journal
            .payment_ledger_summary(tenant_id, payment_id)
            .await?)
    }
}
