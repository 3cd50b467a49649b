//! Credit service
//!
//! Wires the pure exposure engine to the receivables read model and the
//! credit-limit store. Evaluation never writes; limit lifecycle changes
//! go through the repository.

use chrono::NaiveDate;
use tracing::info;

use core_kernel::{ActorId, CreditLimitId, CustomerId, EffectiveWindow, Money, TenantId};
use domain_credit::{evaluate, CreditDecision, CreditLimit};
use infra_db::{CreditLimitRepository, DatabasePool, ReceivablesRepository};

use crate::error::ServiceError;

/// Credit decisions and limit administration
#[derive(Debug, Clone)]
pub struct CreditService {
    receivables: ReceivablesRepository,
    limits: CreditLimitRepository,
}

impl CreditService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            receivables: ReceivablesRepository::new(pool.clone()),
            limits: CreditLimitRepository::new(pool),
        }
    }

    /// Evaluates whether a proposed invoiced amount may be admitted
    pub async fn check_credit(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
        proposed: Money,
        as_of: NaiveDate,
    ) -> Result<CreditDecision, ServiceError> {
        let profile = self
            .receivables
            .credit_profile(tenant_id, customer_id, proposed.currency())
            .await?;
        let limits = self.limits.find_for_customer(tenant_id, customer_id).await?;

        let decision = evaluate(&profile, &limits, proposed, as_of)?;
        info!(
            %tenant_id,
            %customer_id,
            allowed = decision.allowed,
            reason = ?decision.reason,
            "credit evaluated"
        );
        Ok(decision)
    }

    /// Creates a pending limit awaiting approval
    pub async fn request_limit(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
        amount: Money,
        window: EffectiveWindow,
        reason: Option<String>,
    ) -> Result<CreditLimit, ServiceError> {
        let limit = CreditLimit::new_pending(customer_id, tenant_id, amount, window, reason)?;
        self.limits.insert(&limit).await?;
        Ok(limit)
    }

    /// Approves a pending limit, making its window effective
    pub async fn approve_limit(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
        limit_id: CreditLimitId,
        approver: ActorId,
    ) -> Result<CreditLimit, ServiceError> {
        let mut limit = self.find_limit(tenant_id, customer_id, limit_id).await?;
        limit.approve(approver)?;
        self.limits.update_status(&limit).await?;
        info!(%tenant_id, %customer_id, %limit_id, "credit limit approved");
        Ok(limit)
    }

    /// Revokes an approved limit; history is retained
    pub async fn revoke_limit(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
        limit_id: CreditLimitId,
        reason: impl Into<String>,
    ) -> Result<CreditLimit, ServiceError> {
        let mut limit = self.find_limit(tenant_id, customer_id, limit_id).await?;
        limit.revoke(reason)?;
        self.limits.update_status(&limit).await?;
        info!(%tenant_id, %customer_id, %limit_id, "credit limit revoked");
        Ok(limit)
    }

    /// A customer's full limit history
    pub async fn limit_history(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
    ) -> Result<Vec<CreditLimit>, ServiceError> {
        Ok(self.limits.find_for_customer(tenant_id, customer_id).await?)
    }

    async fn find_limit(
        &self,
        tenant_id: TenantId,
        customer_id: CustomerId,
        limit_id: CreditLimitId,
    ) -> Result<CreditLimit, ServiceError> {
        self.limits
            .find_for_customer(tenant_id, customer_id)
            .await?
            .into_iter()
            .find(|limit| limit.id == limit_id)
            .ok_or_else(|| ServiceError::NotFound(format!("credit limit {} not found", limit_id)))
    }
}
