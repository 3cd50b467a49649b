//! Credit limits: time-bounded authorizations with an approval lifecycle
//!
//! A limit is created `pending`, becomes effective on approval, and can be
//! revoked later. History is retained: revocation is a status change, not
//! a delete. At most one limit should be active per customer on any date;
//! overlaps are a data-integrity warning, never silently resolved away.

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{ActorId, CreditLimitId, CustomerId, EffectiveWindow, Money, TenantId};
use serde::{Deserialize, Serialize};

use crate::error::CreditError;

/// Lifecycle status of a credit limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitStatus {
    Pending,
    Approved,
    Revoked,
}

impl LimitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LimitStatus::Pending => "pending",
            LimitStatus::Approved => "approved",
            LimitStatus::Revoked => "revoked",
        }
    }
}

/// A time-bounded credit authorization for one customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditLimit {
    pub id: CreditLimitId,
    pub customer_id: CustomerId,
    pub tenant_id: TenantId,
    pub amount: Money,
    pub window: EffectiveWindow,
    pub status: LimitStatus,
    pub reason: Option<String>,
    /// Who approved the limit; set on approval
    pub approved_by: Option<ActorId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CreditLimit {
    /// Creates a pending limit with its requested effective window
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` when the limit amount is not positive.
    pub fn new_pending(
        customer_id: CustomerId,
        tenant_id: TenantId,
        amount: Money,
        window: EffectiveWindow,
        reason: Option<String>,
    ) -> Result<Self, CreditError> {
        if !amount.is_positive() {
            return Err(CreditError::InvalidAmount(format!(
                "limit amount must be positive, got {}",
                amount
            )));
        }
        let now = Utc::now();
        Ok(Self {
            id: CreditLimitId::new_v7(),
            customer_id,
            tenant_id,
            amount,
            window,
            status: LimitStatus::Pending,
            reason,
            approved_by: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Approves a pending limit, making its window effective
    pub fn approve(&mut self, approver: ActorId) -> Result<(), CreditError> {
        if self.status != LimitStatus::Pending {
            return Err(CreditError::InvalidTransition(format!(
                "cannot approve a {} limit",
                self.status.as_str()
            )));
        }
        self.status = LimitStatus::Approved;
        self.approved_by = Some(approver);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Revokes an approved limit; the record is kept for history
    pub fn revoke(&mut self, reason: impl Into<String>) -> Result<(), CreditError> {
        if self.status != LimitStatus::Approved {
            return Err(CreditError::InvalidTransition(format!(
                "cannot revoke a {} limit",
                self.status.as_str()
            )));
        }
        self.status = LimitStatus::Revoked;
        self.reason = Some(reason.into());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// True when the limit is approved and `date` falls in its window
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.status == LimitStatus::Approved && self.window.contains(date)
    }
}

/// Selects the limit active on `date` from a customer's limit history
///
/// Overlapping active limits are logged as a data-integrity warning and
/// the one with the latest effective-from wins, so the most recent
/// authorization governs until the data is corrected.
pub fn active_limit_on(limits: &[CreditLimit], date: NaiveDate) -> Option<&CreditLimit> {
    let mut active: Vec<&CreditLimit> = limits
        .iter()
        .filter(|limit| limit.is_active_on(date))
        .collect();

    if active.len() > 1 {
        tracing::warn!(
            customer_id = %active[0].customer_id,
            count = active.len(),
            %date,
            "multiple credit limits active on the same date"
        );
    }

    active.sort_by_key(|limit| limit.window.from);
    active.pop()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn usd(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, Currency::USD)
    }

    fn pending(amount: rust_decimal::Decimal, from: NaiveDate) -> CreditLimit {
        CreditLimit::new_pending(
            CustomerId::new(),
            TenantId::new(),
            usd(amount),
            EffectiveWindow::open_ended(from),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_lifecycle_pending_approved_revoked() {
        let mut limit = pending(dec!(1000.00), d(2026, 1, 1));
        assert_eq!(limit.status, LimitStatus::Pending);
        assert!(!limit.is_active_on(d(2026, 2, 1)));

        limit.approve(ActorId::new()).unwrap();
        assert_eq!(limit.status, LimitStatus::Approved);
        assert!(limit.approved_by.is_some());
        assert!(limit.is_active_on(d(2026, 2, 1)));

        limit.revoke("credit review").unwrap();
        assert_eq!(limit.status, LimitStatus::Revoked);
        assert!(!limit.is_active_on(d(2026, 2, 1)));
    }

    #[test]
    fn test_invalid_transitions_rejected() {
        let mut limit = pending(dec!(1000.00), d(2026, 1, 1));

        assert!(matches!(
            limit.revoke("not yet approved"),
            Err(CreditError::InvalidTransition(_))
        ));

        limit.approve(ActorId::new()).unwrap();
        assert!(matches!(
            limit.approve(ActorId::new()),
            Err(CreditError::InvalidTransition(_))
        ));
    }

    #[test]
    fn test_non_positive_limit_rejected() {
        let result = CreditLimit::new_pending(
            CustomerId::new(),
            TenantId::new(),
            Money::zero(Currency::USD),
            EffectiveWindow::open_ended(d(2026, 1, 1)),
            None,
        );
        assert!(matches!(result, Err(CreditError::InvalidAmount(_))));
    }

    #[test]
    fn test_active_limit_respects_window() {
        let mut limit = CreditLimit::new_pending(
            CustomerId::new(),
            TenantId::new(),
            usd(dec!(500.00)),
            EffectiveWindow::new(d(2026, 1, 1), Some(d(2026, 7, 1))).unwrap(),
            None,
        )
        .unwrap();
        limit.approve(ActorId::new()).unwrap();

        let limits = vec![limit];
        assert!(active_limit_on(&limits, d(2026, 3, 1)).is_some());
        assert!(active_limit_on(&limits, d(2026, 7, 1)).is_none());
        assert!(active_limit_on(&limits, d(2025, 12, 31)).is_none());
    }

    #[test]
    fn test_overlapping_limits_latest_from_wins() {
        let mut older = pending(dec!(500.00), d(2026, 1, 1));
        older.approve(ActorId::new()).unwrap();
        let mut newer = pending(dec!(2000.00), d(2026, 3, 1));
        newer.approve(ActorId::new()).unwrap();

        let limits = vec![older, newer];
        let active = active_limit_on(&limits, d(2026, 4, 1)).unwrap();
        assert_eq!(active.amount, usd(dec!(2000.00)));
    }
}
