//! Credit exposure evaluation
//!
//! The decision function is read-only: it takes the customer's open
//! balances and limit history as inputs and returns a decision. Denials
//! are data, not errors; only malformed inputs produce `Err`.

use chrono::NaiveDate;
use core_kernel::{CustomerId, Money, Rate, TenantId};
use serde::{Deserialize, Serialize};

use crate::error::CreditError;
use crate::limit::{active_limit_on, CreditLimit};

/// Account standing of a customer, supplied by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    Active,
    Inactive,
    Blocked,
}

/// Everything the exposure engine needs to know about one customer
///
/// Balance totals are gathered by the repository layer; the engine never
/// queries storage itself.
#[derive(Debug, Clone)]
pub struct CustomerCreditProfile {
    pub customer_id: CustomerId,
    pub tenant_id: TenantId,
    pub status: CustomerStatus,
    /// Sum of open invoice balances
    pub open_invoice_total: Money,
    /// Sum of open credit-note balances
    pub open_credit_note_total: Money,
}

impl CustomerCreditProfile {
    /// Current exposure: open invoices less open credit notes, floored
    /// at zero
    pub fn current_exposure(&self) -> Result<Money, CreditError> {
        Ok(self
            .open_invoice_total
            .saturating_sub(&self.open_credit_note_total)?)
    }
}

/// Reason code attached to every decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    CustomerBlocked,
    CustomerInactive,
    /// No active limit exists; credit is unlimited
    NoActiveLimit,
    WithinLimit,
    CreditLimitExceeded,
}

/// How much of the limit the proposed amount would consume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilizationBand {
    Healthy,
    Moderate,
    Warning,
    Critical,
}

impl UtilizationBand {
    /// Classifies a utilization rate into a reporting band
    pub fn from_rate(rate: Rate) -> Self {
        let pct = rate.as_percentage();
        if pct < rust_decimal_macros::dec!(50) {
            UtilizationBand::Healthy
        } else if pct < rust_decimal_macros::dec!(75) {
            UtilizationBand::Moderate
        } else if pct < rust_decimal_macros::dec!(90) {
            UtilizationBand::Warning
        } else {
            UtilizationBand::Critical
        }
    }
}

/// Diagnostic detail accompanying a decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "detail", rename_all = "snake_case")]
pub enum DecisionDetail {
    /// Denied on customer standing alone; no exposure was computed
    StatusDenied { status: CustomerStatus },
    /// No active limit; exposure reported for visibility
    Unlimited { exposure: Money, proposed: Money },
    /// Evaluated against an active limit
    Evaluated {
        exposure: Money,
        proposed: Money,
        limit: Money,
        /// Credit still available before the proposed amount
        available: Money,
        /// Amount by which the proposal overshoots; absent when allowed
        excess: Option<Money>,
        /// `(exposure + proposed) / limit`, as a percentage
        utilization: Rate,
        band: UtilizationBand,
    },
}

/// The outcome of a credit evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditDecision {
    pub allowed: bool,
    pub reason: DecisionReason,
    pub detail: DecisionDetail,
}

/// Evaluates whether `proposed` may be admitted for this customer
///
/// Order of checks:
///
/// 1. Blocked or inactive customers are denied outright.
/// 2. Exposure is open invoices minus open credit notes, floored at zero.
/// 3. No active limit means unlimited credit; the decision still reports
///    exposure.
/// 4. Otherwise deny iff `exposure + proposed > limit`. Equality is
///    allowed.
///
/// # Errors
///
/// `InvalidAmount` for a non-positive proposed amount; money errors for
/// currency mismatches between the profile totals and the limit.
pub fn evaluate(
    profile: &CustomerCreditProfile,
    limits: &[CreditLimit],
    proposed: Money,
    as_of: NaiveDate,
) -> Result<CreditDecision, CreditError> {
    if !proposed.is_positive() {
        return Err(CreditError::InvalidAmount(format!(
            "proposed amount must be positive, got {}",
            proposed
        )));
    }

    match profile.status {
        CustomerStatus::Blocked => {
            return Ok(CreditDecision {
                allowed: false,
                reason: DecisionReason::CustomerBlocked,
                detail: DecisionDetail::StatusDenied {
                    status: profile.status,
                },
            });
        }
        CustomerStatus::Inactive => {
            return Ok(CreditDecision {
                allowed: false,
                reason: DecisionReason::CustomerInactive,
                detail: DecisionDetail::StatusDenied {
                    status: profile.status,
                },
            });
        }
        CustomerStatus::Active => {}
    }

    let exposure = profile.current_exposure()?;

    let limit = match active_limit_on(limits, as_of) {
        Some(limit) => limit,
        None => {
            return Ok(CreditDecision {
                allowed: true,
                reason: DecisionReason::NoActiveLimit,
                detail: DecisionDetail::Unlimited { exposure, proposed },
            });
        }
    };

    let projected = exposure.checked_add(&proposed)?;
    let available = limit.amount.saturating_sub(&exposure)?;
    let utilization = Rate::ratio_of(&projected, &limit.amount)?;
    let band = UtilizationBand::from_rate(utilization);

    if projected.minor_units() > limit.amount.minor_units() {
        let excess = projected.checked_sub(&limit.amount)?;
        Ok(CreditDecision {
            allowed: false,
            reason: DecisionReason::CreditLimitExceeded,
            detail: DecisionDetail::Evaluated {
                exposure,
                proposed,
                limit: limit.amount,
                available,
                excess: Some(excess),
                utilization,
                band,
            },
        })
    } else {
        Ok(CreditDecision {
            allowed: true,
            reason: DecisionReason::WithinLimit,
            detail: DecisionDetail::Evaluated {
                exposure,
                proposed,
                limit: limit.amount,
                available,
                excess: None,
                utilization,
                band,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limit::LimitStatus;
    use core_kernel::{ActorId, CreditLimitId, Currency, EffectiveWindow};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn usd(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, Currency::USD)
    }

    fn profile(status: CustomerStatus, invoices: rust_decimal::Decimal) -> CustomerCreditProfile {
        CustomerCreditProfile {
            customer_id: CustomerId::new(),
            tenant_id: TenantId::new(),
            status,
            open_invoice_total: usd(invoices),
            open_credit_note_total: Money::zero(Currency::USD),
        }
    }

    fn approved_limit(amount: rust_decimal::Decimal) -> CreditLimit {
        let now = Utc::now();
        CreditLimit {
            id: CreditLimitId::new(),
            customer_id: CustomerId::new(),
            tenant_id: TenantId::new(),
            amount: usd(amount),
            window: EffectiveWindow::open_ended(d(2026, 1, 1)),
            status: LimitStatus::Approved,
            reason: None,
            approved_by: Some(ActorId::new()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_limit_exceeded_reports_excess() {
        let profile = profile(CustomerStatus::Active, dec!(800.00));
        let limits = vec![approved_limit(dec!(1000.00))];

        let decision = evaluate(&profile, &limits, usd(dec!(250.00)), d(2026, 3, 1)).unwrap();

        assert!(!decision.allowed);
        assert_eq!(decision.reason, DecisionReason::CreditLimitExceeded);
        match decision.detail {
            DecisionDetail::Evaluated {
                excess, available, ..
            } => {
                assert_eq!(excess, Some(usd(dec!(50.00))));
                assert_eq!(available, usd(dec!(200.00)));
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[test]
    fn test_equality_with_limit_is_allowed() {
        let profile = profile(CustomerStatus::Active, dec!(800.00));
        let limits = vec![approved_limit(dec!(1000.00))];

        let decision = evaluate(&profile, &limits, usd(dec!(200.00)), d(2026, 3, 1)).unwrap();

        assert!(decision.allowed);
        assert_eq!(decision.reason, DecisionReason::WithinLimit);
        match decision.detail {
            DecisionDetail::Evaluated {
                utilization, band, ..
            } => {
                assert_eq!(utilization.as_percentage(), dec!(100.00));
                assert_eq!(band, UtilizationBand::Critical);
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[test]
    fn test_blocked_customer_denied_without_exposure() {
        let profile = profile(CustomerStatus::Blocked, dec!(0.00));
        let limits = vec![approved_limit(dec!(1000.00))];

        let decision = evaluate(&profile, &limits, usd(dec!(10.00)), d(2026, 3, 1)).unwrap();

        assert!(!decision.allowed);
        assert_eq!(decision.reason, DecisionReason::CustomerBlocked);
        assert!(matches!(
            decision.detail,
            DecisionDetail::StatusDenied {
                status: CustomerStatus::Blocked
            }
        ));
    }

    #[test]
    fn test_inactive_customer_denied() {
        let profile = profile(CustomerStatus::Inactive, dec!(0.00));
        let decision = evaluate(&profile, &[], usd(dec!(10.00)), d(2026, 3, 1)).unwrap();

        assert!(!decision.allowed);
        assert_eq!(decision.reason, DecisionReason::CustomerInactive);
    }

    #[test]
    fn test_no_active_limit_allows_unconditionally() {
        let profile = profile(CustomerStatus::Active, dec!(1_000_000.00));
        let decision = evaluate(&profile, &[], usd(dec!(500.00)), d(2026, 3, 1)).unwrap();

        assert!(decision.allowed);
        assert_eq!(decision.reason, DecisionReason::NoActiveLimit);
        assert!(matches!(
            decision.detail,
            DecisionDetail::Unlimited { exposure, .. } if exposure == usd(dec!(1_000_000.00))
        ));
    }

    #[test]
    fn test_credit_notes_reduce_exposure_floored_at_zero() {
        let profile = CustomerCreditProfile {
            customer_id: CustomerId::new(),
            tenant_id: TenantId::new(),
            status: CustomerStatus::Active,
            open_invoice_total: usd(dec!(100.00)),
            open_credit_note_total: usd(dec!(400.00)),
        };
        let limits = vec![approved_limit(dec!(1000.00))];

        let decision = evaluate(&profile, &limits, usd(dec!(300.00)), d(2026, 3, 1)).unwrap();

        assert!(decision.allowed);
        match decision.detail {
            DecisionDetail::Evaluated { exposure, .. } => {
                assert!(exposure.is_zero());
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[test]
    fn test_zero_proposed_amount_rejected() {
        let profile = profile(CustomerStatus::Active, dec!(0.00));
        let result = evaluate(&profile, &[], Money::zero(Currency::USD), d(2026, 3, 1));
        assert!(matches!(result, Err(CreditError::InvalidAmount(_))));
    }

    #[test]
    fn test_utilization_bands() {
        assert_eq!(
            UtilizationBand::from_rate(Rate::from_percentage(dec!(10))),
            UtilizationBand::Healthy
        );
        assert_eq!(
            UtilizationBand::from_rate(Rate::from_percentage(dec!(50))),
            UtilizationBand::Moderate
        );
        assert_eq!(
            UtilizationBand::from_rate(Rate::from_percentage(dec!(80))),
            UtilizationBand::Warning
        );
        assert_eq!(
            UtilizationBand::from_rate(Rate::from_percentage(dec!(95))),
            UtilizationBand::Critical
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::limit::LimitStatus;
    use core_kernel::{ActorId, CreditLimitId, Currency, EffectiveWindow};
    use chrono::Utc;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    proptest! {
        /// Deny iff exposure + proposed strictly exceeds the limit
        #[test]
        fn decision_matches_threshold(
            exposure_minor in 0i64..10_000_000i64,
            proposed_minor in 1i64..10_000_000i64,
            limit_minor in 1i64..10_000_000i64,
        ) {
            let now = Utc::now();
            let profile = CustomerCreditProfile {
                customer_id: CustomerId::new(),
                tenant_id: TenantId::new(),
                status: CustomerStatus::Active,
                open_invoice_total: Money::from_minor(exposure_minor, Currency::USD),
                open_credit_note_total: Money::zero(Currency::USD),
            };
            let limits = vec![CreditLimit {
                id: CreditLimitId::new(),
                customer_id: profile.customer_id,
                tenant_id: profile.tenant_id,
                amount: Money::from_minor(limit_minor, Currency::USD),
                window: EffectiveWindow::open_ended(d(2026, 1, 1)),
                status: LimitStatus::Approved,
                reason: None,
                approved_by: Some(ActorId::new()),
                created_at: now,
                updated_at: now,
            }];

            let decision = evaluate(
                &profile,
                &limits,
                Money::from_minor(proposed_minor, Currency::USD),
                d(2026, 6, 1),
            ).unwrap();

            let should_deny = exposure_minor + proposed_minor > limit_minor;
            prop_assert_eq!(decision.allowed, !should_deny);
        }
    }
}
