//! Credit Domain - Limits and Exposure Decisions
//!
//! Credit limits are time-bounded authorizations with a pending/approved/
//! revoked lifecycle. The exposure engine is a pure decision function: it
//! reads a customer's open balances and the active limit and returns an
//! admit/deny decision with diagnostic detail. Nothing in this crate
//! mutates exposure or limit state during evaluation.

pub mod limit;
pub mod exposure;
pub mod error;

pub use limit::{active_limit_on, CreditLimit, LimitStatus};
pub use exposure::{
    evaluate, CreditDecision, CustomerCreditProfile, CustomerStatus, DecisionDetail,
    DecisionReason, UtilizationBand,
};
pub use error::CreditError;
