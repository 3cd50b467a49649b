//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for common entities. Fixtures are consistent
//! and predictable so assertions can use literal expectations.

use chrono::NaiveDate;
use core_kernel::{ActorId, Currency, CustomerId, Money, TenantId};
use domain_ledger::ChartOfAccounts;
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// A standard USD amount
    pub fn usd_100() -> Money {
        Money::new(dec!(100.00), Currency::USD)
    }

    /// The canonical payment amount used across posting scenarios
    pub fn usd_payment() -> Money {
        Money::new(dec!(500.00), Currency::USD)
    }

    /// A typical credit limit
    pub fn usd_limit() -> Money {
        Money::new(dec!(1000.00), Currency::USD)
    }

    /// A zero amount
    pub fn usd_zero() -> Money {
        Money::zero(Currency::USD)
    }

    /// A EUR amount for currency-mismatch tests
    pub fn eur_100() -> Money {
        Money::new(dec!(100.00), Currency::EUR)
    }
}

/// Fixture for stable identifiers
///
/// Fixed UUIDs make cross-assertion comparisons and log output
/// reproducible.
pub struct IdFixtures;

impl IdFixtures {
    pub fn tenant_id() -> TenantId {
        TenantId::from_uuid(Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001))
    }

    pub fn other_tenant_id() -> TenantId {
        TenantId::from_uuid(Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0002))
    }

    pub fn actor_id() -> ActorId {
        ActorId::from_uuid(Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0010))
    }

    pub fn customer_id() -> CustomerId {
        CustomerId::from_uuid(Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0100))
    }
}

/// Fixture for calendar dates
pub struct DateFixtures;

impl DateFixtures {
    /// The reference "today" used in aging and credit tests
    pub fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).expect("valid date")
    }

    /// A due date 45 days before [`DateFixtures::as_of`]
    pub fn due_45_days_ago() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 1).expect("valid date")
    }

    /// Start of the standard effective window
    pub fn window_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date")
    }
}

/// The standard chart of accounts used in posting tests
pub fn standard_chart() -> ChartOfAccounts {
    ChartOfAccounts::default()
}
