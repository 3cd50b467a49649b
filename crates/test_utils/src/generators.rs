//! Property-Based Test Generators
//!
//! Proptest strategies for generating random test data that maintains
//! domain invariants, plus fake-data helpers for human-facing fields.

use chrono::NaiveDate;
use core_kernel::{Currency, Money};
use fake::faker::company::en::CompanyName;
use fake::Fake;
use proptest::prelude::*;

/// Strategy for generating valid Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::USD),
        Just(Currency::EUR),
        Just(Currency::GBP),
        Just(Currency::AUD),
        Just(Currency::CAD),
        Just(Currency::NZD),
        Just(Currency::JPY),
    ]
}

/// Strategy for generating positive amounts in minor units
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000_000i64
}

/// Strategy for generating positive Money values in any currency
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    (positive_amount_minor_strategy(), currency_strategy())
        .prop_map(|(amount, currency)| Money::from_minor(amount, currency))
}

/// Strategy for generating positive USD Money values
pub fn usd_money_strategy() -> impl Strategy<Value = Money> {
    positive_amount_minor_strategy().prop_map(|amount| Money::from_minor(amount, Currency::USD))
}

/// Strategy for generating dates within 2026
pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1i64..365i64).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date")
            + chrono::Duration::days(offset - 1)
    })
}

/// Strategy for payment method labels, including unknown ones
pub fn method_label_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("cash".to_string()),
        Just("bank_transfer".to_string()),
        Just("card".to_string()),
        Just("cheque".to_string()),
        Just("other".to_string()),
        "[a-z]{3,12}",
    ]
}

/// A realistic customer name for human-facing fields
pub fn fake_customer_name() -> String {
    CompanyName().fake()
}
