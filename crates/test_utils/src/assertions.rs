//! Custom Test Assertions
//!
//! Specialized assertion helpers for domain types that give more
//! meaningful failure messages than standard assertions.

use core_kernel::Money;
use domain_ledger::JournalEntry;

/// Asserts that two Money values are exactly equal, with a readable message
pub fn assert_money_eq(actual: &Money, expected: &Money) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );
    assert_eq!(
        actual.amount(),
        expected.amount(),
        "Money amounts differ: actual={}, expected={}",
        actual,
        expected
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(money.is_zero(), "Expected zero money, got {}", money);
}

/// Asserts that a set of journal entries balances to the minor unit
pub fn assert_entries_balance(entries: &[JournalEntry]) {
    assert!(!entries.is_empty(), "Expected at least one journal entry");

    let debits: i64 = entries.iter().map(|e| e.debit.minor_units()).sum();
    let credits: i64 = entries.iter().map(|e| e.credit.minor_units()).sum();
    assert_eq!(
        debits, credits,
        "Journal entries do not balance: debits={} minor units, credits={} minor units",
        debits, credits
    );
}

/// Asserts that every entry posts to exactly one side
pub fn assert_single_sided(entries: &[JournalEntry]) {
    for entry in entries {
        assert!(
            entry.debit.is_positive() ^ entry.credit.is_positive(),
            "Entry {} on account {} must have exactly one positive side (debit={}, credit={})",
            entry.id,
            entry.account_code,
            entry.debit,
            entry.credit
        );
    }
}
