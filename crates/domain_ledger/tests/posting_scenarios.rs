//! End-to-end posting scenarios over the pure ledger domain
//!
//! These walk a payment through its lifecycle and check the net effect
//! per account, the way an accountant would read the journal.

use chrono::NaiveDate;
use core_kernel::{
    AllocationId, Currency, CustomerId, InvoiceId, Money, PaymentId, ReversalId, TenantId,
};
use domain_ledger::{
    build_group, ChartOfAccounts, JournalEntry, PaymentEvent, ReversalMethod,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

fn usd(amount: Decimal) -> Money {
    Money::new(amount, Currency::USD)
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
}

/// Net movement per account: debits positive, credits negative
fn net_by_account(entries: &[JournalEntry]) -> HashMap<String, Decimal> {
    let mut net: HashMap<String, Decimal> = HashMap::new();
    for entry in entries {
        let delta = entry.debit.amount() - entry.credit.amount();
        *net.entry(entry.account_code.clone()).or_default() += delta;
    }
    net
}

#[test]
fn cash_payment_allocated_in_full_nets_cash_up_and_receivables_down() {
    let tenant_id = TenantId::new();
    let chart = ChartOfAccounts::default();
    let payment_id = PaymentId::new();
    let customer_id = CustomerId::new();

    let created = PaymentEvent::PaymentCreated {
        payment_id,
        customer_id,
        amount: usd(dec!(500.00)),
        method_label: "cash".to_string(),
        payment_reference: "PAY-2026-0100".to_string(),
        received_on: date(),
    };
    let allocated = PaymentEvent::PaymentAllocated {
        payment_id,
        allocation_id: AllocationId::new(),
        invoice_id: InvoiceId::new(),
        customer_id,
        amount: usd(dec!(500.00)),
        payment_reference: "PAY-2026-0100".to_string(),
        allocated_on: date(),
    };

    let mut entries = Vec::new();
    for event in [&created, &allocated] {
        entries.extend(build_group(tenant_id, &chart, event).unwrap().into_entries());
    }

    let net = net_by_account(&entries);
    assert_eq!(net["1201"], dec!(500.00));
    assert_eq!(net["1100"], dec!(-500.00));
    // Undeposited funds washes out once fully allocated
    assert_eq!(net["1250"], dec!(0.00));
}

#[test]
fn allocation_reversal_undoes_the_allocation_exactly() {
    let tenant_id = TenantId::new();
    let chart = ChartOfAccounts::default();
    let payment_id = PaymentId::new();
    let customer_id = CustomerId::new();
    let allocation_id = AllocationId::new();
    let invoice_id = InvoiceId::new();

    let allocated = PaymentEvent::PaymentAllocated {
        payment_id,
        allocation_id,
        invoice_id,
        customer_id,
        amount: usd(dec!(320.00)),
        payment_reference: "PAY-2026-0101".to_string(),
        allocated_on: date(),
    };
    let unallocated = PaymentEvent::AllocationReversed {
        payment_id,
        allocation_id,
        invoice_id,
        customer_id,
        amount: usd(dec!(320.00)),
        payment_reference: "PAY-2026-0101".to_string(),
        reversed_on: date(),
    };

    let mut entries = Vec::new();
    for event in [&allocated, &unallocated] {
        entries.extend(build_group(tenant_id, &chart, event).unwrap().into_entries());
    }

    let net = net_by_account(&entries);
    assert!(net.values().all(|delta| delta.is_zero()));
}

#[test]
fn chargeback_lifecycle_leaves_liability_on_the_books() {
    let tenant_id = TenantId::new();
    let chart = ChartOfAccounts::default();
    let payment_id = PaymentId::new();
    let customer_id = CustomerId::new();

    let created = PaymentEvent::PaymentCreated {
        payment_id,
        customer_id,
        amount: usd(dec!(120.00)),
        method_label: "card".to_string(),
        payment_reference: "PAY-2026-0102".to_string(),
        received_on: date(),
    };
    let charged_back = PaymentEvent::PaymentReversed {
        payment_id,
        reversal_id: ReversalId::new(),
        customer_id,
        amount: usd(dec!(120.00)),
        method_label: "card".to_string(),
        reversal_method: ReversalMethod::Chargeback,
        payment_reference: "PAY-2026-0102".to_string(),
        reversed_on: date(),
    };

    let mut entries = Vec::new();
    for event in [&created, &charged_back] {
        entries.extend(build_group(tenant_id, &chart, event).unwrap().into_entries());
    }

    // Every group balanced, so the whole journal balances
    let total_debits: Decimal = entries.iter().map(|e| e.debit.amount()).sum();
    let total_credits: Decimal = entries.iter().map(|e| e.credit.amount()).sum();
    assert_eq!(total_debits, total_credits);

    let net = net_by_account(&entries);
    // Card clearing washes out; the reversal over-debits receivables by
    // the liability amount
    assert_eq!(net["1220"], dec!(0.00));
    assert_eq!(net["2100"], dec!(-120.00));
    assert_eq!(net["1100"], dec!(120.00));
}

#[test]
fn every_entry_has_exactly_one_positive_side() {
    let tenant_id = TenantId::new();
    let chart = ChartOfAccounts::default();

    let event = PaymentEvent::PaymentCreated {
        payment_id: PaymentId::new(),
        customer_id: CustomerId::new(),
        amount: usd(dec!(42.42)),
        method_label: "cheque".to_string(),
        payment_reference: "PAY-2026-0103".to_string(),
        received_on: date(),
    };

    let entries = build_group(tenant_id, &chart, &event)
        .unwrap()
        .into_entries();

    for entry in entries {
        assert!(entry.debit.is_positive() ^ entry.credit.is_positive());
        assert!(!entry.debit.is_negative());
        assert!(!entry.credit.is_negative());
    }
}
