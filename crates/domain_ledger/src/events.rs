//! Payment lifecycle events consumed by the posting orchestrator
//!
//! The four event kinds cover a payment's whole ledger life. Dispatch is
//! an exhaustive match in [`crate::posting`], so adding a variant forces
//! every handler to be revisited.

use chrono::NaiveDate;
use core_kernel::{AllocationId, CustomerId, InvoiceId, Money, PaymentId, ReversalId};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::transaction::EntryKind;

/// How a payment reversal was initiated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReversalMethod {
    /// Money returned to the customer
    Refund,
    /// Payment cancelled before settlement
    Void,
    /// Settlement clawed back by the card network or bank
    Chargeback,
}

impl ReversalMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReversalMethod::Refund => "refund",
            ReversalMethod::Void => "void",
            ReversalMethod::Chargeback => "chargeback",
        }
    }
}

impl fmt::Display for ReversalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A domain event describing one step of a payment's life
///
/// Allocations and reversals can recur for one payment; creation happens
/// once. The `payment_reference` is the human-facing payment number the
/// posting references derive from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaymentEvent {
    PaymentCreated {
        payment_id: PaymentId,
        customer_id: CustomerId,
        amount: Money,
        /// Raw method label as supplied by the caller; resolution handles
        /// unknown labels
        method_label: String,
        payment_reference: String,
        received_on: NaiveDate,
    },
    PaymentAllocated {
        payment_id: PaymentId,
        allocation_id: AllocationId,
        invoice_id: InvoiceId,
        customer_id: CustomerId,
        amount: Money,
        payment_reference: String,
        allocated_on: NaiveDate,
    },
    PaymentReversed {
        payment_id: PaymentId,
        reversal_id: ReversalId,
        customer_id: CustomerId,
        amount: Money,
        method_label: String,
        reversal_method: ReversalMethod,
        payment_reference: String,
        reversed_on: NaiveDate,
    },
    AllocationReversed {
        payment_id: PaymentId,
        allocation_id: AllocationId,
        invoice_id: InvoiceId,
        customer_id: CustomerId,
        amount: Money,
        payment_reference: String,
        reversed_on: NaiveDate,
    },
}

impl PaymentEvent {
    /// The monetary amount the event concerns
    pub fn amount(&self) -> Money {
        match self {
            PaymentEvent::PaymentCreated { amount, .. }
            | PaymentEvent::PaymentAllocated { amount, .. }
            | PaymentEvent::PaymentReversed { amount, .. }
            | PaymentEvent::AllocationReversed { amount, .. } => *amount,
        }
    }

    pub fn payment_id(&self) -> PaymentId {
        match self {
            PaymentEvent::PaymentCreated { payment_id, .. }
            | PaymentEvent::PaymentAllocated { payment_id, .. }
            | PaymentEvent::PaymentReversed { payment_id, .. }
            | PaymentEvent::AllocationReversed { payment_id, .. } => *payment_id,
        }
    }

    pub fn customer_id(&self) -> CustomerId {
        match self {
            PaymentEvent::PaymentCreated { customer_id, .. }
            | PaymentEvent::PaymentAllocated { customer_id, .. }
            | PaymentEvent::PaymentReversed { customer_id, .. }
            | PaymentEvent::AllocationReversed { customer_id, .. } => *customer_id,
        }
    }

    /// The journal entry kind this event posts as
    pub fn entry_kind(&self) -> EntryKind {
        match self {
            PaymentEvent::PaymentCreated { .. } => EntryKind::Payment,
            PaymentEvent::PaymentAllocated { .. } => EntryKind::Allocation,
            PaymentEvent::PaymentReversed { .. } => EntryKind::Reversal,
            PaymentEvent::AllocationReversed { .. } => EntryKind::AllocationReversal,
        }
    }

    /// The effective posting date of the event
    pub fn effective_date(&self) -> NaiveDate {
        match self {
            PaymentEvent::PaymentCreated { received_on, .. } => *received_on,
            PaymentEvent::PaymentAllocated { allocated_on, .. } => *allocated_on,
            PaymentEvent::PaymentReversed { reversed_on, .. }
            | PaymentEvent::AllocationReversed { reversed_on, .. } => *reversed_on,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    #[test]
    fn test_event_accessors() {
        let payment_id = PaymentId::new();
        let customer_id = CustomerId::new();
        let event = PaymentEvent::PaymentCreated {
            payment_id,
            customer_id,
            amount: Money::new(dec!(500.00), Currency::USD),
            method_label: "cash".to_string(),
            payment_reference: "PAY-2026-0001".to_string(),
            received_on: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
        };

        assert_eq!(event.payment_id(), payment_id);
        assert_eq!(event.customer_id(), customer_id);
        assert_eq!(event.amount().amount(), dec!(500.00));
        assert_eq!(event.entry_kind(), EntryKind::Payment);
    }

    #[test]
    fn test_event_serde_tagging() {
        let event = PaymentEvent::PaymentReversed {
            payment_id: PaymentId::new(),
            reversal_id: ReversalId::new(),
            customer_id: CustomerId::new(),
            amount: Money::new(dec!(120.00), Currency::USD),
            method_label: "card".to_string(),
            reversal_method: ReversalMethod::Chargeback,
            payment_reference: "PAY-2026-0002".to_string(),
            reversed_on: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "payment_reversed");
        assert_eq!(json["reversal_method"], "chargeback");

        let back: PaymentEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
