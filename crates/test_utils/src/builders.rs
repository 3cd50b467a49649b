//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests specify only the fields they care about.

use chrono::NaiveDate;
use core_kernel::{
    ActorId, AllocationId, CustomerId, EffectiveWindow, InvoiceId, Money, PaymentId, TenantId,
};
use domain_aging::OpenInvoice;
use domain_credit::{CreditLimit, CustomerCreditProfile, CustomerStatus};
use domain_ledger::{PaymentEvent, ReversalMethod};
use core_kernel::ReversalId;

use crate::fixtures::{DateFixtures, IdFixtures, MoneyFixtures};

/// Builder for payment lifecycle events
pub struct PaymentEventBuilder {
    payment_id: PaymentId,
    customer_id: CustomerId,
    amount: Money,
    method_label: String,
    payment_reference: String,
    date: NaiveDate,
}

impl Default for PaymentEventBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentEventBuilder {
    pub fn new() -> Self {
        Self {
            payment_id: PaymentId::new(),
            customer_id: IdFixtures::customer_id(),
            amount: MoneyFixtures::usd_payment(),
            method_label: "cash".to_string(),
            payment_reference: "PAY-2026-0001".to_string(),
            date: DateFixtures::as_of(),
        }
    }

    pub fn with_payment_id(mut self, id: PaymentId) -> Self {
        self.payment_id = id;
        self
    }

    pub fn with_customer_id(mut self, id: CustomerId) -> Self {
        self.customer_id = id;
        self
    }

    pub fn with_amount(mut self, amount: Money) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_method(mut self, label: impl Into<String>) -> Self {
        self.method_label = label.into();
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.payment_reference = reference.into();
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Builds a `PaymentCreated` event
    pub fn created(self) -> PaymentEvent {
        PaymentEvent::PaymentCreated {
            payment_id: self.payment_id,
            customer_id: self.customer_id,
            amount: self.amount,
            method_label: self.method_label,
            payment_reference: self.payment_reference,
            received_on: self.date,
        }
    }

    /// Builds a `PaymentAllocated` event against `invoice_id`
    pub fn allocated(self, invoice_id: InvoiceId) -> PaymentEvent {
        PaymentEvent::PaymentAllocated {
            payment_id: self.payment_id,
            allocation_id: AllocationId::new(),
            invoice_id,
            customer_id: self.customer_id,
            amount: self.amount,
            payment_reference: self.payment_reference,
            allocated_on: self.date,
        }
    }

    /// Builds an `AllocationReversed` event against `invoice_id`
    pub fn allocation_reversed(self, invoice_id: InvoiceId) -> PaymentEvent {
        PaymentEvent::AllocationReversed {
            payment_id: self.payment_id,
            allocation_id: AllocationId::new(),
            invoice_id,
            customer_id: self.customer_id,
            amount: self.amount,
            payment_reference: self.payment_reference,
            reversed_on: self.date,
        }
    }

    /// Builds a `PaymentReversed` event
    pub fn reversed(self, method: ReversalMethod) -> PaymentEvent {
        PaymentEvent::PaymentReversed {
            payment_id: self.payment_id,
            reversal_id: ReversalId::new(),
            customer_id: self.customer_id,
            amount: self.amount,
            method_label: self.method_label,
            reversal_method: method,
            payment_reference: self.payment_reference,
            reversed_on: self.date,
        }
    }
}

/// Builder for open invoices used in aging tests
pub struct OpenInvoiceBuilder {
    invoice_id: InvoiceId,
    balance: Money,
    issued_on: NaiveDate,
    due_on: NaiveDate,
    is_draft: bool,
}

impl Default for OpenInvoiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenInvoiceBuilder {
    pub fn new() -> Self {
        Self {
            invoice_id: InvoiceId::new(),
            balance: MoneyFixtures::usd_100(),
            issued_on: DateFixtures::window_start(),
            due_on: DateFixtures::as_of(),
            is_draft: false,
        }
    }

    pub fn with_balance(mut self, balance: Money) -> Self {
        self.balance = balance;
        self
    }

    pub fn issued_on(mut self, date: NaiveDate) -> Self {
        self.issued_on = date;
        self
    }

    pub fn due_on(mut self, date: NaiveDate) -> Self {
        self.due_on = date;
        self
    }

    pub fn draft(mut self) -> Self {
        self.is_draft = true;
        self
    }

    pub fn build(self) -> OpenInvoice {
        OpenInvoice {
            invoice_id: self.invoice_id,
            balance: self.balance,
            issued_on: self.issued_on,
            due_on: self.due_on,
            is_draft: self.is_draft,
        }
    }
}

/// Builder for credit limits in a given lifecycle state
pub struct CreditLimitBuilder {
    customer_id: CustomerId,
    tenant_id: TenantId,
    amount: Money,
    window: EffectiveWindow,
}

impl Default for CreditLimitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CreditLimitBuilder {
    pub fn new() -> Self {
        Self {
            customer_id: IdFixtures::customer_id(),
            tenant_id: IdFixtures::tenant_id(),
            amount: MoneyFixtures::usd_limit(),
            window: EffectiveWindow::open_ended(DateFixtures::window_start()),
        }
    }

    pub fn with_customer_id(mut self, id: CustomerId) -> Self {
        self.customer_id = id;
        self
    }

    pub fn with_tenant_id(mut self, id: TenantId) -> Self {
        self.tenant_id = id;
        self
    }

    pub fn with_amount(mut self, amount: Money) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_window(mut self, window: EffectiveWindow) -> Self {
        self.window = window;
        self
    }

    /// Builds a pending limit
    pub fn pending(self) -> CreditLimit {
        CreditLimit::new_pending(self.customer_id, self.tenant_id, self.amount, self.window, None)
            .expect("valid limit")
    }

    /// Builds an approved limit
    pub fn approved(self) -> CreditLimit {
        let mut limit = self.pending();
        limit.approve(ActorId::new()).expect("pending limit approves");
        limit
    }
}

/// Builds a credit profile with the given status and open totals
pub fn credit_profile(
    status: CustomerStatus,
    open_invoices: Money,
    open_credit_notes: Money,
) -> CustomerCreditProfile {
    CustomerCreditProfile {
        customer_id: IdFixtures::customer_id(),
        tenant_id: IdFixtures::tenant_id(),
        status,
        open_invoice_total: open_invoices,
        open_credit_note_total: open_credit_notes,
    }
}
