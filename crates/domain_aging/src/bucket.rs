//! Aging bucket classification
//!
//! Each open invoice lands in exactly one bucket based on whole days past
//! due as of the reference date. Drafts, zero/negative balances, and
//! invoices issued after the reference date are excluded before this
//! module sees them, but the filter is applied again here so the
//! computation is safe on raw query results.

use chrono::NaiveDate;
use core_kernel::{days_between, Currency, InvoiceId, Money};
use serde::{Deserialize, Serialize};

use crate::error::AgingError;

/// The five standard aging buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgingBucket {
    Current,
    Days1To30,
    Days31To60,
    Days61To90,
    Over90,
}

impl AgingBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgingBucket::Current => "current",
            AgingBucket::Days1To30 => "1_30",
            AgingBucket::Days31To60 => "31_60",
            AgingBucket::Days61To90 => "61_90",
            AgingBucket::Over90 => "90_plus",
        }
    }
}

/// Classifies a days-overdue count into its bucket
///
/// Zero or negative means the invoice is not yet due.
pub fn classify(days_overdue: i64) -> AgingBucket {
    match days_overdue {
        d if d <= 0 => AgingBucket::Current,
        d if d <= 30 => AgingBucket::Days1To30,
        d if d <= 60 => AgingBucket::Days31To60,
        d if d <= 90 => AgingBucket::Days61To90,
        _ => AgingBucket::Over90,
    }
}

/// The slice of an invoice the aging computation needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenInvoice {
    pub invoice_id: InvoiceId,
    pub balance: Money,
    pub issued_on: NaiveDate,
    pub due_on: NaiveDate,
    pub is_draft: bool,
}

impl OpenInvoice {
    /// Whether this invoice participates in aging as of `as_of`
    pub fn is_agable(&self, as_of: NaiveDate) -> bool {
        !self.is_draft && self.balance.is_positive() && self.issued_on <= as_of
    }

    /// Whole days past due as of `as_of`; negative when not yet due
    pub fn days_overdue(&self, as_of: NaiveDate) -> i64 {
        days_between(self.due_on, as_of)
    }
}

/// Bucketed totals for one customer as of a reference date
///
/// Invariant: the five buckets sum to `total_outstanding` to the cent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketSet {
    pub current: Money,
    pub days_1_30: Money,
    pub days_31_60: Money,
    pub days_61_90: Money,
    pub over_90: Money,
    pub total_outstanding: Money,
    /// Number of invoices that contributed to the buckets
    pub invoice_count: u32,
}

impl BucketSet {
    /// An empty bucket set in the given currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            current: Money::zero(currency),
            days_1_30: Money::zero(currency),
            days_31_60: Money::zero(currency),
            days_61_90: Money::zero(currency),
            over_90: Money::zero(currency),
            total_outstanding: Money::zero(currency),
            invoice_count: 0,
        }
    }

    /// The amount in one bucket
    pub fn amount_in(&self, bucket: AgingBucket) -> Money {
        match bucket {
            AgingBucket::Current => self.current,
            AgingBucket::Days1To30 => self.days_1_30,
            AgingBucket::Days31To60 => self.days_31_60,
            AgingBucket::Days61To90 => self.days_61_90,
            AgingBucket::Over90 => self.over_90,
        }
    }

    fn add_to(&mut self, bucket: AgingBucket, amount: Money) -> Result<(), AgingError> {
        let slot = match bucket {
            AgingBucket::Current => &mut self.current,
            AgingBucket::Days1To30 => &mut self.days_1_30,
            AgingBucket::Days31To60 => &mut self.days_31_60,
            AgingBucket::Days61To90 => &mut self.days_61_90,
            AgingBucket::Over90 => &mut self.over_90,
        };
        *slot = slot.checked_add(&amount)?;
        self.total_outstanding = self.total_outstanding.checked_add(&amount)?;
        self.invoice_count += 1;
        Ok(())
    }
}

/// Buckets every agable invoice by days past due as of `as_of`
///
/// # Errors
///
/// `MixedCurrencies` when the invoices do not share one currency.
pub fn compute_buckets(
    invoices: &[OpenInvoice],
    as_of: NaiveDate,
    currency: Currency,
) -> Result<BucketSet, AgingError> {
    let mut buckets = BucketSet::zero(currency);

    for invoice in invoices {
        if !invoice.is_agable(as_of) {
            continue;
        }
        if invoice.balance.currency() != currency {
            return Err(AgingError::MixedCurrencies(
                currency.to_string(),
                invoice.balance.currency().to_string(),
            ));
        }
        let bucket = classify(invoice.days_overdue(as_of));
        buckets.add_to(bucket, invoice.balance)?;
    }

    Ok(buckets)
}
