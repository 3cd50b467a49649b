//! Balanced transaction groups and journal entries
//!
//! A transaction group is the atomic unit of posting: a set of debit and
//! credit legs that balances to the currency's minor unit. Groups are
//! validated at construction, so a [`TransactionGroup`] value is balanced
//! by the time anything downstream sees it.

use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{Currency, CustomerId, Money, TenantId, TransactionGroupId, JournalEntryId};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// What kind of business event a transaction group records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Payment,
    Allocation,
    Reversal,
    AllocationReversal,
}

impl EntryKind {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "payment" => Some(EntryKind::Payment),
            "allocation" => Some(EntryKind::Allocation),
            "reversal" => Some(EntryKind::Reversal),
            "allocation_reversal" => Some(EntryKind::AllocationReversal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Payment => "payment",
            EntryKind::Allocation => "allocation",
            EntryKind::Reversal => "reversal",
            EntryKind::AllocationReversal => "allocation_reversal",
        }
    }
}

/// Which side of the ledger a leg posts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegSide {
    Debit,
    Credit,
}

/// One leg of a transaction group, prior to persistence
///
/// A leg posts a strictly positive amount to exactly one side of one
/// account. Both constructors enforce this; there is no way to build a
/// leg with a zero or negative amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalLegInput {
    pub account_code: String,
    pub side: LegSide,
    pub amount: Money,
    pub description: String,
}

impl JournalLegInput {
    /// Creates a debit leg
    pub fn debit(
        account_code: impl Into<String>,
        amount: Money,
        description: impl Into<String>,
    ) -> Result<Self, LedgerError> {
        Self::new(account_code.into(), LegSide::Debit, amount, description.into())
    }

    /// Creates a credit leg
    pub fn credit(
        account_code: impl Into<String>,
        amount: Money,
        description: impl Into<String>,
    ) -> Result<Self, LedgerError> {
        Self::new(account_code.into(), LegSide::Credit, amount, description.into())
    }

    fn new(
        account_code: String,
        side: LegSide,
        amount: Money,
        description: String,
    ) -> Result<Self, LedgerError> {
        if account_code.trim().is_empty() {
            return Err(LedgerError::InvalidLeg("account code is empty".to_string()));
        }
        if !amount.is_positive() {
            return Err(LedgerError::InvalidLeg(format!(
                "leg amount must be positive, got {}",
                amount
            )));
        }
        Ok(Self {
            account_code,
            side,
            amount,
            description,
        })
    }
}

/// A validated, balanced set of journal legs
///
/// # Invariants
///
/// - At least one leg
/// - All legs share one currency
/// - Sum of debit legs equals sum of credit legs to the minor unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionGroup {
    pub id: TransactionGroupId,
    pub tenant_id: TenantId,
    pub customer_id: Option<CustomerId>,
    pub kind: EntryKind,
    pub currency: Currency,
    /// Business reference, e.g. `PAY-2026-0001` or `PAY-2026-0001-R`
    pub reference: String,
    pub description: String,
    pub transaction_date: NaiveDate,
    pub legs: Vec<JournalLegInput>,
    /// Free-form context carried onto every persisted entry
    pub metadata: serde_json::Value,
}

impl TransactionGroup {
    /// Builds a transaction group, validating the balance invariant
    ///
    /// # Errors
    ///
    /// - `EmptyTransaction` when `legs` is empty
    /// - `MixedCurrencies` when legs disagree on currency
    /// - `UnbalancedTransaction` when debits and credits differ at the
    ///   currency's minor unit
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_id: TenantId,
        customer_id: Option<CustomerId>,
        kind: EntryKind,
        reference: impl Into<String>,
        description: impl Into<String>,
        transaction_date: NaiveDate,
        legs: Vec<JournalLegInput>,
        metadata: serde_json::Value,
    ) -> Result<Self, LedgerError> {
        let currency = match legs.first() {
            Some(leg) => leg.amount.currency(),
            None => return Err(LedgerError::EmptyTransaction),
        };

        let mut debits = Money::zero(currency);
        let mut credits = Money::zero(currency);
        for leg in &legs {
            if leg.amount.currency() != currency {
                return Err(LedgerError::MixedCurrencies(
                    currency.to_string(),
                    leg.amount.currency().to_string(),
                ));
            }
            match leg.side {
                LegSide::Debit => debits = debits.checked_add(&leg.amount)?,
                LegSide::Credit => credits = credits.checked_add(&leg.amount)?,
            }
        }

        if debits.minor_units() != credits.minor_units() {
            return Err(LedgerError::UnbalancedTransaction {
                debits: debits.amount(),
                credits: credits.amount(),
            });
        }

        Ok(Self {
            id: TransactionGroupId::new_v7(),
            tenant_id,
            customer_id,
            kind,
            currency,
            reference: reference.into(),
            description: description.into(),
            transaction_date,
            legs,
            metadata,
        })
    }

    /// Total of the debit legs (equal to the credit total by construction)
    pub fn total_debits(&self) -> Money {
        self.legs
            .iter()
            .filter(|leg| leg.side == LegSide::Debit)
            .fold(Money::zero(self.currency), |acc, leg| acc + leg.amount)
    }

    /// Expands the group into persistable journal entries
    pub fn into_entries(self) -> Vec<JournalEntry> {
        let now = Utc::now();
        let group_id = self.id;
        let tenant_id = self.tenant_id;
        let customer_id = self.customer_id;
        let kind = self.kind;
        let currency = self.currency;
        let reference = self.reference;
        let transaction_date = self.transaction_date;
        let metadata = self.metadata;

        self.legs
            .into_iter()
            .map(|leg| {
                let (debit, credit) = match leg.side {
                    LegSide::Debit => (leg.amount, Money::zero(currency)),
                    LegSide::Credit => (Money::zero(currency), leg.amount),
                };
                JournalEntry {
                    id: JournalEntryId::new_v7(),
                    group_id,
                    tenant_id,
                    customer_id,
                    kind,
                    account_code: leg.account_code,
                    debit,
                    credit,
                    description: leg.description,
                    reference: reference.clone(),
                    transaction_date,
                    metadata: metadata.clone(),
                    created_at: now,
                }
            })
            .collect()
    }
}

/// A persisted journal entry: one immutable row per leg
///
/// Entries are never updated or deleted. Corrections post a new group
/// with equal-and-opposite legs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: JournalEntryId,
    pub group_id: TransactionGroupId,
    pub tenant_id: TenantId,
    pub customer_id: Option<CustomerId>,
    pub kind: EntryKind,
    pub account_code: String,
    /// Exactly one of `debit`/`credit` is positive; the other is zero
    pub debit: Money,
    pub credit: Money,
    pub description: String,
    pub reference: String,
    pub transaction_date: NaiveDate,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
