//! Payment methods and the per-tenant chart of accounts
//!
//! Account codes are configuration, not constants. Every tenant can remap
//! any code; the defaults here match the standard chart shipped with the
//! product. Resolution maps a payment method to the cash-side account and
//! the counter account for the posting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a payment was tendered
///
/// Unknown labels do not fail resolution; they fall back to
/// [`PaymentMethod::Other`] with the fallback flagged on the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    Card,
    Cheque,
    Other,
}

impl PaymentMethod {
    /// Parses a method label; `None` signals an unrecognized label
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "cash" => Some(PaymentMethod::Cash),
            "bank_transfer" => Some(PaymentMethod::BankTransfer),
            "card" => Some(PaymentMethod::Card),
            "cheque" => Some(PaymentMethod::Cheque),
            "other" => Some(PaymentMethod::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Card => "card",
            PaymentMethod::Cheque => "cheque",
            PaymentMethod::Other => "other",
        }
    }

    /// Physical tenders clear through Undeposited Funds before deposit;
    /// electronic tenders settle directly against receivables
    pub fn uses_undeposited_funds(&self) -> bool {
        matches!(self, PaymentMethod::Cash | PaymentMethod::Cheque)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-tenant account code mapping
///
/// Deserialized from tenant configuration; `Default` gives the standard
/// chart used when a tenant has no overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOfAccounts {
    pub cash_on_hand: String,
    pub bank_clearing: String,
    pub card_clearing: String,
    pub cheque_clearing: String,
    pub other_clearing: String,
    pub accounts_receivable: String,
    pub undeposited_funds: String,
    pub chargeback_liability: String,
}

impl Default for ChartOfAccounts {
    fn default() -> Self {
        Self {
            cash_on_hand: "1201".to_string(),
            bank_clearing: "1210".to_string(),
            card_clearing: "1220".to_string(),
            cheque_clearing: "1230".to_string(),
            other_clearing: "1240".to_string(),
            accounts_receivable: "1100".to_string(),
            undeposited_funds: "1250".to_string(),
            chargeback_liability: "2100".to_string(),
        }
    }
}

impl ChartOfAccounts {
    /// The cash-side account a payment method settles into
    pub fn cash_account_for(&self, method: PaymentMethod) -> &str {
        match method {
            PaymentMethod::Cash => &self.cash_on_hand,
            PaymentMethod::BankTransfer => &self.bank_clearing,
            PaymentMethod::Card => &self.card_clearing,
            PaymentMethod::Cheque => &self.cheque_clearing,
            PaymentMethod::Other => &self.other_clearing,
        }
    }
}

/// The outcome of resolving a payment method against a chart of accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAccounts {
    pub method: PaymentMethod,
    /// Debit side of a payment-created posting
    pub cash_account: String,
    /// Credit side: Undeposited Funds or Accounts Receivable
    pub counter_account: String,
    pub uses_undeposited_funds: bool,
    /// True when the method label was unrecognized and the `other`
    /// mapping was substituted
    pub fallback: bool,
}

impl ChartOfAccounts {
    /// Resolves a parsed payment method
    pub fn resolve(&self, method: PaymentMethod) -> ResolvedAccounts {
        let uses_uf = method.uses_undeposited_funds();
        let counter = if uses_uf {
            self.undeposited_funds.clone()
        } else {
            self.accounts_receivable.clone()
        };
        ResolvedAccounts {
            method,
            cash_account: self.cash_account_for(method).to_string(),
            counter_account: counter,
            uses_undeposited_funds: uses_uf,
            fallback: false,
        }
    }

    /// Resolves a raw method label, substituting the `other` mapping for
    /// unknown labels
    ///
    /// Unknown labels are logged, never rejected: a payment must always
    /// post somewhere an accountant can find it.
    pub fn resolve_label(&self, label: &str) -> ResolvedAccounts {
        match PaymentMethod::from_label(label) {
            Some(method) => self.resolve(method),
            None => {
                tracing::warn!(
                    payment_method = label,
                    fallback_account = %self.other_clearing,
                    "unknown payment method, posting to fallback clearing account"
                );
                let mut resolved = self.resolve(PaymentMethod::Other);
                resolved.fallback = true;
                resolved
            }
        }
    }
}
