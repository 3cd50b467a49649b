//! Strongly-typed identifiers for domain entities
//!
//! Using newtype wrappers around UUIDs provides type safety and prevents
//! accidental mixing of different identifier types. Everything that crosses
//! a tenant boundary carries an explicit `TenantId` - there is no ambient
//! "current company" state anywhere in the core.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates a new time-ordered identifier (v7)
            pub fn new_v7() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Returns the identifier prefix for display
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // Strip prefix if present
                let uuid_str = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Ok(Self(Uuid::parse_str(uuid_str)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

// Tenancy and actors
define_id!(TenantId, "TEN");
define_id!(ActorId, "ACT");

// Receivables domain identifiers
define_id!(CustomerId, "CUS");
define_id!(InvoiceId, "INV");
define_id!(PaymentId, "PAY");
define_id!(AllocationId, "ALO");
define_id!(ReversalId, "REV");

// Ledger domain identifiers
define_id!(JournalEntryId, "JNL");
define_id!(TransactionGroupId, "TXG");

// Credit and aging identifiers
define_id!(CreditLimitId, "CRL");
define_id!(SnapshotId, "AGS");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenant_id_display() {
        let id = TenantId::new();
        let display = id.to_string();
        assert!(display.starts_with("TEN-"));
    }

    #[test]
    fn test_id_parsing_round_trip() {
        let original = PaymentId::new();
        let parsed: PaymentId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_id_parsing_without_prefix() {
        let uuid = Uuid::new_v4();
        let parsed: CustomerId = uuid.to_string().parse().unwrap();
        assert_eq!(parsed.as_uuid(), &uuid);
    }

    #[test]
    fn test_uuid_conversion() {
        let uuid = Uuid::new_v4();
        let group_id = TransactionGroupId::from(uuid);
        let back: Uuid = group_id.into();
        assert_eq!(uuid, back);
    }

    #[test]
    fn test_distinct_types_do_not_compare() {
        // Compile-time property: TenantId and CustomerId are distinct types.
        // This test just pins the prefixes apart.
        assert_ne!(TenantId::prefix(), CustomerId::prefix());
    }
}
