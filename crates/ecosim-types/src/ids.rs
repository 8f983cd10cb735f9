//! Type-safe identifier wrappers around `u64`.
//!
//! Every entity in the economy has a strongly-typed ID to prevent
//! accidental mixing of identifiers at compile time. IDs are dense,
//! sequential integers assigned in creation order, so two runs built from
//! the same seed produce the same identifiers.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around `u64` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub u64);

        impl $name {
            /// Create an identifier from its raw sequence number.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Return the inner sequence number.
            pub const fn into_inner(self) -> u64 {
                self.0
            }

            /// Return the identifier as a dense arena index, if it fits.
            pub fn index(self) -> Option<usize> {
                usize::try_from(self.0).ok()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an agent, equal to its creation index.
    AgentId
}

define_id! {
    /// Unique identifier for a ledger entry, assigned in append order.
    LedgerEntryId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_roundtrip_serde() {
        let original = AgentId::new(7);
        let json = serde_json::to_string(&original).ok();
        assert_eq!(json.as_deref(), Some("7"));
        let restored: Result<AgentId, _> = serde_json::from_str(json.as_deref().unwrap_or(""));
        assert_eq!(restored.ok(), Some(original));
    }

    #[test]
    fn id_display_matches_raw() {
        let id = AgentId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(u64::from(id), 42);
    }

    #[test]
    fn id_index_is_dense() {
        assert_eq!(AgentId::new(0).index(), Some(0));
        assert_eq!(AgentId::from(3).index(), Some(3));
    }

    #[test]
    fn ids_order_by_creation() {
        assert!(AgentId::new(1) < AgentId::new(2));
        assert!(LedgerEntryId::new(9) > LedgerEntryId::new(0));
    }
}
