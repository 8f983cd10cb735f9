//! Append-only double-entry ledger for the `EcoSim` micro-economy.
//!
//! Every unit of goods and every unit of wealth that moves in the economy
//! is tracked through this ledger. Goods enter only through production and
//! leave only through consumption at a sale. Wealth never enters or leaves:
//! a purchase moves exactly `price` from a consumer to a producer.
//!
//! # Modules
//!
//! - [`ledger`] -- The [`Ledger`] struct: append-only log with recording methods.
//! - [`transaction`] -- The [`TransactionBuilder`] for validated entry construction.
//! - [`conservation`] -- Per-tick conservation audit against agent balances.
//!
//! # Conservation Law
//!
//! For every tick T:
//!
//! ```text
//! sum(wealth debited in T) == sum(wealth credited in T)
//! total_wealth(after T)    == total_wealth(before T)
//! total_goods(after T)     == total_goods(before T) + produced(T) - consumed(T)
//! ```
//!
//! A violation produces a [`LedgerAnomaly`]. The ledger never panics; it
//! returns errors.
//!
//! # Usage
//!
//! ```
//! use ecosim_ledger::{Balances, Ledger};
//! use ecosim_ledger::conservation::ConservationResult;
//! use ecosim_types::AgentId;
//! use rust_decimal::Decimal;
//!
//! let mut ledger = Ledger::new();
//! let consumer = AgentId::new(0);
//! let producer = AgentId::new(1);
//!
//! ledger.record_production(0, producer).ok();
//! ledger.record_sale(0, consumer, producer, Decimal::new(450, 2)).ok();
//!
//! let before = Balances { wealth: Decimal::new(20, 0), goods: 5 };
//! let after = Balances { wealth: Decimal::new(20, 0), goods: 5 };
//! assert_eq!(ledger.audit_tick(0, &before, &after), ConservationResult::Balanced);
//! ```

pub mod conservation;
pub mod ledger;
pub mod transaction;

pub use conservation::{Balances, ConservationResult, TickFlows};
pub use ledger::Ledger;
pub use transaction::TransactionBuilder;

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use ecosim_types::{Commodity, EntityType, LedgerEntryType};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when recording ledger entries.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Quantity must be strictly positive.
    #[error("ledger entry quantity must be non-zero")]
    ZeroQuantity,

    /// Quantity must not be negative.
    #[error("ledger entry quantity must be positive, got {quantity}")]
    NegativeQuantity {
        /// The invalid quantity.
        quantity: Decimal,
    },

    /// A required field was not set on the builder.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The from/to entity types do not match the expected types for the
    /// entry type.
    #[error("invalid entity type for {entry_type:?} {side}: expected {expected}, got {actual}")]
    InvalidEntityType {
        /// The entry type being validated.
        entry_type: LedgerEntryType,
        /// Which side of the entry ("from" or "to").
        side: &'static str,
        /// The expected entity type.
        expected: EntityType,
        /// The actual entity type.
        actual: EntityType,
    },

    /// An agent side was recorded without an agent id, or a world/void
    /// side was given one.
    #[error("entity id mismatch on {side} side of {entry_type:?}")]
    EntityIdMismatch {
        /// The entry type being validated.
        entry_type: LedgerEntryType,
        /// Which side of the entry ("from" or "to").
        side: &'static str,
    },

    /// An entry was recorded for a tick earlier than the last entry.
    #[error("ledger entry for tick {tick} after tick {last_tick}")]
    TickRegression {
        /// The tick of the rejected entry.
        tick: u64,
        /// The tick of the last appended entry.
        last_tick: u64,
    },

    /// The entry id sequence would overflow.
    #[error("ledger entry id overflow")]
    IdOverflow,
}

// ---------------------------------------------------------------------------
// Anomaly type
// ---------------------------------------------------------------------------

/// A conservation law violation detected during a tick audit.
///
/// Each imbalance maps a commodity to `(expected, actual)` totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAnomaly {
    /// The tick where the anomaly was detected.
    pub tick: u64,
    /// Per-commodity imbalance as (expected, actual).
    pub imbalances: BTreeMap<Commodity, (Decimal, Decimal)>,
    /// Human-readable description of the anomaly.
    pub message: String,
}

impl core::fmt::Display for LedgerAnomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}
