//! Enumeration types for the `EcoSim` micro-economy.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

/// The behavioral variant of an agent.
///
/// Assigned at construction by creation-index parity and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum AgentKind {
    /// Spends wealth buying goods from producers.
    Consumer,
    /// Produces one unit of goods per tick and sells at a fixed price.
    Producer,
}

impl AgentKind {
    /// Kind for the agent with the given creation index.
    ///
    /// Even indices are consumers, odd indices are producers.
    pub const fn for_index(index: u64) -> Self {
        if index % 2 == 0 {
            Self::Consumer
        } else {
            Self::Producer
        }
    }
}

impl core::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Consumer => write!(f, "Consumer"),
            Self::Producer => write!(f, "Producer"),
        }
    }
}

/// Why a consumer's activation ended without a trade.
///
/// None of these are errors. They model failed matches and market
/// friction, and are expected on most ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum MatchFailure {
    /// The consumer had no wealth left.
    Broke,
    /// The randomly chosen counterparty was not a producer (possibly the
    /// consumer itself).
    NotAProducer,
    /// The chosen producer had no goods in stock.
    OutOfStock,
    /// The consumer's wealth was below the producer's price.
    CannotAfford,
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// A quantity tracked by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Commodity {
    /// Money held by agents.
    Wealth,
    /// Units of the single good.
    Goods,
}

/// The category of a ledger entry.
///
/// | Type | From (debit) | To (credit) | Commodity |
/// |------|-------------|-------------|-----------|
/// | Production | World | Agent | Goods |
/// | Purchase | Agent | Agent | Wealth |
/// | Consumption | Agent | Void | Goods |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum LedgerEntryType {
    /// A producer made one unit of goods.
    Production,
    /// A consumer paid a producer the producer's price.
    Purchase,
    /// A unit of goods left a producer's inventory with a sale.
    Consumption,
}

/// The kind of entity on either side of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum EntityType {
    /// The outside world (source of production).
    World,
    /// An agent in the population.
    Agent,
    /// The sink where consumed goods go.
    Void,
}

impl core::fmt::Display for EntityType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_alternates_by_parity() {
        assert_eq!(AgentKind::for_index(0), AgentKind::Consumer);
        assert_eq!(AgentKind::for_index(1), AgentKind::Producer);
        assert_eq!(AgentKind::for_index(2), AgentKind::Consumer);
        assert_eq!(AgentKind::for_index(3), AgentKind::Producer);
    }

    #[test]
    fn kind_serializes_as_variant_name() {
        let json = serde_json::to_string(&AgentKind::Producer).ok();
        assert_eq!(json.as_deref(), Some("\"Producer\""));
    }
}
