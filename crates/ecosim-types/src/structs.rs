//! Record structs shared between the engine and its external collaborators.
//!
//! Money is carried as [`Decimal`] so the trade conservation law holds
//! exactly. For `TypeScript` bindings it is exported as a string.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{AgentKind, Commodity, EntityType, LedgerEntryType};
use crate::ids::{AgentId, LedgerEntryId};

// ---------------------------------------------------------------------------
// Collector records
// ---------------------------------------------------------------------------

/// One immutable per-agent observation appended by the data collector.
///
/// `step` is the scheduler's step counter at collection time. Collection
/// runs before activation, so the record for step `t` holds the wealth the
/// agent had before tick `t` traded or produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WealthRecord {
    /// Step counter at collection time.
    pub step: u64,
    /// The observed agent.
    pub agent_id: AgentId,
    /// Variant of the observed agent.
    pub kind: AgentKind,
    /// The agent's wealth at collection time.
    #[ts(as = "String")]
    pub wealth: Decimal,
}

/// One model-level observation appended alongside the per-agent records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EconomyStats {
    /// Step counter at collection time.
    pub step: u64,
    /// Sum of wealth held by consumers.
    #[ts(as = "String")]
    pub consumer_wealth: Decimal,
    /// Sum of wealth held by producers.
    #[ts(as = "String")]
    pub producer_wealth: Decimal,
    /// Sum of goods held by producers.
    pub total_goods: u64,
    /// Trades completed since construction.
    pub trades_completed: u64,
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// A single double-entry ledger record.
///
/// `from_entity`/`to_entity` carry an agent id when the matching entity
/// type is [`EntityType::Agent`], and `None` for the world and the void.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LedgerEntry {
    /// Unique entry identifier, sequential in append order.
    pub id: LedgerEntryId,
    /// The tick when this movement occurred.
    pub tick: u64,
    /// The category of movement.
    pub entry_type: LedgerEntryType,
    /// Source agent, if the source is an agent.
    pub from_entity: Option<AgentId>,
    /// Type of the source entity.
    pub from_entity_type: EntityType,
    /// Destination agent, if the destination is an agent.
    pub to_entity: Option<AgentId>,
    /// Type of the destination entity.
    pub to_entity_type: EntityType,
    /// What moved.
    pub commodity: Commodity,
    /// How much moved (always positive).
    #[ts(as = "String")]
    pub quantity: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wealth_record_serializes_decimal_as_string() {
        let record = WealthRecord {
            step: 3,
            agent_id: AgentId::new(1),
            kind: AgentKind::Consumer,
            wealth: Decimal::new(1250, 2),
        };
        let json = serde_json::to_string(&record).unwrap_or_default();
        assert!(json.contains("\"wealth\":\"12.50\""));
        assert!(json.contains("\"kind\":\"Consumer\""));
    }
}
