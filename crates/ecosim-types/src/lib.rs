//! Shared type definitions for the `EcoSim` micro-economy.
//!
//! This crate is the single source of truth for the identifiers, enums and
//! records that cross crate boundaries. Records flow to `TypeScript` via
//! `ts-rs` for external plotting and export tools.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe integer wrappers for entity identifiers
//! - [`enums`] -- Agent kinds, match failures, ledger categories
//! - [`structs`] -- Collector records, economy stats, ledger entries

pub mod enums;
pub mod ids;
pub mod structs;

pub use enums::{AgentKind, Commodity, EntityType, LedgerEntryType, MatchFailure};
pub use ids::{AgentId, LedgerEntryId};
pub use structs::{EconomyStats, LedgerEntry, WealthRecord};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // Exporting writes files to the `bindings/` directory relative to
        // the crate root.
        use ts_rs::TS;

        let _ = crate::ids::AgentId::export_all();
        let _ = crate::ids::LedgerEntryId::export_all();

        let _ = crate::enums::AgentKind::export_all();
        let _ = crate::enums::MatchFailure::export_all();
        let _ = crate::enums::Commodity::export_all();
        let _ = crate::enums::LedgerEntryType::export_all();
        let _ = crate::enums::EntityType::export_all();

        let _ = crate::structs::WealthRecord::export_all();
        let _ = crate::structs::EconomyStats::export_all();
        let _ = crate::structs::LedgerEntry::export_all();
    }
}
