//! Conservation law verification for the ledger.
//!
//! Wealth only ever moves between agents, so a purchase debits and credits
//! the same amount and total wealth is constant across every tick. Goods
//! enter through `Production` and leave through `Consumption`, so the goods
//! total changes by exactly `produced - consumed` per tick.
//!
//! [`verify_conservation`] checks the ledger against itself.
//! [`audit_tick`] additionally checks it against the population's balances
//! taken before and after the tick, which catches state mutations that
//! bypassed the ledger.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use ecosim_types::{Commodity, LedgerEntry, LedgerEntryType};

use crate::LedgerAnomaly;

/// The result of a conservation check for a single tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConservationResult {
    /// The ledger is balanced for this tick.
    Balanced,
    /// One or more commodities are out of balance.
    Anomaly(LedgerAnomaly),
}

/// Aggregate holdings of the whole population at a tick boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Balances {
    /// Total wealth held by all agents.
    pub wealth: Decimal,
    /// Total goods held by all producers.
    pub goods: u64,
}

/// Movements recorded in the ledger for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickFlows {
    /// Goods created by production.
    pub produced: Decimal,
    /// Goods removed by sales.
    pub consumed: Decimal,
    /// Wealth taken from buyers.
    pub wealth_debited: Decimal,
    /// Wealth given to sellers.
    pub wealth_credited: Decimal,
    /// Number of completed sales.
    pub sales: u64,
}

/// Sum the movements of a single tick.
///
/// Entries from other ticks are ignored.
///
/// # Errors
///
/// Returns a [`LedgerAnomaly`] if any running total overflows.
pub fn tick_flows(tick: u64, entries: &[LedgerEntry]) -> Result<TickFlows, LedgerAnomaly> {
    let mut flows = TickFlows::default();

    for entry in entries.iter().filter(|e| e.tick == tick) {
        match entry.entry_type {
            LedgerEntryType::Production => {
                flows.produced = add(tick, Commodity::Goods, flows.produced, entry.quantity)?;
            }
            LedgerEntryType::Consumption => {
                flows.consumed = add(tick, Commodity::Goods, flows.consumed, entry.quantity)?;
                flows.sales = flows
                    .sales
                    .checked_add(1)
                    .ok_or_else(|| overflow_anomaly(tick, Commodity::Goods))?;
            }
            LedgerEntryType::Purchase => {
                // Debit side: the buyer loses the price.
                flows.wealth_debited =
                    add(tick, Commodity::Wealth, flows.wealth_debited, entry.quantity)?;
                // Credit side: the seller gains the price.
                flows.wealth_credited =
                    add(tick, Commodity::Wealth, flows.wealth_credited, entry.quantity)?;
            }
        }
    }

    Ok(flows)
}

/// Verify that wealth debited equals wealth credited within a tick, and
/// that every sale moved both money and goods.
pub fn verify_conservation(tick: u64, entries: &[LedgerEntry]) -> ConservationResult {
    let flows = match tick_flows(tick, entries) {
        Ok(flows) => flows,
        Err(anomaly) => return ConservationResult::Anomaly(anomaly),
    };

    let mut imbalances = BTreeMap::new();
    if flows.wealth_debited != flows.wealth_credited {
        imbalances.insert(Commodity::Wealth, (flows.wealth_debited, flows.wealth_credited));
    }

    let purchases = entries
        .iter()
        .filter(|e| e.tick == tick && e.entry_type == LedgerEntryType::Purchase)
        .count();
    let purchases = Decimal::from(purchases);
    if purchases != flows.consumed {
        imbalances.insert(Commodity::Goods, (purchases, flows.consumed));
    }

    into_result(tick, imbalances, "ledger flows do not balance")
}

/// Audit a tick against population balances taken before and after it.
///
/// Checks, in addition to [`verify_conservation`]:
///
/// ```text
/// after.wealth == before.wealth
/// after.goods  == before.goods + produced - consumed
/// ```
pub fn audit_tick(
    tick: u64,
    entries: &[LedgerEntry],
    before: &Balances,
    after: &Balances,
) -> ConservationResult {
    let internal = verify_conservation(tick, entries);
    if let ConservationResult::Anomaly(_) = &internal {
        return internal;
    }

    let flows = match tick_flows(tick, entries) {
        Ok(flows) => flows,
        Err(anomaly) => return ConservationResult::Anomaly(anomaly),
    };

    let mut imbalances = BTreeMap::new();

    if after.wealth != before.wealth {
        imbalances.insert(Commodity::Wealth, (before.wealth, after.wealth));
    }

    let expected_goods = Decimal::from(before.goods)
        .checked_add(flows.produced)
        .and_then(|v| v.checked_sub(flows.consumed));
    let Some(expected_goods) = expected_goods else {
        return ConservationResult::Anomaly(overflow_anomaly(tick, Commodity::Goods));
    };
    let actual_goods = Decimal::from(after.goods);
    if actual_goods != expected_goods {
        imbalances.insert(Commodity::Goods, (expected_goods, actual_goods));
    }

    into_result(tick, imbalances, "population balances disagree with ledger")
}

/// Checked addition that reports overflow as an anomaly.
fn add(
    tick: u64,
    commodity: Commodity,
    total: Decimal,
    quantity: Decimal,
) -> Result<Decimal, LedgerAnomaly> {
    total
        .checked_add(quantity)
        .ok_or_else(|| overflow_anomaly(tick, commodity))
}

/// Turn collected imbalances into a result.
fn into_result(
    tick: u64,
    imbalances: BTreeMap<Commodity, (Decimal, Decimal)>,
    what: &str,
) -> ConservationResult {
    if imbalances.is_empty() {
        return ConservationResult::Balanced;
    }
    let count = imbalances.len();
    ConservationResult::Anomaly(LedgerAnomaly {
        tick,
        imbalances,
        message: format!("LEDGER_ANOMALY at tick {tick}: {what} for {count} commodity(ies)"),
    })
}

/// Construct an anomaly for arithmetic overflow during summation.
fn overflow_anomaly(tick: u64, commodity: Commodity) -> LedgerAnomaly {
    let mut imbalances = BTreeMap::new();
    imbalances.insert(commodity, (Decimal::ZERO, Decimal::ZERO));
    LedgerAnomaly {
        tick,
        imbalances,
        message: format!("LEDGER_ANOMALY at tick {tick}: arithmetic overflow while summing {commodity:?}"),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use rust_decimal_macros::dec;

    use ecosim_types::{AgentId, EntityType, LedgerEntryId};

    use super::*;

    /// Helper to create a ledger entry without going through the builder.
    fn make_entry(tick: u64, entry_type: LedgerEntryType, quantity: Decimal) -> LedgerEntry {
        let (from_entity, from_entity_type, to_entity, to_entity_type, commodity) = match entry_type {
            LedgerEntryType::Production => {
                (None, EntityType::World, Some(AgentId::new(1)), EntityType::Agent, Commodity::Goods)
            }
            LedgerEntryType::Purchase => (
                Some(AgentId::new(0)),
                EntityType::Agent,
                Some(AgentId::new(1)),
                EntityType::Agent,
                Commodity::Wealth,
            ),
            LedgerEntryType::Consumption => {
                (Some(AgentId::new(1)), EntityType::Agent, None, EntityType::Void, Commodity::Goods)
            }
        };
        LedgerEntry {
            id: LedgerEntryId::new(0),
            tick,
            entry_type,
            from_entity,
            from_entity_type,
            to_entity,
            to_entity_type,
            commodity,
            quantity,
        }
    }

    fn sale(tick: u64, price: Decimal) -> [LedgerEntry; 2] {
        [
            make_entry(tick, LedgerEntryType::Purchase, price),
            make_entry(tick, LedgerEntryType::Consumption, Decimal::ONE),
        ]
    }

    #[test]
    fn empty_tick_is_balanced() {
        assert_eq!(verify_conservation(1, &[]), ConservationResult::Balanced);
    }

    #[test]
    fn production_alone_is_balanced() {
        // Production is a source flow; it never needs a matching debit.
        let entries = vec![make_entry(1, LedgerEntryType::Production, Decimal::ONE)];
        assert_eq!(verify_conservation(1, &entries), ConservationResult::Balanced);
    }

    #[test]
    fn complete_sale_is_balanced() {
        let entries = sale(1, dec!(7.25));
        assert_eq!(verify_conservation(1, &entries), ConservationResult::Balanced);
    }

    #[test]
    fn purchase_without_consumption_is_anomaly() {
        let entries = vec![make_entry(1, LedgerEntryType::Purchase, dec!(3))];
        let result = verify_conservation(1, &entries);
        let ConservationResult::Anomaly(anomaly) = result else {
            panic!("expected anomaly");
        };
        assert_eq!(anomaly.tick, 1);
        assert_eq!(anomaly.imbalances.get(&Commodity::Goods), Some(&(dec!(1), dec!(0))));
        assert!(anomaly.message.contains("LEDGER_ANOMALY"));
    }

    #[test]
    fn entries_from_other_ticks_are_ignored() {
        let mut entries = sale(1, dec!(2)).to_vec();
        entries.push(make_entry(2, LedgerEntryType::Purchase, dec!(99)));
        assert_eq!(verify_conservation(1, &entries), ConservationResult::Balanced);
    }

    #[test]
    fn flows_count_sales_and_goods() {
        let mut entries = sale(4, dec!(2.50)).to_vec();
        entries.extend(sale(4, dec!(1.25)));
        entries.push(make_entry(4, LedgerEntryType::Production, Decimal::ONE));

        let flows = tick_flows(4, &entries).unwrap_or_default();
        assert_eq!(flows.sales, 2);
        assert_eq!(flows.consumed, dec!(2));
        assert_eq!(flows.produced, dec!(1));
        assert_eq!(flows.wealth_debited, dec!(3.75));
        assert_eq!(flows.wealth_credited, dec!(3.75));
    }

    #[test]
    fn audit_accepts_matching_balances() {
        let mut entries = sale(1, dec!(5)).to_vec();
        entries.push(make_entry(1, LedgerEntryType::Production, Decimal::ONE));
        entries.push(make_entry(1, LedgerEntryType::Production, Decimal::ONE));

        let before = Balances { wealth: dec!(100), goods: 20 };
        let after = Balances { wealth: dec!(100), goods: 21 };
        assert_eq!(audit_tick(1, &entries, &before, &after), ConservationResult::Balanced);
    }

    #[test]
    fn audit_detects_wealth_created_outside_ledger() {
        let before = Balances { wealth: dec!(100), goods: 20 };
        let after = Balances { wealth: dec!(101), goods: 20 };
        let result = audit_tick(1, &[], &before, &after);
        let ConservationResult::Anomaly(anomaly) = result else {
            panic!("expected anomaly");
        };
        assert_eq!(anomaly.imbalances.get(&Commodity::Wealth), Some(&(dec!(100), dec!(101))));
    }

    #[test]
    fn audit_detects_unrecorded_goods() {
        let entries = vec![make_entry(1, LedgerEntryType::Production, Decimal::ONE)];
        let before = Balances { wealth: dec!(10), goods: 3 };
        let after = Balances { wealth: dec!(10), goods: 5 };
        let result = audit_tick(1, &entries, &before, &after);
        let ConservationResult::Anomaly(anomaly) = result else {
            panic!("expected anomaly");
        };
        assert_eq!(anomaly.imbalances.get(&Commodity::Goods), Some(&(dec!(4), dec!(5))));
    }

    #[test]
    fn anomaly_display_shows_message() {
        let anomaly = LedgerAnomaly {
            tick: 5,
            imbalances: BTreeMap::new(),
            message: "LEDGER_ANOMALY at tick 5: test display".to_owned(),
        };
        let display = format!("{anomaly}");
        assert!(display.contains("LEDGER_ANOMALY"));
        assert!(display.contains("tick 5"));
    }
}
