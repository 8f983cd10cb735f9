//! The ledger: an append-only log of every production and sale.
//!
//! # Design
//!
//! - **Append-only**: entries are never modified or deleted.
//! - **Double-entry**: every movement has a debit (from) and credit (to).
//! - **Tick-ordered**: entries are appended in non-decreasing tick order,
//!   so the entries of one tick form a contiguous slice.
//! - **Precision**: all quantities use [`Decimal`] -- no floating point.

use rust_decimal::Decimal;
use tracing::trace;

use ecosim_types::{AgentId, EntityType, LedgerEntry, LedgerEntryId, LedgerEntryType};

use crate::conservation::{self, Balances, ConservationResult, TickFlows};
use crate::{LedgerAnomaly, LedgerError, TransactionBuilder};

/// The ledger tracking all goods and wealth movements in a run.
#[derive(Debug, Default)]
pub struct Ledger {
    /// All entries, in insertion order.
    entries: Vec<LedgerEntry>,
    /// Id assigned to the next appended entry.
    next_id: u64,
}

impl Ledger {
    /// Create a new empty ledger.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Return the number of entries in the ledger.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return whether the ledger has no entries.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record one unit of goods made by a producer (world to agent).
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the entry fails validation or the tick
    /// is earlier than the last recorded tick.
    pub fn record_production(
        &mut self,
        tick: u64,
        producer: AgentId,
    ) -> Result<&LedgerEntry, LedgerError> {
        let entry = TransactionBuilder::new(tick, LedgerEntryType::Production)
            .from(None, EntityType::World)
            .to(Some(producer), EntityType::Agent)
            .quantity(Decimal::ONE)
            .build(self.peek_id(0)?)?;
        self.push(entry)
    }

    /// Record a completed sale of one unit of goods at `price`.
    ///
    /// Appends two entries: a `Purchase` moving `price` wealth from the
    /// consumer to the producer, and a `Consumption` removing one unit of
    /// goods from the producer. Both are validated before either is
    /// appended.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if either entry fails validation or the tick
    /// is earlier than the last recorded tick.
    pub fn record_sale(
        &mut self,
        tick: u64,
        consumer: AgentId,
        producer: AgentId,
        price: Decimal,
    ) -> Result<(), LedgerError> {
        let purchase = TransactionBuilder::new(tick, LedgerEntryType::Purchase)
            .from(Some(consumer), EntityType::Agent)
            .to(Some(producer), EntityType::Agent)
            .quantity(price)
            .build(self.peek_id(0)?)?;
        let consumption = TransactionBuilder::new(tick, LedgerEntryType::Consumption)
            .from(Some(producer), EntityType::Agent)
            .to(None, EntityType::Void)
            .quantity(Decimal::ONE)
            .build(self.peek_id(1)?)?;

        self.push(purchase)?;
        self.push(consumption)?;
        Ok(())
    }

    /// Return all entries for a given tick.
    pub fn entries_for_tick(&self, tick: u64) -> &[LedgerEntry] {
        let start = self.entries.partition_point(|e| e.tick < tick);
        let end = self.entries.partition_point(|e| e.tick <= tick);
        self.entries.get(start..end).unwrap_or(&[])
    }

    /// Return all entries, in insertion order.
    pub fn all_entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Sum the movements recorded for a tick.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerAnomaly`] if summation overflows.
    pub fn flows_for_tick(&self, tick: u64) -> Result<TickFlows, LedgerAnomaly> {
        conservation::tick_flows(tick, self.entries_for_tick(tick))
    }

    /// Verify that wealth debited equals wealth credited for a tick.
    pub fn verify_conservation(&self, tick: u64) -> ConservationResult {
        conservation::verify_conservation(tick, self.entries_for_tick(tick))
    }

    /// Audit a tick's recorded movements against the population's balances
    /// taken before and after it.
    pub fn audit_tick(&self, tick: u64, before: &Balances, after: &Balances) -> ConservationResult {
        conservation::audit_tick(tick, self.entries_for_tick(tick), before, after)
    }

    /// Compute the id the entry `offset` positions ahead will receive.
    fn peek_id(&self, offset: u64) -> Result<LedgerEntryId, LedgerError> {
        self.next_id
            .checked_add(offset)
            .map(LedgerEntryId::new)
            .ok_or(LedgerError::IdOverflow)
    }

    /// Append a validated entry, enforcing tick order.
    fn push(&mut self, entry: LedgerEntry) -> Result<&LedgerEntry, LedgerError> {
        if let Some(last) = self.entries.last() {
            if entry.tick < last.tick {
                return Err(LedgerError::TickRegression {
                    tick: entry.tick,
                    last_tick: last.tick,
                });
            }
        }
        self.next_id = self.next_id.checked_add(1).ok_or(LedgerError::IdOverflow)?;
        trace!(
            entry_id = %entry.id,
            tick = entry.tick,
            entry_type = ?entry.entry_type,
            quantity = %entry.quantity,
            "Ledger entry recorded"
        );
        self.entries.push(entry);
        self.entries.last().ok_or(LedgerError::MissingField("entry"))
    }
}
