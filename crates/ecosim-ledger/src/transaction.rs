//! Transaction builder and validation for the ledger.
//!
//! Provides a [`TransactionBuilder`] that enforces the double-entry
//! invariant: every movement names a source (debit) and a destination
//! (credit) of the type its [`LedgerEntryType`] requires.

use rust_decimal::Decimal;

use ecosim_types::{AgentId, Commodity, EntityType, LedgerEntry, LedgerEntryId, LedgerEntryType};

use crate::LedgerError;

/// Builder for constructing validated [`LedgerEntry`] values.
///
/// # Examples
///
/// ```
/// use ecosim_ledger::TransactionBuilder;
/// use ecosim_types::{AgentId, EntityType, LedgerEntryId, LedgerEntryType};
/// use rust_decimal::Decimal;
///
/// let entry = TransactionBuilder::new(1, LedgerEntryType::Purchase)
///     .from(Some(AgentId::new(0)), EntityType::Agent)
///     .to(Some(AgentId::new(1)), EntityType::Agent)
///     .quantity(Decimal::new(5, 0))
///     .build(LedgerEntryId::new(0));
///
/// assert!(entry.is_ok());
/// ```
#[derive(Debug)]
pub struct TransactionBuilder {
    tick: u64,
    entry_type: LedgerEntryType,
    from: Option<(Option<AgentId>, EntityType)>,
    to: Option<(Option<AgentId>, EntityType)>,
    quantity: Option<Decimal>,
}

impl TransactionBuilder {
    /// Start building a ledger entry for the given tick and entry type.
    pub const fn new(tick: u64, entry_type: LedgerEntryType) -> Self {
        Self {
            tick,
            entry_type,
            from: None,
            to: None,
            quantity: None,
        }
    }

    /// Set the source entity (debit side).
    #[must_use]
    pub const fn from(mut self, entity: Option<AgentId>, entity_type: EntityType) -> Self {
        self.from = Some((entity, entity_type));
        self
    }

    /// Set the destination entity (credit side).
    #[must_use]
    pub const fn to(mut self, entity: Option<AgentId>, entity_type: EntityType) -> Self {
        self.to = Some((entity, entity_type));
        self
    }

    /// Set the quantity moved.
    #[must_use]
    pub const fn quantity(mut self, qty: Decimal) -> Self {
        self.quantity = Some(qty);
        self
    }

    /// Validate inputs and produce a [`LedgerEntry`] with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::MissingField`] if a side or the quantity is
    /// unset, [`LedgerError::ZeroQuantity`] / [`LedgerError::NegativeQuantity`]
    /// for non-positive quantities, and [`LedgerError::InvalidEntityType`] /
    /// [`LedgerError::EntityIdMismatch`] when the sides do not match the
    /// entry type's contract.
    pub fn build(self, id: LedgerEntryId) -> Result<LedgerEntry, LedgerError> {
        let quantity = self.quantity.ok_or(LedgerError::MissingField("quantity"))?;
        let (from_entity, from_entity_type) = self.from.ok_or(LedgerError::MissingField("from"))?;
        let (to_entity, to_entity_type) = self.to.ok_or(LedgerError::MissingField("to"))?;

        if quantity.is_zero() {
            return Err(LedgerError::ZeroQuantity);
        }
        if quantity.is_sign_negative() {
            return Err(LedgerError::NegativeQuantity { quantity });
        }

        let (expected_from, expected_to) = expected_entity_types(self.entry_type);
        validate_side(self.entry_type, "from", expected_from, from_entity_type, from_entity)?;
        validate_side(self.entry_type, "to", expected_to, to_entity_type, to_entity)?;

        Ok(LedgerEntry {
            id,
            tick: self.tick,
            entry_type: self.entry_type,
            from_entity,
            from_entity_type,
            to_entity,
            to_entity_type,
            commodity: commodity_of(self.entry_type),
            quantity,
        })
    }
}

/// Check one side of an entry against the expected entity type.
///
/// Agent sides must carry an id; world and void sides must not.
fn validate_side(
    entry_type: LedgerEntryType,
    side: &'static str,
    expected: EntityType,
    actual: EntityType,
    entity: Option<AgentId>,
) -> Result<(), LedgerError> {
    if actual != expected {
        return Err(LedgerError::InvalidEntityType {
            entry_type,
            side,
            expected,
            actual,
        });
    }
    let needs_id = matches!(actual, EntityType::Agent);
    if needs_id != entity.is_some() {
        return Err(LedgerError::EntityIdMismatch { entry_type, side });
    }
    Ok(())
}

/// Return the expected (from, to) entity types for each [`LedgerEntryType`].
const fn expected_entity_types(entry_type: LedgerEntryType) -> (EntityType, EntityType) {
    match entry_type {
        LedgerEntryType::Production => (EntityType::World, EntityType::Agent),
        LedgerEntryType::Purchase => (EntityType::Agent, EntityType::Agent),
        LedgerEntryType::Consumption => (EntityType::Agent, EntityType::Void),
    }
}

/// Return the commodity moved by each [`LedgerEntryType`].
pub const fn commodity_of(entry_type: LedgerEntryType) -> Commodity {
    match entry_type {
        LedgerEntryType::Production | LedgerEntryType::Consumption => Commodity::Goods,
        LedgerEntryType::Purchase => Commodity::Wealth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purchase() -> TransactionBuilder {
        TransactionBuilder::new(1, LedgerEntryType::Purchase)
            .from(Some(AgentId::new(0)), EntityType::Agent)
            .to(Some(AgentId::new(1)), EntityType::Agent)
    }

    #[test]
    fn builder_produces_valid_entry() {
        let result = purchase()
            .quantity(Decimal::new(5, 0))
            .build(LedgerEntryId::new(3));

        let entry = result.ok();
        assert!(entry.is_some());
        if let Some(e) = entry {
            assert_eq!(e.id, LedgerEntryId::new(3));
            assert_eq!(e.tick, 1);
            assert_eq!(e.entry_type, LedgerEntryType::Purchase);
            assert_eq!(e.commodity, Commodity::Wealth);
            assert_eq!(e.quantity, Decimal::new(5, 0));
        }
    }

    #[test]
    fn zero_quantity_rejected() {
        let result = purchase().quantity(Decimal::ZERO).build(LedgerEntryId::new(0));
        assert!(matches!(result.err(), Some(LedgerError::ZeroQuantity)));
    }

    #[test]
    fn negative_quantity_rejected() {
        let result = purchase()
            .quantity(Decimal::new(-3, 0))
            .build(LedgerEntryId::new(0));
        assert!(matches!(result.err(), Some(LedgerError::NegativeQuantity { .. })));
    }

    #[test]
    fn missing_quantity_rejected() {
        let result = purchase().build(LedgerEntryId::new(0));
        assert!(matches!(result.err(), Some(LedgerError::MissingField("quantity"))));
    }

    #[test]
    fn wrong_entity_type_rejected() {
        // Production expects World -> Agent, not Agent -> Agent.
        let result = TransactionBuilder::new(1, LedgerEntryType::Production)
            .from(Some(AgentId::new(0)), EntityType::Agent)
            .to(Some(AgentId::new(1)), EntityType::Agent)
            .quantity(Decimal::ONE)
            .build(LedgerEntryId::new(0));
        assert!(matches!(result.err(), Some(LedgerError::InvalidEntityType { side: "from", .. })));
    }

    #[test]
    fn agent_side_without_id_rejected() {
        let result = TransactionBuilder::new(1, LedgerEntryType::Consumption)
            .from(None, EntityType::Agent)
            .to(None, EntityType::Void)
            .quantity(Decimal::ONE)
            .build(LedgerEntryId::new(0));
        assert!(matches!(result.err(), Some(LedgerError::EntityIdMismatch { side: "from", .. })));
    }

    #[test]
    fn void_side_with_id_rejected() {
        let result = TransactionBuilder::new(1, LedgerEntryType::Consumption)
            .from(Some(AgentId::new(1)), EntityType::Agent)
            .to(Some(AgentId::new(2)), EntityType::Void)
            .quantity(Decimal::ONE)
            .build(LedgerEntryId::new(0));
        assert!(matches!(result.err(), Some(LedgerError::EntityIdMismatch { side: "to", .. })));
    }

    #[test]
    fn commodity_follows_entry_type() {
        assert_eq!(commodity_of(LedgerEntryType::Production), Commodity::Goods);
        assert_eq!(commodity_of(LedgerEntryType::Purchase), Commodity::Wealth);
        assert_eq!(commodity_of(LedgerEntryType::Consumption), Commodity::Goods);
    }
}
