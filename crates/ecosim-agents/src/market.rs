//! The purchase protocol and per-agent activation.
//!
//! A consumer's turn is one purchase attempt:
//!
//! 1. A consumer with no wealth does nothing (and draws no randomness).
//! 2. Otherwise it picks a counterparty uniformly from the whole population,
//!    itself and other consumers included.
//! 3. The attempt is a no-op if the counterparty is not a producer, has no
//!    goods, or asks more than the consumer holds.
//! 4. Otherwise one unit changes hands for exactly `price`.
//!
//! Failed matches are ordinary outcomes, reported as [`PurchaseOutcome`]
//! variants. Only integrity failures are errors.
//!
//! A producer's turn makes one unit of goods.

use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, trace};

use ecosim_ledger::Ledger;
use ecosim_types::{AgentId, MatchFailure};

use crate::agent::Agent;
use crate::error::AgentError;
use crate::population::Population;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Details of a completed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TradeReceipt {
    /// The buying consumer.
    pub buyer: AgentId,
    /// The selling producer.
    pub seller: AgentId,
    /// Wealth moved from buyer to seller.
    pub price: Decimal,
}

/// What happened when a consumer tried to buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PurchaseOutcome {
    /// One unit of goods was bought.
    Completed(TradeReceipt),
    /// The consumer had no wealth.
    Broke,
    /// The chosen counterparty was not a producer.
    NotAProducer {
        /// The agent that was chosen.
        counterparty: AgentId,
    },
    /// The chosen producer had no goods.
    OutOfStock {
        /// The producer that was chosen.
        producer: AgentId,
    },
    /// The consumer could not pay the producer's price.
    CannotAfford {
        /// The producer that was chosen.
        producer: AgentId,
        /// The price asked.
        price: Decimal,
    },
}

impl PurchaseOutcome {
    /// The reason the purchase did not happen, or `None` if it did.
    pub const fn failure(&self) -> Option<MatchFailure> {
        match self {
            Self::Completed(_) => None,
            Self::Broke => Some(MatchFailure::Broke),
            Self::NotAProducer { .. } => Some(MatchFailure::NotAProducer),
            Self::OutOfStock { .. } => Some(MatchFailure::OutOfStock),
            Self::CannotAfford { .. } => Some(MatchFailure::CannotAfford),
        }
    }

    /// Whether a trade took place.
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// The effect of one agent's activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Activation {
    /// A producer made one unit; carries its new inventory.
    Produced {
        /// The producer.
        producer: AgentId,
        /// Inventory after production.
        goods: u32,
    },
    /// A consumer attempted a purchase.
    Purchase {
        /// The consumer.
        consumer: AgentId,
        /// How the attempt ended.
        outcome: PurchaseOutcome,
    },
}

// ---------------------------------------------------------------------------
// Protocol
// ---------------------------------------------------------------------------

/// Pick a counterparty uniformly from the whole population.
///
/// # Errors
///
/// Returns [`AgentError::InvalidConfig`] if the population is empty.
pub fn choose_counterparty<R: Rng + ?Sized>(
    population: &Population,
    rng: &mut R,
) -> Result<AgentId, AgentError> {
    if population.is_empty() {
        return Err(AgentError::InvalidConfig {
            reason: "cannot choose a counterparty from an empty population".to_owned(),
        });
    }
    let index = rng.random_range(0..population.len());
    u64::try_from(index)
        .map(AgentId::new)
        .map_err(|err| AgentError::ArithmeticOverflow {
            context: format!("counterparty index: {err}"),
        })
}

/// Attempt a purchase by `buyer` from `seller`.
///
/// On success the producer loses one unit of goods, the consumer pays
/// `price` and the producer receives it, and the sale is written to the
/// ledger. On any no-op outcome nothing is mutated.
///
/// # Errors
///
/// Returns [`AgentError`] if either agent is missing, the buyer is not a
/// consumer, or the ledger rejects the sale.
pub fn execute_purchase(
    population: &mut Population,
    buyer: AgentId,
    seller: AgentId,
    ledger: &mut Ledger,
    tick: u64,
) -> Result<PurchaseOutcome, AgentError> {
    let buyer_agent = population.get(buyer).ok_or(AgentError::AgentNotFound(buyer))?;
    let wealth = match buyer_agent {
        Agent::Consumer(c) => c.wealth(),
        Agent::Producer(_) => {
            return Err(AgentError::WrongKind {
                agent: buyer,
                expected: ecosim_types::AgentKind::Consumer,
                actual: ecosim_types::AgentKind::Producer,
            });
        }
    };
    if wealth <= Decimal::ZERO {
        return Ok(PurchaseOutcome::Broke);
    }

    let seller_agent = population
        .get(seller)
        .ok_or(AgentError::AgentNotFound(seller))?;
    let Some(producer) = seller_agent.as_producer() else {
        return Ok(PurchaseOutcome::NotAProducer {
            counterparty: seller,
        });
    };
    if producer.goods() == 0 {
        return Ok(PurchaseOutcome::OutOfStock { producer: seller });
    }
    let price = producer.price();
    if wealth < price {
        return Ok(PurchaseOutcome::CannotAfford {
            producer: seller,
            price,
        });
    }

    // Record first: if the ledger refuses, no balance has moved yet.
    ledger.record_sale(tick, buyer, seller, price)?;

    let (consumer, producer) = population.trade_pair_mut(buyer, seller)?;
    consumer.debit(price)?;
    producer.sell_one()?;

    debug!(
        tick,
        %buyer,
        %seller,
        %price,
        buyer_wealth = %consumer.wealth(),
        seller_goods = producer.goods(),
        "Trade completed"
    );

    Ok(PurchaseOutcome::Completed(TradeReceipt {
        buyer,
        seller,
        price,
    }))
}

/// A consumer's full turn: check for wealth, pick a counterparty, try to buy.
///
/// # Errors
///
/// Returns [`AgentError`] on the same conditions as [`execute_purchase`].
pub fn buy_goods<R: Rng + ?Sized>(
    population: &mut Population,
    consumer: AgentId,
    rng: &mut R,
    ledger: &mut Ledger,
    tick: u64,
) -> Result<PurchaseOutcome, AgentError> {
    let wealth = population
        .get(consumer)
        .ok_or(AgentError::AgentNotFound(consumer))?
        .wealth();
    if wealth <= Decimal::ZERO {
        trace!(tick, %consumer, "Consumer is broke");
        return Ok(PurchaseOutcome::Broke);
    }

    let counterparty = choose_counterparty(population, rng)?;
    let outcome = execute_purchase(population, consumer, counterparty, ledger, tick)?;
    if let Some(reason) = outcome.failure() {
        trace!(tick, %consumer, %counterparty, ?reason, "No trade");
    }
    Ok(outcome)
}

/// Run one agent's turn.
///
/// # Errors
///
/// Returns [`AgentError`] if the agent is missing, production overflows,
/// the purchase protocol fails, or the ledger rejects a movement.
pub fn activate<R: Rng + ?Sized>(
    population: &mut Population,
    id: AgentId,
    rng: &mut R,
    ledger: &mut Ledger,
    tick: u64,
) -> Result<Activation, AgentError> {
    let agent = population.get_mut(id).ok_or(AgentError::AgentNotFound(id))?;
    match agent {
        Agent::Producer(producer) => {
            let goods = producer.produce_goods()?;
            ledger.record_production(tick, id)?;
            trace!(tick, producer = %id, goods, "Produced");
            Ok(Activation::Produced { producer: id, goods })
        }
        Agent::Consumer(_) => {
            let outcome = buy_goods(population, id, rng, ledger, tick)?;
            Ok(Activation::Purchase {
                consumer: id,
                outcome,
            })
        }
    }
}
