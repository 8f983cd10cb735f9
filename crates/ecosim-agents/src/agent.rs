//! Agent variants and their initial attribute sampling.
//!
//! An [`Agent`] is a sum type over the two behavioral variants. Each variant
//! owns its fields; activation dispatches on the variant (see
//! [`crate::market::activate`]).
//!
//! Wealth is only mutated through the methods here, which reject any
//! change that would leave it negative.

use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;

use ecosim_types::{AgentId, AgentKind};

use crate::config::{AgentConfig, PRICE_SCALE};
use crate::error::AgentError;

// ---------------------------------------------------------------------------
// Consumer
// ---------------------------------------------------------------------------

/// An agent that spends wealth on goods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Consumer {
    id: AgentId,
    wealth: Decimal,
}

impl Consumer {
    /// Create a consumer with explicit starting wealth.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidConfig`] if `wealth` is negative.
    pub fn new(id: AgentId, wealth: Decimal) -> Result<Self, AgentError> {
        if wealth.is_sign_negative() && !wealth.is_zero() {
            return Err(AgentError::InvalidConfig {
                reason: format!("consumer {id} starting wealth {wealth} is negative"),
            });
        }
        Ok(Self { id, wealth })
    }

    /// The consumer's id.
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Current wealth.
    pub const fn wealth(&self) -> Decimal {
        self.wealth
    }

    /// Remove `amount` from the wallet.
    pub(crate) fn debit(&mut self, amount: Decimal) -> Result<(), AgentError> {
        self.wealth = checked_debit(self.id, self.wealth, amount)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Producer
// ---------------------------------------------------------------------------

/// An agent that makes one unit of goods per tick and sells at a fixed price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Producer {
    id: AgentId,
    goods: u32,
    price: Decimal,
    wealth: Decimal,
}

impl Producer {
    /// Create a producer with explicit inventory and price. Wealth starts
    /// at zero.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidConfig`] if `price` is not positive.
    pub fn new(id: AgentId, goods: u32, price: Decimal) -> Result<Self, AgentError> {
        if price.is_zero() || price.is_sign_negative() {
            return Err(AgentError::InvalidConfig {
                reason: format!("producer {id} price {price} must be positive"),
            });
        }
        Ok(Self {
            id,
            goods,
            price,
            wealth: Decimal::ZERO,
        })
    }

    /// The producer's id.
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Units of goods in stock.
    pub const fn goods(&self) -> u32 {
        self.goods
    }

    /// Fixed selling price, set at creation.
    pub const fn price(&self) -> Decimal {
        self.price
    }

    /// Wealth earned from sales.
    pub const fn wealth(&self) -> Decimal {
        self.wealth
    }

    /// Make one unit of goods. Inventory is unbounded.
    ///
    /// Returns the new inventory.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ArithmeticOverflow`] if the inventory would
    /// exceed `u32::MAX`.
    pub fn produce_goods(&mut self) -> Result<u32, AgentError> {
        self.goods = self
            .goods
            .checked_add(1)
            .ok_or_else(|| AgentError::ArithmeticOverflow {
                context: format!("producer {} inventory", self.id),
            })?;
        Ok(self.goods)
    }

    /// Hand over one unit of goods and collect `price`.
    pub(crate) fn sell_one(&mut self) -> Result<(), AgentError> {
        let goods = self
            .goods
            .checked_sub(1)
            .ok_or_else(|| AgentError::ArithmeticOverflow {
                context: format!("producer {} sold from empty inventory", self.id),
            })?;
        let wealth = self
            .wealth
            .checked_add(self.price)
            .ok_or_else(|| AgentError::ArithmeticOverflow {
                context: format!("producer {} wealth", self.id),
            })?;
        self.goods = goods;
        self.wealth = wealth;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

/// A member of the population.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Agent {
    /// Buys goods.
    Consumer(Consumer),
    /// Makes and sells goods.
    Producer(Producer),
}

impl Agent {
    /// Create the agent for creation index `index`, drawing its starting
    /// attributes from `rng`.
    ///
    /// Even indices become consumers with wealth drawn from
    /// `[consumer_wealth_min, consumer_wealth_max]`. Odd indices become
    /// producers with goods drawn from `[producer_goods_min,
    /// producer_goods_max]` and a price drawn over whole cents from
    /// `[producer_price_min, producer_price_max)`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidConfig`] if `config` fails validation.
    pub fn spawn<R: Rng + ?Sized>(
        index: u64,
        config: &AgentConfig,
        rng: &mut R,
    ) -> Result<Self, AgentError> {
        config.validate()?;
        let id = AgentId::new(index);
        match AgentKind::for_index(index) {
            AgentKind::Consumer => {
                let wealth =
                    rng.random_range(config.consumer_wealth_min..=config.consumer_wealth_max);
                Ok(Self::Consumer(Consumer::new(id, Decimal::from(wealth))?))
            }
            AgentKind::Producer => {
                let goods =
                    rng.random_range(config.producer_goods_min..=config.producer_goods_max);
                let (low, high) = config.price_bounds_minor();
                let minor = rng.random_range(low..high);
                let price = Decimal::new(minor, PRICE_SCALE);
                Ok(Self::Producer(Producer::new(id, goods, price)?))
            }
        }
    }

    /// The agent's id.
    pub const fn id(&self) -> AgentId {
        match self {
            Self::Consumer(c) => c.id,
            Self::Producer(p) => p.id,
        }
    }

    /// The agent's variant.
    pub const fn kind(&self) -> AgentKind {
        match self {
            Self::Consumer(_) => AgentKind::Consumer,
            Self::Producer(_) => AgentKind::Producer,
        }
    }

    /// Current wealth.
    pub const fn wealth(&self) -> Decimal {
        match self {
            Self::Consumer(c) => c.wealth,
            Self::Producer(p) => p.wealth,
        }
    }

    /// Goods in stock, for producers.
    pub const fn goods(&self) -> Option<u32> {
        match self {
            Self::Consumer(_) => None,
            Self::Producer(p) => Some(p.goods),
        }
    }

    /// Selling price, for producers.
    pub const fn price(&self) -> Option<Decimal> {
        match self {
            Self::Consumer(_) => None,
            Self::Producer(p) => Some(p.price),
        }
    }

    /// Borrow the producer variant, if this is one.
    pub const fn as_producer(&self) -> Option<&Producer> {
        match self {
            Self::Producer(p) => Some(p),
            Self::Consumer(_) => None,
        }
    }
}

/// Subtract `amount` from `wealth`, refusing to go below zero.
fn checked_debit(agent: AgentId, wealth: Decimal, amount: Decimal) -> Result<Decimal, AgentError> {
    let remaining = wealth
        .checked_sub(amount)
        .ok_or_else(|| AgentError::ArithmeticOverflow {
            context: format!("agent {agent} wealth"),
        })?;
    if remaining.is_sign_negative() && !remaining.is_zero() {
        return Err(AgentError::NegativeWealth {
            agent,
            wealth,
            amount,
        });
    }
    Ok(remaining)
}
