//! The population arena.
//!
//! Agents are stored in creation order and addressed by [`AgentId`], whose
//! raw value is the creation index. The population is fixed once the
//! economy is built: nothing here removes an agent.

use rust_decimal::Decimal;

use ecosim_ledger::Balances;
use ecosim_types::{AgentId, AgentKind};

use crate::agent::{Agent, Consumer, Producer};
use crate::error::AgentError;

/// All agents in the economy, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct Population {
    agents: Vec<Agent>,
}

impl Population {
    /// Create an empty population.
    pub const fn new() -> Self {
        Self { agents: Vec::new() }
    }

    /// Append an agent. Its id must equal the current population size.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::NonSequentialId`] if the id is out of order.
    pub fn push(&mut self, agent: Agent) -> Result<AgentId, AgentError> {
        let expected = self.next_id()?;
        let got = agent.id();
        if got != expected {
            return Err(AgentError::NonSequentialId { expected, got });
        }
        self.agents.push(agent);
        Ok(got)
    }

    /// The id the next pushed agent must carry.
    pub fn next_id(&self) -> Result<AgentId, AgentError> {
        u64::try_from(self.agents.len())
            .map(AgentId::new)
            .map_err(|err| AgentError::ArithmeticOverflow {
                context: format!("population size: {err}"),
            })
    }

    /// Look up an agent.
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        id.index().and_then(|i| self.agents.get(i))
    }

    /// Look up an agent for mutation.
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        id.index().and_then(|i| self.agents.get_mut(i))
    }

    /// Number of agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the population has no agents.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Iterate over agents in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    /// All ids in creation order.
    pub fn ids(&self) -> Vec<AgentId> {
        self.agents.iter().map(Agent::id).collect()
    }

    /// Iterate over the consumers.
    pub fn consumers(&self) -> impl Iterator<Item = &Consumer> {
        self.agents.iter().filter_map(|a| match a {
            Agent::Consumer(c) => Some(c),
            Agent::Producer(_) => None,
        })
    }

    /// Iterate over the producers.
    pub fn producers(&self) -> impl Iterator<Item = &Producer> {
        self.agents.iter().filter_map(Agent::as_producer)
    }

    /// Number of agents of a given kind.
    pub fn count_of(&self, kind: AgentKind) -> usize {
        self.agents.iter().filter(|a| a.kind() == kind).count()
    }

    /// Sum of wealth over agents of `kind`, or over everyone for `None`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ArithmeticOverflow`] if the sum overflows.
    pub fn wealth_of(&self, kind: Option<AgentKind>) -> Result<Decimal, AgentError> {
        self.agents
            .iter()
            .filter(|a| kind.is_none_or(|k| a.kind() == k))
            .try_fold(Decimal::ZERO, |acc, a| {
                acc.checked_add(a.wealth())
                    .ok_or_else(|| AgentError::ArithmeticOverflow {
                        context: "population wealth total".to_owned(),
                    })
            })
    }

    /// Sum of wealth over every agent.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ArithmeticOverflow`] if the sum overflows.
    pub fn total_wealth(&self) -> Result<Decimal, AgentError> {
        self.wealth_of(None)
    }

    /// Sum of goods over every producer.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ArithmeticOverflow`] if the sum overflows.
    pub fn total_goods(&self) -> Result<u64, AgentError> {
        self.producers().try_fold(0_u64, |acc, p| {
            acc.checked_add(u64::from(p.goods()))
                .ok_or_else(|| AgentError::ArithmeticOverflow {
                    context: "population goods total".to_owned(),
                })
        })
    }

    /// Aggregate holdings, for the per-tick ledger audit.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ArithmeticOverflow`] if a total overflows.
    pub fn balances(&self) -> Result<Balances, AgentError> {
        Ok(Balances {
            wealth: self.total_wealth()?,
            goods: self.total_goods()?,
        })
    }

    /// Borrow a consumer and a producer mutably at the same time.
    pub(crate) fn trade_pair_mut(
        &mut self,
        buyer: AgentId,
        seller: AgentId,
    ) -> Result<(&mut Consumer, &mut Producer), AgentError> {
        let b = buyer.index().ok_or(AgentError::AgentNotFound(buyer))?;
        let s = seller.index().ok_or(AgentError::AgentNotFound(seller))?;
        let (buyer_agent, seller_agent) = if b < s {
            let (low, high) = self
                .agents
                .split_at_mut_checked(s)
                .ok_or(AgentError::AgentNotFound(seller))?;
            (low.get_mut(b), high.first_mut())
        } else {
            let (low, high) = self
                .agents
                .split_at_mut_checked(b)
                .ok_or(AgentError::AgentNotFound(buyer))?;
            (high.first_mut(), low.get_mut(s))
        };
        let buyer_agent = buyer_agent.ok_or(AgentError::AgentNotFound(buyer))?;
        let seller_agent = seller_agent.ok_or(AgentError::AgentNotFound(seller))?;

        match (buyer_agent, seller_agent) {
            (Agent::Consumer(c), Agent::Producer(p)) => Ok((c, p)),
            (Agent::Producer(_), _) => Err(AgentError::WrongKind {
                agent: buyer,
                expected: AgentKind::Consumer,
                actual: AgentKind::Producer,
            }),
            (_, Agent::Consumer(_)) => Err(AgentError::WrongKind {
                agent: seller,
                expected: AgentKind::Producer,
                actual: AgentKind::Consumer,
            }),
        }
    }
}
