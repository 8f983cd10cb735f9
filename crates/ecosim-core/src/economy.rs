//! The economy model: population, scheduler, collector and grid.
//!
//! A single seeded [`StdRng`] owned by the [`Economy`] drives every
//! stochastic decision, in this order:
//!
//! 1. Construction: for each agent in id order, its starting attributes,
//!    then its grid column and row.
//! 2. Each step: the activation permutation, then each consumer's
//!    counterparty choice in activation order.
//!
//! Two economies built from the same config therefore produce identical
//! collector logs.
//!
//! # Step Order
//!
//! ```text
//! collect (pre-tick snapshot, tagged with the current step counter)
//!   -> activate every agent once, in a fresh random order
//!   -> audit the ledger against population balances
//!   -> advance the step counter
//! ```
//!
//! Because collection precedes activation, the record for step `t` holds
//! the state before tick `t` ran. The first collection equals the
//! construction-time state, and the effects of the last tick are only
//! observed by a later collection.

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, error, info};

use ecosim_agents::market::{self, Activation, PurchaseOutcome};
use ecosim_agents::{Agent, AgentError, Population};
use ecosim_ledger::{ConservationResult, Ledger, LedgerAnomaly};
use ecosim_types::{AgentId, AgentKind, MatchFailure};
use ecosim_world::{MultiGrid, WorldError};

use crate::collector::DataCollector;
use crate::config::{ConfigError, SimulationConfig};
use crate::scheduler::RandomActivation;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while building an economy.
#[derive(Debug, thiserror::Error)]
pub enum EconomyError {
    /// The construction parameters cannot produce a valid economy.
    #[error("invalid economy configuration: {reason}")]
    InvalidConfig {
        /// What is wrong.
        reason: String,
    },

    /// Agent creation failed.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },

    /// Grid placement failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

impl From<ConfigError> for EconomyError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfig {
            reason: err.to_string(),
        }
    }
}

/// Errors that abort a step. Every one of them is fatal to the run.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// An agent's activation failed.
    #[error("agent error for {agent_id}: {source}")]
    Agent {
        /// The agent whose turn failed.
        agent_id: AgentId,
        /// The underlying agent error.
        source: AgentError,
    },

    /// Collecting or totaling population state failed.
    #[error("population error: {source}")]
    Population {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },

    /// Population balances disagree with the ledger.
    #[error("conservation violated: {anomaly}")]
    Conservation {
        /// The detected anomaly.
        anomaly: LedgerAnomaly,
    },
}

// ---------------------------------------------------------------------------
// Tick summary
// ---------------------------------------------------------------------------

/// What happened during one step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TickSummary {
    /// Step index of the tick, equal to the collector step of its
    /// pre-tick snapshot.
    pub step: u64,
    /// Number of agents activated.
    pub activations: u64,
    /// Trades completed during this tick.
    pub trades: u64,
    /// Purchase attempts that did not trade, by reason.
    pub failed_matches: BTreeMap<MatchFailure, u64>,
    /// Units of goods produced during this tick.
    pub goods_produced: u64,
}

impl TickSummary {
    fn tally(&mut self, activation: &Activation) {
        self.activations = self.activations.saturating_add(1);
        match activation {
            Activation::Produced { .. } => {
                self.goods_produced = self.goods_produced.saturating_add(1);
            }
            Activation::Purchase { outcome, .. } => match outcome.failure() {
                None => self.trades = self.trades.saturating_add(1),
                Some(reason) => {
                    let count = self.failed_matches.entry(reason).or_insert(0);
                    *count = count.saturating_add(1);
                }
            },
        }
    }

    /// Total failed purchase attempts across all reasons.
    pub fn failed_total(&self) -> u64 {
        self.failed_matches
            .values()
            .fold(0_u64, |acc, n| acc.saturating_add(*n))
    }
}

// ---------------------------------------------------------------------------
// Economy
// ---------------------------------------------------------------------------

/// The simulation model.
#[derive(Debug)]
pub struct Economy {
    population: Population,
    scheduler: RandomActivation,
    collector: DataCollector,
    grid: MultiGrid,
    ledger: Ledger,
    rng: StdRng,
    seed: u64,
    running: bool,
    trades_completed: u64,
}

impl Economy {
    /// Build an economy from a configuration.
    ///
    /// Creates `population.num_agents` agents. Even ids are consumers and
    /// odd ids are producers. Each is registered with the scheduler and
    /// placed on a random grid cell.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::InvalidConfig`] if the config fails
    /// validation (zero agents, zero grid dimension, empty sampling range).
    pub fn new(config: &SimulationConfig) -> Result<Self, EconomyError> {
        config.validate()?;

        let seed = config.world.seed;
        let mut rng = StdRng::seed_from_u64(seed);
        let mut grid = MultiGrid::new(config.world.width, config.world.height, config.world.torus)?;
        let mut population = Population::new();
        let mut scheduler = RandomActivation::new();

        for index in 0..u64::from(config.population.num_agents) {
            let agent = Agent::spawn(index, &config.agents, &mut rng)?;
            let id = population.push(agent)?;
            scheduler.add(id);
            let position = grid.random_position(&mut rng);
            grid.place_agent(id, position)?;
        }

        info!(
            world_name = config.world.name,
            seed,
            num_agents = population.len(),
            consumers = population.count_of(AgentKind::Consumer),
            producers = population.count_of(AgentKind::Producer),
            width = grid.width(),
            height = grid.height(),
            torus = grid.is_torus(),
            "Economy constructed"
        );

        Ok(Self {
            population,
            scheduler,
            collector: DataCollector::new(),
            grid,
            ledger: Ledger::new(),
            rng,
            seed,
            running: true,
            trades_completed: 0,
        })
    }

    /// Build an economy with default sampling ranges and an explicit size,
    /// grid and seed.
    ///
    /// # Errors
    ///
    /// Same as [`Economy::new`].
    pub fn with_params(
        num_agents: u32,
        width: u32,
        height: u32,
        seed: u64,
    ) -> Result<Self, EconomyError> {
        let mut config = SimulationConfig::default();
        config.population.num_agents = num_agents;
        config.world.width = width;
        config.world.height = height;
        config.world.seed = seed;
        Self::new(&config)
    }

    /// Advance the model by one tick.
    ///
    /// # Errors
    ///
    /// Returns [`TickError`] if any agent's turn fails or the conservation
    /// audit finds an imbalance. A failed tick clears [`Economy::running`],
    /// so [`run_simulation`](crate::runner::run_simulation) will not step
    /// it again.
    pub fn step(&mut self) -> Result<TickSummary, TickError> {
        let result = self.run_tick();
        if let Err(err) = &result {
            error!(
                step = self.scheduler.steps(),
                error = %err,
                "Tick failed, economy halted"
            );
            self.running = false;
        }
        result
    }

    fn run_tick(&mut self) -> Result<TickSummary, TickError> {
        let step = self.scheduler.steps();

        // Totals are checked before the snapshot lands in the log.
        let before = self.population.balances()?;
        self.collector
            .collect(step, &self.population, self.trades_completed)?;

        let mut summary = TickSummary {
            step,
            ..TickSummary::default()
        };
        for id in self.scheduler.activation_order(&mut self.rng) {
            let activation = market::activate(
                &mut self.population,
                id,
                &mut self.rng,
                &mut self.ledger,
                step,
            )
            .map_err(|source| TickError::Agent {
                agent_id: id,
                source,
            })?;
            if let Activation::Purchase {
                outcome: PurchaseOutcome::Completed(_),
                ..
            } = activation
            {
                self.trades_completed = self.trades_completed.saturating_add(1);
            }
            summary.tally(&activation);
        }

        let after = self.population.balances()?;
        if let ConservationResult::Anomaly(anomaly) = self.ledger.audit_tick(step, &before, &after)
        {
            error!(step, anomaly = %anomaly, "Conservation audit failed");
            return Err(TickError::Conservation { anomaly });
        }

        self.scheduler.advance();

        debug!(
            step,
            trades = summary.trades,
            failed = summary.failed_total(),
            goods_produced = summary.goods_produced,
            total_goods = after.goods,
            "Tick complete"
        );

        Ok(summary)
    }

    /// Whether the driver should keep stepping.
    pub const fn running(&self) -> bool {
        self.running
    }

    /// Ask the driver to stop. Stepping remains possible.
    pub fn stop(&mut self) {
        if self.running {
            info!(step = self.scheduler.steps(), "Economy stop requested");
        }
        self.running = false;
    }

    /// Completed steps.
    pub const fn steps(&self) -> u64 {
        self.scheduler.steps()
    }

    /// The seed the economy was built from.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Trades completed since construction.
    pub const fn trades_completed(&self) -> u64 {
        self.trades_completed
    }

    /// The agents.
    pub const fn population(&self) -> &Population {
        &self.population
    }

    /// The scheduler.
    pub const fn scheduler(&self) -> &RandomActivation {
        &self.scheduler
    }

    /// The observation log.
    pub const fn collector(&self) -> &DataCollector {
        &self.collector
    }

    /// The placement grid.
    pub const fn grid(&self) -> &MultiGrid {
        &self.grid
    }

    /// Every production and trade recorded so far.
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Take an extra snapshot of the current state without stepping, for
    /// drivers that want the last tick's effects in the log.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Population`] if a total overflows.
    pub fn collect(&mut self) -> Result<(), TickError> {
        self.collector
            .collect(self.scheduler.steps(), &self.population, self.trades_completed)?;
        Ok(())
    }
}
