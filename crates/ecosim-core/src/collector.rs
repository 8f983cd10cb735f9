//! Append-only data collection.
//!
//! Each [`DataCollector::collect`] call appends one [`WealthRecord`] per
//! agent and one [`EconomyStats`] row. Records are never updated or
//! removed; every read is a projection over the log.

use std::collections::BTreeMap;

use ecosim_agents::{AgentError, Population};
use ecosim_types::{AgentId, AgentKind, EconomyStats, WealthRecord};

/// The per-agent and model-level observation log.
#[derive(Debug, Clone, Default)]
pub struct DataCollector {
    agent_records: Vec<WealthRecord>,
    model_records: Vec<EconomyStats>,
}

impl DataCollector {
    /// Create an empty collector.
    pub const fn new() -> Self {
        Self {
            agent_records: Vec::new(),
            model_records: Vec::new(),
        }
    }

    /// Record every agent's wealth and the economy totals at `step`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ArithmeticOverflow`] if a total overflows.
    /// Nothing is appended in that case.
    pub fn collect(
        &mut self,
        step: u64,
        population: &Population,
        trades_completed: u64,
    ) -> Result<(), AgentError> {
        let stats = EconomyStats {
            step,
            consumer_wealth: population.wealth_of(Some(AgentKind::Consumer))?,
            producer_wealth: population.wealth_of(Some(AgentKind::Producer))?,
            total_goods: population.total_goods()?,
            trades_completed,
        };
        self.agent_records
            .extend(population.iter().map(|agent| WealthRecord {
                step,
                agent_id: agent.id(),
                kind: agent.kind(),
                wealth: agent.wealth(),
            }));
        self.model_records.push(stats);
        Ok(())
    }

    /// The full per-agent log in append order (by step, then agent id).
    pub fn records(&self) -> &[WealthRecord] {
        &self.agent_records
    }

    /// The model-level log, one row per collection.
    pub fn model_records(&self) -> &[EconomyStats] {
        &self.model_records
    }

    /// Number of per-agent records.
    pub fn len(&self) -> usize {
        self.agent_records.len()
    }

    /// Whether nothing has been collected yet.
    pub fn is_empty(&self) -> bool {
        self.agent_records.is_empty()
    }

    /// One agent's records, ordered by step.
    pub fn records_for_agent(&self, id: AgentId) -> Vec<&WealthRecord> {
        self.agent_records
            .iter()
            .filter(|r| r.agent_id == id)
            .collect()
    }

    /// Every agent's record for one step, ordered by agent id.
    pub fn records_for_step(&self, step: u64) -> Vec<&WealthRecord> {
        self.agent_records
            .iter()
            .filter(|r| r.step == step)
            .collect()
    }

    /// Records grouped by agent, each group ordered by step.
    pub fn by_agent(&self) -> BTreeMap<AgentId, Vec<&WealthRecord>> {
        let mut grouped: BTreeMap<AgentId, Vec<&WealthRecord>> = BTreeMap::new();
        for record in &self.agent_records {
            grouped.entry(record.agent_id).or_default().push(record);
        }
        grouped
    }

    /// Only the consumers' records.
    pub fn consumer_records(&self) -> impl Iterator<Item = &WealthRecord> {
        self.records_of_kind(AgentKind::Consumer)
    }

    /// Only the records of agents of `kind`.
    pub fn records_of_kind(&self, kind: AgentKind) -> impl Iterator<Item = &WealthRecord> {
        self.agent_records.iter().filter(move |r| r.kind == kind)
    }

    /// The last `n` records, or all of them if fewer exist.
    pub fn tail(&self, n: usize) -> &[WealthRecord] {
        let start = self.agent_records.len().saturating_sub(n);
        self.agent_records.get(start..).unwrap_or_default()
    }
}
