//! Error types for the ecosim-agents crate.
//!
//! "Cannot trade" conditions are not errors: they are reported as
//! [`PurchaseOutcome`] variants. The errors here are construction misuse
//! and integrity failures that must abort the tick.
//!
//! [`PurchaseOutcome`]: crate::market::PurchaseOutcome

use rust_decimal::Decimal;

use ecosim_types::{AgentId, AgentKind};

/// Errors that can occur during agent operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Sampling parameters or explicit attributes are invalid.
    #[error("invalid agent configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong.
        reason: String,
    },

    /// An arithmetic overflow occurred while updating an agent.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },

    /// Agent with the given ID is not in the population.
    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),

    /// The agent exists but is not of the kind the operation requires.
    #[error("agent {agent} is a {actual}, expected a {expected}")]
    WrongKind {
        /// The agent.
        agent: AgentId,
        /// Kind the operation requires.
        expected: AgentKind,
        /// Kind the agent actually has.
        actual: AgentKind,
    },

    /// An agent was added out of creation order.
    #[error("agent {got} added where id {expected} was expected")]
    NonSequentialId {
        /// The id the arena expected next.
        expected: AgentId,
        /// The id that was supplied.
        got: AgentId,
    },

    /// A mutation would have driven wealth below zero.
    #[error("agent {agent} wealth would become negative ({wealth} - {amount})")]
    NegativeWealth {
        /// The agent.
        agent: AgentId,
        /// Wealth before the mutation.
        wealth: Decimal,
        /// Amount that was to be removed.
        amount: Decimal,
    },

    /// The ledger rejected a movement.
    #[error("ledger error: {source}")]
    Ledger {
        /// The underlying ledger error.
        #[from]
        source: ecosim_ledger::LedgerError,
    },
}
