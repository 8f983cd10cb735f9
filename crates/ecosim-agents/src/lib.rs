//! Agents of the `EcoSim` micro-economy.
//!
//! - [`agent`] -- The [`Agent`] sum type over [`Consumer`] and [`Producer`],
//!   and seeded sampling of starting attributes.
//! - [`population`] -- The [`Population`] arena, indexed by agent id.
//! - [`market`] -- The purchase protocol and per-agent activation.
//! - [`config`] -- Sampling ranges for starting attributes.
//! - [`error`] -- The [`AgentError`] type.
//!
//! Every stochastic decision takes the caller's generator, so a single
//! seeded source can drive a whole run.

pub mod agent;
pub mod config;
pub mod error;
pub mod market;
pub mod population;

pub use agent::{Agent, Consumer, Producer};
pub use config::AgentConfig;
pub use error::AgentError;
pub use market::{Activation, PurchaseOutcome, TradeReceipt};
pub use population::Population;
