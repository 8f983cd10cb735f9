//! Model orchestration for the `EcoSim` micro-economy.
//!
//! # Modules
//!
//! - [`config`] -- Typed `ecosim-config.yaml` loading and validation.
//! - [`scheduler`] -- [`RandomActivation`]: one shuffled pass per tick.
//! - [`collector`] -- [`DataCollector`]: append-only per-agent and model logs.
//! - [`economy`] -- [`Economy`]: construction and the step cycle.
//! - [`runner`] -- [`run_simulation`]: the bounded tick loop.
//!
//! # Usage
//!
//! ```
//! use ecosim_core::{Economy, NoOpCallback, run_simulation};
//!
//! let mut economy = Economy::with_params(10, 10, 10, 42).ok();
//! if let Some(economy) = economy.as_mut() {
//!     let result = run_simulation(economy, 3, &mut NoOpCallback).ok();
//!     assert_eq!(result.map(|r| r.total_ticks), Some(3));
//!     assert_eq!(economy.collector().len(), 30);
//! }
//! ```

pub mod collector;
pub mod config;
pub mod economy;
pub mod runner;
pub mod scheduler;

pub use collector::DataCollector;
pub use config::{ConfigError, SimulationConfig};
pub use economy::{Economy, EconomyError, TickError, TickSummary};
pub use runner::{
    NoOpCallback, RunnerError, SimulationEndReason, SimulationResult, TickCallback,
    run_simulation,
};
pub use scheduler::RandomActivation;
