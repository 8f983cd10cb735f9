//! Bounded simulation loop.
//!
//! [`run_simulation`] steps an [`Economy`] until one of:
//!
//! - **Tick limit**: `max_ticks` steps have completed in this run
//! - **Stop**: the economy's `running` flag is cleared, by the callback or
//!   by any other holder of the economy between steps
//!
//! A tick error ends the run immediately and is returned to the caller.

use serde::Serialize;
use tracing::info;

use crate::economy::{Economy, TickError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SimulationEndReason {
    /// The configured number of ticks completed.
    MaxTicksReached,
    /// The economy stopped running.
    Stopped,
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
}

/// Callback invoked after each tick completes.
pub trait TickCallback {
    /// Called after a tick completes successfully. May call
    /// [`Economy::stop`] to end the run.
    fn on_tick(&mut self, summary: &TickSummary, economy: &mut Economy);
}

/// A no-op tick callback.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _economy: &mut Economy) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick fails.
pub fn run_simulation(
    economy: &mut Economy,
    max_ticks: u64,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    info!(
        max_ticks,
        seed = economy.seed(),
        num_agents = economy.population().len(),
        "Simulation starting"
    );

    loop {
        // --- Check stop (before tick) ---
        if !economy.running() {
            info!(total_ticks, "Economy stopped");
            return Ok(finish(SimulationEndReason::Stopped, last_summary, total_ticks));
        }

        // --- Check tick limit (before tick) ---
        if total_ticks >= max_ticks {
            info!(total_ticks, max_ticks, "Tick limit reached");
            return Ok(finish(
                SimulationEndReason::MaxTicksReached,
                last_summary,
                total_ticks,
            ));
        }

        // --- Execute tick ---
        let summary = economy.step()?;
        total_ticks = total_ticks.saturating_add(1);

        // --- Notify callback ---
        callback.on_tick(&summary, economy);

        last_summary = Some(summary);
    }
}

const fn finish(
    end_reason: SimulationEndReason,
    final_summary: Option<TickSummary>,
    total_ticks: u64,
) -> SimulationResult {
    SimulationResult {
        end_reason,
        final_summary,
        total_ticks,
    }
}

/// Log the end of a run.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_step = result.final_summary.as_ref().map(|s| s.step),
        final_trades = result.final_summary.as_ref().map(|s| s.trades),
        "Simulation ended"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Stops the economy once `after` ticks have been seen.
    struct StopAfter {
        after: u64,
        seen: u64,
    }

    impl TickCallback for StopAfter {
        fn on_tick(&mut self, _summary: &TickSummary, economy: &mut Economy) {
            self.seen = self.seen.saturating_add(1);
            if self.seen >= self.after {
                economy.stop();
            }
        }
    }

    #[test]
    fn runs_exactly_max_ticks() {
        let mut economy = Economy::with_params(10, 10, 10, 42).unwrap();
        let result = run_simulation(&mut economy, 5, &mut NoOpCallback).unwrap();
        assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(result.final_summary.unwrap().step, 4);
        assert_eq!(economy.collector().len(), 50);
    }

    #[test]
    fn zero_ticks_does_nothing() {
        let mut economy = Economy::with_params(4, 10, 10, 42).unwrap();
        let result = run_simulation(&mut economy, 0, &mut NoOpCallback).unwrap();
        assert_eq!(result.total_ticks, 0);
        assert!(result.final_summary.is_none());
        assert!(economy.collector().is_empty());
    }

    #[test]
    fn callback_can_stop_the_run() {
        let mut economy = Economy::with_params(6, 10, 10, 42).unwrap();
        let mut callback = StopAfter { after: 3, seen: 0 };
        let result = run_simulation(&mut economy, 100, &mut callback).unwrap();
        assert_eq!(result.end_reason, SimulationEndReason::Stopped);
        assert_eq!(result.total_ticks, 3);
        assert_eq!(economy.steps(), 3);
    }

    #[test]
    fn stopped_economy_runs_no_ticks() {
        let mut economy = Economy::with_params(6, 10, 10, 42).unwrap();
        economy.stop();
        let result = run_simulation(&mut economy, 10, &mut NoOpCallback).unwrap();
        assert_eq!(result.end_reason, SimulationEndReason::Stopped);
        assert_eq!(result.total_ticks, 0);
    }
}
