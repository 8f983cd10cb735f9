//! Tick callback that logs run progress.

use ecosim_core::{Economy, TickCallback, TickSummary};
use tracing::{debug, info};

/// Logs every tick at debug level and a model summary every `interval`
/// ticks at info level.
pub struct ProgressCallback {
    interval: u64,
    ticks: u64,
}

impl ProgressCallback {
    /// Create a callback that reports every `interval` ticks. An interval
    /// of 0 disables the periodic report.
    pub const fn new(interval: u64) -> Self {
        Self { interval, ticks: 0 }
    }
}

impl TickCallback for ProgressCallback {
    fn on_tick(&mut self, summary: &TickSummary, economy: &mut Economy) {
        self.ticks = self.ticks.saturating_add(1);
        debug!(
            step = summary.step,
            trades = summary.trades,
            failed = summary.failed_total(),
            failed_by_reason = ?summary.failed_matches,
            "Tick"
        );

        if self.interval == 0 || self.ticks.checked_rem(self.interval) != Some(0) {
            return;
        }
        if let Some(stats) = economy.collector().model_records().last() {
            info!(
                step = stats.step,
                consumer_wealth = %stats.consumer_wealth,
                producer_wealth = %stats.producer_wealth,
                total_goods = stats.total_goods,
                trades_completed = stats.trades_completed,
                "Progress"
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ecosim_core::run_simulation;

    use super::*;

    #[test]
    fn counts_ticks() {
        let mut economy = Economy::with_params(6, 5, 5, 1).unwrap();
        let mut callback = ProgressCallback::new(2);
        run_simulation(&mut economy, 5, &mut callback).unwrap();
        assert_eq!(callback.ticks, 5);
    }

    #[test]
    fn zero_interval_is_allowed() {
        let mut economy = Economy::with_params(6, 5, 5, 1).unwrap();
        let mut callback = ProgressCallback::new(0);
        run_simulation(&mut economy, 3, &mut callback).unwrap();
        assert_eq!(callback.ticks, 3);
    }
}
