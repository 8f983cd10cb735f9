//! Driver binary for the `EcoSim` micro-economy.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `ecosim-config.yaml` (or `ECOSIM_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Build the seeded economy
//! 4. Run the bounded simulation loop
//! 5. Write the consumer wealth histogram and the collector tail to stdout

mod error;
mod progress;
mod report;

use std::io::Write;
use std::path::PathBuf;

use ecosim_agents::Consumer;
use ecosim_core::{Economy, SimulationConfig, runner};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::progress::ProgressCallback;
use crate::report::Histogram;

/// Environment variable naming the config file.
const CONFIG_ENV: &str = "ECOSIM_CONFIG";

/// Config file used when `ECOSIM_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "ecosim-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, construction, any tick, or writing
/// the report fails.
fn main() -> Result<(), EngineError> {
    // 1. Load configuration. Logging is not up yet, so the source is
    //    reported once it is.
    let config_path = std::env::var_os(CONFIG_ENV)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config_found = config_path.exists();
    let config = SimulationConfig::load_or_default(&config_path)?;

    // 2. Initialize structured logging.
    init_logging(&config)?;
    info!(
        path = %config_path.display(),
        found = config_found,
        "ecosim-engine starting"
    );

    config.validate()?;
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        num_agents = config.population.num_agents,
        max_ticks = config.simulation.max_ticks,
        "Configuration loaded"
    );

    // 3. Build the economy.
    let mut economy = Economy::new(&config)?;

    // 4. Run.
    let mut callback = ProgressCallback::new(config.report.progress_interval);
    let result = runner::run_simulation(&mut economy, config.simulation.max_ticks, &mut callback)?;
    runner::log_simulation_end(&result);

    // 5. Report.
    let histogram = Histogram::build(
        economy.population().consumers().map(Consumer::wealth),
        config.report.histogram_bin_width,
        config.report.histogram_max,
    )?;
    info!(
        consumers = histogram.total(),
        out_of_range = histogram.out_of_range,
        trades_completed = economy.trades_completed(),
        "Consumer wealth histogram"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Consumer wealth after {} ticks", result.total_ticks)?;
    histogram.render(&mut out)?;
    writeln!(out)?;
    report::render_tail(economy.collector().tail(config.report.tail_rows), &mut out)?;
    out.flush()?;

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "ecosim-engine shutdown complete"
    );

    Ok(())
}

/// Install the global subscriber. `RUST_LOG` wins over `logging.level`.
fn init_logging(config: &SimulationConfig) -> Result<(), EngineError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .map_err(|e| EngineError::Logging {
            message: format!("invalid level {:?}: {e}", config.logging.level),
        })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}
