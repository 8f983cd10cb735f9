//! Configuration loading and typed config structures for `EcoSim`.
//!
//! The configuration lives in `ecosim-config.yaml`. This module defines
//! strongly-typed structs that mirror the YAML structure, a loader that
//! reads the file and applies environment overrides, and a validator that
//! rejects values the economy cannot be built from.

use std::path::Path;

use serde::Deserialize;

use ecosim_agents::AgentConfig;

/// Environment variable that overrides `world.seed`.
pub const SEED_ENV: &str = "ECOSIM_SEED";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    Env {
        /// The variable name.
        var: &'static str,
        /// The raw value.
        value: String,
    },

    /// A value is outside its allowed range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `ecosim-config.yaml`. Every field has a default
/// matching the reference economy, so an empty document is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed, grid).
    #[serde(default)]
    pub world: WorldConfig,

    /// Population size.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Starting attribute ranges.
    #[serde(default)]
    pub agents: AgentConfig,

    /// Run length.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// End-of-run report layout.
    #[serde(default)]
    pub report: ReportConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `ECOSIM_SEED` overrides `world.seed` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Env`] if the override is not a number.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise start from defaults.
    /// Environment overrides apply either way.
    ///
    /// # Errors
    ///
    /// Same as [`SimulationConfig::from_file`].
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides
    /// are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Override values with environment variables when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] if `ECOSIM_SEED` is not a `u64`.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var(SEED_ENV) {
            self.world.seed = val.trim().parse().map_err(|err| ConfigError::Env {
                var: SEED_ENV,
                value: format!("{val} ({err})"),
            })?;
        }
        Ok(())
    }

    /// Check every value the economy and report depend on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population.num_agents == 0 {
            return Err(invalid("population.num_agents must be at least 1"));
        }
        if self.world.width == 0 || self.world.height == 0 {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "world grid must be at least 1x1, got {}x{}",
                    self.world.width, self.world.height
                ),
            });
        }
        self.agents.validate().map_err(|e| ConfigError::Invalid {
            reason: e.to_string(),
        })?;
        if self.report.histogram_bin_width == 0 {
            return Err(invalid("report.histogram_bin_width must be at least 1"));
        }
        if self.report.histogram_max < self.report.histogram_bin_width {
            return Err(invalid(
                "report.histogram_max must be at least one bin width",
            ));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_owned(),
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Grid width in cells.
    #[serde(default = "default_grid_side")]
    pub width: u32,

    /// Grid height in cells.
    #[serde(default = "default_grid_side")]
    pub height: u32,

    /// Whether the grid wraps at its edges.
    #[serde(default = "default_true")]
    pub torus: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            width: default_grid_side(),
            height: default_grid_side(),
            torus: true,
        }
    }
}

/// Population configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PopulationConfig {
    /// Number of agents created at construction. Fixed for the run.
    #[serde(default = "default_num_agents")]
    pub num_agents: u32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            num_agents: default_num_agents(),
        }
    }
}

/// Simulation boundary configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Number of ticks the driver runs.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
        }
    }
}

/// End-of-run report layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportConfig {
    /// Width of each consumer wealth histogram bin.
    #[serde(default = "default_histogram_bin_width")]
    pub histogram_bin_width: u32,

    /// Upper edge of the last histogram bin (inclusive).
    #[serde(default = "default_histogram_max")]
    pub histogram_max: u32,

    /// Number of trailing collector records printed.
    #[serde(default = "default_tail_rows")]
    pub tail_rows: usize,

    /// Log a progress line every this many ticks (0 disables).
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            histogram_bin_width: default_histogram_bin_width(),
            histogram_max: default_histogram_max(),
            tail_rows: default_tail_rows(),
            progress_interval: default_progress_interval(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG`
    /// is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "EcoSim".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_grid_side() -> u32 {
    10
}

const fn default_true() -> bool {
    true
}

const fn default_num_agents() -> u32 {
    50
}

const fn default_max_ticks() -> u64 {
    100
}

const fn default_histogram_bin_width() -> u32 {
    5
}

const fn default_histogram_max() -> u32 {
    55
}

const fn default_tail_rows() -> usize {
    5
}

const fn default_progress_interval() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_owned()
}
