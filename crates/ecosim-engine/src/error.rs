//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode of startup, the run and the
//! final report, so `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ecosim_core::ConfigError,
    },

    /// The economy could not be built.
    #[error("economy error: {source}")]
    Economy {
        /// The underlying construction error.
        #[from]
        source: ecosim_core::EconomyError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: ecosim_core::RunnerError,
    },

    /// The logging filter could not be built.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },

    /// Report arithmetic failed.
    #[error("report error: {message}")]
    Report {
        /// Description of the failure.
        message: String,
    },

    /// Writing the report failed.
    #[error("output error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
