//! Error types for the `ecosim-world` crate.

use ecosim_types::AgentId;

use crate::grid::Position;

/// Errors that can occur during grid operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A grid dimension was zero.
    #[error("invalid grid dimensions {width}x{height}: both must be at least 1")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// A position lies outside a non-toroidal grid.
    #[error("position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        /// The rejected position.
        position: Position,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },

    /// The agent already has a position on the grid.
    #[error("agent {0} is already placed")]
    AlreadyPlaced(AgentId),
}
