//! Spatial placement for the `EcoSim` micro-economy.
//!
//! Agents are placed on a rectangular multi-occupancy grid when the economy
//! is built. Position never influences who trades with whom; the grid exists
//! so external tools can plot where agents live.
//!
//! # Modules
//!
//! - [`error`] -- Error types for grid operations.
//! - [`grid`] -- [`MultiGrid`], a toroidal or bounded grid of cells that
//!   each hold any number of agents.

pub mod error;
pub mod grid;

pub use error::WorldError;
pub use grid::{MultiGrid, Position};
