//! Multi-occupancy grid placement.
//!
//! A [`MultiGrid`] is a `width x height` lattice where each cell may hold
//! any number of agents. On a toroidal grid coordinates wrap at the edges;
//! on a bounded grid out-of-range coordinates are rejected.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use ecosim_types::AgentId;

use crate::error::WorldError;

/// A cell coordinate on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column, `0..width`.
    pub x: u32,
    /// Row, `0..height`.
    pub y: u32,
}

impl Position {
    /// Create a position from its coordinates.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A rectangular grid whose cells can each hold several agents.
#[derive(Debug, Clone)]
pub struct MultiGrid {
    width: u32,
    height: u32,
    torus: bool,
    /// Occupants per non-empty cell, in placement order.
    cells: BTreeMap<Position, Vec<AgentId>>,
    /// Reverse index from agent to its cell.
    positions: BTreeMap<AgentId, Position>,
}

impl MultiGrid {
    /// Create an empty grid.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] if either dimension is 0.
    pub fn new(width: u32, height: u32, torus: bool) -> Result<Self, WorldError> {
        if width == 0 || height == 0 {
            return Err(WorldError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            torus,
            cells: BTreeMap::new(),
            positions: BTreeMap::new(),
        })
    }

    /// Grid width in cells.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether coordinates wrap at the edges.
    pub const fn is_torus(&self) -> bool {
        self.torus
    }

    /// Number of agents placed on the grid.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no agent has been placed yet.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Draw a cell uniformly at random, column first, then row.
    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let x = rng.random_range(0..self.width);
        let y = rng.random_range(0..self.height);
        Position::new(x, y)
    }

    /// Place an agent on the grid and return the cell it landed in.
    ///
    /// On a toroidal grid the position is wrapped into range first.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] for an out-of-range position on a
    /// bounded grid, and [`WorldError::AlreadyPlaced`] if the agent already
    /// has a cell.
    pub fn place_agent(&mut self, agent: AgentId, position: Position) -> Result<Position, WorldError> {
        if self.positions.contains_key(&agent) {
            return Err(WorldError::AlreadyPlaced(agent));
        }
        let cell = self.resolve(position)?;
        self.cells.entry(cell).or_default().push(agent);
        self.positions.insert(agent, cell);
        trace!(%agent, %cell, "Agent placed");
        Ok(cell)
    }

    /// Return the cell an agent occupies.
    pub fn position_of(&self, agent: AgentId) -> Option<Position> {
        self.positions.get(&agent).copied()
    }

    /// Return the agents occupying a cell, in placement order.
    pub fn agents_at(&self, position: Position) -> &[AgentId] {
        self.cells.get(&position).map_or(&[], Vec::as_slice)
    }

    /// Map a requested position onto a valid cell.
    fn resolve(&self, position: Position) -> Result<Position, WorldError> {
        if self.torus {
            // Division is safe: both dimensions are >= 1 by construction.
            let x = position.x.checked_rem(self.width).unwrap_or(0);
            let y = position.y.checked_rem(self.height).unwrap_or(0);
            return Ok(Position::new(x, y));
        }
        if position.x >= self.width || position.y >= self.height {
            return Err(WorldError::OutOfBounds {
                position,
                width: self.width,
                height: self.height,
            });
        }
        Ok(position)
    }
}
