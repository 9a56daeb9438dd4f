//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an entity (creature or food).
///
/// Identifiers are handed out by the entity store in increasing order and are
/// never reused within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 2D position in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Apply toroidal wrapping for given world dimensions
    pub fn wrap(&self, width: i32, height: i32) -> Self {
        Self {
            x: self.x.rem_euclid(width),
            y: self.y.rem_euclid(height),
        }
    }

    /// Shortest signed offset from `self` to `other` on a torus.
    ///
    /// An offset of exactly half an axis resolves to the positive direction.
    pub fn toroidal_delta(&self, other: &Position, width: i32, height: i32) -> (i32, i32) {
        (
            shortest_axis_delta(self.x, other.x, width),
            shortest_axis_delta(self.y, other.y, height),
        )
    }

    /// Chebyshev distance with wraparound on both axes
    pub fn toroidal_chebyshev(&self, other: &Position, width: i32, height: i32) -> i32 {
        let (dx, dy) = self.toroidal_delta(other, width, height);
        dx.abs().max(dy.abs())
    }

    /// `[x, y]` pair, the layout used by the snapshot stream
    pub fn to_array(&self) -> [i32; 2] {
        [self.x, self.y]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

fn shortest_axis_delta(from: i32, to: i32, extent: i32) -> i32 {
    let forward = (to - from).rem_euclid(extent);
    if forward * 2 > extent {
        forward - extent
    } else {
        forward
    }
}

/// Creature sex, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
        }
    }
}
