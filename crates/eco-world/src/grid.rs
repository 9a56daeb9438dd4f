//! 2D toroidal occupancy grid.
//!
//! The grid never owns entities. It only records which identifiers sit in
//! which cell, and answers the spatial questions the behaviors ask.

use eco_core::{EntityId, Error, Position, Result};
use std::collections::{BTreeSet, HashMap};

/// A 2D toroidal grid of entity buckets
#[derive(Debug, Clone)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    cells: Vec<BTreeSet<EntityId>>,
    locations: HashMap<EntityId, Position>,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        let size = width.max(0) as usize * height.max(0) as usize;
        Self {
            width,
            height,
            cells: vec![BTreeSet::new(); size],
            locations: HashMap::new(),
        }
    }

    pub fn wrap(&self, pos: Position) -> Position {
        pos.wrap(self.width, self.height)
    }

    /// Register an entity in a cell. The entity must not already be on the grid.
    pub fn place(&mut self, id: EntityId, pos: Position) -> Result<Position> {
        if let Some(&at) = self.locations.get(&id) {
            return Err(Error::AlreadyPlaced { id, at });
        }

        let wrapped = self.wrap(pos);
        let index = self.pos_to_index(wrapped);
        self.cells[index].insert(id);
        self.locations.insert(id, wrapped);
        Ok(wrapped)
    }

    /// Move a tracked entity, wrapping the target onto the lattice
    pub fn move_entity(&mut self, id: EntityId, new_pos: Position) -> Result<Position> {
        let old = *self.locations.get(&id).ok_or(Error::NotOnGrid(id))?;
        let wrapped = self.wrap(new_pos);
        if old == wrapped {
            return Ok(wrapped);
        }

        let old_index = self.pos_to_index(old);
        self.cells[old_index].remove(&id);
        let new_index = self.pos_to_index(wrapped);
        self.cells[new_index].insert(id);
        self.locations.insert(id, wrapped);
        Ok(wrapped)
    }

    /// Clear an entity's occupancy. Removing an absent entity is a no-op.
    pub fn remove(&mut self, id: EntityId) -> Option<Position> {
        let pos = self.locations.remove(&id)?;
        let index = self.pos_to_index(pos);
        self.cells[index].remove(&id);
        Some(pos)
    }

    pub fn position_of(&self, id: EntityId) -> Option<Position> {
        self.locations.get(&id).copied()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.locations.contains_key(&id)
    }

    /// Entities in a cell, ascending id
    pub fn entities_at(&self, pos: Position) -> impl Iterator<Item = EntityId> + '_ {
        let index = self.pos_to_index(self.wrap(pos));
        self.cells[index].iter().copied()
    }

    /// Moore neighbourhood of `pos` with wraparound.
    ///
    /// Offsets are scanned row by row (`dy` outer, `dx` inner). On grids
    /// smaller than the neighbourhood several offsets land on the same cell;
    /// those duplicates are kept.
    pub fn neighbors_of(&self, pos: Position, radius: i32, include_center: bool) -> Vec<Position> {
        let mut neighbors = Vec::new();

        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dy == 0 && !include_center {
                    continue;
                }

                neighbors.push(self.wrap(pos.add(dx, dy)));
            }
        }

        neighbors
    }

    /// Wrap-aware Chebyshev distance
    pub fn distance(&self, a: Position, b: Position) -> i32 {
        a.toroidal_chebyshev(&b, self.width, self.height)
    }

    /// Next cell on a shortest 8-connected toroidal path from `from` to `to`
    pub fn path_step(&self, from: Position, to: Position) -> Position {
        let (dx, dy) = from.toroidal_delta(&to, self.width, self.height);
        self.wrap(from.add(dx.signum(), dy.signum()))
    }

    /// Number of entities tracked by the grid
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    fn pos_to_index(&self, pos: Position) -> usize {
        pos.y as usize * self.width as usize + pos.x as usize
    }
}
