//! Grid and entity store kept in lockstep.

use crate::entity::{Body, Entity};
use crate::grid::Grid;
use crate::store::EntityStore;
use eco_core::{EntityId, Error, Position, Result};

/// The shared state every behavior reads and mutates.
///
/// All structural changes go through this type so that an entity's own
/// `position` and the grid's occupancy index never disagree.
#[derive(Debug, Clone)]
pub struct World {
    pub grid: Grid,
    pub store: EntityStore,
}

impl World {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            grid: Grid::new(width, height),
            store: EntityStore::new(),
        }
    }

    /// Create a new entity with a fresh id and place it on the grid
    pub fn spawn(&mut self, pos: Position, body: Body) -> Result<EntityId> {
        let id = self.store.next_id();
        let position = self.grid.place(id, pos)?;
        if let Err(e) = self.store.add(Entity { id, position, body }) {
            self.grid.remove(id);
            return Err(e);
        }
        Ok(id)
    }

    /// Move an entity, returning the wrapped destination
    pub fn relocate(&mut self, id: EntityId, pos: Position) -> Result<Position> {
        let entity = self.store.get_mut(id)?;
        let position = self.grid.move_entity(id, pos)?;
        entity.position = position;
        Ok(position)
    }

    /// Remove an entity from both indexes. Absent entities are ignored.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.grid.remove(id);
        self.store.remove(id)
    }

    pub fn position_of(&self, id: EntityId) -> Result<Position> {
        Ok(self.store.get(id)?.position)
    }

    /// Verify that the grid and the store describe the same population
    pub fn check_consistency(&self) -> Result<()> {
        if self.grid.len() != self.store.len() {
            return Err(Error::InvalidState(format!(
                "grid tracks {} entities but store holds {}",
                self.grid.len(),
                self.store.len()
            )));
        }

        for entity in self.store.iter() {
            match self.grid.position_of(entity.id) {
                Some(pos) if pos == entity.position => {}
                Some(pos) => {
                    return Err(Error::InvalidState(format!(
                        "entity {} records {} but grid has it at {}",
                        entity.id, entity.position, pos
                    )))
                }
                None => return Err(Error::NotOnGrid(entity.id)),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Food;

    #[test]
    fn test_spawn_registers_in_both_indexes() {
        let mut world = World::new(4, 4);
        let id = world.spawn(Position::new(5, -1), Body::Food(Food::default())).unwrap();

        assert_eq!(world.position_of(id).unwrap(), Position::new(1, 3));
        assert_eq!(world.grid.position_of(id), Some(Position::new(1, 3)));
        assert!(world.check_consistency().is_ok());
    }

    #[test]
    fn test_relocate_keeps_indexes_in_sync() {
        let mut world = World::new(4, 4);
        let id = world.spawn(Position::new(0, 0), Body::Food(Food::default())).unwrap();

        let at = world.relocate(id, Position::new(-1, 0)).unwrap();
        assert_eq!(at, Position::new(3, 0));
        assert_eq!(world.store.get(id).unwrap().position, at);
        assert!(world.check_consistency().is_ok());
    }

    #[test]
    fn test_relocate_unknown_entity_fails() {
        let mut world = World::new(4, 4);
        let err = world.relocate(EntityId(42), Position::new(1, 1)).unwrap_err();
        assert!(matches!(err, Error::UnknownEntity(EntityId(42))));
    }

    #[test]
    fn test_despawn_twice_is_harmless() {
        let mut world = World::new(4, 4);
        let id = world.spawn(Position::new(2, 2), Body::Food(Food::default())).unwrap();

        assert!(world.despawn(id).is_some());
        assert!(world.despawn(id).is_none());
        assert!(world.grid.is_empty());
        assert!(world.check_consistency().is_ok());
    }

    #[test]
    fn test_consistency_detects_divergence() {
        let mut world = World::new(4, 4);
        let id = world.spawn(Position::new(2, 2), Body::Food(Food::default())).unwrap();
        world.grid.remove(id);
        assert!(world.check_consistency().is_err());
    }
}
