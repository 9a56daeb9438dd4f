//! Authoritative registry of live entities.

use crate::entity::{Creature, Entity, EntityKind, Food};
use eco_core::{EntityId, Error, Result};
use std::collections::BTreeMap;

/// Owns every live entity, keyed and iterated by ascending id
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    entities: BTreeMap<EntityId, Entity>,
    next_id: u64,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next identifier. Identifiers are never handed out twice.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add(&mut self, entity: Entity) -> Result<()> {
        if self.entities.contains_key(&entity.id) {
            return Err(Error::AlreadyExists(entity.id));
        }
        self.entities.insert(entity.id, entity);
        Ok(())
    }

    /// Remove an entity. Unknown ids are ignored so cleanup may run after an
    /// earlier removal in the same tick.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn get(&self, id: EntityId) -> Result<&Entity> {
        self.entities.get(&id).ok_or(Error::UnknownEntity(id))
    }

    pub fn get_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        self.entities.get_mut(&id).ok_or(Error::UnknownEntity(id))
    }

    pub fn creature(&self, id: EntityId) -> Result<&Creature> {
        self.get(id)?
            .as_creature()
            .ok_or_else(|| Error::InvalidState(format!("entity {} is not a creature", id)))
    }

    pub fn creature_mut(&mut self, id: EntityId) -> Result<&mut Creature> {
        self.get_mut(id)?
            .as_creature_mut()
            .ok_or_else(|| Error::InvalidState(format!("entity {} is not a creature", id)))
    }

    pub fn food_mut(&mut self, id: EntityId) -> Result<&mut Food> {
        self.get_mut(id)?
            .as_food_mut()
            .ok_or_else(|| Error::InvalidState(format!("entity {} is not food", id)))
    }

    /// All entities of one kind, ascending id
    pub fn all_of(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values().filter(move |e| e.kind() == kind)
    }

    pub fn ids_of(&self, kind: EntityKind) -> Vec<EntityId> {
        self.all_of(kind).map(|e| e.id).collect()
    }

    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.all_of(kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
