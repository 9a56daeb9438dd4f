//! Per-tick snapshots consumed by replay and visualisation tools.

use crate::entity::EntityKind;
use crate::genome::Genome;
use crate::store::EntityStore;
use eco_core::{EntityId, Gender, Result};
use serde::{Deserialize, Serialize};

/// Recorded state of one creature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureRecord {
    pub unique_id: EntityId,
    pub pos: [i32; 2],
    pub health: i32,
    pub hunger: i32,
    pub speed: i32,
    pub gender: Gender,
    pub genes: Genome,
}

/// Recorded state of one food item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub unique_id: EntityId,
    pub pos: [i32; 2],
    pub eaten: bool,
}

/// Everything alive at the end of one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    #[serde(rename = "Creature")]
    pub creatures: Vec<CreatureRecord>,
    #[serde(rename = "Food")]
    pub food: Vec<FoodRecord>,
}

impl TickRecord {
    /// Capture the store, both lists in ascending id
    pub fn capture(store: &EntityStore) -> Self {
        let creatures = store
            .all_of(EntityKind::Creature)
            .filter_map(|e| {
                e.as_creature().map(|c| CreatureRecord {
                    unique_id: e.id,
                    pos: e.position.to_array(),
                    health: c.health,
                    hunger: c.hunger,
                    speed: c.speed,
                    gender: c.gender,
                    genes: c.genome,
                })
            })
            .collect();

        let food = store
            .all_of(EntityKind::Food)
            .filter_map(|e| {
                e.as_food().map(|f| FoodRecord {
                    unique_id: e.id,
                    pos: e.position.to_array(),
                    eaten: f.eaten,
                })
            })
            .collect();

        Self { creatures, food }
    }
}

/// Append-only sequence of tick records for a whole run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recording {
    ticks: Vec<TickRecord>,
}

impl Recording {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capture(&mut self, store: &EntityStore) {
        self.ticks.push(TickRecord::capture(store));
    }

    pub fn ticks(&self) -> &[TickRecord] {
        &self.ticks
    }

    pub fn last(&self) -> Option<&TickRecord> {
        self.ticks.last()
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Compact binary encoding
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
