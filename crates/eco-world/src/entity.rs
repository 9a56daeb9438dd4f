//! Entity state: creatures and food.

use crate::genome::Genome;
use eco_core::{CreatureConfig, EntityId, Gender, Position};
use serde::{Deserialize, Serialize};

/// Discriminant used to filter entities without inspecting their payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Creature,
    Food,
}

/// Anything that occupies a grid cell
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub position: Position,
    pub body: Body,
}

/// Variant-specific state of an entity
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Creature(Creature),
    Food(Food),
}

impl Entity {
    pub fn creature(id: EntityId, position: Position, creature: Creature) -> Self {
        Self {
            id,
            position,
            body: Body::Creature(creature),
        }
    }

    pub fn food(id: EntityId, position: Position) -> Self {
        Self {
            id,
            position,
            body: Body::Food(Food::default()),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self.body {
            Body::Creature(_) => EntityKind::Creature,
            Body::Food(_) => EntityKind::Food,
        }
    }

    pub fn as_creature(&self) -> Option<&Creature> {
        match &self.body {
            Body::Creature(creature) => Some(creature),
            Body::Food(_) => None,
        }
    }

    pub fn as_creature_mut(&mut self) -> Option<&mut Creature> {
        match &mut self.body {
            Body::Creature(creature) => Some(creature),
            Body::Food(_) => None,
        }
    }

    pub fn as_food(&self) -> Option<&Food> {
        match &self.body {
            Body::Food(food) => Some(food),
            Body::Creature(_) => None,
        }
    }

    pub fn as_food_mut(&mut self) -> Option<&mut Food> {
        match &mut self.body {
            Body::Food(food) => Some(food),
            Body::Creature(_) => None,
        }
    }
}

/// Reproductive state of a creature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pregnancy {
    NotPregnant,
    Pregnant { remaining: i32 },
}

impl Pregnancy {
    pub fn is_pregnant(&self) -> bool {
        matches!(self, Pregnancy::Pregnant { .. })
    }
}

/// A mobile, feeding, reproducing agent
#[derive(Debug, Clone, PartialEq)]
pub struct Creature {
    pub health: i32,
    pub hunger: i32,
    pub speed: i32,
    pub gender: Gender,
    pub genome: Genome,
    pub pregnancy: Pregnancy,
    pub reproduction_rate: f64,
}

impl Creature {
    pub fn new(gender: Gender, genome: Genome, config: &CreatureConfig) -> Self {
        Self {
            health: config.initial_health,
            hunger: 0,
            speed: genome.speed,
            gender,
            genome,
            pregnancy: Pregnancy::NotPregnant,
            reproduction_rate: config.reproduction_rate,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_pregnant(&self) -> bool {
        self.pregnancy.is_pregnant()
    }

    pub fn conceive(&mut self, gestation_ticks: i32) {
        self.pregnancy = Pregnancy::Pregnant {
            remaining: gestation_ticks,
        };
    }

    /// Count one tick of gestation down. Returns true when the pregnancy is
    /// due, in which case the state is already reset to `NotPregnant`.
    pub fn advance_gestation(&mut self) -> bool {
        match self.pregnancy {
            Pregnancy::NotPregnant => false,
            Pregnancy::Pregnant { remaining } => {
                let remaining = remaining - 1;
                if remaining <= 0 {
                    self.pregnancy = Pregnancy::NotPregnant;
                    true
                } else {
                    self.pregnancy = Pregnancy::Pregnant { remaining };
                    false
                }
            }
        }
    }

    pub fn eat(&mut self, relief: i32) {
        self.hunger -= relief;
    }

    /// Apply one tick of metabolism. Returns the health lost.
    pub fn metabolize(&mut self, config: &CreatureConfig) -> i32 {
        self.hunger += config.hunger_per_tick;
        if self.hunger > config.starvation_threshold {
            self.health -= config.starvation_damage;
            config.starvation_damage
        } else {
            0
        }
    }
}

/// A food item waiting to be eaten
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Food {
    pub eaten: bool,
}
