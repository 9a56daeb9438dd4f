//! Configuration types for the simulation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// World configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the world grid
    pub width: i32,
    /// Height of the world grid
    pub height: i32,
    /// Number of food items scattered when the world is created
    pub initial_food: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            initial_food: 20,
        }
    }
}

/// Per-creature physiology
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatureConfig {
    /// Health of a newly created creature
    pub initial_health: i32,
    /// Hunger added by metabolism every tick
    pub hunger_per_tick: i32,
    /// Hunger removed by eating one food item
    pub hunger_relief: i32,
    /// Hunger above which the creature starts losing health
    pub starvation_threshold: i32,
    /// Health lost per tick while starving
    pub starvation_damage: i32,
    /// Probability that a mating attempt succeeds (0.0 to 1.0)
    pub reproduction_rate: f64,
    /// Ticks between conception and birth
    pub gestation_ticks: i32,
}

impl Default for CreatureConfig {
    fn default() -> Self {
        Self {
            initial_health: 100,
            hunger_per_tick: 1,
            hunger_relief: 20,
            starvation_threshold: 20,
            starvation_damage: 1,
            reproduction_rate: 0.1,
            gestation_ticks: 3,
        }
    }
}

/// Genome mutation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Independent probability that each trait mutates at birth
    pub per_trait_probability: f64,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            per_trait_probability: 0.1,
        }
    }
}

/// Order in which creatures are activated within a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationOrder {
    /// Fresh seeded shuffle every tick
    Shuffled,
    /// Ascending entity id
    Insertion,
}

impl Default for ActivationOrder {
    fn default() -> Self {
        ActivationOrder::Shuffled
    }
}

/// Simulation run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of ticks to run the simulation
    pub num_ticks: u64,
    /// Random seed for reproducibility
    pub seed: u64,
    /// Initial number of creatures
    pub population: usize,
    /// Activation policy for contended resources
    pub activation_order: ActivationOrder,
    /// Emit population metrics every this many ticks (0 disables)
    pub metrics_interval: u64,
    /// World configuration
    pub world: WorldConfig,
    /// Creature configuration
    pub creature: CreatureConfig,
    /// Mutation configuration
    pub mutation: MutationConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_ticks: 100,
            seed: 0,
            population: 50,
            activation_order: ActivationOrder::default(),
            metrics_interval: 10,
            world: WorldConfig::default(),
            creature: CreatureConfig::default(),
            mutation: MutationConfig::default(),
        }
    }
}

/// Largest grid, in cells, a simulation will allocate
pub const MAX_GRID_CELLS: i64 = 1 << 24;

impl SimulationConfig {
    /// Reject configurations the engine cannot run
    pub fn validate(&self) -> Result<()> {
        if self.world.width <= 0 || self.world.height <= 0 {
            return Err(Error::Validation(format!(
                "grid must be at least 1x1, got {}x{}",
                self.world.width, self.world.height
            )));
        }
        let cells = i64::from(self.world.width) * i64::from(self.world.height);
        if cells > MAX_GRID_CELLS {
            return Err(Error::Validation(format!(
                "grid of {}x{} exceeds {} cells",
                self.world.width, self.world.height, MAX_GRID_CELLS
            )));
        }
        if !(0.0..=1.0).contains(&self.creature.reproduction_rate) {
            return Err(Error::Validation(format!(
                "reproduction_rate must be within [0, 1], got {}",
                self.creature.reproduction_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation.per_trait_probability) {
            return Err(Error::Validation(format!(
                "per_trait_probability must be within [0, 1], got {}",
                self.mutation.per_trait_probability
            )));
        }
        if self.creature.gestation_ticks <= 0 {
            return Err(Error::Validation(format!(
                "gestation_ticks must be positive, got {}",
                self.creature.gestation_ticks
            )));
        }
        Ok(())
    }
}
