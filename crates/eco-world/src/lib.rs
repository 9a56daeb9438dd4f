//! World simulation engine.
//!
//! This crate implements the toroidal grid world where creatures forage, mate
//! and die, the scheduler that drives them tick by tick, and the recorder that
//! captures every tick for replay.

pub mod behavior;
pub mod entity;
pub mod genome;
pub mod grid;
pub mod simulation;
pub mod snapshot;
pub mod store;
pub mod world;

pub use behavior::StepOutcome;
pub use entity::{Body, Creature, Entity, EntityKind, Food, Pregnancy};
pub use genome::Genome;
pub use grid::Grid;
pub use simulation::Simulation;
pub use snapshot::{CreatureRecord, FoodRecord, Recording, TickRecord};
pub use store::EntityStore;
pub use world::World;
