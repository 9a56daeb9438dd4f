//! Tick driver for a whole population.

use crate::behavior::{random_creature, step_creature};
use crate::entity::{Body, Creature, EntityKind, Food};
use crate::snapshot::Recording;
use crate::world::World;
use eco_core::{
    ActivationOrder, EntityId, Position, Result, RunSummary, SimulationConfig, TickStats,
};
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, event, info, instrument, Level};

pub struct Simulation {
    world: World,
    config: SimulationConfig,
    rng: ChaCha8Rng,
    recording: Recording,
    tick: u64,
    summary: RunSummary,
}

impl Simulation {
    /// Build a populated world: food first, then the founding creatures
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let mut sim = Self::empty(config)?;

        for _ in 0..sim.config.world.initial_food {
            let pos = sim.random_position();
            sim.spawn_food_at(pos)?;
        }

        for _ in 0..sim.config.population {
            let creature = random_creature(&sim.config.creature, &mut sim.rng);
            let pos = sim.random_position();
            sim.spawn_creature_at(pos, creature)?;
        }

        info!(
            width = sim.config.world.width,
            height = sim.config.world.height,
            creatures = sim.config.population,
            food = sim.config.world.initial_food,
            seed = sim.config.seed,
            "World initialised"
        );

        Ok(sim)
    }

    /// A world with no entities, for scripted setups
    pub fn empty(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let world = World::new(config.world.width, config.world.height);

        Ok(Self {
            world,
            config,
            rng,
            recording: Recording::new(),
            tick: 0,
            summary: RunSummary::default(),
        })
    }

    pub fn spawn_creature_at(&mut self, pos: Position, creature: Creature) -> Result<EntityId> {
        self.world.spawn(pos, Body::Creature(creature))
    }

    pub fn spawn_food_at(&mut self, pos: Position) -> Result<EntityId> {
        self.world.spawn(pos, Body::Food(Food::default()))
    }

    /// Run the configured number of ticks
    pub fn run(&mut self) -> Result<RunSummary> {
        let ticks = self.config.num_ticks;
        self.run_ticks(ticks)
    }

    /// Run exactly `total_ticks` ticks, even after extinction
    #[instrument(skip(self), fields(seed = self.config.seed))]
    pub fn run_ticks(&mut self, total_ticks: u64) -> Result<RunSummary> {
        info!("Starting simulation for {} ticks", total_ticks);

        for _ in 0..total_ticks {
            self.tick()?;
        }

        self.emit_episode_summary();
        Ok(self.summary.clone())
    }

    /// Execute one simulation step
    pub fn tick(&mut self) -> Result<TickStats> {
        self.tick += 1;
        let mut stats = TickStats::new(self.tick);

        for id in self.activation_order() {
            // Creatures do not kill each other, but stay tolerant of it
            if !self.world.store.contains(id) {
                continue;
            }

            let outcome = step_creature(&mut self.world, id, &self.config, &mut self.rng)?;
            if outcome.ate.is_some() {
                stats.food_eaten += 1;
            }
            if outcome.impregnated.is_some() {
                stats.conceptions += 1;
            }
            if outcome.child.is_some() {
                stats.births += 1;
            }
            if outcome.died {
                stats.deaths += 1;
            }
        }

        self.remove_eaten_food();
        self.recording.capture(&self.world.store);

        stats.creatures = self.world.store.count_of(EntityKind::Creature);
        stats.food = self.world.store.count_of(EntityKind::Food);
        self.summary.update(&stats);

        let interval = self.config.metrics_interval;
        if interval > 0 && self.tick % interval == 0 {
            self.emit_population_metrics(&stats);
        }

        Ok(stats)
    }

    /// Creatures alive at the start of the tick, ordered by the activation policy
    fn activation_order(&mut self) -> Vec<EntityId> {
        let mut ids = self.world.store.ids_of(EntityKind::Creature);
        if self.config.activation_order == ActivationOrder::Shuffled {
            ids.shuffle(&mut self.rng);
        }
        ids
    }

    fn remove_eaten_food(&mut self) {
        let eaten: Vec<EntityId> = self
            .world
            .store
            .all_of(EntityKind::Food)
            .filter(|e| e.as_food().map_or(false, |f| f.eaten))
            .map(|e| e.id)
            .collect();

        for id in eaten {
            self.world.despawn(id);
        }
    }

    fn random_position(&mut self) -> Position {
        let x = self.rng.gen_range(0..self.config.world.width);
        let y = self.rng.gen_range(0..self.config.world.height);
        Position::new(x, y)
    }

    /// Emit population metrics for the tick that just finished
    fn emit_population_metrics(&self, stats: &TickStats) {
        let creatures: Vec<&Creature> = self
            .world
            .store
            .all_of(EntityKind::Creature)
            .filter_map(|e| e.as_creature())
            .collect();

        let count = creatures.len().max(1) as i64;
        let avg_health = creatures.iter().map(|c| c.health as i64).sum::<i64>() / count;
        let avg_hunger = creatures.iter().map(|c| c.hunger as i64).sum::<i64>() / count;
        let pregnant = creatures.iter().filter(|c| c.is_pregnant()).count();
        let special = creatures.iter().filter(|c| c.genome.special_gene).count();

        info!(
            event = "population_metrics",
            tick = stats.tick,
            creatures = stats.creatures,
            food = stats.food,
            births = stats.births,
            deaths = stats.deaths,
            food_eaten = stats.food_eaten,
            conceptions = stats.conceptions,
            pregnant = pregnant,
            special_gene_carriers = special,
            avg_health = avg_health,
            avg_hunger = avg_hunger,
            "Population metrics snapshot"
        );

        event!(
            Level::DEBUG,
            gauge_name = "population_total",
            gauge_value = stats.creatures,
            tick = stats.tick,
            "Population gauge"
        );
    }

    /// Emit the end-of-run summary
    fn emit_episode_summary(&self) {
        let summary = &self.summary;
        info!(
            event = "episode_summary",
            total_ticks = summary.ticks,
            final_creatures = summary.final_creatures,
            final_food = summary.final_food,
            peak_creatures = summary.peak_creatures,
            total_births = summary.total_births,
            total_deaths = summary.total_deaths,
            total_food_eaten = summary.total_food_eaten,
            total_conceptions = summary.total_conceptions,
            birth_ratio = format!("{:.2}", summary.birth_ratio()),
            "Run complete"
        );

        if summary.final_creatures == 0 {
            debug!(ticks = summary.ticks, "Population went extinct");
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    pub fn into_recording(self) -> Recording {
        self.recording
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Pregnancy;
    use crate::genome::Genome;
    use eco_core::{CreatureConfig, Gender};
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn genome() -> Genome {
        Genome {
            speed: 2,
            sight: 3,
            special_gene: false,
        }
    }

    fn scripted(width: i32, height: i32, seed: u64) -> Simulation {
        let mut config = SimulationConfig {
            seed,
            ..Default::default()
        };
        config.world.width = width;
        config.world.height = height;
        Simulation::empty(config).unwrap()
    }

    fn creature(gender: Gender) -> Creature {
        Creature::new(gender, genome(), &CreatureConfig::default())
    }

    #[test]
    fn test_simulation_creation() {
        let config = SimulationConfig {
            seed: 42,
            ..Default::default()
        };
        let sim = Simulation::new(config).unwrap();

        assert_eq!(sim.world().store.count_of(EntityKind::Creature), 50);
        assert_eq!(sim.world().store.count_of(EntityKind::Food), 20);
        // Food is distributed before the founders are created
        let food_ids = sim.world().store.ids_of(EntityKind::Food);
        let creature_ids = sim.world().store.ids_of(EntityKind::Creature);
        assert!(food_ids.iter().max() < creature_ids.iter().min());
        assert!(sim.world().check_consistency().is_ok());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = SimulationConfig::default();
        config.world.height = 0;
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn test_single_meal_scenario() {
        let mut sim = scripted(5, 5, 1);
        let id = sim
            .spawn_creature_at(Position::new(0, 0), creature(Gender::Male))
            .unwrap();
        sim.spawn_food_at(Position::new(0, 0)).unwrap();

        let stats = sim.tick().unwrap();
        assert_eq!(stats.food_eaten, 1);

        let record = sim.recording().last().unwrap();
        assert_eq!(record.creatures.len(), 1);
        assert_eq!(record.creatures[0].unique_id, id);
        assert_eq!(record.creatures[0].hunger, -19);
        assert_eq!(record.creatures[0].pos, [0, 0]);
        assert!(record.food.is_empty());
        assert!(sim.world().grid.entities_at(Position::new(0, 0)).eq([id]));
    }

    #[test]
    fn test_wander_scenario() {
        for seed in 0..20 {
            let mut sim = scripted(5, 5, seed);
            let id = sim
                .spawn_creature_at(Position::new(0, 0), creature(Gender::Female))
                .unwrap();

            sim.tick().unwrap();

            let at = sim.world().position_of(id).unwrap();
            assert_ne!(at, Position::new(0, 0));
            assert_eq!(sim.world().grid.distance(at, Position::new(0, 0)), 1);
        }
    }

    #[test]
    fn test_mating_scenario() {
        // On a 1x1 torus every neighbour is the same cell, so the pair stays together
        let mut sim = scripted(1, 1, 3);
        sim.config.activation_order = ActivationOrder::Insertion;

        let male = sim
            .spawn_creature_at(Position::new(0, 0), creature(Gender::Male))
            .unwrap();
        let mut female_creature = creature(Gender::Female);
        female_creature.reproduction_rate = 1.0;
        let female = sim
            .spawn_creature_at(Position::new(0, 0), female_creature)
            .unwrap();

        let stats = sim.tick().unwrap();
        assert_eq!(stats.conceptions, 1);
        assert_eq!(
            sim.world().store.creature(male).unwrap().pregnancy,
            Pregnancy::Pregnant { remaining: 3 }
        );
        assert!(!sim.world().store.creature(female).unwrap().is_pregnant());

        sim.tick().unwrap();
        sim.tick().unwrap();
        assert_eq!(sim.world().store.count_of(EntityKind::Creature), 2);

        let stats = sim.tick().unwrap();
        assert_eq!(stats.births, 1);
        let creatures = sim.world().store.ids_of(EntityKind::Creature);
        assert_eq!(creatures.len(), 3);

        let child = creatures[2];
        assert!(child > female);
        let child_genome = sim.world().store.creature(child).unwrap().genome;
        assert!((child_genome.speed - genome().speed).abs() <= 1);
        assert!((child_genome.sight - genome().sight).abs() <= 1);
        assert_eq!(sim.world().position_of(child).unwrap(), Position::new(0, 0));
    }

    #[test]
    fn test_starving_creature_disappears() {
        let mut sim = scripted(4, 4, 0);
        let mut starving = creature(Gender::Male);
        starving.health = 1;
        starving.hunger = 20;
        let id = sim.spawn_creature_at(Position::new(1, 1), starving).unwrap();

        let stats = sim.tick().unwrap();
        assert_eq!(stats.deaths, 1);
        assert!(!sim.world().store.contains(id));
        assert!(sim.recording().last().unwrap().creatures.is_empty());

        // The run carries on with an empty population
        let summary = sim.run_ticks(3).unwrap();
        assert_eq!(summary.ticks, 4);
        assert_eq!(sim.recording().len(), 4);
        assert!(sim.recording().ticks().iter().all(|t| t.creatures.is_empty()));
    }

    #[test]
    fn test_contested_food_goes_to_first_mover() {
        let mut sim = scripted(5, 5, 0);
        sim.config.activation_order = ActivationOrder::Insertion;
        let first = sim
            .spawn_creature_at(Position::new(2, 2), creature(Gender::Male))
            .unwrap();
        let second = sim
            .spawn_creature_at(Position::new(2, 2), creature(Gender::Male))
            .unwrap();
        sim.spawn_food_at(Position::new(2, 2)).unwrap();

        sim.tick().unwrap();
        assert_eq!(sim.world().store.creature(first).unwrap().hunger, -19);
        assert_eq!(sim.world().store.creature(second).unwrap().hunger, 1);
        // The eaten item still draws the second creature until cleanup
        assert_eq!(
            sim.world().position_of(second).unwrap(),
            Position::new(2, 2)
        );
    }

    #[test]
    fn test_late_mover_heads_for_food_eaten_this_tick() {
        for seed in 0..10 {
            let mut sim = scripted(5, 5, seed);
            sim.config.activation_order = ActivationOrder::Insertion;
            let first = sim
                .spawn_creature_at(Position::new(0, 0), creature(Gender::Male))
                .unwrap();
            sim.spawn_food_at(Position::new(1, 0)).unwrap();
            let late = sim
                .spawn_creature_at(Position::new(3, 3), creature(Gender::Male))
                .unwrap();

            let stats = sim.tick().unwrap();
            assert_eq!(stats.food_eaten, 1);
            assert_eq!(
                sim.world().position_of(first).unwrap(),
                Position::new(1, 0)
            );
            assert_eq!(
                sim.world().position_of(late).unwrap(),
                Position::new(2, 4)
            );
        }
    }

    #[test]
    fn test_run_produces_one_record_per_tick() {
        let config = SimulationConfig {
            num_ticks: 25,
            seed: 5,
            ..Default::default()
        };
        let mut sim = Simulation::new(config).unwrap();
        let summary = sim.run().unwrap();

        assert_eq!(summary.ticks, 25);
        assert_eq!(sim.current_tick(), 25);
        assert_eq!(sim.recording().len(), 25);
        assert!(sim.world().check_consistency().is_ok());
    }

    #[test]
    fn test_same_seed_same_recording() {
        let run = |seed: u64| {
            let config = SimulationConfig {
                num_ticks: 60,
                seed,
                population: 30,
                ..Default::default()
            };
            let mut sim = Simulation::new(config).unwrap();
            sim.run().unwrap();
            sim.into_recording().to_json().unwrap()
        };

        assert_eq!(run(17), run(17));
        assert_ne!(run(17), run(18));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn tick_invariants_hold(seed in any::<u64>(), population in 1usize..25, food in 0usize..30) {
            let mut config = SimulationConfig {
                seed,
                population,
                ..Default::default()
            };
            config.world.width = 8;
            config.world.height = 6;
            config.world.initial_food = food;
            config.creature.reproduction_rate = 0.5;
            let mut sim = Simulation::new(config).unwrap();

            let mut dead: Vec<EntityId> = Vec::new();
            for _ in 0..40 {
                let before: HashMap<EntityId, Creature> = sim
                    .world()
                    .store
                    .all_of(EntityKind::Creature)
                    .filter_map(|e| e.as_creature().map(|c| (e.id, c.clone())))
                    .collect();

                let stats = sim.tick().unwrap();
                prop_assert!(sim.world().check_consistency().is_ok());

                let record = sim.recording().last().unwrap();
                prop_assert!(record.food.iter().all(|f| !f.eaten));
                prop_assert_eq!(record.creatures.len(), stats.creatures);

                let mut ate = 0;
                for (id, old) in &before {
                    match sim.world().store.creature(*id) {
                        Ok(now) => {
                            let delta = now.hunger - old.hunger;
                            prop_assert!(delta == 1 || delta == -19);
                            if delta == -19 {
                                ate += 1;
                            }
                            prop_assert!(now.health <= old.health);
                            prop_assert!(now.health > 0);
                            if let Pregnancy::Pregnant { remaining } = now.pregnancy {
                                prop_assert!(remaining > 0);
                                if let Pregnancy::Pregnant { remaining: was } = old.pregnancy {
                                    // A birth followed by a fresh conception restarts the count
                                    prop_assert!(remaining < was || (was == 1 && remaining == 3));
                                }
                            }
                        }
                        Err(_) => dead.push(*id),
                    }
                }
                prop_assert!(ate <= stats.food_eaten);

                for id in &dead {
                    prop_assert!(!sim.world().store.contains(*id));
                    prop_assert!(record.creatures.iter().all(|c| c.unique_id != *id));
                }
            }
        }
    }
}
