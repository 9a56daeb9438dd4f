//! Per-creature step logic.
//!
//! A creature's activation runs these phases in order: sense and move, eat,
//! seek a mate, gestate, metabolize, and finally the death check. Each phase
//! is a standalone function over the shared [`World`] so it can be exercised
//! on its own.
//!
//! Food and mate scans walk the whole store or the current cell once per
//! creature, which is quadratic in population per tick. That is fine for the
//! population sizes this engine targets.

use crate::entity::{Body, Creature, EntityKind};
use crate::genome::Genome;
use crate::world::World;
use eco_core::{CreatureConfig, EntityId, Error, Gender, Position, Result, SimulationConfig};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

/// What happened during one creature's activation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub moved_to: Option<Position>,
    pub ate: Option<EntityId>,
    pub impregnated: Option<EntityId>,
    pub child: Option<EntityId>,
    pub died: bool,
}

/// Run the full pipeline for one creature
pub fn step_creature(
    world: &mut World,
    id: EntityId,
    config: &SimulationConfig,
    rng: &mut ChaCha8Rng,
) -> Result<StepOutcome> {
    let creature_config = &config.creature;

    let moved_to = sense_and_move(world, id, rng)?;
    let ate = eat(world, id, creature_config.hunger_relief)?;
    let impregnated = seek_mate(world, id, creature_config.gestation_ticks, rng)?;
    let child = reproduce(world, id, config, rng)?;
    metabolize(world, id, creature_config)?;
    let died = resolve_death(world, id)?;

    Ok(StepOutcome {
        moved_to: Some(moved_to),
        ate,
        impregnated,
        child,
        died,
    })
}

/// Step toward the nearest food, or wander if there is none
pub fn sense_and_move(world: &mut World, id: EntityId, rng: &mut ChaCha8Rng) -> Result<Position> {
    let here = world.position_of(id)?;

    let target = nearest_food(world, here);
    let next = match target {
        Some(food_pos) => world.grid.path_step(here, food_pos),
        None => {
            let neighbors = world.grid.neighbors_of(here, 1, false);
            *neighbors
                .choose(rng)
                .ok_or_else(|| Error::InvalidState(format!("no neighbours around {}", here)))?
        }
    };

    world.relocate(id, next)
}

/// Closest food by toroidal distance; ties go to the lowest id.
///
/// Food eaten earlier in the tick is still sensed until cleanup removes it.
pub fn nearest_food(world: &World, from: Position) -> Option<Position> {
    world
        .store
        .all_of(EntityKind::Food)
        .map(|e| e.position)
        // min_by_key keeps the first of equal keys
        .min_by_key(|pos| world.grid.distance(from, *pos))
}

/// Eat at most one uneaten food item in the current cell
pub fn eat(world: &mut World, id: EntityId, relief: i32) -> Result<Option<EntityId>> {
    let here = world.position_of(id)?;

    let food_id = world.grid.entities_at(here).find(|other| {
        world
            .store
            .get(*other)
            .ok()
            .and_then(|e| e.as_food())
            .map_or(false, |food| !food.eaten)
    });

    let Some(food_id) = food_id else {
        return Ok(None);
    };

    world.store.food_mut(food_id)?.eaten = true;
    world.store.creature_mut(id)?.eat(relief);
    trace!(creature_id = %id, food_id = %food_id, "Creature ate");

    Ok(Some(food_id))
}

/// A free female tries to impregnate one co-located creature of the other sex
pub fn seek_mate(
    world: &mut World,
    id: EntityId,
    gestation_ticks: i32,
    rng: &mut ChaCha8Rng,
) -> Result<Option<EntityId>> {
    let (gender, rate, pregnant) = {
        let creature = world.store.creature(id)?;
        (creature.gender, creature.reproduction_rate, creature.is_pregnant())
    };
    if gender != Gender::Female || pregnant {
        return Ok(None);
    }

    let here = world.position_of(id)?;
    let candidates: Vec<EntityId> = world
        .grid
        .entities_at(here)
        .filter(|other| {
            world
                .store
                .get(*other)
                .ok()
                .and_then(|e| e.as_creature())
                .map_or(false, |c| c.gender != gender)
        })
        .collect();

    // One draw per candidate, pregnant or not
    for candidate in candidates {
        let mate = world.store.creature_mut(candidate)?;
        if rng.gen_bool(rate) && !mate.is_pregnant() {
            mate.conceive(gestation_ticks);
            trace!(creature_id = %id, mate_id = %candidate, "Mating succeeded");
            return Ok(Some(candidate));
        }
    }

    Ok(None)
}

/// Advance gestation and give birth when due
pub fn reproduce(
    world: &mut World,
    id: EntityId,
    config: &SimulationConfig,
    rng: &mut ChaCha8Rng,
) -> Result<Option<EntityId>> {
    let (due, parent_genome) = {
        let creature = world.store.creature_mut(id)?;
        (creature.advance_gestation(), creature.genome)
    };
    if !due {
        return Ok(None);
    }

    let genome = parent_genome.mutate(&config.mutation, rng);
    let gender = random_gender(rng);
    let here = world.position_of(id)?;

    let child = Creature::new(gender, genome, &config.creature);
    let child_id = world.spawn(here, Body::Creature(child))?;

    debug!(
        event = "birth",
        parent_id = %id,
        child_id = %child_id,
        gender = %gender,
        speed = genome.speed,
        sight = genome.sight,
        special_gene = genome.special_gene,
        position_x = here.x,
        position_y = here.y,
        "Creature born"
    );

    Ok(Some(child_id))
}

/// Hunger rises every tick; starving creatures lose health
pub fn metabolize(world: &mut World, id: EntityId, config: &CreatureConfig) -> Result<()> {
    world.store.creature_mut(id)?.metabolize(config);
    Ok(())
}

/// Remove the creature immediately if its health is exhausted
pub fn resolve_death(world: &mut World, id: EntityId) -> Result<bool> {
    if world.store.creature(id)?.is_alive() {
        return Ok(false);
    }

    if let Some(entity) = world.despawn(id) {
        debug!(
            event = "death",
            creature_id = %id,
            position_x = entity.position.x,
            position_y = entity.position.y,
            "Creature died"
        );
    }
    Ok(true)
}

pub fn random_gender(rng: &mut ChaCha8Rng) -> Gender {
    if rng.gen_bool(0.5) {
        Gender::Male
    } else {
        Gender::Female
    }
}

/// A founder creature with random sex and genome
pub fn random_creature(config: &CreatureConfig, rng: &mut ChaCha8Rng) -> Creature {
    let gender = random_gender(rng);
    let genome = Genome::random(rng);
    Creature::new(gender, genome, config)
}
