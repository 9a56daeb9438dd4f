//! Population statistics gathered while the simulation runs.

use serde::{Deserialize, Serialize};

/// Events and population counts for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickStats {
    /// Tick number (1-based, the first tick is 1)
    pub tick: u64,
    /// Live creatures after cleanup
    pub creatures: usize,
    /// Food items still tracked after cleanup
    pub food: usize,
    /// Creatures born during the tick
    pub births: u32,
    /// Creatures that died during the tick
    pub deaths: u32,
    /// Food items consumed during the tick
    pub food_eaten: u32,
    /// Successful matings during the tick
    pub conceptions: u32,
}

impl TickStats {
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            ..Default::default()
        }
    }
}

/// Totals over a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub final_creatures: usize,
    pub final_food: usize,
    pub peak_creatures: usize,
    pub total_births: u64,
    pub total_deaths: u64,
    pub total_food_eaten: u64,
    pub total_conceptions: u64,
}

impl RunSummary {
    /// Fold one tick into the running totals
    pub fn update(&mut self, tick: &TickStats) {
        self.ticks = tick.tick;
        self.final_creatures = tick.creatures;
        self.final_food = tick.food;
        self.peak_creatures = self.peak_creatures.max(tick.creatures);
        self.total_births += tick.births as u64;
        self.total_deaths += tick.deaths as u64;
        self.total_food_eaten += tick.food_eaten as u64;
        self.total_conceptions += tick.conceptions as u64;
    }

    /// Share of conceptions that have already been born
    pub fn birth_ratio(&self) -> f64 {
        if self.total_conceptions == 0 {
            0.0
        } else {
            self.total_births as f64 / self.total_conceptions as f64
        }
    }
}
