//! Heritable traits and their mutation operator.

use eco_core::MutationConfig;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Fixed-schema trait set carried by every creature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genome {
    /// 1..=3 at creation, drifts freely afterwards
    pub speed: i32,
    /// 1..=5 at creation, drifts freely afterwards
    pub sight: i32,
    pub special_gene: bool,
}

impl Genome {
    /// Draw a founder genome
    pub fn random(rng: &mut ChaCha8Rng) -> Self {
        Self {
            speed: rng.gen_range(1..=3),
            sight: rng.gen_range(1..=5),
            special_gene: rng.gen_bool(0.5),
        }
    }

    /// Produce a mutated copy for an offspring.
    ///
    /// Each trait mutates independently with `per_trait_probability`: integer
    /// traits take a ±1 step, the boolean trait flips. `self` is untouched.
    pub fn mutate(&self, config: &MutationConfig, rng: &mut ChaCha8Rng) -> Genome {
        let mut child = *self;
        let p = config.per_trait_probability;

        if rng.gen_bool(p) {
            child.speed += step(rng);
        }
        if rng.gen_bool(p) {
            child.sight += step(rng);
        }
        if rng.gen_bool(p) {
            child.special_gene = !child.special_gene;
        }

        child
    }
}

fn step(rng: &mut ChaCha8Rng) -> i32 {
    if rng.gen_bool(0.5) {
        1
    } else {
        -1
    }
}
