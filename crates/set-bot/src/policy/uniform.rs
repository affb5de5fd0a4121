use super::{Policy, PolicyContext};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use set_core::model::Slot;

/// Presses one slot drawn uniformly from the whole table each turn.
pub struct UniformPolicy {
    rng: SmallRng,
}

impl UniformPolicy {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Policy for UniformPolicy {
    fn next_slots(&mut self, ctx: &PolicyContext) -> Vec<Slot> {
        if ctx.table_size == 0 {
            return Vec::new();
        }
        vec![self.rng.gen_range(0..ctx.table_size)]
    }
}
