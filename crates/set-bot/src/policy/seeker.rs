use super::{Policy, PolicyContext, UniformPolicy};
use set_core::model::{Card, Slot};
use set_core::oracle::SetOracle;
use std::sync::Arc;

/// Scans the visible cards for a set and presses it.
///
/// Tokens held outside the chosen set are released first so a stale
/// selection never turns into a penalty. Falls back to a uniform press when
/// nothing on the table forms a set.
pub struct SeekerPolicy {
    oracle: Arc<dyn SetOracle>,
    feature_size: usize,
    fallback: UniformPolicy,
}

impl SeekerPolicy {
    pub fn with_seed(oracle: Arc<dyn SetOracle>, feature_size: usize, seed: u64) -> Self {
        Self {
            oracle,
            feature_size,
            fallback: UniformPolicy::with_seed(seed),
        }
    }

    fn target(&self, table: &[(Slot, Card)]) -> Option<Vec<Slot>> {
        let cards: Vec<Card> = table.iter().map(|&(_, card)| card).collect();
        let set = self.oracle.find_sets(&cards, 1).into_iter().next()?;
        let slots: Vec<Slot> = set
            .iter()
            .filter_map(|card| table.iter().find(|(_, c)| c == card).map(|&(slot, _)| slot))
            .collect();
        (slots.len() == self.feature_size).then_some(slots)
    }
}

impl Policy for SeekerPolicy {
    fn next_slots(&mut self, ctx: &PolicyContext) -> Vec<Slot> {
        let Some(target) = self.target(ctx.table) else {
            return self.fallback.next_slots(ctx);
        };
        let mut presses: Vec<Slot> = ctx
            .held
            .iter()
            .copied()
            .filter(|slot| !target.contains(slot))
            .collect();
        presses.extend(target.into_iter().filter(|slot| !ctx.held.contains(slot)));
        presses
    }
}
