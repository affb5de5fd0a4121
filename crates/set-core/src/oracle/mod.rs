mod features;

pub use features::FeatureOracle;

use crate::model::Card;

/// Decides which card groups form a set.
pub trait SetOracle: Send + Sync {
    /// Whether `cards` is a legal set.
    fn test_set(&self, cards: &[Card]) -> bool;

    /// Up to `cap` sets drawn from `cards`; a `cap` of zero is unbounded.
    fn find_sets(&self, cards: &[Card], cap: usize) -> Vec<Vec<Card>>;

    fn has_set(&self, cards: &[Card]) -> bool {
        !self.find_sets(cards, 1).is_empty()
    }
}
