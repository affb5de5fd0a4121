use crate::model::Card;
use crate::oracle::SetOracle;
use std::collections::BTreeSet;

/// Classic feature-based rules: a card id spells its features as
/// `feature_count` digits in base `feature_size`, least significant first.
/// A group of `feature_size` cards is a set when every feature is either
/// shared by all cards or different on each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureOracle {
    feature_count: u32,
    feature_size: u32,
}

impl FeatureOracle {
    pub const fn new(feature_count: u32, feature_size: u32) -> Self {
        Self {
            feature_count,
            feature_size,
        }
    }

    /// Four features with three values each: the 81-card game.
    pub const fn standard() -> Self {
        Self::new(4, 3)
    }

    pub const fn feature_size(&self) -> usize {
        self.feature_size as usize
    }

    /// Number of distinct cards, or `None` when it does not fit a `usize`.
    pub fn deck_size(&self) -> Option<usize> {
        (self.feature_size as usize).checked_pow(self.feature_count)
    }

    pub fn features(&self, card: Card) -> Option<Vec<u32>> {
        let deck_size = self.deck_size()?;
        if self.feature_size < 2 || card.index() >= deck_size {
            return None;
        }
        let mut rest = card.id();
        let features = (0..self.feature_count)
            .map(|_| {
                let digit = rest % self.feature_size;
                rest /= self.feature_size;
                digit
            })
            .collect();
        Some(features)
    }
}

impl Default for FeatureOracle {
    fn default() -> Self {
        Self::standard()
    }
}

impl SetOracle for FeatureOracle {
    fn test_set(&self, cards: &[Card]) -> bool {
        if cards.len() != self.feature_size() {
            return false;
        }
        let Some(decoded) = cards
            .iter()
            .map(|&card| self.features(card))
            .collect::<Option<Vec<_>>>()
        else {
            return false;
        };
        (0..self.feature_count as usize).all(|feature| {
            let distinct: BTreeSet<u32> = decoded.iter().map(|f| f[feature]).collect();
            distinct.len() == 1 || distinct.len() == cards.len()
        })
    }

    fn find_sets(&self, cards: &[Card], cap: usize) -> Vec<Vec<Card>> {
        let k = self.feature_size();
        let mut found = Vec::new();
        if k == 0 || cards.len() < k {
            return found;
        }
        let mut picks: Vec<usize> = (0..k).collect();
        loop {
            let candidate: Vec<Card> = picks.iter().map(|&i| cards[i]).collect();
            if self.test_set(&candidate) {
                found.push(candidate);
                if cap != 0 && found.len() >= cap {
                    return found;
                }
            }
            // advance to the next combination in lexicographic order
            let Some(pos) = (0..k).rev().find(|&i| picks[i] != i + cards.len() - k) else {
                return found;
            };
            picks[pos] += 1;
            for i in pos + 1..k {
                picks[i] = picks[i - 1] + 1;
            }
        }
    }
}
