mod seeker;
mod uniform;

pub use seeker::SeekerPolicy;
pub use uniform::UniformPolicy;

use serde::{Deserialize, Serialize};
use set_core::model::{Card, PlayerId, Slot};
use set_core::oracle::SetOracle;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// What a synthetic player can see before pressing keys.
pub struct PolicyContext<'a> {
    pub player: PlayerId,
    pub table_size: usize,
    /// Lock-free sample of the occupied slots.
    pub table: &'a [(Slot, Card)],
    /// Slots the player currently holds tokens on.
    pub held: &'a [Slot],
}

/// Chooses which slots a synthetic player presses next.
pub trait Policy: Send {
    /// Slots to press, in order. An empty list skips this turn.
    fn next_slots(&mut self, ctx: &PolicyContext) -> Vec<Slot>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotStrategy {
    /// One uniformly random slot per turn.
    #[default]
    Uniform,
    /// Looks for a set among the visible cards and presses it.
    Seeker,
}

impl BotStrategy {
    pub fn build(self, oracle: Arc<dyn SetOracle>, feature_size: usize, seed: u64) -> Box<dyn Policy> {
        match self {
            BotStrategy::Uniform => Box::new(UniformPolicy::with_seed(seed)),
            BotStrategy::Seeker => Box::new(SeekerPolicy::with_seed(oracle, feature_size, seed)),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            BotStrategy::Uniform => "uniform",
            BotStrategy::Seeker => "seeker",
        }
    }
}

impl fmt::Display for BotStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BotStrategy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "uniform" | "random" => Ok(BotStrategy::Uniform),
            "seeker" | "smart" => Ok(BotStrategy::Seeker),
            other => Err(format!("unknown bot strategy '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BotStrategy;

    #[test]
    fn parses_strategy_aliases() {
        assert_eq!("Random".parse::<BotStrategy>(), Ok(BotStrategy::Uniform));
        assert_eq!(" seeker ".parse::<BotStrategy>(), Ok(BotStrategy::Seeker));
        assert!("psychic".parse::<BotStrategy>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for strategy in [BotStrategy::Uniform, BotStrategy::Seeker] {
            assert_eq!(strategy.to_string().parse::<BotStrategy>(), Ok(strategy));
        }
    }
}
