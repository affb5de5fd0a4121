use crate::model::PlayerId;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerScore {
    pub player: PlayerId,
    pub score: u32,
}

/// Final standings returned by the dealer once the game is over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameOutcome {
    /// Every player sharing the top score, in seating order.
    pub winners: Vec<PlayerId>,
    pub scores: Vec<PlayerScore>,
    pub rounds: u32,
    pub sets_collected: u32,
}

impl GameOutcome {
    pub fn from_scores(scores: Vec<PlayerScore>, rounds: u32, sets_collected: u32) -> Self {
        let best = scores.iter().map(|entry| entry.score).max().unwrap_or(0);
        let winners = scores
            .iter()
            .filter(|entry| entry.score == best)
            .map(|entry| entry.player)
            .collect();
        Self {
            winners,
            scores,
            rounds,
            sets_collected,
        }
    }

    pub fn top_score(&self) -> u32 {
        self.scores.iter().map(|entry| entry.score).max().unwrap_or(0)
    }
}
