use parking_lot::Mutex;
use set_core::model::{Card, PlayerId, Slot};
use set_core::oracle::FeatureOracle;
use set_core::view::TableView;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, trace};

/// Terminal presentation: every notification becomes a tracing event and
/// the final standings are printed on stdout.
pub struct ConsoleView {
    oracle: FeatureOracle,
    scores: Mutex<BTreeMap<PlayerId, u32>>,
}

impl ConsoleView {
    pub fn new(oracle: FeatureOracle) -> Self {
        Self {
            oracle,
            scores: Mutex::new(BTreeMap::new()),
        }
    }

    /// Card id followed by its feature digits, e.g. `#40[1,1,1,1]`.
    pub fn describe(&self, card: Card) -> String {
        match self.oracle.features(card) {
            Some(features) => {
                let digits: Vec<String> = features.iter().map(u32::to_string).collect();
                format!("{card}[{}]", digits.join(","))
            }
            None => card.to_string(),
        }
    }

    /// Winner line printed once the game is over.
    fn winner_line(&self, winners: &[PlayerId]) -> String {
        let top = winners
            .first()
            .and_then(|player| self.scores.lock().get(player).copied())
            .unwrap_or(0);
        let sets = if top == 1 { "set" } else { "sets" };
        match winners {
            [single] => format!("The winner is {single} with {top} {sets}!"),
            _ => {
                let names: Vec<String> = winners.iter().map(PlayerId::to_string).collect();
                format!("It is a draw between {} with {top} {sets}.", names.join(", "))
            }
        }
    }
}

impl TableView for ConsoleView {
    fn place_card(&self, card: Card, slot: Slot) {
        debug!(slot, card = %self.describe(card), "card placed");
    }

    fn remove_card(&self, slot: Slot) {
        debug!(slot, "card removed");
    }

    fn place_token(&self, player: PlayerId, slot: Slot) {
        trace!(%player, slot, "token placed");
    }

    fn remove_token(&self, player: PlayerId, slot: Slot) {
        trace!(%player, slot, "token removed");
    }

    fn remove_tokens(&self) {
        debug!("all tokens cleared");
    }

    fn set_countdown(&self, time_left: Duration, warn: bool) {
        trace!(millis = time_left.as_millis() as u64, warn, "countdown");
    }

    fn set_score(&self, player: PlayerId, score: u32) {
        self.scores.lock().insert(player, score);
        info!(%player, score, "score updated");
    }

    fn set_freeze(&self, player: PlayerId, time_left: Duration) {
        trace!(%player, millis = time_left.as_millis() as u64, "freeze");
    }

    fn announce_winner(&self, winners: &[PlayerId]) {
        let line = self.winner_line(winners);
        info!(winners = ?winners, "game over");
        println!("{line}");
    }
}
