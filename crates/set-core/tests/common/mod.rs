#![allow(dead_code)]

use parking_lot::Mutex;
use set_core::model::{Card, PlayerId, Slot};
use set_core::oracle::SetOracle;
use set_core::view::TableView;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    PlaceCard(Card, Slot),
    RemoveCard(Slot),
    PlaceToken(PlayerId, Slot),
    RemoveToken(PlayerId, Slot),
    RemoveTokens,
    Countdown(Duration, bool),
    Score(PlayerId, u32),
    Freeze(PlayerId, Duration),
    Winners(Vec<PlayerId>),
}

/// View that keeps every notification for later inspection.
#[derive(Debug, Default)]
pub struct RecordingView {
    events: Mutex<Vec<Event>>,
}

impl RecordingView {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.events.lock().iter().filter(|event| predicate(event)).count()
    }

    /// Countdown refreshes that showed the full turn again.
    pub fn timer_resets(&self, turn: Duration) -> usize {
        self.count(|event| matches!(event, Event::Countdown(left, false) if *left == turn))
    }

    fn push(&self, event: Event) {
        self.events.lock().push(event);
    }
}

impl TableView for RecordingView {
    fn place_card(&self, card: Card, slot: Slot) {
        self.push(Event::PlaceCard(card, slot));
    }

    fn remove_card(&self, slot: Slot) {
        self.push(Event::RemoveCard(slot));
    }

    fn place_token(&self, player: PlayerId, slot: Slot) {
        self.push(Event::PlaceToken(player, slot));
    }

    fn remove_token(&self, player: PlayerId, slot: Slot) {
        self.push(Event::RemoveToken(player, slot));
    }

    fn remove_tokens(&self) {
        self.push(Event::RemoveTokens);
    }

    fn set_countdown(&self, time_left: Duration, warn: bool) {
        self.push(Event::Countdown(time_left, warn));
    }

    fn set_score(&self, player: PlayerId, score: u32) {
        self.push(Event::Score(player, score));
    }

    fn set_freeze(&self, player: PlayerId, time_left: Duration) {
        self.push(Event::Freeze(player, time_left));
    }

    fn announce_winner(&self, winners: &[PlayerId]) {
        self.push(Event::Winners(winners.to_vec()));
    }
}

/// Oracle whose answers are set by the test.
#[derive(Debug)]
pub struct ScriptedOracle {
    pub legal: AtomicBool,
    pub sets_left: AtomicBool,
    pub tests: AtomicUsize,
}

impl ScriptedOracle {
    pub fn new(legal: bool) -> Self {
        Self {
            legal: AtomicBool::new(legal),
            sets_left: AtomicBool::new(true),
            tests: AtomicUsize::new(0),
        }
    }

    pub fn exhaust(&self) {
        self.sets_left.store(false, Ordering::SeqCst);
    }
}

impl SetOracle for ScriptedOracle {
    fn test_set(&self, _cards: &[Card]) -> bool {
        self.tests.fetch_add(1, Ordering::SeqCst);
        self.legal.load(Ordering::SeqCst)
    }

    fn find_sets(&self, cards: &[Card], _cap: usize) -> Vec<Vec<Card>> {
        if self.sets_left.load(Ordering::SeqCst) && cards.len() >= 3 {
            vec![cards[..3].to_vec()]
        } else {
            Vec::new()
        }
    }
}

/// Polls `condition` until it holds or a generous deadline passes.
pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    false
}
