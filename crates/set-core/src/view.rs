use crate::model::{Card, PlayerId, Slot};
use std::time::Duration;

/// Presentation sink notified of every table and player change.
///
/// Calls arrive from the dealer thread and from participant threads, often
/// while a slot monitor is held, so implementations must not block.
pub trait TableView: Send + Sync {
    fn place_card(&self, card: Card, slot: Slot);
    fn remove_card(&self, slot: Slot);
    fn place_token(&self, player: PlayerId, slot: Slot);
    fn remove_token(&self, player: PlayerId, slot: Slot);
    /// Drops every token visual at once (full table clear).
    fn remove_tokens(&self);
    fn set_countdown(&self, time_left: Duration, warn: bool);
    fn set_score(&self, player: PlayerId, score: u32);
    /// A zero duration means the player is no longer frozen.
    fn set_freeze(&self, player: PlayerId, time_left: Duration);
    fn announce_winner(&self, winners: &[PlayerId]);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl TableView for NullView {
    fn place_card(&self, _card: Card, _slot: Slot) {}
    fn remove_card(&self, _slot: Slot) {}
    fn place_token(&self, _player: PlayerId, _slot: Slot) {}
    fn remove_token(&self, _player: PlayerId, _slot: Slot) {}
    fn remove_tokens(&self) {}
    fn set_countdown(&self, _time_left: Duration, _warn: bool) {}
    fn set_score(&self, _player: PlayerId, _score: u32) {}
    fn set_freeze(&self, _player: PlayerId, _time_left: Duration) {}
    fn announce_winner(&self, _winners: &[PlayerId]) {}
}
