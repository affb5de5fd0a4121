use crate::game::link::DealerLink;
use crate::game::seat::Seat;
use crate::model::{Card, PlayerId, Slot, Table};
use std::sync::Arc;
use std::time::Duration;

/// Input handle bound to one participant.
///
/// Cloned freely into keyboard readers and synthetic companions; every
/// press goes through the same rejection rules.
#[derive(Clone)]
pub struct KeyPad {
    seat: Arc<Seat>,
    table: Arc<Table>,
    link: Arc<DealerLink>,
}

impl KeyPad {
    pub(crate) fn new(seat: Arc<Seat>, table: Arc<Table>, link: Arc<DealerLink>) -> Self {
        Self { seat, table, link }
    }

    pub fn player(&self) -> PlayerId {
        self.seat.id()
    }

    /// Queues `slot` for the participant. Returns `false` when the press is
    /// dropped: the player is frozen, the dealer has the slot or the table
    /// gated, the slot is empty, or the action queue is full.
    pub fn key_pressed(&self, slot: Slot) -> bool {
        if !self.table.contains_slot(slot)
            || self.seat.is_serving()
            || !self.link.accepts(slot)
            || self.table.card_at(slot).is_none()
        {
            return false;
        }
        self.seat.actions.offer(slot)
    }

    pub fn is_active(&self) -> bool {
        !self.seat.is_stopping()
    }

    /// Sleeps unless the participant is being shut down; `false` if cut short.
    pub fn pause(&self, duration: Duration) -> bool {
        self.seat.pause(duration)
    }

    pub fn table_size(&self) -> usize {
        self.table.size()
    }

    /// Lock-free sample of the table; may be stale on return.
    pub fn table_cards(&self) -> Vec<(Slot, Card)> {
        self.table.cards_on_table()
    }

    pub fn score(&self) -> u32 {
        self.seat.score()
    }

    pub fn tokens(&self) -> Vec<Slot> {
        self.seat.tokens()
    }

    pub fn is_frozen(&self) -> bool {
        self.seat.is_serving()
    }

    pub fn queued_actions(&self) -> usize {
        self.seat.actions.len()
    }
}

impl std::fmt::Debug for KeyPad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPad")
            .field("player", &self.player())
            .field("human", &self.seat.is_human())
            .finish()
    }
}

/// Input task run on its own thread next to a participant, started when
/// the participant starts and joined when it exits.
pub trait Companion: Send + 'static {
    fn run(self: Box<Self>, keys: KeyPad);
}
