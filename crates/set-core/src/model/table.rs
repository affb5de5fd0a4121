use crate::model::card::{Card, PlayerId, Slot};
use crate::view::TableView;
use parking_lot::{Mutex, MutexGuard};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use thiserror::Error;

const EMPTY: u32 = u32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("slot {slot} is out of range for a table of {size}")]
    NoSuchSlot { slot: Slot, size: usize },
    #[error("slot {slot} already holds card {card}")]
    SlotOccupied { slot: Slot, card: Card },
}

/// Slot to card mapping plus the tokens placed on each slot.
///
/// Each slot's token set doubles as that slot's monitor: every write to the
/// slot's card or tokens happens through a [`SlotGuard`]. Bulk operations
/// take [`Table::lock_bulk`] first and per-slot monitors second; the order
/// is never reversed.
///
/// Card lookups through [`Table::card_at`] are lock-free samples and may go
/// stale as soon as they return.
pub struct Table {
    slots: Vec<Mutex<BTreeSet<PlayerId>>>,
    cards: Vec<AtomicU32>,
    bulk: Mutex<()>,
    view: Arc<dyn TableView>,
}

impl Table {
    pub fn new(size: usize, view: Arc<dyn TableView>) -> Self {
        Self {
            slots: (0..size).map(|_| Mutex::new(BTreeSet::new())).collect(),
            cards: (0..size).map(|_| AtomicU32::new(EMPTY)).collect(),
            bulk: Mutex::new(()),
            view,
        }
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn contains_slot(&self, slot: Slot) -> bool {
        slot < self.slots.len()
    }

    pub fn view(&self) -> &Arc<dyn TableView> {
        &self.view
    }

    /// Table-wide monitor for deals and full clears.
    pub fn lock_bulk(&self) -> MutexGuard<'_, ()> {
        self.bulk.lock()
    }

    pub fn lock_slot(&self, slot: Slot) -> Result<SlotGuard<'_>, TableError> {
        let tokens = self
            .slots
            .get(slot)
            .ok_or(TableError::NoSuchSlot {
                slot,
                size: self.size(),
            })?
            .lock();
        Ok(SlotGuard {
            table: self,
            slot,
            tokens,
        })
    }

    pub fn card_at(&self, slot: Slot) -> Option<Card> {
        self.cards.get(slot).and_then(|cell| decode(cell.load(Ordering::Acquire)))
    }

    pub fn place_card(&self, card: Card, slot: Slot) -> Result<(), TableError> {
        self.lock_slot(slot)?.place_card(card)
    }

    pub fn remove_card(&self, slot: Slot) -> Result<Option<Card>, TableError> {
        Ok(self.lock_slot(slot)?.remove_card())
    }

    pub fn place_token(&self, player: PlayerId, slot: Slot) -> Result<bool, TableError> {
        Ok(self.lock_slot(slot)?.place_token(player))
    }

    pub fn remove_token(&self, player: PlayerId, slot: Slot) -> Result<bool, TableError> {
        Ok(self.lock_slot(slot)?.remove_token(player))
    }

    pub fn count_cards(&self) -> usize {
        (0..self.size())
            .filter(|&slot| self.card_at(slot).is_some())
            .count()
    }

    pub fn empty_slots(&self) -> Vec<Slot> {
        (0..self.size())
            .filter(|&slot| self.card_at(slot).is_none())
            .collect()
    }

    /// Lock-free sample of every occupied slot.
    pub fn cards_on_table(&self) -> Vec<(Slot, Card)> {
        (0..self.size())
            .filter_map(|slot| self.card_at(slot).map(|card| (slot, card)))
            .collect()
    }

    pub fn tokens_at(&self, slot: Slot) -> Vec<PlayerId> {
        self.slots
            .get(slot)
            .map(|tokens| tokens.lock().iter().copied().collect())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("size", &self.size())
            .field("cards", &self.cards_on_table())
            .finish()
    }
}

fn decode(raw: u32) -> Option<Card> {
    (raw != EMPTY).then(|| Card::new(raw))
}

/// Exclusive access to one slot's card and tokens.
pub struct SlotGuard<'a> {
    table: &'a Table,
    slot: Slot,
    tokens: MutexGuard<'a, BTreeSet<PlayerId>>,
}

impl SlotGuard<'_> {
    pub fn card(&self) -> Option<Card> {
        self.table.card_at(self.slot)
    }

    pub fn place_card(&mut self, card: Card) -> Result<(), TableError> {
        if let Some(existing) = self.card() {
            return Err(TableError::SlotOccupied {
                slot: self.slot,
                card: existing,
            });
        }
        self.table.cards[self.slot].store(card.id(), Ordering::Release);
        self.table.view.place_card(card, self.slot);
        Ok(())
    }

    /// Clears the slot's card. Tokens are left alone; callers remove them first.
    pub fn remove_card(&mut self) -> Option<Card> {
        let previous = decode(self.table.cards[self.slot].swap(EMPTY, Ordering::AcqRel));
        if previous.is_some() {
            self.table.view.remove_card(self.slot);
        }
        previous
    }

    pub fn place_token(&mut self, player: PlayerId) -> bool {
        let inserted = self.tokens.insert(player);
        if inserted {
            self.table.view.place_token(player, self.slot);
        }
        inserted
    }

    pub fn remove_token(&mut self, player: PlayerId) -> bool {
        let removed = self.tokens.remove(&player);
        if removed {
            self.table.view.remove_token(player, self.slot);
        }
        removed
    }

    pub fn tokens(&self) -> Vec<PlayerId> {
        self.tokens.iter().copied().collect()
    }
}
