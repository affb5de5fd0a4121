use core::fmt;
use serde::{Deserialize, Serialize};

/// Index of a table position in `[0, table_size)`.
pub type Slot = usize;

/// Opaque card identifier in `[0, deck_size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Card(u32);

impl Card {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u32 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(usize);

impl PlayerId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, PlayerId};

    #[test]
    fn card_display_uses_identifier() {
        assert_eq!(Card::new(42).to_string(), "#42");
        assert_eq!(Card::new(7).index(), 7);
    }

    #[test]
    fn player_ids_order_by_index() {
        assert!(PlayerId::new(0) < PlayerId::new(3));
        assert_eq!(PlayerId::new(2).to_string(), "player-2");
    }
}
