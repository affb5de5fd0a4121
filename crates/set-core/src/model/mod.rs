pub mod card;
pub mod deck;
pub mod table;

pub use card::{Card, PlayerId, Slot};
pub use deck::Deck;
pub use table::{SlotGuard, Table, TableError};
