use crate::model::card::Card;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Cards that are neither on the table nor collected as a set.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn full(size: usize) -> Self {
        let cards = (0..size as u32).map(Card::new).collect();
        Self { cards }
    }

    pub fn shuffled_with_seed(size: usize, seed: u64) -> Self {
        let mut deck = Self::full(size);
        deck.shuffle_in_place(&mut StdRng::seed_from_u64(seed));
        deck
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Takes the card at the front of the deck.
    pub fn draw(&mut self) -> Option<Card> {
        if self.cards.is_empty() {
            None
        } else {
            Some(self.cards.remove(0))
        }
    }

    pub fn put_back(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}
