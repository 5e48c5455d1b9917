pub mod event;
pub use event::*;
pub mod book;
pub use book::*;
pub mod market;
pub use market::*;
pub mod inventory;
pub use inventory::*;
pub mod order;
pub use order::*;

pub type PlayerId = usize;


#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Suit {
    Hearts,
    Clubs,
    Diamonds,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Clubs, Suit::Diamonds, Suit::Spades];

    pub fn index(self) -> usize {
        match self {
            Suit::Hearts => 0,
            Suit::Clubs => 1,
            Suit::Diamonds => 2,
            Suit::Spades => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Suit> {
        Suit::ALL.get(index).copied()
    }

    // the suit of the same color; it always carries 12 cards when this suit is the goal
    pub fn color_partner(self) -> Suit {
        match self {
            Suit::Hearts => Suit::Diamonds,
            Suit::Diamonds => Suit::Hearts,
            Suit::Clubs => Suit::Spades,
            Suit::Spades => Suit::Clubs,
        }
    }

    pub fn off_color_pair(self) -> (Suit, Suit) {
        match self {
            Suit::Hearts | Suit::Diamonds => (Suit::Clubs, Suit::Spades),
            Suit::Clubs | Suit::Spades => (Suit::Hearts, Suit::Diamonds),
        }
    }
}
