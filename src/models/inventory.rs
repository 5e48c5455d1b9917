use super::Suit;

/// A hand of cards as a per-suit multiset.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Inventory {
    counts: [usize; 4],
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, suit: Suit) {
        self.counts[suit.index()] += 1;
    }

    /// Removes one card of the suit; reports false when none is held so
    /// callers can treat the transfer as unavailable instead of panicking.
    pub fn remove(&mut self, suit: Suit) -> bool {
        let slot = &mut self.counts[suit.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    pub fn get(&self, suit: Suit) -> usize {
        self.counts[suit.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}
