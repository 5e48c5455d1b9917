use super::{OrderBook, PlayerId, Quote, Side, Suit};
use std::collections::HashMap;

/// What a settled trade wipes. The historical behavior clears every
/// suit's book, not just the traded one; `TradedSuit` scopes the wipe
/// down without touching the matching path.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ResetPolicy {
    EntireMarket,
    TradedSuit,
}

/// The four per-suit books plus the global arrival counter that feeds
/// the price-time tie-break.
#[derive(Debug)]
pub struct Market {
    books: HashMap<Suit, OrderBook>,
    next_arrival: u64,
    policy: ResetPolicy,
}

impl Market {
    pub fn new(policy: ResetPolicy) -> Self {
        let mut books = HashMap::new();
        for suit in Suit::ALL {
            books.insert(suit, OrderBook::new());
        }
        Self {
            books,
            next_arrival: 0,
            policy,
        }
    }

    pub fn post(&mut self, suit: Suit, side: Side, price: u64, owner: PlayerId) {
        let arrival = self.next_arrival;
        self.next_arrival += 1;
        self.book_mut(suit).post(side, price, owner, arrival);
    }

    pub fn best(&self, side: Side, suit: Suit) -> Quote {
        match side {
            Side::Buy => self.best_bid(suit),
            Side::Sell => self.best_ask(suit),
        }
    }

    pub fn best_bid(&self, suit: Suit) -> Quote {
        self.book(suit).best_bid()
    }

    pub fn best_ask(&self, suit: Suit) -> Quote {
        self.book(suit).best_ask()
    }

    pub fn clear_all(&mut self) {
        for book in self.books.values_mut() {
            book.clear();
        }
    }

    pub fn clear_after_trade(&mut self, traded: Suit) {
        match self.policy {
            ResetPolicy::EntireMarket => self.clear_all(),
            ResetPolicy::TradedSuit => self.book_mut(traded).clear(),
        }
    }

    fn book(&self, suit: Suit) -> &OrderBook {
        self.books.get(&suit).unwrap_or_else(|| unreachable!("book missing for {suit:?}"))
    }

    fn book_mut(&mut self, suit: Suit) -> &mut OrderBook {
        self.books.get_mut(&suit).unwrap_or_else(|| unreachable!("book missing for {suit:?}"))
    }
}
