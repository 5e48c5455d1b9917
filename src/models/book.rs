use super::{PlayerId, RestingOrder, Side};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Read-only top-of-book view. `owner: None` is the empty sentinel
/// (an empty side trades with nobody at price 0).
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Quote {
    pub price: u64,
    pub owner: Option<PlayerId>,
}

impl Quote {
    pub const NONE: Quote = Quote { price: 0, owner: None };

    fn top(order: &RestingOrder) -> Quote {
        Quote {
            price: order.price,
            owner: Some(order.owner),
        }
    }
}

// Heap entries carry the comparator: bids pop max price, asks pop min
// price, and among equals the earlier arrival wins on both sides.

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct BidEntry(RestingOrder);

impl Ord for BidEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .price
            .cmp(&other.0.price)
            .then_with(|| other.0.arrival.cmp(&self.0.arrival))
    }
}

impl PartialOrd for BidEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct AskEntry(RestingOrder);

impl Ord for AskEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .price
            .cmp(&self.0.price)
            .then_with(|| other.0.arrival.cmp(&self.0.arrival))
    }
}

impl PartialOrd for AskEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One suit's resting quotes. Orders are never cancelled individually;
/// they only leave through `clear`.
#[derive(Debug, Default)]
pub struct OrderBook {
    bids: BinaryHeap<BidEntry>,
    asks: BinaryHeap<AskEntry>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Posting never validates price or holdings; a quote always rests.
    pub fn post(&mut self, side: Side, price: u64, owner: PlayerId, arrival: u64) {
        let order = RestingOrder { price, owner, arrival };
        match side {
            Side::Buy => self.bids.push(BidEntry(order)),
            Side::Sell => self.asks.push(AskEntry(order)),
        }
    }

    pub fn best_bid(&self) -> Quote {
        self.bids.peek().map_or(Quote::NONE, |e| Quote::top(&e.0))
    }

    pub fn best_ask(&self) -> Quote {
        self.asks.peek().map_or(Quote::NONE, |e| Quote::top(&e.0))
    }

    pub fn clear(&mut self) {
        self.bids.clear();
        self.asks.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}
