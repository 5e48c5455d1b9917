use super::{Inventory, PlayerId, Quote, Suit};
use std::sync::{Arc, Mutex};


#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct TradeEvent {
    pub suit: Suit,
    pub price: u64,
    pub buyer: PlayerId,
    pub seller: PlayerId,
}

/// Why an action left the game untouched. Purely observational: the
/// engine never surfaces these as errors.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum NoOpReason {
    Passed,
    EmptyBook,
    SelfTrade,
    SellerOutOfStock,
    InsufficientCash,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ApplyOutcome {
    Quoted,
    Traded(TradeEvent),
    NoOp(NoOpReason),
}

/// Snapshot of the top of every book, indexed by `Suit::index()`.
#[derive(Debug, Clone, Copy)]
pub struct MarketView {
    pub best_bids: [Quote; 4],
    pub best_asks: [Quote; 4],
    pub tick: u32,
}

impl MarketView {
    pub fn best_bid(&self, suit: Suit) -> Quote {
        self.best_bids[suit.index()]
    }

    pub fn best_ask(&self, suit: Suit) -> Quote {
        self.best_asks[suit.index()]
    }
}

/// Broadcast from the dealer to the player tasks.
#[derive(Debug, Clone)]
pub enum Event {
    DealCards { hands: [Inventory; 4], cash: [i64; 4] },
    Turn { player: PlayerId, view: MarketView, hand: Inventory, cash: i64 },
    Update { view: MarketView, trade: Option<TradeEvent> },
    EndRound { goal_suit: Suit, scores: [f64; 4] },
}

/// Observer invoked once per settled trade. Passed into the game so
/// independent simulations never share a log.
pub trait TradeSink: Send {
    fn on_trade(&mut self, trade: &TradeEvent);
}

pub struct NullSink;

impl TradeSink for NullSink {
    fn on_trade(&mut self, _trade: &TradeEvent) {}
}

/// Shared in-memory recorder; clones observe the same stream.
#[derive(Clone, Default)]
pub struct TradeRecorder {
    trades: Arc<Mutex<Vec<TradeEvent>>>,
}

impl TradeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trades(&self) -> Vec<TradeEvent> {
        self.trades.lock().expect("trade recorder poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.trades.lock().expect("trade recorder poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TradeSink for TradeRecorder {
    fn on_trade(&mut self, trade: &TradeEvent) {
        self.trades.lock().expect("trade recorder poisoned").push(*trade);
    }
}
