use super::{Action, Event, Inventory, MarketView, PlayerId, Side, Suit, CL};

pub mod heuristic;
pub use heuristic::HeuristicPlayer;
