use super::{PlayerId, Suit};
use thiserror::Error;


#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// One submitted player action. `Take`'s side is the taker's intent:
/// `Buy` lifts the best ask, `Sell` hits the best bid.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Action {
    Pass,
    Show { suit: Suit, side: Side, price: u64 },
    Take { suit: Suit, side: Side },
}

/// A malformed externally-encoded action. Raised only at the decode
/// boundary; typed `Action`s cannot express these states.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum ActionError {
    #[error("unknown action kind code {0}")]
    UnknownKind(u8),
    #[error("unknown suit code {0}")]
    UnknownSuit(u8),
    #[error("unknown side code {0}")]
    UnknownSide(u8),
}

impl Action {
    /// Decodes the numeric encoding used by external drivers:
    /// kind PASS=0/SHOW=1/TAKE=2, suit HEARTS=0/CLUBS=1/DIAMONDS=2/SPADES=3,
    /// side BUY=0/SELL=1. Price is only meaningful for SHOW.
    pub fn from_codes(kind: u8, suit: u8, price: u64, side: u8) -> Result<Action, ActionError> {
        match kind {
            0 => Ok(Action::Pass),
            1 => Ok(Action::Show {
                suit: decode_suit(suit)?,
                side: decode_side(side)?,
                price,
            }),
            2 => Ok(Action::Take {
                suit: decode_suit(suit)?,
                side: decode_side(side)?,
            }),
            other => Err(ActionError::UnknownKind(other)),
        }
    }
}

fn decode_suit(code: u8) -> Result<Suit, ActionError> {
    Suit::from_index(code as usize).ok_or(ActionError::UnknownSuit(code))
}

fn decode_side(code: u8) -> Result<Side, ActionError> {
    match code {
        0 => Ok(Side::Buy),
        1 => Ok(Side::Sell),
        other => Err(ActionError::UnknownSide(other)),
    }
}

/// An order sitting in a book. `arrival` is issued by the market and is
/// globally monotonic; it is the sole tie-break between equal prices.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RestingOrder {
    pub price: u64,
    pub owner: PlayerId,
    pub arrival: u64,
}
