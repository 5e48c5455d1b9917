use super::{Action, Event, Inventory, MarketView, PlayerId, Side, Suit, CL};
use kanal::AsyncSender;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Sender;


/// A noisy market participant: picks a random suit and side each turn,
/// quotes into empty books and takes prices that look like free money.
/// Good enough to keep a table liquid.
pub struct HeuristicPlayer {
    pub id: PlayerId,
    pub verbose: bool,
    pub event_receiver: Sender<Event>,
    pub action_sender: Arc<AsyncSender<(PlayerId, Action)>>,
    rng: StdRng,
}

impl HeuristicPlayer {
    pub fn new(
        id: PlayerId,
        verbose: bool,
        event_receiver: Sender<Event>,
        action_sender: Arc<AsyncSender<(PlayerId, Action)>>,
    ) -> Self {
        Self {
            id,
            verbose,
            event_receiver,
            action_sender,
            rng: StdRng::from_entropy(),
        }
    }

    pub async fn start(&mut self) {
        let mut events = self.event_receiver.subscribe();
        loop {
            match events.recv().await {
                Ok(Event::Turn { player, view, hand, cash }) if player == self.id => {
                    let action = self.decide(&view, &hand, cash);
                    if self.verbose {
                        println!(
                            "{}[p{}] tick {} |:| {:?}{}",
                            CL::Dull.get(),
                            self.id,
                            view.tick,
                            action,
                            CL::End.get()
                        );
                    }
                    if self.action_sender.send((self.id, action)).await.is_err() {
                        break; // dealer is gone
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    }

    fn decide(&mut self, view: &MarketView, hand: &Inventory, cash: i64) -> Action {
        let suit = Suit::ALL[self.rng.gen_range(0..4)];
        let side = if self.rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };

        match side {
            Side::Buy => {
                let bid = view.best_bid(suit);
                if bid.owner.is_none() && cash >= 10 {
                    // empty bid side: show a small bid
                    Action::Show { suit, side: Side::Buy, price: self.rng.gen_range(0..=10) }
                } else if bid.price >= 7 && hand.get(suit) > 0 {
                    // someone bids rich for a card we hold
                    Action::Take { suit, side: Side::Sell }
                } else {
                    Action::Pass
                }
            }
            Side::Sell => {
                let ask = view.best_ask(suit);
                if ask.owner.is_none() && hand.get(suit) > 0 {
                    // empty ask side: offer one of ours
                    Action::Show { suit, side: Side::Sell, price: self.rng.gen_range(10..=20) }
                } else if ask.owner.is_some()
                    && ask.price <= 13
                    && i64::try_from(ask.price).map_or(false, |p| cash >= p)
                {
                    // cheap ask: lift it
                    Action::Take { suit, side: Side::Buy }
                } else {
                    Action::Pass
                }
            }
        }
    }
}
