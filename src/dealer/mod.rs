use super::{Action, ApplyOutcome, Event, Game, PlayerId, Suit, CL, ANTE, NUM_PLAYERS};
use kanal::AsyncReceiver;
use std::sync::Arc;
use tokio::sync::broadcast::Sender;


/// Runs rounds against the player tasks: grants one turn per tick in
/// fixed index order, applies whatever comes back, and settles at the
/// bell. The game itself stays single-writer; this is the only task
/// touching it.
pub struct Dealer {
    pub round: u32,
    pub rounds_to_play: Option<u32>,
    pub game: Game,
    pub event_sender: Sender<Event>,
    pub action_receiver: Arc<AsyncReceiver<(PlayerId, Action)>>,
}

impl Dealer {
    pub fn new(
        game: Game,
        rounds_to_play: Option<u32>,
        event_sender: Sender<Event>,
        action_receiver: Arc<AsyncReceiver<(PlayerId, Action)>>,
    ) -> Self {
        Self {
            round: 0,
            rounds_to_play,
            game,
            event_sender,
            action_receiver,
        }
    }

    pub async fn start(&mut self) {
        // let the player tasks subscribe before the first deal
        tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;

        loop {
            self.round += 1;
            self.game.start_round();

            println!("{}==================== ROUND {} ===================={}", CL::Purple.get(), self.round, CL::End.get());
            println!("{} - Ante: {}{}", CL::Dull.get(), ANTE, CL::End.get());
            println!("{} - Pot: {}{}", CL::Dull.get(), self.game.pot(), CL::End.get());
            println!("{} - Goal suit: {}{:?}{}", CL::Dull.get(), CL::LimeGreen.get(), self.game.goal_suit(), CL::End.get());
            println!();

            println!("{}[+] Dealing cards...{}\n", CL::DimLightBlue.get(), CL::End.get());
            let hands = [0, 1, 2, 3].map(|id| *self.game.player_hand(id));
            let cash = [0, 1, 2, 3].map(|id| self.game.player_cash(id));
            if let Err(e) = self.event_sender.send(Event::DealCards { hands, cash }) {
                println!("{}[!] Error sending deal event: {:?}{}", CL::Red.get(), e, CL::End.get());
            }

            // =-= Tick loop =-= //
            while !self.game.has_ended() {
                let tick = self.game.elapsed_ticks();
                let player = tick as usize % NUM_PLAYERS;
                let turn = Event::Turn {
                    player,
                    view: self.game.market_view(),
                    hand: *self.game.player_hand(player),
                    cash: self.game.player_cash(player),
                };
                if self.event_sender.send(turn).is_err() {
                    println!("{}[!] No players listening, table closed{}", CL::Red.get(), CL::End.get());
                    return;
                }

                let (id, action) = match self.action_receiver.recv().await {
                    Ok(pair) => pair,
                    Err(_) => return, // all player tasks dropped their senders
                };
                let outcome = self.game.apply_action(id, action);
                self.game.advance_tick();

                let trade = match outcome {
                    ApplyOutcome::Traded(trade) => {
                        println!(
                            "{}[-] Trade |:| p{} buys {:?} from p{} @ {}{}",
                            CL::Green.get(), trade.buyer, trade.suit, trade.seller, trade.price, CL::End.get()
                        );
                        Some(trade)
                    }
                    _ => None,
                };
                let update = Event::Update { view: self.game.market_view(), trade };
                if let Err(e) = self.event_sender.send(update) {
                    println!("[!] Error sending update event: {:?}", e);
                }
            }

            // =-= Round over: score it =-= //
            let goal_suit = self.game.goal_suit();
            let scores = self.game.final_scores();
            self.print_round_report(goal_suit, &scores);

            if let Err(e) = self.event_sender.send(Event::EndRound { goal_suit, scores }) {
                println!("[!] Error sending end round event: {:?}", e);
            }

            self.game.settle_round();
            if self.game.knocked_out() {
                println!("{}[!] A player fell below the floor, bankrolls reset next round{}", CL::Orange.get(), CL::End.get());
            }

            if let Some(limit) = self.rounds_to_play {
                if self.round >= limit {
                    return;
                }
            }
            tokio::time::sleep(tokio::time::Duration::from_secs(1)).await;
        }
    }

    fn print_round_report(&self, goal_suit: Suit, scores: &[f64; NUM_PLAYERS]) {
        println!();
        println!("{}=---=---=---=---=---= Round over! =---=---=---=---=---={}", CL::Pink.get(), CL::End.get());
        println!("{} - Goal suit: {}{:?}{}", CL::Dull.get(), CL::LimeGreen.get(), goal_suit, CL::End.get());
        println!();

        println!("=----------------------- Holdings -----------------------=");
        for id in 0..NUM_PLAYERS {
            let hand = self.game.player_hand(id);
            let goal_cards = hand.get(goal_suit);
            println!(
                "{}p{} |:| Hearts: {}x | Clubs: {}x | Diamonds: {}x | Spades: {}x | {}goal: {}x{}",
                CL::DullTeal.get(),
                id,
                hand.get(Suit::Hearts),
                hand.get(Suit::Clubs),
                hand.get(Suit::Diamonds),
                hand.get(Suit::Spades),
                CL::LimeGreen.get(),
                goal_cards,
                CL::End.get()
            );
        }
        println!();

        println!("=------------------------ Scores ------------------------=");
        let mut line = String::from("Settled |:| ");
        for (id, score) in scores.iter().enumerate() {
            line += &format!("p{}: {:.1} | ", id, score);
        }
        line.truncate(line.len() - 3);
        println!("{}{}{}", CL::DullGreen.get(), line, CL::End.get());
        println!();
    }
}
