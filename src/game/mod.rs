use crate::models::{
    Action, ApplyOutcome, Inventory, Market, MarketView, NoOpReason, NullSink, PlayerId, Quote,
    ResetPolicy, Side, Suit, TradeEvent, TradeSink,
};
use rand::prelude::SliceRandom;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const NUM_PLAYERS: usize = 4;
pub const DECK_SIZE: usize = 40;
pub const STARTING_CASH: i64 = 350;
pub const ANTE: i64 = 50;
pub const ROUND_TICKS: u32 = 240;
pub const PAYOUT_PER_CARD: i64 = 10;
pub const KNOCKOUT_FLOOR: i64 = 50;


#[derive(Debug, Clone, Copy)]
pub struct Player {
    pub id: PlayerId,
    pub hand: Inventory,
    pub cash: i64,
}

/// One table of Figgie: four ledgers, the market, and the round clock.
///
/// Everything is synchronous and single-writer; an action is applied to
/// completion before the next one is looked at. Randomness comes only
/// from the injected rng, so a seed replays a round exactly.
pub struct Game {
    players: [Player; NUM_PLAYERS],
    market: Market,
    goal_suit: Suit,
    pot: i64,
    elapsed_ticks: u32,
    knocked_out: bool,
    rng: StdRng,
    sink: Box<dyn TradeSink>,
}

impl Game {
    pub fn new(rng: StdRng, policy: ResetPolicy, sink: Box<dyn TradeSink>) -> Self {
        let players = [0, 1, 2, 3].map(|id| Player {
            id,
            hand: Inventory::new(),
            cash: STARTING_CASH,
        });
        Self {
            players,
            market: Market::new(policy),
            goal_suit: Suit::Hearts,
            pot: 0,
            elapsed_ticks: 0,
            knocked_out: false,
            rng,
            sink,
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::new(
            StdRng::seed_from_u64(seed),
            ResetPolicy::EntireMarket,
            Box::new(NullSink),
        )
    }

    // =-= Round lifecycle =-= //

    /// Antes everyone up, draws a fresh goal suit and deck, deals, and
    /// rearms the clock. A knockout in the previous round puts every
    /// player back on the default bankroll first.
    pub fn start_round(&mut self) {
        if self.knocked_out {
            for player in &mut self.players {
                player.cash = STARTING_CASH;
            }
            self.knocked_out = false;
        }
        for player in &mut self.players {
            player.hand = Inventory::new();
            player.cash -= ANTE;
        }
        self.pot = ANTE * NUM_PLAYERS as i64;
        self.goal_suit = Suit::ALL[self.rng.gen_range(0..4)];
        self.elapsed_ticks = 0;
        self.market.clear_all();

        let deck = self.build_deck();
        for (i, card) in deck.into_iter().enumerate() {
            self.players[i % NUM_PLAYERS].hand.add(card);
        }
    }

    // 8 or 10 goal cards, 12 of its color partner, and the off-color
    // pair takes whatever keeps the deck at exactly 40.
    fn build_deck(&mut self) -> Vec<Suit> {
        let goal_count = if self.rng.gen_bool(0.5) { 8 } else { 10 };
        let partner = self.goal_suit.color_partner();
        let (off_a, off_b) = self.goal_suit.off_color_pair();
        let (count_a, count_b) = if goal_count == 8 {
            (10, 10)
        } else if self.rng.gen_bool(0.5) {
            (8, 10)
        } else {
            (10, 8)
        };

        let mut deck = Vec::with_capacity(DECK_SIZE);
        deck.extend(std::iter::repeat(self.goal_suit).take(goal_count));
        deck.extend(std::iter::repeat(partner).take(12));
        deck.extend(std::iter::repeat(off_a).take(count_a));
        deck.extend(std::iter::repeat(off_b).take(count_b));
        deck.shuffle(&mut self.rng);
        deck
    }

    pub fn advance_tick(&mut self) {
        self.elapsed_ticks += 1;
    }

    pub fn elapsed_ticks(&self) -> u32 {
        self.elapsed_ticks
    }

    pub fn has_ended(&self) -> bool {
        self.elapsed_ticks >= ROUND_TICKS
    }

    // =-= Trading =-= //

    /// Applies one action. Nothing here errors: a take that cannot
    /// settle leaves every ledger and book untouched, and the returned
    /// outcome only says which way it went.
    pub fn apply_action(&mut self, player: PlayerId, action: Action) -> ApplyOutcome {
        match action {
            Action::Pass => ApplyOutcome::NoOp(NoOpReason::Passed),
            Action::Show { suit, side, price } => {
                // quotes are posted on faith; holdings and cash are
                // only checked when someone takes the other side
                self.market.post(suit, side, price, player);
                ApplyOutcome::Quoted
            }
            Action::Take { suit, side } => self.take(player, suit, side),
        }
    }

    fn take(&mut self, taker: PlayerId, suit: Suit, intent: Side) -> ApplyOutcome {
        // buy intent lifts the best ask, sell intent hits the best bid
        let resting = match intent {
            Side::Buy => self.market.best_ask(suit),
            Side::Sell => self.market.best_bid(suit),
        };
        let counterpart = match resting.owner {
            Some(owner) => owner,
            None => return ApplyOutcome::NoOp(NoOpReason::EmptyBook),
        };
        if counterpart == taker {
            return ApplyOutcome::NoOp(NoOpReason::SelfTrade);
        }
        let price = resting.price;
        let (buyer, seller) = match intent {
            Side::Buy => (taker, counterpart),
            Side::Sell => (counterpart, taker),
        };

        // settlement-time re-validation: the resting quote may be stale
        if self.players[seller].hand.get(suit) == 0 {
            return ApplyOutcome::NoOp(NoOpReason::SellerOutOfStock);
        }
        // a price past the ledger's range can never be funded; a plain
        // cast would wrap negative and credit the buyer
        let cost = match i64::try_from(price) {
            Ok(cost) => cost,
            Err(_) => return ApplyOutcome::NoOp(NoOpReason::InsufficientCash),
        };
        if self.players[buyer].cash < cost {
            return ApplyOutcome::NoOp(NoOpReason::InsufficientCash);
        }

        self.players[seller].hand.remove(suit);
        self.players[buyer].hand.add(suit);
        self.players[buyer].cash -= cost;
        self.players[seller].cash += cost;

        let trade = TradeEvent { suit, price, buyer, seller };
        self.sink.on_trade(&trade);
        self.market.clear_after_trade(suit);

        ApplyOutcome::Traded(trade)
    }

    // =-= Scoring =-= //

    /// Settled cash per player: bankroll plus 10 per goal card plus an
    /// even (real-valued) split of the pot remainder among the players
    /// tied for the most goal cards. The standard payout is funded even
    /// past the pot, so the remainder can go negative; it is split as-is.
    pub fn final_scores(&self) -> [f64; NUM_PLAYERS] {
        let counts = self.players.map(|p| p.hand.get(self.goal_suit));
        let standard = counts.map(|c| PAYOUT_PER_CARD * c as i64);
        let remainder = self.pot - standard.iter().sum::<i64>();

        let top = counts.iter().copied().max().unwrap_or(0);
        let winners = counts.iter().filter(|&&c| c == top).count();
        let share = remainder as f64 / winners as f64;

        let mut scores = [0.0; NUM_PLAYERS];
        for i in 0..NUM_PLAYERS {
            scores[i] = self.players[i].cash as f64 + standard[i] as f64;
            if counts[i] == top {
                scores[i] += share;
            }
        }
        scores
    }

    /// Writes settled scores back into the ledgers (rounded to whole
    /// currency units) and flags a knockout if anyone lands below the
    /// floor; `start_round` acts on the flag.
    pub fn settle_round(&mut self) {
        let scores = self.final_scores();
        for (player, score) in self.players.iter_mut().zip(scores) {
            player.cash = score.round() as i64;
        }
        self.pot = 0;
        self.knocked_out = self.players.iter().any(|p| p.cash < KNOCKOUT_FLOOR);
    }

    // =-= Accessors =-= //

    pub fn best_bid(&self, suit: Suit) -> Quote {
        self.market.best_bid(suit)
    }

    pub fn best_ask(&self, suit: Suit) -> Quote {
        self.market.best_ask(suit)
    }

    pub fn player_hand(&self, id: PlayerId) -> &Inventory {
        &self.players[id].hand
    }

    pub fn player_cash(&self, id: PlayerId) -> i64 {
        self.players[id].cash
    }

    pub fn goal_suit(&self) -> Suit {
        self.goal_suit
    }

    pub fn pot(&self) -> i64 {
        self.pot
    }

    pub fn knocked_out(&self) -> bool {
        self.knocked_out
    }

    pub fn total_cards(&self) -> usize {
        self.players.iter().map(|p| p.hand.total()).sum()
    }

    pub fn total_cash(&self) -> i64 {
        self.players.iter().map(|p| p.cash).sum()
    }

    pub fn market_view(&self) -> MarketView {
        let mut view = MarketView {
            best_bids: [Quote::NONE; 4],
            best_asks: [Quote::NONE; 4],
            tick: self.elapsed_ticks,
        };
        for suit in Suit::ALL {
            view.best_bids[suit.index()] = self.market.best_bid(suit);
            view.best_asks[suit.index()] = self.market.best_ask(suit);
        }
        view
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn dealt_game(seed: u64) -> Game {
        let mut game = Game::from_seed(seed);
        game.start_round();
        game
    }

    // puts `counts[i]` goal cards in player i's hand, on a fixed table
    fn rigged_hands(game: &mut Game, goal: Suit, counts: [usize; 4]) {
        game.goal_suit = goal;
        for (player, count) in game.players.iter_mut().zip(counts) {
            player.hand = Inventory::new();
            for _ in 0..count {
                player.hand.add(goal);
            }
        }
    }

    #[test]
    fn deck_always_totals_forty() {
        for seed in 0..50 {
            let game = dealt_game(seed);
            assert_eq!(game.total_cards(), DECK_SIZE);
            for id in 0..NUM_PLAYERS {
                assert_eq!(game.player_hand(id).total(), DECK_SIZE / NUM_PLAYERS);
            }
        }
    }

    #[test]
    fn deck_suit_counts_follow_the_goal() {
        for seed in 0..50 {
            let game = dealt_game(seed);
            let goal = game.goal_suit();
            let count_of = |suit: Suit| -> usize {
                (0..NUM_PLAYERS).map(|id| game.player_hand(id).get(suit)).sum()
            };
            assert_eq!(count_of(goal.color_partner()), 12);
            assert!(matches!(count_of(goal), 8 | 10));
            let (a, b) = goal.off_color_pair();
            assert_eq!(count_of(goal) + count_of(a) + count_of(b), 28);
        }
    }

    #[test]
    fn ante_moves_into_the_pot() {
        let game = dealt_game(3);
        assert_eq!(game.pot(), ANTE * NUM_PLAYERS as i64);
        for id in 0..NUM_PLAYERS {
            assert_eq!(game.player_cash(id), STARTING_CASH - ANTE);
        }
    }

    #[test]
    fn round_ends_exactly_at_240_ticks() {
        let mut game = dealt_game(0);
        for _ in 0..(ROUND_TICKS - 1) {
            game.advance_tick();
        }
        assert_eq!(game.elapsed_ticks(), 239);
        assert!(!game.has_ended());
        game.advance_tick();
        assert!(game.has_ended());
    }

    #[test]
    fn show_posts_even_without_holdings() {
        let mut game = dealt_game(1);
        // find a suit player 0 does not hold
        let uncovered = Suit::ALL
            .into_iter()
            .find(|&s| game.player_hand(0).get(s) == 0);
        // all hands are 10 cards over 4 suits, so this can hold all four;
        // posting is unconditional either way
        let suit = uncovered.unwrap_or(Suit::Hearts);
        let outcome = game.apply_action(0, Action::Show { suit, side: Side::Sell, price: 9 });
        assert_eq!(outcome, ApplyOutcome::Quoted);
        assert_eq!(game.best_ask(suit), Quote { price: 9, owner: Some(0) });
    }

    #[test]
    fn take_on_empty_book_is_a_noop() {
        let mut game = dealt_game(1);
        let before_cards = game.total_cards();
        let before_cash = game.total_cash();
        let outcome = game.apply_action(2, Action::Take { suit: Suit::Clubs, side: Side::Buy });
        assert_eq!(outcome, ApplyOutcome::NoOp(NoOpReason::EmptyBook));
        assert_eq!(game.total_cards(), before_cards);
        assert_eq!(game.total_cash(), before_cash);
    }

    #[test]
    fn self_trade_changes_nothing() {
        let mut game = dealt_game(1);
        game.apply_action(2, Action::Show { suit: Suit::Spades, side: Side::Buy, price: 8 });
        let cash_before = game.player_cash(2);
        let hand_before = *game.player_hand(2);
        let outcome = game.apply_action(2, Action::Take { suit: Suit::Spades, side: Side::Sell });
        assert_eq!(outcome, ApplyOutcome::NoOp(NoOpReason::SelfTrade));
        assert_eq!(game.player_cash(2), cash_before);
        assert_eq!(*game.player_hand(2), hand_before);
        // the resting bid survives a failed take
        assert_eq!(game.best_bid(Suit::Spades).owner, Some(2));
    }

    #[test]
    fn stale_quote_fails_silently_when_seller_runs_dry() {
        let mut game = dealt_game(7);
        rigged_hands(&mut game, Suit::Diamonds, [1, 3, 3, 3]);

        // player 0's only diamond goes out through a real trade
        game.apply_action(0, Action::Show { suit: Suit::Diamonds, side: Side::Sell, price: 5 });
        let first = game.apply_action(1, Action::Take { suit: Suit::Diamonds, side: Side::Buy });
        assert!(matches!(first, ApplyOutcome::Traded(_)));

        // the re-quote rests fine, but settlement finds an empty hand
        game.apply_action(0, Action::Show { suit: Suit::Diamonds, side: Side::Sell, price: 5 });
        let cards = game.total_cards();
        let cash = game.total_cash();
        let second = game.apply_action(1, Action::Take { suit: Suit::Diamonds, side: Side::Buy });
        assert_eq!(second, ApplyOutcome::NoOp(NoOpReason::SellerOutOfStock));
        assert_eq!(game.total_cards(), cards);
        assert_eq!(game.total_cash(), cash);
    }

    #[test]
    fn buyer_without_cash_cannot_settle() {
        let mut game = dealt_game(7);
        rigged_hands(&mut game, Suit::Hearts, [2, 2, 2, 2]);
        game.players[1].cash = 3;
        game.apply_action(0, Action::Show { suit: Suit::Hearts, side: Side::Sell, price: 4 });
        let outcome = game.apply_action(1, Action::Take { suit: Suit::Hearts, side: Side::Buy });
        assert_eq!(outcome, ApplyOutcome::NoOp(NoOpReason::InsufficientCash));
        assert_eq!(game.player_cash(1), 3);
        assert_eq!(game.player_hand(1).get(Suit::Hearts), 2);
    }

    #[test]
    fn an_ask_past_the_ledger_range_never_settles() {
        let mut game = dealt_game(7);
        rigged_hands(&mut game, Suit::Hearts, [2, 2, 2, 2]);
        // posting is unbounded, so a quote beyond i64 is legal and rests
        game.apply_action(0, Action::Show { suit: Suit::Hearts, side: Side::Sell, price: u64::MAX });
        assert_eq!(game.best_ask(Suit::Hearts).price, u64::MAX);

        let cash_before = game.player_cash(1);
        let total_cash = game.total_cash();
        let outcome = game.apply_action(1, Action::Take { suit: Suit::Hearts, side: Side::Buy });
        // no buyer can fund it; a wrapping cast would credit the buyer instead
        assert_eq!(outcome, ApplyOutcome::NoOp(NoOpReason::InsufficientCash));
        assert_eq!(game.player_cash(1), cash_before);
        assert_eq!(game.player_hand(1).get(Suit::Hearts), 2);
        assert_eq!(game.total_cash(), total_cash);
        assert_eq!(game.best_ask(Suit::Hearts).owner, Some(0));
    }

    #[test]
    fn settled_take_is_atomic() {
        let mut game = dealt_game(7);
        rigged_hands(&mut game, Suit::Clubs, [3, 3, 2, 2]);
        let seller_cash = game.player_cash(3);
        let buyer_cash = game.player_cash(0);
        let total_cash = game.total_cash();

        game.apply_action(3, Action::Show { suit: Suit::Clubs, side: Side::Sell, price: 6 });
        let outcome = game.apply_action(0, Action::Take { suit: Suit::Clubs, side: Side::Buy });
        assert_eq!(
            outcome,
            ApplyOutcome::Traded(TradeEvent { suit: Suit::Clubs, price: 6, buyer: 0, seller: 3 })
        );
        assert_eq!(game.player_hand(0).get(Suit::Clubs), 4);
        assert_eq!(game.player_hand(3).get(Suit::Clubs), 1);
        assert_eq!(game.player_cash(0), buyer_cash - 6);
        assert_eq!(game.player_cash(3), seller_cash + 6);
        assert_eq!(game.total_cash(), total_cash);
    }

    #[test]
    fn sell_intent_hits_the_bid() {
        let mut game = dealt_game(7);
        rigged_hands(&mut game, Suit::Spades, [2, 2, 2, 2]);
        game.apply_action(1, Action::Show { suit: Suit::Spades, side: Side::Buy, price: 9 });
        let outcome = game.apply_action(2, Action::Take { suit: Suit::Spades, side: Side::Sell });
        // resting buy: counterpart buys, the taker sells
        assert_eq!(
            outcome,
            ApplyOutcome::Traded(TradeEvent { suit: Suit::Spades, price: 9, buyer: 1, seller: 2 })
        );
    }

    #[test]
    fn a_trade_wipes_every_book() {
        let mut game = dealt_game(7);
        rigged_hands(&mut game, Suit::Hearts, [3, 3, 2, 2]);
        for suit in Suit::ALL {
            game.apply_action(2, Action::Show { suit, side: Side::Buy, price: 2 });
            game.apply_action(3, Action::Show { suit, side: Side::Sell, price: 15 });
        }
        game.apply_action(0, Action::Show { suit: Suit::Hearts, side: Side::Sell, price: 5 });
        let outcome = game.apply_action(1, Action::Take { suit: Suit::Hearts, side: Side::Buy });
        assert!(matches!(outcome, ApplyOutcome::Traded(_)));
        for suit in Suit::ALL {
            assert_eq!(game.best_bid(suit), Quote::NONE);
            assert_eq!(game.best_ask(suit), Quote::NONE);
        }
    }

    #[test]
    fn equal_priced_quotes_match_oldest_first() {
        let mut game = dealt_game(7);
        rigged_hands(&mut game, Suit::Diamonds, [3, 3, 2, 2]);
        game.apply_action(0, Action::Show { suit: Suit::Diamonds, side: Side::Sell, price: 5 });
        game.apply_action(1, Action::Show { suit: Suit::Diamonds, side: Side::Sell, price: 5 });
        let outcome = game.apply_action(2, Action::Take { suit: Suit::Diamonds, side: Side::Buy });
        assert_eq!(
            outcome,
            ApplyOutcome::Traded(TradeEvent { suit: Suit::Diamonds, price: 5, buyer: 2, seller: 0 })
        );
    }

    #[test]
    fn payout_splits_the_remainder_between_tied_leaders() {
        let mut game = dealt_game(11);
        rigged_hands(&mut game, Suit::Hearts, [3, 3, 2, 2]);
        game.pot = 200;
        for player in &mut game.players {
            player.cash = 300;
        }
        // standard [30, 30, 20, 20] leaves 100, split over the two leaders
        let scores = game.final_scores();
        assert_eq!(scores, [380.0, 380.0, 320.0, 320.0]);
    }

    #[test]
    fn sole_leader_takes_the_whole_remainder() {
        let mut game = dealt_game(11);
        rigged_hands(&mut game, Suit::Spades, [4, 2, 1, 1]);
        game.pot = 200;
        for player in &mut game.players {
            player.cash = 300;
        }
        let scores = game.final_scores();
        assert_eq!(scores, [300.0 + 40.0 + 120.0, 320.0, 310.0, 310.0]);
    }

    #[test]
    fn three_way_tie_splits_with_real_division() {
        let mut game = dealt_game(11);
        rigged_hands(&mut game, Suit::Clubs, [3, 3, 3, 1]);
        game.pot = 200;
        for player in &mut game.players {
            player.cash = 300;
        }
        let scores = game.final_scores();
        let share = 100.0 / 3.0;
        for i in 0..3 {
            assert!((scores[i] - (330.0 + share)).abs() < 1e-9);
        }
        assert_eq!(scores[3], 310.0);
    }

    #[test]
    fn knockout_resets_everyone_next_round() {
        let mut game = dealt_game(5);
        rigged_hands(&mut game, Suit::Hearts, [0, 0, 0, 0]);
        game.pot = 0;
        game.players[0].cash = 10;
        game.settle_round();
        assert!(game.knocked_out());

        game.start_round();
        assert!(!game.knocked_out());
        for id in 0..NUM_PLAYERS {
            assert_eq!(game.player_cash(id), STARTING_CASH - ANTE);
        }
    }

    #[test]
    fn healthy_balances_carry_minus_the_ante() {
        let mut game = dealt_game(5);
        rigged_hands(&mut game, Suit::Hearts, [0, 0, 0, 0]);
        game.pot = 0;
        game.players[0].cash = 100;
        game.players[1].cash = 200;
        game.players[2].cash = 300;
        game.players[3].cash = 400;
        game.settle_round();
        assert!(!game.knocked_out());

        game.start_round();
        assert_eq!(game.player_cash(0), 100 - ANTE);
        assert_eq!(game.player_cash(1), 200 - ANTE);
        assert_eq!(game.player_cash(2), 300 - ANTE);
        assert_eq!(game.player_cash(3), 400 - ANTE);
    }

    #[test]
    fn same_seed_replays_the_same_round() {
        let a = dealt_game(42);
        let b = dealt_game(42);
        assert_eq!(a.goal_suit(), b.goal_suit());
        for id in 0..NUM_PLAYERS {
            assert_eq!(a.player_hand(id), b.player_hand(id));
        }
    }
}
