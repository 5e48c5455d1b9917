use figgie_sim::{
    Action, Dealer, Event, Game, HeuristicPlayer, NullSink, PlayerId, ResetPolicy, TradeLog,
    TradeSink, CL, NUM_PLAYERS,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;


fn main() {

    const ROUNDS: Option<u32> = Some(10);
    const TRADE_LOG_PATH: &str = "trades.csv";

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime");
    runtime.block_on(async {

        println!("|==============================================|");
        println!("|{}           Figgie market simulator            {}|", CL::Teal.get(), CL::End.get());
        println!("|        ---------------------------           |");
        println!("|   Four bots trade suited cards through a     |");
        println!("|  continuous double auction, then the pot is  |");
        println!("|  split over the secretly-favored goal suit.  |");
        println!("|                                              |");
        println!("|{}   -  All credit goes to Jane Street  -       {}|", CL::DullTeal.get(), CL::End.get());
        println!("|==============================================|\n");

        let mut handles = Vec::new();

        let (action_tx, action_rx) = kanal::unbounded_async::<(PlayerId, Action)>();
        let action_sender = Arc::new(action_tx);
        let action_receiver = Arc::new(action_rx);

        let (event_sender, _) = tokio::sync::broadcast::channel::<Event>(100);

        for id in 0..NUM_PLAYERS {
            let events = event_sender.clone();
            let actions = Arc::clone(&action_sender);
            let handle: tokio::task::JoinHandle<()> = tokio::task::spawn(async move {
                let mut player = HeuristicPlayer::new(id, false, events, actions);
                player.start().await;
            });
            handles.push(handle);
        }

        let sink: Box<dyn TradeSink> = match TradeLog::create(TRADE_LOG_PATH) {
            Ok(log) => Box::new(log),
            Err(e) => {
                println!("{}[!] Could not open {}: {:?}, trades will not be logged{}", CL::Red.get(), TRADE_LOG_PATH, e, CL::End.get());
                Box::new(NullSink)
            }
        };

        let dealer_handle: tokio::task::JoinHandle<()> = tokio::task::spawn(async move {
            let game = Game::new(StdRng::from_entropy(), ResetPolicy::EntireMarket, sink);
            let mut dealer = Dealer::new(game, ROUNDS, event_sender, action_receiver);
            dealer.start().await;
        });

        // the dealer decides when the table closes; player tasks follow
        dealer_handle.await.unwrap();
        drop(action_sender);
        for handle in handles {
            handle.abort();
        }

    });

}
