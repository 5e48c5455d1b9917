pub mod utils;
pub use utils::*;

pub mod models;
pub use models::*;

pub mod game;
pub use game::*;

pub mod dealer;
pub use dealer::Dealer;

pub mod player;
pub use player::HeuristicPlayer;
