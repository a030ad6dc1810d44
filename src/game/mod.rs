pub mod cards;
pub mod directory;
pub mod game;
pub mod players;
pub mod state;
pub mod table;
pub mod trade;

pub use cards::{CardEffect, Deck, DeckKind};
pub use directory::Directory;
pub use game::{Game, GameSummary};
pub use players::PlayerState;
pub use state::{GameConfig, GameError, GameEvent, GameState, Property};
pub use table::Table;
pub use trade::{TradeBundle, TradeOffer};
