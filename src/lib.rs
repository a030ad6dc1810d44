#![warn(clippy::all)]
#![deny(rust_2018_idioms)]

pub mod board;
pub mod cli;
pub mod game;
pub mod players;
pub mod types;

pub use board::{Deed, Space};
pub use game::{Game, GameConfig, GameError, GameState, GameSummary, Table};
pub use players::{AiPlayer, Strategy};
pub use types::{Color, Money, OwnershipDegree, PlayerId, PropertyId};
