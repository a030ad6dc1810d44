pub mod ai;
pub mod base;
pub mod development;
pub mod liquidity;
pub mod negotiator;
pub mod worth;

pub use ai::AiPlayer;
pub use base::Strategy;
pub use worth::property_worth;
