pub mod human_player;
pub mod players;
pub mod stats;

pub use human_player::HumanPlayer;
pub use players::{CLI_PLAYERS, CliPlayer, create_player, parse_seats, print_player_help};
pub use stats::{GameStats, StatisticsAccumulator};

/// Terminal logging for the binaries; game narration is at `Info`.
pub fn init_logging(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .set_time_level(log::LevelFilter::Off)
        .build();
    simplelog::TermLogger::init(
        level,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
}
