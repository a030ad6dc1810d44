use crate::cli::human_player::HumanPlayer;
use crate::game::state::GameConfig;
use crate::players::{AiPlayer, Strategy};
use crate::types::Money;

pub struct CliPlayer {
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const CLI_PLAYERS: &[CliPlayer] = &[
    CliPlayer {
        code: "A",
        name: "AiPlayer",
        description: "Scripted worth-driven player. First param is the trade THRESHOLD (default from the game config).",
    },
    CliPlayer {
        code: "H",
        name: "HumanPlayer",
        description: "Prompts on the console for every decision.",
    },
];

/// Build a seat from a player code and its `:`-separated params.
pub fn create_player(
    code: &str,
    params: &[&str],
    config: &GameConfig,
) -> Option<Box<dyn Strategy>> {
    match code.to_uppercase().as_str() {
        "A" => {
            let threshold = match params.first() {
                Some(raw) => raw.parse::<Money>().ok()?,
                None => config.trade_threshold,
            };
            Some(Box::new(AiPlayer::new(threshold)))
        }
        "H" => Some(Box::new(HumanPlayer::new())),
        _ => None,
    }
}

/// Parse a comma-separated seat list such as `A,A:500,H`.
pub fn parse_seats(codes: &str, config: &GameConfig) -> Result<Vec<Box<dyn Strategy>>, String> {
    codes.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(|key| {
            let mut parts = key.split(':');
            let code = parts.next().unwrap_or_default();
            let params = parts.collect::<Vec<_>>();
            create_player(code, &params, config).ok_or_else(|| format!("unknown player '{key}'"))
        })
        .collect()
}

pub fn print_player_help() {
    println!("Player Legend:");
    println!("{:<5} {:<25} {}", "CODE", "PLAYER", "DESCRIPTION");
    println!("{}", "-".repeat(80));
    for player in CLI_PLAYERS {
        println!("{:<5} {:<25} {}", player.code, player.name, player.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_resolve_to_strategies() {
        let config = GameConfig::default();
        assert_eq!(create_player("A", &[], &config).unwrap().name(), "AiPlayer");
        assert_eq!(create_player("a", &["500"], &config).unwrap().name(), "AiPlayer");
        assert_eq!(create_player("H", &[], &config).unwrap().name(), "HumanPlayer");
        assert!(create_player("A", &["lots"], &config).is_none());
        assert!(create_player("X", &[], &config).is_none());
    }

    #[test]
    fn seat_lists_parse_in_order() {
        let config = GameConfig::default();
        let seats = parse_seats("A, A:250,H", &config).unwrap();
        let names = seats.iter().map(|s| s.name()).collect::<Vec<_>>();
        assert_eq!(names, vec!["AiPlayer", "AiPlayer", "HumanPlayer"]);
        assert!(parse_seats("A,Q", &config).is_err());
    }
}
