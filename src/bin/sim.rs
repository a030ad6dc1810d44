use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use monopolytron_rs::cli::{StatisticsAccumulator, init_logging, parse_seats, print_player_help};
use monopolytron_rs::game::{Game, GameConfig, GameError, GameSummary};
use serde::Serialize;

#[derive(Debug, Parser, Clone)]
#[command(name = "monopolytron-sim")]
#[command(about = "Property trading simulator - play scripted players against each other")]
struct Args {
    /// Number of games to play
    #[arg(short = 'n', long, default_value_t = 5)]
    num: u32,

    /// Comma-separated player codes (e.g., A,A,A,A)
    /// Use ':' to set player-specific params (e.g., A:500 for the trade threshold)
    #[arg(long, default_value = "A,A,A,A")]
    players: String,

    /// Random seed for the first game; game i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with a game configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop a game after this many turns
    #[arg(long)]
    turn_limit: Option<u32>,

    /// Show player codes and exit
    #[arg(long)]
    help_players: bool,

    /// Only log warnings
    #[arg(long)]
    quiet: bool,

    /// Log search summaries too
    #[arg(long, conflicts_with = "quiet")]
    verbose: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Number of worker threads for parallel execution
    #[arg(long, default_value_t = 1)]
    workers: usize,
}

#[derive(Serialize)]
struct Report<'a> {
    stats: &'a monopolytron_rs::cli::GameStats,
    games: &'a [GameSummary],
}

fn load_config(args: &Args) -> Result<GameConfig, GameError> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| GameError::Config(format!("{}: {e}", path.display())))?;
            serde_json::from_str::<GameConfig>(&text)
                .map_err(|e| GameError::Config(format!("{}: {e}", path.display())))?
        }
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(limit) = args.turn_limit {
        config.turn_limit = limit;
    }
    let codes = args.players.split(',').map(str::trim).filter(|c| !c.is_empty());
    config.num_players = codes.clone().count();
    config.num_humans = codes.filter(|c| c.to_uppercase().starts_with('H')).count();
    Ok(config)
}

fn play_games(
    args: &Args,
    config: &GameConfig,
    indices: impl Iterator<Item = u32>,
) -> Result<(StatisticsAccumulator, Vec<GameSummary>), String> {
    let seats = parse_seats(&args.players, config)?;
    let mut stats = StatisticsAccumulator::new();
    let mut summaries = Vec::new();
    for game_idx in indices {
        let config = GameConfig {
            seed: config.seed + game_idx as u64,
            ..config.clone()
        };
        let start = Instant::now();
        let mut game = Game::new(config).map_err(|e| e.to_string())?;
        let summary = game.play(&seats).map_err(|e| e.to_string())?;
        let duration = start.elapsed();
        stats.after(&summary, duration);

        if !args.quiet && !args.json && args.workers == 1 {
            let last_n = 10;
            if game_idx < last_n || game_idx >= args.num.saturating_sub(last_n) {
                println!(
                    "Game {:>4}: Winner=P{}, Loser={:>4}, Turns={:>4}, Trades={:>3}, Duration={:?}",
                    game_idx + 1,
                    summary.winner + 1,
                    summary
                        .loser
                        .map_or_else(|| "-".to_string(), |l| format!("P{}", l + 1)),
                    summary.turns,
                    summary.trades,
                    duration
                );
            } else if (game_idx + 1) % 100 == 0 {
                print!(".");
                let _ = std::io::stdout().flush();
            }
        }
        summaries.push(summary);
    }
    Ok((stats, summaries))
}

fn run_parallel(
    args: &Args,
    config: &GameConfig,
) -> Result<(StatisticsAccumulator, Vec<GameSummary>), String> {
    let workers = args.workers.max(1) as u32;
    let mut stats = StatisticsAccumulator::new();
    let mut summaries = Vec::new();
    std::thread::scope(|scope| {
        let handles = (0..workers)
            .map(|worker| {
                let indices = (0..args.num).filter(move |i| i % workers == worker);
                scope.spawn(move || play_games(args, config, indices))
            })
            .collect::<Vec<_>>();
        for handle in handles {
            let (worker_stats, worker_games) = handle
                .join()
                .map_err(|_| "simulation worker panicked".to_string())??;
            stats.stats.merge(worker_stats.stats);
            summaries.extend(worker_games);
        }
        Ok::<_, String>(())
    })?;
    summaries.sort_by_key(|s| s.seed);
    Ok((stats, summaries))
}

fn main() {
    let args = Args::parse();

    if args.help_players {
        print_player_help();
        return;
    }

    let level = if args.quiet || args.json {
        log::LevelFilter::Warn
    } else if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    if let Err(e) = init_logging(level) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
    if config.num_humans > 0 && args.workers > 1 {
        eprintln!("Error: human players need --workers 1");
        std::process::exit(1);
    }

    let result = if args.workers > 1 {
        run_parallel(&args, &config)
    } else {
        play_games(&args, &config, 0..args.num)
    };
    let (stats, summaries) = result.unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("Use --help-players to see available codes");
        std::process::exit(1);
    });

    if args.json {
        let report = Report {
            stats: &stats.stats,
            games: &summaries,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    } else if !args.quiet {
        print_summary(&stats, config.num_players);
    }
}

fn print_summary(stats: &StatisticsAccumulator, num_players: usize) {
    println!("\n{}", "=".repeat(80));
    println!("SIMULATION SUMMARY");
    println!("{}", "=".repeat(80));

    println!("\nPlayer Summary:");
    println!("{:<10} {:<10} {:<12} {:<10}", "Player", "Wins", "Win Rate", "Losses");
    println!("{}", "-".repeat(45));
    for player in 0..num_players {
        println!(
            "{:<10} {:<10} {:<11.1}% {:<10}",
            format!("P{}", player + 1),
            stats.stats.wins.get(&player).copied().unwrap_or(0),
            stats.stats.win_rate(player) * 100.0,
            stats.stats.losses.get(&player).copied().unwrap_or(0)
        );
    }

    println!("\nGame Summary:");
    println!("  Total Games: {}", stats.stats.games);
    println!("  Ended At Turn Limit: {}", stats.stats.turn_limit_games);
    println!("  Avg Turns: {:.2}", stats.stats.get_avg_turns());
    println!("  Avg Trades: {:.2}", stats.stats.get_avg_trades());
    println!("  Avg Duration: {:.2?}", stats.stats.get_avg_duration());
}
