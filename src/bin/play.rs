use clap::Parser;
use monopolytron_rs::cli::{HumanPlayer, init_logging, parse_seats, print_player_help};
use monopolytron_rs::cli::human_player::paint;
use monopolytron_rs::game::{Game, GameConfig};
use monopolytron_rs::players::Strategy;

#[derive(Debug, Parser, Clone)]
#[command(name = "monopolytron-play")]
#[command(about = "Play a property trading game against scripted players")]
struct Args {
    /// Comma-separated codes for the other seats (e.g., A,A:500,A)
    #[arg(short = 'o', long, default_value = "A,A,A")]
    opponents: String,

    /// Seat number you take, starting at 1
    #[arg(long, default_value_t = 1)]
    seat: usize,

    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Stop after this many turns
    #[arg(long, default_value_t = 1000)]
    turn_limit: u32,

    /// Show player codes and exit
    #[arg(long)]
    help_players: bool,

    /// Log search summaries too
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    if args.help_players {
        print_player_help();
        return;
    }

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    if let Err(e) = init_logging(level) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let mut config = GameConfig {
        seed: args.seed,
        turn_limit: args.turn_limit,
        ..GameConfig::default()
    };
    let mut seats = parse_seats(&args.opponents, &config).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("Use --help-players to see available codes");
        std::process::exit(1);
    });
    if args.seat == 0 || args.seat > seats.len() + 1 {
        eprintln!("Error: seat must be between 1 and {}", seats.len() + 1);
        std::process::exit(1);
    }
    let you = args.seat - 1;
    seats.insert(you, Box::new(HumanPlayer::new()) as Box<dyn Strategy>);

    config.num_players = seats.len();
    config.num_humans = seats.iter().filter(|s| s.name() == "HumanPlayer").count();

    let mut game = Game::new(config).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
    println!("Starting game {}: you are player {}", game.id, you + 1);
    println!("{}", "=".repeat(80));

    let summary = game.play(&seats).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    println!("\n{}", "=".repeat(80));
    if summary.winner == you {
        println!("YOU WIN!");
    } else {
        println!("Player {} wins.", summary.winner + 1);
    }
    println!("{}", "=".repeat(80));
    println!("FINAL STANDINGS:");
    for standing in &summary.standings {
        let label = if standing.player == you { " (you)" } else { "" };
        let player = &game.state.players[standing.player];
        println!(
            "\nPlayer {}{} ({}): cash ${}, total worth ${}",
            standing.player + 1,
            label,
            standing.token,
            standing.cash,
            standing.total_worth
        );
        for id in &player.properties {
            let tile = &game.state.properties[*id];
            let status = if tile.mortgaged {
                " mortgaged".to_string()
            } else if tile.houses > 0 {
                format!(" {} house(s)", tile.houses)
            } else {
                String::new()
            };
            println!("  {}{}", paint(*id), status);
        }
    }
    println!("\nTotal Turns: {}, Trades: {}", summary.turns, summary.trades);
}
