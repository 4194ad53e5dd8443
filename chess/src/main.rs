mod config;
mod interactive;
mod render;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use config::{load_layout, GameConfig};
use cooldown_agents::{Difficulty, Preset};
use cooldown_core::{registry, Color, GameState, Square};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cooldown-chess", version, about = "Real-time chess where moves cost energy and pieces cool down")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play against the AI in real time
    Play {
        #[command(flatten)]
        game: GameArgs,
        /// AI rating, 400 to 2800
        #[arg(long, conflicts_with = "preset")]
        rating: Option<f64>,
        /// easy, medium or hard
        #[arg(long, value_parser = parse_preset)]
        preset: Option<Preset>,
        /// Color the AI plays
        #[arg(long, value_parser = parse_color)]
        ai_color: Option<Color>,
    },
    /// Let two AIs play each other
    Watch {
        #[command(flatten)]
        game: GameArgs,
        #[arg(long, default_value_t = 1400.0)]
        white_rating: f64,
        #[arg(long, default_value_t = 1400.0)]
        black_rating: f64,
        /// Give up after this many seconds of wall time
        #[arg(long, default_value_t = 300)]
        seconds: u64,
    },
    /// Show the AI parameters derived from a rating
    Difficulty {
        #[arg(conflicts_with = "preset")]
        rating: Option<f64>,
        #[arg(long, value_parser = parse_preset)]
        preset: Option<Preset>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List the squares a piece may move to, ignoring cost and cooldown
    Moves {
        square: String,
        /// JSON layout file (8 rows of 8 cells)
        #[arg(long)]
        layout: Option<PathBuf>,
    },
    /// Print the piece table
    Pieces,
}

#[derive(Args, Debug)]
struct GameArgs {
    /// JSON game configuration (economy and AI settings)
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON layout file; both home ranks of each side must be filled
    #[arg(long)]
    layout: Option<PathBuf>,
    /// Seed for reproducible AI choices
    #[arg(long)]
    seed: Option<u64>,
}

impl GameArgs {
    fn load(&self) -> Result<GameConfig> {
        let mut config = GameConfig::load(self.config.as_deref())?;
        if self.seed.is_some() {
            config.ai.seed = self.seed;
        }
        Ok(config)
    }
}

fn parse_color(s: &str) -> Result<Color, String> {
    match s.to_ascii_lowercase().as_str() {
        "white" | "w" => Ok(Color::White),
        "black" | "b" => Ok(Color::Black),
        _ => Err(format!("expected white or black, got {s}")),
    }
}

fn parse_preset(s: &str) -> Result<Preset, String> {
    match s.to_ascii_lowercase().as_str() {
        "easy" => Ok(Preset::Easy),
        "medium" => Ok(Preset::Medium),
        "hard" => Ok(Preset::Hard),
        _ => Err(format!("expected easy, medium or hard, got {s}")),
    }
}

fn resolve_difficulty(rating: Option<f64>, preset: Option<Preset>) -> Option<Difficulty> {
    match (rating, preset) {
        (Some(rating), _) => Some(Difficulty::from_rating(rating)),
        (None, Some(preset)) => Some(preset.into()),
        (None, None) => None,
    }
}

fn print_difficulty(difficulty: &Difficulty, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(difficulty)?);
        return Ok(());
    }
    println!("rating               {:.0}", difficulty.rating);
    println!("reaction delay       {} ms", difficulty.reaction_delay.as_millis());
    println!("search depth         {}", difficulty.search_depth);
    println!("accuracy             {:.3}", difficulty.accuracy);
    println!("aggressiveness       {:.3}", difficulty.aggressiveness);
    println!("defensive awareness  {:.3}", difficulty.defensive_awareness);
    println!("cooldown management  {:.3}", difficulty.cooldown_management);
    Ok(())
}

fn print_moves(square: &str, layout: Option<PathBuf>) -> Result<()> {
    let square = Square::parse(square).with_context(|| format!("not a square: {square}"))?;
    let board = load_layout(layout.as_deref())?;
    let Some(piece) = board.piece_at(square) else {
        println!("{square} is empty");
        return Ok(());
    };

    let state = GameState::with_board(board, Default::default());
    let targets = state.legal_targets(square);
    let definition = registry::lookup(piece.piece_type);
    println!(
        "{} {} on {square}: cost {}, cooldown {} ms",
        piece.color, piece.piece_type, definition.energy_cost, definition.cooldown_ms
    );
    if targets.is_empty() {
        println!("no legal destinations");
    } else {
        let names: Vec<String> = targets.iter().map(Square::to_string).collect();
        println!("{}", names.join(" "));
    }
    render::draw_board(&mut std::io::stdout(), &state, &targets)?;
    Ok(())
}

fn print_pieces() {
    println!("{:<11} {:>6} {:>4} {:>9}  moves as", "type", "letter", "cost", "cooldown");
    for definition in registry::all() {
        println!(
            "{:<11} {:>6} {:>4} {:>7}ms  {}",
            definition.piece_type,
            definition.letter.map(String::from).unwrap_or_default(),
            definition.energy_cost,
            definition.cooldown_ms,
            definition.class
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Play {
            game,
            rating,
            preset,
            ai_color,
        } => {
            let mut config = game.load()?;
            if let Some(difficulty) = resolve_difficulty(rating, preset) {
                config.ai.rating = difficulty.rating;
            }
            if let Some(color) = ai_color {
                config.ai.color = color;
            }
            let board = load_layout(game.layout.as_deref())?;
            interactive::play(config, board).await
        }
        Command::Watch {
            game,
            white_rating,
            black_rating,
            seconds,
        } => {
            let config = game.load()?;
            let board = load_layout(game.layout.as_deref())?;
            interactive::watch(
                config,
                board,
                [white_rating, black_rating],
                Duration::from_secs(seconds),
            )
            .await
        }
        Command::Difficulty {
            rating,
            preset,
            json,
        } => {
            let difficulty = resolve_difficulty(rating, preset).unwrap_or_default();
            print_difficulty(&difficulty, json)
        }
        Command::Moves { square, layout } => print_moves(&square, layout),
        Command::Pieces => {
            print_pieces();
            Ok(())
        }
    }
}
