//! Real-time terminal games.
//!
//! There are no turns: the clock ticks in the background, the AI moves
//! whenever it can afford to, and the human types moves as fast as their
//! energy allows.

use crate::config::GameConfig;
use crate::render;
use anyhow::Result;
use cooldown_agents::{AiController, Difficulty, HeuristicAgent};
use cooldown_core::{Board, Color, GameState, Move, MoveRequest, Session, SessionEvent, Square};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How often an idle AI re-checks whether it can move.
const AI_POLL: Duration = Duration::from_millis(250);

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Move(Move),
    Targets(Square),
    Board,
    Reset,
    Help,
    Quit,
    Unknown(String),
}

/// Parses one line of input. Moves are accepted as `e2e4`, `e2-e4` or
/// `e2 e4`.
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let mut words = line.split_whitespace();
    match (words.next(), words.next(), words.next()) {
        (Some("quit" | "q" | "exit"), None, None) => Command::Quit,
        (Some("reset" | "new"), None, None) => Command::Reset,
        (Some("board" | "b"), None, None) => Command::Board,
        (Some("help" | "?"), None, None) => Command::Help,
        (Some("moves" | "m"), Some(square), None) => match Square::parse(square) {
            Some(square) => Command::Targets(square),
            None => Command::Unknown(line.to_string()),
        },
        (Some(from), Some(to), None) => parse_move(from, to)
            .map(Command::Move)
            .unwrap_or_else(|| Command::Unknown(line.to_string())),
        (Some(word), None, None) => {
            let compact: String = word.chars().filter(|c| *c != '-').collect();
            match (compact.get(..2), compact.get(2..)) {
                (Some(from), Some(to)) if compact.len() == 4 => parse_move(from, to)
                    .map(Command::Move)
                    .unwrap_or_else(|| Command::Unknown(line.to_string())),
                _ => Command::Unknown(line.to_string()),
            }
        }
        _ => Command::Unknown(line.to_string()),
    }
}

fn parse_move(from: &str, to: &str) -> Option<Move> {
    Some(Move::new(Square::parse(from)?, Square::parse(to)?))
}

fn print_help() {
    println!("Type moves like e2e4 as soon as you can afford them.");
    println!("Commands: moves <square>, board, reset, help, quit");
}

fn redraw(session: &Session, highlights: &[Square]) -> io::Result<()> {
    let mut stdout = io::stdout();
    session.with_state(|state| render::draw_board(&mut stdout, state, highlights))
}

fn spawn_ai(session: &Arc<Session>, ai: AiController<HeuristicAgent>) -> JoinHandle<()> {
    let session = session.clone();
    tokio::spawn(async move { ai.play(&session, AI_POLL).await })
}

/// Human against the heuristic AI. The human plays the color the AI
/// does not.
pub async fn play(config: GameConfig, board: Board) -> Result<()> {
    let ai_color = config.ai.color;
    let human = ai_color.opponent();
    let difficulty = config.ai.difficulty();

    let session = Arc::new(Session::new(GameState::with_board(board, config.economy)));
    let mut events = session.subscribe();
    let ticker = session.spawn_ticker();
    let ai = spawn_ai(
        &session,
        AiController::heuristic(difficulty, ai_color, config.ai.seed),
    );

    println!(
        "You play {human}. AI rating {:.0}, reaction {} ms.",
        difficulty.rating,
        difficulty.reaction_delay.as_millis()
    );
    print_help();
    redraw(&session, &[])?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Command::Quit => break,
                    Command::Help => print_help(),
                    Command::Board => {
                        redraw(&session, &[])?;
                        let cooling = session.with_state(|s| render::cooldown_summary(s, human));
                        println!("cooling: {cooling}");
                    }
                    Command::Reset => {
                        session.reset();
                    }
                    Command::Targets(square) => {
                        let targets = session.with_state(|s| s.legal_targets(square));
                        redraw(&session, &targets)?;
                    }
                    Command::Move(mv) => {
                        // Applied moves come back as events.
                        if let Err(err) = session.submit_as(human, MoveRequest::from(mv)) {
                            println!("rejected: {err}");
                        }
                    }
                    Command::Unknown(text) if text.is_empty() => {}
                    Command::Unknown(text) => println!("unrecognized input: {text}"),
                }
            }
            event = events.recv() => {
                match event {
                    Ok(SessionEvent::MoveApplied { record, .. }) => {
                        if record.color == ai_color {
                            println!("AI plays {}", record.notation);
                        }
                        redraw(&session, &[])?;
                    }
                    Ok(SessionEvent::Rejected { .. }) => {}
                    Ok(SessionEvent::GameOver { winner }) => {
                        let outcome = if winner == human { "You win" } else { "The AI wins" };
                        println!("{outcome}! Type reset to play again or quit to leave.");
                    }
                    Ok(SessionEvent::Reset { epoch, .. }) => {
                        debug!(epoch, "new game");
                        println!("New game.");
                        redraw(&session, &[])?;
                    }
                    Err(RecvError::Lagged(skipped)) => warn!(skipped, "display fell behind"),
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    ai.abort();
    ticker.abort();
    Ok(())
}

/// Two heuristic AIs against each other until one takes the other's king
/// or `limit` of wall time passes.
pub async fn watch(
    config: GameConfig,
    board: Board,
    ratings: [f64; 2],
    limit: Duration,
) -> Result<()> {
    let session = Arc::new(Session::new(GameState::with_board(board, config.economy)));
    let mut events = session.subscribe();
    let ticker = session.spawn_ticker();

    let players: Vec<JoinHandle<()>> = Color::BOTH
        .into_iter()
        .map(|color| {
            let difficulty = Difficulty::from_rating(ratings[color.index()]);
            // Distinct seeds so a seeded game is not a mirror match.
            let seed = config.ai.seed.map(|seed| seed.wrapping_add(color.index() as u64));
            spawn_ai(&session, AiController::heuristic(difficulty, color, seed))
        })
        .collect();

    let outcome = tokio::time::timeout(limit, async {
        loop {
            match events.recv().await {
                Ok(SessionEvent::MoveApplied { record, .. }) => {
                    println!(
                        "{:>7.1}s  {:<5} {}",
                        record.elapsed_ms as f64 / 1000.0,
                        record.color,
                        record.notation
                    );
                }
                Ok(SessionEvent::GameOver { winner }) => return Some(winner),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "output fell behind"),
                Err(RecvError::Closed) => return None,
            }
        }
    })
    .await;

    for player in players {
        player.abort();
    }
    ticker.abort();

    redraw(&session, &[])?;
    match outcome {
        Ok(Some(winner)) => println!("{winner} wins."),
        _ => println!("No result within {} s.", limit.as_secs()),
    }
    io::stdout().flush()?;
    Ok(())
}
