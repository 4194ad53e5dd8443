//! Heuristic move scoring.
//!
//! Every candidate is judged one move ahead. The score is a weighted sum
//! of independent terms so each can be tested on its own; the agent adds
//! noise and picks from the ranked list.

use crate::difficulty::Difficulty;
use cooldown_core::{is_legal, Board, Color, GameState, Millis, Move, Piece, PieceType, Square};

/// Score for taking the enemy king. Dominates every other term.
pub const KING_VALUE: f64 = 10_000.0;

/// A gap since the last own move beyond which long cooldowns are favored.
pub const IDLE_THRESHOLD_MS: Millis = 4000;

const CENTER: [&str; 4] = ["d4", "e4", "d5", "e5"];
const CENTER_BONUS: f64 = 20.0;
const THREAT_WEIGHT: f64 = 40.0;
const PROTECTION_WEIGHT: f64 = 15.0;
const CAPTURE_BONUS: f64 = 50.0;
const TIMING_WEIGHT: f64 = 5.0;

/// Material value in centipawns, by classical class.
pub fn material_value(piece_type: PieceType) -> f64 {
    match piece_type.class() {
        PieceType::Pawn => 100.0,
        PieceType::Knight => 320.0,
        PieceType::Bishop => 330.0,
        PieceType::Rook => 500.0,
        PieceType::Queen => 900.0,
        _ => KING_VALUE,
    }
}

fn is_center(square: Square) -> bool {
    CENTER.iter().any(|name| Square::parse(name) == Some(square))
}

fn center_distance(square: Square) -> f64 {
    let file = f64::from(square.file().index()) - 3.5;
    let rank = f64::from(square.rank().index()) - 3.5;
    (file * file + rank * rank).sqrt()
}

/// Bonus for where the piece ends up.
pub fn positional_bonus(piece: &Piece, from: Square, to: Square) -> f64 {
    let mut score = if is_center(to) { CENTER_BONUS } else { 0.0 };

    score += match piece.piece_type.class() {
        PieceType::Pawn => {
            let (_, dr) = from.delta(to);
            f64::from(dr * piece.color.pawn_direction()) * 10.0
        }
        PieceType::Knight => 30.0 / (1.0 + center_distance(to)),
        PieceType::Bishop => 15.0,
        PieceType::Rook => 10.0,
        PieceType::Queen => 8.0,
        _ => 2.0,
    };

    score
}

/// Number of (enemy, own) pairs where the enemy piece could legally move
/// onto the own piece's square.
pub fn count_threats(board: &Board, color: Color) -> usize {
    let targets: Vec<Square> = board.pieces_of(color).map(|(sq, _)| sq).collect();
    board
        .pieces_of(color.opponent())
        .map(|(from, _)| targets.iter().filter(|&&to| is_legal(board, from, to)).count())
        .sum()
}

/// Number of (defender, defended) pairs among `color`'s pieces: the
/// defender could recapture if the defended piece were taken.
pub fn count_protections(board: &Board, color: Color) -> usize {
    let own: Vec<(Square, Piece)> = board.pieces_of(color).collect();
    let mut scratch = board.clone();
    let mut count = 0;

    for &(target, piece) in &own {
        scratch.set_piece(
            target,
            Some(Piece {
                color: color.opponent(),
                ..piece
            }),
        );
        count += own
            .iter()
            .filter(|(defender, _)| *defender != target && is_legal(&scratch, *defender, target))
            .count();
        scratch.set_piece(target, Some(piece));
    }

    count
}

/// Prefers long-cooldown pieces after a quiet spell and short-cooldown
/// pieces when following up quickly.
pub fn cooldown_timing(piece: &Piece, idle_ms: Millis) -> f64 {
    let cooldown_secs = piece.cooldown_duration as f64 / 1000.0;
    if idle_ms >= IDLE_THRESHOLD_MS {
        cooldown_secs * TIMING_WEIGHT
    } else {
        (12.0 - cooldown_secs).max(0.0) * TIMING_WEIGHT
    }
}

/// The unweighted terms for one candidate move.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub material: f64,
    pub positional: f64,
    /// Threats against own pieces removed (positive) or added (negative).
    pub tactical: f64,
    pub timing: f64,
    /// Mutual protections gained (positive) or lost (negative).
    pub defensive: f64,
    pub capture: bool,
}

impl ScoreBreakdown {
    /// Combines the terms using the difficulty weights.
    pub fn total(&self, difficulty: &Difficulty) -> f64 {
        let aggression = if self.capture {
            CAPTURE_BONUS * difficulty.aggressiveness
        } else {
            0.0
        };
        self.material
            + self.positional * difficulty.accuracy
            + self.tactical * THREAT_WEIGHT * difficulty.defensive_awareness
            + self.timing * difficulty.cooldown_management
            + self.defensive * PROTECTION_WEIGHT * difficulty.defensive_awareness
            + aggression
    }
}

/// Scores `mv` for its mover, simulating the resulting board.
pub fn evaluate_move(state: &GameState, mv: Move) -> ScoreBreakdown {
    let board = &state.board;
    let Some(piece) = board.piece_at(mv.from) else {
        return ScoreBreakdown::default();
    };
    let color = piece.color;
    let target = board.piece_at(mv.to);

    let mut after = board.clone();
    after.move_piece(mv.from, mv.to);

    let idle_ms = state
        .clock_ms()
        .saturating_sub(state.last_move_at(color).unwrap_or(0));

    ScoreBreakdown {
        material: target.map_or(0.0, |t| material_value(t.piece_type)),
        positional: positional_bonus(&piece, mv.from, mv.to),
        tactical: count_threats(board, color) as f64 - count_threats(&after, color) as f64,
        timing: cooldown_timing(&piece, idle_ms),
        defensive: count_protections(&after, color) as f64
            - count_protections(board, color) as f64,
        capture: target.is_some(),
    }
}

/// Returns true if `mv` lands on the enemy king.
pub fn captures_king(board: &Board, mv: Move) -> bool {
    match (board.piece_at(mv.from), board.piece_at(mv.to)) {
        (Some(mover), Some(target)) => {
            target.piece_type == PieceType::King && target.color != mover.color
        }
        _ => false,
    }
}
