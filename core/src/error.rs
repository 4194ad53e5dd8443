//! Error types for the move engine.
//!
//! Rejections carry enough detail for a driver to explain them; none of
//! them leave partial state behind.

use crate::types::{Millis, PieceType, Square};
use thiserror::Error;

/// Why a move request was refused.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MoveError {
    #[error("coordinates ({row}, {col}) are off the board")]
    OutOfBounds { row: u8, col: u8 },

    #[error("the game is already over")]
    GameOver,

    #[error("{from} to {to} is not a legal move")]
    NotLegal { from: Square, to: Square },

    #[error("{piece} on {square} is cooling down for another {remaining_ms} ms")]
    NotReady {
        piece: PieceType,
        square: Square,
        remaining_ms: Millis,
    },

    #[error("insufficient energy: {required} required, {available:.1} available")]
    InsufficientEnergy { required: u32, available: f64 },

    #[error("the game was reset before this move arrived")]
    Stale,
}

/// A layout handed to the core that cannot describe a valid board.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("layout must have 8 rows of 8 cells, found a row of {found}")]
    WrongShape { found: usize },

    #[error("piece on {square} has cooldown {remaining_ms} ms outside 0..={duration_ms} ms")]
    CooldownOutOfRange {
        square: Square,
        remaining_ms: Millis,
        duration_ms: Millis,
    },

    #[error("{square} on a home rank is not occupied by its owner")]
    IncompleteHomeRank { square: Square },
}

/// A piece name that no registry entry answers to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unregistered piece type: {0}")]
pub struct UnknownPieceType(pub String);

/// Failure to load a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
