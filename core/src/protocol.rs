//! Messages exchanged with whatever drives a game: a terminal, a UI, or a
//! network relay. All of them are plain serde types so a transport can
//! encode them however it likes.

use crate::board::Board;
use crate::economy::EnergyPool;
use crate::error::MoveError;
use crate::registry;
use crate::types::{Color, Millis, Move, PieceType, Square};
use serde::{Deserialize, Serialize};

/// A move as requested by a driver, in display coordinates.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub from_row: u8,
    pub from_col: u8,
    pub to_row: u8,
    pub to_col: u8,
}

impl MoveRequest {
    pub fn from_move(mv: Move) -> Self {
        Self {
            from_row: mv.from.row(),
            from_col: mv.from.col(),
            to_row: mv.to.row(),
            to_col: mv.to.col(),
        }
    }

    /// Resolves the request to board squares.
    pub fn to_move(self) -> Result<Move, MoveError> {
        let from = Square::from_row_col(self.from_row, self.from_col).ok_or(
            MoveError::OutOfBounds {
                row: self.from_row,
                col: self.from_col,
            },
        )?;
        let to = Square::from_row_col(self.to_row, self.to_col).ok_or(MoveError::OutOfBounds {
            row: self.to_row,
            col: self.to_col,
        })?;
        Ok(Move::new(from, to))
    }
}

impl From<Move> for MoveRequest {
    fn from(mv: Move) -> Self {
        Self::from_move(mv)
    }
}

/// An applied move, as recorded in the history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    /// `<letter?><from>-<to>`, e.g. `Nb1-c3` or `e2-e4`.
    pub notation: String,
    pub elapsed_ms: Millis,
    pub color: Color,
    pub energy_spent: u32,
    pub piece: PieceType,
    pub captured: Option<PieceType>,
    /// Set when this move took the enemy king.
    pub winner: Option<Color>,
}

/// Formats a move the way the history shows it.
pub fn notation(piece_type: PieceType, from: Square, to: Square) -> String {
    match registry::lookup(piece_type).letter {
        Some(letter) => format!("{letter}{from}-{to}"),
        None => format!("{from}-{to}"),
    }
}

/// Snapshot of the authoritative state sent to participants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateUpdate {
    pub board: Board,
    pub energy: [EnergyPool; 2],
    pub clock_ms: Millis,
    pub winner: Option<Color>,
}

/// Everything a session reports to its observers. Events that change the
/// board carry the resulting state so observers never have to ask for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum SessionEvent {
    MoveApplied {
        record: MoveRecord,
        state: StateUpdate,
    },
    /// A driver's request was refused. AI moves that went stale are not
    /// reported.
    Rejected { request: MoveRequest, reason: String },
    GameOver { winner: Color },
    Reset { epoch: u64, state: StateUpdate },
}
