//! Array-based board representation.
//! Each of the 64 cells holds at most one piece; a piece's position is
//! implied by the cell it sits in.

use crate::error::LayoutError;
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Display-ordered rows (row 0 is rank 8), as exchanged with drivers.
pub type Rows = Vec<Vec<Option<Piece>>>;

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Rows", into = "Rows")]
pub struct Board {
    /// 64 squares, indexed by Square::index()
    squares: [Option<Piece>; 64],
}

impl Board {
    /// Creates an empty board.
    pub const fn empty() -> Self {
        Self {
            squares: [None; 64],
        }
    }

    /// Creates the standard starting position with every piece ready.
    pub fn standard() -> Self {
        let mut board = Self::empty();

        for color in Color::BOTH {
            let home = color.home_rank();
            let pawns = color.pawn_rank();
            for (file_idx, piece_type) in BACK_RANK.iter().enumerate() {
                let Some(file) = File::new(file_idx as u8) else {
                    continue;
                };
                board.set_piece(Square::new(file, home), Some(Piece::new(*piece_type, color)));
                board.set_piece(
                    Square::new(file, pawns),
                    Some(Piece::new(PieceType::Pawn, color)),
                );
            }
        }

        board
    }

    /// Builds a board from display-ordered rows.
    ///
    /// The layout is accepted as-is apart from shape and cooldown range;
    /// use [`Board::validate_home_ranks`] for the editor contract.
    pub fn from_rows(rows: Rows) -> Result<Self, LayoutError> {
        if rows.len() != 8 {
            return Err(LayoutError::WrongShape { found: rows.len() });
        }
        let mut board = Self::empty();
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != 8 {
                return Err(LayoutError::WrongShape { found: cells.len() });
            }
            for (col, cell) in cells.into_iter().enumerate() {
                let Some(square) = Square::from_row_col(row as u8, col as u8) else {
                    continue;
                };
                if let Some(piece) = cell {
                    if piece.cooldown_duration == 0
                        || piece.cooldown_remaining > piece.cooldown_duration
                    {
                        return Err(LayoutError::CooldownOutOfRange {
                            square,
                            remaining_ms: piece.cooldown_remaining,
                            duration_ms: piece.cooldown_duration,
                        });
                    }
                }
                board.set_piece(square, cell);
            }
        }
        Ok(board)
    }

    /// Returns display-ordered rows.
    pub fn to_rows(&self) -> Rows {
        (0..8)
            .map(|row| {
                (0..8)
                    .map(|col| Square::from_row_col(row, col).and_then(|sq| self.piece_at(sq)))
                    .collect()
            })
            .collect()
    }

    /// Checks that both home ranks of each color are fully occupied by
    /// that color's pieces, as the board editor promises.
    pub fn validate_home_ranks(&self) -> Result<(), LayoutError> {
        for color in Color::BOTH {
            for rank in [color.home_rank(), color.pawn_rank()] {
                for file_idx in 0..8 {
                    let Some(file) = File::new(file_idx) else {
                        continue;
                    };
                    let square = Square::new(file, rank);
                    if !self.is_color(square, color) {
                        return Err(LayoutError::IncompleteHomeRank { square });
                    }
                }
            }
        }
        Ok(())
    }

    /// Gets the piece at the given square.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index() as usize]
    }

    /// Mutable access to the piece at the given square.
    pub fn piece_mut(&mut self, square: Square) -> Option<&mut Piece> {
        self.squares[square.index() as usize].as_mut()
    }

    /// Sets the piece at the given square.
    pub fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.index() as usize] = piece;
    }

    /// Moves a piece from one square to another.
    /// Returns the captured piece, if any.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.squares[from.index() as usize].take();
        std::mem::replace(&mut self.squares[to.index() as usize], piece)
    }

    /// Returns true if the given square is empty.
    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    /// Returns true if the given square contains a piece of the given color.
    pub fn is_color(&self, square: Square, color: Color) -> bool {
        self.piece_at(square).is_some_and(|p| p.color == color)
    }

    /// Returns true if the given square contains an enemy piece.
    pub fn is_enemy(&self, square: Square, color: Color) -> bool {
        self.is_color(square, color.opponent())
    }

    /// Iterates over occupied squares, a1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// Iterates over the pieces of one color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    /// Runs every cooldown down by `delta`, floored at zero.
    pub fn decay_cooldowns(&mut self, delta: Millis) {
        for piece in self.squares.iter_mut().flatten() {
            piece.hasten(delta);
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Rows> for Board {
    type Error = LayoutError;

    fn try_from(rows: Rows) -> Result<Self, Self::Error> {
        Board::from_rows(rows)
    }
}

impl From<Board> for Rows {
    fn from(board: Board) -> Self {
        board.to_rows()
    }
}
