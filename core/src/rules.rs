//! Move legality.
//!
//! [`is_legal`] applies the checks shared by every piece and then defers to
//! the predicate registered for the moving piece. The per-type predicates
//! live here too so variants can reuse the classical primitives.

use crate::board::Board;
use crate::registry;
use crate::types::{Color, Move, Piece, Square};

/// Returns true if the piece on `from` may move to `to` on this board.
///
/// Cooldowns and energy are not considered; see the economy module for
/// affordability.
pub fn is_legal(board: &Board, from: Square, to: Square) -> bool {
    if from == to {
        return false;
    }
    let Some(piece) = board.piece_at(from) else {
        return false;
    };
    if board.is_color(to, piece.color) {
        return false;
    }
    (registry::lookup(piece.piece_type).legal)(board, from, to, &piece)
}

/// Every square the piece on `from` may legally move to.
pub fn candidate_moves(board: &Board, from: Square) -> Vec<Square> {
    Square::all()
        .filter(|&to| is_legal(board, from, to))
        .collect()
}

/// Every legal move for the pieces of `color`, ignoring cooldown and energy.
pub fn all_candidate_moves(board: &Board, color: Color) -> Vec<Move> {
    board
        .pieces_of(color)
        .flat_map(|(from, _)| {
            candidate_moves(board, from)
                .into_iter()
                .map(move |to| Move::new(from, to))
        })
        .collect()
}

/// Squares strictly between two squares on a shared line.
/// Empty when they are not aligned or adjacent.
fn between(from: Square, to: Square) -> impl Iterator<Item = Square> {
    let (df, dr) = from.delta(to);
    let aligned = df == 0 || dr == 0 || df.abs() == dr.abs();
    let steps = if aligned { df.abs().max(dr.abs()) } else { 0 };
    let (sf, sr) = (df.signum(), dr.signum());
    (1..steps).filter_map(move |i| from.offset(sf * i, sr * i))
}

fn path_clear(board: &Board, from: Square, to: Square) -> bool {
    between(from, to).all(|sq| board.is_empty(sq))
}

fn is_diagonal(from: Square, to: Square) -> bool {
    let (df, dr) = from.delta(to);
    df != 0 && df.abs() == dr.abs()
}

fn is_straight(from: Square, to: Square) -> bool {
    let (df, dr) = from.delta(to);
    (df == 0) != (dr == 0)
}

fn is_leap(from: Square, to: Square, long: i8, short: i8) -> bool {
    let (df, dr) = from.delta(to);
    let (df, dr) = (df.abs(), dr.abs());
    (df == long && dr == short) || (df == short && dr == long)
}

/// One step forward onto an empty square, two from the starting rank over
/// an empty square, or one diagonal step forward onto an enemy.
pub fn pawn(board: &Board, from: Square, to: Square, piece: &Piece) -> bool {
    let direction = piece.color.pawn_direction();
    let (df, dr) = from.delta(to);

    if df == 0 && dr == direction {
        return board.is_empty(to);
    }
    if df == 0 && dr == 2 * direction {
        return from.rank() == piece.color.pawn_rank()
            && board.is_empty(to)
            && path_clear(board, from, to);
    }
    if df.abs() == 1 && dr == direction {
        return board.is_enemy(to, piece.color);
    }
    false
}

pub fn knight(_board: &Board, from: Square, to: Square, _piece: &Piece) -> bool {
    is_leap(from, to, 2, 1)
}

pub fn bishop(board: &Board, from: Square, to: Square, _piece: &Piece) -> bool {
    is_diagonal(from, to) && path_clear(board, from, to)
}

pub fn rook(board: &Board, from: Square, to: Square, _piece: &Piece) -> bool {
    is_straight(from, to) && path_clear(board, from, to)
}

pub fn queen(board: &Board, from: Square, to: Square, piece: &Piece) -> bool {
    bishop(board, from, to, piece) || rook(board, from, to, piece)
}

pub fn king(_board: &Board, from: Square, to: Square, _piece: &Piece) -> bool {
    from.distance(to) == 1
}

/// One diagonal step forward, onto an empty square or an enemy.
pub fn skirmisher(_board: &Board, from: Square, to: Square, piece: &Piece) -> bool {
    let (df, dr) = from.delta(to);
    df.abs() == 1 && dr == piece.color.pawn_direction()
}

/// Rook lines. A single blocker may be vaulted, but only if it sits on the
/// square immediately before the destination.
pub fn vaulter(board: &Board, from: Square, to: Square, _piece: &Piece) -> bool {
    if !is_straight(from, to) {
        return false;
    }
    let blockers: Vec<Square> = between(from, to).filter(|&sq| !board.is_empty(sq)).collect();
    match blockers.as_slice() {
        [] => true,
        [blocker] => blocker.distance(to) == 1,
        _ => false,
    }
}

/// Knight leaps plus the longer (3, 1) leap. Intervening pieces never matter.
pub fn phantom(_board: &Board, from: Square, to: Square, _piece: &Piece) -> bool {
    is_leap(from, to, 2, 1) || is_leap(from, to, 3, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceType;

    fn sq(name: &str) -> Square {
        Square::parse(name).unwrap()
    }

    fn place(board: &mut Board, name: &str, piece_type: PieceType, color: Color) {
        board.set_piece(sq(name), Some(Piece::new(piece_type, color)));
    }

    #[test]
    fn test_null_move_is_never_legal() {
        let board = Board::standard();
        for square in Square::all() {
            assert!(!is_legal(&board, square, square));
        }
        let mut lone = Board::empty();
        for piece_type in PieceType::ALL {
            place(&mut lone, "d4", piece_type, Color::White);
            assert!(!is_legal(&lone, sq("d4"), sq("d4")));
        }
    }

    #[test]
    fn test_empty_origin_and_friendly_destination() {
        let board = Board::standard();
        assert!(!is_legal(&board, sq("e4"), sq("e5")));
        assert!(!is_legal(&board, sq("a1"), sq("a2")));
        assert!(!is_legal(&board, sq("d1"), sq("e1")));
    }

    #[test]
    fn test_king_steps_one_square() {
        let mut board = Board::empty();
        place(&mut board, "e1", PieceType::King, Color::White);
        place(&mut board, "a7", PieceType::Pawn, Color::Black);

        assert!(!is_legal(&board, sq("e1"), sq("e3")));
        assert!(!is_legal(&board, sq("e1"), sq("g1")));
        assert!(is_legal(&board, sq("e1"), sq("f2")));
        assert_eq!(candidate_moves(&board, sq("e1")).len(), 5);
    }

    #[test]
    fn test_pawn_double_step_only_from_start() {
        let mut board = Board::empty();
        place(&mut board, "e2", PieceType::Pawn, Color::White);
        assert!(is_legal(&board, sq("e2"), sq("e4")));
        assert!(is_legal(&board, sq("e2"), sq("e3")));

        let mut board = Board::empty();
        place(&mut board, "e3", PieceType::Pawn, Color::White);
        assert!(!is_legal(&board, sq("e3"), sq("e5")));

        let mut board = Board::empty();
        place(&mut board, "d7", PieceType::Pawn, Color::Black);
        assert!(is_legal(&board, sq("d7"), sq("d5")));
        assert!(!is_legal(&board, sq("d7"), sq("d8")));
    }

    #[test]
    fn test_pawn_blocked_and_captures() {
        let mut board = Board::empty();
        place(&mut board, "e2", PieceType::Pawn, Color::White);
        place(&mut board, "e3", PieceType::Knight, Color::Black);
        assert!(!is_legal(&board, sq("e2"), sq("e3")));
        assert!(!is_legal(&board, sq("e2"), sq("e4")));

        place(&mut board, "d3", PieceType::Knight, Color::Black);
        assert!(is_legal(&board, sq("e2"), sq("d3")));
        assert!(!is_legal(&board, sq("e2"), sq("f3")));
    }

    #[test]
    fn test_sliders_are_blocked() {
        let mut board = Board::empty();
        place(&mut board, "a1", PieceType::Rook, Color::White);
        place(&mut board, "c1", PieceType::Bishop, Color::White);
        place(&mut board, "d4", PieceType::Queen, Color::White);
        place(&mut board, "a4", PieceType::Pawn, Color::Black);
        place(&mut board, "f6", PieceType::Pawn, Color::Black);

        assert!(is_legal(&board, sq("a1"), sq("a4")));
        assert!(!is_legal(&board, sq("a1"), sq("a5")));
        assert!(!is_legal(&board, sq("a1"), sq("d1")));
        assert!(is_legal(&board, sq("c1"), sq("a3")));
        assert!(!is_legal(&board, sq("c1"), sq("c3")));
        assert!(is_legal(&board, sq("d4"), sq("f6")));
        assert!(!is_legal(&board, sq("d4"), sq("g7")));
        assert!(!is_legal(&board, sq("d4"), sq("e6")));
        assert!(is_legal(&board, sq("d4"), sq("b4")));
    }

    #[test]
    fn test_knight_ignores_blockers() {
        let board = Board::standard();
        assert!(is_legal(&board, sq("g1"), sq("f3")));
        assert!(is_legal(&board, sq("g1"), sq("h3")));
        assert!(!is_legal(&board, sq("g1"), sq("g3")));
        assert_eq!(candidate_moves(&board, sq("b1")).len(), 2);
    }

    #[test]
    fn test_vaulter_leaps_one_adjacent_blocker() {
        let mut board = Board::empty();
        place(&mut board, "a1", PieceType::Vaulter, Color::White);
        place(&mut board, "a4", PieceType::Pawn, Color::Black);

        assert!(is_legal(&board, sq("a1"), sq("a3")));
        assert!(is_legal(&board, sq("a1"), sq("a4")));
        assert!(is_legal(&board, sq("a1"), sq("a5")));
        assert!(!is_legal(&board, sq("a1"), sq("a6")));

        place(&mut board, "a3", PieceType::Pawn, Color::White);
        assert!(is_legal(&board, sq("a1"), sq("a4")));
        assert!(!is_legal(&board, sq("a1"), sq("a5")));
        assert!(!is_legal(&board, sq("a1"), sq("b2")));
    }

    #[test]
    fn test_variant_geometry() {
        let mut board = Board::empty();
        place(&mut board, "d4", PieceType::Skirmisher, Color::White);
        place(&mut board, "e5", PieceType::Pawn, Color::Black);
        assert!(is_legal(&board, sq("d4"), sq("c5")));
        assert!(is_legal(&board, sq("d4"), sq("e5")));
        assert!(!is_legal(&board, sq("d4"), sq("d5")));
        assert!(!is_legal(&board, sq("d4"), sq("c3")));

        let mut board = Board::empty();
        place(&mut board, "d4", PieceType::Phantom, Color::Black);
        assert!(is_legal(&board, sq("d4"), sq("e6")));
        assert!(is_legal(&board, sq("d4"), sq("e7")));
        assert!(is_legal(&board, sq("d4"), sq("a5")));
        assert!(!is_legal(&board, sq("d4"), sq("f6")));
    }

    #[test]
    fn test_all_candidate_moves_from_start() {
        let board = Board::standard();
        // 16 pawn moves and 4 knight moves.
        assert_eq!(all_candidate_moves(&board, Color::White).len(), 20);
        assert_eq!(all_candidate_moves(&board, Color::Black).len(), 20);
    }

    #[test]
    fn test_non_capture_destinations_are_empty() {
        let board = Board::standard();
        for mv in all_candidate_moves(&board, Color::White) {
            assert!(board.is_empty(mv.to));
        }
    }
}
