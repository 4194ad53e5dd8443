//! Piece capability registry.
//!
//! One static table maps every [`PieceType`] to its energy cost, cooldown,
//! movement predicate and optional arrival effect. The table is indexed by
//! the enum discriminant, so every type is registered by construction and a
//! lookup can never miss.

use crate::board::Board;
use crate::rules;
use crate::types::{Millis, Piece, PieceType, Square};

/// Decides whether `piece` standing on `from` may go to `to`.
///
/// Only geometry and blockers are checked here; the evaluator has already
/// rejected null moves, empty origins and friendly destinations.
pub type MovePredicate = fn(&Board, Square, Square, &Piece) -> bool;

/// Cooldown added to each adjacent enemy when a hexer lands.
pub const HEX_DELAY_MS: Millis = 2000;

/// Cooldown removed from each adjacent friend when a medic lands.
pub const MEDIC_HASTE_MS: Millis = 1500;

/// What a piece does to its surroundings after it moves.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SideEffect {
    /// Adds cooldown to every adjacent enemy piece.
    SlowAdjacentEnemies(Millis),
    /// Removes cooldown from every adjacent friendly piece.
    HastenAdjacentAllies(Millis),
}

impl SideEffect {
    /// Applies the effect around `at`, where `mover` has just landed.
    pub fn apply(self, board: &mut Board, at: Square, mover: &Piece) {
        for square in at.neighbors() {
            let Some(piece) = board.piece_mut(square) else {
                continue;
            };
            match self {
                SideEffect::SlowAdjacentEnemies(ms) if piece.color != mover.color => {
                    piece.delay(ms)
                }
                SideEffect::HastenAdjacentAllies(ms) if piece.color == mover.color => {
                    piece.hasten(ms)
                }
                _ => {}
            }
        }
    }
}

/// A registry entry.
#[derive(Clone, Copy, Debug)]
pub struct PieceDefinition {
    pub piece_type: PieceType,
    /// The classical piece this one is valued as.
    pub class: PieceType,
    /// Notation letter; only the pawn has none.
    pub letter: Option<char>,
    pub energy_cost: u32,
    pub cooldown_ms: Millis,
    pub legal: MovePredicate,
    pub effect: Option<SideEffect>,
}

const fn define(
    piece_type: PieceType,
    class: PieceType,
    letter: Option<char>,
    energy_cost: u32,
    cooldown_ms: Millis,
    legal: MovePredicate,
    effect: Option<SideEffect>,
) -> PieceDefinition {
    PieceDefinition {
        piece_type,
        class,
        letter,
        energy_cost,
        cooldown_ms,
        legal,
        effect,
    }
}

use PieceType::*;

static DEFINITIONS: [PieceDefinition; 11] = [
    define(Pawn, Pawn, None, 2, 4000, rules::pawn, None),
    define(Knight, Knight, Some('N'), 4, 5000, rules::knight, None),
    define(Bishop, Bishop, Some('B'), 5, 6000, rules::bishop, None),
    define(Rook, Rook, Some('R'), 6, 7000, rules::rook, None),
    define(Queen, Queen, Some('Q'), 8, 9000, rules::queen, None),
    define(King, King, Some('K'), 10, 11000, rules::king, None),
    define(Skirmisher, Pawn, Some('S'), 3, 4500, rules::skirmisher, None),
    define(Vaulter, Rook, Some('V'), 7, 8000, rules::vaulter, None),
    define(Phantom, Knight, Some('P'), 5, 5500, rules::phantom, None),
    define(
        Hexer,
        Bishop,
        Some('H'),
        6,
        7000,
        rules::bishop,
        Some(SideEffect::SlowAdjacentEnemies(HEX_DELAY_MS)),
    ),
    define(
        Medic,
        Pawn,
        Some('M'),
        3,
        5000,
        rules::pawn,
        Some(SideEffect::HastenAdjacentAllies(MEDIC_HASTE_MS)),
    ),
];

/// Returns the definition registered for `piece_type`.
pub fn lookup(piece_type: PieceType) -> &'static PieceDefinition {
    &DEFINITIONS[piece_type.index()]
}

/// All registered definitions, classical pieces first.
pub fn all() -> impl Iterator<Item = &'static PieceDefinition> {
    DEFINITIONS.iter()
}

/// Only the variant definitions.
pub fn custom() -> impl Iterator<Item = &'static PieceDefinition> {
    DEFINITIONS.iter().filter(|def| def.piece_type.is_custom())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;

    #[test]
    fn test_table_is_indexed_by_type() {
        for (i, piece_type) in PieceType::ALL.iter().enumerate() {
            assert_eq!(DEFINITIONS[i].piece_type, *piece_type);
            assert_eq!(lookup(*piece_type).piece_type, *piece_type);
        }
        assert_eq!(all().count(), PieceType::ALL.len());
    }

    #[test]
    fn test_classical_costs() {
        let expected = [
            (Pawn, 2, 4000),
            (Knight, 4, 5000),
            (Bishop, 5, 6000),
            (Rook, 6, 7000),
            (Queen, 8, 9000),
            (King, 10, 11000),
        ];
        for (piece_type, cost, cooldown) in expected {
            let def = lookup(piece_type);
            assert_eq!(def.energy_cost, cost);
            assert_eq!(def.cooldown_ms, cooldown);
        }
    }

    #[test]
    fn test_custom_lists_only_variants() {
        let custom: Vec<PieceType> = custom().map(|d| d.piece_type).collect();
        assert_eq!(custom, PieceType::CUSTOM.to_vec());
        assert!(super::custom().all(|d| d.class != d.piece_type));
    }

    #[test]
    fn test_only_the_pawn_lacks_a_letter() {
        for def in all() {
            assert_eq!(def.letter.is_none(), def.piece_type == Pawn, "{}", def.piece_type);
        }
    }

    #[test]
    fn test_every_definition_is_positive() {
        for def in all() {
            assert!(def.energy_cost > 0);
            assert!(def.cooldown_ms > 0);
        }
    }

    #[test]
    fn test_hasten_only_touches_friends() {
        let mut board = Board::empty();
        let at = Square::parse("d4").unwrap();
        let friend = Square::parse("e5").unwrap();
        let enemy = Square::parse("c3").unwrap();

        let mut tired = Piece::new(Rook, Color::White);
        tired.cooldown_remaining = 5000;
        board.set_piece(friend, Some(tired));
        let mut tired_enemy = Piece::new(Rook, Color::Black);
        tired_enemy.cooldown_remaining = 5000;
        board.set_piece(enemy, Some(tired_enemy));

        let medic = Piece::new(Medic, Color::White);
        SideEffect::HastenAdjacentAllies(MEDIC_HASTE_MS).apply(&mut board, at, &medic);

        assert_eq!(board.piece_at(friend).unwrap().cooldown_remaining, 3500);
        assert_eq!(board.piece_at(enemy).unwrap().cooldown_remaining, 5000);
    }
}
