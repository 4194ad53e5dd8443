use crate::error::UnknownPieceType;
use crate::registry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Simulated game time, in milliseconds.
pub type Millis = u64;

/// Represents one of the two players.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    /// Returns the opposite color.
    pub const fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Returns the starting rank for pawns of this color.
    pub const fn pawn_rank(self) -> Rank {
        match self {
            Color::White => Rank::Second,
            Color::Black => Rank::Seventh,
        }
    }

    /// Returns the back rank of this color.
    pub const fn home_rank(self) -> Rank {
        match self {
            Color::White => Rank::First,
            Color::Black => Rank::Eighth,
        }
    }

    /// Returns the direction pawns of this color move.
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Index into per-color arrays.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Black => "Black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Every piece type the registry knows about.
///
/// The first six are the classical pieces; the rest are variants that
/// reuse classical movement with altered constraints or add an arrival
/// effect. The discriminant doubles as the registry index.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
    /// Pawn that steps diagonally forward.
    Skirmisher,
    /// Rook that may vault one piece sitting next to its destination.
    Vaulter,
    /// Knight with an extra long leap.
    Phantom,
    /// Bishop that slows adjacent enemies when it lands.
    Hexer,
    /// Pawn that hastens adjacent friends when it lands.
    Medic,
}

impl PieceType {
    pub const ALL: [PieceType; 11] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
        PieceType::Skirmisher,
        PieceType::Vaulter,
        PieceType::Phantom,
        PieceType::Hexer,
        PieceType::Medic,
    ];

    /// Non-classical types only.
    pub const CUSTOM: [PieceType; 5] = [
        PieceType::Skirmisher,
        PieceType::Vaulter,
        PieceType::Phantom,
        PieceType::Hexer,
        PieceType::Medic,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_custom(self) -> bool {
        self.index() > PieceType::King.index()
    }

    /// Lowercase registry name, as used on the wire.
    pub const fn name(self) -> &'static str {
        match self {
            PieceType::Pawn => "pawn",
            PieceType::Knight => "knight",
            PieceType::Bishop => "bishop",
            PieceType::Rook => "rook",
            PieceType::Queen => "queen",
            PieceType::King => "king",
            PieceType::Skirmisher => "skirmisher",
            PieceType::Vaulter => "vaulter",
            PieceType::Phantom => "phantom",
            PieceType::Hexer => "hexer",
            PieceType::Medic => "medic",
        }
    }

    /// The classical piece this type is scored as.
    pub fn class(self) -> PieceType {
        registry::lookup(self).class
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for PieceType {
    type Err = UnknownPieceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PieceType::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPieceType(s.to_string()))
    }
}

/// A piece on the board together with its cooldown timer.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    #[serde(rename = "type")]
    pub piece_type: PieceType,
    pub color: Color,
    pub cooldown_remaining: Millis,
    pub cooldown_duration: Millis,
}

impl Piece {
    /// Creates a ready piece with its registered cooldown duration.
    pub fn new(piece_type: PieceType, color: Color) -> Self {
        Self {
            piece_type,
            color,
            cooldown_remaining: 0,
            cooldown_duration: registry::lookup(piece_type).cooldown_ms,
        }
    }

    /// A piece may move only once its cooldown has run out.
    pub const fn is_ready(&self) -> bool {
        self.cooldown_remaining == 0
    }

    /// Restarts the full cooldown after a move.
    pub fn start_cooldown(&mut self) {
        self.cooldown_remaining = self.cooldown_duration;
    }

    /// Adds to the remaining cooldown, never past the full duration.
    pub fn delay(&mut self, ms: Millis) {
        self.cooldown_remaining = self
            .cooldown_remaining
            .saturating_add(ms)
            .min(self.cooldown_duration);
    }

    /// Removes from the remaining cooldown, floored at zero.
    pub fn hasten(&mut self, ms: Millis) {
        self.cooldown_remaining = self.cooldown_remaining.saturating_sub(ms);
    }
}

/// A file on the chess board (a-h).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct File(u8);

impl File {
    /// Creates a new file from index (0-7).
    /// Returns None if index is out of range.
    pub const fn new(index: u8) -> Option<Self> {
        if index < 8 { Some(File(index)) } else { None }
    }

    /// Creates a file from a character ('a'-'h').
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='h' => Some(File(c as u8 - b'a')),
            _ => None,
        }
    }

    /// Returns the file as a character ('a'-'h').
    pub const fn to_char(self) -> char {
        (b'a' + self.0) as char
    }

    /// Returns the file index (0-7).
    pub const fn index(self) -> u8 {
        self.0
    }
}

/// A rank on the chess board (1-8).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(u8);

impl Rank {
    /// Creates a new rank from index (0-7).
    /// Returns None if index is out of range.
    pub const fn new(index: u8) -> Option<Self> {
        if index < 8 { Some(Rank(index)) } else { None }
    }

    /// Creates a rank from a digit ('1'-'8').
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '1'..='8' => Some(Rank(c as u8 - b'1')),
            _ => None,
        }
    }

    /// Returns the rank as a character ('1'-'8').
    pub const fn to_char(self) -> char {
        (b'1' + self.0) as char
    }

    /// Returns the rank index (0-7).
    pub const fn index(self) -> u8 {
        self.0
    }
}

/// Rank constants for readability.
#[allow(non_upper_case_globals)]
impl Rank {
    pub const First: Rank = Rank(0);
    pub const Second: Rank = Rank(1);
    pub const Seventh: Rank = Rank(6);
    pub const Eighth: Rank = Rank(7);
}

/// A square on the board.
///
/// Stored as `rank * 8 + file`, so a1 is 0 and h8 is 63. External callers
/// address squares by display row (row 0 is rank 8) and column instead.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Square(u8);

impl Square {
    /// Creates a new square from file and rank.
    pub const fn new(file: File, rank: Rank) -> Self {
        Square(rank.0 * 8 + file.0)
    }

    /// Creates a square from display coordinates.
    pub const fn from_row_col(row: u8, col: u8) -> Option<Self> {
        if row < 8 && col < 8 {
            Some(Square((7 - row) * 8 + col))
        } else {
            None
        }
    }

    /// Parses algebraic coordinates such as "e4".
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let file = File::from_char(chars.next()?)?;
        let rank = Rank::from_char(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Square::new(file, rank))
    }

    /// Iterates over all 64 squares, a1 first.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square)
    }

    /// Returns the file of this square.
    pub const fn file(self) -> File {
        File(self.0 % 8)
    }

    /// Returns the rank of this square.
    pub const fn rank(self) -> Rank {
        Rank(self.0 / 8)
    }

    /// Display row, 0 at the top (rank 8).
    pub const fn row(self) -> u8 {
        7 - self.0 / 8
    }

    /// Display column, 0 on the a-file.
    pub const fn col(self) -> u8 {
        self.0 % 8
    }

    /// Returns the square index (0-63).
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Shifts by whole files and ranks, if the result stays on the board.
    pub const fn offset(self, df: i8, dr: i8) -> Option<Self> {
        let file = self.file().0 as i8 + df;
        let rank = self.rank().0 as i8 + dr;
        if file >= 0 && file < 8 && rank >= 0 && rank < 8 {
            Some(Square(rank as u8 * 8 + file as u8))
        } else {
            None
        }
    }

    /// The up to 8 surrounding squares, clipped at the board edge.
    pub fn neighbors(self) -> impl Iterator<Item = Square> {
        const AROUND: [(i8, i8); 8] = [
            (-1, -1),
            (-1, 0),
            (-1, 1),
            (0, -1),
            (0, 1),
            (1, -1),
            (1, 0),
            (1, 1),
        ];
        AROUND
            .into_iter()
            .filter_map(move |(df, dr)| self.offset(df, dr))
    }

    /// Signed (file, rank) difference from `self` to `other`.
    pub const fn delta(self, other: Square) -> (i8, i8) {
        (
            other.file().0 as i8 - self.file().0 as i8,
            other.rank().0 as i8 - self.rank().0 as i8,
        )
    }

    /// Chebyshev distance to another square.
    pub const fn distance(self, other: Square) -> u8 {
        let (df, dr) = self.delta(other);
        let df = df.unsigned_abs();
        let dr = dr.unsigned_abs();
        if df > dr { df } else { dr }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file().to_char(), self.rank().to_char())
    }
}

/// A move from one square to another.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}
