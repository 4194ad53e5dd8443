use cooldown_core::{registry, Color, GameState, Piece, PieceType, Square};
use crossterm::{
    queue,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use std::io::{self, Write};

fn piece_symbol(piece: &Piece) -> char {
    match (piece.piece_type, piece.color) {
        (PieceType::King, Color::White) => '♔',
        (PieceType::Queen, Color::White) => '♕',
        (PieceType::Rook, Color::White) => '♖',
        (PieceType::Bishop, Color::White) => '♗',
        (PieceType::Knight, Color::White) => '♘',
        (PieceType::Pawn, Color::White) => '♙',
        (PieceType::King, Color::Black) => '♚',
        (PieceType::Queen, Color::Black) => '♛',
        (PieceType::Rook, Color::Black) => '♜',
        (PieceType::Bishop, Color::Black) => '♝',
        (PieceType::Knight, Color::Black) => '♞',
        (PieceType::Pawn, Color::Black) => '♟',
        (custom, color) => {
            let letter = registry::lookup(custom).letter.unwrap_or('?');
            match color {
                Color::White => letter,
                Color::Black => letter.to_ascii_lowercase(),
            }
        }
    }
}

/// Draws the board with coordinates. Cooling pieces are dimmed and
/// `highlights` get a blue background.
pub fn draw_board(out: &mut impl Write, state: &GameState, highlights: &[Square]) -> io::Result<()> {
    queue!(out, Print("\n   a b c d e f g h\n"))?;
    queue!(out, Print("  ┌─────────────────┐\n"))?;

    for row in 0..8u8 {
        let rank_label = 8 - row;
        queue!(out, Print(format!("{rank_label} │ ")))?;

        for col in 0..8u8 {
            let Some(square) = Square::from_row_col(row, col) else {
                continue;
            };

            let background = if highlights.contains(&square) {
                TermColor::Blue
            } else if (row + col) % 2 == 1 {
                TermColor::DarkGrey
            } else {
                TermColor::Black
            };
            queue!(out, SetBackgroundColor(background))?;

            match state.board.piece_at(square) {
                Some(piece) => {
                    let foreground = match (piece.color, piece.is_ready()) {
                        (_, false) => TermColor::DarkYellow,
                        (Color::White, true) => TermColor::White,
                        (Color::Black, true) => TermColor::Magenta,
                    };
                    queue!(
                        out,
                        SetForegroundColor(foreground),
                        Print(format!("{} ", piece_symbol(&piece)))
                    )?;
                }
                None => queue!(out, Print("  "))?,
            }
            queue!(out, ResetColor)?;
        }

        queue!(out, Print(format!("│ {rank_label}\n")))?;
    }

    queue!(out, Print("  └─────────────────┘\n"))?;
    queue!(out, Print("   a b c d e f g h\n\n"))?;
    queue!(out, Print(status_line(state)), Print("\n"))?;
    out.flush()
}

/// Clock and both energy pools, e.g. `12.3s | White 6.0/25 | Black 4.5/25`.
pub fn status_line(state: &GameState) -> String {
    let mut line = format!("{:.1}s", state.clock_ms() as f64 / 1000.0);
    for color in Color::BOTH {
        let pool = state.energy(color);
        line.push_str(&format!(" | {color} {:.1}/{}", pool.current(), pool.max()));
    }
    if let Some(winner) = state.winner() {
        line.push_str(&format!(" | {winner} wins"));
    }
    line
}

/// Pieces still cooling down, with seconds left, e.g. `Ng1 2.5s`.
pub fn cooldown_summary(state: &GameState, color: Color) -> String {
    let cooling: Vec<String> = state
        .board
        .pieces_of(color)
        .filter(|(_, piece)| !piece.is_ready())
        .map(|(square, piece)| {
            let letter = registry::lookup(piece.piece_type).letter;
            format!(
                "{}{square} {:.1}s",
                letter.map(String::from).unwrap_or_default(),
                piece.cooldown_remaining as f64 / 1000.0
            )
        })
        .collect();
    if cooling.is_empty() {
        "all ready".to_string()
    } else {
        cooling.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_pieces_use_registry_letters() {
        let hexer = Piece::new(PieceType::Hexer, Color::White);
        let medic = Piece::new(PieceType::Medic, Color::Black);
        assert_eq!(piece_symbol(&hexer), 'H');
        assert_eq!(piece_symbol(&medic), 'm');
    }

    #[test]
    fn test_status_line() {
        let state = GameState::default();
        assert_eq!(status_line(&state), "0.0s | White 6.0/25 | Black 6.0/25");
    }

    #[test]
    fn test_draw_board_writes_every_rank() {
        let mut out = Vec::new();
        draw_board(&mut out, &GameState::default(), &[]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("8 │"));
        assert!(text.contains("1 │"));
        assert!(text.contains('♔'));
    }

    #[test]
    fn test_cooldown_summary() {
        let mut state = GameState::default();
        assert_eq!(cooldown_summary(&state, Color::White), "all ready");
        let g1 = Square::parse("g1").unwrap();
        let f3 = Square::parse("f3").unwrap();
        state.apply_move(cooldown_core::Move::new(g1, f3)).unwrap();
        assert_eq!(cooldown_summary(&state, Color::White), "Nf3 5.0s");
    }
}
