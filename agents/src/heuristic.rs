use crate::difficulty::Difficulty;
use crate::evaluation::{captures_king, evaluate_move};
use crate::Agent;
use cooldown_core::{Color, GameState, Move};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Noise amplitude at zero accuracy, in centipawns.
const NOISE_SCALE: f64 = 100.0;
/// Share of the ranked list sampled from when the agent misses the top move.
const TOP_FRACTION: f64 = 0.3;

/// One-ply evaluator with difficulty-scaled noise and imperfect selection.
pub struct HeuristicAgent<R: Rng = StdRng> {
    name: String,
    difficulty: Difficulty,
    rng: R,
}

impl HeuristicAgent<StdRng> {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_rng(difficulty, StdRng::from_entropy())
    }

    /// Reproducible selection for tests and replays.
    pub fn seeded(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_rng(difficulty, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> HeuristicAgent<R> {
    pub fn with_rng(difficulty: Difficulty, rng: R) -> Self {
        HeuristicAgent {
            name: format!("Heuristic(rating={})", difficulty.rating),
            difficulty,
            rng,
        }
    }

    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    /// Scores every playable move, best first. Noise is already included.
    pub fn rank_moves(&mut self, state: &GameState, color: Color) -> Vec<(Move, f64)> {
        self.score_moves(state, state.playable_moves(color))
    }

    fn score_moves(&mut self, state: &GameState, moves: Vec<Move>) -> Vec<(Move, f64)> {
        let spread = NOISE_SCALE * (1.0 - self.difficulty.accuracy);
        let mut scored: Vec<(Move, f64)> = moves
            .into_iter()
            .map(|mv| {
                let noise = self.rng.gen_range(-1.0..1.0) * spread;
                (mv, evaluate_move(state, mv).total(&self.difficulty) + noise)
            })
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored
    }
}

impl<R: Rng> Agent for HeuristicAgent<R> {
    fn best_move(&mut self, state: &GameState, color: Color) -> Option<Move> {
        let moves = state.playable_moves(color);
        if let Some(&winning) = moves.iter().find(|&&mv| captures_king(&state.board, mv)) {
            return Some(winning);
        }

        let ranked = self.score_moves(state, moves);
        if ranked.is_empty() {
            debug!(%color, "no playable move, passing");
            return None;
        }

        if self.rng.gen::<f64>() < self.difficulty.accuracy {
            return Some(ranked[0].0);
        }
        let top = ((ranked.len() as f64 * TOP_FRACTION) as usize).max(1);
        ranked[..top].choose(&mut self.rng).map(|(mv, _)| *mv)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::{Preset, MIN_RATING};
    use cooldown_core::{Board, EnergyPool, Piece, PieceType, Square};

    fn sq(name: &str) -> Square {
        Square::parse(name).unwrap()
    }

    fn place(board: &mut Board, name: &str, piece_type: PieceType, color: Color) {
        board.set_piece(sq(name), Some(Piece::new(piece_type, color)));
    }

    #[test]
    fn test_takes_the_king_when_it_can() {
        // The only ready, affordable black piece is the rook, and its only
        // capture is the king. Everything else is cooling down.
        let mut board = Board::empty();
        place(&mut board, "e1", PieceType::King, Color::White);
        place(&mut board, "e8", PieceType::Rook, Color::Black);
        place(&mut board, "a8", PieceType::Queen, Color::Black);
        if let Some(queen) = board.piece_mut(sq("a8")) {
            queen.start_cooldown();
        }
        let state = GameState::with_board(board, Default::default());

        for seed in 0..20 {
            let mut agent = HeuristicAgent::seeded(Difficulty::from_rating(MIN_RATING), seed);
            assert_eq!(
                agent.best_move(&state, Color::Black),
                Some(Move::new(sq("e8"), sq("e1")))
            );
        }
    }

    #[test]
    fn test_king_capture_short_circuits_among_many() {
        // A black rook on e3 faces the white king through the missing e2 pawn.
        let mut board = Board::standard();
        board.set_piece(sq("e2"), None);
        place(&mut board, "e3", PieceType::Rook, Color::Black);
        let mut state = GameState::with_board(board, Default::default());
        state.set_energy(Color::Black, EnergyPool::new(25.0, 25.0));

        let mut agent = HeuristicAgent::seeded(Difficulty::from(Preset::Easy), 7);
        assert_eq!(
            agent.best_move(&state, Color::Black),
            Some(Move::new(sq("e3"), sq("e1")))
        );
    }

    #[test]
    fn test_never_exceeds_supplied_energy() {
        let mut state = GameState::default();
        // Enough for pawns (2) and knights (4) but nothing heavier.
        state.set_energy(Color::White, EnergyPool::new(4.5, 25.0));
        let mut agent = HeuristicAgent::seeded(Difficulty::from(Preset::Hard), 1);

        for _ in 0..20 {
            let mv = agent.best_move(&state, Color::White).unwrap();
            let piece = state.board.piece_at(mv.from).unwrap();
            let cost = cooldown_core::registry::lookup(piece.piece_type).energy_cost;
            assert!(f64::from(cost) <= 4.5);
        }
    }

    #[test]
    fn test_passes_without_playable_moves() {
        let mut state = GameState::default();
        state.set_energy(Color::Black, EnergyPool::new(1.0, 25.0));
        let mut agent = HeuristicAgent::seeded(Difficulty::default(), 3);
        assert_eq!(agent.best_move(&state, Color::Black), None);
    }

    #[test]
    fn test_seeded_agents_agree() {
        let state = GameState::default();
        let mut first = HeuristicAgent::seeded(Difficulty::from(Preset::Easy), 42);
        let mut second = HeuristicAgent::seeded(Difficulty::from(Preset::Easy), 42);
        for _ in 0..10 {
            assert_eq!(
                first.best_move(&state, Color::White),
                second.best_move(&state, Color::White)
            );
        }
    }

    #[test]
    fn test_ranking_is_sorted() {
        let state = GameState::default();
        let mut agent = HeuristicAgent::seeded(Difficulty::default(), 9);
        let ranked = agent.rank_moves(&state, Color::White);
        // 16 pawn moves and 4 knight moves are affordable from 6 energy.
        assert_eq!(ranked.len(), 20);
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_perfect_accuracy_plays_the_top_ranked_move() {
        let state = GameState::default();
        let difficulty = Difficulty {
            accuracy: 1.0,
            ..Difficulty::default()
        };
        let mut agent = HeuristicAgent::seeded(difficulty, 5);
        let top = agent.rank_moves(&state, Color::White)[0].0;
        assert_eq!(agent.best_move(&state, Color::White), Some(top));
    }
}
