use crate::Agent;
use cooldown_core::{Color, GameState, Move};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Plays a uniformly random playable move. Useful as a baseline opponent.
pub struct RandomAgent<R: Rng = StdRng> {
    name: String,
    rng: R,
}

impl RandomAgent<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomAgent<R> {
    pub fn with_rng(rng: R) -> Self {
        RandomAgent {
            name: "Random".to_string(),
            rng,
        }
    }
}

impl Default for RandomAgent<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Agent for RandomAgent<R> {
    fn best_move(&mut self, state: &GameState, color: Color) -> Option<Move> {
        state.playable_moves(color).choose(&mut self.rng).copied()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
