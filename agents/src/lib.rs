pub mod controller;
pub mod difficulty;
pub mod evaluation;
pub mod heuristic;
pub mod random;

use cooldown_core::{Color, GameState, Move};

/// Core trait for move-choosing agents
pub trait Agent {
    /// Pick a playable move for `color`, or `None` to pass
    fn best_move(&mut self, state: &GameState, color: Color) -> Option<Move>;

    /// Get the agent's name
    fn name(&self) -> &str;
}

pub use controller::{AiController, AiPhase};
pub use difficulty::{Difficulty, Preset};
pub use heuristic::HeuristicAgent;
pub use random::RandomAgent;
