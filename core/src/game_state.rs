//! Complete state of one game: board, energy pools, clock and history.
//!
//! [`GameState::apply_move`] is the single path that changes the board.
//! Every driver, local or networked, goes through it so legality and
//! affordability are always checked the same way.

use crate::board::Board;
use crate::economy::{self, EconomyConfig, EnergyPool};
use crate::error::MoveError;
use crate::protocol::{self, MoveRecord, MoveRequest, StateUpdate};
use crate::registry;
use crate::rules;
use crate::types::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameStatus {
    InProgress,
    Won(Color),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// The current board position
    pub board: Board,
    energy: [EnergyPool; 2],
    clock_ms: Millis,
    status: GameStatus,
    history: Vec<MoveRecord>,
    /// Clock value of each color's latest move
    last_move_at: [Option<Millis>; 2],
    /// Layout restored by `reset`
    initial_board: Board,
    config: EconomyConfig,
}

impl GameState {
    /// Creates a new game in the standard position.
    pub fn new(config: EconomyConfig) -> Self {
        Self::with_board(Board::standard(), config)
    }

    /// Creates a game from a custom layout.
    pub fn with_board(board: Board, config: EconomyConfig) -> Self {
        Self {
            energy: [config.new_pool(), config.new_pool()],
            clock_ms: 0,
            status: GameStatus::InProgress,
            history: Vec::new(),
            last_move_at: [None; 2],
            initial_board: board.clone(),
            board,
            config,
        }
    }

    /// Restores the initial layout, both pools and the clock.
    pub fn reset(&mut self) {
        *self = Self::with_board(self.initial_board.clone(), self.config.clone());
    }

    pub fn energy(&self, color: Color) -> &EnergyPool {
        &self.energy[color.index()]
    }

    /// Overrides a pool, e.g. when restoring a saved game.
    pub fn set_energy(&mut self, color: Color, pool: EnergyPool) {
        self.energy[color.index()] = pool;
    }

    pub fn clock_ms(&self) -> Millis {
        self.clock_ms
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == GameStatus::InProgress
    }

    pub fn winner(&self) -> Option<Color> {
        match self.status {
            GameStatus::Won(color) => Some(color),
            GameStatus::InProgress => None,
        }
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn last_move_at(&self, color: Color) -> Option<Millis> {
        self.last_move_at[color.index()]
    }

    pub fn config(&self) -> &EconomyConfig {
        &self.config
    }

    /// Advances the clock by `delta` ms: cooldowns decay, then both pools
    /// regenerate at the rate for the new clock value.
    pub fn tick(&mut self, delta: Millis) {
        if !self.is_in_progress() {
            return;
        }
        self.clock_ms += delta;
        self.board.decay_cooldowns(delta);

        let gain = self.config.rate(self.clock_ms) * (delta as f64 / 1000.0);
        for pool in &mut self.energy {
            pool.gain(gain);
        }
        trace!(clock_ms = self.clock_ms, gain, "tick");
    }

    /// Squares the piece on `from` may legally move to, for highlighting.
    pub fn legal_targets(&self, from: Square) -> Vec<Square> {
        rules::candidate_moves(&self.board, from)
    }

    /// Moves of `color` that are legal, ready and affordable right now.
    pub fn playable_moves(&self, color: Color) -> Vec<Move> {
        let pool = self.energy(color);
        self.board
            .pieces_of(color)
            .filter(|(from, piece)| economy::check_affordable(piece, *from, pool).is_ok())
            .flat_map(|(from, _)| {
                rules::candidate_moves(&self.board, from)
                    .into_iter()
                    .map(move |to| Move::new(from, to))
            })
            .collect()
    }

    /// Validates a move without applying it.
    pub fn check_move(&self, mv: Move) -> Result<Piece, MoveError> {
        if !self.is_in_progress() {
            return Err(MoveError::GameOver);
        }
        let piece = match self.board.piece_at(mv.from) {
            Some(piece) if rules::is_legal(&self.board, mv.from, mv.to) => piece,
            _ => {
                return Err(MoveError::NotLegal {
                    from: mv.from,
                    to: mv.to,
                })
            }
        };
        economy::check_affordable(&piece, mv.from, self.energy(piece.color))?;
        Ok(piece)
    }

    /// Resolves and applies a driver's request.
    pub fn attempt_move(&mut self, request: MoveRequest) -> Result<MoveRecord, MoveError> {
        self.apply_move(request.to_move()?)
    }

    /// Checks a move and, if it is legal and affordable, executes it.
    /// Nothing changes when an error is returned.
    pub fn apply_move(&mut self, mv: Move) -> Result<MoveRecord, MoveError> {
        self.check_move(mv)
            .and_then(|piece| self.execute(mv, piece))
            .inspect_err(|err| debug!(%mv, %err, "move rejected"))
    }

    /// Spending comes first, so a failure here still changes nothing.
    fn execute(&mut self, mv: Move, mut piece: Piece) -> Result<MoveRecord, MoveError> {
        let definition = registry::lookup(piece.piece_type);
        let color = piece.color;

        self.energy[color.index()].spend(definition.energy_cost)?;

        let target = self.board.piece_at(mv.to);
        let winner = target
            .filter(|t| t.piece_type == PieceType::King && t.color != color)
            .map(|_| color);

        let record = MoveRecord {
            notation: protocol::notation(piece.piece_type, mv.from, mv.to),
            elapsed_ms: self.clock_ms,
            color,
            energy_spent: definition.energy_cost,
            piece: piece.piece_type,
            captured: target.map(|t| t.piece_type),
            winner,
        };
        self.history.push(record.clone());
        self.last_move_at[color.index()] = Some(self.clock_ms);

        if let Some(winner) = winner {
            self.status = GameStatus::Won(winner);
            info!(%winner, notation = %record.notation, "king captured");
        }

        piece.start_cooldown();
        self.board.set_piece(mv.from, None);
        self.board.set_piece(mv.to, Some(piece));

        if let Some(effect) = definition.effect {
            effect.apply(&mut self.board, mv.to, &piece);
        }

        debug!(notation = %record.notation, %color, clock_ms = self.clock_ms, "move applied");
        Ok(record)
    }

    /// Snapshot for broadcasting to participants.
    pub fn update(&self) -> StateUpdate {
        StateUpdate {
            board: self.board.clone(),
            energy: self.energy,
            clock_ms: self.clock_ms,
            winner: self.winner(),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(EconomyConfig::default())
    }
}
