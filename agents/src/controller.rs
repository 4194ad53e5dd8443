//! Drives an [`Agent`] against a live [`Session`].
//!
//! The controller picks a move from a snapshot, waits out its reaction
//! delay, and only then submits the move. A reset during the wait cancels
//! the turn; a move that went stale some other way is refused by the
//! session's epoch check and re-validated in full before it is applied.

use crate::difficulty::Difficulty;
use crate::heuristic::HeuristicAgent;
use crate::Agent;
use cooldown_core::{Color, MoveRecord, Session};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AiPhase {
    Idle,
    Thinking,
}

pub struct AiController<A: Agent> {
    agent: Mutex<A>,
    color: Color,
    reaction_delay: Duration,
    thinking: AtomicBool,
}

/// Returns the controller to idle however the turn ends.
struct ThinkingGuard<'a>(&'a AtomicBool);

impl Drop for ThinkingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl AiController<HeuristicAgent> {
    /// A heuristic opponent whose delay comes from `difficulty`.
    pub fn heuristic(difficulty: Difficulty, color: Color, seed: Option<u64>) -> Self {
        let agent = match seed {
            Some(seed) => HeuristicAgent::seeded(difficulty, seed),
            None => HeuristicAgent::new(difficulty),
        };
        Self::new(agent, color, difficulty.reaction_delay)
    }
}

impl<A: Agent> AiController<A> {
    pub fn new(agent: A, color: Color, reaction_delay: Duration) -> Self {
        Self {
            agent: Mutex::new(agent),
            color,
            reaction_delay,
            thinking: AtomicBool::new(false),
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn reaction_delay(&self) -> Duration {
        self.reaction_delay
    }

    pub fn phase(&self) -> AiPhase {
        if self.thinking.load(Ordering::Acquire) {
            AiPhase::Thinking
        } else {
            AiPhase::Idle
        }
    }

    /// Plays at most one move. Returns `None` when the agent passes, when a
    /// turn is already in flight, or when the result went stale.
    pub async fn take_turn(&self, session: &Session) -> Option<MoveRecord> {
        if self
            .thinking
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(color = %self.color, "already thinking, ignoring request");
            return None;
        }
        let _guard = ThinkingGuard(&self.thinking);

        // Subscribe before the snapshot so a reset in between is not missed.
        let mut resets = session.watch_epoch();
        let (mv, epoch) = {
            let (state, epoch) = session.snapshot();
            if !state.is_in_progress() {
                return None;
            }
            let mv = self.agent.lock().best_move(&state, self.color)?;
            (mv, epoch)
        };
        if *resets.borrow_and_update() != epoch {
            return None;
        }

        tokio::select! {
            _ = tokio::time::sleep(self.reaction_delay) => {}
            _ = resets.changed() => {
                debug!(color = %self.color, %mv, "session reset while thinking");
                return None;
            }
        }

        match session.submit_at_epoch(epoch, mv) {
            Ok(record) => {
                info!(color = %self.color, notation = %record.notation, "ai moved");
                Some(record)
            }
            Err(err) => {
                debug!(color = %self.color, %mv, %err, "discarding ai move");
                None
            }
        }
    }

    /// Keeps taking turns every `poll` until the task is dropped.
    pub async fn play(&self, session: &Session, poll: Duration) {
        let mut interval = tokio::time::interval(poll);
        loop {
            interval.tick().await;
            self.take_turn(session).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RandomAgent;
    use cooldown_core::{
        Board, EnergyPool, GameState, MoveRequest, Piece, PieceType, SessionEvent, Square,
    };
    use std::sync::Arc;

    fn controller() -> Arc<AiController<HeuristicAgent>> {
        Arc::new(AiController::new(
            HeuristicAgent::seeded(Difficulty::default(), 11),
            Color::Black,
            Duration::from_millis(500),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_applied_after_delay() {
        let session = Session::new(GameState::default());
        let ai = controller();

        let start = tokio::time::Instant::now();
        let record = ai.take_turn(&session).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(500));
        assert_eq!(record.color, Color::Black);
        session.with_state(|s| assert_eq!(s.history().len(), 1));
        assert_eq!(ai.phase(), AiPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_request_while_thinking_is_ignored() {
        let session = Arc::new(Session::new(GameState::default()));
        let ai = controller();

        let turn = tokio::spawn({
            let ai = ai.clone();
            let session = session.clone();
            async move { ai.take_turn(&session).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(ai.phase(), AiPhase::Thinking);
        assert!(ai.take_turn(&session).await.is_none());

        assert!(turn.await.unwrap().is_some());
        session.with_state(|s| assert_eq!(s.history().len(), 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_discards_pending_move() {
        let session = Arc::new(Session::new(GameState::default()));
        let ai = controller();

        let turn = tokio::spawn({
            let ai = ai.clone();
            let session = session.clone();
            async move { ai.take_turn(&session).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        session.reset();

        assert!(turn.await.unwrap().is_none());
        assert_eq!(ai.phase(), AiPhase::Idle);
        session.with_state(|s| {
            assert!(s.history().is_empty());
            assert_eq!(s.energy(Color::Black).current(), 6.0);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_game_over_while_thinking_is_not_reported() {
        // White can only afford pawn moves; Black's rook takes the king
        // while White is still waiting out its reaction delay.
        let mut board = Board::empty();
        let place = |board: &mut Board, name: &str, piece_type, color| {
            board.set_piece(Square::parse(name).unwrap(), Some(Piece::new(piece_type, color)));
        };
        place(&mut board, "e1", PieceType::King, Color::White);
        place(&mut board, "h2", PieceType::Pawn, Color::White);
        place(&mut board, "e2", PieceType::Rook, Color::Black);
        let session = Arc::new(Session::new(GameState::with_board(board, Default::default())));
        let mut events = session.subscribe();
        let ai = Arc::new(AiController::new(
            RandomAgent::seeded(2),
            Color::White,
            Duration::from_millis(500),
        ));

        let turn = tokio::spawn({
            let ai = ai.clone();
            let session = session.clone();
            async move { ai.take_turn(&session).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        let capture = MoveRequest {
            from_row: 6,
            from_col: 4,
            to_row: 7,
            to_col: 4,
        };
        assert_eq!(session.submit(capture).unwrap().winner, Some(Color::Black));

        assert!(turn.await.unwrap().is_none());
        let mut seen = Vec::new();
        while let Ok(event) = events.try_recv() {
            seen.push(event);
        }
        assert_eq!(seen.len(), 2);
        assert!(matches!(seen[0], SessionEvent::MoveApplied { .. }));
        assert_eq!(seen[1], SessionEvent::GameOver { winner: Color::Black });
        session.with_state(|s| assert_eq!(s.history().len(), 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pass_returns_to_idle() {
        let mut state = GameState::default();
        state.set_energy(Color::Black, EnergyPool::new(0.0, 25.0));
        let session = Session::new(state);
        let ai = AiController::new(RandomAgent::seeded(1), Color::Black, Duration::ZERO);

        assert!(ai.take_turn(&session).await.is_none());
        assert_eq!(ai.phase(), AiPhase::Idle);
    }
}
