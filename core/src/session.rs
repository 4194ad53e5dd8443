//! The authoritative game session.
//!
//! A session owns the only mutable [`GameState`] for a game. Moves, ticks
//! and resets all take the same lock, so two moves can never both pass the
//! affordability check against one snapshot. Every reset bumps an epoch
//! counter; work that started against an older epoch (such as an AI
//! thinking through its reaction delay) is refused when it comes back.

use crate::error::MoveError;
use crate::game_state::GameState;
use crate::protocol::{MoveRecord, MoveRequest, SessionEvent};
use crate::types::{Color, Millis, Move};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

const EVENT_CAPACITY: usize = 256;

pub struct Session {
    state: Mutex<GameState>,
    epoch: watch::Sender<u64>,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    pub fn new(state: GameState) -> Self {
        let (epoch, _) = watch::channel(0);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Mutex::new(state),
            epoch,
            events,
        }
    }

    /// A copy of the current state together with the epoch it belongs to.
    pub fn snapshot(&self) -> (GameState, u64) {
        let state = self.state.lock();
        (state.clone(), *self.epoch.borrow())
    }

    /// Reads the state without copying it.
    pub fn with_state<R>(&self, f: impl FnOnce(&GameState) -> R) -> R {
        f(&*self.state.lock())
    }

    pub fn epoch(&self) -> u64 {
        *self.epoch.borrow()
    }

    /// Resolves whenever the session is reset.
    pub fn watch_epoch(&self) -> watch::Receiver<u64> {
        self.epoch.subscribe()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Validates and applies a driver's move request.
    pub fn submit(&self, request: MoveRequest) -> Result<MoveRecord, MoveError> {
        let mut state = self.state.lock();
        let result = state.attempt_move(request);
        self.publish(request, &result, &state);
        result
    }

    /// Like [`Session::submit`] for a participant who controls only
    /// `color`. Moving any other piece is reported as not legal.
    pub fn submit_as(&self, color: Color, request: MoveRequest) -> Result<MoveRecord, MoveError> {
        let mut state = self.state.lock();
        let result = request.to_move().and_then(|mv| {
            if state.board.is_color(mv.from, color) {
                state.apply_move(mv)
            } else {
                Err(MoveError::NotLegal {
                    from: mv.from,
                    to: mv.to,
                })
            }
        });
        self.publish(request, &result, &state);
        result
    }

    /// Applies a move planned against `epoch`, such as an AI's. The move is
    /// refused if the session has been reset since. Refusals are only
    /// logged: a plan that went stale is not a driver error.
    pub fn submit_at_epoch(&self, epoch: u64, mv: Move) -> Result<MoveRecord, MoveError> {
        let mut state = self.state.lock();
        if *self.epoch.borrow() != epoch {
            debug!(%mv, epoch, "discarding move from an earlier epoch");
            return Err(MoveError::Stale);
        }
        let result = state.apply_move(mv);
        match &result {
            Ok(_) => self.publish(MoveRequest::from(mv), &result, &state),
            Err(err) => debug!(%mv, %err, "discarding stale move"),
        }
        result
    }

    fn publish(&self, request: MoveRequest, result: &Result<MoveRecord, MoveError>, state: &GameState) {
        // Sending only fails when nobody is listening.
        match result {
            Ok(record) => {
                let _ = self.events.send(SessionEvent::MoveApplied {
                    record: record.clone(),
                    state: state.update(),
                });
                if let Some(winner) = record.winner {
                    let _ = self.events.send(SessionEvent::GameOver { winner });
                }
            }
            Err(err) => {
                let _ = self.events.send(SessionEvent::Rejected {
                    request,
                    reason: err.to_string(),
                });
            }
        }
    }

    pub fn tick(&self, delta: Millis) {
        self.state.lock().tick(delta);
    }

    /// Restores the initial layout and starts a new epoch. Board, pools and
    /// cooldowns change together under one lock.
    pub fn reset(&self) -> u64 {
        let mut state = self.state.lock();
        state.reset();
        self.epoch.send_modify(|epoch| *epoch += 1);
        let epoch = *self.epoch.borrow();
        let update = state.update();
        drop(state);

        info!(epoch, "session reset");
        let _ = self.events.send(SessionEvent::Reset {
            epoch,
            state: update,
        });
        epoch
    }

    /// Drives [`Session::tick`] on the configured cadence until the session
    /// is dropped or the handle is aborted.
    pub fn spawn_ticker(self: &Arc<Self>) -> JoinHandle<()> {
        let period = self.with_state(|s| s.config().tick_interval_ms).max(1);
        let session = Arc::downgrade(self);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(period));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                let Some(session) = session.upgrade() else {
                    break;
                };
                session.tick(period);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Square;

    fn request(from: &str, to: &str) -> MoveRequest {
        MoveRequest::from(Move::new(
            Square::parse(from).unwrap(),
            Square::parse(to).unwrap(),
        ))
    }

    #[test]
    fn test_second_move_cannot_double_spend() {
        let session = Session::new(GameState::default());
        // 6 energy covers one knight move (4) but not two.
        assert!(session.submit(request("g1", "f3")).is_ok());
        assert!(matches!(
            session.submit(request("b1", "c3")),
            Err(MoveError::InsufficientEnergy { required: 4, .. })
        ));
        session.with_state(|s| assert_eq!(s.energy(Color::White).current(), 2.0));
    }

    #[test]
    fn test_submit_as_checks_ownership() {
        let session = Session::new(GameState::default());
        assert!(matches!(
            session.submit_as(Color::Black, request("e2", "e4")),
            Err(MoveError::NotLegal { .. })
        ));
        assert!(session.submit_as(Color::White, request("e2", "e4")).is_ok());
        assert!(session.submit_as(Color::Black, request("e7", "e5")).is_ok());
    }

    #[test]
    fn test_reset_bumps_epoch_and_rejects_stale_moves() {
        let session = Session::new(GameState::default());
        let (_, epoch) = session.snapshot();
        session.submit(request("e2", "e4")).unwrap();

        assert_eq!(session.reset(), epoch + 1);
        let mv = request("d2", "d4").to_move().unwrap();
        assert_eq!(session.submit_at_epoch(epoch, mv), Err(MoveError::Stale));
        assert!(session.submit_at_epoch(epoch + 1, mv).is_ok());
        session.with_state(|s| assert_eq!(s.history().len(), 1));
    }

    #[test]
    fn test_events_are_published() {
        let session = Session::new(GameState::default());
        let mut events = session.subscribe();

        session.submit(request("e2", "e4")).unwrap();
        let _ = session.submit(request("e2", "e4"));
        session.reset();

        match events.try_recv() {
            Ok(SessionEvent::MoveApplied { record, state }) => {
                assert_eq!(record.notation, "e2-e4");
                assert!(state.board.is_color(Square::parse("e4").unwrap(), Color::White));
                assert_eq!(state.energy[Color::White.index()].current(), 4.0);
            }
            other => panic!("expected an applied move, got {other:?}"),
        }
        assert!(matches!(events.try_recv(), Ok(SessionEvent::Rejected { .. })));
        match events.try_recv() {
            Ok(SessionEvent::Reset { epoch, state }) => {
                assert_eq!(epoch, 1);
                assert_eq!(state.board, GameState::default().board);
                assert_eq!(state.clock_ms, 0);
            }
            other => panic!("expected a reset, got {other:?}"),
        }
    }

    #[test]
    fn test_refused_epoch_moves_are_not_broadcast() {
        let session = Session::new(GameState::default());
        let mut events = session.subscribe();
        let epoch = session.epoch();

        let illegal = request("e2", "e5").to_move().unwrap();
        assert!(matches!(
            session.submit_at_epoch(epoch, illegal),
            Err(MoveError::NotLegal { .. })
        ));
        session.reset();
        let late = request("e2", "e4").to_move().unwrap();
        assert_eq!(session.submit_at_epoch(epoch, late), Err(MoveError::Stale));

        assert!(matches!(events.try_recv(), Ok(SessionEvent::Reset { .. })));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_advances_clock() {
        let session = Arc::new(Session::new(GameState::default()));
        let ticker = session.spawn_ticker();

        tokio::time::sleep(Duration::from_millis(1050)).await;
        let clock = session.with_state(|s| s.clock_ms());
        assert_eq!(clock, 1000);
        session.with_state(|s| {
            assert!((s.energy(Color::Black).current() - 6.5).abs() < 1e-9);
        });

        ticker.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_stops_with_session() {
        let session = Arc::new(Session::new(GameState::default()));
        let ticker = session.spawn_ticker();
        drop(session);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(ticker.is_finished());
    }
}
