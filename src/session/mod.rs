//! Session lifecycle around the simulation core
//!
//! A [`GameSession`] owns the engine and the current [`GameState`], gates
//! ticks on the coarse lifecycle (not started / running / paused / ended),
//! and keeps the score records, persisting the high score when it is beaten.

pub mod store;

pub use store::HighScoreStore;

use anyhow::Result;
use std::time::Duration;
use tracing::{debug, warn};

use crate::game::{Direction, GameConfig, GameEngine, GameState, TickOutcome};

/// Coarse lifecycle of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    Running,
    Paused,
    Ended,
}

/// Drives the engine through its lifecycle and keeps score bookkeeping
pub struct GameSession {
    engine: GameEngine,
    state: GameState,
    phase: SessionPhase,
    high_score: u32,
    games_played: u32,
    store: HighScoreStore,
}

impl GameSession {
    /// Create a session, reading the persisted high score
    ///
    /// An unreadable high-score file logs a warning and counts as 0 rather
    /// than keeping the game from starting.
    pub fn new(config: GameConfig, store: HighScoreStore) -> Self {
        let high_score = store.load().unwrap_or_else(|err| {
            warn!("failed to load high score: {err:#}");
            0
        });

        let mut engine = GameEngine::new(config);
        let state = engine.reset();

        Self {
            engine,
            state,
            phase: SessionPhase::NotStarted,
            high_score,
            games_played: 0,
            store,
        }
    }

    /// Begin a fresh game; valid from NotStarted or Ended, ignored otherwise
    pub fn start(&mut self) {
        if matches!(self.phase, SessionPhase::NotStarted | SessionPhase::Ended) {
            self.state = self.engine.reset();
            self.phase = SessionPhase::Running;
            debug!(high_score = self.high_score, "session started");
        }
    }

    /// Suspend ticking; valid only while running
    pub fn pause(&mut self) {
        if self.phase == SessionPhase::Running {
            self.phase = SessionPhase::Paused;
            debug!("session paused");
        }
    }

    /// Continue a paused game without touching the simulation state
    pub fn resume(&mut self) {
        if self.phase == SessionPhase::Paused {
            self.phase = SessionPhase::Running;
            debug!("session resumed");
        }
    }

    /// Advance the simulation one tick; `Ok(None)` unless running
    ///
    /// A terminal outcome moves the session to Ended and persists the high
    /// score when the finished game beat it.
    pub fn tick(&mut self) -> Result<Option<TickOutcome>> {
        if self.phase != SessionPhase::Running {
            return Ok(None);
        }

        let outcome = self.engine.tick(&mut self.state);
        match outcome {
            TickOutcome::Moved => {}
            TickOutcome::AteFood => {
                debug!(
                    score = self.state.score,
                    tick_ms = self.state.tick_ms,
                    "food eaten"
                );
            }
            TickOutcome::GameOver(reason) => {
                debug!(?reason, score = self.state.score, "game over");
                self.finish()?;
            }
        }

        Ok(Some(outcome))
    }

    fn finish(&mut self) -> Result<()> {
        self.phase = SessionPhase::Ended;
        self.games_played += 1;

        if self.state.score > self.high_score {
            self.high_score = self.state.score;
            self.store.save(self.high_score)?;
        }

        Ok(())
    }

    /// Queue a turn for the next tick
    ///
    /// Accepted while running or paused (turns queued during a pause apply
    /// after resume); ignored before the first start and after the end.
    pub fn enqueue_direction(&mut self, direction: Direction) {
        if matches!(self.phase, SessionPhase::Running | SessionPhase::Paused) {
            self.engine.enqueue_direction(&mut self.state, direction);
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    /// Current tick cadence, for arming the timer
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.state.tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameOverReason, Position, Snake};
    use tempfile::TempDir;

    fn test_session(dir: &TempDir) -> GameSession {
        let store = HighScoreStore::new(dir.path().join("high_score.json"));
        GameSession::new(GameConfig::small(), store)
    }

    /// Point the snake at the left wall so the next tick ends the game
    fn doom_snake(session: &mut GameSession) {
        session.state.snake = Snake::new(Position::new(0, 5), Direction::Left, 3);
        session.state.food = Position::new(9, 9);
    }

    #[test]
    fn test_new_session_not_started() {
        let dir = TempDir::new().unwrap();
        let session = test_session(&dir);

        assert_eq!(session.phase(), SessionPhase::NotStarted);
        assert_eq!(session.high_score(), 0);
        assert_eq!(session.games_played(), 0);
    }

    #[test]
    fn test_tick_before_start_is_noop() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(&dir);

        assert_eq!(session.tick().unwrap(), None);
        assert_eq!(session.state().steps, 0);
    }

    #[test]
    fn test_start_runs_and_ticks() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(&dir);

        session.start();
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.score(), 0);

        let outcome = session.tick().unwrap();
        assert!(outcome.is_some());
        assert_eq!(session.state().steps, 1);
    }

    #[test]
    fn test_pause_suspends_ticks() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(&dir);

        // Pausing before the game starts does nothing
        session.pause();
        assert_eq!(session.phase(), SessionPhase::NotStarted);

        session.start();
        session.pause();
        assert_eq!(session.phase(), SessionPhase::Paused);
        assert_eq!(session.tick().unwrap(), None);
        assert_eq!(session.state().steps, 0);

        session.resume();
        assert_eq!(session.phase(), SessionPhase::Running);
        session.tick().unwrap();
        assert_eq!(session.state().steps, 1);
    }

    #[test]
    fn test_game_over_ends_session_and_persists_high_score() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(&dir);

        session.start();
        doom_snake(&mut session);
        session.state.score = 5;

        let outcome = session.tick().unwrap();
        assert_eq!(
            outcome,
            Some(TickOutcome::GameOver(GameOverReason::WallCollision))
        );
        assert_eq!(session.phase(), SessionPhase::Ended);
        assert_eq!(session.high_score(), 5);
        assert_eq!(session.games_played(), 1);

        // The new high score is on disk
        let store = HighScoreStore::new(dir.path().join("high_score.json"));
        assert_eq!(store.load().unwrap(), 5);

        // Further ticks do nothing
        assert_eq!(session.tick().unwrap(), None);
    }

    #[test]
    fn test_lower_score_keeps_high_score() {
        let dir = TempDir::new().unwrap();
        let store = HighScoreStore::new(dir.path().join("high_score.json"));
        store.save(10).unwrap();

        let mut session = GameSession::new(GameConfig::small(), store);
        assert_eq!(session.high_score(), 10);

        session.start();
        doom_snake(&mut session);
        session.state.score = 3;
        session.tick().unwrap();

        assert_eq!(session.high_score(), 10);
        let store = HighScoreStore::new(dir.path().join("high_score.json"));
        assert_eq!(store.load().unwrap(), 10);
    }

    #[test]
    fn test_restart_after_game_over() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(&dir);

        session.start();
        doom_snake(&mut session);
        session.state.score = 5;
        session.tick().unwrap();
        assert_eq!(session.phase(), SessionPhase::Ended);

        session.start();
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.score(), 0);
        assert!(session.state().is_live());
        assert_eq!(session.high_score(), 5);
    }

    #[test]
    fn test_enqueue_gating() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(&dir);

        // Before start: dropped
        session.enqueue_direction(Direction::Up);
        assert!(session.state().queued_turns.is_empty());

        session.start();
        session.enqueue_direction(Direction::Up);
        assert_eq!(session.state().queued_turns.len(), 1);

        // While paused: kept for after the resume
        session.pause();
        session.enqueue_direction(Direction::Left);
        assert_eq!(session.state().queued_turns.len(), 2);
    }

    #[test]
    fn test_tick_interval_tracks_state() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(&dir);

        assert_eq!(session.tick_interval(), Duration::from_millis(200));
        session.state.tick_ms = 120;
        assert_eq!(session.tick_interval(), Duration::from_millis(120));
    }
}
