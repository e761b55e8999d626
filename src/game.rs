use tracing::{debug, info};

use crate::config::GameConfig;
use crate::error::MazeError;
use crate::leaderboard::Leaderboard;
use crate::session::{Session, TerminalState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionHandle {
    pub id: u64,
    pub seed: u64,
}

/// Owns the current session and the leaderboard that outlives it.
pub struct Game {
    config: GameConfig,
    leaderboard: Leaderboard,
    session: Option<Session>,
    handle: Option<SessionHandle>,
    next_id: u64,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            leaderboard: Leaderboard::seeded(),
            session: None,
            handle: None,
            next_id: 1,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    pub fn handle(&self) -> Option<SessionHandle> {
        self.handle
    }

    /// Tears down any running session and starts a new one. Without an
    /// explicit seed the configured seed is used, else a random one.
    pub fn start_session(&mut self, seed: Option<u64>) -> Result<SessionHandle, MazeError> {
        self.end_session();
        let seed = seed
            .or(self.config.seed)
            .unwrap_or_else(rand::random::<u64>);
        let session = Session::new(&self.config, seed)?;
        let handle = SessionHandle {
            id: self.next_id,
            seed,
        };
        self.next_id += 1;
        self.session = Some(session);
        self.handle = Some(handle);
        Ok(handle)
    }

    /// Discards the current grid, agents and score and starts over.
    pub fn restart_session(&mut self) -> Result<SessionHandle, MazeError> {
        self.start_session(None)
    }

    /// Leaves the current session, if any.
    pub fn end_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.teardown();
        }
        self.handle = None;
    }

    /// Records the finished session's score under `name`. Does nothing while
    /// the session is still playing or when the name is blank.
    pub fn submit_score(&mut self, name: &str) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        if session.terminal() == TerminalState::Playing {
            debug!("score submission ignored while playing");
            return false;
        }
        let score = session.score();
        let accepted = self.leaderboard.submit(name, score);
        if accepted {
            info!(name = name.trim(), score, "score submitted");
        }
        accepted
    }
}
