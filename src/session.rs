//! One play-through: the grid, both agents, score and the terminal flag, driven
//! by the update and score tasks until the player escapes or is caught.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::error::MazeError;
use crate::grid::{CellKind, Grid, Pos};
use crate::maze::{self, in_office};
use crate::motion::{self, Agent, AgentKind, Direction, Position};
use crate::pursuit::{ChaseReason, Pursuit, PursuitOutcome, PursuitState};
use crate::schedule::{Scheduler, Task};

pub const PLAYER_SPAWN: Position = Position::new(1.5, 1.5);
const PURSUER_MIN_PLAYER_DISTANCE: f32 = 12.0;
const PURSUER_MIN_GOAL_DISTANCE: f32 = 6.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminalState {
    Playing,
    Won,
    Lost,
}

impl TerminalState {
    pub fn is_over(self) -> bool {
        self != TerminalState::Playing
    }
}

/// Read-only view handed to the presentation layer once per frame.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    grid: &'a Grid,
    pub player: Position,
    pub facing: Option<Direction>,
    pub pursuer: Position,
    pub pursuit: PursuitState,
    pub score: u32,
    pub terminal: TerminalState,
}

impl<'a> Snapshot<'a> {
    pub fn classify(&self, x: f32, z: f32) -> CellKind {
        self.grid.classify(x, z)
    }

    pub fn grid(&self) -> &'a Grid {
        self.grid
    }
}

pub struct Session {
    seed: u64,
    grid: Grid,
    player: Agent,
    pursuer: Agent,
    pursuit: Pursuit,
    score: u32,
    score_per_interval: u32,
    terminal: TerminalState,
    pending: Option<Direction>,
    input_attached: bool,
    torn_down: bool,
    scheduler: Scheduler,
    rng: StdRng,
    ticks: u64,
}

impl Session {
    /// Generates a maze from `seed` and places both agents on it.
    pub fn new(config: &GameConfig, seed: u64) -> Result<Self, MazeError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let grid = maze::generate(&mut rng, seed)?;
        let spawn = pursuer_spawn(&grid, PLAYER_SPAWN, &mut rng)
            .ok_or(MazeError::NoPursuerSpawn { seed })?;
        let session = Self::assemble(config, seed, grid, PLAYER_SPAWN, spawn.into(), rng);
        info!(
            seed,
            pursuer_x = spawn.x,
            pursuer_z = spawn.z,
            "session started"
        );
        Ok(session)
    }

    /// Builds a session on an existing grid with explicit spawn points.
    pub fn from_parts(
        config: &GameConfig,
        seed: u64,
        grid: Grid,
        player: Position,
        pursuer: Position,
    ) -> Result<Self, MazeError> {
        for spawn in [player, pursuer] {
            if !grid.classify(spawn.x, spawn.z).is_passable() {
                return Err(MazeError::BlockedSpawn {
                    x: spawn.x,
                    z: spawn.z,
                });
            }
        }
        let rng = StdRng::seed_from_u64(seed);
        Ok(Self::assemble(config, seed, grid, player, pursuer, rng))
    }

    fn assemble(
        config: &GameConfig,
        seed: u64,
        grid: Grid,
        player: Position,
        pursuer: Position,
        rng: StdRng,
    ) -> Self {
        Self {
            seed,
            grid,
            player: Agent::new(AgentKind::Player, player, config.player_speed),
            pursuer: Agent::new(AgentKind::Pursuer, pursuer, config.pursuer_speed),
            pursuit: Pursuit::new(config.chase_trigger_chance, config.capture_radius),
            score: 0,
            score_per_interval: config.score_per_interval,
            terminal: TerminalState::Playing,
            pending: None,
            input_attached: true,
            torn_down: false,
            scheduler: Scheduler::new(config.update_interval, config.score_interval),
            rng,
            ticks: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> &Agent {
        &self.player
    }

    pub fn pursuer(&self) -> &Agent {
        &self.pursuer
    }

    pub fn pursuit_state(&self) -> PursuitState {
        self.pursuit.state()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn terminal(&self) -> TerminalState {
        self.terminal
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// True while the session still accepts input and runs its tasks.
    pub fn is_live(&self) -> bool {
        self.terminal == TerminalState::Playing && !self.torn_down
    }

    pub fn is_running(&self, task: Task) -> bool {
        self.scheduler.is_running(task)
    }

    pub fn accepts_input(&self) -> bool {
        self.input_attached
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid: &self.grid,
            player: self.player.position(),
            facing: self.player.facing(),
            pursuer: self.pursuer.position(),
            pursuit: self.pursuit.state(),
            score: self.score,
            terminal: self.terminal,
        }
    }

    /// Buffers a directional command for the next update tick; a later command
    /// replaces an unconsumed one. Ignored once input is detached.
    pub fn push_input(&mut self, dir: Direction) -> bool {
        if !self.input_attached {
            return false;
        }
        self.pending = Some(dir);
        true
    }

    /// Runs every task firing that falls inside `elapsed`.
    pub fn advance(&mut self, elapsed: Duration) -> TerminalState {
        if !self.is_live() {
            return self.terminal;
        }
        for task in self.scheduler.advance(elapsed) {
            if !self.is_live() {
                break;
            }
            match task {
                Task::Update => {
                    self.update_tick();
                }
                Task::Score => self.score_tick(),
            }
        }
        self.terminal
    }

    /// One update tick: pending input, goal and corridor checks, then the
    /// pursuer. A no-op after the session has ended.
    pub fn update_tick(&mut self) -> TerminalState {
        if !self.is_live() {
            return self.terminal;
        }
        self.ticks += 1;

        if let Some(dir) = self.pending.take() {
            match motion::step(&mut self.player, dir, &self.grid) {
                Some(CellKind::Goal) => {
                    self.finish(TerminalState::Won);
                    return self.terminal;
                }
                Some(CellKind::Corridor) => {
                    self.pursuit.latch(ChaseReason::Corridor);
                }
                _ => {}
            }
        }

        let outcome = self.pursuit.step(
            &mut self.pursuer,
            self.player.position(),
            &self.grid,
            &mut self.rng,
        );
        if outcome == PursuitOutcome::Captured {
            self.finish(TerminalState::Lost);
        }
        self.terminal
    }

    /// One score period of live play.
    pub fn score_tick(&mut self) {
        if !self.is_live() {
            return;
        }
        self.score = self.score.saturating_add(self.score_per_interval);
    }

    fn finish(&mut self, outcome: TerminalState) {
        self.terminal = outcome;
        self.release();
        info!(
            seed = self.seed,
            score = self.score,
            ticks = self.ticks,
            ?outcome,
            "session over"
        );
    }

    /// Input first, then the update task, then the score task.
    fn release(&mut self) {
        self.input_attached = false;
        self.pending = None;
        self.scheduler.stop(Task::Update);
        self.scheduler.stop(Task::Score);
    }

    /// Leaves the session. Safe to call repeatedly and whether or not the
    /// session reached a terminal state.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.release();
        debug!(seed = self.seed, terminal = ?self.terminal, "session torn down");
    }
}

/// A random open cell outside the office, far from the player and clear of
/// the exit; falls back to the open cell farthest from the player.
pub fn pursuer_spawn(grid: &Grid, player: Position, rng: &mut impl Rng) -> Option<Pos> {
    let goal = grid.goal().map(Position::from);
    let candidates: Vec<Pos> = grid
        .cells_of(CellKind::Open)
        .filter(|pos| !in_office(*pos))
        .collect();
    let far: Vec<Pos> = candidates
        .iter()
        .copied()
        .filter(|pos| {
            let center = Position::from(*pos);
            center.distance(player) >= PURSUER_MIN_PLAYER_DISTANCE
                && goal.map_or(true, |g| center.distance(g) >= PURSUER_MIN_GOAL_DISTANCE)
        })
        .collect();
    if let Some(pos) = far.choose(rng) {
        return Some(*pos);
    }
    candidates.into_iter().max_by(|a, b| {
        let da = Position::from(*a).distance(player);
        let db = Position::from(*b).distance(player);
        da.total_cmp(&db)
    })
}
