//! Simulation core of a maze-escape game: a player crosses a generated maze
//! from the office to the exit while a pursuer decides when to give chase.
//! Rendering lives outside this crate's library; it reads [`Snapshot`]s.

pub mod config;
pub mod error;
pub mod game;
pub mod grid;
pub mod leaderboard;
pub mod maze;
pub mod motion;
pub mod pursuit;
pub mod schedule;
pub mod session;

pub use config::GameConfig;
pub use error::MazeError;
pub use game::{Game, SessionHandle};
pub use grid::{CellKind, Grid, Pos, GRID_SIZE};
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use motion::{try_move, Agent, AgentKind, Direction, Position};
pub use pursuit::{Pursuit, PursuitOutcome, PursuitState};
pub use schedule::{Scheduler, Task};
pub use session::{Session, Snapshot, TerminalState};
