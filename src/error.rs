use thiserror::Error;

/// Failures while building a session. These are construction-time defects and
/// are never retried.
#[derive(Debug, Error, PartialEq)]
pub enum MazeError {
    #[error("goal cell ({goal_x}, {goal_z}) is not reachable from the office (seed {seed})")]
    GoalUnreachable { seed: u64, goal_x: usize, goal_z: usize },
    #[error("no open cell available to spawn the pursuer (seed {seed})")]
    NoPursuerSpawn { seed: u64 },
    #[error("spawn point ({x}, {z}) is not walkable")]
    BlockedSpawn { x: f32, z: f32 },
}
