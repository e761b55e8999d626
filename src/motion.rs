//! Movement shared by the player and the pursuer: a displacement is only
//! applied when the cell it lands in is inside the grid and not a wall.

use std::f32::consts::{FRAC_PI_2, PI};

use crate::grid::{CellKind, Grid, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit cell step. Up walks toward lower `z`.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn displacement(self, speed: f32) -> (f32, f32) {
        let (dx, dz) = self.delta();
        (dx as f32 * speed, dz as f32 * speed)
    }

    /// Camera yaw for a first-person view looking along this direction.
    pub fn yaw(self) -> f32 {
        match self {
            Direction::Up => PI,
            Direction::Down => 0.0,
            Direction::Left => FRAC_PI_2,
            Direction::Right => -FRAC_PI_2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub x: f32,
    pub z: f32,
}

impl Position {
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    pub fn distance(self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        (dx * dx + dz * dz).sqrt()
    }

    pub fn cell(self, grid: &Grid) -> Option<Pos> {
        grid.discretize(self.x, self.z)
    }
}

impl From<Pos> for Position {
    fn from(pos: Pos) -> Self {
        let (x, z) = pos.center();
        Position::new(x, z)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentKind {
    Player,
    Pursuer,
}

#[derive(Clone, Debug)]
pub struct Agent {
    kind: AgentKind,
    position: Position,
    speed: f32,
    facing: Option<Direction>,
}

impl Agent {
    pub fn new(kind: AgentKind, position: Position, speed: f32) -> Self {
        Self {
            kind,
            position,
            speed,
            facing: None,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn facing(&self) -> Option<Direction> {
        self.facing
    }

    pub(crate) fn face(&mut self, dir: Direction) {
        if self.kind == AgentKind::Player {
            self.facing = Some(dir);
        }
    }

    /// Discretized cell kind under the agent.
    pub fn cell_kind(&self, grid: &Grid) -> CellKind {
        grid.classify(self.position.x, self.position.z)
    }
}

/// Attempts to displace `agent` by (`dx`, `dz`). On success the agent is moved
/// and the kind of the cell it entered is returned; otherwise the agent is
/// left untouched.
pub fn try_move(agent: &mut Agent, dx: f32, dz: f32, grid: &Grid) -> Option<CellKind> {
    let nx = agent.position.x + dx;
    let nz = agent.position.z + dz;
    let kind = grid.classify(nx, nz);
    if !kind.is_passable() {
        return None;
    }
    agent.position = Position::new(nx, nz);
    Some(kind)
}

/// One step of `agent.speed()` along `dir`.
pub fn step(agent: &mut Agent, dir: Direction, grid: &Grid) -> Option<CellKind> {
    let (dx, dz) = dir.displacement(agent.speed);
    agent.face(dir);
    try_move(agent, dx, dz, grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor_grid() -> Grid {
        // Row z = 1: Open Open Corridor Goal, everything else wall.
        let mut grid = Grid::filled(4, CellKind::Wall);
        grid.set(Pos::new(0, 1), CellKind::Open);
        grid.set(Pos::new(1, 1), CellKind::Open);
        grid.set(Pos::new(2, 1), CellKind::Corridor);
        grid.set(Pos::new(3, 1), CellKind::Goal);
        grid
    }

    #[test]
    fn move_into_open_cell_is_applied() {
        let grid = corridor_grid();
        let mut agent = Agent::new(AgentKind::Player, Position::new(0.5, 1.5), 0.1);
        assert_eq!(try_move(&mut agent, 0.6, 0.0, &grid), Some(CellKind::Open));
        assert!((agent.position().x - 1.1).abs() < 1e-5);
        assert!((agent.position().z - 1.5).abs() < 1e-6);
    }

    #[test]
    fn move_into_wall_is_rejected() {
        let grid = corridor_grid();
        let start = Position::new(1.5, 1.5);
        let mut agent = Agent::new(AgentKind::Pursuer, start, 0.08);
        assert_eq!(try_move(&mut agent, 0.0, -0.6, &grid), None);
        assert_eq!(agent.position(), start);
    }

    #[test]
    fn move_off_grid_is_rejected() {
        let grid = corridor_grid();
        let start = Position::new(0.05, 1.5);
        let mut agent = Agent::new(AgentKind::Player, start, 0.1);
        assert_eq!(step(&mut agent, Direction::Left, &grid), None);
        assert_eq!(agent.position(), start);

        let mut edge = Agent::new(AgentKind::Player, Position::new(3.95, 1.5), 0.1);
        assert_eq!(step(&mut edge, Direction::Right, &grid), None);
    }

    #[test]
    fn entered_kind_is_reported() {
        let grid = corridor_grid();
        let mut agent = Agent::new(AgentKind::Player, Position::new(1.95, 1.5), 0.1);
        assert_eq!(step(&mut agent, Direction::Right, &grid), Some(CellKind::Corridor));
        let mut agent = Agent::new(AgentKind::Player, Position::new(2.95, 1.5), 0.1);
        assert_eq!(step(&mut agent, Direction::Right, &grid), Some(CellKind::Goal));
    }

    #[test]
    fn successful_moves_never_land_on_walls() {
        let grid = corridor_grid();
        let mut agent = Agent::new(AgentKind::Player, Position::new(0.5, 1.5), 0.1);
        for i in 0..400 {
            let dir = Direction::ALL[(i * 7 + i / 3) % 4];
            if step(&mut agent, dir, &grid).is_some() {
                assert_ne!(agent.cell_kind(&grid), CellKind::Wall);
            }
        }
        assert_ne!(agent.cell_kind(&grid), CellKind::Wall);
    }

    #[test]
    fn facing_follows_player_input_only() {
        let grid = corridor_grid();
        let mut player = Agent::new(AgentKind::Player, Position::new(1.5, 1.5), 0.1);
        step(&mut player, Direction::Up, &grid);
        assert_eq!(player.facing(), Some(Direction::Up));
        assert_eq!(Direction::Up.yaw(), PI);

        let mut pursuer = Agent::new(AgentKind::Pursuer, Position::new(1.5, 1.5), 0.08);
        step(&mut pursuer, Direction::Left, &grid);
        assert_eq!(pursuer.facing(), None);
    }

    #[test]
    fn up_walks_toward_lower_z() {
        assert_eq!(Direction::Up.displacement(0.5), (0.0, -0.5));
        assert_eq!(Direction::Right.displacement(0.5), (0.5, 0.0));
    }
}
