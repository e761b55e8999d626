//! Procedural maze: an open office in one corner, a randomized depth-first
//! carve across the rest of the grid, and a short exit corridor ending in the
//! goal near the far corner.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::error::MazeError;
use crate::grid::{CellKind, Grid, Pos, GRID_SIZE};
use crate::motion::Direction;

/// Office spans `[OFFICE_MIN, OFFICE_END)` on both axes.
pub const OFFICE_MIN: usize = 1;
pub const OFFICE_END: usize = 6;
pub const CARVE_SEED: Pos = Pos::new(6, 6);
const CARVE_STEP: isize = 2;
const CORRIDOR_LEN: usize = 4;

pub fn in_office(pos: Pos) -> bool {
    (OFFICE_MIN..OFFICE_END).contains(&pos.x) && (OFFICE_MIN..OFFICE_END).contains(&pos.z)
}

/// Goal cell for a grid of `size`: the innermost cell of the exit corridor.
pub fn goal_cell(size: usize) -> Pos {
    Pos::new(size - 2, size - 2)
}

/// Cells stamped as exit corridor, goal last.
pub fn corridor_cells(size: usize) -> impl Iterator<Item = Pos> {
    (size - 1 - CORRIDOR_LEN..size - 1).map(move |x| Pos::new(x, size - 2))
}

struct Frame {
    cell: Pos,
    dirs: [Direction; 4],
    next: usize,
}

impl Frame {
    fn new(cell: Pos, rng: &mut impl Rng) -> Self {
        let mut dirs = Direction::ALL;
        dirs.shuffle(rng);
        Self { cell, dirs, next: 0 }
    }
}

/// Office plus depth-first carve, before the exit corridor is stamped.
pub fn carve(rng: &mut impl Rng, size: usize) -> Grid {
    let mut grid = Grid::filled(size, CellKind::Wall);
    for z in OFFICE_MIN..OFFICE_END.min(size) {
        for x in OFFICE_MIN..OFFICE_END.min(size) {
            grid.set(Pos::new(x, z), CellKind::Open);
        }
    }

    grid.set(CARVE_SEED, CellKind::Open);
    let mut stack = vec![Frame::new(CARVE_SEED, rng)];
    while let Some(frame) = stack.last_mut() {
        if frame.next == frame.dirs.len() {
            stack.pop();
            continue;
        }
        let dir = frame.dirs[frame.next];
        frame.next += 1;
        let cell = frame.cell;

        let (dx, dz) = dir.delta();
        let tx = cell.x as isize + dx * CARVE_STEP;
        let tz = cell.z as isize + dz * CARVE_STEP;
        if tx < 0 || tz < 0 || tx >= size as isize || tz >= size as isize {
            continue;
        }
        let target = Pos::new(tx as usize, tz as usize);
        if grid.cell(target) != CellKind::Wall {
            continue;
        }
        let between = Pos::new(
            (cell.x as isize + dx) as usize,
            (cell.z as isize + dz) as usize,
        );
        grid.set(between, CellKind::Open);
        grid.set(target, CellKind::Open);
        stack.push(Frame::new(target, rng));
    }
    grid
}

/// Overwrites the exit corridor and goal regardless of what was carved there.
fn stamp_exit(grid: &mut Grid) {
    let size = grid.size();
    for pos in corridor_cells(size) {
        grid.set(pos, CellKind::Corridor);
    }
    grid.set(goal_cell(size), CellKind::Goal);
}

/// Full generation for the standard grid size. Fails if the goal cannot be
/// reached from the office.
pub fn generate(rng: &mut impl Rng, seed: u64) -> Result<Grid, MazeError> {
    generate_sized(rng, seed, GRID_SIZE)
}

pub fn generate_sized(rng: &mut impl Rng, seed: u64, size: usize) -> Result<Grid, MazeError> {
    let mut grid = carve(rng, size);
    stamp_exit(&mut grid);

    let goal = goal_cell(size);
    let office = Pos::new(OFFICE_MIN, OFFICE_MIN);
    if !grid.is_reachable(office, goal) {
        warn!(seed, "generated maze has no route to the goal");
        return Err(MazeError::GoalUnreachable {
            seed,
            goal_x: goal.x,
            goal_z: goal.z,
        });
    }
    debug!(
        seed,
        open = grid.cells_of(CellKind::Open).count(),
        "maze generated"
    );
    Ok(grid)
}
