use std::collections::VecDeque;

pub const GRID_SIZE: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    Wall,
    Open,
    Corridor,
    Goal,
}

impl CellKind {
    pub fn is_passable(self) -> bool {
        self != CellKind::Wall
    }
}

/// Integer cell coordinate. `x` is the column, `z` the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub z: usize,
}

impl Pos {
    pub const fn new(x: usize, z: usize) -> Self {
        Self { x, z }
    }

    /// Continuous coordinate of the cell center.
    pub fn center(self) -> (f32, f32) {
        (self.x as f32 + 0.5, self.z as f32 + 0.5)
    }

    /// The four axis neighbors that lie inside a `size`×`size` grid.
    pub fn neighbors(self, size: usize) -> impl Iterator<Item = Pos> {
        [(0isize, -1isize), (0, 1), (-1, 0), (1, 0)]
            .into_iter()
            .filter_map(move |(dx, dz)| {
                let nx = self.x as isize + dx;
                let nz = self.z as isize + dz;
                if nx < 0 || nz < 0 || nx >= size as isize || nz >= size as isize {
                    None
                } else {
                    Some(Pos::new(nx as usize, nz as usize))
                }
            })
    }
}

/// Square cell grid. Only the maze generator can change cells; everything else
/// sees it read-only.
#[derive(Clone, Debug)]
pub struct Grid {
    size: usize,
    cells: Vec<CellKind>,
}

impl Grid {
    pub(crate) fn filled(size: usize, kind: CellKind) -> Self {
        Self {
            size,
            cells: vec![kind; size * size],
        }
    }

    pub(crate) fn set(&mut self, pos: Pos, kind: CellKind) {
        if let Some(idx) = self.idx(pos.x, pos.z) {
            self.cells[idx] = kind;
        }
    }

    fn idx(&self, x: usize, z: usize) -> Option<usize> {
        if x < self.size && z < self.size {
            Some(z * self.size + x)
        } else {
            None
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Kind of the cell at integer indices; out-of-range indices are `Wall`.
    pub fn cell(&self, pos: Pos) -> CellKind {
        self.idx(pos.x, pos.z)
            .map_or(CellKind::Wall, |idx| self.cells[idx])
    }

    /// Discretize a continuous coordinate. `None` when it falls outside the grid.
    pub fn discretize(&self, x: f32, z: f32) -> Option<Pos> {
        if !x.is_finite() || !z.is_finite() {
            return None;
        }
        let fx = x.floor();
        let fz = z.floor();
        if fx < 0.0 || fz < 0.0 || fx >= self.size as f32 || fz >= self.size as f32 {
            return None;
        }
        Some(Pos::new(fx as usize, fz as usize))
    }

    /// Total classification of a continuous coordinate: anything outside
    /// `[0, size)` on either axis reads as `Wall`.
    pub fn classify(&self, x: f32, z: f32) -> CellKind {
        self.discretize(x, z)
            .map_or(CellKind::Wall, |pos| self.cell(pos))
    }

    pub fn cells_of(&self, kind: CellKind) -> impl Iterator<Item = Pos> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, cell)| **cell == kind)
            .map(|(idx, _)| Pos::new(idx % self.size, idx / self.size))
    }

    pub fn goal(&self) -> Option<Pos> {
        self.cells_of(CellKind::Goal).next()
    }

    /// Breadth-first flood over passable cells. The result is indexed `[z][x]`.
    pub fn reachable_from(&self, start: Pos) -> Vec<Vec<bool>> {
        let mut seen = vec![vec![false; self.size]; self.size];
        if !self.cell(start).is_passable() {
            return seen;
        }
        let mut q = VecDeque::new();
        seen[start.z][start.x] = true;
        q.push_back(start);
        while let Some(pos) = q.pop_front() {
            for next in pos.neighbors(self.size) {
                if seen[next.z][next.x] || !self.cell(next).is_passable() {
                    continue;
                }
                seen[next.z][next.x] = true;
                q.push_back(next);
            }
        }
        seen
    }

    /// Breadth-first step distances over passable cells, `None` where unreachable.
    pub fn distances_from(&self, start: Pos) -> Vec<Vec<Option<u32>>> {
        let mut dist = vec![vec![None; self.size]; self.size];
        if !self.cell(start).is_passable() {
            return dist;
        }
        let mut q = VecDeque::new();
        dist[start.z][start.x] = Some(0);
        q.push_back(start);
        while let Some(pos) = q.pop_front() {
            let base = dist[pos.z][pos.x].unwrap_or(0);
            for next in pos.neighbors(self.size) {
                if dist[next.z][next.x].is_some() || !self.cell(next).is_passable() {
                    continue;
                }
                dist[next.z][next.x] = Some(base + 1);
                q.push_back(next);
            }
        }
        dist
    }

    pub fn is_reachable(&self, from: Pos, to: Pos) -> bool {
        self.idx(to.x, to.z).is_some() && self.reachable_from(from)[to.z][to.x]
    }
}
