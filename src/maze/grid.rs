use std::fmt;

use super::cell::Cell;

/// Grid coordinate as `(row, col)`.
pub type Pos = (u16, u16);

/// Cardinal offsets in the order right, down, left, up.
const CARDINALS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
/// Diagonal offsets, appended after the cardinals for 8-neighborhoods.
const DIAGONALS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Row-major 2D array of cells with a fixed size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    data: Box<[Cell]>,
    rows: u16,
    cols: u16,
}

impl Grid {
    pub fn new(rows: u16, cols: u16, cell: Cell) -> Self {
        let data = vec![cell; rows as usize * cols as usize].into_boxed_slice();
        Grid { data, rows, cols }
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn is_in_bounds(&self, pos: Pos) -> bool {
        pos.0 < self.rows && pos.1 < self.cols
    }

    /// Inside the permanent one-cell wall border, i.e. both indices in `[1, dim - 2]`.
    pub fn is_interior(&self, pos: Pos) -> bool {
        pos.0 >= 1 && pos.1 >= 1 && pos.0 + 1 < self.rows && pos.1 + 1 < self.cols
    }

    pub fn is_boundary(&self, pos: Pos) -> bool {
        self.is_in_bounds(pos) && !self.is_interior(pos)
    }

    fn ravel_index(&self, pos: Pos) -> usize {
        // Overflow-safe since rows and cols are u16 (assuming usize is at least 32 bits)
        pos.0 as usize * self.cols as usize + pos.1 as usize
    }

    /// Cell at `pos`. Out-of-bounds reads are walls, so stale coordinates stay safe to query.
    pub fn get(&self, pos: Pos) -> Cell {
        if self.is_in_bounds(pos) {
            self.data[self.ravel_index(pos)]
        } else {
            Cell::Wall
        }
    }

    /// Set the cell at `pos`, returning whether it changed. Out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: Pos, cell: Cell) -> bool {
        if !self.is_in_bounds(pos) {
            return false;
        }
        let idx = self.ravel_index(pos);
        let old = self.data[idx];
        self.data[idx] = cell;
        old != cell
    }

    pub fn fill(&mut self, cell: Cell) {
        self.data.fill(cell);
    }

    /// Iterate over every cell together with its coordinate, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (Pos, Cell)> + '_ {
        let cols = self.cols as usize;
        self.data.iter().enumerate().map(move |(i, &cell)| {
            // Both quotient and remainder fit: they are bounded by rows and cols
            (((i / cols) as u16, (i % cols) as u16), cell)
        })
    }

    /// Number of cells currently in the given state.
    pub fn count(&self, cell: Cell) -> usize {
        self.data.iter().filter(|&&c| c == cell).count()
    }

    fn offset(&self, pos: Pos, dr: i32, dc: i32) -> Option<Pos> {
        let row = pos.0 as i32 + dr;
        let col = pos.1 as i32 + dc;
        if row < 0 || col < 0 || row >= self.rows as i32 || col >= self.cols as i32 {
            return None;
        }
        Some((row as u16, col as u16))
    }

    /// In-bounds cells one step away in the cardinal directions.
    pub fn neighbors4(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        CARDINALS
            .into_iter()
            .filter_map(move |(dr, dc)| self.offset(pos, dr, dc))
    }

    /// In-bounds cells one step away, diagonals included.
    pub fn neighbors8(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        CARDINALS
            .into_iter()
            .chain(DIAGONALS)
            .filter_map(move |(dr, dc)| self.offset(pos, dr, dc))
    }

    /// Get unvisited neighbors of a cell for lattice carving.
    /// A neighbor is a cell two steps away in a cardinal direction, inside the border,
    /// that is still a wall.
    pub fn unvisited_jump_neighbors(&self, pos: Pos) -> Vec<Pos> {
        CARDINALS
            .into_iter()
            .filter_map(|(dr, dc)| self.offset(pos, dr * 2, dc * 2))
            .filter(|&c| self.is_interior(c) && self.get(c) == Cell::Wall)
            .collect()
    }

    /// Cardinal neighbors a solver may step onto.
    pub fn path_neighbors(&self, pos: Pos) -> Vec<Pos> {
        self.neighbors4(pos)
            .filter(|&c| self.get(c).is_walkable())
            .collect()
    }

    /// Turn an interior wall into a path. START and END are never overwritten.
    /// Returns whether the cell was carved.
    pub fn carve(&mut self, pos: Pos) -> bool {
        if !self.is_interior(pos) || self.get(pos) != Cell::Wall {
            return false;
        }
        self.set(pos, Cell::Path)
    }

    /// Carve the wall cell between two cells that are two steps apart.
    /// Returns the carved wall position, or `None` when the midpoint lies on the
    /// border or was not a wall.
    pub fn carve_wall_between(&mut self, a: Pos, b: Pos) -> Option<Pos> {
        let wall = midpoint(a, b);
        self.carve(wall).then_some(wall)
    }
}

/// Midpoint of two lattice cells.
pub fn midpoint(a: Pos, b: Pos) -> Pos {
    (
        ((a.0 as u32 + b.0 as u32) / 2) as u16,
        ((a.1 as u32 + b.1 as u32) / 2) as u16,
    )
}

/// Manhattan distance between two cells.
pub fn manhattan(a: Pos, b: Pos) -> usize {
    a.0.abs_diff(b.0) as usize + a.1.abs_diff(b.1) as usize
}

impl std::ops::Index<Pos> for Grid {
    type Output = Cell;

    fn index(&self, index: Pos) -> &Self::Output {
        if self.is_in_bounds(index) {
            &self.data[self.ravel_index(index)]
        } else {
            &Cell::Wall
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                write!(f, "{}", self.get((row, col)).symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
