pub mod cell;
pub mod grid;

pub use cell::Cell;
pub use grid::{Grid, Pos, manhattan, midpoint};

/// Smallest grid side that leaves room for two distinct interior cells plus the border.
pub const MIN_DIMENSION: u16 = 5;

/// A grid together with its fixed start and end cells.
///
/// After construction and after every reset, exactly one cell holds [`Cell::Start`] and
/// exactly one holds [`Cell::End`], and both lie strictly inside the wall border.
#[derive(Debug, Clone)]
pub struct Maze {
    grid: Grid,
    start: Pos,
    end: Pos,
}

impl Maze {
    /// Creates a new maze filled with walls, with START and END stamped.
    ///
    /// Dimensions below [`MIN_DIMENSION`] are raised to it. Start and end positions that
    /// fall outside the interior are moved to the defaults `(1, 1)` and
    /// `(rows - 2, cols - 2)`; if they collide, the end is moved away from the start.
    pub fn new(rows: u16, cols: u16, start: Pos, end: Pos) -> Self {
        let rows = rows.max(MIN_DIMENSION);
        let cols = cols.max(MIN_DIMENSION);
        let mut maze = Maze {
            grid: Grid::new(rows, cols, Cell::Wall),
            start,
            end,
        };
        maze.place_endpoints(start, end);
        maze.reset();
        maze
    }

    /// Creates a maze with START at the top-left and END at the bottom-right of the interior.
    pub fn with_default_endpoints(rows: u16, cols: u16) -> Self {
        let rows = rows.max(MIN_DIMENSION);
        let cols = cols.max(MIN_DIMENSION);
        Maze::new(rows, cols, (1, 1), Maze::default_end(rows, cols))
    }

    /// The default end position for the given dimensions.
    pub fn default_end(rows: u16, cols: u16) -> Pos {
        (rows.saturating_sub(2).max(1), cols.saturating_sub(2).max(1))
    }

    fn place_endpoints(&mut self, start: Pos, end: Pos) {
        let start = if self.grid.is_interior(start) {
            start
        } else {
            tracing::warn!("[maze] start {:?} is outside the interior, using (1, 1)", start);
            (1, 1)
        };
        let default_end = Maze::default_end(self.rows(), self.cols());
        let mut end = if self.grid.is_interior(end) {
            end
        } else {
            tracing::warn!(
                "[maze] end {:?} is outside the interior, using {:?}",
                end,
                default_end
            );
            default_end
        };
        if end == start {
            end = if start != default_end { default_end } else { (1, 1) };
            tracing::warn!("[maze] start and end collide, moving end to {:?}", end);
        }
        self.start = start;
        self.end = end;
    }

    /// Fill every cell with walls and stamp START and END again.
    pub fn reset(&mut self) {
        self.grid.fill(Cell::Wall);
        self.grid.set(self.start, Cell::Start);
        self.grid.set(self.end, Cell::End);
    }

    pub fn rows(&self) -> u16 {
        self.grid.rows()
    }

    pub fn cols(&self) -> u16 {
        self.grid.cols()
    }

    pub fn start(&self) -> Pos {
        self.start
    }

    pub fn end(&self) -> Pos {
        self.end
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn cell_at(&self, pos: Pos) -> Cell {
        self.grid.get(pos)
    }

    /// Whether `pos` is the start or end cell.
    pub fn is_endpoint(&self, pos: Pos) -> bool {
        pos == self.start || pos == self.end
    }

    /// Replace the grid with a clean snapshot taken after generation.
    /// Snapshots of a different size are ignored.
    pub fn restore(&mut self, snapshot: &Grid) {
        if snapshot.rows() != self.rows() || snapshot.cols() != self.cols() {
            tracing::warn!("[maze] ignoring snapshot with mismatched dimensions");
            return;
        }
        self.grid.clone_from(snapshot);
    }

    /// Paint a solving overlay on `pos`, leaving START and END untouched.
    pub fn mark(&mut self, pos: Pos, overlay: Cell) {
        if !self.is_endpoint(pos) {
            self.grid.set(pos, overlay);
        }
    }

    /// Whether an unobstructed 4-connected walk leads from START to END.
    pub fn is_connected(&self) -> bool {
        let mut seen = std::collections::HashSet::from([self.start]);
        let mut queue = std::collections::VecDeque::from([self.start]);
        while let Some(pos) = queue.pop_front() {
            if pos == self.end {
                return true;
            }
            for next in self.grid.neighbors4(pos) {
                if self.grid.get(next) != Cell::Wall && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        false
    }
}
