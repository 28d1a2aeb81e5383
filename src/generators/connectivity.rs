//! Post-generation repair that makes sure START and END touch the carved maze.
//!
//! Randomized carving only ever turns walls into paths, so START and END (which are never
//! walls) can end up sealed off. Each of them is drilled straight to its nearest path cell.

use std::collections::{HashSet, VecDeque};

use crate::maze::{Cell, Grid, Maze, Pos};

/// Connect START and END to their nearest path cells.
/// Returns the number of wall cells that were carved.
pub fn ensure_start_end_connected(maze: &mut Maze) -> usize {
    let mut carved = 0;
    for endpoint in [maze.start(), maze.end()] {
        match find_nearest_path(maze.grid(), endpoint) {
            Some(target) => {
                let drilled = connect_positions(maze.grid_mut(), endpoint, target);
                if drilled > 0 {
                    tracing::debug!(
                        "[repair] drilled {} cells from {:?} to {:?}",
                        drilled,
                        endpoint,
                        target
                    );
                }
                carved += drilled;
            }
            None => tracing::warn!("[repair] no path cell found near {:?}", endpoint),
        }
    }
    carved
}

/// Breadth-first search over all cells, walls included, for the closest path cell.
pub fn find_nearest_path(grid: &Grid, from: Pos) -> Option<Pos> {
    let mut visited = HashSet::from([from]);
    let mut queue = VecDeque::from([from]);

    while let Some(pos) = queue.pop_front() {
        if grid.get(pos) == Cell::Path {
            return Some(pos);
        }
        for next in grid.neighbors4(pos) {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    None
}

/// Drill an L-shaped corridor: along `from`'s row to `to`'s column, then along that column
/// to `to`'s row. Returns the number of walls carved.
pub fn connect_positions(grid: &mut Grid, from: Pos, to: Pos) -> usize {
    let (row_from, col_from) = from;
    let (row_to, col_to) = to;

    let horizontal = (col_from.min(col_to)..=col_from.max(col_to)).map(|col| (row_from, col));
    let vertical = (row_from.min(row_to)..=row_from.max(row_to)).map(|row| (row, col_to));
    horizontal
        .chain(vertical)
        .filter(|&pos| grid.carve(pos))
        .count()
}
