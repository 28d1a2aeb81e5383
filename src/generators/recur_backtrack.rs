use rand::{Rng, rngs::StdRng};

use super::{StepOutcome, random_room};
use crate::maze::{Maze, Pos};

/// Recursive backtracking with an explicit stack holding the current carving path.
pub(super) struct RecurBacktrack {
    stack: Vec<Pos>,
}

impl RecurBacktrack {
    pub(super) fn start(maze: &mut Maze, rng: &mut StdRng) -> Self {
        let start = random_room(maze.grid(), rng);
        maze.grid_mut().carve(start);
        RecurBacktrack { stack: vec![start] }
    }

    pub(super) fn head(&self) -> Option<Pos> {
        self.stack.last().copied()
    }

    pub(super) fn is_exhausted(&self) -> bool {
        self.stack.is_empty()
    }

    /// Carve towards one random unvisited neighbor of the top cell, or backtrack if none is left.
    /// Backtracking is a step of its own.
    pub(super) fn step(&mut self, maze: &mut Maze, rng: &mut StdRng) -> StepOutcome {
        let Some(cell) = self.head() else {
            return StepOutcome {
                units: 0,
                current: None,
            };
        };

        let neighbors = maze.grid().unvisited_jump_neighbors(cell);
        if neighbors.is_empty() {
            self.stack.pop();
        } else {
            let neighbor = neighbors[rng.random_range(0..neighbors.len())];
            let grid = maze.grid_mut();
            grid.carve(neighbor);
            grid.carve_wall_between(cell, neighbor);
            // Carve on in that neighbor's direction next
            self.stack.push(neighbor);
        }

        StepOutcome {
            units: 1,
            current: Some(cell),
        }
    }
}
