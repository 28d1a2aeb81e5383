use rand::{Rng, rngs::StdRng};
use std::collections::HashSet;

use super::{MAX_CHECKS_PER_STEP, StepOutcome, random_room};
use crate::maze::{Cell, Grid, Maze, Pos, midpoint};

/// A wall adjacent to the carved region, together with the room behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FrontierWall {
    wall: Pos,
    cell: Pos,
}

/// Randomized Prim's over the room lattice.
///
/// The frontier is a set with uniform random picks: records live in a vector for O(1)
/// random removal and in a hash set for deduplication.
pub(super) struct Prim {
    frontier: Vec<FrontierWall>,
    members: HashSet<FrontierWall>,
}

impl Prim {
    /// Carve a random root room and collect its frontier. Returns the root alongside.
    pub(super) fn start(maze: &mut Maze, rng: &mut StdRng) -> (Self, Pos) {
        let root = random_room(maze.grid(), rng);
        maze.grid_mut().carve(root);
        let mut prim = Prim {
            frontier: Vec::new(),
            members: HashSet::new(),
        };
        prim.update_frontier(maze.grid(), root);
        (prim, root)
    }

    pub(super) fn is_exhausted(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Add the walls between `from` and each of its uncarved jump neighbors.
    fn update_frontier(&mut self, grid: &Grid, from: Pos) {
        for cell in grid.unvisited_jump_neighbors(from) {
            let record = FrontierWall {
                wall: midpoint(from, cell),
                cell,
            };
            if self.members.insert(record) {
                self.frontier.push(record);
            }
        }
    }

    /// Pick random frontier walls until one carves a new room or the batch limit is reached.
    /// Every picked record leaves the frontier, carved or not.
    pub(super) fn step(&mut self, maze: &mut Maze, rng: &mut StdRng) -> StepOutcome {
        let mut checks = 0;
        let mut current = None;

        while !self.frontier.is_empty() && checks < MAX_CHECKS_PER_STEP {
            checks += 1;
            let record = self
                .frontier
                .swap_remove(rng.random_range(0..self.frontier.len()));
            self.members.remove(&record);
            current = Some(record.wall);

            if maze.cell_at(record.cell) == Cell::Wall {
                let grid = maze.grid_mut();
                grid.carve(record.wall);
                grid.carve(record.cell);
                self.update_frontier(maze.grid(), record.cell);
                // Yield so the carve gets rendered
                break;
            }
        }

        StepOutcome {
            units: checks,
            current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{get_rng, rooms};

    #[test]
    fn test_randomized_prim() {
        let mut maze = Maze::with_default_endpoints(13, 13);
        let mut rng = get_rng(Some(0));
        let (mut prim, root) = Prim::start(&mut maze, &mut rng);
        assert!(rooms(maze.grid()).any(|r| r == root));
        while !prim.is_exhausted() {
            prim.step(&mut maze, &mut rng);
        }
        for room in rooms(maze.grid()) {
            if !maze.is_endpoint(room) {
                assert_eq!(maze.cell_at(room), Cell::Path, "room {room:?} left uncarved");
            }
        }
        assert!(prim.members.is_empty());
    }

    #[test]
    fn test_step_yields_after_a_carve() {
        let mut maze = Maze::with_default_endpoints(15, 15);
        let mut rng = get_rng(Some(5));
        let (mut prim, _) = Prim::start(&mut maze, &mut rng);
        while !prim.is_exhausted() {
            let carved_before = maze.grid().count(Cell::Path);
            let outcome = prim.step(&mut maze, &mut rng);
            let carved_after = maze.grid().count(Cell::Path);
            assert!(outcome.units >= 1 && outcome.units <= MAX_CHECKS_PER_STEP);
            // At most one room and its wall per step
            assert!(carved_after - carved_before <= 2);
            if carved_after == carved_before && !prim.is_exhausted() {
                assert_eq!(outcome.units, MAX_CHECKS_PER_STEP);
            }
        }
    }
}
