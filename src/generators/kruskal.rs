use rand::{rngs::StdRng, seq::SliceRandom};

use super::{MAX_CHECKS_PER_STEP, StepOutcome, rooms, union_find::UnionFind};
use crate::maze::{Maze, Pos};

/// Wall cell between two adjacent rooms
#[derive(Debug, Clone, Copy)]
struct WallRecord {
    wall: Pos,
    a: Pos,
    b: Pos,
}

/// Randomized Kruskal's: shuffled candidate walls plus disjoint sets over the rooms.
pub(super) struct Kruskal {
    walls: Vec<WallRecord>,
    sets: UnionFind<Pos>,
}

impl Kruskal {
    /// Open every room (START and END keep their stamps) and shuffle all candidate walls.
    pub(super) fn start(maze: &mut Maze, rng: &mut StdRng) -> Self {
        let rows = maze.rows();
        let cols = maze.cols();
        let room_cells = rooms(maze.grid()).collect::<Vec<_>>();
        for &room in &room_cells {
            maze.grid_mut().carve(room);
        }

        // Only right and below neighbors, so every wall appears once
        let mut walls = room_cells
            .iter()
            .flat_map(|&(row, col)| {
                [
                    (col + 2 < cols - 1).then_some(WallRecord {
                        wall: (row, col + 1),
                        a: (row, col),
                        b: (row, col + 2),
                    }),
                    (row + 2 < rows - 1).then_some(WallRecord {
                        wall: (row + 1, col),
                        a: (row, col),
                        b: (row + 2, col),
                    }),
                ]
            })
            .flatten()
            .collect::<Vec<_>>();
        walls.shuffle(rng);

        Kruskal {
            walls,
            sets: UnionFind::new(room_cells),
        }
    }

    pub(super) fn is_exhausted(&self) -> bool {
        self.walls.is_empty()
    }

    /// Pop walls until one joins two separate trees or the batch limit is reached.
    /// Walls whose rooms are already connected are discarded.
    pub(super) fn step(&mut self, maze: &mut Maze) -> StepOutcome {
        let mut checks = 0;
        let mut current = None;

        while checks < MAX_CHECKS_PER_STEP {
            let Some(record) = self.walls.pop() else {
                break;
            };
            checks += 1;
            if self.sets.union(record.a, record.b) {
                maze.grid_mut().carve(record.wall);
                current = Some(record.wall);
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
    use crate::generators::get_rng;
    use crate::maze::Cell;

    fn run(maze: &mut Maze, seed: u64) {
        let mut rng = get_rng(Some(seed));
        let mut kruskal = Kruskal::start(maze, &mut rng);
        while !kruskal.is_exhausted() {
            kruskal.step(maze);
        }
    }

    #[test]
    fn test_candidate_walls() {
        let mut maze = Maze::with_default_endpoints(11, 11);
        let mut rng = get_rng(Some(0));
        let kruskal = Kruskal::start(&mut maze, &mut rng);
        // 5x5 rooms: 5 rows of 4 horizontal walls plus 5 columns of 4 vertical walls
        assert_eq!(kruskal.walls.len(), 40);
        assert_eq!(kruskal.sets.len(), 25);
        assert!(
            kruskal
                .walls
                .iter()
                .all(|w| (w.wall.0 + w.wall.1) % 2 == 1 && maze.cell_at(w.wall) == Cell::Wall)
        );
    }

    #[test]
    fn test_spanning_tree_wall_count() {
        let mut maze = Maze::with_default_endpoints(11, 11);
        run(&mut maze, 9);
        let rooms = rooms(maze.grid()).count();
        // Carved walls are the path cells off the room lattice
        let carved_walls = maze
            .grid()
            .cells()
            .filter(|&((r, c), cell)| cell == Cell::Path && (r % 2 == 0 || c % 2 == 0))
            .count();
        assert_eq!(carved_walls, rooms - 1);
    }

    #[test]
    fn test_same_seed_same_maze() {
        let mut first = Maze::with_default_endpoints(11, 11);
        let mut second = Maze::with_default_endpoints(11, 11);
        run(&mut first, 1234);
        run(&mut second, 1234);
        assert_eq!(first.grid().to_string(), second.grid().to_string());
    }
}
