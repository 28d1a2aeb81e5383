use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap, HashSet},
    rc::Rc,
};

use super::{Expansion, TrackedCell};
use crate::maze::{Cell, Maze, Pos, manhattan};

/// Open-list entry. Ordered so the max-heap pops the lowest `f` first and, among equal `f`,
/// the entry pushed first.
struct QueueEntry {
    f_score: usize,
    seq: u64,
    cell: Rc<TrackedCell>,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.f_score, other.seq).cmp(&(self.f_score, self.seq))
    }
}

/// A* with uniform step cost and the Manhattan distance to the end as heuristic.
///
/// A cell is closed when it is expanded. Open entries superseded by a cheaper route are
/// left in the heap and skipped when popped.
pub(super) struct AStarSearch {
    open: BinaryHeap<QueueEntry>,
    g_scores: HashMap<Pos, usize>,
    f_scores: HashMap<Pos, usize>,
    closed: HashSet<Pos>,
    goal: Pos,
    next_seq: u64,
}

impl AStarSearch {
    pub(super) fn new(start: Pos, goal: Pos) -> Self {
        let h = manhattan(start, goal);
        let mut search = AStarSearch {
            open: BinaryHeap::new(),
            g_scores: HashMap::from([(start, 0)]),
            f_scores: HashMap::from([(start, h)]),
            closed: HashSet::new(),
            goal,
            next_seq: 0,
        };
        search.push(TrackedCell::root(start), h);
        search
    }

    fn push(&mut self, cell: Rc<TrackedCell>, f_score: usize) {
        self.open.push(QueueEntry {
            f_score,
            seq: self.next_seq,
            cell,
        });
        self.next_seq += 1;
    }

    pub(super) fn is_exhausted(&self) -> bool {
        self.open.is_empty()
    }

    pub(super) fn step(&mut self, maze: &mut Maze) -> Expansion {
        // Skip stale entries of cells that were already expanded
        let current = loop {
            let Some(entry) = self.open.pop() else {
                return Expansion::Exhausted;
            };
            if self.closed.insert(entry.cell.coord) {
                break entry.cell;
            }
        };

        maze.mark(current.coord, Cell::Visited);
        if current.coord == self.goal {
            return Expansion::Reached(current.path());
        }

        let tentative_g = current.traveling_cost + 1;
        for neighbor in maze.grid().path_neighbors(current.coord) {
            if self.closed.contains(&neighbor) {
                continue;
            }
            let improves = self
                .g_scores
                .get(&neighbor)
                .is_none_or(|&g| tentative_g < g);
            if improves {
                let f_score = tentative_g + manhattan(neighbor, self.goal);
                self.g_scores.insert(neighbor, tentative_g);
                self.f_scores.insert(neighbor, f_score);
                self.push(TrackedCell::child(&current, neighbor), f_score);
            }
        }
        Expansion::Expanded(current.coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_entry_order() {
        let cell = TrackedCell::root((1, 1));
        let mut heap = BinaryHeap::new();
        for (f_score, seq) in [(5, 0), (3, 1), (3, 2), (4, 3)] {
            heap.push(QueueEntry {
                f_score,
                seq,
                cell: cell.clone(),
            });
        }
        let popped = std::iter::from_fn(|| heap.pop().map(|e| (e.f_score, e.seq)))
            .collect::<Vec<_>>();
        assert_eq!(popped, vec![(3, 1), (3, 2), (4, 3), (5, 0)]);
    }

    #[test]
    fn test_astar_heads_for_goal() {
        // Open corridor: A* never needs to look behind the start
        let mut maze = Maze::new(5, 9, (2, 3), (2, 7));
        for c in 1..8 {
            maze.grid_mut().carve((2, c));
        }
        let mut search = AStarSearch::new(maze.start(), maze.end());
        let mut expanded = 0;
        let path = loop {
            match search.step(&mut maze) {
                Expansion::Expanded(_) => expanded += 1,
                Expansion::Reached(path) => break path,
                Expansion::Exhausted => panic!("goal not reached"),
            }
        };
        assert_eq!(path.len(), 5);
        assert_eq!(expanded, 4);
        assert_eq!(maze.cell_at((2, 1)), Cell::Path);
        assert_eq!(search.f_scores.get(&(2, 7)), Some(&4));
    }

    #[test]
    fn test_astar_is_deterministic() {
        let run = || {
            let mut maze = Maze::with_default_endpoints(7, 7);
            for r in 1..6 {
                for c in 1..6 {
                    maze.grid_mut().carve((r, c));
                }
            }
            let mut search = AStarSearch::new(maze.start(), maze.end());
            let mut order = Vec::new();
            loop {
                match search.step(&mut maze) {
                    Expansion::Expanded(pos) => order.push(pos),
                    Expansion::Reached(path) => break (order, path),
                    Expansion::Exhausted => break (order, Vec::new()),
                }
            }
        };
        assert_eq!(run(), run());
    }
}
