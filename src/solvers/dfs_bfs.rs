use std::{
    collections::{HashSet, VecDeque},
    rc::Rc,
};

use super::{Expansion, TrackedCell};
use crate::maze::{Cell, Maze, Pos};

/// Which end of the deque the next cell is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Order {
    /// Stack order, depth-first
    Lifo,
    /// Queue order, breadth-first
    Fifo,
}

/// Depth-first or breadth-first search over a shared deque frontier.
///
/// Cells enter the visited set when they are pushed, so each cell is queued at most once.
pub(super) struct DequeSearch {
    order: Order,
    frontier: VecDeque<Rc<TrackedCell>>,
    visited: HashSet<Pos>,
}

impl DequeSearch {
    pub(super) fn new(order: Order, start: Pos) -> Self {
        DequeSearch {
            order,
            frontier: VecDeque::from([TrackedCell::root(start)]),
            visited: HashSet::from([start]),
        }
    }

    pub(super) fn is_exhausted(&self) -> bool {
        self.frontier.is_empty()
    }

    pub(super) fn step(&mut self, maze: &mut Maze) -> Expansion {
        let popped = match self.order {
            Order::Lifo => self.frontier.pop_back(),
            Order::Fifo => self.frontier.pop_front(),
        };
        let Some(current) = popped else {
            return Expansion::Exhausted;
        };

        maze.mark(current.coord, Cell::Visited);
        if current.coord == maze.end() {
            return Expansion::Reached(current.path());
        }

        for neighbor in maze.grid().path_neighbors(current.coord) {
            if self.visited.insert(neighbor) {
                self.frontier
                    .push_back(TrackedCell::child(&current, neighbor));
            }
        }
        Expansion::Expanded(current.coord)
    }
}
