use std::rc::Rc;

mod astar;
mod dfs_bfs;

use astar::AStarSearch;
use dfs_bfs::{DequeSearch, Order};

use crate::maze::{Cell, Grid, Maze, Pos};

/// A search node linked back to the cell it was reached from.
struct TrackedCell {
    /// Coordinates of the cell in the maze
    coord: Pos,
    /// The parent cell from which this cell was reached
    parent: Option<Rc<TrackedCell>>,
    /// Cost to reach this cell from the start
    traveling_cost: usize,
}

impl TrackedCell {
    fn root(coord: Pos) -> Rc<TrackedCell> {
        Rc::new(TrackedCell {
            coord,
            parent: None,
            traveling_cost: 0,
        })
    }

    fn child(parent: &Rc<TrackedCell>, coord: Pos) -> Rc<TrackedCell> {
        Rc::new(TrackedCell {
            coord,
            parent: Some(parent.clone()),
            traveling_cost: parent.traveling_cost + 1,
        })
    }

    /// Coordinates from the root down to this cell.
    fn path(&self) -> Vec<Pos> {
        let mut path = Vec::with_capacity(self.traveling_cost + 1);
        path.push(self.coord);
        let mut node = self.parent.as_ref();
        while let Some(parent) = node {
            path.push(parent.coord);
            node = parent.parent.as_ref();
        }
        path.reverse();
        path
    }
}

/// Result of expanding one cell.
enum Expansion {
    /// Cell was expanded and the search goes on
    Expanded(Pos),
    /// The end cell was expanded, carrying the path that reached it
    Reached(Vec<Pos>),
    /// Nothing left to expand
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Solver {
    Dfs,
    Bfs,
    AStar,
}

impl Solver {
    pub const ALL: [Solver; 3] = [Solver::Dfs, Solver::Bfs, Solver::AStar];
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solver::Dfs => write!(f, "Depth-First Search (DFS)"),
            Solver::Bfs => write!(f, "Breadth-First Search (BFS)"),
            Solver::AStar => write!(f, "A* Search"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolvingStatus {
    Running,
    Solved,
    /// The frontier ran dry without reaching the end cell
    Unsolvable,
}

enum Frontier {
    Deque(DequeSearch),
    AStar(AStarSearch),
    Done,
}

/// Steppable maze solver.
///
/// Starting restores the maze from the clean snapshot, so overlays of an earlier solve never
/// leak into this one. Each [`SolvingEngine::step`] expands one cell. On success the path is
/// stamped as [`Cell::Solution`]; on failure the visited overlay is left as is and the
/// solution path stays empty.
pub struct SolvingEngine {
    solver: Solver,
    frontier: Frontier,
    status: SolvingStatus,
    steps: usize,
    current: Option<Pos>,
    solution: Vec<Pos>,
}

impl SolvingEngine {
    pub fn start(solver: Solver, maze: &mut Maze, snapshot: &Grid) -> Self {
        maze.restore(snapshot);
        let start = maze.start();
        let frontier = match solver {
            Solver::Dfs => Frontier::Deque(DequeSearch::new(Order::Lifo, start)),
            Solver::Bfs => Frontier::Deque(DequeSearch::new(Order::Fifo, start)),
            Solver::AStar => Frontier::AStar(AStarSearch::new(start, maze.end())),
        };
        tracing::info!(
            "[solve] started {} from {:?} to {:?}",
            solver,
            start,
            maze.end()
        );
        SolvingEngine {
            solver,
            frontier,
            status: SolvingStatus::Running,
            steps: 0,
            current: Some(start),
            solution: Vec::new(),
        }
    }

    /// Expand one cell. Returns `true` while solving is still running after this step.
    pub fn step(&mut self, maze: &mut Maze) -> bool {
        let (expansion, exhausted) = match &mut self.frontier {
            Frontier::Deque(search) => {
                let expansion = search.step(maze);
                (expansion, search.is_exhausted())
            }
            Frontier::AStar(search) => {
                let expansion = search.step(maze);
                (expansion, search.is_exhausted())
            }
            Frontier::Done => return false,
        };

        match expansion {
            Expansion::Expanded(pos) => {
                self.steps += 1;
                self.current = Some(pos);
                if exhausted {
                    self.finish(maze, None);
                }
            }
            Expansion::Reached(path) => {
                self.steps += 1;
                self.finish(maze, Some(path));
            }
            Expansion::Exhausted => self.finish(maze, None),
        }
        self.is_running()
    }

    fn finish(&mut self, maze: &mut Maze, path: Option<Vec<Pos>>) {
        self.frontier = Frontier::Done;
        self.current = None;
        match path {
            Some(path) => {
                for &pos in &path {
                    maze.mark(pos, Cell::Solution);
                }
                tracing::info!(
                    "[solve] {} found a path of length {} after {} steps",
                    self.solver,
                    path.len(),
                    self.steps
                );
                self.solution = path;
                self.status = SolvingStatus::Solved;
            }
            None => {
                tracing::info!(
                    "[solve] {} found no path after {} steps",
                    self.solver,
                    self.steps
                );
                self.status = SolvingStatus::Unsolvable;
            }
        }
    }

    pub fn solver(&self) -> Solver {
        self.solver
    }

    pub fn status(&self) -> SolvingStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == SolvingStatus::Running
    }

    pub fn is_done(&self) -> bool {
        !self.is_running()
    }

    pub fn solution_found(&self) -> bool {
        self.status == SolvingStatus::Solved
    }

    /// Cells from start to end, inclusive. Empty unless a path was found.
    pub fn solution_path(&self) -> &[Pos] {
        &self.solution
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The cell expanded last, `None` once done.
    pub fn current(&self) -> Option<Pos> {
        self.current
    }
}

/// Solve `maze` in place with `solver`, starting from its current grid.
/// Returns the solution path, empty when the end cannot be reached.
pub fn solve_maze(maze: &mut Maze, solver: Solver) -> Vec<Pos> {
    let snapshot = maze.grid().clone();
    let mut engine = SolvingEngine::start(solver, maze, &snapshot);
    while engine.step(maze) {}
    engine.solution
}

/// Length in edges of the shortest route from start to end, by exhaustive BFS.
pub fn shortest_path_len(grid: &Grid, start: Pos, end: Pos) -> Option<usize> {
    let mut distances = std::collections::HashMap::from([(start, 0usize)]);
    let mut queue = std::collections::VecDeque::from([start]);
    while let Some(pos) = queue.pop_front() {
        let distance = distances.get(&pos).copied().unwrap_or(0);
        if pos == end {
            return Some(distance);
        }
        for next in grid.path_neighbors(pos) {
            distances.entry(next).or_insert_with(|| {
                queue.push_back(next);
                distance + 1
            });
        }
    }
    None
}
