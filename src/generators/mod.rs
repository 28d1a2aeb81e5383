use rand::{Rng, SeedableRng, rngs::StdRng};

pub mod connectivity;
mod kruskal;
mod prim;
mod recur_backtrack;
pub mod union_find;

use kruskal::Kruskal;
use prim::Prim;
use recur_backtrack::RecurBacktrack;

use crate::maze::{Grid, Maze, Pos};

/// Upper bound on consecutive no-op checks Prim's and Kruskal's may batch into one step.
pub const MAX_CHECKS_PER_STEP: usize = 20;

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Room cells: both coordinates odd and inside the border, spaced two apart.
pub fn rooms(grid: &Grid) -> impl Iterator<Item = Pos> + use<> {
    let rows = grid.rows();
    let cols = grid.cols();
    (1..rows.saturating_sub(1))
        .step_by(2)
        .flat_map(move |r| (1..cols.saturating_sub(1)).step_by(2).map(move |c| (r, c)))
}

/// Pick a room cell uniformly at random.
fn random_room(grid: &Grid, rng: &mut StdRng) -> Pos {
    let room_rows = (grid.rows().saturating_sub(1) / 2).max(1);
    let room_cols = (grid.cols().saturating_sub(1) / 2).max(1);
    (
        rng.random_range(0..room_rows) * 2 + 1,
        rng.random_range(0..room_cols) * 2 + 1,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Generator {
    RecurBacktrack,
    Prim,
    Kruskal,
}

impl Generator {
    pub const ALL: [Generator; 3] = [Generator::RecurBacktrack, Generator::Prim, Generator::Kruskal];
}

impl std::fmt::Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generator::RecurBacktrack => write!(f, "Recursive Backtracking"),
            Generator::Prim => write!(f, "Prim's Algorithm"),
            Generator::Kruskal => write!(f, "Kruskal's Algorithm"),
        }
    }
}

/// What a single algorithm step did.
struct StepOutcome {
    /// Units of work performed, counted towards the generation step total
    units: usize,
    /// Cell to highlight as the algorithm's head, if it moved
    current: Option<Pos>,
}

/// Algorithm-specific working state, dropped once generation finishes.
enum Working {
    RecurBacktrack(RecurBacktrack),
    Prim(Prim),
    Kruskal(Kruskal),
    Done,
}

/// Steppable maze generator.
///
/// Created in the running state by [`GenerationEngine::start`], advanced one bounded unit of
/// work per [`GenerationEngine::step`], and done once the working state is exhausted. On
/// completion the start and end cells are connected to the carved maze.
pub struct GenerationEngine {
    generator: Generator,
    working: Working,
    steps: usize,
    current: Option<Pos>,
    repaired_cells: usize,
}

impl GenerationEngine {
    /// Reset the maze to walls and seed the working state of `generator`.
    pub fn start(generator: Generator, maze: &mut Maze, rng: &mut StdRng) -> Self {
        maze.reset();
        let (working, current) = match generator {
            Generator::RecurBacktrack => {
                let state = RecurBacktrack::start(maze, rng);
                let current = state.head();
                (Working::RecurBacktrack(state), current)
            }
            Generator::Prim => {
                let (state, root) = Prim::start(maze, rng);
                (Working::Prim(state), Some(root))
            }
            Generator::Kruskal => (Working::Kruskal(Kruskal::start(maze, rng)), None),
        };
        tracing::info!(
            "[generate] started {} on a {}x{} grid",
            generator,
            maze.rows(),
            maze.cols()
        );
        GenerationEngine {
            generator,
            working,
            steps: 0,
            current,
            repaired_cells: 0,
        }
    }

    /// Advance the algorithm by one unit of work.
    /// Returns `true` while generation is still running after this step.
    pub fn step(&mut self, maze: &mut Maze, rng: &mut StdRng) -> bool {
        let (outcome, exhausted) = match &mut self.working {
            Working::RecurBacktrack(state) => {
                let outcome = state.step(maze, rng);
                (outcome, state.is_exhausted())
            }
            Working::Prim(state) => {
                let outcome = state.step(maze, rng);
                (outcome, state.is_exhausted())
            }
            Working::Kruskal(state) => {
                let outcome = state.step(maze);
                (outcome, state.is_exhausted())
            }
            Working::Done => return false,
        };

        self.steps += outcome.units;
        if outcome.current.is_some() {
            self.current = outcome.current;
        }
        if exhausted {
            self.finish(maze);
        }
        !self.is_done()
    }

    /// Drop the working state and repair start/end connectivity.
    fn finish(&mut self, maze: &mut Maze) {
        self.working = Working::Done;
        self.current = None;
        self.repaired_cells = connectivity::ensure_start_end_connected(maze);
        tracing::info!(
            "[generate] {} finished after {} steps, repair carved {} cells",
            self.generator,
            self.steps,
            self.repaired_cells
        );
    }

    pub fn generator(&self) -> Generator {
        self.generator
    }

    pub fn is_running(&self) -> bool {
        !self.is_done()
    }

    pub fn is_done(&self) -> bool {
        matches!(self.working, Working::Done)
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The algorithm's active head, `None` once done.
    pub fn current(&self) -> Option<Pos> {
        self.current
    }

    /// Cells carved by connectivity repair when generation finished.
    pub fn repaired_cells(&self) -> usize {
        self.repaired_cells
    }
}

/// Run `generator` to completion on `maze`, returning the number of steps taken.
pub fn generate_maze(maze: &mut Maze, generator: Generator, rng: &mut StdRng) -> usize {
    let mut engine = GenerationEngine::start(generator, maze, rng);
    while engine.step(maze, rng) {}
    engine.steps()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Cell;

    #[test]
    fn test_rooms() {
        let grid = Grid::new(7, 6, Cell::Wall);
        let rooms = rooms(&grid).collect::<Vec<_>>();
        assert_eq!(rooms, vec![(1, 1), (1, 3), (3, 1), (3, 3), (5, 1), (5, 3)]);
    }

    #[test]
    fn test_random_room_is_a_room() {
        let grid = Grid::new(11, 8, Cell::Wall);
        let mut rng = get_rng(Some(3));
        let all = rooms(&grid).collect::<Vec<_>>();
        for _ in 0..100 {
            assert!(all.contains(&random_room(&grid, &mut rng)));
        }
    }

    #[test]
    fn test_engine_runs_to_completion() {
        for generator in Generator::ALL {
            let mut maze = Maze::with_default_endpoints(15, 21);
            let mut rng = get_rng(Some(7));
            let mut engine = GenerationEngine::start(generator, &mut maze, &mut rng);
            assert!(engine.is_running());
            let mut calls = 0;
            while engine.step(&mut maze, &mut rng) {
                calls += 1;
                assert!(calls < 100_000, "{generator} did not terminate");
            }
            assert!(engine.is_done());
            assert_eq!(engine.current(), None);
            assert!(engine.steps() > 0);
            assert!(maze.is_connected(), "{generator} left start and end apart");
            // Once done, further steps are no-ops
            let steps = engine.steps();
            assert!(!engine.step(&mut maze, &mut rng));
            assert_eq!(engine.steps(), steps);
        }
    }

    #[test]
    fn test_generation_never_uses_overlays() {
        for generator in Generator::ALL {
            let mut maze = Maze::with_default_endpoints(9, 9);
            let mut rng = get_rng(Some(11));
            let mut engine = GenerationEngine::start(generator, &mut maze, &mut rng);
            loop {
                assert!(maze.grid().cells().all(|(_, c)| !c.is_overlay()));
                if !engine.step(&mut maze, &mut rng) {
                    break;
                }
            }
        }
    }
}
