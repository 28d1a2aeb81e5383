use rand::rngs::StdRng;

use crate::{
    generators::{GenerationEngine, Generator, get_rng},
    maze::{Cell, Grid, Maze, Pos},
    solvers::{Solver, SolvingEngine, SolvingStatus},
};

/// Coarse lifecycle of the simulation, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fresh wall-filled grid, nothing generated yet
    Idle,
    Generating,
    /// Generation done, ready to solve
    Generated,
    Solving,
    Solved,
    Unsolvable,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Idle => write!(f, "Idle"),
            Phase::Generating => write!(f, "Generating"),
            Phase::Generated => write!(f, "Ready to solve"),
            Phase::Solving => write!(f, "Solving"),
            Phase::Solved => write!(f, "Solved"),
            Phase::Unsolvable => write!(f, "No solution found"),
        }
    }
}

/// Drives one maze through generation and solving, one step per external tick.
///
/// At most one engine is active at a time. The clean maze snapshot taken when generation
/// finishes is owned here and replaced wholesale by the next generation run; every solve
/// starts from it.
pub struct Simulation {
    maze: Maze,
    snapshot: Option<Grid>,
    rng: StdRng,
    generator: Generator,
    solver: Solver,
    generation: Option<GenerationEngine>,
    solving: Option<SolvingEngine>,
    paused: bool,
    generation_runs: u64,
    solve_runs: u64,
}

impl Simulation {
    /// New idle simulation with START at `(1, 1)` and END at `(rows - 2, cols - 2)`.
    pub fn new(rows: u16, cols: u16, seed: Option<u64>) -> Self {
        Simulation {
            maze: Maze::with_default_endpoints(rows, cols),
            snapshot: None,
            rng: get_rng(seed),
            generator: Generator::RecurBacktrack,
            solver: Solver::AStar,
            generation: None,
            solving: None,
            paused: false,
            generation_runs: 0,
            solve_runs: 0,
        }
    }

    /// Reinitialize the grid and drop all working state and the clean snapshot.
    pub fn reset_maze(&mut self, rows: u16, cols: u16, start: Pos, end: Pos) {
        self.maze = Maze::new(rows, cols, start, end);
        self.clear();
        tracing::info!(
            "[sim] reset to {}x{} with start {:?} and end {:?}",
            self.maze.rows(),
            self.maze.cols(),
            self.maze.start(),
            self.maze.end()
        );
    }

    /// Reset with the current dimensions and endpoints.
    pub fn reset(&mut self) {
        self.maze.reset();
        self.clear();
        tracing::info!("[sim] reset");
    }

    /// Change the grid dimensions. Any running engine is discarded first, since its working
    /// state indexes the old grid. START is kept if it still fits, END moves to the
    /// bottom-right of the interior.
    pub fn resize(&mut self, rows: u16, cols: u16) {
        if self.is_running() {
            tracing::info!("[sim] resize while running, discarding working state");
        }
        let end = Maze::default_end(rows, cols);
        self.reset_maze(rows, cols, self.maze.start(), end);
    }

    fn clear(&mut self) {
        self.snapshot = None;
        self.generation = None;
        self.solving = None;
    }

    /// Replace the random source. `None` draws a fresh seed from the OS.
    pub fn reseed(&mut self, seed: Option<u64>) {
        self.rng = get_rng(seed);
    }

    pub fn generator(&self) -> Generator {
        self.generator
    }

    pub fn solver(&self) -> Solver {
        self.solver
    }

    /// Choose the generation algorithm for the next run. Rejected while an engine runs.
    pub fn set_generator(&mut self, generator: Generator) -> bool {
        if self.is_running() {
            tracing::warn!("[sim] cannot switch to {} while running", generator);
            return false;
        }
        self.generator = generator;
        true
    }

    /// Choose the solving algorithm for the next run. Rejected while an engine runs.
    pub fn set_solver(&mut self, solver: Solver) -> bool {
        if self.is_running() {
            tracing::warn!("[sim] cannot switch to {} while running", solver);
            return false;
        }
        self.solver = solver;
        true
    }

    /// Reset the grid and start generating with `generator`.
    pub fn start_generation(&mut self, generator: Generator) {
        self.generator = generator;
        self.clear();
        self.generation = Some(GenerationEngine::start(
            generator,
            &mut self.maze,
            &mut self.rng,
        ));
        self.generation_runs += 1;
    }

    /// Start solving the generated maze with `solver`.
    /// Does nothing until a generation run has completed.
    pub fn start_solving(&mut self, solver: Solver) {
        let Some(snapshot) = self.snapshot.as_ref() else {
            tracing::debug!("[sim] ignoring solve request, no generated maze yet");
            return;
        };
        self.solver = solver;
        self.solving = Some(SolvingEngine::start(solver, &mut self.maze, snapshot));
        self.solve_runs += 1;
    }

    /// Advance whichever engine is active by one step.
    /// Returns whether any work was done; paused or idle simulations do nothing.
    pub fn step(&mut self) -> bool {
        if self.paused {
            return false;
        }

        if let Some(engine) = self.generation.as_mut().filter(|e| e.is_running()) {
            if !engine.step(&mut self.maze, &mut self.rng) {
                self.snapshot = Some(self.maze.grid().clone());
            }
            return true;
        }

        if let Some(engine) = self.solving.as_mut().filter(|e| e.is_running()) {
            engine.step(&mut self.maze);
            return true;
        }
        false
    }

    pub fn phase(&self) -> Phase {
        if let Some(engine) = &self.solving {
            return match engine.status() {
                SolvingStatus::Running => Phase::Solving,
                SolvingStatus::Solved => Phase::Solved,
                SolvingStatus::Unsolvable => Phase::Unsolvable,
            };
        }
        match &self.generation {
            Some(engine) if engine.is_running() => Phase::Generating,
            Some(_) => Phase::Generated,
            None => Phase::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.is_generating() || self.is_solving()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pausing keeps all working state, so stepping resumes where it stopped.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn is_generating(&self) -> bool {
        self.generation.as_ref().is_some_and(|e| e.is_running())
    }

    pub fn is_generation_complete(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn generation_step_count(&self) -> usize {
        self.generation.as_ref().map_or(0, |e| e.steps())
    }

    pub fn is_solving(&self) -> bool {
        self.solving.as_ref().is_some_and(|e| e.is_running())
    }

    pub fn is_solving_complete(&self) -> bool {
        self.solving.as_ref().is_some_and(|e| e.is_done())
    }

    pub fn solving_step_count(&self) -> usize {
        self.solving.as_ref().map_or(0, |e| e.steps())
    }

    pub fn solution_found(&self) -> bool {
        self.solving.as_ref().is_some_and(|e| e.solution_found())
    }

    /// Cells from start to end of the last solve, empty if none was found.
    pub fn solution_path(&self) -> &[Pos] {
        self.solving
            .as_ref()
            .map(|e| e.solution_path())
            .unwrap_or_default()
    }

    /// State of a cell; out-of-bounds queries are walls.
    pub fn cell_at(&self, row: u16, col: u16) -> Cell {
        self.maze.cell_at((row, col))
    }

    /// The active algorithm's head, for the "current cell" marker.
    pub fn current_cell_highlight(&self) -> Option<Pos> {
        if self.is_generating() {
            return self.generation.as_ref().and_then(|e| e.current());
        }
        if self.is_solving() {
            return self.solving.as_ref().and_then(|e| e.current());
        }
        None
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// The clean maze as it was when generation finished.
    pub fn snapshot(&self) -> Option<&Grid> {
        self.snapshot.as_ref()
    }

    /// Number of generation runs started so far.
    pub fn generation_runs(&self) -> u64 {
        self.generation_runs
    }

    /// Number of solve runs started so far.
    pub fn solve_runs(&self) -> u64 {
        self.solve_runs
    }

    /// Cells carved by connectivity repair in the last generation run.
    pub fn repaired_cells(&self) -> usize {
        self.generation.as_ref().map_or(0, |e| e.repaired_cells())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated(generator: Generator, seed: u64) -> Simulation {
        let mut sim = Simulation::new(11, 11, Some(seed));
        sim.start_generation(generator);
        while sim.step() {}
        sim
    }

    #[test]
    fn test_lifecycle() {
        let mut sim = Simulation::new(15, 15, Some(1));
        assert_eq!(sim.phase(), Phase::Idle);
        assert!(!sim.step());

        sim.start_generation(Generator::Prim);
        assert_eq!(sim.phase(), Phase::Generating);
        assert!(sim.is_generating());
        while sim.step() {}
        assert_eq!(sim.phase(), Phase::Generated);
        assert!(sim.is_generation_complete());
        assert!(sim.generation_step_count() > 0);
        assert_eq!(sim.snapshot(), Some(sim.maze().grid()));

        sim.start_solving(Solver::Bfs);
        assert!(sim.is_solving());
        assert_eq!(sim.current_cell_highlight(), Some((1, 1)));
        while sim.step() {}
        assert!(sim.is_solving_complete());
        assert!(sim.solution_found());
        assert_eq!(sim.phase(), Phase::Solved);
        assert_eq!(sim.solution_path().first(), Some(&(1, 1)));
        assert_eq!(sim.solution_path().last(), Some(&(13, 13)));
        assert_eq!(sim.current_cell_highlight(), None);
    }

    #[test]
    fn test_solve_before_generation_is_ignored() {
        let mut sim = Simulation::new(11, 11, Some(1));
        sim.start_solving(Solver::Dfs);
        assert!(!sim.is_solving());
        sim.start_generation(Generator::Kruskal);
        sim.start_solving(Solver::Dfs);
        assert!(!sim.is_solving());
        assert!(sim.is_generating());
        assert_eq!(sim.solve_runs(), 0);
    }

    #[test]
    fn test_pause_keeps_working_state() {
        let mut sim = Simulation::new(11, 11, Some(2));
        sim.start_generation(Generator::RecurBacktrack);
        sim.step();
        let steps = sim.generation_step_count();
        assert!(sim.toggle_pause());
        for _ in 0..10 {
            assert!(!sim.step());
        }
        assert_eq!(sim.generation_step_count(), steps);
        assert!(sim.is_generating());
        sim.set_paused(false);
        assert!(sim.step());
        assert_eq!(sim.generation_step_count(), steps + 1);
    }

    #[test]
    fn test_algorithm_switch_rejected_while_running() {
        let mut sim = Simulation::new(11, 11, Some(3));
        assert!(sim.set_generator(Generator::Kruskal));
        sim.start_generation(sim.generator());
        assert!(!sim.set_generator(Generator::Prim));
        assert!(!sim.set_solver(Solver::Dfs));
        assert_eq!(sim.generator(), Generator::Kruskal);
        while sim.step() {}
        assert!(sim.set_solver(Solver::Dfs));
        assert_eq!(sim.solver(), Solver::Dfs);
    }

    #[test]
    fn test_resize_forces_reset() {
        let mut sim = Simulation::new(11, 11, Some(4));
        sim.start_generation(Generator::Prim);
        sim.step();
        sim.resize(9, 13);
        assert_eq!(sim.phase(), Phase::Idle);
        assert!(!sim.is_running());
        assert!(!sim.is_generation_complete());
        assert_eq!(sim.maze().rows(), 9);
        assert_eq!(sim.cell_at(1, 1), Cell::Start);
        assert_eq!(sim.cell_at(7, 11), Cell::End);
        assert_eq!(sim.maze().grid().count(Cell::End), 1);
        // Stale coordinates from the larger grid read as walls
        assert_eq!(sim.cell_at(10, 10), Cell::Wall);
    }

    #[test]
    fn test_repeated_solves_start_clean() {
        let mut sim = generated(Generator::RecurBacktrack, 5);
        let clean = sim.snapshot().cloned();
        for solver in [Solver::Dfs, Solver::Dfs, Solver::AStar] {
            sim.start_solving(solver);
            assert_eq!(Some(sim.maze().grid()), clean.as_ref());
            while sim.step() {}
            assert!(sim.solution_found());
        }
        assert_eq!(sim.snapshot().cloned(), clean);
    }

    #[test]
    fn test_same_seed_same_maze() {
        for generator in Generator::ALL {
            let first = generated(generator, 99);
            let second = generated(generator, 99);
            assert_eq!(
                first.maze().grid().to_string(),
                second.maze().grid().to_string()
            );
        }
    }

    #[test]
    fn test_reseed_reproduces_generation() {
        let mut sim = Simulation::new(21, 21, Some(8));
        sim.start_generation(Generator::Kruskal);
        while sim.step() {}
        let first = sim.maze().grid().clone();

        sim.reseed(Some(8));
        sim.start_generation(Generator::Kruskal);
        assert_eq!(sim.phase(), Phase::Generating);
        while sim.step() {}
        assert_eq!(sim.maze().grid(), &first);
        assert_eq!(sim.generation_runs(), 2);
    }

    #[test]
    fn test_reset_restores_walls() {
        let mut sim = generated(Generator::Prim, 6);
        sim.reset();
        assert_eq!(sim.phase(), Phase::Idle);
        assert_eq!(sim.maze().grid().count(Cell::Wall), 11 * 11 - 2);
        assert_eq!(sim.generation_step_count(), 0);
    }
}
