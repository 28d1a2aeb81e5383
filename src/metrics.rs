use std::time::{Duration, Instant};

use crate::{
    simulation::{Phase, Simulation},
    solvers::shortest_path_len,
};

/// Wall-clock timer for one generation or solve run.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stopwatch {
    started: Option<Instant>,
    elapsed: Duration,
}

impl Stopwatch {
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
        self.elapsed = Duration::ZERO;
    }

    pub fn stop(&mut self) {
        if let Some(started) = self.started.take() {
            self.elapsed = started.elapsed();
        }
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Time since start while running, or the final time once stopped.
    pub fn elapsed(&self) -> Duration {
        match self.started {
            Some(started) => started.elapsed(),
            None => self.elapsed,
        }
    }
}

/// Path length figures of a finished solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveReport {
    /// Edges on the path the solver returned
    pub path_length: usize,
    /// Edges on the shortest possible path
    pub optimal_length: usize,
}

impl SolveReport {
    /// `found / optimal`: 1.0 for an optimal path, above 1.0 otherwise.
    pub fn optimality_ratio(&self) -> f64 {
        optimality_ratio(self.path_length, self.optimal_length)
    }
}

/// Ratio of a found path length to the optimal length, 0.0 when the optimum is zero.
pub fn optimality_ratio(found: usize, optimal: usize) -> f64 {
    if optimal == 0 {
        return 0.0;
    }
    found as f64 / optimal as f64
}

/// Collects timings and path statistics by watching a [`Simulation`] after every tick.
#[derive(Debug, Default)]
pub struct MetricsCollector {
    generation: Stopwatch,
    solving: Stopwatch,
    seen_generation_runs: u64,
    seen_solve_runs: u64,
    report: Option<SolveReport>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update timers from the simulation's current state. Call once per tick.
    pub fn observe(&mut self, sim: &Simulation) {
        if sim.generation_runs() != self.seen_generation_runs {
            self.seen_generation_runs = sim.generation_runs();
            self.generation.start();
            self.solving = Stopwatch::default();
            self.report = None;
        }
        if sim.solve_runs() != self.seen_solve_runs {
            self.seen_solve_runs = sim.solve_runs();
            self.solving.start();
            self.report = None;
        }

        if self.generation.is_running() && !sim.is_generating() {
            self.generation.stop();
            tracing::info!(
                "[metrics] generation took {:.2?} over {} steps",
                self.generation.elapsed(),
                sim.generation_step_count()
            );
        }
        if self.solving.is_running() && !sim.is_solving() {
            self.solving.stop();
            self.report = Self::solve_report(sim);
            tracing::info!(
                "[metrics] solve took {:.2?} over {} steps, report: {:?}",
                self.solving.elapsed(),
                sim.solving_step_count(),
                self.report
            );
        }
        if sim.phase() == Phase::Idle {
            *self = MetricsCollector {
                seen_generation_runs: self.seen_generation_runs,
                seen_solve_runs: self.seen_solve_runs,
                ..MetricsCollector::default()
            };
        }
    }

    fn solve_report(sim: &Simulation) -> Option<SolveReport> {
        if !sim.solution_found() {
            return None;
        }
        let maze = sim.maze();
        let optimal_length = shortest_path_len(sim.snapshot()?, maze.start(), maze.end())?;
        Some(SolveReport {
            path_length: sim.solution_path().len().saturating_sub(1),
            optimal_length,
        })
    }

    pub fn generation_elapsed(&self) -> Duration {
        self.generation.elapsed()
    }

    pub fn solving_elapsed(&self) -> Duration {
        self.solving.elapsed()
    }

    /// Path statistics of the last successful solve.
    pub fn report(&self) -> Option<SolveReport> {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{generators::Generator, solvers::Solver};

    #[test]
    fn test_optimality_ratio() {
        assert_eq!(optimality_ratio(10, 10), 1.0);
        assert_eq!(optimality_ratio(15, 10), 1.5);
        assert_eq!(optimality_ratio(3, 0), 0.0);
    }

    #[test]
    fn test_stopwatch() {
        let mut watch = Stopwatch::default();
        assert!(!watch.is_running());
        assert_eq!(watch.elapsed(), Duration::ZERO);
        watch.start();
        assert!(watch.is_running());
        watch.stop();
        let elapsed = watch.elapsed();
        assert!(!watch.is_running());
        assert_eq!(watch.elapsed(), elapsed);
    }

    #[test]
    fn test_collector_reports_optimal_bfs() {
        let mut sim = Simulation::new(21, 21, Some(12));
        let mut metrics = MetricsCollector::new();
        sim.start_generation(Generator::Kruskal);
        metrics.observe(&sim);
        while sim.step() {
            metrics.observe(&sim);
        }
        sim.start_solving(Solver::Bfs);
        metrics.observe(&sim);
        assert!(metrics.report().is_none());
        while sim.step() {
            metrics.observe(&sim);
        }
        let report = metrics.report();
        assert!(report.is_some());
        let report = report.unwrap_or(SolveReport {
            path_length: 0,
            optimal_length: 1,
        });
        assert_eq!(report.path_length, report.optimal_length);
        assert_eq!(report.optimality_ratio(), 1.0);

        sim.reset();
        metrics.observe(&sim);
        assert!(metrics.report().is_none());
    }
}
