use std::time::Instant;

use clap::Parser;
use mazesim::{
    Error, generators::Generator, maze::MIN_DIMENSION, metrics::optimality_ratio,
    simulation::Simulation,
    solvers::{Solver, shortest_path_len},
};

/// Run every generator and solver pair headless and print per-run metrics.
#[derive(Debug, Parser)]
#[command(name = "profile")]
struct Args {
    /// Runs per generator/solver pair
    #[arg(default_value_t = 10)]
    iterations: usize,

    /// Side of the square grid, border included
    #[arg(long, default_value_t = 41)]
    size: u16,

    /// Base seed; run `i` uses `seed + i`
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    if args.size < MIN_DIMENSION {
        return Err(Error::InvalidDimensions {
            rows: args.size,
            cols: args.size,
            min: MIN_DIMENSION,
        });
    }

    println!(
        "{:<24} {:<14} {:>10} {:>12} {:>10} {:>12} {:>8} {:>8}",
        "generator", "solver", "gen steps", "gen time", "solve steps", "solve time", "length", "ratio"
    );
    let mut sim = Simulation::new(args.size, args.size, Some(args.seed));
    for generator in Generator::ALL {
        for solver in Solver::ALL {
            for i in 0..args.iterations {
                sim.reseed(Some(args.seed.wrapping_add(i as u64)));

                let started = Instant::now();
                sim.start_generation(generator);
                while sim.step() {}
                let generation_elapsed = started.elapsed();

                let started = Instant::now();
                sim.start_solving(solver);
                while sim.step() {}
                let solving_elapsed = started.elapsed();

                let maze = sim.maze();
                let optimal = sim
                    .snapshot()
                    .and_then(|grid| shortest_path_len(grid, maze.start(), maze.end()));
                let found = sim.solution_path().len().saturating_sub(1);
                let (length, ratio) = match (sim.solution_found(), optimal) {
                    (true, Some(optimal)) => (
                        found.to_string(),
                        format!("{:.3}", optimality_ratio(found, optimal)),
                    ),
                    _ => ("-".to_string(), "-".to_string()),
                };
                println!(
                    "{:<24} {:<14} {:>10} {:>12.2?} {:>10} {:>12.2?} {:>8} {:>8}",
                    generator.to_string(),
                    solver.to_string(),
                    sim.generation_step_count(),
                    generation_elapsed,
                    sim.solving_step_count(),
                    solving_elapsed,
                    length,
                    ratio
                );
            }
        }
    }
    Ok(())
}
