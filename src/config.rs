use std::{path::PathBuf, time::Duration};

use clap::Parser;
use tracing::Level;

use crate::{Error, generators::Generator, maze::MIN_DIMENSION, solvers::Solver};

/// A stepwise maze generation and solving visualizer for the terminal.
#[derive(Debug, Clone, Parser)]
#[command(name = "mazesim", version, about)]
pub struct Config {
    /// Grid rows including the wall border. Fitted to the terminal when omitted.
    #[arg(long)]
    pub rows: Option<u16>,

    /// Grid columns including the wall border. Fitted to the terminal when omitted.
    #[arg(long)]
    pub cols: Option<u16>,

    /// Seed for the random source, for reproducible mazes.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maze generation algorithm selected at startup.
    #[arg(long, value_enum, default_value = "recur-backtrack")]
    pub generator: Generator,

    /// Maze solving algorithm selected at startup.
    #[arg(long, value_enum, default_value = "a-star")]
    pub solver: Solver,

    /// Milliseconds between simulation steps.
    #[arg(long, default_value_t = 16)]
    pub tick_ms: u64,

    /// File that receives log output, since the terminal is taken by the visualizer.
    #[arg(long, default_value = "mazesim.log")]
    pub log_file: PathBuf,

    /// Maximum log level (error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    pub log_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: None,
            cols: None,
            seed: None,
            generator: Generator::RecurBacktrack,
            solver: Solver::AStar,
            tick_ms: 16,
            log_file: PathBuf::from("mazesim.log"),
            log_level: Level::INFO,
        }
    }
}

impl Config {
    /// Reject explicit dimensions the engine cannot lay out a maze in.
    pub fn validate(&self) -> Result<(), Error> {
        let rows = self.rows.unwrap_or(MIN_DIMENSION);
        let cols = self.cols.unwrap_or(MIN_DIMENSION);
        if rows < MIN_DIMENSION || cols < MIN_DIMENSION {
            return Err(Error::InvalidDimensions {
                rows,
                cols,
                min: MIN_DIMENSION,
            });
        }
        Ok(())
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["mazesim"]).expect("defaults parse");
        assert_eq!(config.generator, Generator::RecurBacktrack);
        assert_eq!(config.solver, Solver::AStar);
        assert_eq!(config.tick(), Duration::from_millis(16));
        assert_eq!(config.log_level, Level::INFO);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_arguments() {
        let config = Config::try_parse_from([
            "mazesim",
            "--rows",
            "21",
            "--cols",
            "31",
            "--seed",
            "7",
            "--generator",
            "kruskal",
            "--solver",
            "bfs",
            "--tick-ms",
            "0",
            "--log-level",
            "debug",
        ])
        .expect("arguments parse");
        assert_eq!(config.rows, Some(21));
        assert_eq!(config.cols, Some(31));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.generator, Generator::Kruskal);
        assert_eq!(config.solver, Solver::Bfs);
        assert_eq!(config.tick(), Duration::from_millis(1));
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn test_validate_rejects_small_grids() {
        let config = Config {
            rows: Some(4),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidDimensions { rows: 4, .. })
        ));
    }

    #[test]
    fn test_unknown_generator_rejected() {
        assert!(Config::try_parse_from(["mazesim", "--generator", "eller"]).is_err());
    }
}
