//! Stepwise maze generation and solving.
//!
//! Three generators (recursive backtracking, randomized Prim's, randomized Kruskal's) and
//! three solvers (DFS, BFS, A*) run as state machines that advance one unit of work per
//! [`simulation::Simulation::step`], so a presentation layer can draw the grid between steps.

pub mod app;
pub mod config;
mod error;
pub mod generators;
pub mod maze;
pub mod metrics;
pub mod simulation;
pub mod solvers;

pub use error::Error;
