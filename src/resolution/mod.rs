//! The `solve` subcommand: runs the genetic algorithm on an instance file.

mod solve;

pub use solve::{Landing, Solve, SolveReport};
