//! Heuristic solver for the single runway aircraft landing problem.
//!
//! The [`ga`] module holds the genetic algorithm, [`model`] the aircraft,
//! individuals and populations it evolves. [`instance`], [`generate`] and
//! [`resolution`] read, build and solve problem instances from the command line.

pub mod error;
pub mod ga;
pub mod generate;
pub mod instance;
pub mod model;
pub mod resolution;
