//! Genetic algorithm for the single runway aircraft landing problem.
//!
//! An individual is a landing order with concrete landing times. Orders come
//! from [`LandingSequenceCreator`] heuristics, times from a
//! [`LandingTimeScheduler`] sweep, and the [`FitnessEvaluator`] scores the
//! result. The [`GeneticAlgorithm`] then improves the population through
//! selection, crossover and mutation.

mod algorithm;
mod creator;
mod fitness;
pub mod operators;
mod scheduler;
mod sequence;

pub use algorithm::{AlgorithmState, GaConfig, GeneticAlgorithm};
pub use creator::{CreationStrategy, IndividualCreator, DETERMINISTIC_STRATEGIES, RANDOMIZED_STRATEGIES};
pub use fitness::FitnessEvaluator;
pub use operators::{CrossoverOperator, MutationOperator, SelectionOperator};
pub use scheduler::{LandingTimeScheduler, ScheduleStrategy, DEFAULT_RANDOM_WINDOW};
pub use sequence::{LandingSequenceCreator, SequenceOrder};
