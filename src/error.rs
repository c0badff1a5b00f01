//! Error types shared by the solver core and the command line shell.

use std::path::PathBuf;

/// Invalid parameters, detected before any generation runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("population needs at least {min} individuals, got {actual}")]
    TooFewIndividuals { min: usize, actual: usize },

    #[error("{name} must lie in {range}, got {value}")]
    RateOutOfRange { name: &'static str, range: &'static str, value: f64 },

    #[error("selection of {count} pairs needs {needed} individuals but the population holds {available}")]
    SelectionExceedsPopulation { count: usize, needed: usize, available: usize },

    #[error("max generations must be positive")]
    NoGenerations,

    #[error("population expected {expected} individuals, got {actual}")]
    PopulationSize { expected: usize, actual: usize },

    #[error("problem instance holds no aircraft")]
    NoAircraft,

    #[error("aircraft at position {position} carries id {id}")]
    AircraftId { position: usize, id: usize },

    #[error("aircraft {id} has {actual} gap times, expected {expected}")]
    GapVectorLength { id: usize, expected: usize, actual: usize },
}

/// Internal fault raised while a generation is being computed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StepError {
    #[error("population is empty")]
    EmptyPopulation,

    #[error("individual index {index} is out of range for a population of {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Failure of a whole genetic algorithm run.
#[derive(Debug, thiserror::Error)]
pub enum AlgorithmError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("an error has occurred while running generation {generation}")]
    Aborted {
        generation: usize,
        #[source]
        source: StepError,
    },

    #[error("cannot {action} an algorithm in state {state:?}")]
    InvalidState { action: &'static str, state: crate::ga::AlgorithmState },
}

/// Problems met while reading or checking an instance file.
#[derive(Debug, thiserror::Error)]
pub enum InstanceError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed json instance: {0}")]
    Json(#[from] serde_json::Error),

    #[error("token {position} ({token:?}) is not a valid {expected}")]
    Token { position: usize, token: String, expected: &'static str },

    #[error("instance ended early, expected {expected} at token {position}")]
    UnexpectedEnd { position: usize, expected: &'static str },

    #[error("invalid instance: {0}")]
    Invalid(String),
}

/// Anything that stops a command line subcommand.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error(transparent)]
    Instance(#[from] InstanceError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Algorithm(#[from] AlgorithmError),
}
