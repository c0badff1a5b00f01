use std::{fs::File, io::BufWriter, time::Duration};

use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::error::{InstanceError, ShellError};
use crate::ga::{GaConfig, GeneticAlgorithm, LandingTimeScheduler, DEFAULT_RANDOM_WINDOW};
use crate::generate::seeded_rng;
use crate::instance::AlpInstance;
use crate::model::{PopulationConfig, Solution};

#[derive(Debug, Args)]
pub struct Solve {
    /// The path to the instance file (json, or OR-Library text for any other extension)
    #[clap(short, long)]
    pub instance: String,
    /// Number of individuals in the population
    #[clap(short, long, default_value="400")]
    pub population: usize,
    /// Share of the population selected as parents each generation
    #[clap(short, long, default_value="0.4")]
    pub reproduction_rate: f64,
    /// Share of the population mutated each generation
    #[clap(short, long, default_value="0.5")]
    pub mutation_rate: f64,
    /// Maximum number of generations
    #[clap(short, long, default_value="900")]
    pub generations: usize,
    /// Share of the generations without improvement after which the run stops
    #[clap(long, default_value_t=2.0 / 3.0)]
    pub stagnation_ratio: f64,
    /// Share of the sorted population, from the best, that is never mutated
    #[clap(long, default_value="0.5")]
    pub mutation_window: f64,
    /// Half width of the window random landing times are drawn from around a target
    #[clap(long, default_value_t=DEFAULT_RANDOM_WINDOW)]
    pub random_window: isize,
    /// An optional seed to make the run reproducible
    #[clap(short, long)]
    pub seed: Option<u128>,
    /// timeout in seconds
    #[clap(short, long)]
    pub timeout: Option<u64>,
    /// If present, the path where to write the json report
    #[clap(short, long)]
    pub output: Option<String>,
}

/// Serializable summary of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveReport {
    pub cost: Option<isize>,
    pub feasible: bool,
    pub generations: usize,
    pub max_generations: usize,
    pub generations_without_improvement: usize,
    pub termination: String,
    pub landings: Vec<Landing>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Landing {
    pub aircraft: usize,
    pub landing_time: isize,
    pub target: isize,
}

impl From<&Solution> for SolveReport {
    fn from(solution: &Solution) -> Self {
        let best = &solution.best_individual;
        SolveReport {
            cost: best.is_feasible().then(|| best.fitness()),
            feasible: best.is_feasible(),
            generations: solution.generation_count,
            max_generations: solution.max_generations,
            generations_without_improvement: solution.generations_without_improvement,
            termination: solution.termination.to_string(),
            landings: best
                .landing_sequence()
                .iter()
                .map(|a| Landing { aircraft: a.id(), landing_time: a.landing_time(), target: a.target() })
                .collect(),
        }
    }
}

impl Solve {
    pub fn config(&self) -> Result<GaConfig, ShellError> {
        let population = PopulationConfig::new(self.population, self.reproduction_rate, self.mutation_rate)?;
        let config = GaConfig::default()
            .with_population(population)
            .with_max_generations(self.generations)
            .with_stagnation_ratio(self.stagnation_ratio)
            .with_mutation_window(self.mutation_window)
            .with_time_limit(self.timeout.map(Duration::from_secs));
        config.validate()?;
        Ok(config)
    }

    pub fn solve(&self) -> Result<SolveReport, ShellError> {
        let instance = AlpInstance::load(&self.instance)?;
        let config = self.config()?;
        info!(instance = %self.instance, aircrafts = instance.nb_aircrafts, "instance loaded");

        let scheduler = LandingTimeScheduler::new(self.random_window.max(0));
        let mut algorithm = GeneticAlgorithm::with_scheduler(instance.aircrafts(), config, scheduler, seeded_rng(self.seed))?;
        let solution = algorithm.execute()?;
        let report = SolveReport::from(&solution);

        println!("{solution}");
        for landing in report.landings.iter() {
            println!("aircraft {:>4} lands at {:>6} (target {:>6})", landing.aircraft, landing.landing_time, landing.target);
        }

        if let Some(output) = self.output.as_ref() {
            let file = File::create(output).map_err(|source| InstanceError::Io { path: output.into(), source })?;
            serde_json::to_writer_pretty(BufWriter::new(file), &report).map_err(InstanceError::from)?;
        }

        Ok(report)
    }
}
