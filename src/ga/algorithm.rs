//! Generational loop of the landing genetic algorithm.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info, trace};

use super::creator::IndividualCreator;
use super::fitness::FitnessEvaluator;
use super::operators::{CrossoverOperator, MutationOperator, SelectionOperator};
use super::scheduler::LandingTimeScheduler;
use super::sequence::LandingSequenceCreator;
use crate::error::{AlgorithmError, ConfigError, StepError};
use crate::model::{AircraftStaticData, Cost, Individual, Population, PopulationConfig, Solution, TerminationReason};

/// Upper bound on the fitness history reserved up front.
const HISTORY_RESERVE: usize = 1024;

/// Run parameters of the genetic algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct GaConfig {
    pub population: PopulationConfig,
    pub max_generations: usize,
    /// Fraction of `max_generations` without improvement after which the run stops
    pub stagnation_ratio: f64,
    /// Fraction of the sorted population, from the best, that mutation never touches
    pub mutation_window: f64,
    pub time_limit: Option<Duration>,
}

impl Default for GaConfig {
    fn default() -> Self {
        GaConfig {
            population: PopulationConfig::default(),
            max_generations: 900,
            stagnation_ratio: 2.0 / 3.0,
            mutation_window: 0.5,
            time_limit: None,
        }
    }
}

impl GaConfig {
    pub fn with_population(mut self, population: PopulationConfig) -> Self {
        self.population = population;
        self
    }

    pub fn with_max_generations(mut self, max_generations: usize) -> Self {
        self.max_generations = max_generations;
        self
    }

    pub fn with_stagnation_ratio(mut self, stagnation_ratio: f64) -> Self {
        self.stagnation_ratio = stagnation_ratio;
        self
    }

    pub fn with_mutation_window(mut self, mutation_window: f64) -> Self {
        self.mutation_window = mutation_window;
        self
    }

    pub fn with_time_limit(mut self, time_limit: Option<Duration>) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.population.validate()?;
        if self.max_generations == 0 {
            return Err(ConfigError::NoGenerations);
        }
        if !(self.stagnation_ratio > 0.0 && self.stagnation_ratio <= 1.0) {
            return Err(ConfigError::RateOutOfRange {
                name: "stagnation ratio",
                range: "(0, 1]",
                value: self.stagnation_ratio,
            });
        }
        if !(0.0..1.0).contains(&self.mutation_window) {
            return Err(ConfigError::RateOutOfRange { name: "mutation window", range: "[0, 1)", value: self.mutation_window });
        }
        Ok(())
    }

    /// Generations without improvement tolerated before stopping.
    pub fn stagnation_limit(&self) -> usize {
        (self.max_generations as f64 * self.stagnation_ratio).floor() as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmState {
    Uninitialized,
    Initialized,
    Evolving,
    Terminated,
}

/// Evolves landing schedules for one problem instance.
///
/// All mutable run state, including the best individual found so far, lives in
/// this struct so that independent runs never interfere.
pub struct GeneticAlgorithm<R: Rng> {
    config: GaConfig,
    creator: IndividualCreator,
    selection: SelectionOperator,
    crossover: CrossoverOperator,
    mutation: MutationOperator,
    rng: R,
    state: AlgorithmState,
    population: Option<Population>,
    best: Option<Individual>,
    generation: usize,
    generations_without_improvement: usize,
    best_fitness_history: Vec<Cost>,
}

impl<R: Rng> GeneticAlgorithm<R> {
    pub fn new(aircrafts: Vec<Arc<AircraftStaticData>>, config: GaConfig, rng: R) -> Result<Self, ConfigError> {
        Self::with_scheduler(aircrafts, config, LandingTimeScheduler::default(), rng)
    }

    pub fn with_scheduler(
        aircrafts: Vec<Arc<AircraftStaticData>>,
        config: GaConfig,
        scheduler: LandingTimeScheduler,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        check_aircrafts(&aircrafts)?;
        let selection = SelectionOperator::new(&config.population)?;

        let evaluator = FitnessEvaluator::new();
        let sequences = LandingSequenceCreator::new(aircrafts, scheduler);

        Ok(GeneticAlgorithm {
            creator: IndividualCreator::new(sequences, scheduler, evaluator),
            selection,
            crossover: CrossoverOperator::new(scheduler, evaluator),
            mutation: MutationOperator::new(scheduler, evaluator),
            rng,
            state: AlgorithmState::Uninitialized,
            population: None,
            best: None,
            generation: 0,
            generations_without_improvement: 0,
            best_fitness_history: Vec::with_capacity(config.max_generations.min(HISTORY_RESERVE)),
            config,
        })
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    pub fn state(&self) -> AlgorithmState {
        self.state
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn best_individual(&self) -> Option<&Individual> {
        self.best.as_ref()
    }

    pub fn population(&self) -> Option<&Population> {
        self.population.as_ref()
    }

    /// Seeds the initial population.
    pub fn initialize(&mut self) -> Result<(), AlgorithmError> {
        if self.state != AlgorithmState::Uninitialized {
            return Err(AlgorithmError::InvalidState { action: "initialize", state: self.state });
        }

        let size = self.config.population.max_individuals();
        let individuals = self.creator.create_population(size, &mut self.rng);
        let mut population = Population::new(self.config.population, individuals)?;
        population.sort_by_fitness();

        if let Some(seed) = population.most_adapted() {
            debug!(size, best = seed.fitness(), "initial population created");
        }

        self.population = Some(population);
        self.generation = 1;
        self.state = AlgorithmState::Initialized;
        Ok(())
    }

    /// Runs generations until a stop condition holds and returns the final snapshot.
    pub fn execute(&mut self) -> Result<Solution, AlgorithmError> {
        match self.state {
            AlgorithmState::Uninitialized => self.initialize()?,
            AlgorithmState::Initialized => {}
            state => return Err(AlgorithmError::InvalidState { action: "execute", state }),
        }

        info!(
            aircrafts = self.creator_size(),
            individuals = self.config.population.max_individuals(),
            max_generations = self.config.max_generations,
            "genetic algorithm started"
        );

        self.state = AlgorithmState::Evolving;
        let started = Instant::now();
        let result = self.evolve(started);
        self.state = AlgorithmState::Terminated;

        let termination = result.map_err(|source| AlgorithmError::Aborted { generation: self.generation, source })?;
        let solution = self.solution(termination).map_err(|source| AlgorithmError::Aborted { generation: self.generation, source })?;

        info!(
            cost = solution.cost(),
            generations = solution.generation_count,
            without_improvement = solution.generations_without_improvement,
            reason = %solution.termination,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "genetic algorithm finished"
        );
        Ok(solution)
    }

    fn evolve(&mut self, started: Instant) -> Result<TerminationReason, StepError> {
        let stagnation_limit = self.config.stagnation_limit();

        loop {
            if self.generations_without_improvement > stagnation_limit {
                return Ok(TerminationReason::Stagnation);
            }
            if self.generation >= self.config.max_generations {
                return Ok(TerminationReason::GenerationLimit);
            }
            if self.config.time_limit.is_some_and(|limit| started.elapsed() >= limit) {
                return Ok(TerminationReason::Deadline);
            }

            self.step()?;
            self.generation += 1;
        }
    }

    /// One generation: best tracking, selection, reproduction and mutation.
    fn step(&mut self) -> Result<(), StepError> {
        self.track_best_individual()?;
        let population = self.population.as_mut().ok_or(StepError::EmptyPopulation)?;

        let parents = self.selection.select_parents(population);
        let mut replaced = 0;
        for pair in parents {
            let first = population.get(pair.first).ok_or(out_of_range(pair.first, population))?;
            let second = population.get(pair.second).ok_or(out_of_range(pair.second, population))?;
            let offspring = self.crossover.execute(first, second, &mut self.rng);

            let slot = pair.less_adapted(population).ok_or(StepError::EmptyPopulation)?;
            let parent = population.get(slot).ok_or(out_of_range(slot, population))?;
            if offspring.is_more_adapted_than(parent) {
                population.replace(slot, offspring);
                replaced += 1;
            }
        }

        population.sort_by_fitness();
        let size = population.len();
        let start = (size as f64 * self.config.mutation_window).floor() as usize;
        let count = population.config().mutation_count();
        if start < size {
            for _ in 0..count {
                let index = self.rng.gen_range(start..size);
                let individual = population.get_mut(index).ok_or(StepError::IndexOutOfRange { index, len: size })?;
                self.mutation.execute(individual, &mut self.rng);
            }
        }
        population.sort_by_fitness();

        trace!(generation = self.generation, replaced, mutated = count, "generation completed");
        Ok(())
    }

    /// Compares the current generation's best with the global best and updates the stagnation counter.
    fn track_best_individual(&mut self) -> Result<(), StepError> {
        let population = self.population.as_mut().ok_or(StepError::EmptyPopulation)?;
        let candidate = population.most_adapted().ok_or(StepError::EmptyPopulation)?;

        match &self.best {
            None => self.best = Some(candidate.clone()),
            Some(best) if candidate.is_more_adapted_than(best) => {
                debug!(generation = self.generation, from = best.fitness(), to = candidate.fitness(), "global best improved");
                self.best = Some(candidate.clone());
                self.generations_without_improvement = 0;
            }
            Some(_) => self.generations_without_improvement += 1,
        }

        if let Some(best) = &self.best {
            self.best_fitness_history.push(best.fitness());
        }
        Ok(())
    }

    fn solution(&mut self, termination: TerminationReason) -> Result<Solution, StepError> {
        let population = self.population.as_mut().ok_or(StepError::EmptyPopulation)?;
        let candidate = population.most_adapted().ok_or(StepError::EmptyPopulation)?;

        // the last generation has not been compared yet
        let best = match self.best.take() {
            Some(best) if !candidate.is_more_adapted_than(&best) => best,
            _ => {
                self.generations_without_improvement = 0;
                self.best_fitness_history.push(candidate.fitness());
                candidate.clone()
            }
        };
        self.best = Some(best.clone());

        Ok(Solution {
            population: population.clone(),
            best_individual: best,
            max_generations: self.config.max_generations,
            generation_count: self.generation,
            generations_without_improvement: self.generations_without_improvement,
            termination,
            best_fitness_history: self.best_fitness_history.clone(),
        })
    }

    fn creator_size(&self) -> usize {
        self.creator.nb_aircrafts()
    }
}

fn out_of_range(index: usize, population: &Population) -> StepError {
    StepError::IndexOutOfRange { index, len: population.len() }
}

fn check_aircrafts(aircrafts: &[Arc<AircraftStaticData>]) -> Result<(), ConfigError> {
    if aircrafts.is_empty() {
        return Err(ConfigError::NoAircraft);
    }
    for (position, aircraft) in aircrafts.iter().enumerate() {
        if aircraft.aircraft_id != position {
            return Err(ConfigError::AircraftId { position, id: aircraft.aircraft_id });
        }
        if aircraft.gap_time_between_landings.len() != aircrafts.len() {
            return Err(ConfigError::GapVectorLength {
                id: position,
                expected: aircrafts.len(),
                actual: aircraft.gap_time_between_landings.len(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::aircraft::tests::static_data;
    use crate::model::Aircraft;
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    fn two_aircrafts() -> Vec<Arc<AircraftStaticData>> {
        vec![static_data(0, (0, 10, 20), (1.0, 2.0), vec![0, 5]), static_data(1, (5, 15, 25), (1.0, 2.0), vec![5, 0])]
    }

    fn small_config() -> GaConfig {
        GaConfig::default().with_population(PopulationConfig::new(10, 0.4, 0.3).unwrap()).with_max_generations(30)
    }

    #[test]
    fn test_config_validation() {
        assert!(GaConfig::default().validate().is_ok());
        assert_eq!(GaConfig::default().stagnation_limit(), 600);
        assert_eq!(GaConfig::default().with_max_generations(0).validate(), Err(ConfigError::NoGenerations));
        assert!(matches!(
            GaConfig::default().with_stagnation_ratio(0.0).validate(),
            Err(ConfigError::RateOutOfRange { name: "stagnation ratio", .. })
        ));
        assert!(matches!(
            GaConfig::default().with_mutation_window(1.0).validate(),
            Err(ConfigError::RateOutOfRange { name: "mutation window", .. })
        ));
    }

    #[test]
    fn test_new_rejects_inconsistent_aircrafts() {
        let rng = || ChaChaRng::seed_from_u64(0);
        assert!(matches!(GeneticAlgorithm::new(vec![], small_config(), rng()), Err(ConfigError::NoAircraft)));

        let wrong_id = vec![static_data(1, (0, 10, 20), (1.0, 1.0), vec![0])];
        assert!(matches!(GeneticAlgorithm::new(wrong_id, small_config(), rng()), Err(ConfigError::AircraftId { .. })));

        let short_gaps = vec![static_data(0, (0, 10, 20), (1.0, 1.0), vec![0]), static_data(1, (0, 10, 20), (1.0, 1.0), vec![0, 0])];
        assert!(matches!(
            GeneticAlgorithm::new(short_gaps, small_config(), rng()),
            Err(ConfigError::GapVectorLength { id: 0, expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_new_rejects_oversized_selection() {
        let config = small_config().with_population(PopulationConfig::new(3, 1.0, 0.5).unwrap());
        let result = GeneticAlgorithm::new(two_aircrafts(), config, ChaChaRng::seed_from_u64(0));
        assert!(matches!(result, Err(ConfigError::SelectionExceedsPopulation { .. })));
    }

    #[test]
    fn test_state_machine() {
        let mut ga = GeneticAlgorithm::new(two_aircrafts(), small_config(), ChaChaRng::seed_from_u64(1)).unwrap();
        assert_eq!(ga.state(), AlgorithmState::Uninitialized);

        ga.initialize().unwrap();
        assert_eq!(ga.state(), AlgorithmState::Initialized);
        assert_eq!(ga.generation(), 1);
        assert_eq!(ga.population().map(Population::len), Some(10));
        assert!(matches!(ga.initialize(), Err(AlgorithmError::InvalidState { .. })));

        ga.execute().unwrap();
        assert_eq!(ga.state(), AlgorithmState::Terminated);
        assert!(matches!(ga.execute(), Err(AlgorithmError::InvalidState { action: "execute", .. })));
    }

    #[test]
    fn test_two_aircrafts_reach_zero_cost() {
        let mut ga = GeneticAlgorithm::new(two_aircrafts(), small_config(), ChaChaRng::seed_from_u64(2)).unwrap();
        let solution = ga.execute().unwrap();

        assert_eq!(solution.cost(), 0);
        let times: Vec<_> = solution.best_individual.landing_sequence().iter().map(Aircraft::landing_time).collect();
        assert_eq!(times, vec![10, 15]);
        assert_eq!(solution.population.len(), 10);
        assert!(solution.generation_count <= 30);
    }

    #[test]
    fn test_stagnation_stops_early() {
        let config = small_config().with_max_generations(100).with_stagnation_ratio(0.1);
        let mut ga = GeneticAlgorithm::new(two_aircrafts(), config, ChaChaRng::seed_from_u64(4)).unwrap();
        let solution = ga.execute().unwrap();

        // the optimum is seeded, so nothing ever improves on it
        assert_eq!(solution.termination, TerminationReason::Stagnation);
        assert_eq!(solution.generations_without_improvement, 11);
        assert_eq!(solution.generation_count, 13);
    }

    #[test]
    fn test_generation_limit() {
        let config = small_config().with_max_generations(5);
        let mut ga = GeneticAlgorithm::new(two_aircrafts(), config, ChaChaRng::seed_from_u64(4)).unwrap();
        let solution = ga.execute().unwrap();
        assert_eq!(solution.termination, TerminationReason::GenerationLimit);
        assert_eq!(solution.generation_count, 5);
        assert_eq!(solution.best_fitness_history.len(), 4);
    }

    #[test]
    fn test_zero_time_limit_still_returns_solution() {
        let config = small_config().with_time_limit(Some(Duration::ZERO));
        let mut ga = GeneticAlgorithm::new(two_aircrafts(), config, ChaChaRng::seed_from_u64(4)).unwrap();
        let solution = ga.execute().unwrap();
        assert_eq!(solution.termination, TerminationReason::Deadline);
        assert_eq!(solution.generation_count, 1);
        assert_eq!(solution.cost(), 0);
    }

    #[test]
    fn test_same_seed_same_run() {
        let aircrafts: Vec<_> = (0..6)
            .map(|id| static_data(id, (0, 15 * id as isize, 400), (1.0, 3.0), (0..6).map(|p| if p == id { 0 } else { 20 }).collect()))
            .collect();
        let run = |seed| {
            let mut ga = GeneticAlgorithm::new(aircrafts.clone(), small_config(), ChaChaRng::seed_from_u64(seed)).unwrap();
            ga.execute().unwrap()
        };
        let (a, b) = (run(17), run(17));
        assert_eq!(a.best_individual, b.best_individual);
        assert_eq!(a.best_fitness_history, b.best_fitness_history);
    }

    #[test]
    fn test_huge_generation_limit_does_not_reserve_history() {
        let config = small_config()
            .with_max_generations(usize::MAX / 4)
            .with_stagnation_ratio(0.0001)
            .with_time_limit(Some(Duration::ZERO));
        let mut ga = GeneticAlgorithm::new(two_aircrafts(), config, ChaChaRng::seed_from_u64(5)).unwrap();
        let solution = ga.execute().unwrap();
        assert_eq!(solution.termination, TerminationReason::Deadline);
        assert_eq!(solution.max_generations, usize::MAX / 4);
    }

    #[test]
    fn test_last_generation_improvement_is_recorded() {
        let mut ga = GeneticAlgorithm::new(two_aircrafts(), small_config(), ChaChaRng::seed_from_u64(6)).unwrap();
        ga.initialize().unwrap();

        let mut stale = ga.population.as_mut().and_then(|p| p.most_adapted().cloned()).unwrap();
        stale.set_fitness(stale.fitness() + 100);
        ga.best = Some(stale);
        ga.generations_without_improvement = 7;
        ga.best_fitness_history = vec![100, 100];

        let solution = ga.solution(TerminationReason::GenerationLimit).unwrap();
        assert_eq!(solution.cost(), 0);
        assert_eq!(solution.generations_without_improvement, 0);
        assert_eq!(solution.best_fitness_history, vec![100, 100, 0]);
    }
}
