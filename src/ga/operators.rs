//! Selection, crossover and mutation operators.
//!
//! Operators never reorder the population themselves, they hand slots or new
//! individuals back to the [`GeneticAlgorithm`](super::GeneticAlgorithm).

use rand::seq::SliceRandom;
use rand::Rng;

use super::fitness::FitnessEvaluator;
use super::scheduler::{LandingTimeScheduler, ScheduleStrategy};
use crate::error::ConfigError;
use crate::model::{Individual, Parents, Population, PopulationConfig};

/// Number of random rescheduled clones made from each parent by default.
pub const DEFAULT_RANDOM_CLONES: usize = 2;

/// Pairs neighbours from the head of the fitness sorted population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionOperator {
    count: usize,
}

impl SelectionOperator {
    /// Fails when the configured rate asks for more pairs than the population can provide.
    pub fn new(config: &PopulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let count = config.selection_count();
        if count + 1 > config.max_individuals() {
            return Err(ConfigError::SelectionExceedsPopulation {
                count,
                needed: count + 1,
                available: config.max_individuals(),
            });
        }
        Ok(SelectionOperator { count })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Sorts the population, then pairs slot `i` with slot `i + 1` for the first `count` slots.
    pub fn select_parents(&self, population: &mut Population) -> Vec<Parents> {
        population.sort_by_fitness();
        let count = self.count.min(population.len().saturating_sub(1));
        (0..count).map(|i| Parents::new(i, i + 1)).collect()
    }
}

/// Breeds by exploring alternative landing times of each parent's order.
///
/// Every parent is cloned once with target times and `random_clones` times with
/// random perturbations. The fittest clone wins, so parents are never modified.
#[derive(Debug, Clone, Copy)]
pub struct CrossoverOperator {
    scheduler: LandingTimeScheduler,
    evaluator: FitnessEvaluator,
    random_clones: usize,
}

impl CrossoverOperator {
    pub fn new(scheduler: LandingTimeScheduler, evaluator: FitnessEvaluator) -> Self {
        CrossoverOperator { scheduler, evaluator, random_clones: DEFAULT_RANDOM_CLONES }
    }

    pub fn with_random_clones(mut self, random_clones: usize) -> Self {
        self.random_clones = random_clones;
        self
    }

    pub fn execute<R: Rng>(&self, first: &Individual, second: &Individual, rng: &mut R) -> Individual {
        let mut best: Option<Individual> = None;

        for parent in [first, second] {
            let strategies = std::iter::once(ScheduleStrategy::TargetTimesFromBegin).chain(
                (0..self.random_clones).map(|k| match k % 2 {
                    0 => ScheduleStrategy::RandomTimesFromBegin,
                    _ => ScheduleStrategy::RandomTimesFromEnd,
                }),
            );

            for strategy in strategies {
                let candidate = self.reschedule(parent, strategy, rng);
                match &best {
                    Some(current) if !candidate.is_more_adapted_than(current) => {}
                    _ => best = Some(candidate),
                }
            }
        }

        // at least the target time clone of the first parent was produced
        best.unwrap_or_else(|| first.clone())
    }

    fn reschedule<R: Rng>(&self, parent: &Individual, strategy: ScheduleStrategy, rng: &mut R) -> Individual {
        let mut clone = parent.clone();
        self.scheduler.schedule(strategy, clone.landing_sequence_mut(), rng);
        let fitness = self.evaluator.evaluate(clone.landing_sequence());
        clone.set_fitness(fitness);
        clone
    }
}

/// Reshuffles an individual and gives it random landing times near the targets.
#[derive(Debug, Clone, Copy)]
pub struct MutationOperator {
    scheduler: LandingTimeScheduler,
    evaluator: FitnessEvaluator,
}

impl MutationOperator {
    pub fn new(scheduler: LandingTimeScheduler, evaluator: FitnessEvaluator) -> Self {
        MutationOperator { scheduler, evaluator }
    }

    pub fn execute<R: Rng>(&self, individual: &mut Individual, rng: &mut R) {
        let sequence = individual.landing_sequence_mut();
        sequence.shuffle(rng);
        self.scheduler.schedule_random_times_from_begin(sequence, rng);
        let fitness = self.evaluator.evaluate(individual.landing_sequence());
        individual.set_fitness(fitness);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::creator::{IndividualCreator, DETERMINISTIC_STRATEGIES};
    use crate::ga::sequence::LandingSequenceCreator;
    use crate::model::aircraft::tests::static_data;
    use crate::model::{Aircraft, AircraftStaticData};
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;
    use std::sync::Arc;

    fn aircrafts() -> Vec<Arc<AircraftStaticData>> {
        vec![
            static_data(0, (0, 10, 60), (1.0, 2.0), vec![0, 5, 8]),
            static_data(1, (5, 15, 65), (1.0, 2.0), vec![5, 0, 8]),
            static_data(2, (5, 18, 70), (2.0, 3.0), vec![8, 8, 0]),
        ]
    }

    fn creator() -> IndividualCreator {
        let scheduler = LandingTimeScheduler::default();
        IndividualCreator::new(LandingSequenceCreator::new(aircrafts(), scheduler), scheduler, FitnessEvaluator)
    }

    fn population_of(fitness: &[isize]) -> Population {
        let config = PopulationConfig::new(fitness.len(), 0.4, 0.5).unwrap();
        Population::new(config, fitness.iter().map(|&f| Individual::new(vec![], f)).collect()).unwrap()
    }

    #[test]
    fn test_selection_pairs_fittest_neighbours() {
        let mut population = population_of(&[50, 10, 40, 20, 30]);
        let selection = SelectionOperator::new(population.config()).unwrap();
        assert_eq!(selection.count(), 2);

        let parents = selection.select_parents(&mut population);
        assert_eq!(parents, vec![Parents::new(0, 1), Parents::new(1, 2)]);
        assert_eq!(population.get(0).map(Individual::fitness), Some(10));
        assert_eq!(parents[0].less_adapted(&population), Some(1));
    }

    #[test]
    fn test_selection_rejects_oversized_rate() {
        let config = PopulationConfig::new(4, 1.0, 0.5).unwrap();
        assert_eq!(
            SelectionOperator::new(&config),
            Err(ConfigError::SelectionExceedsPopulation { count: 4, needed: 5, available: 4 })
        );
        assert!(SelectionOperator::new(&PopulationConfig::new(4, 0.75, 0.5).unwrap()).is_ok());
    }

    #[test]
    fn test_crossover_leaves_parents_untouched() {
        let creator = creator();
        let mut rng = ChaChaRng::seed_from_u64(3);
        let first = creator.create(DETERMINISTIC_STRATEGIES[1], &mut rng);
        let second = creator.create_random(&mut rng);
        let (first_copy, second_copy) = (first.clone(), second.clone());

        let crossover = CrossoverOperator::new(LandingTimeScheduler::default(), FitnessEvaluator);
        let offspring = crossover.execute(&first, &second, &mut rng);

        assert_eq!(first, first_copy);
        assert_eq!(second, second_copy);
        assert_eq!(offspring.fitness(), FitnessEvaluator.evaluate(offspring.landing_sequence()));
    }

    #[test]
    fn test_crossover_keeps_an_order_of_a_parent() {
        let creator = creator();
        let mut rng = ChaChaRng::seed_from_u64(8);
        let first = creator.create(DETERMINISTIC_STRATEGIES[0], &mut rng);
        let second = creator.create(DETERMINISTIC_STRATEGIES[2], &mut rng);

        let crossover = CrossoverOperator::new(LandingTimeScheduler::default(), FitnessEvaluator).with_random_clones(5);
        let offspring = crossover.execute(&first, &second, &mut rng);
        let order = |i: &Individual| i.landing_sequence().iter().map(Aircraft::id).collect::<Vec<_>>();
        assert!(order(&offspring) == order(&first) || order(&offspring) == order(&second));
        assert!(offspring.fitness() <= first.fitness().min(second.fitness()));
    }

    #[test]
    fn test_mutation_preserves_aircraft_and_rescores() {
        let creator = creator();
        let mut rng = ChaChaRng::seed_from_u64(13);
        let mut individual = creator.create(DETERMINISTIC_STRATEGIES[0], &mut rng);

        let mutation = MutationOperator::new(LandingTimeScheduler::default(), FitnessEvaluator);
        for _ in 0..20 {
            mutation.execute(&mut individual, &mut rng);
            let mut ids: Vec<_> = individual.landing_sequence().iter().map(Aircraft::id).collect();
            ids.sort_unstable();
            assert_eq!(ids, vec![0, 1, 2]);
            assert_eq!(individual.fitness(), FitnessEvaluator.evaluate(individual.landing_sequence()));
            assert!(individual.landing_sequence().windows(2).all(|w| w[1].respects_gap_after(&w[0])));
        }
    }

    #[test]
    fn test_single_aircraft_operators() {
        let data = vec![static_data(0, (0, 10, 20), (1.0, 1.0), vec![0])];
        let scheduler = LandingTimeScheduler::default();
        let creator = IndividualCreator::new(LandingSequenceCreator::new(data, scheduler), scheduler, FitnessEvaluator);
        let mut rng = ChaChaRng::seed_from_u64(1);

        let individuals = creator.create_population(3, &mut rng);
        let config = PopulationConfig::new(3, 0.4, 0.5).unwrap();
        let mut population = Population::new(config, individuals).unwrap();
        let selection = SelectionOperator::new(&config).unwrap();
        let parents = selection.select_parents(&mut population);
        assert_eq!(parents.len(), 1);

        let (first, second) = (population.get(0).unwrap(), population.get(1).unwrap());
        let offspring = CrossoverOperator::new(scheduler, FitnessEvaluator).execute(first, second, &mut rng);
        assert_eq!(offspring.fitness(), 0);

        let mut mutated = offspring.clone();
        MutationOperator::new(scheduler, FitnessEvaluator).execute(&mut mutated, &mut rng);
        assert_eq!(mutated.len(), 1);
        assert!(mutated.is_feasible());
    }
}
