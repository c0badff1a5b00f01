use rand::Rng;

use super::fitness::FitnessEvaluator;
use super::scheduler::{LandingTimeScheduler, ScheduleStrategy};
use super::sequence::{LandingSequenceCreator, SequenceOrder};
use crate::model::{Aircraft, Individual};

/// An ordering heuristic combined with a scheduling heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreationStrategy {
    pub order: SequenceOrder,
    pub schedule: ScheduleStrategy,
}

impl CreationStrategy {
    pub const fn new(order: SequenceOrder, schedule: ScheduleStrategy) -> Self {
        CreationStrategy { order, schedule }
    }
}

/// Deterministic seeds placed first in every initial population.
pub const DETERMINISTIC_STRATEGIES: [CreationStrategy; 3] = [
    CreationStrategy::new(SequenceOrder::ByTargetTime, ScheduleStrategy::TargetTimesFromBegin),
    CreationStrategy::new(SequenceOrder::ByPenaltyCost, ScheduleStrategy::TargetTimesFromBegin),
    CreationStrategy::new(SequenceOrder::ByLatestTime, ScheduleStrategy::TargetTimesFromBegin),
];

/// Strategies drawn at random to fill the rest of the population.
pub const RANDOMIZED_STRATEGIES: [CreationStrategy; 7] = [
    CreationStrategy::new(SequenceOrder::ByRandomTimes, ScheduleStrategy::FromBegin),
    CreationStrategy::new(SequenceOrder::ByRandomTimes, ScheduleStrategy::FromEnd),
    CreationStrategy::new(SequenceOrder::Shuffled, ScheduleStrategy::TargetTimesFromBegin),
    CreationStrategy::new(SequenceOrder::Shuffled, ScheduleStrategy::RandomTimesFromBegin),
    CreationStrategy::new(SequenceOrder::ByTargetTime, ScheduleStrategy::RandomTimesFromBegin),
    CreationStrategy::new(SequenceOrder::ByTargetTime, ScheduleStrategy::InterpolatedTargetTimes),
    CreationStrategy::new(SequenceOrder::ByEarliestTime, ScheduleStrategy::TargetTimesFromEnd),
];

/// Produces fitness scored individuals from creation strategies.
#[derive(Debug, Clone)]
pub struct IndividualCreator {
    sequences: LandingSequenceCreator,
    scheduler: LandingTimeScheduler,
    evaluator: FitnessEvaluator,
}

impl IndividualCreator {
    pub fn new(sequences: LandingSequenceCreator, scheduler: LandingTimeScheduler, evaluator: FitnessEvaluator) -> Self {
        IndividualCreator { sequences, scheduler, evaluator }
    }

    pub fn nb_aircrafts(&self) -> usize {
        self.sequences.nb_aircrafts()
    }

    pub fn create<R: Rng>(&self, strategy: CreationStrategy, rng: &mut R) -> Individual {
        let sequence = self.sequences.create(strategy.order, rng);
        self.schedule_and_evaluate(sequence, strategy.schedule, rng)
    }

    pub fn create_random<R: Rng>(&self, rng: &mut R) -> Individual {
        let strategy = RANDOMIZED_STRATEGIES[rng.gen_range(0..RANDOMIZED_STRATEGIES.len())];
        self.create(strategy, rng)
    }

    /// Schedules an existing order and wraps it with its fitness.
    pub fn schedule_and_evaluate<R: Rng>(
        &self,
        mut sequence: Vec<Aircraft>,
        schedule: ScheduleStrategy,
        rng: &mut R,
    ) -> Individual {
        self.scheduler.schedule(schedule, &mut sequence, rng);
        let fitness = self.evaluator.evaluate(&sequence);
        Individual::new(sequence, fitness)
    }

    /// Deterministic seeds first, then random strategies up to `size` individuals.
    pub fn create_population<R: Rng>(&self, size: usize, rng: &mut R) -> Vec<Individual> {
        let mut individuals: Vec<Individual> = DETERMINISTIC_STRATEGIES
            .iter()
            .take(size)
            .map(|strategy| self.create(*strategy, rng))
            .collect();
        while individuals.len() < size {
            individuals.push(self.create_random(rng));
        }
        individuals
    }
}
