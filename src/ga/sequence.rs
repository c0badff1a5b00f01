use std::cmp::Ordering;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use super::scheduler::LandingTimeScheduler;
use crate::model::{Aircraft, AircraftStaticData};

/// Landing order heuristic used to seed fresh sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceOrder {
    ByTargetTime,
    /// Aircraft start at their latest time, ordered by it.
    ByLatestTime,
    /// Aircraft start at their earliest time, ordered by it.
    ByEarliestTime,
    /// Highest after-target penalty lands first.
    ByPenaltyCost,
    /// Aircraft start at a random time near their target, ordered by it.
    ByRandomTimes,
    Shuffled,
}

/// Builds orderings of fresh aircraft from the shared static data.
#[derive(Debug, Clone)]
pub struct LandingSequenceCreator {
    aircrafts: Vec<Arc<AircraftStaticData>>,
    scheduler: LandingTimeScheduler,
}

impl LandingSequenceCreator {
    pub fn new(aircrafts: Vec<Arc<AircraftStaticData>>, scheduler: LandingTimeScheduler) -> Self {
        LandingSequenceCreator { aircrafts, scheduler }
    }

    pub fn nb_aircrafts(&self) -> usize {
        self.aircrafts.len()
    }

    pub fn create<R: Rng>(&self, order: SequenceOrder, rng: &mut R) -> Vec<Aircraft> {
        match order {
            SequenceOrder::ByTargetTime => self.sorted_by_target_times(),
            SequenceOrder::ByLatestTime => self.sorted_by_latest_times(),
            SequenceOrder::ByEarliestTime => self.sorted_by_earliest_times(),
            SequenceOrder::ByPenaltyCost => self.sorted_by_penalty_cost(),
            SequenceOrder::ByRandomTimes => self.sorted_by_random_times(rng),
            SequenceOrder::Shuffled => self.shuffled(rng),
        }
    }

    pub fn sorted_by_target_times(&self) -> Vec<Aircraft> {
        let mut sequence = self.fresh(|data| data.target_landing_time);
        sequence.sort_by_key(Aircraft::landing_time);
        sequence
    }

    pub fn sorted_by_latest_times(&self) -> Vec<Aircraft> {
        let mut sequence = self.fresh(|data| data.latest_landing_time);
        sequence.sort_by_key(Aircraft::landing_time);
        sequence
    }

    pub fn sorted_by_earliest_times(&self) -> Vec<Aircraft> {
        let mut sequence = self.fresh(|data| data.earliest_landing_time);
        sequence.sort_by_key(Aircraft::landing_time);
        sequence
    }

    pub fn sorted_by_penalty_cost(&self) -> Vec<Aircraft> {
        let mut sequence = self.fresh(|data| data.target_landing_time);
        sequence.sort_by(|a, b| {
            let a = a.data().landing_after_target_time_penalty_cost;
            let b = b.data().landing_after_target_time_penalty_cost;
            b.partial_cmp(&a).unwrap_or(Ordering::Equal)
        });
        sequence
    }

    pub fn sorted_by_random_times<R: Rng>(&self, rng: &mut R) -> Vec<Aircraft> {
        let mut sequence = self.fresh(|data| data.target_landing_time);
        for aircraft in sequence.iter_mut() {
            let time = self.scheduler.random_time(aircraft, rng);
            aircraft.set_landing_time(time);
        }
        sequence.sort_by_key(Aircraft::landing_time);
        sequence
    }

    pub fn shuffled<R: Rng>(&self, rng: &mut R) -> Vec<Aircraft> {
        let mut sequence = self.fresh(|data| data.target_landing_time);
        sequence.shuffle(rng);
        sequence
    }

    fn fresh(&self, initial_time: impl Fn(&AircraftStaticData) -> isize) -> Vec<Aircraft> {
        self.aircrafts
            .iter()
            .map(|data| Aircraft::with_landing_time(data.clone(), initial_time(data)))
            .collect()
    }
}
