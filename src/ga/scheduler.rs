//! Heuristics turning a fixed landing order into concrete landing times.
//!
//! A sweep only enforces the separation between neighbours and never reorders
//! the sequence. Times pushed outside a landing window are left for the
//! [`FitnessEvaluator`](super::FitnessEvaluator) to reject.

use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::model::{Aircraft, Time};

/// Half width of the random landing time window around the target.
pub const DEFAULT_RANDOM_WINDOW: Time = 10;

/// Landing time assignment heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleStrategy {
    /// Push aircraft later to respect their predecessor, keeping preset times otherwise.
    FromBegin,
    /// Pull aircraft earlier to respect their successor, keeping preset times otherwise.
    FromEnd,
    TargetTimesFromBegin,
    TargetTimesFromEnd,
    RandomTimesFromBegin,
    RandomTimesFromEnd,
    /// Target times, forward sweep, then trade lateness for earliness between neighbours.
    InterpolatedTargetTimes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandingTimeScheduler {
    random_window: Time,
}

impl Default for LandingTimeScheduler {
    fn default() -> Self {
        LandingTimeScheduler { random_window: DEFAULT_RANDOM_WINDOW }
    }
}

impl LandingTimeScheduler {
    pub fn new(random_window: Time) -> Self {
        LandingTimeScheduler { random_window: random_window.max(0) }
    }

    pub fn schedule<R: Rng>(&self, strategy: ScheduleStrategy, sequence: &mut [Aircraft], rng: &mut R) {
        match strategy {
            ScheduleStrategy::FromBegin => self.schedule_from_begin(sequence),
            ScheduleStrategy::FromEnd => self.schedule_from_end(sequence),
            ScheduleStrategy::TargetTimesFromBegin => self.schedule_target_times_from_begin(sequence),
            ScheduleStrategy::TargetTimesFromEnd => self.schedule_target_times_from_end(sequence),
            ScheduleStrategy::RandomTimesFromBegin => self.schedule_random_times_from_begin(sequence, rng),
            ScheduleStrategy::RandomTimesFromEnd => self.schedule_random_times_from_end(sequence, rng),
            ScheduleStrategy::InterpolatedTargetTimes => self.schedule_interpolated_target_times(sequence),
        }
    }

    pub fn schedule_from_begin(&self, sequence: &mut [Aircraft]) {
        for i in 1..sequence.len() {
            let (before, after) = sequence.split_at_mut(i);
            let previous = &before[i - 1];
            let current = &mut after[0];
            if !current.respects_gap_after(previous) {
                let time = current.min_landing_time_after(previous);
                current.set_landing_time(time);
            }
        }
    }

    pub fn schedule_from_end(&self, sequence: &mut [Aircraft]) {
        for i in (0..sequence.len().saturating_sub(1)).rev() {
            let (before, after) = sequence.split_at_mut(i + 1);
            let current = &mut before[i];
            let next = &after[0];
            if !next.respects_gap_after(current) {
                let time = next.landing_time() - next.gap_after(current);
                current.set_landing_time(time);
            }
        }
    }

    pub fn schedule_target_times_from_begin(&self, sequence: &mut [Aircraft]) {
        sequence.iter_mut().for_each(Aircraft::reset_to_target);
        self.schedule_from_begin(sequence);
    }

    pub fn schedule_target_times_from_end(&self, sequence: &mut [Aircraft]) {
        sequence.iter_mut().for_each(Aircraft::reset_to_target);
        self.schedule_from_end(sequence);
    }

    pub fn schedule_random_times_from_begin<R: Rng>(&self, sequence: &mut [Aircraft], rng: &mut R) {
        self.assign_random_times(sequence, rng);
        self.schedule_from_begin(sequence);
    }

    pub fn schedule_random_times_from_end<R: Rng>(&self, sequence: &mut [Aircraft], rng: &mut R) {
        self.assign_random_times(sequence, rng);
        self.schedule_from_end(sequence);
    }

    pub fn schedule_interpolated_target_times(&self, sequence: &mut [Aircraft]) {
        self.schedule_target_times_from_begin(sequence);

        for i in 1..sequence.len() {
            let lateness = sequence[i].landing_time() - sequence[i].target();
            if lateness <= 0 {
                continue;
            }
            let previous = &sequence[i - 1];
            if previous.data().landing_before_target_time_penalty_cost
                >= sequence[i].data().landing_after_target_time_penalty_cost
            {
                continue;
            }

            let floor = match i {
                1 => previous.earliest(),
                _ => previous.earliest().max(previous.min_landing_time_after(&sequence[i - 2])),
            };
            let shift = lateness.min(previous.landing_time() - floor);
            if shift <= 0 {
                continue;
            }

            let time = previous.landing_time() - shift;
            sequence[i - 1].set_landing_time(time);
            let current = &sequence[i];
            let anchored = current.target().max(current.earliest()).max(current.min_landing_time_after(&sequence[i - 1]));
            sequence[i].set_landing_time(anchored);
        }
    }

    /// Samples a landing time in `[target - window, target + window]`, clamped to the landing window.
    pub fn random_time<R: Rng>(&self, aircraft: &Aircraft, rng: &mut R) -> Time {
        let target = aircraft.target();
        let time = Uniform::new_inclusive(target.saturating_sub(self.random_window), target.saturating_add(self.random_window)).sample(rng);
        aircraft.data().clamp_to_window(time)
    }

    fn assign_random_times<R: Rng>(&self, sequence: &mut [Aircraft], rng: &mut R) {
        for aircraft in sequence.iter_mut() {
            let time = self.random_time(aircraft, rng);
            aircraft.set_landing_time(time);
        }
    }
}
