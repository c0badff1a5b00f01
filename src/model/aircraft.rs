//! This module defines the aircraft of an ALP instance and its landing time assignment.

use std::sync::Arc;

/// Discrete time unit used for every landing time.
pub type Time = isize;

/// Immutable parameters of one aircraft, shared by every landing assignment derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct AircraftStaticData {
    /// Position of the aircraft in the instance, used to index gap vectors
    pub aircraft_id: usize,
    /// Time at which the aircraft appears on the radar
    pub appearance_time: Time,
    /// Landing time when flying at maximum speed
    pub earliest_landing_time: Time,
    /// Landing time when flying at cruise speed
    pub target_landing_time: Time,
    /// Landing time when flying at the most fuel efficient speed
    pub latest_landing_time: Time,
    /// Penalty per time unit landed before the target
    pub landing_before_target_time_penalty_cost: f64,
    /// Penalty per time unit landed after the target
    pub landing_after_target_time_penalty_cost: f64,
    /// Minimum separation required when the aircraft with the given id lands just before this one
    pub gap_time_between_landings: Vec<Time>,
}

impl AircraftStaticData {
    /// Separation this aircraft needs after `previous_id` has landed.
    pub fn gap_after(&self, previous_id: usize) -> Time {
        self.gap_time_between_landings[previous_id]
    }

    pub fn window_contains(&self, time: Time) -> bool {
        self.earliest_landing_time <= time && time <= self.latest_landing_time
    }

    pub fn clamp_to_window(&self, time: Time) -> Time {
        time.clamp(self.earliest_landing_time, self.latest_landing_time)
    }
}

/// A landing time bound to the static data of one aircraft.
///
/// Cloning copies the landing time only, the static data stays shared.
#[derive(Debug, Clone)]
pub struct Aircraft {
    data: Arc<AircraftStaticData>,
    landing_time: Time,
}

impl Aircraft {
    /// Creates an aircraft landing at its target time.
    pub fn new(data: Arc<AircraftStaticData>) -> Self {
        let landing_time = data.target_landing_time;
        Aircraft { data, landing_time }
    }

    pub fn with_landing_time(data: Arc<AircraftStaticData>, landing_time: Time) -> Self {
        Aircraft { data, landing_time }
    }

    pub fn data(&self) -> &AircraftStaticData {
        &self.data
    }

    pub fn id(&self) -> usize {
        self.data.aircraft_id
    }

    pub fn landing_time(&self) -> Time {
        self.landing_time
    }

    pub fn set_landing_time(&mut self, landing_time: Time) {
        self.landing_time = landing_time;
    }

    pub fn earliest(&self) -> Time {
        self.data.earliest_landing_time
    }

    pub fn target(&self) -> Time {
        self.data.target_landing_time
    }

    pub fn latest(&self) -> Time {
        self.data.latest_landing_time
    }

    pub fn reset_to_target(&mut self) {
        self.landing_time = self.data.target_landing_time;
    }

    pub fn is_in_landing_window(&self) -> bool {
        self.data.window_contains(self.landing_time)
    }

    /// Separation required between the landing of `previous` and this one.
    pub fn gap_after(&self, previous: &Aircraft) -> Time {
        self.data.gap_after(previous.id())
    }

    /// Earliest time allowed by the separation with `previous`, ignoring the landing window.
    pub fn min_landing_time_after(&self, previous: &Aircraft) -> Time {
        previous.landing_time + self.gap_after(previous)
    }

    pub fn respects_gap_after(&self, previous: &Aircraft) -> bool {
        self.landing_time >= self.min_landing_time_after(previous)
    }

    /// Penalty of the current landing time relative to the target.
    pub fn landing_cost(&self) -> f64 {
        let target = self.data.target_landing_time;
        let early = (target - self.landing_time).max(0) as f64;
        let late = (self.landing_time - target).max(0) as f64;
        self.data.landing_before_target_time_penalty_cost * early + self.data.landing_after_target_time_penalty_cost * late
    }
}

impl PartialEq for Aircraft {
    fn eq(&self, other: &Self) -> bool {
        self.landing_time == other.landing_time && (Arc::ptr_eq(&self.data, &other.data) || self.data == other.data)
    }
}
