//! Penalty based evaluation of landing sequences.

use crate::model::{Aircraft, Cost, INFEASIBLE};

/// Scores a landing sequence by its total deviation penalty.
///
/// Any window or separation violation makes the whole sequence infeasible and
/// yields [`INFEASIBLE`], without partial credit.
#[derive(Debug, Clone, Copy, Default)]
pub struct FitnessEvaluator;

impl FitnessEvaluator {
    pub fn new() -> Self {
        FitnessEvaluator
    }

    pub fn evaluate(&self, landing_sequence: &[Aircraft]) -> Cost {
        let mut cost = 0.0;
        let mut previous: Option<&Aircraft> = None;

        for aircraft in landing_sequence {
            if !aircraft.is_in_landing_window() {
                return INFEASIBLE;
            }
            if let Some(previous) = previous {
                if !aircraft.respects_gap_after(previous) {
                    return INFEASIBLE;
                }
            }
            cost += aircraft.landing_cost();
            previous = Some(aircraft);
        }

        let cost = cost.round();
        if cost >= INFEASIBLE as f64 {
            INFEASIBLE
        } else {
            cost as Cost
        }
    }

    pub fn is_feasible(&self, landing_sequence: &[Aircraft]) -> bool {
        self.evaluate(landing_sequence) != INFEASIBLE
    }
}
