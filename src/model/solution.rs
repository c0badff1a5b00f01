use std::fmt;

use super::individual::{Cost, Individual};
use super::population::Population;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The global best did not improve for too many generations.
    Stagnation,
    /// The configured number of generations was reached.
    GenerationLimit,
    /// The time limit passed before any other stop condition.
    Deadline,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TerminationReason::Stagnation => "stagnation",
            TerminationReason::GenerationLimit => "generation limit",
            TerminationReason::Deadline => "deadline",
        };
        f.write_str(text)
    }
}

/// Snapshot of a finished genetic algorithm run.
#[derive(Debug, Clone)]
pub struct Solution {
    pub population: Population,
    pub best_individual: Individual,
    pub max_generations: usize,
    pub generation_count: usize,
    pub generations_without_improvement: usize,
    pub termination: TerminationReason,
    /// Global best fitness recorded after each generation
    pub best_fitness_history: Vec<Cost>,
}

impl Solution {
    pub fn cost(&self) -> Cost {
        self.best_individual.fitness()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "best {}", self.best_individual)?;
        write!(
            f,
            "generations {}/{} ({} without improvement, stopped by {})",
            self.generation_count, self.max_generations, self.generations_without_improvement, self.termination
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::aircraft::tests::static_data;
    use crate::model::{Aircraft, PopulationConfig, INFEASIBLE};

    fn solution(best: Individual) -> Solution {
        let config = PopulationConfig::new(3, 0.4, 0.5).unwrap();
        let population = Population::new(config, vec![best.clone(), best.clone(), best.clone()]).unwrap();
        Solution {
            population,
            best_individual: best,
            max_generations: 900,
            generation_count: 42,
            generations_without_improvement: 7,
            termination: TerminationReason::Stagnation,
            best_fitness_history: vec![3, 3],
        }
    }

    #[test]
    fn test_display_summarizes_the_run() {
        let data = static_data(2, (0, 10, 20), (1.0, 1.0), vec![0; 3]);
        let best = Individual::new(vec![Aircraft::with_landing_time(data, 13)], 3);
        assert_eq!(
            solution(best).to_string(),
            "best cost 3 [2@13]\ngenerations 42/900 (7 without improvement, stopped by stagnation)"
        );
    }

    #[test]
    fn test_display_of_an_infeasible_run() {
        let text = solution(Individual::new(vec![], INFEASIBLE)).to_string();
        assert!(text.starts_with("best infeasible []"));
        assert_eq!(solution(Individual::new(vec![], INFEASIBLE)).cost(), INFEASIBLE);
    }
}

