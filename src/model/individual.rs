use std::fmt;

use super::aircraft::Aircraft;
use super::population::Population;

/// Total penalty of a landing sequence. Lower is better.
pub type Cost = isize;

/// Fitness assigned to any sequence violating a landing window or a separation.
pub const INFEASIBLE: Cost = Cost::MAX;

/// A candidate schedule: the landing order of every aircraft with its landing time.
///
/// The vector order is the landing order.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    landing_sequence: Vec<Aircraft>,
    fitness: Cost,
}

impl Individual {
    pub fn new(landing_sequence: Vec<Aircraft>, fitness: Cost) -> Self {
        Individual { landing_sequence, fitness }
    }

    pub fn landing_sequence(&self) -> &[Aircraft] {
        &self.landing_sequence
    }

    /// Mutable access to the sequence. The caller must re-evaluate the fitness afterwards.
    pub fn landing_sequence_mut(&mut self) -> &mut [Aircraft] {
        &mut self.landing_sequence
    }

    pub fn fitness(&self) -> Cost {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: Cost) {
        self.fitness = fitness;
    }

    pub fn is_feasible(&self) -> bool {
        self.fitness != INFEASIBLE
    }

    pub fn is_more_adapted_than(&self, other: &Individual) -> bool {
        self.fitness < other.fitness
    }

    pub fn len(&self) -> usize {
        self.landing_sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landing_sequence.is_empty()
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_feasible() {
            write!(f, "cost {} [", self.fitness)?;
        } else {
            write!(f, "infeasible [")?;
        }
        for (i, aircraft) in self.landing_sequence.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}@{}", aircraft.id(), aircraft.landing_time())?;
        }
        write!(f, "]")
    }
}

/// Two population slots selected for breeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parents {
    pub first: usize,
    pub second: usize,
}

impl Parents {
    pub fn new(first: usize, second: usize) -> Self {
        Parents { first, second }
    }

    /// Slot of the parent with the higher fitness value. Ties pick the second parent.
    pub fn less_adapted(&self, population: &Population) -> Option<usize> {
        let first = population.get(self.first)?;
        let second = population.get(self.second)?;
        if first.is_more_adapted_than(second) {
            Some(self.second)
        } else if second.is_more_adapted_than(first) {
            Some(self.first)
        } else {
            Some(self.second)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::aircraft::tests::static_data;

    #[test]
    fn test_more_adapted_is_strict() {
        let a = Individual::new(vec![], 10);
        let b = Individual::new(vec![], 10);
        let c = Individual::new(vec![], 5);
        assert!(!a.is_more_adapted_than(&b));
        assert!(c.is_more_adapted_than(&a));
        assert!(!Individual::new(vec![], INFEASIBLE).is_feasible());
    }

    #[test]
    fn test_clone_does_not_alias_sequence() {
        let data = static_data(0, (0, 10, 20), (1.0, 1.0), vec![0]);
        let original = Individual::new(vec![Aircraft::new(data)], 0);
        let mut copy = original.clone();
        copy.landing_sequence_mut()[0].set_landing_time(15);

        assert_eq!(original.landing_sequence()[0].landing_time(), 10);
        assert_eq!(copy.landing_sequence()[0].landing_time(), 15);
    }

    #[test]
    fn test_display() {
        let data = static_data(3, (0, 10, 20), (1.0, 1.0), vec![0; 4]);
        let individual = Individual::new(vec![Aircraft::new(data)], 0);
        assert_eq!(individual.to_string(), "cost 0 [3@10]");
        assert_eq!(Individual::new(vec![], INFEASIBLE).to_string(), "infeasible []");
    }
}
