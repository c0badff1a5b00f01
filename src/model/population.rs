use crate::error::ConfigError;

use super::individual::Individual;

/// Smallest population able to hold the three deterministic seeds.
pub const MIN_INDIVIDUALS: usize = 3;

/// Size and breeding rates of a population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationConfig {
    max_individuals: usize,
    reproduction_rate: f64,
    mutation_rate: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        PopulationConfig { max_individuals: 400, reproduction_rate: 0.4, mutation_rate: 0.5 }
    }
}

impl PopulationConfig {
    pub fn new(max_individuals: usize, reproduction_rate: f64, mutation_rate: f64) -> Result<Self, ConfigError> {
        let config = PopulationConfig { max_individuals, reproduction_rate, mutation_rate };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_individuals < MIN_INDIVIDUALS {
            return Err(ConfigError::TooFewIndividuals { min: MIN_INDIVIDUALS, actual: self.max_individuals });
        }
        if !(self.reproduction_rate > 0.0 && self.reproduction_rate <= 1.0) {
            return Err(ConfigError::RateOutOfRange {
                name: "reproduction rate",
                range: "(0, 1]",
                value: self.reproduction_rate,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::RateOutOfRange { name: "mutation rate", range: "[0, 1]", value: self.mutation_rate });
        }
        Ok(())
    }

    pub fn max_individuals(&self) -> usize {
        self.max_individuals
    }

    pub fn reproduction_rate(&self) -> f64 {
        self.reproduction_rate
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// Number of breeding pairs per generation.
    pub fn selection_count(&self) -> usize {
        (self.max_individuals as f64 * self.reproduction_rate).floor() as usize
    }

    /// Number of mutations per generation.
    pub fn mutation_count(&self) -> usize {
        (self.max_individuals as f64 * self.mutation_rate).floor() as usize
    }
}

/// Fixed size collection of individuals, lazily kept sorted by ascending fitness.
#[derive(Debug, Clone)]
pub struct Population {
    config: PopulationConfig,
    individuals: Vec<Individual>,
    sorted: bool,
}

impl Population {
    pub fn new(config: PopulationConfig, individuals: Vec<Individual>) -> Result<Self, ConfigError> {
        config.validate()?;
        if individuals.len() != config.max_individuals {
            return Err(ConfigError::PopulationSize { expected: config.max_individuals, actual: individuals.len() });
        }
        Ok(Population { config, individuals, sorted: false })
    }

    pub fn config(&self) -> &PopulationConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    pub fn add(&mut self, individual: Individual) {
        self.individuals.push(individual);
        self.sorted = false;
    }

    /// Removes the individual at `index`. Must be paired with an `add` to keep the size.
    pub fn remove(&mut self, index: usize) -> Option<Individual> {
        (index < self.individuals.len()).then(|| self.individuals.remove(index))
    }

    /// Swaps `individual` into slot `index` and returns the one it replaces.
    pub fn replace(&mut self, index: usize, individual: Individual) -> Option<Individual> {
        let slot = self.individuals.get_mut(index)?;
        self.sorted = false;
        Some(std::mem::replace(slot, individual))
    }

    /// Individual at `index`. Ranks are meaningful only right after `sort_by_fitness`.
    pub fn get(&self, index: usize) -> Option<&Individual> {
        self.individuals.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Individual> {
        self.sorted = false;
        self.individuals.get_mut(index)
    }

    pub fn most_adapted(&mut self) -> Option<&Individual> {
        self.sort_by_fitness();
        self.individuals.first()
    }

    pub fn less_adapted(&mut self) -> Option<&Individual> {
        self.sort_by_fitness();
        self.individuals.last()
    }

    pub fn sort_by_fitness(&mut self) {
        if !self.sorted {
            self.individuals.sort_unstable_by_key(Individual::fitness);
            self.sorted = true;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.iter()
    }
}
