//! Domain model of the aircraft landing problem as seen by the genetic algorithm.

pub mod aircraft;
pub mod individual;
pub mod population;
pub mod solution;

pub use aircraft::{Aircraft, AircraftStaticData, Time};
pub use individual::{Cost, INFEASIBLE, Individual, Parents};
pub use population::{MIN_INDIVIDUALS, Population, PopulationConfig};
pub use solution::{Solution, TerminationReason};
