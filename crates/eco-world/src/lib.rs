//! World simulation engine.
//!
//! This module implements the 2D population grid where cows and coyotes live,
//! breed, move, and eat each other.

pub mod species;
pub mod organism;
pub mod grid;
pub mod simulation;
pub mod scenario;

pub use species::{Species, SpeciesRegistry};
pub use organism::{Contest, Organism, OrganismData};
pub use grid::{PlaceOutcome, PopulationGrid, WorldPosition};
pub use simulation::World;
pub use scenario::{Scenario, ScenarioResult};
