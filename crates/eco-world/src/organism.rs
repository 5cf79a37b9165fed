//! Organism state and the reproduction and interaction contract.

use crate::species::Species;
use eco_core::SpeciesId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An organism in the simulation
#[derive(Debug, Clone)]
pub struct Organism {
    energy: i32,
    species: Arc<Species>,
}

/// Which side of a contest keeps the cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contest {
    /// The moving organism takes the cell, having gained `gained` energy from the resident
    Mover { gained: i32 },
    /// The resident keeps the cell and the mover is lost
    Resident,
}

impl Organism {
    pub fn new(species: Arc<Species>, energy: i32) -> Self {
        Self { energy, species }
    }

    pub fn energy(&self) -> i32 {
        self.energy
    }

    pub fn set_energy(&mut self, energy: i32) {
        self.energy = energy;
    }

    pub fn add_energy(&mut self, delta: i32) {
        self.energy += delta;
    }

    pub fn color(&self) -> &str {
        &self.species.color
    }

    pub fn species(&self) -> &Species {
        &self.species
    }

    pub fn species_tag(&self) -> SpeciesId {
        self.species.id
    }

    /// Split off an offspring once energy reaches the species threshold.
    ///
    /// The offspring starts with zero energy and the parent pays exactly the
    /// threshold. Below the threshold nothing is mutated.
    pub fn check_reproduction(&mut self) -> Option<Organism> {
        let threshold = self.species.reproduction_threshold;
        if self.energy < threshold {
            return None;
        }

        self.energy -= threshold;
        Some(Organism::new(self.species.clone(), 0))
    }

    /// Resolve a collision when `self` moves onto a cell held by `resident`.
    ///
    /// The mover's species decides the outcome, and only the mover's energy
    /// changes: a loser is discarded by the grid, never drained.
    pub fn interact(&mut self, resident: &Organism) -> Contest {
        let other = resident.species_tag();
        if self.species.yields_to(other) {
            return Contest::Resident;
        }

        let gained = self.species.energy_from(other).unwrap_or(0);
        self.energy += gained;
        Contest::Mover { gained }
    }
}

/// Serializable organism data for reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganismData {
    pub species: String,
    pub energy: i32,
}

impl From<&Organism> for OrganismData {
    fn from(org: &Organism) -> Self {
        Self {
            species: org.species.name.clone(),
            energy: org.energy,
        }
    }
}
