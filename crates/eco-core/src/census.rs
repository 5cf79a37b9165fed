//! Population counts and per-tick event statistics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::AddAssign;

/// Snapshot of how many organisms of each species are alive
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCensus {
    /// Tick at which the snapshot was taken (0 = before the first tick)
    pub tick: u64,
    /// Total occupied slots
    pub total: usize,
    /// Occupied slots per species name; species with no living members are listed with 0
    pub per_species: BTreeMap<String, usize>,
}

impl PopulationCensus {
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            ..Self::default()
        }
    }

    pub fn count(&self, species: &str) -> usize {
        self.per_species.get(species).copied().unwrap_or(0)
    }

    /// True once any listed species has died out
    pub fn has_extinction(&self) -> bool {
        self.per_species.values().any(|&n| n == 0)
    }
}

/// Events counted while processing ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickStats {
    /// Offspring that reached a grid cell
    pub births: u64,
    /// Offspring dropped on the sentinel position or a lost contest
    pub stillbirths: u64,
    /// Contests won by an organism that gained energy from the loser
    pub predations: u64,
    /// Organisms discarded after losing a contest, including overwritten residents
    pub eliminations: u64,
    /// Movers dropped because no neighbor position existed
    pub stranded: u64,
    /// Scheduled slots found empty on extraction
    pub invariant_violations: u64,
}

impl AddAssign for TickStats {
    fn add_assign(&mut self, rhs: Self) {
        self.births += rhs.births;
        self.stillbirths += rhs.stillbirths;
        self.predations += rhs.predations;
        self.eliminations += rhs.eliminations;
        self.stranded += rhs.stranded;
        self.invariant_violations += rhs.invariant_violations;
    }
}
