//! Configuration types for the simulation.

use crate::{Error, Result, Topology};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

pub const COW: &str = "cow";
pub const COYOTE: &str = "coyote";

/// Species ids are `u16`
pub const MAX_SPECIES: usize = u16::MAX as usize + 1;

/// World configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the world grid
    pub width: i32,
    /// Height of the world grid
    pub height: i32,
    /// Edge behavior used for neighbor lookup
    pub topology: Topology,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            topology: Topology::Toroidal,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<()> {
        validate_dimensions(self.width, self.height).map(|_| ())
    }
}

/// Check a grid extent and return its slot count.
///
/// Both sides must be positive and `width * height` must fit in an `i32`,
/// since cell indices are computed as `y * width + x`.
pub fn validate_dimensions(width: i32, height: i32) -> Result<usize> {
    if width <= 0 || height <= 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .map(|size| size as usize)
        .ok_or(Error::InvalidDimensions { width, height })
}

/// Energy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyConfig {
    /// Energy every organism gains during the energy phase of a tick
    pub energy_per_tick: i32,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            energy_per_tick: 100,
        }
    }
}

impl EnergyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.energy_per_tick < 0 {
            return Err(Error::Validation(format!(
                "energy_per_tick must not be negative, got {}",
                self.energy_per_tick
            )));
        }
        Ok(())
    }
}

/// A species an organism eats, and what it gains from doing so
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreyConfig {
    pub species: String,
    pub energy_gain: i32,
}

/// Behavior parameters for one species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesConfig {
    pub name: String,
    /// Display color handed to renderers
    pub color: String,
    /// Energy at which an organism splits off an offspring
    pub reproduction_threshold: i32,
    /// Species that keep their cell when this species moves onto them
    #[serde(default)]
    pub yields_to: Vec<String>,
    /// Species this one eats when it wins a contest
    #[serde(default)]
    pub prey: Vec<PreyConfig>,
}

impl SpeciesConfig {
    pub fn cow() -> Self {
        Self {
            name: COW.to_string(),
            color: "brown".to_string(),
            reproduction_threshold: 300,
            yields_to: vec![COYOTE.to_string()],
            prey: Vec::new(),
        }
    }

    pub fn coyote() -> Self {
        Self {
            name: COYOTE.to_string(),
            color: "grey".to_string(),
            reproduction_threshold: 900,
            yields_to: Vec::new(),
            prey: vec![PreyConfig {
                species: COW.to_string(),
                energy_gain: 200,
            }],
        }
    }
}

/// Cow and coyote, the stock predator-prey pair
pub fn default_species() -> Vec<SpeciesConfig> {
    vec![SpeciesConfig::cow(), SpeciesConfig::coyote()]
}

/// Check species parameters and that every cross-reference names a listed species
pub fn validate_species(species: &[SpeciesConfig]) -> Result<()> {
    if species.len() > MAX_SPECIES {
        return Err(Error::Validation(format!(
            "at most {} species are supported, got {}",
            MAX_SPECIES,
            species.len()
        )));
    }

    let mut names = HashSet::new();
    for entry in species {
        if !names.insert(entry.name.as_str()) {
            return Err(Error::DuplicateSpecies(entry.name.clone()));
        }
        if entry.reproduction_threshold <= 0 {
            return Err(Error::InvalidSpecies {
                species: entry.name.clone(),
                reason: format!(
                    "reproduction threshold must be positive, got {}",
                    entry.reproduction_threshold
                ),
            });
        }
        if let Some(prey) = entry.prey.iter().find(|p| p.energy_gain < 0) {
            return Err(Error::InvalidSpecies {
                species: entry.name.clone(),
                reason: format!("negative energy gain {} from {}", prey.energy_gain, prey.species),
            });
        }
    }

    for entry in species {
        let referenced = entry
            .yields_to
            .iter()
            .chain(entry.prey.iter().map(|p| &p.species));
        for name in referenced {
            if !names.contains(name.as_str()) {
                return Err(Error::UnknownSpecies(name.clone()));
            }
        }
    }

    Ok(())
}

/// An organism placed on the grid before the first tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub species: String,
    pub index: usize,
    #[serde(default)]
    pub energy: i32,
}

impl Placement {
    pub fn new(species: impl Into<String>, index: usize, energy: i32) -> Self {
        Self {
            species: species.into(),
            index,
            energy,
        }
    }
}

/// Simulation run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Number of ticks the scenario runner executes
    pub num_ticks: u64,
    pub world: WorldConfig,
    pub energy: EnergyConfig,
    pub species: Vec<SpeciesConfig>,
    pub initial_population: Vec<Placement>,
    /// Keep a census for every tick in the scenario result
    pub record_history: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 2,
            num_ticks: 25,
            world: WorldConfig::default(),
            energy: EnergyConfig::default(),
            species: default_species(),
            initial_population: vec![Placement::new(COW, 0, 0), Placement::new(COYOTE, 1, 0)],
            record_history: true,
        }
    }
}

impl SimulationConfig {
    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Check dimensions, energy and species parameters, and that every referenced species exists
    pub fn validate(&self) -> Result<()> {
        let capacity = validate_dimensions(self.world.width, self.world.height)?;
        self.energy.validate()?;

        validate_species(&self.species)?;
        let names: HashSet<&str> = self.species.iter().map(|s| s.name.as_str()).collect();

        for placement in &self.initial_population {
            if !names.contains(placement.species.as_str()) {
                return Err(Error::UnknownSpecies(placement.species.clone()));
            }
            if placement.index >= capacity {
                return Err(Error::IndexOutOfBounds {
                    index: placement.index,
                    capacity,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let world_config = WorldConfig::default();
        assert_eq!(world_config.width, 10);
        assert_eq!(world_config.height, 10);
        assert_eq!(world_config.topology, Topology::Toroidal);

        assert_eq!(EnergyConfig::default().energy_per_tick, 100);

        let config = SimulationConfig::default();
        assert_eq!(config.num_ticks, 25);
        assert_eq!(config.species.len(), 2);
        assert_eq!(config.initial_population.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_stock_species_parameters() {
        let cow = SpeciesConfig::cow();
        assert_eq!(cow.reproduction_threshold, 300);
        assert_eq!(cow.yields_to, vec![COYOTE.to_string()]);

        let coyote = SpeciesConfig::coyote();
        assert_eq!(coyote.reproduction_threshold, 900);
        assert_eq!(coyote.prey[0].energy_gain, 200);
    }

    #[test]
    fn test_rejects_non_positive_dimensions() {
        let mut config = SimulationConfig::default();
        config.world.width = 0;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidDimensions { width: 0, height: 10 })
        ));

        config.world.width = 10;
        config.world.height = -3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_overflowing_dimensions() {
        let mut config = SimulationConfig::default();
        config.world.width = 70_000;
        config.world.height = 70_000;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidDimensions { width: 70_000, height: 70_000 })
        ));

        assert_eq!(validate_dimensions(30, 20).unwrap(), 600);
        assert!(validate_dimensions(i32::MAX, 2).is_err());
    }

    #[test]
    fn test_rejects_duplicate_species() {
        let mut config = SimulationConfig::default();
        config.species.push(SpeciesConfig::cow());
        assert!(matches!(config.validate(), Err(Error::DuplicateSpecies(name)) if name == COW));
    }

    #[test]
    fn test_rejects_unknown_references() {
        let mut config = SimulationConfig::default();
        config.species[0].yields_to.push("wolf".to_string());
        assert!(matches!(config.validate(), Err(Error::UnknownSpecies(name)) if name == "wolf"));

        let mut config = SimulationConfig::default();
        config.initial_population.push(Placement::new("sheep", 5, 0));
        assert!(matches!(config.validate(), Err(Error::UnknownSpecies(_))));
    }

    #[test]
    fn test_rejects_bad_species_parameters() {
        let mut config = SimulationConfig::default();
        config.species[0].reproduction_threshold = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidSpecies { .. })));

        let mut config = SimulationConfig::default();
        config.species[1].prey[0].energy_gain = -1;
        assert!(matches!(config.validate(), Err(Error::InvalidSpecies { .. })));
    }

    #[test]
    fn test_rejects_negative_energy_increment() {
        let mut config = SimulationConfig::default();
        config.energy.energy_per_tick = -1;
        assert!(matches!(config.validate(), Err(Error::Validation(_))));

        config.energy.energy_per_tick = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_too_many_species() {
        let species: Vec<SpeciesConfig> = (0..=MAX_SPECIES)
            .map(|i| SpeciesConfig {
                name: format!("species-{i}"),
                color: "white".to_string(),
                reproduction_threshold: 1,
                yields_to: Vec::new(),
                prey: Vec::new(),
            })
            .collect();
        assert!(matches!(validate_species(&species), Err(Error::Validation(_))));
        assert!(validate_species(&species[..MAX_SPECIES]).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_placement() {
        let mut config = SimulationConfig::default();
        config.initial_population.push(Placement::new(COW, 100, 0));
        assert!(matches!(
            config.validate(),
            Err(Error::IndexOutOfBounds { index: 100, capacity: 100 })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{ "seed": 7, "world": { "width": 30 } }"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.world.width, 30);
        assert_eq!(config.world.height, 10);
        assert_eq!(config.species, default_species());
    }
}
