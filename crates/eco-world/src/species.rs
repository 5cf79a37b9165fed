//! Species profiles and the registry that resolves them by name.

use crate::organism::Organism;
use eco_core::{validate_species, Error, Result, SpeciesConfig, SpeciesId};
use std::collections::HashMap;
use std::sync::Arc;

/// Resolved behavior parameters shared by every organism of one species
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    pub id: SpeciesId,
    pub name: String,
    pub color: String,
    pub reproduction_threshold: i32,
    yields_to: Vec<SpeciesId>,
    prey: Vec<(SpeciesId, i32)>,
}

impl Species {
    /// Whether a member of this species moving onto `other` leaves the cell to `other`
    pub fn yields_to(&self, other: SpeciesId) -> bool {
        self.yields_to.contains(&other)
    }

    /// Energy gained from beating a member of `other`, if this species eats it
    pub fn energy_from(&self, other: SpeciesId) -> Option<i32> {
        self.prey
            .iter()
            .find(|(id, _)| *id == other)
            .map(|(_, gain)| *gain)
    }
}

/// The fixed set of species a world knows about
#[derive(Debug, Clone)]
pub struct SpeciesRegistry {
    species: Vec<Arc<Species>>,
    by_name: HashMap<String, SpeciesId>,
}

impl SpeciesRegistry {
    pub fn from_configs(configs: &[SpeciesConfig]) -> Result<Self> {
        validate_species(configs)?;

        let mut ids = Vec::with_capacity(configs.len());
        let mut by_name = HashMap::with_capacity(configs.len());
        for (i, config) in configs.iter().enumerate() {
            let id = u16::try_from(i).map(SpeciesId).map_err(|_| {
                Error::Validation(format!("species index {i} does not fit a species id"))
            })?;
            ids.push(id);
            by_name.insert(config.name.clone(), id);
        }

        let resolve = |name: &String| {
            by_name
                .get(name)
                .copied()
                .ok_or_else(|| Error::UnknownSpecies(name.clone()))
        };

        let mut species = Vec::with_capacity(configs.len());
        for (&id, config) in ids.iter().zip(configs) {
            let yields_to = config
                .yields_to
                .iter()
                .map(resolve)
                .collect::<Result<Vec<_>>>()?;
            let prey = config
                .prey
                .iter()
                .map(|p| resolve(&p.species).map(|id| (id, p.energy_gain)))
                .collect::<Result<Vec<_>>>()?;

            species.push(Arc::new(Species {
                id,
                name: config.name.clone(),
                color: config.color.clone(),
                reproduction_threshold: config.reproduction_threshold,
                yields_to,
                prey,
            }));
        }

        Ok(Self { species, by_name })
    }

    pub fn get(&self, id: SpeciesId) -> Option<&Arc<Species>> {
        self.species.get(id.0 as usize)
    }

    pub fn by_name(&self, name: &str) -> Result<&Arc<Species>> {
        self.by_name
            .get(name)
            .and_then(|id| self.get(*id))
            .ok_or_else(|| Error::UnknownSpecies(name.to_string()))
    }

    /// Create a new organism of the named species
    pub fn spawn(&self, name: &str, energy: i32) -> Result<Organism> {
        Ok(Organism::new(self.by_name(name)?.clone(), energy))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Species>> {
        self.species.iter()
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}
