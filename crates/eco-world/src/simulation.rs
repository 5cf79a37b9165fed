//! World update engine: energy, reproduction, and movement phases.

use crate::grid::{PlaceOutcome, PopulationGrid, WorldPosition};
use crate::organism::Organism;
use crate::species::SpeciesRegistry;
use eco_core::{
    EnergyConfig, Error, Placement, PopulationCensus, Position, Result, SimulationConfig,
    TickStats,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, trace, warn};

#[derive(Debug)]
pub struct World {
    grid: PopulationGrid,
    registry: SpeciesRegistry,
    energy: EnergyConfig,
    rng: ChaCha8Rng,
    tick: u64,
    last_tick: TickStats,
    totals: TickStats,
}

impl World {
    /// Build an empty world from a configuration.
    ///
    /// The initial population is not placed; see [`World::populate`].
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        config.energy.validate()?;
        let registry = SpeciesRegistry::from_configs(&config.species)?;
        let grid = PopulationGrid::new(
            config.world.width,
            config.world.height,
            config.world.topology,
        )?;

        Ok(Self {
            grid,
            registry,
            energy: config.energy.clone(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            tick: 0,
            last_tick: TickStats::default(),
            totals: TickStats::default(),
        })
    }

    /// Rebuild the grid extent. Organisms beyond the new capacity are discarded.
    pub fn resize(&mut self, width: i32, height: i32) -> Result<()> {
        let evicted = self.grid.resize(width, height)?;
        if !evicted.is_empty() {
            warn!(
                width,
                height,
                evicted = evicted.len(),
                "Resize discarded organisms outside the new grid"
            );
        }
        Ok(())
    }

    /// Place an initial organism, contesting the slot if it is already held
    pub fn seed(&mut self, organism: Organism, index: usize) -> Result<PlaceOutcome> {
        let capacity = self.grid.capacity();
        if index >= capacity {
            return Err(Error::IndexOutOfBounds { index, capacity });
        }
        Ok(self.grid.place_or_contest(organism, WorldPosition::Cell(index)))
    }

    /// Create an organism of the named species and seed it at `index`
    pub fn spawn(&mut self, species: &str, energy: i32, index: usize) -> Result<PlaceOutcome> {
        let organism = self.registry.spawn(species, energy)?;
        self.seed(organism, index)
    }

    pub fn populate(&mut self, placements: &[Placement]) -> Result<()> {
        for placement in placements {
            let outcome = self.spawn(&placement.species, placement.energy, placement.index)?;
            debug!(
                species = %placement.species,
                index = placement.index,
                energy = placement.energy,
                ?outcome,
                "Seeded organism"
            );
        }
        Ok(())
    }

    /// Advance the world by one tick
    pub fn step(&mut self) -> TickStats {
        self.tick += 1;

        self.process_energy();
        let mut stats = self.reproduction_phase();
        stats += self.movement_phase();

        self.totals += stats;
        self.last_tick = stats;

        debug!(
            tick = self.tick,
            population = self.population_count(),
            births = stats.births,
            predations = stats.predations,
            eliminations = stats.eliminations,
            "Tick complete"
        );

        stats
    }

    /// Energy phase: every organism gains the configured increment
    pub fn process_energy(&mut self) {
        let order = self.grid.random_permutation(&mut self.rng);
        let increment = self.energy.energy_per_tick;

        for index in order {
            if let Some(organism) = self.grid.get_mut(index) {
                organism.add_energy(increment);
            }
        }
    }

    /// Reproduction phase run on its own, outside a full tick
    pub fn reproduce(&mut self) -> TickStats {
        let stats = self.reproduction_phase();
        self.totals += stats;
        stats
    }

    /// Movement phase run on its own, outside a full tick
    pub fn move_organisms(&mut self) -> TickStats {
        let stats = self.movement_phase();
        self.totals += stats;
        stats
    }

    fn reproduction_phase(&mut self) -> TickStats {
        let mut stats = TickStats::default();
        let order = self.grid.random_permutation(&mut self.rng);

        for index in order {
            let Some(offspring) = self
                .grid
                .get_mut(index)
                .and_then(Organism::check_reproduction)
            else {
                continue;
            };

            let target = self.grid.random_neighbor_position(index, &mut self.rng);
            match self.grid.place_or_contest(offspring, target) {
                PlaceOutcome::Placed => {
                    trace!(parent = index, ?target, "Offspring born");
                    stats.births += 1;
                }
                PlaceOutcome::Displaced { gained, .. } => {
                    trace!(parent = index, ?target, gained, "Offspring took an occupied cell");
                    stats.births += 1;
                    stats.eliminations += 1;
                    if gained > 0 {
                        stats.predations += 1;
                    }
                }
                PlaceOutcome::Rejected { .. } | PlaceOutcome::Dropped => {
                    trace!(parent = index, ?target, "Offspring lost");
                    stats.stillbirths += 1;
                }
            }
        }

        stats
    }

    fn movement_phase(&mut self) -> TickStats {
        let mut stats = TickStats::default();
        let order = self.grid.random_permutation(&mut self.rng);

        for index in order {
            if self.grid.is_occupied(index) {
                self.move_from(index, &mut stats);
            }
        }

        stats
    }

    /// Move the organism scheduled at `index` to a random neighbor.
    ///
    /// An empty slot here means the schedule and the grid disagree; it is
    /// logged and counted, and the tick carries on.
    fn move_from(&mut self, index: usize, stats: &mut TickStats) {
        let Some(mover) = self.grid.extract(index) else {
            error!(tick = self.tick, index, "Scheduled slot was empty on extraction");
            stats.invariant_violations += 1;
            return;
        };

        let target = self.grid.random_neighbor_position(index, &mut self.rng);
        match self.grid.place_or_contest(mover, target) {
            PlaceOutcome::Placed => {}
            PlaceOutcome::Displaced { defeated, gained } => {
                trace!(from = index, ?target, %defeated, gained, "Mover won contest");
                stats.eliminations += 1;
                if gained > 0 {
                    stats.predations += 1;
                }
            }
            PlaceOutcome::Rejected { by } => {
                trace!(from = index, ?target, %by, "Mover lost contest");
                stats.eliminations += 1;
            }
            PlaceOutcome::Dropped => {
                trace!(from = index, "Mover had nowhere to go");
                stats.stranded += 1;
            }
        }
    }

    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.index_at(x, y)
            .map_or(false, |index| self.grid.is_occupied(index))
    }

    pub fn color_at(&self, x: i32, y: i32) -> Option<&str> {
        self.organism_at_position(x, y).map(Organism::color)
    }

    pub fn species_at(&self, x: i32, y: i32) -> Option<&str> {
        self.organism_at_position(x, y)
            .map(|org| org.species().name.as_str())
    }

    pub fn organism_at(&self, index: usize) -> Option<&Organism> {
        self.grid.get(index)
    }

    fn organism_at_position(&self, x: i32, y: i32) -> Option<&Organism> {
        self.index_at(x, y).and_then(|index| self.grid.get(index))
    }

    fn index_at(&self, x: i32, y: i32) -> Option<usize> {
        self.grid.index_of(Position::new(x, y))
    }

    pub fn population_count(&self) -> usize {
        self.grid.occupied_count()
    }

    /// Per-species population at the current tick
    pub fn census(&self) -> PopulationCensus {
        let mut census = PopulationCensus::new(self.tick);
        for species in self.registry.iter() {
            census.per_species.insert(species.name.clone(), 0);
        }
        for (_, organism) in self.grid.iter() {
            *census
                .per_species
                .entry(organism.species().name.clone())
                .or_insert(0) += 1;
            census.total += 1;
        }
        census
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Events of the most recent [`World::step`]
    pub fn last_tick(&self) -> TickStats {
        self.last_tick
    }

    /// Events accumulated over the world's lifetime
    pub fn stats(&self) -> TickStats {
        self.totals
    }

    pub fn invariant_violations(&self) -> u64 {
        self.totals.invariant_violations
    }

    pub fn grid(&self) -> &PopulationGrid {
        &self.grid
    }

    pub fn registry(&self) -> &SpeciesRegistry {
        &self.registry
    }
}
