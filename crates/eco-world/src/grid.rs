//! Fixed-capacity population grid.

use crate::organism::{Contest, Organism};
use eco_core::{validate_dimensions, Direction, Error, Position, Result, SpeciesId, Topology};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

/// A placement target on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldPosition {
    Cell(usize),
    /// No valid placement exists; anything sent here is discarded
    NoPlacement,
}

/// What happened to an organism handed to [`PopulationGrid::place_or_contest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    /// The target cell was empty
    Placed,
    /// The incoming organism beat the resident, which was destroyed
    Displaced { defeated: SpeciesId, gained: i32 },
    /// The resident kept the cell and the incoming organism was destroyed
    Rejected { by: SpeciesId },
    /// The target was the sentinel position and the organism was destroyed
    Dropped,
}

/// A width x height arena of optional organisms addressed by `y * width + x`
#[derive(Debug, Clone)]
pub struct PopulationGrid {
    width: i32,
    height: i32,
    topology: Topology,
    slots: Vec<Option<Organism>>,
}

impl PopulationGrid {
    pub fn new(width: i32, height: i32, topology: Topology) -> Result<Self> {
        let size = validate_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            topology,
            slots: vec![None; size],
        })
    }

    /// Change the grid extent, keeping organisms whose index still fits.
    ///
    /// Returns the organisms that no longer fit.
    pub fn resize(&mut self, width: i32, height: i32) -> Result<Vec<Organism>> {
        let size = validate_dimensions(width, height)?;

        let evicted = if size < self.slots.len() {
            self.slots.drain(size..).flatten().collect()
        } else {
            self.slots.resize(size, None);
            Vec::new()
        };

        self.width = width;
        self.height = height;
        Ok(evicted)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Index of an in-bounds position
    pub fn index_of(&self, pos: Position) -> Option<usize> {
        pos.in_bounds(self.width, self.height)
            .then(|| (pos.y * self.width + pos.x) as usize)
    }

    /// Get position from index
    pub fn position_of(&self, index: usize) -> Position {
        let x = (index as i32) % self.width;
        let y = (index as i32) / self.width;
        Position::new(x, y)
    }

    /// Out-of-range indices are reported as unoccupied
    pub fn is_occupied(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Some(_)))
    }

    pub fn is_occupied_at(&self, pos: WorldPosition) -> bool {
        match pos {
            WorldPosition::Cell(index) => self.is_occupied(index),
            WorldPosition::NoPlacement => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<&Organism> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Organism> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Remove and return the organism at `index`, leaving the slot empty
    pub fn extract(&mut self, index: usize) -> Option<Organism> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Put an organism in an in-range slot unconditionally, returning what was there
    pub fn insert(&mut self, index: usize, organism: Organism) -> Result<Option<Organism>> {
        let capacity = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(Error::IndexOutOfBounds { index, capacity })?;
        Ok(slot.replace(organism))
    }

    /// Place `organism` at `target`, contesting the cell if it is held.
    ///
    /// The incoming organism is the mover: its `interact` rule decides the
    /// contest. Whichever organism loses is dropped here.
    pub fn place_or_contest(&mut self, mut organism: Organism, target: WorldPosition) -> PlaceOutcome {
        let index = match target {
            WorldPosition::Cell(index) if index < self.slots.len() => index,
            _ => return PlaceOutcome::Dropped,
        };

        let slot = &mut self.slots[index];
        match slot {
            None => {
                *slot = Some(organism);
                PlaceOutcome::Placed
            }
            Some(resident) => match organism.interact(resident) {
                Contest::Mover { gained } => {
                    let defeated = resident.species_tag();
                    trace!(index, defeated = %defeated, gained, "resident displaced");
                    *slot = Some(organism);
                    PlaceOutcome::Displaced { defeated, gained }
                }
                Contest::Resident => PlaceOutcome::Rejected {
                    by: resident.species_tag(),
                },
            },
        }
    }

    /// Fresh uniformly random ordering of every slot index
    pub fn random_permutation<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.slots.len()).collect();
        order.shuffle(rng);
        order
    }

    /// Distinct indices adjacent to `index`, excluding `index` itself
    pub fn neighbors(&self, index: usize) -> Vec<usize> {
        if index >= self.slots.len() {
            return Vec::new();
        }

        let pos = self.position_of(index);
        let mut neighbors = Vec::with_capacity(8);

        for direction in Direction::all() {
            let (dx, dy) = direction.to_delta();
            let candidate = match self.topology {
                Topology::Toroidal => Some(pos.add(dx, dy).wrap(self.width, self.height)),
                Topology::Bounded => Some(pos.add(dx, dy)).filter(|p| p.in_bounds(self.width, self.height)),
            };

            if let Some(neighbor) = candidate.and_then(|p| self.index_of(p)) {
                if neighbor != index && !neighbors.contains(&neighbor) {
                    neighbors.push(neighbor);
                }
            }
        }

        neighbors
    }

    /// Uniformly chosen adjacent cell, or the sentinel when there is none
    pub fn random_neighbor_position<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> WorldPosition {
        self.neighbors(index)
            .choose(rng)
            .map_or(WorldPosition::NoPlacement, |&i| WorldPosition::Cell(i))
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Iterator over occupied slots with their indices
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Organism)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|org| (i, org)))
    }
}
