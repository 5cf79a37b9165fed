//! Scenario runner: a configured world driven for a fixed number of ticks.

use crate::organism::OrganismData;
use crate::simulation::World;
use eco_core::{PopulationCensus, Result, SimulationConfig, TickStats};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// A seeded world ready to run
pub struct Scenario {
    config: SimulationConfig,
    world: World,
}

impl Scenario {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let mut world = World::new(&config)?;
        world.populate(&config.initial_population)?;

        Ok(Self { config, world })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Run the configured number of ticks from the world's current state
    #[instrument(skip(self), fields(num_ticks = self.config.num_ticks, seed = self.config.seed))]
    pub fn execute(&mut self) -> Result<ScenarioResult> {
        info!(
            "Starting scenario for {} ticks on a {}x{} grid",
            self.config.num_ticks, self.config.world.width, self.config.world.height
        );

        let record = self.config.record_history;
        let mut history = Vec::new();
        if record {
            history.reserve(history_capacity(self.config.num_ticks));
            history.push(self.world.census());
        }

        for _ in 0..self.config.num_ticks {
            self.world.step();
            let tick = self.world.tick();

            if tick % 1000 == 0 {
                info!(
                    "Tick {}/{}: {} organisms alive",
                    tick,
                    self.config.num_ticks,
                    self.world.population_count()
                );
            }
            if record {
                history.push(self.world.census());
            }
        }

        let final_census = self.world.census();
        let totals = self.world.stats();

        info!(
            event = "scenario_summary",
            final_tick = final_census.tick,
            population = final_census.total,
            births = totals.births,
            stillbirths = totals.stillbirths,
            predations = totals.predations,
            eliminations = totals.eliminations,
            invariant_violations = totals.invariant_violations,
            "Scenario complete"
        );

        let survivors = self
            .world
            .grid()
            .iter()
            .map(|(index, org)| (index, OrganismData::from(org)))
            .collect();

        Ok(ScenarioResult {
            final_census,
            history,
            totals,
            survivors,
        })
    }
}

/// Up-front history reservation, capped so a huge tick count never allocates ahead of the run
fn history_capacity(num_ticks: u64) -> usize {
    const MAX_RESERVED: u64 = 1024;
    num_ticks.min(MAX_RESERVED) as usize + 1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub final_census: PopulationCensus,
    /// Census after seeding (tick 0) and after every tick; empty when
    /// `record_history` is off
    pub history: Vec<PopulationCensus>,
    pub totals: TickStats,
    /// Organisms alive at the end, keyed by slot index
    pub survivors: Vec<(usize, OrganismData)>,
}

impl ScenarioResult {
    pub fn population_count(&self) -> usize {
        self.final_census.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_core::{Error, Placement, COW, COYOTE};

    #[test]
    fn test_scenario_creation() {
        let scenario = Scenario::new(SimulationConfig::default()).unwrap();
        assert_eq!(scenario.world().population_count(), 2);
        assert_eq!(scenario.world().color_at(0, 0), Some("brown"));
        assert_eq!(scenario.world().color_at(1, 0), Some("grey"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SimulationConfig::default();
        config.world.height = 0;
        assert!(matches!(Scenario::new(config), Err(Error::InvalidDimensions { .. })));

        let mut config = SimulationConfig::default();
        config.initial_population.push(Placement::new("wolf", 3, 0));
        assert!(matches!(Scenario::new(config), Err(Error::UnknownSpecies(_))));
    }

    #[test]
    fn test_stock_scenario_history() {
        let result = Scenario::new(SimulationConfig::default())
            .unwrap()
            .execute()
            .unwrap();

        assert_eq!(result.history.len(), 26);
        assert_eq!(result.history[0].tick, 0);
        assert_eq!(result.history[0].total, 2);
        assert_eq!(result.final_census.tick, 25);
        assert_eq!(result.history.last(), Some(&result.final_census));
        assert_eq!(result.survivors.len(), result.population_count());
        assert!(result.population_count() <= 100);
        assert!(result.final_census.count(COYOTE) >= 1);
        assert_eq!(result.totals.invariant_violations, 0);
    }

    #[test]
    fn test_stock_scenario_population() {
        let result = Scenario::new(SimulationConfig::default())
            .unwrap()
            .execute()
            .unwrap();

        assert_eq!(result.population_count(), 3);
        assert_eq!(result.final_census.count(COW), 0);
        assert_eq!(result.final_census.count(COYOTE), 3);
    }

    #[test]
    fn test_history_capacity_is_bounded() {
        assert_eq!(history_capacity(0), 1);
        assert_eq!(history_capacity(25), 26);
        assert_eq!(history_capacity(10_000_000_000_000), 1025);
        assert_eq!(history_capacity(u64::MAX), 1025);
    }

    #[test]
    fn test_history_can_be_disabled() {
        let config = SimulationConfig {
            num_ticks: 10,
            record_history: false,
            ..Default::default()
        };
        let quiet = Scenario::new(config).unwrap().execute().unwrap();
        assert!(quiet.history.is_empty());
        assert_eq!(quiet.final_census.tick, 10);

        let config = SimulationConfig {
            num_ticks: 10,
            ..Default::default()
        };
        let recorded = Scenario::new(config).unwrap().execute().unwrap();
        assert_eq!(recorded.history.len(), 11);
        assert_eq!(recorded.final_census, quiet.final_census);
        assert_eq!(recorded.survivors, quiet.survivors);
    }

    #[test]
    fn test_stock_scenario_matches_across_runs() {
        let run = || {
            Scenario::new(SimulationConfig::default())
                .unwrap()
                .execute()
                .unwrap()
        };
        let first = run();
        let second = run();

        assert_eq!(first.history, second.history);
        assert_eq!(first.totals, second.totals);
        assert_eq!(first.survivors, second.survivors);
    }

    #[test]
    fn test_overlapping_placements_are_contested() {
        let config = SimulationConfig {
            num_ticks: 0,
            initial_population: vec![Placement::new(COW, 5, 0), Placement::new(COYOTE, 5, 0)],
            ..Default::default()
        };

        let result = Scenario::new(config).unwrap().execute().unwrap();
        assert_eq!(result.population_count(), 1);
        assert_eq!(result.survivors[0].0, 5);
        assert_eq!(result.survivors[0].1.species, COYOTE);
        assert_eq!(result.survivors[0].1.energy, 200);
    }

    #[test]
    fn test_result_serialization() {
        let config = SimulationConfig {
            num_ticks: 3,
            ..Default::default()
        };
        let result = Scenario::new(config).unwrap().execute().unwrap();

        let json = serde_json::to_string(&result).unwrap();
        let deserialized: ScenarioResult = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.final_census, result.final_census);
        assert_eq!(deserialized.history.len(), 4);
    }
}
