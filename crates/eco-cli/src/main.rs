//! Console driver: runs a predator-prey scenario and prints the final population count.

mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use eco_core::{SimulationConfig, Topology};
use eco_world::Scenario;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "eco-sim", version, about = "Cow and coyote population dynamics on a grid")]
struct Args {
    /// JSON configuration file; omitted fields take their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to run
    #[arg(short, long)]
    ticks: Option<u64>,

    #[arg(long)]
    width: Option<i32>,

    #[arg(long)]
    height: Option<i32>,

    /// Use a bounded grid instead of wrapping edges
    #[arg(long)]
    bounded: bool,

    /// Print the census after every tick as JSON lines before the final count
    #[arg(long)]
    history: bool,
}

impl Args {
    fn load_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_json_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => SimulationConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(ticks) = self.ticks {
            config.num_ticks = ticks;
        }
        if let Some(width) = self.width {
            config.world.width = width;
        }
        if let Some(height) = self.height {
            config.world.height = height;
        }
        if self.bounded {
            config.world.topology = Topology::Bounded;
        }
        config.record_history = self.history;

        Ok(config)
    }
}

fn main() -> Result<()> {
    telemetry::init_telemetry()?;

    let args = Args::parse();
    let config = args.load_config()?;

    info!(
        seed = config.seed,
        ticks = config.num_ticks,
        width = config.world.width,
        height = config.world.height,
        "Starting eco-sim"
    );

    let result = Scenario::new(config)
        .context("invalid simulation setup")?
        .execute()?;

    if args.history {
        for census in &result.history {
            println!("{}", serde_json::to_string(census)?);
        }
    }
    println!("{}", result.population_count());

    Ok(())
}
