use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cropgrowth::{
    engine::{EngineBuilder, EngineSettings},
    scenario::ScenarioLoader,
    systems::{BookkeepingSystem, GrowthSystem},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Crop growth simulation runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/tropical_stickreed.yaml")]
    scenario: PathBuf,

    /// Override the maximum tick count (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override snapshot interval in ticks
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&scenario.logging.level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let mut farm = scenario.build_farm()?;
    let ticks = scenario.ticks(cli.ticks);
    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: cli.seed.unwrap_or(scenario.seed),
        snapshot_interval_ticks: cli
            .snapshot_interval
            .unwrap_or(scenario.snapshot_interval_ticks),
        snapshot_dir: cli
            .snapshot_dir
            .unwrap_or_else(|| PathBuf::from("snapshots")),
        stop_when_mature: scenario.stop_when_mature,
    };
    info!(
        scenario = %scenario.name,
        sites = farm.site_count(),
        max_ticks = ticks,
        "starting run"
    );

    let mut engine = EngineBuilder::new(settings)
        .with_system(GrowthSystem::new())
        .with_system(BookkeepingSystem::new())
        .build();
    let executed = engine.run(&mut farm, ticks)?;

    for id in farm.site_ids() {
        if let Some(site) = farm.site(id) {
            info!(
                site = id.raw(),
                crop = site.crop().name(),
                size = site.crop().size(),
                growth_points = site.growth_points(),
                water = site.water_storage(),
                nutrients = site.nutrient_storage(),
                "final state"
            );
        }
    }
    println!(
        "Scenario '{}' ran {} ticks. Mature sites: {}/{}, weed resets: {}",
        scenario.name,
        executed,
        farm.bookkeeping().mature_sites.len(),
        farm.site_count(),
        farm.bookkeeping().weed_resets
    );
    Ok(())
}
