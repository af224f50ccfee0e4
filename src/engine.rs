use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::{
    rng::{RngManager, SystemRng},
    snapshot::SnapshotWriter,
    world::Farm,
};

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    pub snapshot_interval_ticks: u64,
    pub snapshot_dir: PathBuf,
    /// Stop before `max_ticks` once no site can grow.
    pub stop_when_mature: bool,
}

pub struct EngineBuilder {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            rng: RngManager::new(self.settings.seed),
            systems: self.systems,
            snapshot_writer: SnapshotWriter::new(
                &self.settings.snapshot_dir,
                self.settings.snapshot_interval_ticks,
            ),
            settings: self.settings,
        }
    }
}

pub struct Engine {
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    snapshot_writer: SnapshotWriter,
    settings: EngineSettings,
}

impl Engine {
    /// Runs up to `max_ticks` ticks and returns how many were executed.
    pub fn run(&mut self, farm: &mut Farm, max_ticks: u64) -> Result<u64> {
        self.run_with_hook(farm, max_ticks, |_| {})
    }

    /// Like [`Engine::run`], calling `hook` with the farm after every tick.
    pub fn run_with_hook<F>(&mut self, farm: &mut Farm, max_ticks: u64, mut hook: F) -> Result<u64>
    where
        F: FnMut(&Farm),
    {
        let mut executed = 0;
        while executed < max_ticks {
            if self.settings.stop_when_mature && farm.all_mature() {
                info!(tick = farm.tick(), "every site is mature, stopping early");
                break;
            }
            self.step(farm)?;
            executed += 1;
            hook(farm);
        }
        Ok(executed)
    }

    fn step(&mut self, farm: &mut Farm) -> Result<()> {
        let current_tick = farm.tick();
        for system in &mut self.systems {
            let mut rng_stream = self.rng.stream(system.name());
            let ctx = SystemContext {
                tick: current_tick,
                scenario_name: &self.settings.scenario_name,
            };
            system.run(&ctx, farm, &mut rng_stream)?;
        }
        farm.advance_time();
        self.snapshot_writer
            .maybe_write(farm, &self.settings.scenario_name)?;
        Ok(())
    }
}

pub struct SystemContext<'a> {
    pub tick: u64,
    pub scenario_name: &'a str,
}

pub trait System {
    fn name(&self) -> &str;
    fn run(&mut self, ctx: &SystemContext, farm: &mut Farm, rng: &mut SystemRng<'_>)
        -> Result<()>;
}
