use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::world::Farm;

/// Writes a JSON snapshot of the farm every `interval_ticks` ticks.
pub struct SnapshotWriter {
    dir: PathBuf,
    interval_ticks: u64,
}

impl SnapshotWriter {
    pub fn new(dir: impl AsRef<Path>, interval_ticks: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval_ticks,
        }
    }

    pub fn should_write(&self, tick: u64) -> bool {
        self.interval_ticks != 0 && tick > 0 && tick % self.interval_ticks == 0
    }

    pub fn maybe_write(&self, farm: &Farm, scenario_name: &str) -> Result<Option<PathBuf>> {
        let tick = farm.tick();
        if !self.should_write(tick) {
            return Ok(None);
        }

        let dir = self.dir.join(scenario_name);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create snapshot dir {}", dir.display()))?;
        let path = dir.join(format!("tick_{tick:06}.json"));
        let json = serde_json::to_string_pretty(&farm.snapshot(scenario_name))?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        Ok(Some(path))
    }
}
