use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    biome::Biome,
    crop::{species_by_name, CropError, CropStats, CropVariety},
    site::{CropGrowthSite, SiteConditions, SiteError},
    world::Farm,
};

fn default_ticks() -> u64 {
    100
}

fn default_stop_when_mature() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default)]
    pub snapshot_interval_ticks: u64,
    #[serde(default = "default_stop_when_mature")]
    pub stop_when_mature: bool,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub biomes: Vec<Biome>,
    pub sites: Vec<ScenarioSite>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioSite {
    pub biome: String,
    pub crop: ScenarioCrop,
    #[serde(default)]
    pub conditions: SiteConditions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioCrop {
    pub species: String,
    pub growth: u32,
    pub gain: u32,
    pub resistance: u32,
    #[serde(default)]
    pub size: u32,
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("biome '{0}' is defined more than once")]
    DuplicateBiome(String),
    #[error("site {index} references unknown biome '{biome}'")]
    UnknownBiome { index: usize, biome: String },
    #[error("site {index}: {source}")]
    Crop {
        index: usize,
        #[source]
        source: CropError,
    },
    #[error("site {index}: {source}")]
    Site {
        index: usize,
        #[source]
        source: SiteError,
    },
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn build_farm(&self) -> Result<Farm, ScenarioError> {
        let mut farm = Farm::new();
        for biome in &self.biomes {
            if farm.biome(&biome.name).is_some() {
                return Err(ScenarioError::DuplicateBiome(biome.name.clone()));
            }
            farm.add_biome(biome.clone());
        }

        for (index, planted) in self.sites.iter().enumerate() {
            let biome = farm
                .biome(&planted.biome)
                .ok_or_else(|| ScenarioError::UnknownBiome {
                    index,
                    biome: planted.biome.clone(),
                })?;
            let crop = &planted.crop;
            let species = species_by_name(&crop.species)
                .map_err(|source| ScenarioError::Crop { index, source })?;
            let variety = CropVariety::with_size(
                species,
                CropStats::new(crop.growth, crop.gain, crop.resistance),
                crop.size,
            )
            .map_err(|source| ScenarioError::Crop { index, source })?;
            let site = CropGrowthSite::new(variety, biome, planted.conditions.clone())
                .map_err(|source| ScenarioError::Site { index, source })?;
            farm.plant(site);
        }
        Ok(farm)
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or_else(default_ticks)
    }
}
