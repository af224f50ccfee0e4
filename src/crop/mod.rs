//! Crop genetics and species behaviour.
//!
//! A [`CropVariety`] pairs the fixed genetic stats of one planted crop with
//! the [`Species`] that decides how long each growth stage takes and how the
//! environment is weighted. Only the owning site changes the variety's size.

mod stickreed;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use stickreed::Stickreed;

/// Genetic traits fixed when the crop is bred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CropStats {
    pub growth: u32,
    pub gain: u32,
    pub resistance: u32,
}

impl CropStats {
    pub fn new(growth: u32, gain: u32, resistance: u32) -> Self {
        Self {
            growth,
            gain,
            resistance,
        }
    }
}

/// Per-species growth policy.
pub trait Species: Send {
    fn name(&self) -> &str;

    fn tier(&self) -> u32;

    /// Final growth stage; a crop at this size no longer grows.
    fn max_size(&self) -> u32;

    /// Growth points needed to leave `size`.
    fn growth_duration(&self, size: u32) -> u32;

    fn can_grow(&self, size: u32) -> bool {
        size < self.max_size()
    }

    /// Folds the three environment scores into a single supply value.
    fn weight_influences(&self, humidity: f64, nutrients: f64, air_quality: f64) -> f64 {
        humidity + nutrients + air_quality
    }

    fn tick(&mut self) {}
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CropError {
    #[error("unknown crop species '{0}'")]
    UnknownSpecies(String),
    #[error("size {size} exceeds the maximum stage {max} of {species}")]
    SizeOutOfRange { species: String, size: u32, max: u32 },
}

/// Looks up a species by its registered name.
pub fn species_by_name(name: &str) -> Result<Box<dyn Species>, CropError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "stickreed" => Ok(Box::new(Stickreed)),
        _ => Err(CropError::UnknownSpecies(name.to_string())),
    }
}

pub struct CropVariety {
    stats: CropStats,
    size: u32,
    species: Box<dyn Species>,
}

impl CropVariety {
    pub fn new(species: Box<dyn Species>, stats: CropStats) -> Self {
        Self {
            stats,
            size: 0,
            species,
        }
    }

    pub fn with_size(
        species: Box<dyn Species>,
        stats: CropStats,
        size: u32,
    ) -> Result<Self, CropError> {
        if size > species.max_size() {
            return Err(CropError::SizeOutOfRange {
                species: species.name().to_string(),
                size,
                max: species.max_size(),
            });
        }
        Ok(Self {
            stats,
            size,
            species,
        })
    }

    pub fn stickreed(growth: u32, gain: u32, resistance: u32) -> Self {
        Self::new(Box::new(Stickreed), CropStats::new(growth, gain, resistance))
    }

    pub fn name(&self) -> &str {
        self.species.name()
    }

    pub fn stats(&self) -> CropStats {
        self.stats
    }

    pub fn tier(&self) -> u32 {
        self.species.tier()
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn max_size(&self) -> u32 {
        self.species.max_size()
    }

    pub fn can_grow(&self) -> bool {
        self.species.can_grow(self.size)
    }

    pub fn growth_duration(&self) -> u32 {
        self.species.growth_duration(self.size)
    }

    pub fn weight_influences(&self, humidity: f64, nutrients: f64, air_quality: f64) -> f64 {
        self.species
            .weight_influences(humidity, nutrients, air_quality)
    }

    pub fn tick(&mut self) {
        self.species.tick();
    }

    pub(crate) fn advance_stage(&mut self) {
        self.size += 1;
    }

    pub(crate) fn regress(&mut self) {
        self.size = 0;
    }
}

impl fmt::Debug for CropVariety {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CropVariety")
            .field("species", &self.species.name())
            .field("stats", &self.stats)
            .field("tier", &self.tier())
            .field("size", &self.size)
            .finish()
    }
}
