//! The planted-crop simulation unit.
//!
//! A [`CropGrowthSite`] binds one [`CropVariety`] to one world location. Every
//! tick it compares what the environment supplies against what the crop's
//! genetics demand and converts the difference into growth points; enough
//! points advance the crop by one stage.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::biome::Biome;
use crate::crop::{CropStats, CropVariety};

fn default_height() -> i32 {
    124
}

fn default_soil_depth() -> i32 {
    3
}

fn default_true() -> bool {
    true
}

/// How the soil depth feeds the nutrient score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoilDepthBonus {
    /// Adds the raw depth, matching the established game mechanic.
    #[default]
    Unclamped,
    /// Caps the depth contribution at 3.
    Clamped,
}

impl SoilDepthBonus {
    fn apply(self, soil_depth: u32) -> u32 {
        match self {
            SoilDepthBonus::Unclamped => soil_depth,
            SoilDepthBonus::Clamped => soil_depth.min(3),
        }
    }
}

/// Environmental snapshot supplied by the host when a crop is planted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConditions {
    #[serde(default = "default_height")]
    pub height: i32,
    #[serde(default)]
    pub surrounding_blocks: i32,
    #[serde(default = "default_true")]
    pub can_see_sky: bool,
    #[serde(default = "default_soil_depth")]
    pub soil_depth: i32,
    #[serde(default = "default_true")]
    pub hydrated_soil: bool,
    #[serde(default)]
    pub water_storage: i32,
    #[serde(default)]
    pub nutrient_storage: i32,
    #[serde(default)]
    pub soil_depth_bonus: SoilDepthBonus,
}

impl Default for SiteConditions {
    fn default() -> Self {
        Self {
            height: default_height(),
            surrounding_blocks: 0,
            can_see_sky: true,
            soil_depth: default_soil_depth(),
            hydrated_soil: true,
            water_storage: 0,
            nutrient_storage: 0,
            soil_depth_bonus: SoilDepthBonus::default(),
        }
    }
}

impl SiteConditions {
    pub fn validate(&self) -> Result<(), SiteError> {
        for (field, value) in [
            ("surrounding_blocks", self.surrounding_blocks),
            ("soil_depth", self.soil_depth),
            ("water_storage", self.water_storage),
            ("nutrient_storage", self.nutrient_storage),
        ] {
            non_negative(field, value)?;
        }
        Ok(())
    }
}

fn non_negative(field: &'static str, value: i32) -> Result<u32, SiteError> {
    u32::try_from(value).map_err(|_| SiteError::Negative { field, value })
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SiteError {
    #[error("site condition '{field}' must not be negative (got {value})")]
    Negative { field: &'static str, value: i32 },
}

/// Outcome of a single growth roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthRate {
    Points(u32),
    /// The environment fell far short and weeds overran the crop.
    WeedReset,
}

impl GrowthRate {
    pub fn points(self) -> u32 {
        match self {
            GrowthRate::Points(points) => points,
            GrowthRate::WeedReset => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteEvent {
    WeedReset,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub points_added: u32,
    pub stage_advanced: bool,
    pub event: Option<SiteEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSnapshot {
    pub crop: String,
    pub stats: CropStats,
    pub tier: u32,
    pub size: u32,
    pub biome: String,
    pub height: i32,
    pub surrounding_blocks: u32,
    pub can_see_sky: bool,
    pub soil_depth: u32,
    pub hydrated_soil: bool,
    pub growth_points: u32,
    pub nutrient_storage: u32,
    pub water_storage: u32,
    pub tick_count: u64,
}

#[derive(Debug)]
pub struct CropGrowthSite {
    crop: CropVariety,
    biome: Arc<Biome>,
    height: i32,
    surrounding_blocks: u32,
    can_see_sky: bool,
    soil_depth: u32,
    hydrated_soil: bool,
    soil_depth_bonus: SoilDepthBonus,
    growth_points: u32,
    nutrient_storage: u32,
    water_storage: u32,
    tick_count: u64,
}

impl CropGrowthSite {
    pub fn new(
        crop: CropVariety,
        biome: Arc<Biome>,
        conditions: SiteConditions,
    ) -> Result<Self, SiteError> {
        Ok(Self {
            crop,
            biome,
            height: conditions.height,
            surrounding_blocks: non_negative("surrounding_blocks", conditions.surrounding_blocks)?,
            can_see_sky: conditions.can_see_sky,
            soil_depth: non_negative("soil_depth", conditions.soil_depth)?,
            hydrated_soil: conditions.hydrated_soil,
            soil_depth_bonus: conditions.soil_depth_bonus,
            growth_points: 0,
            nutrient_storage: non_negative("nutrient_storage", conditions.nutrient_storage)?,
            water_storage: non_negative("water_storage", conditions.water_storage)?,
            tick_count: 0,
        })
    }

    /// Advances the site by one simulation step.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TickReport {
        let mut report = TickReport::default();
        self.crop.tick();

        if self.crop.can_grow() {
            match self.calc_growth_rate(rng) {
                GrowthRate::Points(points) => {
                    self.growth_points = self.growth_points.saturating_add(points);
                    report.points_added = points;
                }
                GrowthRate::WeedReset => {
                    self.reset();
                    report.event = Some(SiteEvent::WeedReset);
                }
            }
        }

        if self.growth_points >= self.crop.growth_duration() {
            self.growth_points = 0;
            self.crop.advance_stage();
            report.stage_advanced = true;
            debug!(
                crop = self.crop.name(),
                size = self.crop.size(),
                tick = self.tick_count,
                "crop advanced a stage"
            );
        }

        self.nutrient_storage = self.nutrient_storage.saturating_sub(1);
        self.water_storage = self.water_storage.saturating_sub(1);
        self.tick_count += 1;
        report
    }

    /// Rolls this tick's growth increment from environment and genetics.
    pub fn calc_growth_rate<R: Rng + ?Sized>(&self, rng: &mut R) -> GrowthRate {
        let stats = self.crop.stats();
        let mut base = 3.0 + f64::from(rng.gen_range(0..=6u32)) + f64::from(stats.growth);

        let need = ((i64::from(self.crop.tier()) - 1) * 4
            + i64::from(stats.growth)
            + i64::from(stats.gain)
            + i64::from(stats.resistance))
        .max(0) as f64;
        let have = self.crop.weight_influences(
            self.humidity(),
            self.nutrients(),
            (self.air_quality() * 5) as f64,
        );
        trace!(need, have, "growth roll");

        if have >= need {
            base *= (100.0 + (have - need)) / 100.0;
            return GrowthRate::Points(base.trunc() as u32);
        }

        let neg = (need - have) * 4.0;
        if neg > 100.0 {
            debug!(need, have, "stats too low and can grow weed");
            if rng.gen_range(0..=31u32) > stats.resistance {
                return GrowthRate::WeedReset;
            }
        } else {
            debug!(need, have, "stats too low but cannot grow weed");
        }

        base *= (100.0 - neg) / 100.0;
        GrowthRate::Points(base.trunc().max(0.0) as u32)
    }

    pub fn humidity(&self) -> f64 {
        let mut value = f64::from(self.biome.rainfall);
        if self.hydrated_soil {
            value += 2.0;
        }
        if self.water_storage >= 5 {
            value += 2.0;
        }
        value + (f64::from(self.water_storage) + 24.0) / 25.0
    }

    pub fn nutrients(&self) -> f64 {
        let depth = self.soil_depth_bonus.apply(self.soil_depth);
        f64::from(self.biome.nutrient)
            + f64::from(depth)
            + (f64::from(self.nutrient_storage) + 19.0) / 20.0
    }

    pub fn air_quality(&self) -> i64 {
        let height_modifier = (i64::from(self.height) - 64).div_euclid(15).clamp(0, 4);
        let freshness = (9 - i64::from(self.surrounding_blocks)).max(0) / 2;
        let sky = if self.can_see_sky { 2 } else { 0 };
        height_modifier + freshness + sky
    }

    /// Drop generation belongs to the host; the site only marks the boundary.
    pub fn harvest_automated(&mut self) {
        debug!(
            crop = self.crop.name(),
            size = self.crop.size(),
            "automated harvest requested"
        );
    }

    // Weeds overrun the crop: progress is lost and it starts over.
    fn reset(&mut self) {
        debug!(
            crop = self.crop.name(),
            size = self.crop.size(),
            "weeds overran crop"
        );
        self.growth_points = 0;
        self.crop.regress();
    }

    pub fn crop(&self) -> &CropVariety {
        &self.crop
    }

    pub fn biome(&self) -> &Arc<Biome> {
        &self.biome
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn surrounding_blocks(&self) -> u32 {
        self.surrounding_blocks
    }

    pub fn can_see_sky(&self) -> bool {
        self.can_see_sky
    }

    pub fn soil_depth(&self) -> u32 {
        self.soil_depth
    }

    pub fn hydrated_soil(&self) -> bool {
        self.hydrated_soil
    }

    pub fn growth_points(&self) -> u32 {
        self.growth_points
    }

    pub fn nutrient_storage(&self) -> u32 {
        self.nutrient_storage
    }

    pub fn water_storage(&self) -> u32 {
        self.water_storage
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn snapshot(&self) -> SiteSnapshot {
        SiteSnapshot {
            crop: self.crop.name().to_string(),
            stats: self.crop.stats(),
            tier: self.crop.tier(),
            size: self.crop.size(),
            biome: self.biome.name.clone(),
            height: self.height,
            surrounding_blocks: self.surrounding_blocks,
            can_see_sky: self.can_see_sky,
            soil_depth: self.soil_depth,
            hydrated_soil: self.hydrated_soil,
            growth_points: self.growth_points,
            nutrient_storage: self.nutrient_storage,
            water_storage: self.water_storage,
            tick_count: self.tick_count,
        }
    }
}
