pub mod biome;
pub mod crop;
pub mod engine;
pub mod rng;
pub mod scenario;
pub mod site;
pub mod snapshot;
pub mod systems;
pub mod world;

pub use biome::Biome;
pub use crop::{CropStats, CropVariety, Species, Stickreed};
pub use engine::{Engine, EngineBuilder, EngineSettings};
pub use site::{CropGrowthSite, GrowthRate, SiteConditions, SiteEvent, SoilDepthBonus, TickReport};
pub use world::{Farm, SiteId};
