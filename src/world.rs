use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::biome::Biome;
use crate::site::{CropGrowthSite, SiteSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SiteId(u64);

impl SiteId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct BookkeepingState {
    pub mature_sites: Vec<SiteId>,
    pub weed_resets: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlantedSite {
    pub id: u64,
    #[serde(flatten)]
    pub site: SiteSnapshot,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FarmSnapshot {
    pub scenario: String,
    pub tick: u64,
    pub mature_sites: usize,
    pub weed_resets: u64,
    pub sites: Vec<PlantedSite>,
}

/// Every planted site in the simulation plus the biomes they share.
#[derive(Default)]
pub struct Farm {
    next_site: u64,
    tick: u64,
    biomes: HashMap<String, Arc<Biome>>,
    pub(crate) sites: BTreeMap<SiteId, CropGrowthSite>,
    pub(crate) bookkeeping: BookkeepingState,
}

impl Farm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a biome, returning the shared handle sites should hold.
    pub fn add_biome(&mut self, biome: Biome) -> Arc<Biome> {
        let handle = Arc::new(biome);
        self.biomes.insert(handle.name.clone(), Arc::clone(&handle));
        handle
    }

    pub fn biome(&self, name: &str) -> Option<Arc<Biome>> {
        self.biomes.get(name).cloned()
    }

    pub fn plant(&mut self, site: CropGrowthSite) -> SiteId {
        let id = SiteId(self.next_site);
        self.next_site += 1;
        self.sites.insert(id, site);
        id
    }

    /// Removes a site, e.g. when its block is broken.
    pub fn remove(&mut self, id: SiteId) -> Option<CropGrowthSite> {
        self.bookkeeping.mature_sites.retain(|mature| *mature != id);
        self.sites.remove(&id)
    }

    pub fn site(&self, id: SiteId) -> Option<&CropGrowthSite> {
        self.sites.get(&id)
    }

    pub fn site_mut(&mut self, id: SiteId) -> Option<&mut CropGrowthSite> {
        self.sites.get_mut(&id)
    }

    pub fn site_ids(&self) -> Vec<SiteId> {
        self.sites.keys().copied().collect()
    }

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn advance_time(&mut self) {
        self.tick += 1;
    }

    /// True once no site can grow any further.
    pub fn all_mature(&self) -> bool {
        self.sites.values().all(|site| !site.crop().can_grow())
    }

    pub fn bookkeeping(&self) -> &BookkeepingState {
        &self.bookkeeping
    }

    pub fn snapshot(&self, scenario: &str) -> FarmSnapshot {
        let sites = self
            .sites
            .iter()
            .map(|(id, site)| PlantedSite {
                id: id.raw(),
                site: site.snapshot(),
            })
            .collect();
        FarmSnapshot {
            scenario: scenario.to_string(),
            tick: self.tick,
            mature_sites: self.bookkeeping.mature_sites.len(),
            weed_resets: self.bookkeeping.weed_resets,
            sites,
        }
    }
}
