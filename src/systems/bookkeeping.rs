use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    world::Farm,
};

/// Records which sites have reached their final stage.
pub struct BookkeepingSystem;

impl BookkeepingSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BookkeepingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for BookkeepingSystem {
    fn name(&self) -> &str {
        "bookkeeping"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        farm: &mut Farm,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let mature = farm
            .sites
            .iter()
            .filter(|(_, site)| !site.crop().can_grow())
            .map(|(id, _)| *id);
        farm.bookkeeping.mature_sites.extend(mature);
        farm.bookkeeping.mature_sites.sort();
        farm.bookkeeping.mature_sites.dedup();
        Ok(())
    }
}
