use std::collections::BTreeSet;

use anyhow::Result;
use tracing::info;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    site::SiteEvent,
    world::{Farm, SiteId},
};

/// Ticks every planted site once per step, in site id order.
#[derive(Default)]
pub struct GrowthSystem {
    harvested: BTreeSet<SiteId>,
}

impl GrowthSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for GrowthSystem {
    fn name(&self) -> &str {
        "growth"
    }

    fn run(&mut self, ctx: &SystemContext, farm: &mut Farm, rng: &mut SystemRng<'_>) -> Result<()> {
        self.harvested.retain(|id| farm.sites.contains_key(id));
        for (id, site) in farm.sites.iter_mut() {
            let report = site.tick(rng);
            if report.event == Some(SiteEvent::WeedReset) {
                farm.bookkeeping.weed_resets += 1;
                info!(tick = ctx.tick, site = id.raw(), "weeds overran site");
            }
            if !site.crop().can_grow() && self.harvested.insert(*id) {
                site.harvest_automated();
            }
        }
        Ok(())
    }
}
