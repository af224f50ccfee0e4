use super::Species;

/// Tier 4 reed that favours wet ground over open air.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stickreed;

impl Species for Stickreed {
    fn name(&self) -> &str {
        "stickreed"
    }

    fn tier(&self) -> u32 {
        4
    }

    fn max_size(&self) -> u32 {
        4
    }

    fn growth_duration(&self, size: u32) -> u32 {
        if size == 4 {
            400
        } else {
            100
        }
    }

    fn weight_influences(&self, humidity: f64, nutrients: f64, air_quality: f64) -> f64 {
        humidity * 1.2 + nutrients + air_quality * 0.8
    }
}
