use serde::{Deserialize, Serialize};

/// Fixed environmental bonuses shared by every site planted in the biome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Biome {
    pub name: String,
    pub rainfall: u32,
    pub nutrient: u32,
}

impl Biome {
    pub fn new(name: impl Into<String>, rainfall: u32, nutrient: u32) -> Self {
        Self {
            name: name.into(),
            rainfall,
            nutrient,
        }
    }
}
