//! Классификация биомов по таблице правил высоты и влажности.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::grid::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    DeepOcean,
    Ocean,
    Beach,
    Mountain,
    Highland,
    Wetlands,
    TemperateForest,
    #[default]
    Grassland,
    Desert,
}

impl Biome {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Biome::DeepOcean => "deep_ocean",
            Biome::Ocean => "ocean",
            Biome::Beach => "beach",
            Biome::Mountain => "mountain",
            Biome::Highland => "highland",
            Biome::Wetlands => "wetlands",
            Biome::TemperateForest => "temperate_forest",
            Biome::Grassland => "grassland",
            Biome::Desert => "desert",
        }
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Правило таблицы: высота в полуинтервале `[lo, hi)`, влажность в отрезке `[lo, hi]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeRule {
    pub biome: Biome,
    pub elevation: [f32; 2],
    /// Без ограничения — весь диапазон `[0, 1]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moisture: Option<[f32; 2]>,
}

impl BiomeRule {
    #[must_use]
    pub fn new(biome: Biome, elevation: [f32; 2]) -> Self {
        Self {
            biome,
            elevation,
            moisture: None,
        }
    }

    #[must_use]
    pub fn with_moisture(mut self, moisture: [f32; 2]) -> Self {
        self.moisture = Some(moisture);
        self
    }

    #[must_use]
    pub fn matches(&self, elevation: f32, moisture: f32) -> bool {
        let [e_lo, e_hi] = self.elevation;
        let [m_lo, m_hi] = self.moisture.unwrap_or([0.0, 1.0]);
        (e_lo..e_hi).contains(&elevation) && (m_lo..=m_hi).contains(&moisture)
    }
}

/// Таблица правил в порядке приоритета: побеждает первое подходящее
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeTable {
    pub rules: Vec<BiomeRule>,
    /// Биом, если ни одно правило не подошло
    #[serde(default)]
    pub fallback: Biome,
}

impl Default for BiomeTable {
    fn default() -> Self {
        Self {
            rules: vec![
                BiomeRule::new(Biome::DeepOcean, [0.0, 0.3]),
                BiomeRule::new(Biome::Ocean, [0.3, 0.38]),
                BiomeRule::new(Biome::Beach, [0.38, 0.42]),
                BiomeRule::new(Biome::Mountain, [0.78, 1.0]),
                BiomeRule::new(Biome::Highland, [0.7, 0.78]),
                BiomeRule::new(Biome::Wetlands, [0.42, 0.5]).with_moisture([0.7, 1.0]),
                BiomeRule::new(Biome::TemperateForest, [0.42, 0.7]).with_moisture([0.6, 1.0]),
                BiomeRule::new(Biome::Grassland, [0.42, 0.7]).with_moisture([0.25, 0.6]),
                BiomeRule::new(Biome::Desert, [0.42, 0.7]).with_moisture([0.0, 0.25]),
            ],
            fallback: Biome::Grassland,
        }
    }
}

impl BiomeTable {
    /// Чистая функция от высоты и влажности
    #[must_use]
    pub fn classify(&self, elevation: f32, moisture: f32) -> Biome {
        self.rules
            .iter()
            .find(|rule| rule.matches(elevation, moisture))
            .map_or(self.fallback, |rule| rule.biome)
    }
}

/// Назначает биомы всем тайлам по высоте и влажности; сетку не меняет
#[must_use]
pub fn assign_biomes(grid: &Grid, table: &BiomeTable) -> Vec<Biome> {
    #[cfg(feature = "parallel")]
    let tiles = grid.tiles.par_iter();
    #[cfg(not(feature = "parallel"))]
    let tiles = grid.tiles.iter();

    tiles
        .map(|t| table.classify(t.elevation, t.moisture))
        .collect()
}

/// Записывает биомы в сетку
pub fn apply_biomes(grid: &mut Grid, biomes: &[Biome]) {
    for (tile, &biome) in grid.tiles.iter_mut().zip(biomes) {
        tile.biome = Some(biome);
    }
}
