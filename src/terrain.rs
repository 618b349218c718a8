//! Оркестрация этапов и артефакт `terrain.v1`
//!
//! Этапы выполняются строго по порядку: высоты → реки → влажность → биомы.
//! Каждый этап читает только поля, окончательно записанные предыдущими.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::biome::{Biome, apply_biomes, assign_biomes};
use crate::climate::{apply_moisture, calculate_moisture};
use crate::config::{ShapeMode, TerrainParams, Wind};
use crate::error::TerrainError;
use crate::grid::Grid;
use crate::heightmap::generate_elevation;
use crate::rivers::{River, generate_rivers};
use crate::seed::{Stream, stream_rng};

pub const SCHEMA: &str = "terrain.v1";

/// Готовый рельеф: сетка и сохранённые реки
#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    pub params: TerrainParams,
    pub grid: Grid,
    pub rivers: Vec<River>,
}

/// Генератор рельефа с проверенными параметрами
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    params: TerrainParams,
}

impl TerrainGenerator {
    /// Проверяет параметры: неверная конфигурация отклоняется до любых вычислений
    pub fn new(params: TerrainParams) -> Result<Self, TerrainError> {
        params.validate()?;
        Ok(Self { params })
    }

    #[must_use]
    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    pub fn generate(&self) -> Result<Terrain, TerrainError> {
        let params = &self.params;
        info!(
            seed = params.seed,
            "Генерация рельефа {}×{}",
            params.width,
            params.height
        );

        info!("Синтез высот...");
        let mut grid = generate_elevation(params)?;

        info!("Трассировка рек (запрошено {})...", params.river_count);
        let mut rng = stream_rng(params.seed, Stream::RiverSources);
        let rivers = generate_rivers(&mut grid, params.river_count, &mut rng);
        debug!(kept = rivers.len(), "Реки сохранены");

        info!("Расчёт влажности...");
        let moisture = calculate_moisture(&grid, params.prevailing_wind);
        apply_moisture(&mut grid, &moisture);

        info!("Назначение биомов...");
        let biomes = assign_biomes(&grid, &params.biomes);
        apply_biomes(&mut grid, &biomes);

        Ok(Terrain {
            params: params.clone(),
            grid,
            rivers,
        })
    }
}

/// Проверяет параметры и генерирует рельеф
pub fn generate_terrain(params: &TerrainParams) -> Result<Terrain, TerrainError> {
    TerrainGenerator::new(params.clone())?.generate()
}

impl Terrain {
    /// Средняя высота суши; 0.0, если суши нет
    #[must_use]
    pub fn average_land_elevation(&self) -> f32 {
        let (sum, count) = self
            .grid
            .tiles
            .iter()
            .filter(|t| !t.water)
            .fold((0.0_f32, 0usize), |(s, c), t| (s + t.elevation, c + 1));
        if count == 0 { 0.0 } else { sum / count as f32 }
    }

    /// Доля тайлов воды
    #[must_use]
    pub fn water_fraction(&self) -> f32 {
        if self.grid.is_empty() {
            return 0.0;
        }
        let water = self.grid.tiles.iter().filter(|t| t.water).count();
        water as f32 / self.grid.len() as f32
    }

    #[must_use]
    pub fn to_artifact(&self) -> TerrainArtifact {
        let p = &self.params;
        TerrainArtifact {
            schema: SCHEMA.to_string(),
            seed: p.seed,
            width: p.width,
            height: p.height,
            mode: p.mode,
            generation_params: GenerationParams {
                octaves: p.octaves,
                persistence: p.persistence,
                lacunarity: p.lacunarity,
                scale: p.scale,
                river_count: p.river_count,
                prevailing_wind: p.prevailing_wind,
            },
            tiles: self
                .grid
                .tiles
                .iter()
                .map(|t| TileRecord {
                    x: t.x,
                    y: t.y,
                    elevation: round3(t.elevation),
                    moisture: round3(t.moisture),
                    biome: t.biome.unwrap_or(p.biomes.fallback),
                    water: t.water,
                    river: t.river,
                })
                .collect(),
            rivers: self
                .rivers
                .iter()
                .map(|r| RiverRecord {
                    id: r.id.clone(),
                    source: [r.source.0, r.source.1],
                    mouth: [r.mouth.0, r.mouth.1],
                    length: r.length,
                })
                .collect(),
            features: Features::default(),
        }
    }

    /// Сохраняет артефакт в JSON с отступами
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), TerrainError> {
        let json = serde_json::to_string_pretty(&self.to_artifact())?;
        fs::write(path, json)?;
        Ok(())
    }
}

fn round3(v: f32) -> f32 {
    (v * 1000.0).round() / 1000.0
}

/// Артефакт рельефа — единственный контракт с последующими этапами
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainArtifact {
    pub schema: String,
    pub seed: u64,
    pub width: u32,
    pub height: u32,
    pub mode: ShapeMode,
    pub generation_params: GenerationParams,
    pub tiles: Vec<TileRecord>,
    pub rivers: Vec<RiverRecord>,
    pub features: Features,
}

impl TerrainArtifact {
    pub fn from_json_str(json: &str) -> Result<Self, TerrainError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TerrainError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub octaves: u32,
    pub persistence: f32,
    pub lacunarity: f32,
    pub scale: f32,
    pub river_count: usize,
    pub prevailing_wind: Wind,
}

/// Тайл в артефакте; высота и влажность округлены до трёх знаков
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
    pub x: u32,
    pub y: u32,
    pub elevation: f32,
    pub moisture: f32,
    pub biome: Biome,
    pub water: bool,
    pub river: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiverRecord {
    pub id: String,
    pub source: [u32; 2],
    pub mouth: [u32; 2],
    pub length: usize,
}

/// Зарезервировано: в этой версии всегда пусто
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    pub mountain_ranges: Vec<Vec<[u32; 2]>>,
    pub lakes: Vec<Vec<[u32; 2]>>,
}
