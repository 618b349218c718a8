//! Синтез высот: октавный шум, смещение координат, форма суши и порог воды.

use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use crate::config::{ShapeMode, TerrainParams};
use crate::error::TerrainError;
use crate::grid::Grid;
use crate::noise::GradientNoise;
use crate::seed::{Stream, stream_rng};

/// Порог воды: тайлы ниже него становятся водой
pub const WATER_LEVEL: f32 = 0.4;

/// Частота вспомогательного шума, смещающего координаты
const WARP_FREQUENCY: f32 = 0.03;
/// Сдвиг второго канала смещения, чтобы оси не коррелировали
const WARP_OFFSET: f32 = 100.0;
/// Максимальное смещение координат в клетках
const WARP_STRENGTH: f32 = 10.0;
/// Доли базового и смещённого шума при смешивании
const BASE_WEIGHT: f32 = 0.6;
const WARP_WEIGHT: f32 = 0.4;
/// Усиление после формы, возвращающее динамический диапазон
const SHAPE_BOOST: f32 = 1.5;

/// Числовые параметры режимов формы
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeProfile {
    /// Доля протяжённости карты, к которой нормируется расстояние от центра
    pub continent_extent: f32,
    /// Коэффициент при квадрате расстояния в затухании
    pub continent_falloff: f32,
    /// Доля высоты, сохраняемая без затухания
    pub continent_base: f32,
    /// Минимальное число островных центров
    pub islands_min: u32,
    /// Максимальное число дополнительных центров
    pub islands_extra: u32,
    /// Крутизна спада влияния острова
    pub island_falloff: f32,
    /// Нижняя граница высот нагорья
    pub highlands_floor: f32,
}

impl Default for ShapeProfile {
    fn default() -> Self {
        Self {
            continent_extent: 0.8,
            continent_falloff: 0.8,
            continent_base: 0.3,
            islands_min: 5,
            islands_extra: 3,
            island_falloff: 3.0,
            highlands_floor: 0.5,
        }
    }
}

/// Форма суши, готовая к применению к отдельному тайлу
#[derive(Debug, Clone)]
enum Shape {
    Continent,
    Archipelago { centers: Vec<(f32, f32)> },
    Highlands,
    None,
}

impl Shape {
    /// Центры островов бросаются один раз на всю генерацию
    fn prepare(params: &TerrainParams, profile: &ShapeProfile) -> Self {
        match params.mode {
            ShapeMode::Continent => Shape::Continent,
            ShapeMode::Highlands => Shape::Highlands,
            ShapeMode::None => Shape::None,
            ShapeMode::Archipelago => {
                let mut rng = stream_rng(params.seed, Stream::Islands);
                let count = profile.islands_min + rng.gen_range(0..=profile.islands_extra);
                let w = params.width as f32;
                let h = params.height as f32;
                let centers = (0..count)
                    .map(|_| (rng.gen_range(0.0..w), rng.gen_range(0.0..h)))
                    .collect();
                Shape::Archipelago { centers }
            }
        }
    }

    fn apply(
        &self,
        profile: &ShapeProfile,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        elevation: f32,
    ) -> f32 {
        match self {
            Shape::Continent => {
                let dx = (x - width / 2.0) / (width * profile.continent_extent);
                let dy = (y - height / 2.0) / (height * profile.continent_extent);
                let distance_sq = dx * dx + dy * dy;
                let falloff = (1.0 - distance_sq * profile.continent_falloff).max(0.0);
                elevation * profile.continent_base
                    + (elevation * falloff) * (1.0 - profile.continent_base)
            }
            Shape::Archipelago { centers } => {
                let max_influence = centers
                    .iter()
                    .map(|&(cx, cy)| {
                        let dx = (x - cx) / width;
                        let dy = (y - cy) / height;
                        let distance = (dx * dx + dy * dy).sqrt();
                        (1.0 - distance * profile.island_falloff).max(0.0)
                    })
                    .fold(0.0_f32, f32::max);
                elevation * max_influence
            }
            Shape::Highlands => {
                profile.highlands_floor + elevation * (1.0 - profile.highlands_floor)
            }
            Shape::None => elevation,
        }
    }
}

/// Многооктавный шум в точке, приведённый к `[0, 1]`
#[must_use]
pub fn octave_noise(noise: &GradientNoise, params: &TerrainParams, x: f32, y: f32) -> f32 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_amplitude = 0.0;

    for _ in 0..params.octaves {
        let sample_x = x / params.scale * frequency;
        let sample_y = y / params.scale * frequency;
        total += noise.get(sample_x, sample_y) * amplitude;

        max_amplitude += amplitude;
        amplitude *= params.persistence;
        frequency *= params.lacunarity;
    }

    (total / max_amplitude + 1.0) / 2.0
}

/// Октавный шум, смешанный с шумом в смещённых координатах.
///
/// Результат до применения формы: в режиме `none` это и есть итоговая высота (до обрезки).
#[must_use]
pub fn warped_elevation(noise: &GradientNoise, params: &TerrainParams, x: f32, y: f32) -> f32 {
    let base = octave_noise(noise, params, x, y);

    let warp_x = x + noise.get(x * WARP_FREQUENCY, y * WARP_FREQUENCY) * WARP_STRENGTH;
    let warp_y = y + noise.get(
        x * WARP_FREQUENCY + WARP_OFFSET,
        y * WARP_FREQUENCY + WARP_OFFSET,
    ) * WARP_STRENGTH;
    let warped = noise.get(warp_x / params.scale, warp_y / params.scale);

    base * BASE_WEIGHT + ((warped + 1.0) / 2.0) * WARP_WEIGHT
}

/// Синтезирует высоты и флаги воды для новой сетки.
///
/// Записывает только `elevation` и `water`; остальные поля тайлов остаются по умолчанию.
/// Неверные параметры отклоняются до записи первого тайла.
pub fn generate_elevation(params: &TerrainParams) -> Result<Grid, TerrainError> {
    generate_elevation_with_profile(params, &ShapeProfile::default())
}

pub fn generate_elevation_with_profile(
    params: &TerrainParams,
    profile: &ShapeProfile,
) -> Result<Grid, TerrainError> {
    params.validate()?;

    let width = params.width as usize;
    let len = width * params.height as usize;
    let width_f = params.width as f32;
    let height_f = params.height as f32;

    let noise = GradientNoise::new(params.seed);
    let shape = Shape::prepare(params, profile);
    let boost = if params.mode == ShapeMode::None {
        1.0
    } else {
        SHAPE_BOOST
    };

    #[cfg(feature = "parallel")]
    let indices = (0..len).into_par_iter();
    #[cfg(not(feature = "parallel"))]
    let indices = 0..len;

    let elevations: Vec<f32> = indices
        .map(|i| {
            let x = (i % width) as f32;
            let y = (i / width) as f32;

            let raw = warped_elevation(&noise, params, x, y);
            // Форма применяется к необрезанному значению
            let shaped = shape.apply(profile, x, y, width_f, height_f, raw);
            (shaped * boost).clamp(0.0, 1.0)
        })
        .collect();

    let grid = Grid::from_elevations(params.width, params.height, &elevations, WATER_LEVEL);

    let water = grid.tiles.iter().filter(|t| t.water).count();
    debug!(
        mode = %params.mode,
        water_fraction = water as f32 / grid.len() as f32,
        "Высоты синтезированы"
    );
    Ok(grid)
}
