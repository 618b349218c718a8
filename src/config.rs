// src/config.rs
//! Конфигурация генерации рельефа
//!
//! Этот модуль определяет все параметры, управляющие синтезом рельефа:
//! - Режим формы суши (континент, архипелаг, нагорье, без формы)
//! - Параметры многооктавного шума
//! - Количество рек и преобладающий ветер
//! - Таблицу правил биомов
//!
//! Все структуры поддерживают сериализацию в TOML/JSON для удобной настройки через конфигурационные файлы.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::biome::BiomeTable;
use crate::error::TerrainError;

/// Минимальный размер карты по каждой оси: на меньших картах октавный шум
/// при заданном масштабе статистически бессмысленен.
pub const MIN_MAP_SIZE: u32 = 50;

/// Макроформа суши, применяемая к высотам после шума
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ShapeMode {
    /// Радиальное затухание от центра: один крупный материк
    #[default]
    Continent,
    /// Несколько островных центров с резким затуханием
    Archipelago,
    /// Поднятое основание, сжатый вверх диапазон
    Highlands,
    /// Без изменения формы и без последующего усиления
    None,
}

impl ShapeMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeMode::Continent => "continent",
            ShapeMode::Archipelago => "archipelago",
            ShapeMode::Highlands => "highlands",
            ShapeMode::None => "none",
        }
    }
}

impl fmt::Display for ShapeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Преобладающий ветер: направление, откуда он дует
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Wind {
    #[default]
    West,
    East,
    North,
    South,
}

impl Wind {
    /// Шаг по сетке в наветренную сторону (туда, откуда приходит воздух)
    #[must_use]
    pub fn upwind_step(self) -> (i64, i64) {
        match self {
            Wind::West => (-1, 0),
            Wind::East => (1, 0),
            Wind::North => (0, -1),
            Wind::South => (0, 1),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Wind::West => "west",
            Wind::East => "east",
            Wind::North => "north",
            Wind::South => "south",
        }
    }
}

impl fmt::Display for Wind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Основные параметры генерации рельефа
///
/// Полная конфигурация одного запуска. Одинаковые параметры всегда дают одинаковую карту.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TerrainParams {
    /// Сид генератора случайных чисел (детерминированная генерация)
    pub seed: u64,

    /// Ширина карты в тайлах (не меньше 50)
    #[serde(default = "default_width")]
    pub width: u32,

    /// Высота карты в тайлах (не меньше 50)
    #[serde(default = "default_height")]
    pub height: u32,

    /// Режим формы суши (по умолчанию `continent`)
    #[serde(default)]
    pub mode: ShapeMode,

    /// Количество октав шума (детализация)
    #[serde(default = "default_octaves")]
    pub octaves: u32,

    /// Затухание амплитуды на каждую октаву
    #[serde(default = "default_persistence")]
    pub persistence: f32,

    /// Рост частоты на каждую октаву
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f32,

    /// Масштаб шума: больше значение — крупнее формы рельефа
    #[serde(default = "default_scale")]
    pub scale: f32,

    /// Запрошенное число рек (верхняя граница, не гарантия)
    #[serde(default = "default_river_count")]
    pub river_count: usize,

    /// Преобладающий ветер для дождевой тени
    #[serde(default)]
    pub prevailing_wind: Wind,

    /// Таблица правил биомов (по умолчанию стандартная)
    #[serde(default)]
    pub biomes: BiomeTable,
}

fn default_width() -> u32 {
    80
}
fn default_height() -> u32 {
    60
}
fn default_octaves() -> u32 {
    5
}
fn default_persistence() -> f32 {
    0.5
}
fn default_lacunarity() -> f32 {
    2.0
}
fn default_scale() -> f32 {
    100.0
}
fn default_river_count() -> usize {
    8
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 0,
            width: default_width(),
            height: default_height(),
            mode: ShapeMode::default(),
            octaves: default_octaves(),
            persistence: default_persistence(),
            lacunarity: default_lacunarity(),
            scale: default_scale(),
            river_count: default_river_count(),
            prevailing_wind: Wind::default(),
            biomes: BiomeTable::default(),
        }
    }
}

impl TerrainParams {
    /// Параметры по умолчанию с заданным сидом
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Загружает параметры из TOML-файла
    ///
    /// # Пример
    /// ```toml
    /// # terrain.toml
    /// seed = 42
    /// width = 120
    /// height = 80
    /// mode = "archipelago"
    /// prevailing_wind = "east"
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, TerrainError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, TerrainError> {
        Ok(toml::from_str(contents)?)
    }

    /// Проверяет параметры до начала любых вычислений
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.width < MIN_MAP_SIZE || self.height < MIN_MAP_SIZE {
            return Err(TerrainError::MapTooSmall {
                width: self.width,
                height: self.height,
                min: MIN_MAP_SIZE,
            });
        }
        if self.octaves == 0 {
            return Err(TerrainError::InvalidParameter {
                name: "octaves",
                reason: "must be at least 1",
            });
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(TerrainError::InvalidParameter {
                name: "scale",
                reason: "must be a positive finite number",
            });
        }
        if !(self.persistence.is_finite() && self.persistence > 0.0) {
            return Err(TerrainError::InvalidParameter {
                name: "persistence",
                reason: "must be a positive finite number",
            });
        }
        if !(self.lacunarity.is_finite() && self.lacunarity > 0.0) {
            return Err(TerrainError::InvalidParameter {
                name: "lacunarity",
                reason: "must be a positive finite number",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_cli() {
        let params = TerrainParams::default();
        assert_eq!((params.width, params.height), (80, 60));
        assert_eq!(params.mode, ShapeMode::Continent);
        assert_eq!(params.octaves, 5);
        assert_eq!(params.river_count, 8);
        assert_eq!(params.prevailing_wind, Wind::West);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_toml_partial_uses_defaults() {
        let params = TerrainParams::from_toml_str(
            "seed = 42\nmode = \"archipelago\"\nprevailing_wind = \"north\"\n",
        )
        .unwrap();
        assert_eq!(params.seed, 42);
        assert_eq!(params.mode, ShapeMode::Archipelago);
        assert_eq!(params.prevailing_wind, Wind::North);
        assert_eq!(params.width, 80);
        assert_eq!(params.scale, 100.0);
    }

    #[test]
    fn test_toml_requires_seed() {
        let result = TerrainParams::from_toml_str("width = 100\n");
        assert!(matches!(result, Err(TerrainError::Toml(_))));
    }

    #[test]
    fn test_toml_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terrain.toml");
        fs::write(&path, "seed = 7\nwidth = 64\nheight = 52\nmode = \"none\"\n").unwrap();

        let params = TerrainParams::from_toml_file(&path).unwrap();
        assert_eq!((params.width, params.height), (64, 52));
        assert_eq!(params.mode, ShapeMode::None);
    }

    #[test]
    fn test_validate_rejects_small_maps() {
        let params = TerrainParams {
            width: 49,
            ..TerrainParams::with_seed(1)
        };
        assert!(matches!(
            params.validate(),
            Err(TerrainError::MapTooSmall { width: 49, .. })
        ));

        let params = TerrainParams {
            height: 10,
            ..TerrainParams::with_seed(1)
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_degenerate_noise() {
        let params = TerrainParams {
            octaves: 0,
            ..TerrainParams::with_seed(1)
        };
        assert!(matches!(
            params.validate(),
            Err(TerrainError::InvalidParameter { name: "octaves", .. })
        ));

        let params = TerrainParams {
            scale: 0.0,
            ..TerrainParams::with_seed(1)
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_wind_upwind_steps() {
        assert_eq!(Wind::West.upwind_step(), (-1, 0));
        assert_eq!(Wind::East.upwind_step(), (1, 0));
        assert_eq!(Wind::North.upwind_step(), (0, -1));
        assert_eq!(Wind::South.upwind_step(), (0, 1));
    }

    #[test]
    fn test_cli_values_match_serde_names() {
        for mode in ShapeMode::value_variants() {
            assert_eq!(ShapeMode::from_str(mode.as_str(), false), Ok(*mode));
        }
        for wind in Wind::value_variants() {
            assert_eq!(Wind::from_str(wind.as_str(), false), Ok(*wind));
        }
        assert!(ShapeMode::from_str("plateau", false).is_err());
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(ShapeMode::None.to_string(), "none");
        assert_eq!(
            serde_json::to_string(&ShapeMode::Highlands).unwrap(),
            "\"highlands\""
        );
    }
}
