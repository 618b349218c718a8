//! Сетка тайлов — общее хранилище всех этапов.
//!
//! Высоты и вода пишутся синтезом, `river` — гидрологией, влажность и биом —
//! климатом и классификатором.

use crate::biome::Biome;

/// Одна клетка карты
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    /// Высота от 0.0 (глубокий океан) до 1.0 (вершины)
    pub elevation: f32,
    /// Влажность от 0.0 до 1.0, заполняется климатическим этапом
    pub moisture: f32,
    /// Биом, назначается один раз последним этапом
    pub biome: Option<Biome>,
    /// Фиксируется при синтезе высот и больше не меняется
    pub water: bool,
    /// Выставляется только гидрологией
    pub river: bool,
    pub river_size: u32,
    pub terrain_feature: Option<String>,
}

impl Tile {
    #[must_use]
    pub fn new(x: u32, y: u32) -> Self {
        Self {
            x,
            y,
            elevation: 0.0,
            moisture: 0.0,
            biome: None,
            water: false,
            river: false,
            river_size: 0,
            terrain_feature: None,
        }
    }
}

/// Плотная сетка `width × height` тайлов, хранится построчно
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub width: u32,
    pub height: u32,
    pub tiles: Vec<Tile>,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Self {
        let tiles = (0..height)
            .flat_map(|y| (0..width).map(move |x| Tile::new(x, y)))
            .collect();
        Self {
            width,
            height,
            tiles,
        }
    }

    /// Собирает сетку из готовых высот; `water` вычисляется по порогу `water_level`.
    ///
    /// Удобно для проверки гидрологии и климата на синтетическом рельефе.
    ///
    /// # Panics
    /// Если длина `elevations` не равна `width * height`.
    pub fn from_elevations(width: u32, height: u32, elevations: &[f32], water_level: f32) -> Self {
        assert_eq!(
            elevations.len(),
            width as usize * height as usize,
            "elevation buffer does not match grid size"
        );
        let mut grid = Self::new(width, height);
        for (tile, &e) in grid.tiles.iter_mut().zip(elevations) {
            tile.elevation = e;
            tile.water = e < water_level;
        }
        grid
    }

    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> &Tile {
        &self.tiles[self.index(x, y)]
    }

    pub fn get_mut(&mut self, x: u32, y: u32) -> &mut Tile {
        let idx = self.index(x, y);
        &mut self.tiles[idx]
    }

    /// Проверяет, что точка со знаковыми координатами лежит внутри карты
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.len(), 12);
        let tile = grid.get(3, 2);
        assert_eq!((tile.x, tile.y), (3, 2));
        assert_eq!(grid.index(1, 1), 5);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_index_does_not_overflow_u32() {
        let grid = Grid {
            width: 100_000,
            height: 100_000,
            tiles: Vec::new(),
        };
        assert_eq!(grid.index(99_999, 99_999), 9_999_999_999);
    }

    #[test]
    fn test_from_elevations_sets_water() {
        let grid = Grid::from_elevations(2, 1, &[0.2, 0.6], 0.4);
        assert!(grid.get(0, 0).water);
        assert!(!grid.get(1, 0).water);
    }

    #[test]
    fn test_contains() {
        let grid = Grid::new(5, 5);
        assert!(grid.contains(0, 4));
        assert!(!grid.contains(-1, 0));
        assert!(!grid.contains(5, 0));
    }

    #[test]
    fn test_new_tile_defaults() {
        let tile = Tile::new(1, 2);
        assert!(!tile.river);
        assert_eq!(tile.river_size, 0);
        assert!(tile.terrain_feature.is_none());
        assert!(tile.biome.is_none());
    }
}
