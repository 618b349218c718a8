//! Влажность: близость воды, орографический подъём и дождевая тень.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::Wind;
use crate::grid::Grid;

/// Радиус окна (по Чебышёву) поиска ближайшей воды
pub const WATER_SEARCH_RADIUS: i64 = 40;
/// Расстояние, на котором влияние воды исчезает
const WATER_REACH: f32 = 30.0;
/// Вклад высоты во влажность (орографический подъём)
const ELEVATION_LIFT: f32 = 0.3;
/// Дальность просмотра против ветра (в клетках, не включая саму клетку)
const RAIN_SHADOW_REACH: i64 = 15;
/// Выше этой высоты рельеф задерживает осадки
const RAIN_SHADOW_ELEVATION: f32 = 0.7;
const RAIN_SHADOW_STRENGTH: f32 = 0.5;

/// Манхэттенское расстояние до ближайшего тайла воды или реки в окне.
///
/// Если в окне воды нет, возвращается радиус окна. Это локальный просмотр, а не
/// глобальное кратчайшее расстояние.
#[must_use]
pub fn distance_to_water(grid: &Grid, x: u32, y: u32) -> f32 {
    let (x, y) = (i64::from(x), i64::from(y));
    let r = WATER_SEARCH_RADIUS;
    let mut min_distance: Option<i64> = None;

    for ny in (y - r).max(0)..=(y + r).min(i64::from(grid.height) - 1) {
        for nx in (x - r).max(0)..=(x + r).min(i64::from(grid.width) - 1) {
            let tile = grid.get(nx as u32, ny as u32);
            if tile.water || tile.river {
                let distance = (nx - x).abs() + (ny - y).abs();
                min_distance = Some(min_distance.map_or(distance, |d| d.min(distance)));
            }
        }
    }

    min_distance.unwrap_or(r) as f32
}

/// Штраф дождевой тени: максимум по лучу против ветра, а не сумма
#[must_use]
pub fn rain_shadow(grid: &Grid, x: u32, y: u32, wind: Wind) -> f32 {
    let (dx, dy) = wind.upwind_step();
    let mut max_blocking = 0.0_f32;

    for i in 1..RAIN_SHADOW_REACH {
        let cx = i64::from(x) + dx * i;
        let cy = i64::from(y) + dy * i;
        if !grid.contains(cx, cy) {
            break;
        }
        let elevation = grid.get(cx as u32, cy as u32).elevation;
        if elevation > RAIN_SHADOW_ELEVATION {
            let blocking = (elevation - RAIN_SHADOW_ELEVATION) * RAIN_SHADOW_STRENGTH;
            max_blocking = max_blocking.max(blocking);
        }
    }

    max_blocking
}

/// Влажность одного тайла: близость воды + подъём по высоте − дождевая тень
#[must_use]
pub fn tile_moisture(grid: &Grid, x: u32, y: u32, wind: Wind) -> f32 {
    let water = (1.0 - distance_to_water(grid, x, y) / WATER_REACH).max(0.0);
    let lift = grid.get(x, y).elevation * ELEVATION_LIFT;
    let shadow = rain_shadow(grid, x, y, wind);
    (water + lift - shadow).clamp(0.0, 1.0)
}

/// Вычисляет влажность всех тайлов.
///
/// Читает `elevation`, `water` и `river`; сетку не меняет. Результат построчный,
/// в том же порядке, что и `grid.tiles`.
#[must_use]
pub fn calculate_moisture(grid: &Grid, wind: Wind) -> Vec<f32> {
    #[cfg(feature = "parallel")]
    let tiles = grid.tiles.par_iter();
    #[cfg(not(feature = "parallel"))]
    let tiles = grid.tiles.iter();

    tiles.map(|t| tile_moisture(grid, t.x, t.y, wind)).collect()
}

/// Записывает влажность в сетку
pub fn apply_moisture(grid: &mut Grid, moisture: &[f32]) {
    for (tile, &m) in grid.tiles.iter_mut().zip(moisture) {
        tile.moisture = m;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightmap::WATER_LEVEL;

    fn land(width: u32, height: u32, elevation: f32) -> Grid {
        let elevations = vec![elevation; (width * height) as usize];
        Grid::from_elevations(width, height, &elevations, WATER_LEVEL)
    }

    #[test]
    fn test_distance_to_water_manhattan() {
        let mut grid = land(10, 10, 0.5);
        grid.get_mut(2, 3).water = true;
        assert_eq!(distance_to_water(&grid, 2, 3), 0.0);
        assert_eq!(distance_to_water(&grid, 5, 7), 7.0);
    }

    #[test]
    fn test_river_counts_as_water() {
        let mut grid = land(10, 10, 0.5);
        grid.get_mut(9, 9).river = true;
        assert_eq!(distance_to_water(&grid, 9, 0), 9.0);
    }

    #[test]
    fn test_no_water_in_window_uses_radius() {
        let grid = land(60, 60, 0.5);
        assert_eq!(distance_to_water(&grid, 30, 30), WATER_SEARCH_RADIUS as f32);
    }

    #[test]
    fn test_water_outside_window_ignored() {
        let mut grid = land(100, 1, 0.5);
        grid.get_mut(99, 0).water = true;
        // Чебышёвское окно 40 не дотягивается до x = 99
        assert_eq!(distance_to_water(&grid, 0, 0), WATER_SEARCH_RADIUS as f32);
        assert_eq!(distance_to_water(&grid, 60, 0), 39.0);
    }

    #[test]
    fn test_rain_shadow_takes_max_upwind() {
        let mut grid = land(30, 1, 0.5);
        grid.get_mut(3, 0).elevation = 0.9;
        grid.get_mut(5, 0).elevation = 0.8;

        // Западный ветер: смотрим на запад от x = 10
        let shadow = rain_shadow(&grid, 10, 0, Wind::West);
        assert!((shadow - 0.1).abs() < 1e-6, "got {shadow}");

        // Восточный ветер: горы с подветренной стороны не мешают
        assert_eq!(rain_shadow(&grid, 10, 0, Wind::East), 0.0);
    }

    #[test]
    fn test_rain_shadow_reach_is_bounded() {
        let mut grid = land(30, 1, 0.5);
        grid.get_mut(0, 0).elevation = 1.0;
        assert!(rain_shadow(&grid, 14, 0, Wind::West) > 0.0);
        assert_eq!(rain_shadow(&grid, 15, 0, Wind::West), 0.0);
    }

    #[test]
    fn test_rain_shadow_vertical_winds() {
        let mut grid = land(1, 20, 0.5);
        grid.get_mut(0, 2).elevation = 0.9;
        assert!(rain_shadow(&grid, 0, 8, Wind::North) > 0.0);
        assert_eq!(rain_shadow(&grid, 0, 8, Wind::South), 0.0);
    }

    #[test]
    fn test_moisture_combines_terms() {
        let mut grid = land(20, 1, 0.5);
        grid.get_mut(0, 0).water = true;
        // 1 - 6/30 + 0.5 * 0.3 = 0.95
        let m = tile_moisture(&grid, 6, 0, Wind::West);
        assert!((m - 0.95).abs() < 1e-6, "got {m}");
    }

    #[test]
    fn test_moisture_in_unit_range() {
        let mut grid = land(50, 50, 0.95);
        for x in 0..50 {
            grid.get_mut(x, 25).water = true;
        }
        let moisture = calculate_moisture(&grid, Wind::West);
        assert_eq!(moisture.len(), grid.len());
        assert!(moisture.iter().all(|m| (0.0..=1.0).contains(m)));
    }

    #[test]
    fn test_calculate_moisture_is_pure() {
        let mut grid = land(50, 50, 0.6);
        grid.get_mut(10, 10).water = true;
        grid.get_mut(40, 5).elevation = 0.9;
        let a = calculate_moisture(&grid, Wind::East);
        let b = calculate_moisture(&grid, Wind::East);
        assert_eq!(a, b);

        apply_moisture(&mut grid, &a);
        assert_eq!(grid.get(10, 10).moisture, a[grid.index(10, 10)]);
    }
}
