//! Гидрология: выбор истоков и спуск рек по самому крутому склону.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grid::Grid;

/// Истоки рек выбираются только выше этой высоты
pub const SOURCE_ELEVATION: f32 = 0.7;
/// Реки с путём не длиннее этого отбрасываются
pub const MIN_RIVER_LENGTH: usize = 10;

/// Порядок обхода соседей: при равной высоте побеждает первый
const NEIGHBORS: [(i64, i64); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Река от истока до устья. Неизменяема после трассировки.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct River {
    pub id: String,
    pub source: (u32, u32),
    /// Последний тайл пути: вода или бессточная впадина
    pub mouth: (u32, u32),
    pub path: Vec<(u32, u32)>,
    pub length: usize,
}

/// Все тайлы суши выше `SOURCE_ELEVATION`, построчно
#[must_use]
pub fn source_candidates(grid: &Grid) -> Vec<(u32, u32)> {
    grid.tiles
        .iter()
        .filter(|t| t.elevation > SOURCE_ELEVATION && !t.water)
        .map(|t| (t.x, t.y))
        .collect()
}

/// Случайная выборка истоков без повторов.
///
/// Если кандидатов меньше запрошенного, возвращаются все.
pub fn select_sources<R: Rng + ?Sized>(
    grid: &Grid,
    river_count: usize,
    rng: &mut R,
) -> Vec<(u32, u32)> {
    let candidates = source_candidates(grid);
    let amount = river_count.min(candidates.len());
    debug!(
        candidates = candidates.len(),
        requested = river_count,
        "Выбор истоков рек"
    );
    index::sample(rng, candidates.len(), amount)
        .into_iter()
        .map(|i| candidates[i])
        .collect()
}

/// Спускается от истока к самому низкому непосещённому соседу.
///
/// Останавливается на воде, в локальном минимуме или после `width * height` шагов.
/// Сетку только читает.
#[must_use]
pub fn trace_river_path(grid: &Grid, source: (u32, u32)) -> Vec<(u32, u32)> {
    let mut path = vec![source];
    let mut visited: HashSet<(u32, u32)> = HashSet::from([source]);
    let (mut x, mut y) = source;

    let max_iterations = grid.len();
    for _ in 0..max_iterations {
        let current = grid.get(x, y);
        if current.water {
            break;
        }

        let mut lowest = None;
        let mut lowest_elevation = current.elevation;

        for &(dx, dy) in &NEIGHBORS {
            let nx = i64::from(x) + dx;
            let ny = i64::from(y) + dy;
            if !grid.contains(nx, ny) {
                continue;
            }
            let next = (nx as u32, ny as u32);
            if visited.contains(&next) {
                continue;
            }
            let elevation = grid.get(next.0, next.1).elevation;
            if elevation < lowest_elevation {
                lowest_elevation = elevation;
                lowest = Some(next);
            }
        }

        let Some(next) = lowest else {
            break;
        };
        path.push(next);
        visited.insert(next);
        (x, y) = next;
    }

    path
}

/// Генерирует реки и отмечает их тайлы.
///
/// Все пути сначала трассируются по неизменной сетке, затем флаги `river`
/// выставляются одним проходом: трассы не видят чужих флагов.
pub fn generate_rivers<R: Rng + ?Sized>(
    grid: &mut Grid,
    river_count: usize,
    rng: &mut R,
) -> Vec<River> {
    let sources = select_sources(grid, river_count, rng);
    let rivers = trace_rivers(grid, &sources);
    mark_rivers(grid, &rivers);
    rivers
}

/// Трассирует все истоки и оставляет только достаточно длинные реки
#[must_use]
pub fn trace_rivers(grid: &Grid, sources: &[(u32, u32)]) -> Vec<River> {
    sources
        .iter()
        .enumerate()
        .filter_map(|(idx, &source)| {
            let path = trace_river_path(grid, source);
            if path.len() <= MIN_RIVER_LENGTH {
                debug!(?source, length = path.len(), "Короткая река отброшена");
                return None;
            }
            Some(River {
                id: format!("river_{idx:03}"),
                source,
                mouth: *path.last()?,
                length: path.len(),
                path,
            })
        })
        .collect()
}

/// Отмечает `river = true` на всех тайлах путей
pub fn mark_rivers(grid: &mut Grid, rivers: &[River]) {
    for &(x, y) in rivers.iter().flat_map(|r| &r.path) {
        grid.get_mut(x, y).river = true;
    }
}
