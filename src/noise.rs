//! Градиентный шум с сидом.
//!
//! Таблица из 256 перестановок перемешивается генератором мира и дублируется
//! до 512 элементов, чтобы хеширование углов решётки не выходило за границы.

use rand::seq::SliceRandom;

use crate::seed::{Stream, stream_rng};

/// Двумерное поле шума: одинаковые координаты всегда дают одинаковое значение в `[-1, 1]`
#[derive(Debug, Clone)]
pub struct GradientNoise {
    perm: [u8; 512],
}

impl GradientNoise {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut table: Vec<u8> = (0..=255).collect();
        table.shuffle(&mut stream_rng(seed, Stream::Permutation));

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }
        Self { perm }
    }

    /// Значение шума в точке `(x, y)`
    #[must_use]
    pub fn get(&self, x: f32, y: f32) -> f32 {
        let x_floor = x.floor();
        let y_floor = y.floor();

        // & 255 совпадает с rem_euclid(256) и для отрицательных координат
        let xi = (x_floor as i32 & 255) as usize;
        let yi = (y_floor as i32 & 255) as usize;
        let xf = x - x_floor;
        let yf = y - y_floor;

        let u = fade(xf);
        let v = fade(yf);

        let p = &self.perm;
        let aa = p[p[xi] as usize + yi];
        let ab = p[p[xi] as usize + yi + 1];
        let ba = p[p[xi + 1] as usize + yi];
        let bb = p[p[xi + 1] as usize + yi + 1];

        let x1 = lerp(grad(aa, xf, yf), grad(ba, xf - 1.0, yf), u);
        let x2 = lerp(grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0), u);

        lerp(x1, x2, v)
    }
}

/// Квинтическая кривая 6t⁵ − 15t⁴ + 10t³ (непрерывна во второй производной)
#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

/// Псевдоградиент: младшие два бита хеша выбирают ось и знак
#[inline]
fn grad(hash: u8, x: f32, y: f32) -> f32 {
    let h = hash & 3;
    let (u, v) = if h < 2 { (x, y) } else { (y, x) };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_values() {
        let a = GradientNoise::new(42);
        let b = GradientNoise::new(42);
        for i in 0..200 {
            let x = i as f32 * 0.173;
            let y = i as f32 * 0.311 + 5.0;
            assert_eq!(a.get(x, y), b.get(x, y), "Noise must be seed-deterministic");
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = GradientNoise::new(1);
        let b = GradientNoise::new(2);
        let differs = (0..100).any(|i| {
            let x = i as f32 * 0.37 + 0.5;
            a.get(x, x * 0.5) != b.get(x, x * 0.5)
        });
        assert!(differs, "Different seeds should produce different fields");
    }

    #[test]
    fn test_zero_at_lattice_points() {
        let noise = GradientNoise::new(9);
        for x in -3..5 {
            for y in -3..5 {
                assert_eq!(noise.get(x as f32, y as f32), 0.0);
            }
        }
    }

    #[test]
    fn test_values_in_range() {
        let noise = GradientNoise::new(123);
        for i in 0..100 {
            for j in 0..100 {
                let v = noise.get(i as f32 * 0.071 - 3.0, j as f32 * 0.093 - 2.0);
                assert!(
                    (-1.0 - 1e-5..=1.0 + 1e-5).contains(&v),
                    "Noise out of range: {v}"
                );
            }
        }
    }

    #[test]
    fn test_continuity() {
        let noise = GradientNoise::new(5);
        let a = noise.get(10.5, 3.25);
        let b = noise.get(10.5001, 3.2501);
        assert!((a - b).abs() < 1e-3, "Noise should be spatially smooth");
    }

    #[test]
    fn test_fade_endpoints() {
        assert_eq!(fade(0.0), 0.0);
        assert!((fade(1.0) - 1.0).abs() < 1e-6);
        assert!((fade(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_grad_directions() {
        assert_eq!(grad(0, 0.25, 0.5), 0.75);
        assert_eq!(grad(1, 0.25, 0.5), 0.25);
        assert_eq!(grad(2, 0.25, 0.5), 0.25);
        assert_eq!(grad(3, 0.25, 0.5), -0.75);
    }
}
