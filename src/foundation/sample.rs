use noise::{NoiseFn, Perlin};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded uniform generator for one-off layout draws (positions, jitter,
/// palette picks).
///
/// Layout generation is deterministic per seed: the same seed and the same
/// draw sequence always produce the same forest.
#[derive(Clone, Debug)]
pub struct Sampler {
    rng: StdRng,
}

impl Sampler {
    /// Create a sampler from a 64-bit seed.
    pub fn seed_from(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform draw in `[lo, hi)`. Returns `lo` when the range is empty.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        self.rng.random_range(lo..hi)
    }

    /// Uniform draw over a `[lo, hi]` config span.
    pub fn span(&mut self, span: [f64; 2]) -> f64 {
        self.range(span[0], span[1])
    }

    /// Uniform draw in `[-magnitude, magnitude)`.
    pub fn jitter(&mut self, magnitude: f64) -> f64 {
        self.range(-magnitude, magnitude)
    }

    /// Uniform integer count over an inclusive `[lo, hi]` config span.
    pub fn count(&mut self, span: [u32; 2]) -> u32 {
        let (lo, hi) = (span[0].min(span[1]), span[0].max(span[1]));
        self.rng.random_range(lo..=hi)
    }

    /// Uniform index in `[0, n)`. Returns 0 for `n <= 1`.
    pub fn index(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        self.rng.random_range(0..n)
    }

    /// Pick a uniformly random element.
    ///
    /// `items` must be non-empty; palettes and ranges are checked by config
    /// validation before any sampling happens.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.index(items.len())]
    }
}

/// Coherent-noise field used for all smooth spatial/temporal variation
/// (leaf sway, light shimmer, particle drift).
///
/// Sampling is total: defined and finite for every input.
#[derive(Clone, Copy, Debug)]
pub struct NoiseField {
    perlin: Perlin,
}

impl NoiseField {
    /// Create a field from a 32-bit seed.
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }

    /// 2D sample in `[-1, 1]`.
    pub fn sample2(&self, x: f64, y: f64) -> f64 {
        self.perlin.get([x, y]).clamp(-1.0, 1.0)
    }

    /// 3D sample in `[-1, 1]`.
    pub fn sample3(&self, x: f64, y: f64, z: f64) -> f64 {
        self.perlin.get([x, y, z]).clamp(-1.0, 1.0)
    }

    /// 2D sample mapped to `[0, 1]`.
    pub fn sample2_01(&self, x: f64, y: f64) -> f64 {
        0.5 * (self.sample2(x, y) + 1.0)
    }

    /// 3D sample mapped to `[0, 1]`.
    pub fn sample3_01(&self, x: f64, y: f64, z: f64) -> f64 {
        0.5 * (self.sample3(x, y, z) + 1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/sample.rs"]
mod tests;
