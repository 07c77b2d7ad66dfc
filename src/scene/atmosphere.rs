use crate::config::CanopyConfig;
use crate::foundation::core::{Point, Viewport};
use crate::foundation::sample::{NoiseField, Sampler};

/// One drawable atmospheric dot for the current frame.
#[derive(Clone, Copy, Debug)]
pub struct ParticleSprite {
    /// Center in screen coordinates.
    pub center: Point,
    /// Radius in pixels.
    pub radius: f64,
    /// Alpha in `0..=255`.
    pub alpha: f64,
}

/// A daytime pollen mote drifting upward under a noise velocity field.
#[derive(Clone, Copy, Debug)]
struct Pollen {
    seed: f64,
    x: f64,
    y: f64,
    size: f64,
    alpha: f64,
}

/// A nighttime firefly wandering under independent per-axis noise.
#[derive(Clone, Copy, Debug)]
struct Firefly {
    seed: f64,
    x: f64,
    y: f64,
}

/// The two atmospheric particle populations, mutually exclusive by time of
/// day: pollen while the sun is up, fireflies inside the night window.
///
/// Populations are seeded once per generation; individual particles recycle
/// in place when they leave the viewport instead of being destroyed.
#[derive(Clone, Debug)]
pub struct Atmosphere {
    pollen: Vec<Pollen>,
    fireflies: Vec<Firefly>,
    drift: NoiseField,
    rng: Sampler,
    viewport: Viewport,
}

impl Atmosphere {
    /// Seed both populations for `viewport`.
    pub fn generate(
        cfg: &CanopyConfig,
        viewport: Viewport,
        noise_seed: u32,
        sampler: &mut Sampler,
    ) -> Self {
        let w = viewport.width_f();
        let h = viewport.height_f();

        let pollen = (0..cfg.pollen_count)
            .map(|i| Pollen {
                seed: i as f64,
                x: sampler.range(0.0, w),
                y: sampler.range(0.0, h),
                size: sampler.range(1.5, 3.5),
                alpha: sampler.range(18.0, 40.0),
            })
            .collect();

        let fireflies = (0..cfg.firefly_count)
            .map(|i| Firefly {
                seed: i as f64,
                x: sampler.range(0.0, w),
                y: sampler.range(h * 0.25, h * 0.95),
            })
            .collect();

        Self {
            pollen,
            fireflies,
            drift: NoiseField::new(noise_seed),
            rng: sampler.clone(),
            viewport,
        }
    }

    /// Advance the pollen population by `dt` seconds.
    ///
    /// Motes drift up and sideways; any mote leaving the top or side edges is
    /// re-rolled below the bottom edge.
    pub fn update_day(&mut self, dt: f64, wind_t: f64) {
        let w = self.viewport.width_f();
        let h = self.viewport.height_f();
        for p in &mut self.pollen {
            let vx = (self.drift.sample2_01(p.seed, wind_t * 0.3) - 0.5) * 20.0;
            let vy = -10.0 * self.drift.sample2_01(p.seed + 10.0, wind_t * 0.3) + 4.0;
            p.x += (vx + 8.0 * (wind_t * 0.6 + p.seed).sin()) * dt * 0.06;
            p.y += vy * dt * 0.06;
            if p.y < -10.0 || p.x < -10.0 || p.x > w + 10.0 {
                p.x = self.rng.range(0.0, w);
                p.size = self.rng.range(1.5, 3.5);
                p.alpha = self.rng.range(18.0, 40.0);
                p.y = h + 10.0;
            }
        }
    }

    /// Advance the firefly population by `dt` seconds.
    ///
    /// Fireflies wrap to a random x when leaving the horizontal bounds and
    /// re-roll y when crossing the top or bottom.
    pub fn update_night(&mut self, dt: f64, wind_t: f64) {
        let w = self.viewport.width_f();
        let h = self.viewport.height_f();
        for f in &mut self.fireflies {
            f.x += (self.drift.sample2_01(f.seed, wind_t * 0.06) - 0.5) * 20.0 * dt;
            f.y += (self.drift.sample2_01(f.seed + 5.0, wind_t * 0.06) - 0.5) * 12.0 * dt;
            if f.x < -20.0 || f.x > w + 20.0 {
                f.x = self.rng.range(0.0, w);
            }
            if f.y < 0.0 || f.y > h {
                f.y = self.rng.range(h * 0.3, h);
            }
        }
    }

    /// Pollen sprites for the current frame.
    pub fn pollen_sprites(&self) -> impl Iterator<Item = ParticleSprite> + '_ {
        self.pollen.iter().map(|p| ParticleSprite {
            center: Point::new(p.x, p.y),
            radius: p.size * 0.5,
            alpha: p.alpha,
        })
    }

    /// Firefly sprites for the current frame; glow alpha twinkles with a
    /// further noise sample in `[30, 180]`.
    pub fn firefly_sprites(&self, wind_t: f64) -> impl Iterator<Item = ParticleSprite> + '_ {
        self.fireflies.iter().map(move |f| ParticleSprite {
            center: Point::new(f.x, f.y),
            radius: 1.75,
            alpha: 30.0 + self.drift.sample2_01(f.seed, wind_t * 1.2) * 150.0,
        })
    }

    /// Pollen population size.
    pub fn pollen_count(&self) -> usize {
        self.pollen.len()
    }

    /// Firefly population size.
    pub fn firefly_count(&self) -> usize {
        self.fireflies.len()
    }

    /// Viewport these populations were seeded for.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/atmosphere.rs"]
mod tests;
