use crate::config::CanopyConfig;
use crate::foundation::core::{lerp, Point, Rgb, Vec2};
use crate::foundation::sample::{NoiseField, Sampler};

/// Per-frame inputs shared by every leaf in the canopy.
#[derive(Clone, Copy, Debug)]
pub struct LeafFrame {
    /// Accumulated wind time in seconds.
    pub wind_t: f64,
    /// Temporal frequency of the sway noise.
    pub wind_speed: f64,
    /// Base sway amplitude factor.
    pub wind_strength: f64,
    /// Current disturbance in `[0, 1]`; disturbed canopy sways harder and
    /// dims slightly.
    pub disturbance: f64,
    /// Whether the cycle phase is inside the night window.
    pub night: bool,
    /// Total canopy layer count.
    pub layers: usize,
}

/// Computed on-screen appearance of one leaf for one frame.
#[derive(Clone, Copy, Debug)]
pub struct LeafSprite {
    /// World-space center after sway and bob.
    pub center: Point,
    /// Horizontal semi-axis in pixels (glint included).
    pub rx: f64,
    /// Vertical semi-axis in pixels (glint included).
    pub ry: f64,
    /// Body color with depth haze, night dimming, and disturbance applied.
    pub body: Rgb,
    /// Darker edge shade drawn under the body.
    pub rim: Rgb,
    /// Body alpha in `0..=255`.
    pub alpha: f64,
}

/// A single canopy element. Immutable after construction; every
/// frame-to-frame variation is computed from noise and time, never stored.
#[derive(Clone, Debug)]
pub struct Leaf {
    offset: Vec2,
    layer: usize,
    size: f64,
    aspect: f64,
    color: Rgb,
    alpha: f64,
    seed: f64,
}

impl Leaf {
    /// Draw a leaf's fixed attributes from the configured ranges and palette.
    ///
    /// `offset` is the crown-local position; `layer` scales both size
    /// (nearer layers grow larger) and shading.
    pub fn unfurl(offset: Vec2, layer: usize, cfg: &CanopyConfig, sampler: &mut Sampler) -> Self {
        let depth = (layer as f64 + 1.0) / cfg.layers as f64;
        let size = sampler.span(cfg.leaf_size) * lerp(0.75, 1.25, depth);
        let aspect = sampler.span(cfg.leaf_aspect);
        let base = *sampler.pick(&cfg.leaf_palette);
        let shade = 0.85 + depth * 0.35 + sampler.jitter(0.05);
        let color = base.scaled(shade as f32);
        let alpha = sampler.span(cfg.leaf_alpha);
        let seed = sampler.range(0.0, 1000.0);
        Self {
            offset,
            layer,
            size,
            aspect,
            color,
            alpha,
            seed,
        }
    }

    /// Depth layer index in `[0, layers)`.
    pub fn layer(&self) -> usize {
        self.layer
    }

    /// Fixed crown-local offset.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// World position before any sway, given the parent crown center.
    pub fn rest_position(&self, crown: Point) -> Point {
        crown + self.offset
    }

    /// Compute this frame's sprite.
    ///
    /// Sway is a coherent-noise sample over (seed, time) scaled by layer
    /// depth and a disturbance-boosted wind factor; bob is a seed-offset
    /// sinusoid; brightness multiplies depth haze, night dimming, and a mild
    /// disturbance dim. A second independent noise sample past a
    /// phase-dependent threshold triggers a brief glint.
    pub fn sprite(&self, crown: Point, wind: &NoiseField, frame: &LeafFrame) -> LeafSprite {
        let w = wind.sample2(self.seed * 0.31, frame.wind_t * frame.wind_speed);
        let dyn_wind = frame.wind_strength * (1.0 + frame.disturbance * 0.9);
        let sway = w * (4.0 + self.layer as f64 * 1.8) * dyn_wind;
        let bob = (frame.wind_t * 0.9 + self.seed).sin() * (1.2 + self.layer as f64 * 0.6);

        let center = Point::new(
            crown.x + self.offset.x + sway,
            crown.y + self.offset.y + bob,
        );

        let depth_haze = if frame.layers <= 1 {
            1.0
        } else {
            lerp(0.35, 1.0, self.layer as f64 / (frame.layers - 1) as f64)
        };
        let night_dim = if frame.night { 0.65 } else { 1.0 };
        let vis = (depth_haze * night_dim * (1.0 - frame.disturbance * 0.08)) as f32;

        let threshold = if frame.night { 0.88 } else { 0.82 };
        let glint = if wind.sample2_01(self.seed, frame.wind_t * 0.3) > threshold {
            1.35
        } else {
            1.0
        };

        LeafSprite {
            center,
            rx: self.size * 0.5 * glint,
            ry: self.size * self.aspect * 0.5 * glint,
            body: self.color.scaled(vis),
            rim: self.color.scaled(0.5 * vis),
            alpha: self.alpha,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/leaf.rs"]
mod tests;
