use std::path::Path;

use crate::foundation::core::Rgb;
use crate::foundation::error::{CanopyError, CanopyResult};

/// Top and bottom colors of the sky gradient at one phase anchor.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SkyStop {
    /// Color at the top of the viewport.
    pub top: Rgb,
    /// Color at the bottom of the viewport.
    pub bottom: Rgb,
}

/// The four phase anchors of the day/night sky cycle.
///
/// The cycle interpolates day -> dusk -> night -> dawn -> day across four
/// equal quarters of the cycle phase.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SkyPalette {
    /// Anchor at phase 0.0.
    pub day: SkyStop,
    /// Anchor at phase 0.25.
    pub dusk: SkyStop,
    /// Anchor at phase 0.5.
    pub night: SkyStop,
    /// Anchor at phase 0.75.
    pub dawn: SkyStop,
}

/// Static tuning for a canopy scene: counts, size ranges, speeds, palettes.
///
/// All values are fixed for the lifetime of a session; the only runtime
/// "reconfiguration" is a full regenerate. Defaults reproduce the reference
/// scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CanopyConfig {
    /// Number of trees per forest.
    pub num_trees: usize,
    /// Number of canopy depth layers.
    pub layers: usize,
    /// Inclusive range of leaves grown per tree.
    pub leaves_per_tree: [u32; 2],
    /// Base radius of an interaction gap, in pixels.
    pub gap_radius: f64,
    /// Base gap healing rate in pixels per second (modulated by disturbance).
    pub base_heal_per_sec: f64,
    /// Temporal frequency of the leaf sway noise.
    pub wind_speed: f64,
    /// Base sway amplitude factor (modulated by disturbance).
    pub wind_strength: f64,
    /// Trunk stroke weight range, in pixels.
    pub trunk_weight: [f64; 2],
    /// Trunk height range as a fraction of viewport height.
    pub trunk_height: [f64; 2],
    /// Crown ellipse radius range, in pixels.
    pub crown_radius: [f64; 2],
    /// Vertical eccentricity range of the crown ellipse.
    pub crown_eccentricity: [f64; 2],
    /// Vertical jitter of the crown center around the trunk tip, in pixels.
    pub crown_jitter_y: f64,
    /// Leaf major-axis size range, in pixels.
    pub leaf_size: [f64; 2],
    /// Leaf minor/major aspect ratio range.
    pub leaf_aspect: [f64; 2],
    /// Leaf alpha range in `0..=255`.
    pub leaf_alpha: [f64; 2],
    /// Leaf base colors, picked uniformly per leaf.
    pub leaf_palette: Vec<Rgb>,
    /// Sky gradient anchors.
    pub sky: SkyPalette,
    /// Daytime pollen particle count.
    pub pollen_count: usize,
    /// Nighttime firefly particle count.
    pub firefly_count: usize,
    /// Exponential fade easing speed (per second).
    pub fade_speed: f64,
    /// Day/night cycle period in seconds.
    pub cycle_secs: f64,
    /// Contiguous `[start, end]` cycle-phase window treated as night.
    pub night_window: [f64; 2],
    /// Disturbance decay per second.
    pub disturb_decay_per_sec: f64,
    /// Disturbance added per opened gap.
    pub disturb_per_gap: f64,
    /// Delay between fade-out start and the regenerate swap, in seconds.
    pub regen_delay_secs: f64,
}

impl Default for CanopyConfig {
    fn default() -> Self {
        Self {
            num_trees: 9,
            layers: 3,
            leaves_per_tree: [220, 280],
            gap_radius: 50.0,
            base_heal_per_sec: 18.0,
            wind_speed: 0.15,
            wind_strength: 1.8,
            trunk_weight: [7.0, 11.0],
            trunk_height: [0.46, 0.74],
            crown_radius: [80.0, 185.0],
            crown_eccentricity: [0.45, 0.65],
            crown_jitter_y: 48.0,
            leaf_size: [13.0, 26.0],
            leaf_aspect: [0.65, 0.95],
            leaf_alpha: [180.0, 235.0],
            leaf_palette: vec![
                Rgb::new(34.0, 102.0, 52.0),
                Rgb::new(42.0, 122.0, 64.0),
                Rgb::new(50.0, 140.0, 72.0),
                Rgb::new(62.0, 150.0, 82.0),
                Rgb::new(28.0, 90.0, 46.0),
            ],
            sky: SkyPalette {
                day: SkyStop {
                    top: Rgb::new(168.0, 205.0, 245.0),
                    bottom: Rgb::new(120.0, 175.0, 225.0),
                },
                dusk: SkyStop {
                    top: Rgb::new(230.0, 170.0, 120.0),
                    bottom: Rgb::new(160.0, 110.0, 80.0),
                },
                night: SkyStop {
                    top: Rgb::new(24.0, 34.0, 68.0),
                    bottom: Rgb::new(10.0, 18.0, 36.0),
                },
                dawn: SkyStop {
                    top: Rgb::new(200.0, 180.0, 150.0),
                    bottom: Rgb::new(120.0, 120.0, 140.0),
                },
            },
            pollen_count: 80,
            firefly_count: 60,
            fade_speed: 0.6,
            cycle_secs: 180.0,
            night_window: [0.45, 0.70],
            disturb_decay_per_sec: 0.25,
            disturb_per_gap: 0.08,
            regen_delay_secs: 0.9,
        }
    }
}

impl CanopyConfig {
    /// Validate the configuration, rejecting degenerate values before any
    /// rendering begins.
    pub fn validate(&self) -> CanopyResult<()> {
        if self.num_trees == 0 {
            return Err(CanopyError::validation("num_trees must be > 0"));
        }
        if self.layers == 0 {
            return Err(CanopyError::validation("layers must be > 0"));
        }
        if self.leaves_per_tree[0] > self.leaves_per_tree[1] {
            return Err(CanopyError::validation(
                "leaves_per_tree must be an ascending range",
            ));
        }
        if self.leaf_palette.is_empty() {
            return Err(CanopyError::validation("leaf_palette must not be empty"));
        }
        if self.pollen_count == 0 || self.firefly_count == 0 {
            return Err(CanopyError::validation(
                "pollen_count and firefly_count must be > 0",
            ));
        }
        if !(self.gap_radius > 0.0) {
            return Err(CanopyError::validation("gap_radius must be > 0"));
        }
        if !(self.base_heal_per_sec > 0.0) {
            return Err(CanopyError::validation("base_heal_per_sec must be > 0"));
        }
        if !(self.cycle_secs > 0.0) {
            return Err(CanopyError::validation("cycle_secs must be > 0"));
        }
        if !(self.fade_speed > 0.0) {
            return Err(CanopyError::validation("fade_speed must be > 0"));
        }
        if !(self.regen_delay_secs >= 0.0) {
            return Err(CanopyError::validation("regen_delay_secs must be >= 0"));
        }
        if !(self.disturb_decay_per_sec >= 0.0) || !(self.disturb_per_gap >= 0.0) {
            return Err(CanopyError::validation(
                "disturbance rates must be >= 0",
            ));
        }

        let [n0, n1] = self.night_window;
        if !(0.0..1.0).contains(&n0) || !(0.0..1.0).contains(&n1) || n0 > n1 {
            return Err(CanopyError::validation(
                "night_window must be a contiguous ascending sub-range of [0, 1)",
            ));
        }

        for (name, span) in [
            ("trunk_weight", self.trunk_weight),
            ("trunk_height", self.trunk_height),
            ("crown_radius", self.crown_radius),
            ("crown_eccentricity", self.crown_eccentricity),
            ("leaf_size", self.leaf_size),
            ("leaf_aspect", self.leaf_aspect),
            ("leaf_alpha", self.leaf_alpha),
        ] {
            if !span[0].is_finite() || !span[1].is_finite() || span[0] > span[1] {
                return Err(CanopyError::validation(format!(
                    "{name} must be an ascending finite range"
                )));
            }
        }
        if !(self.trunk_weight[0] > 0.0) || !(self.leaf_size[0] > 0.0) {
            return Err(CanopyError::validation(
                "trunk_weight and leaf_size must be > 0",
            ));
        }

        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> CanopyResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            CanopyError::validation(format!("failed to read config '{}': {e}", path.display()))
        })?;
        let cfg: Self = serde_json::from_slice(&bytes)
            .map_err(|e| CanopyError::serde(format!("invalid config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
