use crate::config::CanopyConfig;
use crate::environment::EnvClock;
use crate::foundation::core::Point;
use crate::foundation::sample::Sampler;

/// A circular canopy opening created by interaction. Radius shrinks every
/// tick and the gap is removed once it reaches zero.
#[derive(Clone, Copy, Debug)]
pub struct Gap {
    /// Center in world coordinates.
    pub center: Point,
    /// Current radius in pixels; never negative while the gap is live.
    pub radius: f64,
}

/// The live set of healing canopy gaps.
#[derive(Clone, Debug, Default)]
pub struct GapRegistry {
    gaps: Vec<Gap>,
}

impl GapRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a gap at `center` with a radius jittered around the configured
    /// base, and kick the clock's disturbance.
    pub fn open(
        &mut self,
        center: Point,
        cfg: &CanopyConfig,
        sampler: &mut Sampler,
        clock: &mut EnvClock,
    ) {
        let radius = cfg.gap_radius * sampler.range(0.9, 1.1);
        self.gaps.push(Gap { center, radius });
        clock.register_disturbance(cfg.disturb_per_gap);
    }

    /// Shrink every gap by this tick's heal amount and drop any gap whose
    /// radius reached zero.
    pub fn heal(&mut self, dt: f64, base_rate: f64, disturbance: f64) {
        let shrink = heal_rate(base_rate, disturbance) * dt.max(0.0);
        for gap in &mut self.gaps {
            gap.radius -= shrink;
        }
        self.gaps.retain(|gap| gap.radius > 0.0);
    }

    /// True iff `point` lies inside any live gap.
    ///
    /// A linear scan: gap counts stay small because they are
    /// interaction-driven and constantly pruned.
    pub fn occludes(&self, point: Point) -> bool {
        self.gaps
            .iter()
            .any(|gap| (point - gap.center).hypot2() <= gap.radius * gap.radius)
    }

    /// Live gaps, for feedback-ring rendering.
    pub fn iter(&self) -> impl Iterator<Item = &Gap> {
        self.gaps.iter()
    }

    /// Number of live gaps.
    pub fn len(&self) -> usize {
        self.gaps.len()
    }

    /// True when no gaps are live.
    pub fn is_empty(&self) -> bool {
        self.gaps.is_empty()
    }

    /// Remove all gaps (used on regenerate and resize).
    pub fn clear(&mut self) {
        self.gaps.clear();
    }
}

/// Healing speed in pixels per second.
///
/// Healing is slower while the forest is disturbed and faster when calm:
/// `base * (0.75 + 0.75 * (1 - disturbance))`.
pub fn heal_rate(base_rate: f64, disturbance: f64) -> f64 {
    base_rate * (0.75 + 0.75 * (1.0 - disturbance.clamp(0.0, 1.0)))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/gaps.rs"]
mod tests;
