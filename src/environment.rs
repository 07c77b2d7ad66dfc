//! Environment clock: elapsed time, cycle phase, disturbance, sky color.

use crate::config::{CanopyConfig, SkyPalette};
use crate::foundation::core::Rgb;

/// Tracks elapsed time, the repeating day/night cycle phase, and the decaying
/// disturbance scalar.
///
/// The clock is owned by the session and advanced exactly once per tick; all
/// rendering components read it, none mutate it.
#[derive(Clone, Debug)]
pub struct EnvClock {
    cycle_secs: f64,
    decay_per_sec: f64,
    night_window: [f64; 2],
    elapsed: f64,
    cycle_phase: f64,
    disturbance: f64,
}

impl EnvClock {
    /// Create a clock at phase 0 (day), fully calm.
    pub fn new(cfg: &CanopyConfig) -> Self {
        Self {
            cycle_secs: cfg.cycle_secs,
            decay_per_sec: cfg.disturb_decay_per_sec,
            night_window: cfg.night_window,
            elapsed: 0.0,
            cycle_phase: 0.0,
            disturbance: 0.0,
        }
    }

    /// Advance by `dt` seconds: accumulate elapsed time, recompute the cycle
    /// phase, and decay disturbance toward zero.
    pub fn advance(&mut self, dt: f64) {
        let dt = dt.max(0.0);
        self.elapsed += dt;
        self.cycle_phase = (self.elapsed % self.cycle_secs) / self.cycle_secs;
        self.disturbance = (self.disturbance - self.decay_per_sec * dt).clamp(0.0, 1.0);
    }

    /// Raise disturbance by `amount`, capped at 1.
    pub fn register_disturbance(&mut self, amount: f64) {
        self.disturbance = (self.disturbance + amount.max(0.0)).clamp(0.0, 1.0);
    }

    /// Total elapsed session time in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Position in the repeating cycle, always in `[0, 1)`.
    pub fn cycle_phase(&self) -> f64 {
        self.cycle_phase
    }

    /// Disturbance level, always in `[0, 1]`.
    pub fn disturbance(&self) -> f64 {
        self.disturbance
    }

    /// True iff the cycle phase lies inside the configured night window.
    pub fn is_night(&self) -> bool {
        let p = self.cycle_phase;
        p >= self.night_window[0] && p <= self.night_window[1]
    }
}

/// Sky color at cycle phase `phase` and vertical screen fraction `t`.
///
/// The four anchor segments partition `[0, 1)` into equal quarters and are
/// continuous at the interior boundaries; the dawn->day segment lands back on
/// the day anchor so the wrap from 1.0 to 0.0 is seamless.
pub fn sky_color(sky: &SkyPalette, phase: f64, t: f64) -> Rgb {
    let p = phase.rem_euclid(1.0);
    let t = t.clamp(0.0, 1.0) as f32;

    let (from, to, k) = if p < 0.25 {
        (sky.day, sky.dusk, p / 0.25)
    } else if p < 0.50 {
        (sky.dusk, sky.night, (p - 0.25) / 0.25)
    } else if p < 0.75 {
        (sky.night, sky.dawn, (p - 0.50) / 0.25)
    } else {
        (sky.dawn, sky.day, (p - 0.75) / 0.25)
    };

    let k = k as f32;
    let top = from.top.lerp(to.top, k);
    let bottom = from.bottom.lerp(to.bottom, k);
    top.lerp(bottom, t)
}

#[cfg(test)]
#[path = "../tests/unit/environment.rs"]
mod tests;
