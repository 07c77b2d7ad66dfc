use std::f64::consts::TAU;

use crate::config::CanopyConfig;
use crate::foundation::core::{CubicBez, Point, Vec2, Viewport};
use crate::foundation::sample::Sampler;
use crate::scene::leaf::Leaf;

/// A trunk curve plus a crown of leaves sampled within an elliptical region.
///
/// Everything here is fixed at growth time; per-frame appearance is derived
/// by [`Leaf::sprite`](crate::scene::leaf::Leaf::sprite).
#[derive(Clone, Debug)]
pub struct Tree {
    base: Point,
    trunk: CubicBez,
    trunk_weight: f64,
    crown_center: Point,
    crown_radius: f64,
    crown_ecc_y: f64,
    leaves: Vec<Leaf>,
}

impl Tree {
    /// Grow a tree rooted at `base_x` with trunk height `height_frac` of the
    /// viewport (clamped to `[0.2, 0.9]`).
    ///
    /// The trunk is a cubic curve from the ground to the crown anchor with
    /// jittered control points; the crown center hangs off the trunk tip with
    /// vertical jitter.
    pub fn grow(
        cfg: &CanopyConfig,
        viewport: Viewport,
        base_x: f64,
        height_frac: f64,
        sampler: &mut Sampler,
    ) -> Self {
        let ground = viewport.height_f();
        let trunk_h = ground * height_frac.clamp(0.2, 0.9);

        let root = Point::new(base_x + sampler.jitter(20.0), ground);
        let mid = Point::new(base_x + sampler.jitter(40.0), ground - trunk_h * 0.55);
        let tip = Point::new(base_x + sampler.jitter(25.0), ground - trunk_h);
        // The upper control point leans off the midpoint so the trunk bends
        // rather than kinks.
        let lean = Point::new(mid.x + sampler.jitter(10.0), mid.y - sampler.range(10.0, 30.0));
        let trunk = CubicBez::new(root, mid, lean, tip);

        let crown_center = Point::new(tip.x, tip.y + sampler.jitter(cfg.crown_jitter_y));
        let crown_radius = sampler.span(cfg.crown_radius);
        let crown_ecc_y = sampler.span(cfg.crown_eccentricity);
        let trunk_weight = sampler.span(cfg.trunk_weight);

        let total = sampler.count(cfg.leaves_per_tree);
        let mut leaves = Vec::with_capacity(total as usize);
        for _ in 0..total {
            let layer = sampler.index(cfg.layers);
            let offset = sample_crown_offset(crown_radius, crown_ecc_y, sampler);
            leaves.push(Leaf::unfurl(offset, layer, cfg, sampler));
        }

        Self {
            base: Point::new(base_x, ground),
            trunk,
            trunk_weight,
            crown_center,
            crown_radius,
            crown_ecc_y,
            leaves,
        }
    }

    /// Ground anchor point.
    pub fn base(&self) -> Point {
        self.base
    }

    /// Trunk curve from the ground to the crown anchor.
    pub fn trunk(&self) -> CubicBez {
        self.trunk
    }

    /// Trunk stroke weight in pixels.
    pub fn trunk_weight(&self) -> f64 {
        self.trunk_weight
    }

    /// Crown ellipse center.
    pub fn crown_center(&self) -> Point {
        self.crown_center
    }

    /// Crown ellipse major radius.
    pub fn crown_radius(&self) -> f64 {
        self.crown_radius
    }

    /// Crown vertical eccentricity.
    pub fn crown_eccentricity(&self) -> f64 {
        self.crown_ecc_y
    }

    /// Leaves owned by this tree.
    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }
}

/// Sample a crown-local offset uniformly within the crown ellipse.
///
/// The radial coordinate uses a square-root distribution so leaves spread
/// evenly over the area instead of clustering at the center.
fn sample_crown_offset(radius: f64, ecc_y: f64, sampler: &mut Sampler) -> Vec2 {
    let a = radius * sampler.range(0.6, 1.0);
    let theta = sampler.range(0.0, TAU);
    let r = sampler.range(0.0, 1.0).sqrt() * a;
    Vec2::new(theta.cos() * r, theta.sin() * r * ecc_y)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/tree.rs"]
mod tests;
