use crate::config::CanopyConfig;
use crate::foundation::core::{lerp, Point, Viewport};
use crate::foundation::sample::Sampler;
use crate::scene::leaf::Leaf;
use crate::scene::tree::Tree;

/// The full tree collection for one generation of the scene.
///
/// Regeneration is always a full reseed: the old trees are discarded and a
/// fresh set is grown from the sampler state, never continued.
#[derive(Clone, Debug)]
pub struct Forest {
    trees: Vec<Tree>,
    viewport: Viewport,
    layers: usize,
}

impl Forest {
    /// Grow the configured number of trees spread across the middle 88% of
    /// the viewport width, with per-slot horizontal jitter.
    pub fn generate(cfg: &CanopyConfig, viewport: Viewport, sampler: &mut Sampler) -> Self {
        let w = viewport.width_f();
        let span = (cfg.num_trees.saturating_sub(1)).max(1) as f64;
        let mut trees = Vec::with_capacity(cfg.num_trees);
        for i in 0..cfg.num_trees {
            let slot = (i as f64 + sampler.jitter(0.2)) / span;
            let base_x = lerp(w * 0.06, w * 0.94, slot);
            let height_frac = sampler.span(cfg.trunk_height);
            trees.push(Tree::grow(cfg, viewport, base_x, height_frac, sampler));
        }
        Self {
            trees,
            viewport,
            layers: cfg.layers,
        }
    }

    /// The trees of this generation.
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    /// Viewport this forest was grown for.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Canopy layer count.
    pub fn layers(&self) -> usize {
        self.layers
    }

    /// All leaves in back-to-front layer order, paired with their parent
    /// crown center.
    ///
    /// The crown center is the only parent state a leaf reads; ownership
    /// stays strictly Forest -> Tree -> Leaf.
    pub fn leaves_by_layer(&self) -> impl Iterator<Item = (Point, &Leaf)> + '_ {
        (0..self.layers).flat_map(move |layer| {
            self.trees.iter().flat_map(move |tree| {
                tree.leaves()
                    .iter()
                    .filter(move |leaf| leaf.layer() == layer)
                    .map(move |leaf| (tree.crown_center(), leaf))
            })
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/forest.rs"]
mod tests;
