//! Procedural scene state: trees, leaves, gaps, and atmospheric particles.
//!
//! Everything in this module is pure state plus math, no rasterization.
//! The compositor in [`crate::render`] turns it into pixels.

/// Pollen and firefly particle populations.
pub mod atmosphere;
/// The tree collection for one generation.
pub mod forest;
/// Healing canopy openings created by interaction.
pub mod gaps;
/// A single canopy element and its per-frame appearance.
pub mod leaf;
/// Trunk curve plus populated crown.
pub mod tree;
