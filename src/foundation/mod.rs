//! Shared geometry, color, error, and sampling primitives.

/// Geometry re-exports, viewport, and color types.
pub mod core;
/// Error type and result alias.
pub mod error;
/// Seeded uniform and coherent-noise sampling.
pub mod sample;
