//! CPU rasterization of the scene into RGBA8 frames.

/// Layered frame compositor backed by `vello_cpu`.
pub mod compositor;
/// Finished frame type.
pub mod frame;
