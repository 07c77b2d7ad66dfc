//! Crownshy renders a looping, interactive generative forest canopy as
//! deterministic RGBA8 frames on the CPU.
//!
//! The world is grown procedurally per seed: trunk curves, elliptical leaf
//! crowns, and two atmospheric particle populations. A repeating day/night
//! cycle drives the sky gradient and lighting, pointer drags open canopy
//! gaps that heal over time, and a disturbance feedback loop couples
//! interaction to wind strength and healing speed.
//!
//! The public API is session-oriented:
//!
//! - Build a validated [`CanopyConfig`] (or use the defaults)
//! - Create a [`Session`] for a viewport and seed
//! - Feed pointer/resize events and call [`Session::tick`] once per frame
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Scene configuration: counts, ranges, palettes.
pub mod config;
/// Environment clock and sky color derivation.
pub mod environment;
mod foundation;
/// CPU frame compositing.
pub mod render;
/// Procedural scene state.
pub mod scene;
/// The per-tick orchestrator.
pub mod session;

pub use crate::config::{CanopyConfig, SkyPalette, SkyStop};
pub use crate::environment::{sky_color, EnvClock};
pub use crate::foundation::core::{lerp, Point, Rgb, Vec2, Viewport};
pub use crate::foundation::error::{CanopyError, CanopyResult};
pub use crate::foundation::sample::{NoiseField, Sampler};
pub use crate::render::compositor::Compositor;
pub use crate::render::frame::FrameRgba;
pub use crate::scene::atmosphere::Atmosphere;
pub use crate::scene::forest::Forest;
pub use crate::scene::gaps::{heal_rate, Gap, GapRegistry};
pub use crate::scene::leaf::{Leaf, LeafFrame, LeafSprite};
pub use crate::scene::tree::Tree;
pub use crate::session::{Screen, Session};
