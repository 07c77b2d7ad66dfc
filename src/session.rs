//! Session: the per-tick orchestrator that owns the whole world state.

use crate::config::CanopyConfig;
use crate::environment::EnvClock;
use crate::foundation::core::{lerp, Point, Rgb, Vec2, Viewport};
use crate::foundation::error::CanopyResult;
use crate::foundation::sample::{NoiseField, Sampler};
use crate::render::compositor::{Compositor, WorldParams};
use crate::render::frame::FrameRgba;
use crate::scene::atmosphere::Atmosphere;
use crate::scene::forest::Forest;
use crate::scene::gaps::GapRegistry;
use crate::scene::leaf::LeafFrame;

const POLLEN_COLOR: Rgb = Rgb::new(255.0, 255.0, 210.0);
const FIREFLY_COLOR: Rgb = Rgb::new(255.0, 240.0, 140.0);

/// Seed mixing constant (splitmix64 increment) for per-generation reseeds.
const GENERATION_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Which screen the session is showing.
///
/// The title card is dismissed by the first pointer press or drag and never
/// returns for the lifetime of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    /// Waiting for the first interaction.
    TitleCard,
    /// Normal interactive rendering.
    Running,
}

/// Deferred-regenerate state: the reseed happens behind an opaque fade so it
/// is never visible as a pop.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Regen {
    Idle,
    FadingOut { remaining: f64 },
    FadingIn,
}

/// An interactive canopy session: environment clock, forest, gaps,
/// atmosphere, camera drift, fade, and the compositor, advanced by a single
/// `tick` per rendered frame.
///
/// All state mutation happens synchronously inside `tick` in a fixed order;
/// there are no timers or background work. Injecting the delta-time makes
/// every behavior, including the deferred regenerate, testable without
/// wall-clock waits.
pub struct Session {
    cfg: CanopyConfig,
    viewport: Viewport,
    seed: u64,
    generation: u64,

    clock: EnvClock,
    forest: Forest,
    gaps: GapRegistry,
    atmosphere: Atmosphere,
    compositor: Compositor,
    sampler: Sampler,
    wind: NoiseField,

    screen: Screen,
    regen: Regen,
    fade_alpha: f64,
    fade_target: f64,

    cam: Vec2,
    cam_target: Vec2,
    influence: Vec2,
    pointer: Option<Point>,
    breathing: f64,
}

impl Session {
    /// Create a session for a `width` x `height` viewport (clamped to at
    /// least 1x1) with a deterministic seed.
    ///
    /// The configuration is validated before anything is grown; the session
    /// starts on the title card, fading in from black.
    pub fn new(cfg: CanopyConfig, width: u32, height: u32, seed: u64) -> CanopyResult<Self> {
        cfg.validate()?;
        let viewport = Viewport::clamped(width, height);

        let mut sampler = Sampler::seed_from(seed);
        let forest = Forest::generate(&cfg, viewport, &mut sampler);
        let atmosphere = Atmosphere::generate(&cfg, viewport, atmosphere_seed(seed), &mut sampler);
        let clock = EnvClock::new(&cfg);
        let mut compositor = Compositor::new(viewport, shimmer_seed(seed))?;
        compositor.rebuild_trunks(&forest, clock.is_night())?;

        tracing::info!(
            width = viewport.width,
            height = viewport.height,
            seed,
            trees = forest.trees().len(),
            "session created"
        );

        Ok(Self {
            cfg,
            viewport,
            seed,
            generation: 0,
            clock,
            forest,
            gaps: GapRegistry::new(),
            atmosphere,
            compositor,
            sampler,
            wind: NoiseField::new(wind_seed(seed)),
            screen: Screen::TitleCard,
            regen: Regen::Idle,
            fade_alpha: 255.0,
            fade_target: 0.0,
            cam: Vec2::ZERO,
            cam_target: Vec2::ZERO,
            influence: Vec2::ZERO,
            pointer: None,
            breathing: 1.0,
        })
    }

    /// Advance the world by `dt` seconds and composite the next frame.
    ///
    /// Tick order is fixed: clock -> regenerate machine -> camera/fade ->
    /// world pass (sky, trunks, leaves, light mask) -> atmospherics ->
    /// gap heal + rings -> fade overlay.
    pub fn tick(&mut self, dt: f64) -> CanopyResult<&FrameRgba> {
        let dt = dt.max(0.0);
        self.clock.advance(dt);
        self.step_regen(dt)?;
        self.step_camera();
        self.breathing = (self.clock.elapsed() * 0.15).sin() * 0.02 + 1.0;
        self.fade_alpha = lerp(
            self.fade_alpha,
            self.fade_target,
            (dt * self.cfg.fade_speed).min(1.0),
        )
        .clamp(0.0, 255.0);

        let elapsed = self.clock.elapsed();
        let night = self.clock.is_night();
        let leaf_frame = LeafFrame {
            wind_t: elapsed,
            wind_speed: self.cfg.wind_speed,
            wind_strength: self.cfg.wind_strength,
            disturbance: self.clock.disturbance(),
            night,
            layers: self.cfg.layers,
        };
        let params = WorldParams {
            forest: &self.forest,
            gaps: &self.gaps,
            sky: &self.cfg.sky,
            wind: &self.wind,
            leaf_frame,
            cycle_phase: self.clock.cycle_phase(),
            elapsed,
            cam: self.cam,
            influence: self.influence,
            breathing: self.breathing,
        };
        self.compositor.begin_frame(&params)?;

        if night {
            self.atmosphere.update_night(dt, elapsed);
            self.compositor
                .draw_particles(self.atmosphere.firefly_sprites(elapsed), FIREFLY_COLOR);
        } else {
            self.atmosphere.update_day(dt, elapsed);
            self.compositor
                .draw_particles(self.atmosphere.pollen_sprites(), POLLEN_COLOR);
        }

        self.gaps
            .heal(dt, self.cfg.base_heal_per_sec, self.clock.disturbance());
        self.compositor.draw_gap_rings(&self.gaps, night);
        self.compositor.draw_fade(self.fade_alpha);
        self.compositor.finish()
    }

    /// Record the pointer position (camera drift follows it).
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.pointer = Some(Point::new(x, y));
    }

    /// Pointer press: dismisses the title card.
    pub fn pointer_pressed(&mut self, x: f64, y: f64) {
        self.pointer = Some(Point::new(x, y));
        self.dismiss_title();
    }

    /// Pointer drag: dismisses the title card and opens a canopy gap at the
    /// drag position, raising disturbance.
    pub fn pointer_dragged(&mut self, x: f64, y: f64) {
        let at = Point::new(x, y);
        self.pointer = Some(at);
        self.dismiss_title();
        self.gaps
            .open(at, &self.cfg, &mut self.sampler, &mut self.clock);
    }

    /// Request a full reseed masked by a fade-out/fade-in.
    ///
    /// Re-entrant requests are ignored until the pending regenerate
    /// completes, so fades never overlap.
    pub fn request_regenerate(&mut self) {
        if self.regen != Regen::Idle {
            tracing::debug!("regenerate ignored; one is already pending");
            return;
        }
        self.trigger_fade_out();
        self.regen = Regen::FadingOut {
            remaining: self.cfg.regen_delay_secs,
        };
    }

    /// Rebuild the whole world for a new viewport size.
    ///
    /// Forest, atmosphere, and every render surface are regenerated together
    /// so the next tick never references a stale-sized buffer.
    #[tracing::instrument(skip(self))]
    pub fn resize(&mut self, width: u32, height: u32) -> CanopyResult<()> {
        let viewport = Viewport::clamped(width, height);
        if viewport == self.viewport {
            return Ok(());
        }
        self.viewport = viewport;
        self.compositor.resize(viewport)?;
        self.generation += 1;
        self.reseed();
        self.gaps.clear();
        self.compositor
            .rebuild_trunks(&self.forest, self.clock.is_night())?;
        // This rebuild is the swap a pending regenerate was waiting for; an
        // armed delay left in place would reseed a second time.
        if let Regen::FadingOut { .. } = self.regen {
            self.trigger_fade_in();
            self.regen = Regen::FadingIn;
        }
        tracing::info!(
            width = viewport.width,
            height = viewport.height,
            "viewport resized; world rebuilt"
        );
        Ok(())
    }

    /// Start fading to black.
    ///
    /// Retargeting the fade abandons any in-flight fade-in, so a regenerate
    /// waiting for that fade-in to land is released rather than left armed
    /// against a threshold the fade can no longer reach.
    pub fn trigger_fade_out(&mut self) {
        self.fade_target = 255.0;
        if self.regen == Regen::FadingIn {
            self.regen = Regen::Idle;
        }
    }

    /// Snap to black and fade back in.
    pub fn trigger_fade_in(&mut self) {
        self.fade_alpha = 255.0;
        self.fade_target = 0.0;
    }

    /// Current screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Environment clock (read-only).
    pub fn clock(&self) -> &EnvClock {
        &self.clock
    }

    /// Current forest generation.
    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    /// Live gap registry (read-only).
    pub fn gaps(&self) -> &GapRegistry {
        &self.gaps
    }

    /// Atmospheric particle populations (read-only).
    pub fn atmosphere(&self) -> &Atmosphere {
        &self.atmosphere
    }

    /// Current fade overlay alpha in `0..=255`.
    pub fn fade_alpha(&self) -> f64 {
        self.fade_alpha
    }

    /// True while a deferred regenerate is in flight.
    pub fn regen_pending(&self) -> bool {
        self.regen != Regen::Idle
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Configuration the session was built with.
    pub fn config(&self) -> &CanopyConfig {
        &self.cfg
    }

    fn dismiss_title(&mut self) {
        if self.screen == Screen::TitleCard {
            self.screen = Screen::Running;
            tracing::debug!("title card dismissed");
        }
    }

    fn step_regen(&mut self, dt: f64) -> CanopyResult<()> {
        match self.regen {
            Regen::Idle => {}
            Regen::FadingOut { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.generation += 1;
                    self.reseed();
                    self.gaps.clear();
                    self.compositor
                        .rebuild_trunks(&self.forest, self.clock.is_night())?;
                    self.trigger_fade_in();
                    self.regen = Regen::FadingIn;
                    tracing::info!(generation = self.generation, "forest regenerated");
                } else {
                    self.regen = Regen::FadingOut { remaining };
                }
            }
            Regen::FadingIn => {
                if self.fade_alpha <= 1.0 {
                    self.regen = Regen::Idle;
                }
            }
        }
        Ok(())
    }

    /// Reseed forest and atmosphere for the current generation. A full
    /// re-seed, never a continuation of the previous layout.
    fn reseed(&mut self) {
        let world_seed = self.seed ^ self.generation.wrapping_mul(GENERATION_MIX);
        let mut sampler = Sampler::seed_from(world_seed);
        self.forest = Forest::generate(&self.cfg, self.viewport, &mut sampler);
        self.atmosphere = Atmosphere::generate(
            &self.cfg,
            self.viewport,
            atmosphere_seed(world_seed),
            &mut sampler,
        );
        self.sampler = sampler;
    }

    /// Smooth the camera toward slow autonomous sinusoids plus pointer
    /// influence. The smoothing factors are per-tick, matching the
    /// frame-oriented feel of the reference.
    fn step_camera(&mut self) {
        let center = self.viewport.center();
        let pointer = self.pointer.unwrap_or(center);
        let m = pointer - center;
        self.influence.x = lerp(self.influence.x, m.x * 0.06, 0.05);
        self.influence.y = lerp(self.influence.y, m.y * 0.05, 0.05);

        let t = self.clock.elapsed();
        self.cam_target = Vec2::new(
            (t * 0.021).sin() * 45.0 + self.influence.x * 0.25,
            (t * 0.03).cos() * 28.0 + self.influence.y * 0.2,
        );
        self.cam.x = lerp(self.cam.x, self.cam_target.x, 0.02);
        self.cam.y = lerp(self.cam.y, self.cam_target.y, 0.02);
    }
}

fn wind_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

fn atmosphere_seed(seed: u64) -> u32 {
    (seed.wrapping_mul(GENERATION_MIX) >> 32) as u32
}

fn shimmer_seed(seed: u64) -> u32 {
    (seed.rotate_left(17) ^ 0xA511_E9B3) as u32
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
