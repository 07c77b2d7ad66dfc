use std::sync::Arc;

use kurbo::{Cap, Join, PathEl, Shape, Stroke};

use crate::config::SkyPalette;
use crate::environment::sky_color;
use crate::foundation::core::{Affine, Circle, Ellipse, Point, Rect, Rgb, Vec2, Viewport};
use crate::foundation::error::{CanopyError, CanopyResult};
use crate::foundation::sample::NoiseField;
use crate::render::frame::FrameRgba;
use crate::scene::atmosphere::ParticleSprite;
use crate::scene::forest::Forest;
use crate::scene::gaps::GapRegistry;
use crate::scene::leaf::LeafFrame;

/// Flattening tolerance for ellipse and stroke outlines, in pixels.
const PATH_TOLERANCE: f64 = 0.25;

/// Light-mask grid cell size in pixels.
const MASK_CELL: usize = 8;

/// Fraction of each viewport dimension the sky bands overshoot on every side.
/// Must exceed the largest inward edge displacement the breathing scale can
/// cause (half of its 2% swing).
const SKY_OVERSCAN: f64 = 0.02;

/// Per-frame inputs for the world pass (sky, trunks, leaves, light mask).
#[derive(Clone, Copy, Debug)]
pub struct WorldParams<'a> {
    /// Current forest generation.
    pub forest: &'a Forest,
    /// Live gaps; leaves inside any gap circle are skipped.
    pub gaps: &'a GapRegistry,
    /// Sky gradient anchors.
    pub sky: &'a SkyPalette,
    /// Shared sway noise field.
    pub wind: &'a NoiseField,
    /// Per-leaf frame inputs.
    pub leaf_frame: LeafFrame,
    /// Cycle phase in `[0, 1)`.
    pub cycle_phase: f64,
    /// Elapsed session time in seconds (drives shimmer).
    pub elapsed: f64,
    /// Smoothed camera drift offset.
    pub cam: Vec2,
    /// Smoothed pointer influence offset.
    pub influence: Vec2,
    /// Global breathing scale around the viewport center, ~1.0.
    pub breathing: f64,
}

/// Rasterizes the scene into RGBA8 frames on the CPU.
///
/// The compositor owns the trunk layer (rebuilt only on generate/resize), a
/// world surface re-rendered every frame, and the output frame buffer. A
/// frame is produced by `begin_frame` -> `draw_particles` ->
/// `draw_gap_rings` -> `draw_fade` -> `finish`; the call order is the layer
/// order.
#[derive(Debug)]
pub struct Compositor {
    viewport: Viewport,
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    world: Arc<vello_cpu::Pixmap>,
    out: vello_cpu::Pixmap,
    trunk_paint: Option<vello_cpu::Image>,
    shimmer: NoiseField,
    frame: FrameRgba,
}

impl Compositor {
    /// Create a compositor for `viewport`.
    ///
    /// Dimensions beyond `u16::MAX` (the rasterizer's surface limit) are
    /// rejected up front.
    pub fn new(viewport: Viewport, shimmer_seed: u32) -> CanopyResult<Self> {
        let (width, height) = surface_dims(viewport)?;
        Ok(Self {
            viewport,
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
            world: Arc::new(vello_cpu::Pixmap::new(width, height)),
            out: vello_cpu::Pixmap::new(width, height),
            trunk_paint: None,
            shimmer: NoiseField::new(shimmer_seed),
            frame: FrameRgba::new(viewport),
        })
    }

    /// Viewport the surfaces are sized for.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Rebuild every surface for a new viewport and drop the trunk layer.
    ///
    /// Must be followed by [`Compositor::rebuild_trunks`] before the next
    /// frame so no stale-sized buffer is referenced.
    pub fn resize(&mut self, viewport: Viewport) -> CanopyResult<()> {
        let (width, height) = surface_dims(viewport)?;
        self.viewport = viewport;
        self.width = width;
        self.height = height;
        self.ctx = vello_cpu::RenderContext::new(width, height);
        self.world = Arc::new(vello_cpu::Pixmap::new(width, height));
        self.out = vello_cpu::Pixmap::new(width, height);
        self.trunk_paint = None;
        self.frame = FrameRgba::new(viewport);
        Ok(())
    }

    /// Render the trunk layer once for the current forest generation.
    ///
    /// Trunks are fixed after growth, so the layer is baked (with the
    /// generation-time night tint) and blitted every frame.
    pub fn rebuild_trunks(&mut self, forest: &Forest, night: bool) -> CanopyResult<()> {
        let tint = if night { 0.7 } else { 1.0 };
        let lower = Rgb::new(70.0, 45.0, 22.0).scaled(tint);
        let upper = Rgb::new(95.0, 65.0, 35.0).scaled(tint);
        // Single mid-tone fill per trunk; the reference's two-stop gradient
        // is indistinguishable at trunk widths.
        let bark = lower.lerp(upper, 0.5);
        let [r, g, b, _] = bark.to_rgba8(255.0);

        self.ctx.reset();
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, 230));
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        for tree in forest.trees() {
            let style = Stroke::new(tree.trunk_weight())
                .with_caps(Cap::Round)
                .with_join(Join::Round);
            let outline = kurbo::stroke(
                tree.trunk().path_elements(PATH_TOLERANCE),
                &style,
                &kurbo::StrokeOpts::default(),
                PATH_TOLERANCE,
            );
            self.ctx.fill_path(&bezpath_to_cpu(&outline));
        }
        self.ctx.flush();

        let mut layer = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.render_to_pixmap(&mut layer);
        self.trunk_paint = Some(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(layer)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        });
        Ok(())
    }

    /// Render the world pass (sky, trunks, leaves) and screen-blend the light
    /// mask, then start the overlay scene.
    pub fn begin_frame(&mut self, p: &WorldParams<'_>) -> CanopyResult<()> {
        if self.trunk_paint.is_none() {
            return Err(CanopyError::render(
                "trunk layer missing; call rebuild_trunks after generate/resize",
            ));
        }

        let center = self.viewport.center();
        let breath = Affine::translate(center.to_vec2())
            * Affine::scale(p.breathing)
            * Affine::translate(-center.to_vec2());

        self.ctx.reset();
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.draw_sky(p, breath);
        self.draw_trunks(p, breath);
        self.draw_leaves(p, breath);
        self.ctx.flush();
        let world = Arc::make_mut(&mut self.world);
        self.ctx.render_to_pixmap(world);

        blend_light_mask(world, &self.shimmer, p);

        // Overlay scene: the composited world as a base image, then
        // atmospherics, gap rings, and the fade drawn on top in screen space.
        self.ctx.reset();
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(self.world.clone()),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        });
        self.ctx.fill_rect(&full_rect(self.viewport));
        Ok(())
    }

    /// Draw one atmospheric particle population.
    pub fn draw_particles<I>(&mut self, sprites: I, color: Rgb)
    where
        I: Iterator<Item = ParticleSprite>,
    {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        for s in sprites {
            let [r, g, b, a] = color.to_rgba8(s.alpha as f32);
            self.ctx
                .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            let path = Circle::new(s.center, s.radius.max(0.0)).to_path(PATH_TOLERANCE);
            self.ctx.fill_path(&bezpath_to_cpu(&path));
        }
    }

    /// Draw faint outlined rings over the live gaps.
    pub fn draw_gap_rings(&mut self, gaps: &GapRegistry, night: bool) {
        let alpha = if night { 10 } else { 15 };
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 230, alpha));
        let style = Stroke::new(10.0).with_caps(Cap::Round).with_join(Join::Round);
        for gap in gaps.iter() {
            let ring = Circle::new(gap.center, gap.radius.max(0.0));
            let outline = kurbo::stroke(
                ring.path_elements(PATH_TOLERANCE),
                &style,
                &kurbo::StrokeOpts::default(),
                PATH_TOLERANCE,
            );
            self.ctx.fill_path(&bezpath_to_cpu(&outline));
        }
    }

    /// Draw the global fade overlay; `alpha` in `0..=255`, values <= 1 are
    /// treated as fully clear.
    pub fn draw_fade(&mut self, alpha: f64) {
        if alpha <= 1.0 {
            return;
        }
        let a = alpha.clamp(0.0, 255.0) as u8;
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, a));
        self.ctx.fill_rect(&full_rect(self.viewport));
    }

    /// Rasterize the overlay scene and return the finished frame.
    pub fn finish(&mut self) -> CanopyResult<&FrameRgba> {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.out);
        self.frame.data.copy_from_slice(self.out.data_as_u8_slice());
        Ok(&self.frame)
    }

    fn draw_sky(&mut self, p: &WorldParams<'_>, breath: Affine) {
        self.ctx.set_transform(affine_to_cpu(breath));
        let h = self.viewport.height_f();
        let w = self.viewport.width_f();
        // Bands overshoot the viewport so the breathing shrink (at most 2%
        // about the center) never exposes an uncovered fringe; the output
        // frame stays opaque edge to edge.
        let pad_x = w * SKY_OVERSCAN;
        let pad_y = h * SKY_OVERSCAN;
        let mut y = -pad_y;
        while y < h + pad_y {
            let c = sky_color(p.sky, p.cycle_phase, y / h);
            let [r, g, b, a] = c.to_rgba8(255.0);
            self.ctx
                .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            self.ctx
                .fill_rect(&rect_to_cpu(Rect::new(-pad_x, y, w + pad_x, y + 3.0)));
            y += 3.0;
        }
    }

    fn draw_trunks(&mut self, p: &WorldParams<'_>, breath: Affine) {
        let Some(trunks) = self.trunk_paint.clone() else {
            return;
        };
        self.ctx
            .set_transform(affine_to_cpu(breath * Affine::translate(p.cam)));
        self.ctx.set_paint(trunks);
        self.ctx.fill_rect(&full_rect(self.viewport));
    }

    fn draw_leaves(&mut self, p: &WorldParams<'_>, breath: Affine) {
        self.ctx.set_transform(affine_to_cpu(breath));
        let shift = Vec2::new(
            p.cam.x + p.influence.x * 0.05,
            p.cam.y + p.influence.y * 0.03,
        );
        for (crown, leaf) in p.forest.leaves_by_layer() {
            let sprite = leaf.sprite(crown, p.wind, &p.leaf_frame);
            let center = sprite.center + shift;
            if p.gaps.occludes(center) {
                continue;
            }

            let [r, g, b, a] = sprite.rim.to_rgba8((sprite.alpha * 0.8) as f32);
            self.ctx
                .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            self.fill_ellipse(center, sprite.rx, sprite.ry);

            let [r, g, b, a] = sprite.body.to_rgba8(sprite.alpha as f32);
            self.ctx
                .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            self.fill_ellipse(center, sprite.rx * 0.62, sprite.ry * 0.62);
        }
    }

    fn fill_ellipse(&mut self, center: Point, rx: f64, ry: f64) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let path = Ellipse::new(center, (rx, ry), 0.0).to_path(PATH_TOLERANCE);
        self.ctx.fill_path(&bezpath_to_cpu(&path));
    }
}

/// Screen-blend the shimmering light grid onto the opaque world surface.
///
/// A coarse noise grid, brighter by day and subtler at night, with a slow
/// sinusoidal swell on the amplitude.
fn blend_light_mask(world: &mut vello_cpu::Pixmap, shimmer: &NoiseField, p: &WorldParams<'_>) {
    let amp_base = if p.leaf_frame.night { 10.0 } else { 28.0 };
    let amp = amp_base + (p.elapsed * 1.2).sin() * amp_base * 0.4;
    if amp <= 0.0 {
        return;
    }

    let w = usize::from(world.width());
    let h = usize::from(world.height());
    let data = world.data_as_u8_slice_mut();
    let src = [255.0 / 255.0, 255.0 / 255.0, 240.0 / 255.0];

    let mut cy = 0;
    while cy < h {
        let mut cx = 0;
        while cx < w {
            let n = shimmer.sample3_01(cx as f64 * 0.005, cy as f64 * 0.006, p.elapsed * 0.3);
            let sa = ((n * amp) / 255.0) as f32;
            if sa > 0.0 {
                for y in cy..(cy + MASK_CELL).min(h) {
                    let row = (y * w + cx) * 4;
                    let cols = (cx + MASK_CELL).min(w) - cx;
                    for px in data[row..row + cols * 4].chunks_exact_mut(4) {
                        screen_over_opaque(px, src, sa);
                    }
                }
            }
            cx += MASK_CELL;
        }
        cy += MASK_CELL;
    }
}

/// Screen-blend a straight-alpha source over one opaque RGBA8 pixel.
///
/// Porter-Duff source-over with the screen kernel `B(s, d) = s + d - s*d`;
/// with an opaque destination this reduces to
/// `out = B(s, d) * sa + d * (1 - sa)`.
fn screen_over_opaque(px: &mut [u8], src: [f32; 3], sa: f32) {
    for c in 0..3 {
        let d = f32::from(px[c]) / 255.0;
        let s = src[c];
        let blended = s + d - s * d;
        let out = blended * sa + d * (1.0 - sa);
        px[c] = (out.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
    }
}

fn surface_dims(viewport: Viewport) -> CanopyResult<(u16, u16)> {
    let width = u16::try_from(viewport.width)
        .map_err(|_| CanopyError::validation("viewport width exceeds u16"))?;
    let height = u16::try_from(viewport.height)
        .map_err(|_| CanopyError::validation("viewport height exceeds u16"))?;
    Ok((width, height))
}

fn full_rect(viewport: Viewport) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(0.0, 0.0, viewport.width_f(), viewport.height_f())
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
