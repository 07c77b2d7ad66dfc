pub use kurbo::{Affine, BezPath, Circle, CubicBez, Ellipse, Point, Rect, Vec2};

/// Output surface dimensions in pixels.
///
/// Construction clamps degenerate dimensions to 1x1 so fractions of the
/// viewport never divide by zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels, always >= 1.
    pub width: u32,
    /// Height in pixels, always >= 1.
    pub height: u32,
}

impl Viewport {
    /// Create a viewport, clamping zero dimensions to 1.
    pub fn clamped(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Width as f64.
    pub fn width_f(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as f64.
    pub fn height_f(self) -> f64 {
        f64::from(self.height)
    }

    /// Center point of the viewport.
    pub fn center(self) -> Point {
        Point::new(self.width_f() / 2.0, self.height_f() / 2.0)
    }
}

/// Straight-alpha RGB color with f32 channels in `0.0..=255.0`.
///
/// Serialized as a `[r, g, b]` triple so palettes stay compact in JSON.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Rgb {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
}

impl Rgb {
    /// Build a color from channel values in `0.0..=255.0`.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation toward `other` by `t` in `[0, 1]`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    /// Scale all channels by `k`, clamped back into range.
    pub fn scaled(self, k: f32) -> Self {
        Self {
            r: (self.r * k).clamp(0.0, 255.0),
            g: (self.g * k).clamp(0.0, 255.0),
            b: (self.b * k).clamp(0.0, 255.0),
        }
    }

    /// Quantize to straight-alpha RGBA8 with `alpha` in `0.0..=255.0`.
    pub fn to_rgba8(self, alpha: f32) -> [u8; 4] {
        [
            self.r.round().clamp(0.0, 255.0) as u8,
            self.g.round().clamp(0.0, 255.0) as u8,
            self.b.round().clamp(0.0, 255.0) as u8,
            alpha.round().clamp(0.0, 255.0) as u8,
        ]
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<Rgb> for [f32; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

/// Scalar linear interpolation.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
