use crate::foundation::core::Viewport;

/// A fully composited frame: straight RGBA8 bytes, tightly packed, row-major.
///
/// Composited frames are always opaque (the sky covers the whole viewport),
/// so premultiplied and straight alpha coincide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgba {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes.
    pub data: Vec<u8>,
}

impl FrameRgba {
    /// Allocate a zeroed frame for `viewport`.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            width: viewport.width,
            height: viewport.height,
            data: vec![0; viewport.width as usize * viewport.height as usize * 4],
        }
    }

    /// Pixel at `(x, y)`, or None when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }
}
