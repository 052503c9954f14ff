//! Rendering layer.
//!
//! *Figures never touch a pixel buffer directly.* The [`Software`] backend
//! walks the scene once per frame and pushes pixels through the pipeline:
//!
//! ```text
//! eye transform → backface → clip → shade → scan-convert → z-buffer → halo
//! ```
//!
//! Output goes through the immediate-mode [`Canvas`] interface, which is also
//! what the wireframe and bounding-box overlays draw with.

use crate::math::Vec3;

pub mod clip;
pub mod halo;
pub mod raster;
pub mod shade;
pub mod software;
pub mod zbuf;

pub use clip::Frustum;
pub use shade::Lighting;
pub use software::{FrameStats, Software};
pub use zbuf::ZBuffer;

/// Pixel format of the software frame-buffer (0x00RRGGBB).
pub type Rgba = u32;

/// Linear RGB with every channel in `[0, 1]`.
pub type Color = Vec3;

/// Quantise a [`Color`] into the frame-buffer format.
pub fn pack_color(c: Color) -> Rgba {
    let c = c.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
    ((c.x.round() as u32) << 16) | ((c.y.round() as u32) << 8) | c.z.round() as u32
}

/// Immediate-mode raster surface.
///
/// Coordinates are pixels with the origin in the **bottom-left** corner;
/// anything outside the surface is silently dropped.
pub trait Canvas {
    /// `(width, height)` in pixels.
    fn size(&self) -> (usize, usize);

    /// Colour used by every following draw call.
    fn set_color(&mut self, c: Color);

    /// Fill the whole surface with the current colour.
    fn clear(&mut self);

    /// Plot one pixel in the current colour.
    fn point(&mut self, x: i32, y: i32);

    /// Filled axis-aligned rectangle, `(x, y)` being its lower-left pixel.
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        for yy in y..y + h {
            for xx in x..x + w {
                self.point(xx, yy);
            }
        }
    }

    /// Integer Bresenham line, both end-points inclusive.
    fn line(&mut self, mut x0: i32, mut y0: i32, x1: i32, y1: i32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.point(x0, y0);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}
