//! Scan conversion of clipped eye-space polygons.
//!
//! Each candidate pixel column intersects every projected edge; the even–odd
//! rule over the crossings below a pixel decides whether it is inside. Depth
//! is never interpolated: the pixel is turned back into a ray from the eye and
//! intersected with the polygon's own plane.

use glam::Vec2;
use smallvec::SmallVec;

use crate::math::{EPSILON, Vec3};
use crate::settings::FrameParams;
use crate::world::{Line, Polygon};

/// One covered pixel and the eye-space point it samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fragment {
    pub x: usize,
    pub y: usize,
    pub point: Vec3,
}

impl Fragment {
    #[inline]
    pub fn depth(&self) -> f32 {
        self.point.z
    }
}

/// Inclusive pixel rectangle `(x0, y0, x1, y1)` covering `pts`, clamped to
/// the raster. `None` when nothing of it lands on screen.
pub fn pixel_bounds(pts: &[Vec2], fp: &FrameParams) -> Option<(usize, usize, usize, usize)> {
    let first = *pts.first()?;
    let (lo, hi) = pts
        .iter()
        .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
    let x0 = lo.x.ceil().max(0.0);
    let y0 = lo.y.ceil().max(0.0);
    let x1 = hi.x.floor().min(fp.width as f32 - 1.0);
    let y1 = hi.y.floor().min(fp.height as f32 - 1.0);
    if !(x0 <= x1 && y0 <= y1) {
        return None;
    }
    Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
}

/// Y where segment `a → b` crosses the vertical line at `x`.
///
/// Half-open in x (`min ≤ x < max`) so a shared vertex is counted once when
/// the outline passes through it and zero or two times at a local extremum.
/// Vertical edges never cross.
#[inline]
fn crossing(a: Vec2, b: Vec2, x: f32) -> Option<f32> {
    let dx = b.x - a.x;
    if dx.abs() < EPSILON {
        return None;
    }
    if x < a.x.min(b.x) || x >= a.x.max(b.x) {
        return None;
    }
    let t = (x - a.x) / dx;
    Some(a.y + t * (b.y - a.y))
}

/// Emit every pixel covered by `poly` (already clipped, in eye space).
/// Returns the number of fragments produced.
pub fn fill_polygon(poly: &Polygon, fp: &FrameParams, mut emit: impl FnMut(Fragment)) -> usize {
    let Some(plane) = poly.plane() else {
        return 0;
    };
    if poly.points.iter().any(|p| p.z <= 0.0) {
        // only possible with clipping off and a broken guard plane
        debug_assert!(false, "unclipped vertex behind the eye");
        return 0;
    }

    let projected: SmallVec<[Vec2; 12]> = poly.points.iter().map(|&p| fp.project(p)).collect();
    let Some((x0, y0, x1, y1)) = pixel_bounds(&projected, fp) else {
        return 0;
    };

    let n = projected.len();
    let mut ys: SmallVec<[f32; 8]> = SmallVec::new();
    let mut emitted = 0;

    for x in x0..=x1 {
        let xf = x as f32;
        ys.clear();
        ys.extend((0..n).filter_map(|i| crossing(projected[i], projected[(i + 1) % n], xf)));
        if ys.len() < 2 {
            continue;
        }
        ys.sort_by(f32::total_cmp);

        for y in y0..=y1 {
            let yf = y as f32;
            let below = ys.partition_point(|&c| c < yf);
            if below % 2 == 0 {
                continue;
            }
            let dir = fp.ray_direction(xf, yf);
            let Some(point) = plane.intersect_point(&Line::new(Vec3::ZERO, dir)) else {
                continue;
            };
            if point.z <= 0.0 {
                continue;
            }
            emit(Fragment { x, y, point });
            emitted += 1;
        }
    }
    emitted
}

/*──────────────────────────────── Tests ───────────────────────────────*/
