//! Sutherland–Hodgman clipping against the eye-space view frustum.
//!
//! Six half-spaces, applied in the fixed order top, left, bottom, right,
//! near (hither), far (yon). The four side planes pass through the eye and the
//! corners of the visible rectangle on the `z = 1` plane.

use smallvec::SmallVec;

use crate::math::Vec3;
use crate::settings::{FrameParams, MIN_HITHER};
use crate::world::{Line, Plane, Polygon};

type Points = SmallVec<[Vec3; 8]>;

#[derive(Clone, Debug)]
pub struct Frustum {
    planes: SmallVec<[Plane; 6]>,
    /// hither ≥ yon: nothing is visible
    empty: bool,
}

impl Frustum {
    /// Full frustum for the frame's field of view and hither/yon distances.
    pub fn new(fp: &FrameParams) -> Self {
        let e = fp.view_extent();
        Self::from_extent(e.x, e.y, fp.hither, fp.yon)
    }

    /// `ex`, `ey`: half-extents of the view rectangle at `z = 1`.
    pub fn from_extent(ex: f32, ey: f32, hither: f32, yon: f32) -> Self {
        if hither >= yon {
            return Self {
                planes: SmallVec::new(),
                empty: true,
            };
        }

        // always inside, whatever the field of view
        let inside = Vec3::new(0.0, 0.0, (hither + yon) * 0.5);
        let corner = |sx: f32, sy: f32| Vec3::new(sx * ex, sy * ey, 1.0);
        let side = |a: Vec3, b: Vec3| oriented(Plane::new(Vec3::ZERO, a.cross(b)), inside);

        let planes = SmallVec::from_buf([
            side(corner(-1.0, 1.0), corner(1.0, 1.0)),   // top
            side(corner(-1.0, -1.0), corner(-1.0, 1.0)), // left
            side(corner(1.0, -1.0), corner(-1.0, -1.0)), // bottom
            side(corner(1.0, 1.0), corner(1.0, -1.0)),   // right
            oriented(Plane::new(Vec3::new(0.0, 0.0, hither), Vec3::Z), inside),
            oriented(Plane::new(Vec3::new(0.0, 0.0, yon), -Vec3::Z), inside),
        ]);
        for pl in &planes {
            debug_assert!(pl.side_of(inside) > 0, "reference point on wrong side of {pl:?}");
        }
        Self {
            planes,
            empty: false,
        }
    }

    /// Only a near plane just in front of the eye: used when clipping is
    /// switched off so the perspective divide stays defined.
    pub fn guard() -> Self {
        Self {
            planes: SmallVec::from_slice(&[Plane::new(Vec3::new(0.0, 0.0, MIN_HITHER), Vec3::Z)]),
            empty: false,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// True when `p` lies inside (or on) every half-space.
    pub fn contains(&self, p: Vec3) -> bool {
        !self.empty && self.planes.iter().all(|pl| pl.side_of(p) >= 0)
    }

    /// Intersection of `poly` with the frustum. A fully clipped polygon comes
    /// back with zero vertices.
    pub fn clip(&self, poly: &Polygon) -> Polygon {
        if self.empty || poly.is_empty() {
            return Polygon::default();
        }
        let mut cur: Points = poly.points.clone();
        let mut next = Points::new();
        for pl in &self.planes {
            clip_to_plane(&cur, pl, &mut next);
            std::mem::swap(&mut cur, &mut next);
            if cur.is_empty() {
                break;
            }
        }
        Polygon { points: cur }
    }
}

/// Flip `pl` so that `inside` is on its positive side.
fn oriented(pl: Plane, inside: Vec3) -> Plane {
    if pl.side_of(inside) < 0 {
        Plane::new(pl.point, -pl.normal)
    } else {
        pl
    }
}

/// One Sutherland–Hodgman pass. Vertices on the plane count as inside; an
/// edge parallel to the plane contributes no intersection point.
fn clip_to_plane(input: &[Vec3], pl: &Plane, out: &mut Points) {
    out.clear();
    let n = input.len();
    for i in 0..n {
        let cur = input[i];
        let next = input[(i + 1) % n];
        let cur_in = pl.side_of(cur) >= 0;
        let next_in = pl.side_of(next) >= 0;
        if cur_in {
            out.push(cur);
        }
        if cur_in != next_in {
            if let Some(p) = pl.intersect_point(&Line::new(cur, next)) {
                out.push(p);
            }
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
