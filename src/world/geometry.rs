use smallvec::SmallVec;

use crate::math::{EPSILON, Mat4, Vec3, apply, sign};

/*----------------------------- Line ---------------------------------*/

/// Two points; used both as a finite segment and as a ray `from → to`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub from: Vec3,
    pub to: Vec3,
}

impl Line {
    pub fn new(from: Vec3, to: Vec3) -> Self {
        Self { from, to }
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.to - self.from
    }

    /// Point at parameter `t` (`0` = `from`, `1` = `to`).
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.from + self.direction() * t
    }

    pub fn transformed(&self, m: &Mat4) -> Self {
        Self {
            from: apply(m, self.from),
            to: apply(m, self.to),
        }
    }
}

/*----------------------------- Plane --------------------------------*/

/// Point + normal; the normal need not be unit length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self { point, normal }
    }

    /// Signed distance (scaled by |normal|) of `p` from the plane.
    #[inline]
    pub fn distance(&self, p: Vec3) -> f32 {
        (p - self.point).dot(self.normal)
    }

    /// `-1`, `0` or `+1` depending on which side of the plane `p` lies.
    #[inline]
    pub fn side_of(&self, p: Vec3) -> i32 {
        sign(self.distance(p))
    }

    /// Parameter `t` along `line` where it meets the plane, or `None` when the
    /// line runs parallel to it.
    pub fn intersect(&self, line: &Line) -> Option<f32> {
        let denom = self.normal.dot(line.direction());
        if denom.abs() < EPSILON {
            return None;
        }
        Some(self.normal.dot(self.point - line.from) / denom)
    }

    /// Same as [`Plane::intersect`] but returns the point itself.
    pub fn intersect_point(&self, line: &Line) -> Option<Vec3> {
        self.intersect(line).map(|t| line.at(t))
    }
}

/*----------------------------- Aabb ---------------------------------*/

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

/// Corner-index pairs forming the 12 edges of an [`Aabb`].
pub const AABB_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 3),
    (3, 2),
    (2, 0),
    (4, 5),
    (5, 7),
    (7, 6),
    (6, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Tight box around `points`; `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        Some(it.fold(Self::new(first, first), |b, p| Self {
            min: b.min.min(p),
            max: b.max.max(p),
        }))
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn union(&self, other: &Self) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Corner `i` has bit 0 → x, bit 1 → y, bit 2 → z picking `max`.
    pub fn corners(&self) -> [Vec3; 8] {
        std::array::from_fn(|i| {
            Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            )
        })
    }

    /// Box around the eight transformed corners.
    pub fn transformed(&self, m: &Mat4) -> Self {
        // from_points over a non-empty array never fails
        let corners = self.corners().map(|c| apply(m, c));
        Self::from_points(corners).unwrap_or(*self)
    }
}

/*----------------------------- Polygon ------------------------------*/

/// Closed, ordered vertex loop. Most faces are quads and the clipper adds at
/// most one vertex per plane, so the inline capacity rarely spills.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    pub points: SmallVec<[Vec3; 8]>,
}

impl Polygon {
    pub fn new<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Cyclic `(a, b)` edge pairs, last vertex connecting back to the first.
    pub fn edges(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Unit normal by Newell's method; right-handed with respect to winding.
    /// `None` for fewer than three vertices or zero area.
    pub fn normal(&self) -> Option<Vec3> {
        if self.points.len() < 3 {
            return None;
        }
        let n = self.edges().fold(Vec3::ZERO, |acc, (a, b)| {
            acc + Vec3::new(
                (a.y - b.y) * (a.z + b.z),
                (a.z - b.z) * (a.x + b.x),
                (a.x - b.x) * (a.y + b.y),
            )
        });
        let len = n.length();
        (len > EPSILON).then(|| n / len)
    }

    /// Supporting plane through the first vertex.
    pub fn plane(&self) -> Option<Plane> {
        self.normal().map(|n| Plane::new(self.points[0], n))
    }

    pub fn transform(&mut self, m: &Mat4) {
        for p in self.points.iter_mut() {
            *p = apply(m, *p);
        }
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.points.iter().copied())
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
