use std::{fmt, sync::Arc};

use crate::math::{EPSILON, Mat4, Vec3, apply, inverse, then};
use crate::renderer::Color;

use super::geometry::{Aabb, Line};

/// Implicit surface described only by a ray query and an object-space box.
pub trait ImplicitSurface: fmt::Debug + Send + Sync {
    /// Nearest hit along `ray` (parameter `t ≥ 0`, `ray.from` at `t = 0`),
    /// in object space. `None` is an ordinary miss.
    fn intersect(&self, ray: &Line) -> Option<Vec3>;

    /// Object-space bounding box.
    fn bounds(&self) -> Aabb;
}

/// Figure defined by an [`ImplicitSurface`] plus an accumulated
/// object → world transform.
#[derive(Clone, Debug)]
pub struct Intersector {
    surface: Arc<dyn ImplicitSurface>,
    to_world: Mat4,
    /// cached inverse of `to_world`; `None` once the transform collapsed
    from_world: Option<Mat4>,
    pub color: Color,
}

impl Intersector {
    pub fn new(surface: Arc<dyn ImplicitSurface>, color: Color) -> Self {
        Self {
            surface,
            to_world: Mat4::IDENTITY,
            from_world: Some(Mat4::IDENTITY),
            color,
        }
    }

    pub fn transform(&mut self, m: &Mat4) {
        self.to_world = then(self.to_world, *m);
        self.from_world = inverse(self.to_world);
    }

    pub fn bounds(&self) -> Aabb {
        self.surface.bounds().transformed(&self.to_world)
    }

    /// World-space ray query: map the ray into object space, ask the surface,
    /// map the hit back. A singular accumulated transform never hits.
    pub fn intersect(&self, ray: &Line) -> Option<Vec3> {
        let from_world = self.from_world.as_ref()?;
        let hit = self.surface.intersect(&ray.transformed(from_world))?;
        Some(apply(&self.to_world, hit))
    }
}

/*──────────────────────── stock surfaces ─────────────────────────────*/

/// Smallest root of `a t² + b t + c = 0` that is `≥ 0` and accepted by `keep`.
fn nearest_root(a: f32, b: f32, c: f32, keep: impl Fn(f32) -> bool) -> Option<f32> {
    if a.abs() < EPSILON {
        return None;
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let (mut t0, mut t1) = ((-b - sq) / (2.0 * a), (-b + sq) / (2.0 * a));
    if t0 > t1 {
        std::mem::swap(&mut t0, &mut t1);
    }
    [t0, t1].into_iter().find(|&t| t >= 0.0 && keep(t))
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl ImplicitSurface for Sphere {
    fn intersect(&self, ray: &Line) -> Option<Vec3> {
        let d = ray.direction();
        let oc = ray.from - self.center;
        let t = nearest_root(
            d.dot(d),
            2.0 * d.dot(oc),
            oc.dot(oc) - self.radius * self.radius,
            |_| true,
        )?;
        Some(ray.at(t))
    }

    fn bounds(&self) -> Aabb {
        Aabb::new(
            self.center - Vec3::splat(self.radius),
            self.center + Vec3::splat(self.radius),
        )
    }
}

/// Open cylinder around the z axis between `z_min` and `z_max`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cylinder {
    pub radius: f32,
    pub z_min: f32,
    pub z_max: f32,
}

impl ImplicitSurface for Cylinder {
    fn intersect(&self, ray: &Line) -> Option<Vec3> {
        let d = ray.direction();
        let o = ray.from;
        let t = nearest_root(
            d.x * d.x + d.y * d.y,
            2.0 * (o.x * d.x + o.y * d.y),
            o.x * o.x + o.y * o.y - self.radius * self.radius,
            |t| {
                let z = o.z + d.z * t;
                z >= self.z_min && z <= self.z_max
            },
        )?;
        Some(ray.at(t))
    }

    fn bounds(&self) -> Aabb {
        Aabb::new(
            Vec3::new(-self.radius, -self.radius, self.z_min),
            Vec3::new(self.radius, self.radius, self.z_max),
        )
    }
}

/// Surface backed by an arbitrary closure.
pub struct FnSurface<F> {
    query: F,
    bounds: Aabb,
}

impl<F> FnSurface<F>
where
    F: Fn(&Line) -> Option<Vec3> + Send + Sync,
{
    pub fn new(query: F, bounds: Aabb) -> Self {
        Self { query, bounds }
    }
}

impl<F> fmt::Debug for FnSurface<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSurface")
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

impl<F> ImplicitSurface for FnSurface<F>
where
    F: Fn(&Line) -> Option<Vec3> + Send + Sync,
{
    fn intersect(&self, ray: &Line) -> Option<Vec3> {
        (self.query)(ray)
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
