use crate::math::Mat4;
use crate::renderer::Color;

use super::geometry::{Aabb, Polygon};

/// Unordered set of planar faces sharing one base colour.
///
/// The polyhedron owns its polygons outright; dropping it drops them.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyhedron {
    pub polygons: Vec<Polygon>,
    pub color: Color,
}

impl Polyhedron {
    pub fn new(polygons: Vec<Polygon>, color: Color) -> Self {
        Self { polygons, color }
    }

    pub fn transform(&mut self, m: &Mat4) {
        for poly in self.polygons.iter_mut() {
            poly.transform(m);
        }
    }

    /// `None` when the polyhedron has no vertices at all.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(
            self.polygons
                .iter()
                .flat_map(|poly| poly.points.iter().copied()),
        )
    }
}
