//! Procedural figure generators used by the demo scene and the tests.

use std::sync::Arc;

use crate::math::Vec3;
use crate::renderer::Color;

use super::{
    geometry::Polygon,
    intersector::{Cylinder, Intersector, Sphere},
    locus::{ColoredPoint, Lattice, Locus},
    polyhedron::Polyhedron,
};

/// Unit-cube corners: the -z ring then the +z ring, each counter-clockwise
/// from (-1, -1).
const CUBE_CORNERS: [[f32; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// Counter-clockwise when seen from outside, so normals point outward.
const CUBE_FACES: [[usize; 4]; 6] = [
    [0, 3, 2, 1], // -z
    [4, 5, 6, 7], // +z
    [0, 4, 7, 3], // -x
    [1, 2, 6, 5], // +x
    [0, 1, 5, 4], // -y
    [3, 7, 6, 2], // +y
];

/// Axis-aligned cube of edge `size` centred on the origin.
pub fn cube(size: f32, color: Color) -> Polyhedron {
    let half = size * 0.5;
    let polygons = CUBE_FACES
        .iter()
        .map(|face| Polygon::new(face.iter().map(|&i| Vec3::from_array(CUBE_CORNERS[i]) * half)))
        .collect();
    Polyhedron::new(polygons, color)
}

pub fn sphere(center: Vec3, radius: f32, color: Color) -> Intersector {
    Intersector::new(Arc::new(Sphere { center, radius }), color)
}

/// Open cylinder standing on the origin along +z.
pub fn cylinder(radius: f32, height: f32, color: Color) -> Intersector {
    Intersector::new(
        Arc::new(Cylinder {
            radius,
            z_min: 0.0,
            z_max: height,
        }),
        color,
    )
}

/// `count` points on a helix around +z, hue-shifting from `from` to `to`.
pub fn helix(radius: f32, pitch: f32, turns: f32, count: usize, from: Color, to: Color) -> Locus {
    let last = count.saturating_sub(1).max(1) as f32;
    let points = (0..count)
        .map(|i| {
            let t = i as f32 / last;
            let angle = t * turns * std::f32::consts::TAU;
            let (s, c) = angle.sin_cos();
            ColoredPoint::new(
                Vec3::new(radius * c, radius * s, pitch * turns * t),
                from.lerp(to, t),
            )
        })
        .collect();
    Locus::new(points)
}

/// Height field `z = height(x, y)` sampled on a `width × height` grid with
/// `spacing` between samples, centred on the origin. Colour runs from `low` to
/// `high` with the sampled height.
pub fn height_field(
    width: usize,
    depth: usize,
    spacing: f32,
    low: Color,
    high: Color,
    height: impl Fn(f32, f32) -> f32,
) -> Lattice {
    let x0 = -(width.saturating_sub(1) as f32) * spacing * 0.5;
    let y0 = -(depth.saturating_sub(1) as f32) * spacing * 0.5;
    let samples: Vec<Vec3> = (0..width * depth)
        .map(|i| {
            let x = x0 + (i % width) as f32 * spacing;
            let y = y0 + (i / width) as f32 * spacing;
            Vec3::new(x, y, height(x, y))
        })
        .collect();

    let (z_lo, z_hi) = samples
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.z), hi.max(p.z))
        });
    let span = (z_hi - z_lo).max(f32::EPSILON);

    let points = samples
        .into_iter()
        .map(|p| ColoredPoint::new(p, low.lerp(high, (p.z - z_lo) / span)))
        .collect();

    // the grid is built to match, so the dimension check cannot fail
    Lattice::new(points, width, depth).unwrap_or_else(|| unreachable!("grid size mismatch"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_normals_point_outward() {
        let c = cube(1.0, Color::ONE);
        assert_eq!(c.polygons.len(), 6);
        for poly in &c.polygons {
            let centre = poly.bounds().unwrap().center();
            let n = poly.normal().unwrap();
            assert!(n.dot(centre) > 0.0, "inward face {poly:?}");
        }
    }

    #[test]
    fn helix_spans_requested_turns() {
        let h = helix(1.0, 2.0, 3.0, 31, Color::X, Color::Z);
        assert_eq!(h.points.len(), 31);
        let top = h.points.last().unwrap();
        assert!((top.pos.z - 6.0).abs() < 1e-5);
        assert_eq!(top.color, Color::Z);
    }

    #[test]
    fn height_field_is_centred() {
        let l = height_field(5, 3, 1.0, Color::ZERO, Color::ONE, |x, y| x + y);
        let b = l.bounds().unwrap();
        assert_eq!(b.min.x, -2.0);
        assert_eq!(b.max.y, 1.0);
        assert_eq!(l.width(), 5);
        assert_eq!(l.height(), 3);
    }
}
