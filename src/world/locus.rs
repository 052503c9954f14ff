use smallvec::SmallVec;

use crate::math::{Mat4, Vec3, apply};
use crate::renderer::Color;

use super::geometry::Aabb;

/// One point of a point-cloud figure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColoredPoint {
    pub pos: Vec3,
    pub color: Color,
}

impl ColoredPoint {
    pub fn new(pos: Vec3, color: Color) -> Self {
        Self { pos, color }
    }
}

/// Flat, unordered point cloud.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Locus {
    pub points: Vec<ColoredPoint>,
}

impl Locus {
    pub fn new(points: Vec<ColoredPoint>) -> Self {
        Self { points }
    }

    pub fn transform(&mut self, m: &Mat4) {
        transform_points(&mut self.points, m);
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.points.iter().map(|p| p.pos))
    }
}

/// Point cloud laid out on a `width × height` grid, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Lattice {
    points: Vec<ColoredPoint>,
    width: usize,
    height: usize,
}

impl Lattice {
    /// `None` when `points.len()` does not match the grid dimensions.
    pub fn new(points: Vec<ColoredPoint>, width: usize, height: usize) -> Option<Self> {
        (points.len() == width * height).then_some(Self {
            points,
            width,
            height,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn points(&self) -> &[ColoredPoint] {
        &self.points
    }

    /// Point at grid cell `(col, row)`.
    pub fn at(&self, col: usize, row: usize) -> Option<&ColoredPoint> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.points.get(row * self.width + col)
    }

    /// Flat indices of the 4-connected neighbours of cell `(col, row)`.
    pub fn neighbors(&self, col: usize, row: usize) -> SmallVec<[usize; 4]> {
        let mut out = SmallVec::new();
        if col >= self.width || row >= self.height {
            return out;
        }
        let idx = row * self.width + col;
        if col > 0 {
            out.push(idx - 1);
        }
        if col + 1 < self.width {
            out.push(idx + 1);
        }
        if row > 0 {
            out.push(idx - self.width);
        }
        if row + 1 < self.height {
            out.push(idx + self.width);
        }
        out
    }

    /// Right and down grid edges, each emitted once.
    pub fn grid_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height).flat_map(move |row| {
            (0..self.width).flat_map(move |col| {
                let idx = row * self.width + col;
                let right = (col + 1 < self.width).then_some((idx, idx + 1));
                let down = (row + 1 < self.height).then_some((idx, idx + self.width));
                right.into_iter().chain(down)
            })
        })
    }

    pub fn transform(&mut self, m: &Mat4) {
        transform_points(&mut self.points, m);
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.points.iter().map(|p| p.pos))
    }
}

fn transform_points(points: &mut [ColoredPoint], m: &Mat4) {
    for p in points.iter_mut() {
        p.pos = apply(m, p.pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(w: usize, h: usize) -> Lattice {
        let pts = (0..w * h)
            .map(|i| ColoredPoint::new(Vec3::new((i % w) as f32, (i / w) as f32, 0.0), Color::ONE))
            .collect();
        Lattice::new(pts, w, h).unwrap()
    }

    #[test]
    fn lattice_rejects_mismatched_grid() {
        assert!(Lattice::new(vec![ColoredPoint::new(Vec3::ZERO, Color::ONE)], 2, 2).is_none());
    }

    #[test]
    fn corner_and_interior_neighbors() {
        let g = grid(3, 3);
        assert_eq!(g.neighbors(0, 0).as_slice(), &[1, 3]);
        assert_eq!(g.neighbors(1, 1).as_slice(), &[3, 5, 1, 7]);
        assert!(g.neighbors(3, 0).is_empty());
    }

    #[test]
    fn grid_edge_count() {
        // 3x2 grid: 2*2 horizontal + 3*1 vertical
        assert_eq!(grid(3, 2).grid_edges().count(), 7);
    }

    #[test]
    fn at_uses_row_major_order() {
        let g = grid(4, 2);
        assert_eq!(g.at(1, 1).unwrap().pos, Vec3::new(1.0, 1.0, 0.0));
        assert!(g.at(4, 0).is_none());
    }
}
