use crate::math::{Mat4, Vec3};

use super::{
    geometry::Aabb,
    intersector::Intersector,
    locus::{Lattice, Locus},
    observer::Observer,
    polyhedron::Polyhedron,
};

/// Everything the scene can hold. The render loop, the key handlers and the
/// bounding-box overlay are written once against this type.
///
/// Destruction is ordinary `Drop`: each variant owns its data.
#[derive(Clone, Debug)]
pub enum Figure {
    Polyhedron(Polyhedron),
    Locus(Locus),
    Lattice(Lattice),
    Intersector(Intersector),
    Observer(Observer),
}

impl Figure {
    /// Short label for logs and the viewer title.
    pub fn kind(&self) -> &'static str {
        match self {
            Figure::Polyhedron(_) => "polyhedron",
            Figure::Locus(_) => "locus",
            Figure::Lattice(_) => "lattice",
            Figure::Intersector(_) => "intersector",
            Figure::Observer(_) => "observer",
        }
    }

    pub fn transform(&mut self, m: &Mat4) {
        match self {
            Figure::Polyhedron(p) => p.transform(m),
            Figure::Locus(l) => l.transform(m),
            Figure::Lattice(l) => l.transform(m),
            Figure::Intersector(i) => i.transform(m),
            Figure::Observer(o) => o.transform(m),
        }
    }

    /// World-space bounding box; `None` for a figure with no geometry.
    pub fn bounds(&self) -> Option<Aabb> {
        match self {
            Figure::Polyhedron(p) => p.bounds(),
            Figure::Locus(l) => l.bounds(),
            Figure::Lattice(l) => l.bounds(),
            Figure::Intersector(i) => Some(i.bounds()),
            Figure::Observer(o) => Some(o.bounds()),
        }
    }

    pub fn center(&self) -> Option<Vec3> {
        self.bounds().map(|b| b.center())
    }

    pub fn size(&self) -> Option<Vec3> {
        self.bounds().map(|b| b.size())
    }

    /// Point that rotations and scales act around: the box centre, except the
    /// observer which orbits its interest point.
    pub fn pivot(&self) -> Vec3 {
        match self {
            Figure::Observer(o) => o.interest,
            _ => self.center().unwrap_or(Vec3::ZERO),
        }
    }
}

impl From<Polyhedron> for Figure {
    fn from(p: Polyhedron) -> Self {
        Figure::Polyhedron(p)
    }
}

impl From<Locus> for Figure {
    fn from(l: Locus) -> Self {
        Figure::Locus(l)
    }
}

impl From<Lattice> for Figure {
    fn from(l: Lattice) -> Self {
        Figure::Lattice(l)
    }
}

impl From<Intersector> for Figure {
    fn from(i: Intersector) -> Self {
        Figure::Intersector(i)
    }
}

impl From<Observer> for Figure {
    fn from(o: Observer) -> Self {
        Figure::Observer(o)
    }
}
