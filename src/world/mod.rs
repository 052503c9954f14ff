pub mod figure;
pub mod geometry;
pub mod intersector;
pub mod locus;
pub mod observer;
pub mod polyhedron;
pub mod primitives;

pub use figure::Figure;
pub use geometry::{AABB_EDGES, Aabb, Line, Plane, Polygon};
pub use intersector::{Cylinder, FnSurface, ImplicitSurface, Intersector, Sphere};
pub use locus::{ColoredPoint, Lattice, Locus};
pub use observer::Observer;
pub use polyhedron::Polyhedron;
