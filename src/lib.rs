//! Interactive software 3-D renderer.
//!
//! Figures (polyhedra, point clouds, implicit surfaces) live in world space
//! inside a [`scene::Scene`]. Every frame the [`renderer::Software`] backend
//! clones them into eye space, clips, shades and scan-converts them into a
//! z-buffered frame-buffer, optionally finishing with a halo around the
//! focused figure.

pub mod input;
pub mod math;
pub mod model;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod world;
