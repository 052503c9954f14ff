//! ---------------------------------------------------------------------------
//! Software (CPU) z-buffer renderer
//!
//! * Fills a `Vec<u32>` frame-buffer in **0x00RRGGBB** format, stored
//!   top-row-first so it can be handed to a window as is.
//! * Canvas coordinates are bottom-left based; [`Software::index`] flips rows.
//! * Figures are cloned into eye space every frame; the scene itself is never
//!   modified.
//! ---------------------------------------------------------------------------

use tracing::{debug, instrument};

use crate::{
    math::{Mat4, Vec3, apply},
    renderer::{
        Canvas, Color, Rgba,
        clip::Frustum,
        halo::{HALO_RADIUS, paint_halo},
        pack_color, raster,
        shade::{Lighting, estimate_normal},
        zbuf::ZBuffer,
    },
    scene::Scene,
    settings::{FrameParams, Toggles},
    world::{AABB_EDGES, ColoredPoint, Figure, Intersector, Lattice, Line, Polyhedron},
};

/// Background clear colour.
pub const BACKGROUND: Rgba = 0x00_202020;

/// Colour of the focus halo.
pub const HALO_COLOR: Color = Color::new(1.0, 0.85, 0.3);

/// Colour of bounding-box overlays.
pub const BOUNDS_COLOR: Color = Color::new(0.0, 0.8, 0.8);

/// Pixel offset used to probe implicit surfaces for a normal.
const NORMAL_PROBE: f32 = 0.5;

/// Counters of one frame, reported at `debug` level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub figures: usize,
    pub polygons: usize,
    pub culled: usize,
    pub clipped_away: usize,
    pub degenerate: usize,
    pub fragments: usize,
    pub pixels_written: usize,
    pub halo_pixels: usize,
}

/// Per-frame constants shared by every draw routine.
struct Pass<'a> {
    fp: &'a FrameParams,
    frustum: Frustum,
    lighting: Lighting,
    /// light position in eye space
    light: Vec3,
    /// also write into the halo record buffer
    record: bool,
}

/// CPU renderer owning the colour scratch, the depth buffer and the halo
/// record buffer.
#[derive(Default)]
pub struct Software {
    scratch: Vec<Rgba>,
    zbuf: ZBuffer,
    record: ZBuffer,
    color: Rgba,
    width: usize,
    height: usize,
    stats: FrameStats,
}

/*──────────────────────── frame lifecycle ────────────────────────────*/
impl Software {
    /// (Re)allocate for the requested resolution and clear every buffer.
    pub fn begin_frame(&mut self, w: usize, h: usize) {
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
        }
        self.scratch.fill(BACKGROUND);
        self.zbuf.reset(w, h);
        self.record.reset(w, h);
        self.stats = FrameStats::default();
    }

    /// Render every figure of `scene` as seen by its observer.
    #[instrument(skip_all, fields(w = fp.width, h = fp.height))]
    pub fn render(&mut self, scene: &Scene, fp: &FrameParams) {
        if fp.width != self.width || fp.height != self.height {
            self.begin_frame(fp.width, fp.height);
        }

        let eye = scene.observer().eye_transform();
        let frustum = if fp.has(Toggles::CLIP) {
            Frustum::new(fp)
        } else {
            Frustum::guard()
        };
        let halo = fp.has(Toggles::HALO);

        for (idx, figure) in scene.figures().iter().enumerate() {
            if matches!(figure, Figure::Observer(_)) {
                continue;
            }
            let pass = Pass {
                fp,
                frustum: frustum.clone(),
                lighting: Lighting::from(fp),
                light: apply(&eye, scene.light()),
                record: halo && idx == scene.focus(),
            };
            self.draw_figure(figure, &eye, &pass);
        }

        if halo && !matches!(scene.focused(), Figure::Observer(_)) {
            let color = pack_color(HALO_COLOR);
            let (scratch, width, height) = (&mut self.scratch, self.width, self.height);
            self.stats.halo_pixels = paint_halo(&mut self.zbuf, &self.record, HALO_RADIUS, |x, y| {
                scratch[(height - 1 - y) * width + x] = color;
            });
        }

        debug!(stats = ?self.stats, "frame rendered");
    }

    /// Finish the frame and **loan** the finished buffer to `submit`.
    pub fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }

    /*──────────────────────── inspection ─────────────────────────────*/

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn depth(&self) -> &ZBuffer {
        &self.zbuf
    }

    pub fn record(&self) -> &ZBuffer {
        &self.record
    }

    /// Frame-buffer value at bottom-left based `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        self.index(x as i32, y as i32).map(|i| self.scratch[i])
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some((self.height - 1 - y as usize) * self.width + x as usize)
    }
}

/*──────────────────────── figure dispatch ────────────────────────────*/
impl Software {
    fn draw_figure(&mut self, figure: &Figure, eye: &Mat4, pass: &Pass) {
        self.stats.figures += 1;

        if pass.fp.has(Toggles::BOUNDS) {
            if let Some(b) = figure.bounds() {
                let corners = b.corners().map(|c| apply(eye, c));
                self.set_color(BOUNDS_COLOR);
                for (a, b) in AABB_EDGES {
                    self.draw_segment(corners[a], corners[b], pass);
                }
            }
        }

        let mut local = figure.clone();
        local.transform(eye);
        match &local {
            Figure::Polyhedron(p) => self.draw_polyhedron(p, pass),
            Figure::Locus(l) => self.draw_points(&l.points, pass),
            Figure::Lattice(l) => self.draw_lattice(l, pass),
            Figure::Intersector(i) => self.draw_intersector(i, pass),
            Figure::Observer(_) => {}
        }
    }

    /// Record (for the halo) unconditionally, then depth-test and write.
    #[inline]
    fn plot(&mut self, x: usize, y: usize, depth: f32, rgba: Rgba, record: bool) {
        if record {
            self.record.test_and_set(x, y, depth);
        }
        if self.zbuf.test_and_set(x, y, depth) {
            if let Some(i) = self.index(x as i32, y as i32) {
                self.scratch[i] = rgba;
                self.stats.pixels_written += 1;
            }
        }
    }

    /// Eye-space segment as a screen line; skipped unless both ends are in
    /// front of hither.
    fn draw_segment(&mut self, a: Vec3, b: Vec3, pass: &Pass) {
        let near = pass.fp.hither.max(crate::settings::MIN_HITHER);
        if a.z < near || b.z < near {
            return;
        }
        let pa = pass.fp.project(a);
        let pb = pass.fp.project(b);
        if !(pa.is_finite() && pb.is_finite()) {
            return;
        }
        // keep Bresenham bounded for wildly off-screen ends
        let lim = 4.0 * (pass.fp.width.max(pass.fp.height) as f32);
        if pa.abs().max_element() > lim || pb.abs().max_element() > lim {
            return;
        }
        self.line(pa.x.round() as i32, pa.y.round() as i32, pb.x.round() as i32, pb.y.round() as i32);
    }
}

/*──────────────────────── polyhedra ──────────────────────────────────*/
impl Software {
    fn draw_polyhedron(&mut self, p: &Polyhedron, pass: &Pass) {
        let fp = pass.fp;
        for poly in &p.polygons {
            self.stats.polygons += 1;

            let Some(plane) = poly.plane() else {
                self.stats.degenerate += 1;
                continue;
            };
            if fp.has(Toggles::BACKFACE) && plane.side_of(Vec3::ZERO) != fp.backface_sign {
                self.stats.culled += 1;
                continue;
            }

            let clipped = pass.frustum.clip(poly);
            if clipped.len() < 3 {
                self.stats.clipped_away += 1;
                continue;
            }

            if fp.has(Toggles::FILL) {
                let color = if fp.has(Toggles::LIGHTING) {
                    let centroid =
                        clipped.points.iter().copied().sum::<Vec3>() / clipped.len() as f32;
                    pass.lighting.color(centroid, plane.normal, pass.light, p.color)
                } else {
                    p.color
                };
                let rgba = pack_color(color);
                let mut frags = 0;
                raster::fill_polygon(&clipped, fp, |f| {
                    frags += 1;
                    self.plot(f.x, f.y, f.depth(), rgba, pass.record);
                });
                self.stats.fragments += frags;
            }

            if fp.has(Toggles::WIREFRAME) {
                // outline darker than the fill so both stay readable
                let wire = if fp.has(Toggles::FILL) { p.color * 0.5 } else { p.color };
                self.set_color(wire);
                for (a, b) in clipped.edges() {
                    self.draw_segment(a, b, pass);
                }
            }
        }
    }
}

/*──────────────────────── point clouds ───────────────────────────────*/
impl Software {
    fn draw_points(&mut self, points: &[ColoredPoint], pass: &Pass) {
        for p in points {
            if !pass.frustum.contains(p.pos) {
                continue;
            }
            let px = pass.fp.project(p.pos);
            let (x, y) = (px.x.round(), px.y.round());
            if x < 0.0 || y < 0.0 || x >= pass.fp.width as f32 || y >= pass.fp.height as f32 {
                continue;
            }
            self.stats.fragments += 1;
            self.plot(x as usize, y as usize, p.pos.z, pack_color(p.color), pass.record);
        }
    }

    fn draw_lattice(&mut self, l: &Lattice, pass: &Pass) {
        if pass.fp.has(Toggles::WIREFRAME) {
            let pts = l.points();
            for (a, b) in l.grid_edges() {
                self.set_color(pts[a].color.lerp(pts[b].color, 0.5));
                self.draw_segment(pts[a].pos, pts[b].pos, pass);
            }
        }
        self.draw_points(l.points(), pass);
    }
}

/*──────────────────────── implicit surfaces ──────────────────────────*/
impl Software {
    fn draw_intersector(&mut self, s: &Intersector, pass: &Pass) {
        let fp = pass.fp;
        let corners = s.bounds().corners();
        if corners.iter().all(|c| c.z <= 0.0) {
            return;
        }

        // whole screen if the box reaches behind the eye
        let (x0, y0, x1, y1) = if corners.iter().all(|c| c.z > 0.0) {
            let projected = corners.map(|c| fp.project(c));
            match raster::pixel_bounds(&projected, fp) {
                Some(r) => r,
                None => return,
            }
        } else {
            (0, 0, fp.width - 1, fp.height - 1)
        };

        let clip = fp.has(Toggles::CLIP);
        let lit = fp.has(Toggles::LIGHTING);
        let query = |x: f32, y: f32| s.intersect(&Line::new(Vec3::ZERO, fp.ray_direction(x, y)));

        for y in y0..=y1 {
            for x in x0..=x1 {
                let (xf, yf) = (x as f32, y as f32);
                let Some(hit) = query(xf, yf) else {
                    continue;
                };
                if hit.z <= 0.0 || (clip && (hit.z < fp.hither || hit.z > fp.yon)) {
                    continue;
                }

                let color = if lit {
                    let probes = [
                        query(xf + NORMAL_PROBE, yf),
                        query(xf, yf - NORMAL_PROBE),
                        query(xf - NORMAL_PROBE, yf),
                        query(xf, yf + NORMAL_PROBE),
                    ];
                    match estimate_normal(hit, probes) {
                        Some(n) => pass.lighting.color(hit, n, pass.light, s.color),
                        None => s.color,
                    }
                } else {
                    s.color
                };

                self.stats.fragments += 1;
                self.plot(x, y, hit.z, pack_color(color), pass.record);
            }
        }
    }
}

/*──────────────────────── Canvas impl ────────────────────────────────*/
impl Canvas for Software {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn set_color(&mut self, c: Color) {
        self.color = pack_color(c);
    }

    fn clear(&mut self) {
        self.scratch.fill(self.color);
    }

    fn point(&mut self, x: i32, y: i32) {
        if let Some(i) = self.index(x, y) {
            self.scratch[i] = self.color;
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        settings::Settings,
        world::{Observer, primitives},
    };

    fn front_observer() -> Observer {
        Observer::new(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::ZERO,
            Vec3::new(0.0, 1.0, -5.0),
        )
    }

    fn settings() -> Settings {
        let mut s = Settings::default();
        s.set_half_angle(std::f32::consts::FRAC_PI_4);
        s
    }

    #[test]
    fn canvas_line_and_rect_land_in_scratch() {
        let mut sw = Software::default();
        sw.begin_frame(8, 8);
        sw.set_color(Color::X);
        sw.line(0, 0, 7, 7);
        assert_eq!(sw.pixel(3, 3), Some(0x00_FF0000));
        sw.set_color(Color::Z);
        sw.fill_rect(5, 0, 2, 2);
        assert_eq!(sw.pixel(6, 1), Some(0x00_0000FF));
        // bottom-left origin: (0, 0) is the last row of the buffer
        let mut last_row_first = 0;
        sw.end_frame(|fb, w, h| last_row_first = fb[(h - 1) * w]);
        assert_eq!(last_row_first, 0x00_FF0000);
        sw.set_color(Color::ZERO);
        sw.clear();
        assert_eq!(sw.pixel(3, 3), Some(0));
    }

    #[test]
    fn unlit_cube_fills_centre() {
        let mut s = settings();
        s.toggle(Toggles::LIGHTING);
        let mut scene = Scene::new(front_observer(), Vec3::new(0.0, 0.0, -10.0));
        scene.push(primitives::cube(1.0, Color::new(0.0, 1.0, 0.0)));

        let fp = s.frame(64, 64);
        let mut sw = Software::default();
        sw.begin_frame(64, 64);
        sw.render(&scene, &fp);

        assert_eq!(sw.pixel(32, 32), Some(0x00_00FF00));
        assert_eq!(sw.pixel(0, 0), Some(BACKGROUND));
        assert_eq!(sw.stats().culled, 5);
    }

    #[test]
    fn nearer_figure_wins_regardless_of_order() {
        let mut s = settings();
        s.toggle(Toggles::LIGHTING);
        s.toggle(Toggles::HALO);
        let mut scene = Scene::new(front_observer(), Vec3::ZERO);
        let mut near = primitives::cube(1.0, Color::X);
        near.transform(&crate::math::translation(Vec3::new(0.0, 0.0, -2.0)));
        scene.push(primitives::cube(1.0, Color::Y));
        scene.push(near);

        let fp = s.frame(64, 64);
        let mut sw = Software::default();
        sw.begin_frame(64, 64);
        sw.render(&scene, &fp);
        assert_eq!(sw.pixel(32, 32), Some(0x00_FF0000));
    }

    #[test]
    fn sphere_intersector_is_drawn_and_shaded() {
        let s = settings();
        let mut scene = Scene::new(front_observer(), Vec3::new(0.0, 0.0, -10.0));
        scene.push(primitives::sphere(Vec3::ZERO, 1.0, Color::ONE));

        let fp = s.frame(48, 48);
        let mut sw = Software::default();
        sw.begin_frame(48, 48);
        sw.render(&scene, &fp);

        let d = sw.depth().get(24, 24);
        assert!((d - 4.0).abs() < 0.05, "depth at centre {d}");
        assert!(sw.stats().fragments > 0);
        assert_ne!(sw.pixel(24, 24), Some(BACKGROUND));
    }

    #[test]
    fn locus_points_are_depth_tested() {
        let s = settings();
        let mut scene = Scene::new(front_observer(), Vec3::ZERO);
        scene.push(crate::world::Locus::new(vec![
            ColoredPoint::new(Vec3::new(0.0, 0.0, 1.0), Color::X),
            ColoredPoint::new(Vec3::new(0.0, 0.0, 0.0), Color::Z),
        ]));
        let fp = s.frame(32, 32);
        let mut sw = Software::default();
        sw.begin_frame(32, 32);
        sw.render(&scene, &fp);
        assert_eq!(sw.pixel(16, 16), Some(0x00_0000FF));
        assert_eq!(sw.depth().get(16, 16), 5.0);
    }
}
