//! End-to-end frames through the public API.

use std::{collections::VecDeque, f32::consts::FRAC_PI_4};

use approx::assert_abs_diff_eq;
use yarender_rs::{
    math::{Vec3, translation},
    renderer::{
        Color, Software, pack_color,
        software::{BACKGROUND, HALO_COLOR},
    },
    scene::Scene,
    settings::{Settings, Toggles},
    world::{Observer, Polyhedron, primitives},
};

const W: usize = 200;
const H: usize = 200;

fn settings() -> Settings {
    let mut s = Settings::default();
    s.set_half_angle(FRAC_PI_4);
    s
}

fn cube_scene(eye: Vec3) -> Scene {
    let mut scene = Scene::new(
        Observer::new(eye, Vec3::ZERO, eye + Vec3::Y),
        Vec3::new(-3.0, 4.0, -10.0),
    );
    scene.push(primitives::cube(1.0, Color::new(0.8, 0.3, 0.1)));
    scene
}

fn render(scene: &Scene, s: &Settings) -> Software {
    let mut sw = Software::default();
    sw.begin_frame(W, H);
    sw.render(scene, &s.frame(W, H));
    sw
}

#[test]
fn cube_seen_face_on_shows_one_centred_face() {
    let scene = cube_scene(Vec3::new(0.0, 0.0, -5.0));
    let sw = render(&scene, &settings());

    let stats = sw.stats();
    assert_eq!(stats.polygons, 6);
    assert_eq!(stats.culled, 5);
    assert_eq!(stats.halo_pixels, 0);

    // front face at eye depth 4.5 spans ±0.5 / 4.5 · 100 px around the centre
    let (x0, y0, x1, y1) = sw.depth().occupied_bounds().expect("nothing drawn");
    assert_eq!((x0, y0, x1, y1), (89, 89, 111, 111));
    assert_eq!(sw.depth().occupied_count(), (x1 - x0 + 1) * (y1 - y0 + 1));
    assert!(((x0 + x1) as f32 * 0.5 - W as f32 * 0.5).abs() <= 1.0);
    assert!(((y0 + y1) as f32 * 0.5 - H as f32 * 0.5).abs() <= 1.0);

    assert_abs_diff_eq!(sw.depth().get(100, 100), 4.5, epsilon = 1e-4);
    assert_ne!(sw.pixel(100, 100), Some(BACKGROUND));
    assert_eq!(sw.pixel(0, 0), Some(BACKGROUND));
}

#[test]
fn cube_seen_from_a_corner_shows_three_faces() {
    let scene = cube_scene(Vec3::new(-5.0, -5.0, -5.0));
    let sw = render(&scene, &settings());

    let stats = sw.stats();
    assert_eq!(stats.culled, 3);
    assert_eq!(stats.clipped_away, 0);
    assert!(stats.pixels_written > 0);
}

/// Size of the 8-connected region of pixels equal to `rgba` that contains
/// `(x, y)`.
fn region_size(sw: &Software, x: usize, y: usize, rgba: u32) -> usize {
    let mut seen = vec![false; W * H];
    let mut queue = VecDeque::from([(x, y)]);
    seen[y * W + x] = true;
    let mut count = 0;
    while let Some((cx, cy)) = queue.pop_front() {
        count += 1;
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                let (nx, ny) = (cx as i64 + dx, cy as i64 + dy);
                if nx < 0 || ny < 0 || nx >= W as i64 || ny >= H as i64 {
                    continue;
                }
                let (nx, ny) = (nx as usize, ny as usize);
                if !seen[ny * W + nx] && sw.pixel(nx, ny) == Some(rgba) {
                    seen[ny * W + nx] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
    }
    count
}

#[test]
fn corner_view_faces_are_whole_and_centred() {
    let eye = Vec3::new(-5.0, -5.0, -5.0);
    let mut scene = Scene::new(Observer::new(eye, Vec3::ZERO, eye + Vec3::Y), eye);
    let colors = [
        Color::X,
        Color::Y,
        Color::Z,
        Color::new(1.0, 1.0, 0.0),
        Color::new(1.0, 0.0, 1.0),
        Color::new(0.0, 1.0, 1.0),
    ];
    let faces = primitives::cube(1.0, Color::ONE).polygons;
    for (face, color) in faces.into_iter().zip(colors) {
        scene.push(Polyhedron::new(vec![face], color));
    }
    let mut s = settings();
    s.toggle(Toggles::LIGHTING);
    let sw = render(&scene, &s);
    assert_eq!(sw.stats().culled, 3);

    let mut shown = 0;
    for color in colors {
        let rgba = pack_color(color);
        let pixels: Vec<(usize, usize)> = (0..H)
            .flat_map(|y| (0..W).map(move |x| (x, y)))
            .filter(|&(x, y)| sw.pixel(x, y) == Some(rgba))
            .collect();
        let Some(&(x, y)) = pixels.first() else {
            continue;
        };
        shown += 1;
        assert_eq!(region_size(&sw, x, y, rgba), pixels.len(), "face {color} is split");
    }
    assert_eq!(shown, 3);

    let (x0, y0, x1, y1) = sw.depth().occupied_bounds().expect("nothing drawn");
    assert!(((x0 + x1) as f32 * 0.5 - W as f32 * 0.5).abs() <= 1.0);
    assert!(((y0 + y1) as f32 * 0.5 - H as f32 * 0.5).abs() <= 1.0);
}

#[test]
fn flipped_backface_sign_shows_the_inside() {
    let scene = cube_scene(Vec3::new(0.0, 0.0, -5.0));
    let mut s = settings();
    s.flip_backface_sign();
    let sw = render(&scene, &s);
    assert_eq!(sw.stats().culled, 1);
    // front face culled, so the centre sees the far face
    assert_abs_diff_eq!(sw.depth().get(100, 100), 5.5, epsilon = 1e-4);
}

#[test]
fn halo_surrounds_focus_without_covering_geometry() {
    let mut scene = cube_scene(Vec3::new(0.0, 0.0, -5.0));
    let mut other = primitives::cube(1.0, Color::new(0.1, 0.3, 0.9));
    other.transform(&translation(Vec3::new(1.2, 0.0, 0.0)));
    scene.push(other);
    scene.set_focus(1);

    let mut plain = settings();
    plain.toggle(Toggles::HALO);
    let without = render(&scene, &plain);
    let with = render(&scene, &settings());

    let halo = pack_color(HALO_COLOR);
    let mut painted = 0;
    for y in 0..H {
        for x in 0..W {
            let before = without.pixel(x, y);
            let after = with.pixel(x, y);
            if without.depth().is_occupied(x, y) {
                assert_eq!(before, after, "halo overwrote geometry at ({x}, {y})");
            } else if after == Some(halo) {
                painted += 1;
                // never further than the radius from the focused figure
                let (rx0, ry0, rx1, ry1) = with.record().occupied_bounds().unwrap();
                assert!(x + 5 >= rx0 && x <= rx1 + 5 && y + 5 >= ry0 && y <= ry1 + 5);
            } else {
                assert_eq!(after, Some(BACKGROUND));
            }
        }
    }
    assert!(painted > 0);
    assert_eq!(painted, with.stats().halo_pixels);
}

#[test]
fn occluded_focus_still_records_and_gets_a_halo() {
    let mut scene = cube_scene(Vec3::new(0.0, 0.0, -5.0));
    // front face at eye depth 3.1 covers the focused cube's face entirely
    let mut near = primitives::cube(0.9, Color::new(0.2, 0.6, 0.2));
    near.transform(&translation(Vec3::new(0.0, 0.0, -1.45)));
    scene.push(near);
    scene.set_focus(1);
    let sw = render(&scene, &settings());

    let (rx0, ry0, rx1, ry1) = sw.record().occupied_bounds().expect("focus not recorded");
    assert_eq!((rx0, ry0, rx1, ry1), (89, 89, 111, 111));
    for y in ry0..=ry1 {
        for x in rx0..=rx1 {
            assert!(sw.depth().get(x, y) < sw.record().get(x, y), "focus visible at ({x}, {y})");
        }
    }
    assert_abs_diff_eq!(sw.depth().get(100, 100), 3.1, epsilon = 1e-4);

    assert!(sw.stats().halo_pixels > 0);
    assert_eq!(sw.pixel(85, 100), Some(pack_color(HALO_COLOR)));
}

#[test]
fn observer_focus_has_no_halo() {
    let scene = cube_scene(Vec3::new(0.0, 0.0, -5.0));
    let sw = render(&scene, &settings());
    assert_eq!(scene.focus(), 0);
    assert_eq!(sw.record().occupied_count(), 0);
}

#[test]
fn hither_at_yon_draws_nothing() {
    let mut scene = cube_scene(Vec3::new(0.0, 0.0, -5.0));
    scene.push(primitives::sphere(Vec3::new(0.0, 2.0, 0.0), 0.5, Color::ONE));
    scene.push(primitives::helix(0.5, 0.2, 2.0, 50, Color::X, Color::Y));
    let mut s = settings();
    s.set_hither(s.yon());
    let sw = render(&scene, &s);

    assert_eq!(sw.stats().pixels_written, 0);
    assert_eq!(sw.depth().occupied_count(), 0);
}

#[test]
fn clipping_off_still_guards_the_eye() {
    // observer inside the cube: the side faces straddle the eye plane
    let scene = cube_scene(Vec3::new(0.0, 0.0, 0.1));
    let mut s = settings();
    s.toggle(Toggles::CLIP);
    s.toggle(Toggles::BACKFACE);
    let sw = render(&scene, &s);
    for y in 0..H {
        for x in 0..W {
            let d = sw.depth().get(x, y);
            assert!(d.is_infinite() || d > 0.0);
        }
    }
}
