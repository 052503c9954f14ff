//! Interactive viewer.
//!
//! ```bash
//! cargo run --release -- [model files…] [--demo] [--width 800 --height 600]
//! ```
//!
//! A frame is rendered at start-up and after every keypress; Esc quits.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

use yarender_rs::{
    input::action_for,
    math::Vec3,
    model::load_polyhedron,
    renderer::Software,
    scene::Scene,
    settings::{Settings, Toggles},
    world::{Aabb, Observer},
};

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Model files to load (one polyhedron each)
    #[arg(value_name = "FILE")]
    models: Vec<PathBuf>,

    #[arg(long, default_value_t = 640)]
    width: usize,

    #[arg(long, default_value_t = 640)]
    height: usize,

    /// Full field of view in degrees
    #[arg(long, default_value_t = 60.0)]
    fov: f32,

    #[arg(long, default_value_t = 1.0)]
    hither: f32,

    #[arg(long, default_value_t = 100.0)]
    yon: f32,

    /// Add the procedural demo figures (implied when no model is given)
    #[arg(long)]
    demo: bool,

    #[arg(long)]
    no_lighting: bool,

    #[arg(long)]
    wireframe: bool,
}

impl Opts {
    fn settings(&self) -> Settings {
        let mut s = Settings::default();
        s.set_half_angle((self.fov * 0.5).to_radians());
        // yon first so a large hither is not clamped by the default yon
        s.set_yon(self.yon);
        s.set_hither(self.hither);
        s.set_yon(self.yon);
        if self.no_lighting {
            s.toggles.remove(Toggles::LIGHTING);
        }
        if self.wireframe {
            s.toggles.insert(Toggles::WIREFRAME);
        }
        s
    }
}

/// Observer placed on -z far enough back to see all of `bounds`.
fn framing_observer(bounds: Aabb, half_angle: f32) -> Observer {
    let c = bounds.center();
    let radius = bounds.size().length() * 0.5;
    let back = radius / half_angle.tan().max(1e-3) + radius;
    let position = c - Vec3::Z * back.max(1.0);
    Observer::new(position, c, position + Vec3::Y)
}

fn build_scene(opts: &Opts, settings: &Settings) -> anyhow::Result<Scene> {
    let mut models = Vec::with_capacity(opts.models.len());
    for path in &opts.models {
        let poly = load_polyhedron(path)
            .with_context(|| format!("loading model {}", path.display()))?;
        models.push(poly);
    }

    let mut scene = if opts.demo || models.is_empty() {
        Scene::demo()
    } else {
        let bounds = models
            .iter()
            .filter_map(|m| m.bounds())
            .reduce(|a, b| a.union(&b))
            .context("models contain no points")?;
        let observer = framing_observer(bounds, settings.half_angle());
        let light = observer.position + Vec3::new(-2.0, 4.0, 0.0);
        Scene::new(observer, light)
    };
    for m in models {
        scene.push(m);
    }
    Ok(scene)
}

fn title(scene: &Scene, settings: &Settings) -> String {
    format!(
        "yarender - focus {} ({}) - {:?}",
        scene.focus(),
        scene.focused().kind(),
        settings.toggles
    )
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opts = Opts::parse();
    let mut settings = opts.settings();
    let mut scene = build_scene(&opts, &settings)?;
    info!(figures = scene.figures().len(), w = opts.width, h = opts.height, "viewer ready");

    let mut win = Window::new(
        "yarender",
        opts.width,
        opts.height,
        WindowOptions::default(),
    )
    .context("opening window")?;
    win.set_target_fps(60);

    let mut renderer = Software::default();
    let mut dirty = true;

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let shift = win.is_key_down(Key::LeftShift) || win.is_key_down(Key::RightShift);
        for key in win.get_keys_pressed(KeyRepeat::Yes) {
            if let Some(action) = action_for(key, shift) {
                scene.apply(action, &mut settings);
                dirty = true;
            }
        }

        if !dirty {
            // keep the event pump alive between frames
            win.update();
            continue;
        }

        let fp = settings.frame(opts.width, opts.height);
        renderer.begin_frame(fp.width, fp.height);
        renderer.render(&scene, &fp);

        let mut shown = Ok(());
        renderer.end_frame(|fb, w, h| shown = win.update_with_buffer(fb, w, h));
        shown.context("presenting frame")?;

        win.set_title(&title(&scene, &settings));
        dirty = false;
    }

    Ok(())
}
