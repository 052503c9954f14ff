//! World-space scene and the input-driven mutations applied to it.

use tracing::{debug, info};

use crate::{
    math::{Mat4, Vec3, cos_sin_of, rotation_x, rotation_y, rotation_z, scale, then, translation},
    renderer::Color,
    settings::{Settings, Toggles},
    world::{Figure, Observer, primitives},
};

/// Slot of the observer figure; always present.
const OBSERVER: usize = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// One discrete user command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    /// Move the focused figure by a world-space offset.
    Translate(Vec3),
    /// Rotate the focused figure about its pivot (radians).
    Rotate(Axis, f32),
    /// Uniform scale about the pivot.
    Scale(f32),
    CycleFocus,
    Toggle(Toggles),
    FlipBackface,
    /// Add to the half-angle (radians).
    HalfAngle(f32),
    /// Multiply hither / yon.
    Hither(f32),
    Yon(f32),
    /// Add to ambient / diffuse-max; multiply the specular power.
    Ambient(f32),
    Diffuse(f32),
    Specular(f32),
    MoveLight(Vec3),
}

/// Figures in world space plus the observer, the light and the focus.
///
/// Slot 0 always holds the observer figure; it can be focused and moved like
/// any other figure but is never drawn.
#[derive(Clone, Debug)]
pub struct Scene {
    figures: Vec<Figure>,
    light: Vec3,
    focus: usize,
}

impl Scene {
    pub fn new(observer: Observer, light: Vec3) -> Self {
        Self {
            figures: vec![Figure::Observer(observer)],
            light,
            focus: OBSERVER,
        }
    }

    /// Add a figure and return its slot.
    pub fn push(&mut self, figure: impl Into<Figure>) -> usize {
        let figure = figure.into();
        debug!(kind = figure.kind(), slot = self.figures.len(), "figure added");
        self.figures.push(figure);
        self.figures.len() - 1
    }

    pub fn figures(&self) -> &[Figure] {
        &self.figures
    }

    pub fn observer(&self) -> &Observer {
        match &self.figures[OBSERVER] {
            Figure::Observer(o) => o,
            other => unreachable!("scene slot 0 holds a {} instead of the observer", other.kind()),
        }
    }

    pub fn light(&self) -> Vec3 {
        self.light
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused(&self) -> &Figure {
        &self.figures[self.focus]
    }

    /// Focus slot `idx`; ignored when out of range.
    pub fn set_focus(&mut self, idx: usize) {
        if idx < self.figures.len() {
            self.focus = idx;
        }
    }

    pub fn cycle_focus(&mut self) {
        self.focus = (self.focus + 1) % self.figures.len();
    }

    /// Apply `m` to the focused figure about its pivot.
    fn transform_focused(&mut self, m: Mat4) {
        let figure = &mut self.figures[self.focus];
        let pivot = figure.pivot();
        let about = then(then(translation(-pivot), m), translation(pivot));
        figure.transform(&about);
    }

    pub fn apply(&mut self, action: Action, settings: &mut Settings) {
        debug!(?action, focus = self.focus, "apply");
        match action {
            Action::Translate(by) => self.figures[self.focus].transform(&translation(by)),
            Action::Rotate(axis, angle) => {
                let (s, c) = angle.sin_cos();
                let m = match axis {
                    Axis::X => rotation_x(c, s),
                    Axis::Y => rotation_y(c, s),
                    Axis::Z => rotation_z(c, s),
                };
                self.transform_focused(m);
            }
            Action::Scale(k) if k > 0.0 => self.transform_focused(scale(Vec3::splat(k))),
            Action::Scale(_) => {}
            Action::CycleFocus => {
                self.cycle_focus();
                info!(focus = self.focus, kind = self.focused().kind(), "focus changed");
            }
            Action::Toggle(t) => settings.toggle(t),
            Action::FlipBackface => settings.flip_backface_sign(),
            Action::HalfAngle(d) => settings.set_half_angle(settings.half_angle() + d),
            Action::Hither(k) => settings.set_hither(settings.hither() * k),
            Action::Yon(k) => settings.set_yon(settings.yon() * k),
            Action::Ambient(d) => settings.set_ambient(settings.ambient() + d),
            Action::Diffuse(d) => settings.set_diffuse_max(settings.diffuse_max() + d),
            Action::Specular(k) => settings.set_specular_power(settings.specular_power() * k),
            Action::MoveLight(by) => self.light += by,
        }
    }

    /// Procedural showcase: cube, sphere, cylinder, helix and a height field
    /// seen from slightly above.
    pub fn demo() -> Self {
        let mut scene = Self::new(
            Observer::new(
                Vec3::new(0.0, 3.0, -12.0),
                Vec3::ZERO,
                Vec3::new(0.0, 4.0, -12.0),
            ),
            Vec3::new(-8.0, 10.0, -10.0),
        );

        let mut cube = primitives::cube(2.0, Color::new(0.8, 0.2, 0.2));
        cube.transform(&translation(Vec3::new(-3.5, 0.0, 0.0)));
        scene.push(cube);

        scene.push(primitives::sphere(Vec3::ZERO, 1.3, Color::new(0.2, 0.4, 0.9)));

        let mut cyl = primitives::cylinder(0.8, 2.5, Color::new(0.9, 0.8, 0.2));
        // stand it upright (+z → +y) next to the sphere
        let (c, s) = cos_sin_of(-1.0, 0.0).unwrap_or((1.0, 0.0));
        cyl.transform(&then(rotation_x(c, s), translation(Vec3::new(3.5, -1.25, 0.0))));
        scene.push(cyl);

        let mut helix = primitives::helix(
            1.0,
            0.5,
            4.0,
            400,
            Color::new(1.0, 0.3, 0.8),
            Color::new(0.3, 1.0, 0.8),
        );
        helix.transform(&translation(Vec3::new(0.0, 1.5, 3.0)));
        scene.push(helix);

        let mut field = primitives::height_field(
            41,
            41,
            0.25,
            Color::new(0.1, 0.3, 0.1),
            Color::new(0.7, 1.0, 0.5),
            |x, y| 0.3 * (x * 1.5).sin() * (y * 1.5).cos(),
        );
        // lay the xy grid flat on the floor
        let (c, s) = cos_sin_of(1.0, 0.0).unwrap_or((1.0, 0.0));
        field.transform(&then(rotation_x(c, s), translation(Vec3::new(0.0, -2.0, 0.0))));
        scene.push(field);

        info!(figures = scene.figures.len() - 1, "demo scene built");
        scene
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
