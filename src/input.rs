//! Keyboard bindings.
//!
//! ```text
//! arrows / PgUp PgDn      translate focused figure (x, y / z)
//! X Y Z  (+Shift)         rotate about the pivot, positive (negative)
//! = / -                   scale up / down
//! Tab                     cycle focus
//! F1..F7                  toggle wireframe, backface, fill, lighting, halo,
//!                         clip, bounds
//! B                       flip backface sign
//! [ ]                     narrower / wider field of view
//! H (+Shift)              hither closer (farther)
//! J (+Shift)              yon closer (farther)
//! A D S  (+Shift)         raise (lower) ambient, diffuse, specular power
//! numpad 4 6 / 2 8 / 7 9  move the light along x / y / z
//! ```

use minifb::Key;

use crate::{
    math::Vec3,
    scene::{Action, Axis},
    settings::Toggles,
};

/// World units per translation keypress.
pub const MOVE_STEP: f32 = 0.25;
/// Radians per rotation keypress.
pub const TURN_STEP: f32 = 5.0 * std::f32::consts::PI / 180.0;
/// Scale factor per keypress.
pub const SCALE_STEP: f32 = 1.1;
/// Field-of-view change (half-angle, radians) per keypress.
pub const FOV_STEP: f32 = 2.0 * std::f32::consts::PI / 180.0;
/// Hither/yon multiplier per keypress.
pub const DEPTH_STEP: f32 = 1.25;
/// Ambient/diffuse change per keypress.
pub const SHADE_STEP: f32 = 0.05;
/// Specular power multiplier per keypress.
pub const SPECULAR_STEP: f32 = 1.5;
/// World units per light move.
pub const LIGHT_STEP: f32 = 1.0;

/// Action bound to `key`; `shift` selects the reverse direction where a key
/// has one.
pub fn action_for(key: Key, shift: bool) -> Option<Action> {
    let dir = if shift { -1.0 } else { 1.0 };
    let factor = |step: f32| if shift { 1.0 / step } else { step };

    let action = match key {
        Key::Left => Action::Translate(Vec3::new(-MOVE_STEP, 0.0, 0.0)),
        Key::Right => Action::Translate(Vec3::new(MOVE_STEP, 0.0, 0.0)),
        Key::Down => Action::Translate(Vec3::new(0.0, -MOVE_STEP, 0.0)),
        Key::Up => Action::Translate(Vec3::new(0.0, MOVE_STEP, 0.0)),
        Key::PageUp => Action::Translate(Vec3::new(0.0, 0.0, MOVE_STEP)),
        Key::PageDown => Action::Translate(Vec3::new(0.0, 0.0, -MOVE_STEP)),

        Key::X => Action::Rotate(Axis::X, dir * TURN_STEP),
        Key::Y => Action::Rotate(Axis::Y, dir * TURN_STEP),
        Key::Z => Action::Rotate(Axis::Z, dir * TURN_STEP),
        Key::Equal | Key::NumPadPlus => Action::Scale(SCALE_STEP),
        Key::Minus | Key::NumPadMinus => Action::Scale(1.0 / SCALE_STEP),

        Key::Tab => Action::CycleFocus,
        Key::F1 => Action::Toggle(Toggles::WIREFRAME),
        Key::F2 => Action::Toggle(Toggles::BACKFACE),
        Key::F3 => Action::Toggle(Toggles::FILL),
        Key::F4 => Action::Toggle(Toggles::LIGHTING),
        Key::F5 => Action::Toggle(Toggles::HALO),
        Key::F6 => Action::Toggle(Toggles::CLIP),
        Key::F7 => Action::Toggle(Toggles::BOUNDS),
        Key::B => Action::FlipBackface,

        Key::LeftBracket => Action::HalfAngle(-FOV_STEP),
        Key::RightBracket => Action::HalfAngle(FOV_STEP),
        Key::H => Action::Hither(factor(1.0 / DEPTH_STEP)),
        Key::J => Action::Yon(factor(1.0 / DEPTH_STEP)),
        Key::A => Action::Ambient(dir * SHADE_STEP),
        Key::D => Action::Diffuse(dir * SHADE_STEP),
        Key::S => Action::Specular(factor(SPECULAR_STEP)),

        Key::NumPad4 => Action::MoveLight(Vec3::new(-LIGHT_STEP, 0.0, 0.0)),
        Key::NumPad6 => Action::MoveLight(Vec3::new(LIGHT_STEP, 0.0, 0.0)),
        Key::NumPad2 => Action::MoveLight(Vec3::new(0.0, -LIGHT_STEP, 0.0)),
        Key::NumPad8 => Action::MoveLight(Vec3::new(0.0, LIGHT_STEP, 0.0)),
        Key::NumPad7 => Action::MoveLight(Vec3::new(0.0, 0.0, -LIGHT_STEP)),
        Key::NumPad9 => Action::MoveLight(Vec3::new(0.0, 0.0, LIGHT_STEP)),

        _ => return None,
    };
    Some(action)
}
