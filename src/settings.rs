//! Process-wide render settings and the per-frame snapshot taken from them.
//!
//! The input layer owns one [`Settings`] and mutates it; every frame it is
//! frozen into a [`FrameParams`] that the renderer reads and never writes.

use bitflags::bitflags;
use glam::Vec2;

use crate::math::Vec3;

bitflags! {
    /// Boolean render switches.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Toggles: u16 {
        const WIREFRAME = 0x0001;
        const BACKFACE  = 0x0002;
        const FILL      = 0x0004;
        const LIGHTING  = 0x0008;
        const HALO      = 0x0010;
        const CLIP      = 0x0020;
        const BOUNDS    = 0x0040;
    }
}

impl Default for Toggles {
    fn default() -> Self {
        Toggles::BACKFACE | Toggles::FILL | Toggles::LIGHTING | Toggles::HALO | Toggles::CLIP
    }
}

pub const MIN_HALF_ANGLE: f32 = 1.0 * std::f32::consts::PI / 180.0;
pub const MAX_HALF_ANGLE: f32 = 89.0 * std::f32::consts::PI / 180.0;
pub const MIN_HITHER: f32 = 0.01;
pub const MIN_SPECULAR_POWER: f32 = 1.0;

/// Mutable, long-lived settings.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    half_angle: f32,
    hither: f32,
    yon: f32,
    ambient: f32,
    diffuse_max: f32,
    specular_power: f32,
    backface_sign: i32,
    pub toggles: Toggles,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            half_angle: 30_f32.to_radians(),
            hither: 1.0,
            yon: 100.0,
            ambient: 0.2,
            diffuse_max: 0.5,
            specular_power: 20.0,
            backface_sign: 1,
            toggles: Toggles::default(),
        }
    }
}

impl Settings {
    /*──────────────────────── getters ────────────────────────────────*/

    pub fn half_angle(&self) -> f32 {
        self.half_angle
    }

    pub fn hither(&self) -> f32 {
        self.hither
    }

    pub fn yon(&self) -> f32 {
        self.yon
    }

    pub fn ambient(&self) -> f32 {
        self.ambient
    }

    pub fn diffuse_max(&self) -> f32 {
        self.diffuse_max
    }

    pub fn specular_power(&self) -> f32 {
        self.specular_power
    }

    pub fn backface_sign(&self) -> i32 {
        self.backface_sign
    }

    /*──────────────────────── clamped setters ────────────────────────*/

    pub fn set_half_angle(&mut self, radians: f32) {
        self.half_angle = radians.clamp(MIN_HALF_ANGLE, MAX_HALF_ANGLE);
    }

    /// Hither never passes yon.
    pub fn set_hither(&mut self, hither: f32) {
        self.hither = hither.max(MIN_HITHER).min(self.yon);
    }

    /// Yon never drops below hither.
    pub fn set_yon(&mut self, yon: f32) {
        self.yon = yon.max(self.hither);
    }

    /// Keeps `ambient + diffuse_max ≤ 1` by shrinking the diffuse share.
    pub fn set_ambient(&mut self, ambient: f32) {
        self.ambient = ambient.clamp(0.0, 1.0);
        self.diffuse_max = self.diffuse_max.min(1.0 - self.ambient);
    }

    pub fn set_diffuse_max(&mut self, diffuse_max: f32) {
        self.diffuse_max = diffuse_max.clamp(0.0, 1.0 - self.ambient);
    }

    pub fn set_specular_power(&mut self, power: f32) {
        self.specular_power = power.max(MIN_SPECULAR_POWER);
    }

    pub fn flip_backface_sign(&mut self) {
        self.backface_sign = -self.backface_sign;
    }

    pub fn toggle(&mut self, which: Toggles) {
        self.toggles.toggle(which);
    }

    /// Freeze the current values for one `width × height` frame.
    pub fn frame(&self, width: usize, height: usize) -> FrameParams {
        FrameParams::new(self, width, height)
    }
}

/// Immutable per-frame view of [`Settings`] plus raster-derived constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameParams {
    pub width: usize,
    pub height: usize,
    pub half_angle: f32,
    pub hither: f32,
    pub yon: f32,
    pub ambient: f32,
    pub diffuse_max: f32,
    pub specular_power: f32,
    pub backface_sign: i32,
    pub toggles: Toggles,

    /// pixels per unit of `x / z` (`min(W, H) / 2 / tan(half_angle)`)
    pub focal: f32,
    /// projection centre in pixels
    pub center: Vec2,
}

impl FrameParams {
    pub fn new(s: &Settings, width: usize, height: usize) -> Self {
        let half_min = width.min(height) as f32 * 0.5;
        Self {
            width,
            height,
            half_angle: s.half_angle,
            hither: s.hither,
            yon: s.yon,
            ambient: s.ambient,
            diffuse_max: s.diffuse_max,
            specular_power: s.specular_power,
            backface_sign: s.backface_sign,
            toggles: s.toggles,
            focal: half_min / s.half_angle.tan(),
            center: Vec2::new(width as f32 * 0.5, height as f32 * 0.5),
        }
    }

    #[inline]
    pub fn has(&self, t: Toggles) -> bool {
        self.toggles.contains(t)
    }

    /// Pinhole projection of an eye-space point to (sub-)pixel coordinates,
    /// y growing upward from the bottom row.
    ///
    /// The optical axis lands on `(W/2, H/2)` on both axes rather than being
    /// offset by `min(W, H)/2`; the two agree only for square rasters.
    #[inline]
    pub fn project(&self, p: Vec3) -> Vec2 {
        Vec2::new(p.x / p.z, p.y / p.z) * self.focal + self.center
    }

    /// Eye-space direction (z = 1) of the ray through pixel `(x, y)`.
    #[inline]
    pub fn ray_direction(&self, x: f32, y: f32) -> Vec3 {
        let v = (Vec2::new(x, y) - self.center) / self.focal;
        Vec3::new(v.x, v.y, 1.0)
    }

    /// Half-extents of the visible rectangle on the z = 1 plane.
    pub fn view_extent(&self) -> Vec2 {
        self.center / self.focal
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn hither_and_yon_never_cross() {
        let mut s = Settings::default();
        s.set_hither(500.0);
        assert_eq!(s.hither(), s.yon());
        s.set_yon(0.5);
        assert_eq!(s.yon(), s.hither());
        s.set_hither(-3.0);
        assert_eq!(s.hither(), MIN_HITHER);
    }

    #[test]
    fn shading_shares_stay_below_one() {
        let mut s = Settings::default();
        s.set_diffuse_max(0.95);
        assert_abs_diff_eq!(s.ambient() + s.diffuse_max(), 1.0, epsilon = 1e-6);
        s.set_ambient(0.5);
        assert!(s.ambient() + s.diffuse_max() <= 1.0);
        s.set_specular_power(0.0);
        assert_eq!(s.specular_power(), MIN_SPECULAR_POWER);
    }

    #[test]
    fn half_angle_is_clamped() {
        let mut s = Settings::default();
        s.set_half_angle(3.0);
        assert_eq!(s.half_angle(), MAX_HALF_ANGLE);
    }

    #[test]
    fn projection_round_trips_through_ray() {
        let fp = Settings::default().frame(320, 200);
        let p = Vec3::new(0.7, -0.4, 3.0);
        let px = fp.project(p);
        let dir = fp.ray_direction(px.x, px.y);
        assert_abs_diff_eq!(dir.x * p.z, p.x, epsilon = 1e-4);
        assert_abs_diff_eq!(dir.y * p.z, p.y, epsilon = 1e-4);
    }

    #[test]
    fn view_extent_uses_smaller_dimension() {
        let mut s = Settings::default();
        s.set_half_angle(std::f32::consts::FRAC_PI_4);
        let fp = s.frame(200, 100);
        let e = fp.view_extent();
        assert_abs_diff_eq!(e.y, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(e.x, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn axis_lands_mid_raster_when_not_square() {
        let mut s = Settings::default();
        s.set_half_angle(std::f32::consts::FRAC_PI_4);
        let fp = s.frame(200, 100);
        let c = fp.project(Vec3::new(0.0, 0.0, 3.0));
        assert_abs_diff_eq!(c.x, 100.0, epsilon = 1e-4);
        assert_abs_diff_eq!(c.y, 50.0, epsilon = 1e-4);
        // focal length follows the smaller side: 50 px per unit of x/z
        let p = fp.project(Vec3::new(1.0, -1.0, 2.0));
        assert_abs_diff_eq!(p.x, 125.0, epsilon = 1e-4);
        assert_abs_diff_eq!(p.y, 25.0, epsilon = 1e-4);
    }

    #[test]
    fn toggles_flip() {
        let mut s = Settings::default();
        assert!(!s.toggles.contains(Toggles::WIREFRAME));
        s.toggle(Toggles::WIREFRAME);
        assert!(s.frame(10, 10).has(Toggles::WIREFRAME));
    }
}
