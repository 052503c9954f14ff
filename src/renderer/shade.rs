//! Empirical Phong-style reflectance, evaluated in eye space (eye at origin).

use crate::math::{EPSILON, Vec3, sign};
use crate::settings::FrameParams;

use super::Color;

/// Shading constants of one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lighting {
    pub ambient: f32,
    pub diffuse_max: f32,
    pub specular_power: f32,
}

impl From<&FrameParams> for Lighting {
    fn from(fp: &FrameParams) -> Self {
        Self {
            ambient: fp.ambient,
            diffuse_max: fp.diffuse_max,
            specular_power: fp.specular_power,
        }
    }
}

impl Lighting {
    /// Intensity at which the base colour is reproduced unchanged.
    #[inline]
    pub fn full(&self) -> f32 {
        self.ambient + self.diffuse_max
    }

    /// Scalar light intensity at `point` with surface `normal`, lit from
    /// `light`. Only ambient when light and eye see opposite faces.
    pub fn intensity(&self, point: Vec3, normal: Vec3, light: Vec3) -> f32 {
        let to_light = (light - point).normalize_or_zero();
        let to_eye = (-point).normalize_or_zero();
        let mut n = normal.normalize_or_zero();

        let n_dot_l = n.dot(to_light);
        if sign(n_dot_l) != sign(n.dot(to_eye)) {
            return self.ambient;
        }
        if n_dot_l < 0.0 {
            n = -n;
        }

        let cos_alpha = n.dot(to_light).max(0.0);
        let reflected = n * (2.0 * n.dot(to_light)) - to_light;
        let cos_beta = reflected.dot(to_eye).max(0.0);

        self.ambient
            + self.diffuse_max * cos_alpha
            + (1.0 - self.ambient - self.diffuse_max) * cos_beta.powf(self.specular_power)
    }

    /// Map an intensity onto `base`: darken toward black below
    /// [`Lighting::full`], wash toward white above it.
    pub fn tint(&self, intensity: f32, base: Color) -> Color {
        let full = self.full();
        if intensity == full {
            return base;
        }
        let c = if intensity < full {
            if full <= EPSILON {
                Color::ZERO
            } else {
                base * (intensity / full)
            }
        } else if 1.0 - full <= EPSILON {
            Color::ONE
        } else {
            base + (Color::ONE - base) * ((intensity - full) / (1.0 - full))
        };
        c.clamp(Color::ZERO, Color::ONE)
    }

    pub fn color(&self, point: Vec3, normal: Vec3, light: Vec3, base: Color) -> Color {
        self.tint(self.intensity(point, normal, light), base)
    }
}

/// Normal of an implicit surface at `hit`, from neighbouring hits probed at
/// small pixel offsets in right, bottom, left, top order.
///
/// The first cyclically adjacent pair that both hit and span a non-zero
/// area gives the normal; `None` when no such pair exists.
pub fn estimate_normal(hit: Vec3, probes: [Option<Vec3>; 4]) -> Option<Vec3> {
    (0..4).find_map(|i| {
        let a = probes[i]? - hit;
        let b = probes[(i + 1) % 4]? - hit;
        let n = a.cross(b);
        (n.length_squared() > EPSILON * EPSILON).then(|| n.normalize())
    })
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const L: Lighting = Lighting {
        ambient: 0.2,
        diffuse_max: 0.5,
        specular_power: 20.0,
    };

    #[test]
    fn opposite_sides_give_ambient_only() {
        // surface at z = 5 facing the eye; light behind it
        let p = Vec3::new(0.0, 0.0, 5.0);
        let n = -Vec3::Z;
        assert_eq!(L.intensity(p, n, Vec3::new(0.0, 0.0, 10.0)), L.ambient);
        // and with the normal flipped the verdict is the same
        assert_eq!(L.intensity(p, -n, Vec3::new(0.0, 0.0, 10.0)), L.ambient);
    }

    #[test]
    fn headlight_gives_full_brightness() {
        let p = Vec3::new(0.0, 0.0, 5.0);
        let i = L.intensity(p, -Vec3::Z, Vec3::ZERO);
        assert_abs_diff_eq!(i, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn normal_orientation_does_not_matter() {
        let p = Vec3::new(0.3, -0.2, 5.0);
        let light = Vec3::new(3.0, 4.0, 0.0);
        let n = Vec3::new(0.1, 0.2, -1.0);
        assert_abs_diff_eq!(L.intensity(p, n, light), L.intensity(p, -n, light), epsilon = 1e-6);
    }

    #[test]
    fn tint_is_continuous_at_full() {
        let base = Color::new(0.3, 0.6, 0.9);
        assert_eq!(L.tint(L.full(), base), base);
        let below = L.tint(L.full() - 1e-4, base);
        let above = L.tint(L.full() + 1e-4, base);
        assert!((below - base).length() < 1e-3);
        assert!((above - base).length() < 1e-3);
    }

    #[test]
    fn tint_extremes() {
        let base = Color::new(0.3, 0.6, 0.9);
        assert_eq!(L.tint(0.0, base), Color::ZERO);
        let white = L.tint(1.0, base);
        assert_abs_diff_eq!(white.x, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(white.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn normal_from_probes_skips_missing_pairs() {
        let hit = Vec3::ZERO;
        let probes = [None, Some(-Vec3::Y), Some(-Vec3::X), None];
        let n = estimate_normal(hit, probes).unwrap();
        // (-Y) × (-X) = -Z
        assert_abs_diff_eq!(n.z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn normal_needs_two_adjacent_hits() {
        let probes = [Some(Vec3::X), None, Some(-Vec3::X), None];
        assert!(estimate_normal(Vec3::ZERO, probes).is_none());
    }
}
