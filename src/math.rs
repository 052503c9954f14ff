//! Vector / matrix helpers on top of `glam`.
//!
//! * Points and displacements are both [`Vec3`]; nothing distinguishes them
//!   beyond how they are used.
//! * Every transform is an affine [`Mat4`] applied as `M · [x, y, z, 1]ᵗ` and
//!   truncated back to three components, so no projective divide ever occurs.
//! * "Apply A then B" is `B · A`; [`then`] spells that out at call-sites.

pub use glam::{Mat3, Mat4, Vec3, Vec4};

/// Tolerance used for parallel / degenerate tests throughout the crate.
pub const EPSILON: f32 = 1e-6;

/*──────────────────────────── constructors ───────────────────────────*/

#[inline]
pub fn translation(by: Vec3) -> Mat4 {
    Mat4::from_translation(by)
}

/// Non-uniform scale about the origin.
#[inline]
pub fn scale(by: Vec3) -> Mat4 {
    Mat4::from_scale(by)
}

/// Rotation about +X from a precomputed `(cos, sin)` pair.
pub fn rotation_x(cos: f32, sin: f32) -> Mat4 {
    Mat4::from_cols(
        Vec4::X,
        Vec4::new(0.0, cos, sin, 0.0),
        Vec4::new(0.0, -sin, cos, 0.0),
        Vec4::W,
    )
}

/// Rotation about +Y from a precomputed `(cos, sin)` pair.
pub fn rotation_y(cos: f32, sin: f32) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(cos, 0.0, -sin, 0.0),
        Vec4::Y,
        Vec4::new(sin, 0.0, cos, 0.0),
        Vec4::W,
    )
}

/// Rotation about +Z from a precomputed `(cos, sin)` pair.
pub fn rotation_z(cos: f32, sin: f32) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(cos, sin, 0.0, 0.0),
        Vec4::new(-sin, cos, 0.0, 0.0),
        Vec4::Z,
        Vec4::W,
    )
}

/*──────────────────────────── composition ────────────────────────────*/

/// `a · b`. Always returns a fresh value, so either operand may be the
/// variable the result is assigned back into.
#[inline]
pub fn mult(a: Mat4, b: Mat4) -> Mat4 {
    a * b
}

/// Compose "apply `first`, then `second`".
#[inline]
pub fn then(first: Mat4, second: Mat4) -> Mat4 {
    second * first
}

/// Algebraic inverse, or `None` when the matrix is singular.
///
/// The determinant is judged relative to the product of the linear part's
/// column lengths, so a uniformly tiny (but invertible) scale still inverts.
pub fn inverse(m: Mat4) -> Option<Mat4> {
    let det = m.determinant();
    let linear = Mat3::from_mat4(m);
    let volume = linear.x_axis.length() * linear.y_axis.length() * linear.z_axis.length();
    if !det.is_finite() || det == 0.0 || det.abs() <= EPSILON * volume {
        return None;
    }
    let inv = m.inverse();
    inv.is_finite().then_some(inv)
}

/// Apply `m` to a point (w = 1).
#[inline]
pub fn apply(m: &Mat4, p: Vec3) -> Vec3 {
    m.transform_point3(p)
}

/*──────────────────────────── angles ─────────────────────────────────*/

/// `(cos θ, sin θ)` for `θ = atan2(num, den)` without calling any trig.
///
/// Returns `None` when both components vanish, i.e. the angle is undefined.
pub fn cos_sin_of(num: f32, den: f32) -> Option<(f32, f32)> {
    let r = num.hypot(den);
    if r < EPSILON {
        return None;
    }
    Some((den / r, num / r))
}

/// Component-wise sign mapped to `-1`, `0` or `+1`.
#[inline]
pub fn sign(v: f32) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
