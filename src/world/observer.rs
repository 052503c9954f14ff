use tracing::warn;

use crate::math::{
    EPSILON, Mat4, Vec3, apply, cos_sin_of, rotation_x, rotation_y, rotation_z, then, translation,
};

use super::geometry::Aabb;

/// Camera rig: where the eye is, what it looks at and which way is up.
///
/// `up` is a *point*, not a direction: "up" is roughly `position → up`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observer {
    pub position: Vec3,
    pub interest: Vec3,
    pub up: Vec3,
}

impl Observer {
    pub fn new(position: Vec3, interest: Vec3, up: Vec3) -> Self {
        Self {
            position,
            interest,
            up,
        }
    }

    pub fn transform(&mut self, m: &Mat4) {
        self.position = apply(m, self.position);
        self.interest = apply(m, self.interest);
        self.up = apply(m, self.up);
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            self.position.min(self.interest).min(self.up),
            self.position.max(self.interest).max(self.up),
        )
    }

    /// World → eye matrix: `position` to the origin, `interest` onto +z and
    /// `up` into the y-z half-plane with y > 0.
    ///
    /// Each rotation is measured against the running, partially transformed
    /// copies of the defining points. An undefined angle (interest on top of
    /// the eye, or up colinear with the view axis) is taken as zero.
    pub fn eye_transform(&self) -> Mat4 {
        let mut interest = self.interest;
        let mut up = self.up;
        let mut eye = Mat4::IDENTITY;

        let mut step = |m: Mat4, interest: &mut Vec3, up: &mut Vec3| {
            *interest = apply(&m, *interest);
            *up = apply(&m, *up);
            eye = then(eye, m);
        };

        // 1. observer to origin
        step(translation(-self.position), &mut interest, &mut up);

        // 2. about y by -atan2(interest.x, interest.z)
        if interest.length() < EPSILON {
            warn!(?self, "interest coincides with observer; view direction undefined");
        }
        let (c, s) = cos_sin_of(interest.x, interest.z).unwrap_or((1.0, 0.0));
        step(rotation_y(c, -s), &mut interest, &mut up);

        // 3. about x by +atan2(interest.y, interest.z)
        let (c, s) = cos_sin_of(interest.y, interest.z).unwrap_or((1.0, 0.0));
        step(rotation_x(c, s), &mut interest, &mut up);

        // 4. about z by atan2(up.x, up.y)
        let (c, s) = cos_sin_of(up.x, up.y).unwrap_or_else(|| {
            warn!(?self, "up point colinear with view axis; roll undefined");
            (1.0, 0.0)
        });
        step(rotation_z(c, s), &mut interest, &mut up);

        eye
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
