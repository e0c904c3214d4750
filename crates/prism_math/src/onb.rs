use crate::Vec3;

/// An orthonormal basis with `w` aligned to a given direction.
///
/// Used to re-aim canonical samples (cosine lobes, cones) so their +Z
/// axis points along a surface normal or a toward-target direction.
#[derive(Debug, Clone, Copy)]
pub struct Onb {
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Onb {
    /// Build a basis from a direction. `n` does not need to be unit length.
    pub fn new(n: Vec3) -> Self {
        let w = n.normalize();
        // Pick a helper axis that is not nearly parallel to w
        let a = if w.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let v = w.cross(a).normalize();
        let u = w.cross(v);
        Self { u, v, w }
    }

    pub fn u(&self) -> Vec3 {
        self.u
    }

    pub fn v(&self) -> Vec3 {
        self.v
    }

    pub fn w(&self) -> Vec3 {
        self.w
    }

    /// Map basis-local coordinates into world space.
    pub fn transform(&self, p: Vec3) -> Vec3 {
        p.x * self.u + p.y * self.v + p.z * self.w
    }
}
