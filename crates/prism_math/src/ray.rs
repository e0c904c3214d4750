use crate::Vec3;

/// A ray with an origin, a direction, and the time it was cast.
///
/// Scattered rays inherit the time of the ray that spawned them, so a
/// whole light path shares one moment.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    time: f32,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3, time: f32) -> Self {
        Self {
            origin,
            direction,
            time,
        }
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// The point along the ray at parameter t: origin + t * direction.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
