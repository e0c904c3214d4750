//! Transform wrappers that place surfaces without mutating them.
//!
//! Both wrappers work by moving the ray into the child's local frame,
//! delegating, and moving the hit back out. Composition order is the
//! caller's contract: rotate about the local origin first, then
//! translate into world position.

use crate::hittable::{HitRecord, Hittable};
use prism_math::{Aabb, Interval, Ray, Vec3};

/// A surface moved by a fixed offset.
pub struct Translate {
    object: Box<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Box<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // Move the ray into local space instead of moving the object
        let local = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());

        let mut rec = self.object.hit(&local, ray_t)?;
        rec.p += self.offset;
        // A pure translation leaves normals alone

        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// A surface rotated about the world Y axis by a fixed angle.
pub struct RotateY {
    object: Box<dyn Hittable>,
    sin_theta: f32,
    cos_theta: f32,
    bbox: Aabb,
}

impl RotateY {
    pub fn new(object: Box<dyn Hittable>, angle_degrees: f32) -> Self {
        let radians = angle_degrees.to_radians();
        let sin_theta = radians.sin();
        let cos_theta = radians.cos();

        // All eight corners must be rotated; min/max alone under-bound
        // once the rotation mixes axes.
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for corner in object.bounding_box().corners() {
            let rotated = rotate_y(corner, sin_theta, cos_theta);
            min = min.min(rotated);
            max = max.max(rotated);
        }
        let bbox = Aabb::from_points(min, max);

        Self {
            object,
            sin_theta,
            cos_theta,
            bbox,
        }
    }
}

impl Hittable for RotateY {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // Inverse rotation carries the ray into the child's frame
        let origin = rotate_y_inverse(ray.origin(), self.sin_theta, self.cos_theta);
        let direction = rotate_y_inverse(ray.direction(), self.sin_theta, self.cos_theta);
        let local = Ray::new(origin, direction, ray.time());

        let mut rec = self.object.hit(&local, ray_t)?;

        // Forward rotation carries the hit back to world space
        rec.p = rotate_y(rec.p, self.sin_theta, self.cos_theta);
        rec.normal = rotate_y(rec.normal, self.sin_theta, self.cos_theta);

        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Rotate a point about the Y axis using a precomputed sine/cosine pair.
#[inline]
fn rotate_y(p: Vec3, sin_theta: f32, cos_theta: f32) -> Vec3 {
    Vec3::new(
        cos_theta * p.x + sin_theta * p.z,
        p.y,
        -sin_theta * p.x + cos_theta * p.z,
    )
}

/// The inverse of [`rotate_y`].
#[inline]
fn rotate_y_inverse(p: Vec3, sin_theta: f32, cos_theta: f32) -> Vec3 {
    Vec3::new(
        cos_theta * p.x - sin_theta * p.z,
        p.y,
        sin_theta * p.x + cos_theta * p.z,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use crate::quad::make_box;
    use crate::sphere::Sphere;
    use std::sync::Arc;

    const WINDOW: Interval = Interval {
        min: 0.001,
        max: f32::INFINITY,
    };

    fn gray() -> Arc<Lambertian> {
        Arc::new(Lambertian::new(Vec3::new(0.5, 0.5, 0.5)))
    }

    #[test]
    fn test_translate_round_trip() {
        let offset = Vec3::new(3.0, -1.0, 2.0);
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, gray());
        let moved = Translate::new(
            Box::new(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, gray())),
            offset,
        );

        let ray = Ray::new(Vec3::new(3.0, -1.0, 2.0), Vec3::NEG_Z, 0.0);
        let rec = moved.hit(&ray, WINDOW).expect("translated sphere must hit");

        // Same hit as the child sees for the inverse-shifted ray, shifted back
        let local_ray = Ray::new(ray.origin() - offset, ray.direction(), 0.0);
        let local_rec = sphere.hit(&local_ray, WINDOW).expect("child must hit");

        assert!((rec.p - (local_rec.p + offset)).length() < 1e-4);
        assert!((rec.t - local_rec.t).abs() < 1e-5);
        assert!((rec.normal - local_rec.normal).length() < 1e-5);
    }

    #[test]
    fn test_translate_bounding_box() {
        let moved = Translate::new(
            Box::new(Sphere::new(Vec3::ZERO, 1.0, gray())),
            Vec3::new(10.0, 0.0, 0.0),
        );

        let bbox = moved.bounding_box();
        assert!((bbox.x.min - 9.0).abs() < 1e-4);
        assert!((bbox.x.max - 11.0).abs() < 1e-4);
        assert!((bbox.y.min - -1.0).abs() < 1e-4);
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        let sphere = Sphere::new(Vec3::new(2.0, 0.0, -5.0), 1.0, gray());
        let rotated = RotateY::new(
            Box::new(Sphere::new(Vec3::new(2.0, 0.0, -5.0), 1.0, gray())),
            0.0,
        );

        for ray in [
            Ray::new(Vec3::new(2.0, 0.0, 0.0), Vec3::NEG_Z, 0.0),
            Ray::new(Vec3::ZERO, Vec3::new(0.4, 0.0, -1.0), 0.0),
            Ray::new(Vec3::ZERO, Vec3::Z, 0.0),
        ] {
            match (sphere.hit(&ray, WINDOW), rotated.hit(&ray, WINDOW)) {
                (Some(a), Some(b)) => {
                    assert!((a.p - b.p).length() < 1e-4);
                    assert!((a.normal - b.normal).length() < 1e-4);
                    assert!((a.t - b.t).abs() < 1e-5);
                }
                (None, None) => {}
                _ => panic!("zero rotation changed hit/miss behavior"),
            }
        }
    }

    #[test]
    fn test_rotate_quarter_turn_moves_the_hit() {
        // Sphere on +X; a quarter turn about Y carries it to -Z
        let rotated = RotateY::new(
            Box::new(Sphere::new(Vec3::new(5.0, 0.0, 0.0), 1.0, gray())),
            90.0,
        );

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z, 0.0);
        let rec = rotated.hit(&ray, WINDOW).expect("rotated sphere must sit on -Z");
        assert!((rec.t - 4.0).abs() < 1e-3);
        assert!((rec.normal - Vec3::Z).length() < 1e-3);

        // And nothing remains on +X
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);
        assert!(rotated.hit(&ray, WINDOW).is_none());
    }

    #[test]
    fn test_rotate_bbox_contains_all_rotated_corners() {
        for angle in [15.0f32, 45.0, 90.0, 180.0] {
            let child_bbox = make_box(
                Vec3::new(0.0, 165.0, 0.0),
                Vec3::new(165.0, 330.0, 165.0),
                gray(),
            )
            .bounding_box();

            let rotated = RotateY::new(
                Box::new(make_box(
                    Vec3::new(0.0, 165.0, 0.0),
                    Vec3::new(165.0, 330.0, 165.0),
                    gray(),
                )),
                angle,
            );
            let bbox = rotated.bounding_box();

            let radians = angle.to_radians();
            let (sin_theta, cos_theta) = (radians.sin(), radians.cos());
            for corner in child_bbox.corners() {
                let p = rotate_y(corner, sin_theta, cos_theta);
                assert!(
                    bbox.x.contains(p.x) && bbox.y.contains(p.y) && bbox.z.contains(p.z),
                    "corner {p:?} escapes the {angle} degree box"
                );
            }
        }
    }

    #[test]
    fn test_rotate_then_translate_cornell_box() {
        // The tall Cornell box: rotate 15 degrees, then translate
        let offset = Vec3::new(265.0, 50.0, 295.0);
        let the_box = make_box(
            Vec3::new(0.0, 165.0, 0.0),
            Vec3::new(165.0, 330.0, 165.0),
            gray(),
        );
        let child_bbox = the_box.bounding_box();

        let placed = Translate::new(Box::new(RotateY::new(Box::new(the_box), 15.0)), offset);
        let bbox = placed.bounding_box();

        // Manual recompute: rotate the eight corners, then shift
        let radians = 15.0f32.to_radians();
        let (sin_theta, cos_theta) = (radians.sin(), radians.cos());
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for corner in child_bbox.corners() {
            let p = rotate_y(corner, sin_theta, cos_theta) + offset;
            min = min.min(p);
            max = max.max(p);
        }

        assert!((bbox.min_point() - min).length() < 1e-3);
        assert!((bbox.max_point() - max).length() < 1e-3);
    }

    #[test]
    fn test_composition_order_matters() {
        // Rotate-then-translate and translate-then-rotate place the
        // object differently; the driver must apply rotation first.
        let sphere = || Box::new(Sphere::new(Vec3::new(5.0, 0.0, 0.0), 1.0, gray()));
        let offset = Vec3::new(0.0, 0.0, -5.0);

        let rotate_first =
            Translate::new(Box::new(RotateY::new(sphere(), 90.0)), offset);
        let translate_first =
            RotateY::new(Box::new(Translate::new(sphere(), offset)), 90.0);

        let a = rotate_first.bounding_box();
        let b = translate_first.bounding_box();
        assert!(
            (a.min_point() - b.min_point()).length() > 1.0,
            "orders should disagree"
        );

        // Rotate-first lands the sphere at (0, 0, -10)
        assert!((a.min_point() - Vec3::new(-1.0, -1.0, -11.0)).length() < 1e-3);
    }
}
