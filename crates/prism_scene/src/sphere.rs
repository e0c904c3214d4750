//! Sphere primitive.

use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;
use prism_math::{gen_f32, random_unit_vector, Aabb, Interval, Onb, Ray, Vec3};
use rand::RngCore;
use std::f32::consts::PI;
use std::sync::Arc;

/// A sphere, optionally carrying a material.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Option<Arc<dyn Material>>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere with a material.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        Self::build(center, radius, Some(material))
    }

    /// A sphere with no material: a light-sampling target, not a
    /// renderable surface.
    pub fn geometry_only(center: Vec3, radius: f32) -> Self {
        Self::build(center, radius, None)
    }

    fn build(center: Vec3, radius: f32, material: Option<Arc<dyn Material>>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        // theta: angle down from +Y, phi: angle around Y axis from +X
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let p = ray.at(root);
        let outward_normal = (p - self.center) / self.radius;
        let (u, v) = Self::get_sphere_uv(outward_normal);

        let mut rec = HitRecord {
            p,
            normal: Vec3::ZERO,
            material: self.material.as_deref(),
            u,
            v,
            t: root,
            front_face: false,
        };
        rec.set_face_normal(ray, outward_normal);

        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let dist_sq = (self.center - origin).length_squared();

        // From inside, every direction hits; the cone math below has no
        // solution there, so fall back to the uniform sphere density.
        if dist_sq <= self.radius * self.radius {
            return 1.0 / (4.0 * PI);
        }

        let ray = Ray::new(origin, direction, 0.0);
        if self.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none() {
            return 0.0;
        }

        // Uniform over the solid angle of the cone the sphere subtends
        let cos_theta_max = (1.0 - self.radius * self.radius / dist_sq).sqrt();
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);

        1.0 / solid_angle
    }

    fn random_toward(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let direction = self.center - origin;
        let dist_sq = direction.length_squared();

        if dist_sq <= self.radius * self.radius {
            return random_unit_vector(rng);
        }

        let uvw = Onb::new(direction);
        uvw.transform(random_to_sphere(self.radius, dist_sq, rng))
    }
}

/// Uniform direction within the cone toward a sphere of the given radius
/// at the given squared distance along +Z.
fn random_to_sphere(radius: f32, distance_squared: f32, rng: &mut dyn RngCore) -> Vec3 {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);
    let z = 1.0 + r2 * ((1.0 - radius * radius / distance_squared).sqrt() - 1.0);

    let phi = 2.0 * PI * r1;
    let x = phi.cos() * (1.0 - z * z).sqrt();
    let y = phi.sin() * (1.0 - z * z).sqrt();

    Vec3::new(x, y, z)
}
