//! The Hittable capability and the list aggregate.

use crate::material::Material;
use prism_math::{Aabb, Interval, Ray, Vec3};
use rand::{Rng, RngCore};

/// Record of a ray-surface intersection.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at the intersection (always opposes the ray)
    pub normal: Vec3,
    /// Material at the intersection, if the surface carries one.
    ///
    /// Geometry that exists only as a light-sampling target has no
    /// material; integrators treat such hits as absorbing.
    pub material: Option<&'a dyn Material>,
    /// UV surface coordinates
    pub u: f32,
    pub v: f32,
    /// Ray parameter where the intersection occurs
    pub t: f32,
    /// Whether the ray struck the outward-facing side
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Orient the stored normal against the ray and note which face was hit.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Anything a ray can strike.
pub trait Hittable: Send + Sync {
    /// The nearest intersection within `ray_t`, if any. Side-effect free.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;

    /// The axis-aligned bounding box of this surface.
    fn bounding_box(&self) -> Aabb;

    /// Density of `random_toward` directions, per unit solid angle.
    ///
    /// Surfaces that are never used as sampling targets keep the default.
    fn pdf_value(&self, _origin: Vec3, _direction: Vec3) -> f32 {
        0.0
    }

    /// A direction from `origin` toward a random point on this surface.
    fn random_toward(&self, _origin: Vec3, _rng: &mut dyn RngCore) -> Vec3 {
        Vec3::X
    }
}

/// An ordered collection of surfaces, hit-tested by linear scan.
///
/// There is no acceleration structure here: every query costs one test
/// per member, which is the point for the scene sizes this serves.
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
    bbox: Aabb,
}

impl HittableList {
    /// Create a new empty list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add a surface, extending the cached union bounding box.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    /// Number of surfaces in the list.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest_so_far = ray_t.max;
        let mut closest_hit = None;

        // Shrink the window as hits land, so later members must beat them
        for object in &self.objects {
            if let Some(rec) = object.hit(ray, Interval::new(ray_t.min, closest_so_far)) {
                closest_so_far = rec.t;
                closest_hit = Some(rec);
            }
        }

        closest_hit
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        if self.objects.is_empty() {
            return 0.0;
        }

        let weight = 1.0 / self.objects.len() as f32;
        self.objects
            .iter()
            .map(|object| weight * object.pdf_value(origin, direction))
            .sum()
    }

    fn random_toward(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        if self.objects.is_empty() {
            return Vec3::X;
        }

        let index = rng.gen_range(0..self.objects.len());
        self.objects[index].random_toward(origin, rng)
    }
}
