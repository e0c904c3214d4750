//! Planar quadrilateral primitive and the box composite built from it.

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::material::Material;
use prism_math::{gen_f32, Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// A parallelogram defined by a corner `q` and two edge vectors `u`, `v`.
pub struct Quad {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    // Cached plane data: unit normal, plane offset, and the basis
    // projection vector w = n / (n . n)
    normal: Vec3,
    d: f32,
    w: Vec3,
    area: f32,
    material: Option<Arc<dyn Material>>,
    bbox: Aabb,
}

impl Quad {
    /// Create a new quad with a material.
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        Self::build(q, u, v, Some(material))
    }

    /// A quad with no material: a light-sampling target, not a
    /// renderable surface.
    pub fn geometry_only(q: Vec3, u: Vec3, v: Vec3) -> Self {
        Self::build(q, u, v, None)
    }

    fn build(q: Vec3, u: Vec3, v: Vec3, material: Option<Arc<dyn Material>>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize_or_zero();
        let d = normal.dot(q);
        let w = n / n.dot(n).max(1e-12);
        let area = n.length();

        // Span both diagonals so any edge orientation is covered
        let bbox = Aabb::surrounding(
            &Aabb::from_points(q, q + u + v),
            &Aabb::from_points(q + u, q + v),
        );

        Self {
            q,
            u,
            v,
            normal,
            d,
            w,
            area,
            material,
            bbox,
        }
    }
}

impl Hittable for Quad {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let denom = self.normal.dot(ray.direction());

        // Parallel to the plane
        if denom.abs() < 1e-8 {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        // Project the planar hit point onto the edge basis
        let p = ray.at(t);
        let planar = p - self.q;
        let alpha = self.w.dot(planar.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar));

        let unit = Interval::new(0.0, 1.0);
        if !unit.contains(alpha) || !unit.contains(beta) {
            return None;
        }

        let mut rec = HitRecord {
            p,
            normal: Vec3::ZERO,
            material: self.material.as_deref(),
            u: alpha,
            v: beta,
            t,
            front_face: false,
        };
        rec.set_face_normal(ray, self.normal);

        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let ray = Ray::new(origin, direction, 0.0);
        let Some(rec) = self.hit(&ray, Interval::new(0.001, f32::INFINITY)) else {
            return 0.0;
        };

        // Convert the area density 1/A to a solid-angle density
        let distance_squared = rec.t * rec.t * direction.length_squared();
        let cosine = (direction.dot(rec.normal) / direction.length()).abs();
        if cosine < 1e-8 || self.area < 1e-8 {
            return 0.0;
        }

        distance_squared / (cosine * self.area)
    }

    fn random_toward(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let p = self.q + gen_f32(rng) * self.u + gen_f32(rng) * self.v;
        p - origin
    }
}

/// Build an axis-aligned box from two opposite corners as six quads.
///
/// The corners may be given in either order; each face normal points
/// away from the box interior. A zero extent on some axis flattens the
/// box rather than failing.
pub fn make_box(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> HittableList {
    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let mut sides = HittableList::new();
    sides.add(Box::new(Quad::new(
        Vec3::new(min.x, min.y, max.z),
        dx,
        dy,
        material.clone(),
    ))); // front
    sides.add(Box::new(Quad::new(
        Vec3::new(max.x, min.y, max.z),
        -dz,
        dy,
        material.clone(),
    ))); // right
    sides.add(Box::new(Quad::new(
        Vec3::new(max.x, min.y, min.z),
        -dx,
        dy,
        material.clone(),
    ))); // back
    sides.add(Box::new(Quad::new(
        Vec3::new(min.x, min.y, min.z),
        dz,
        dy,
        material.clone(),
    ))); // left
    sides.add(Box::new(Quad::new(
        Vec3::new(min.x, max.y, max.z),
        dx,
        -dz,
        material.clone(),
    ))); // top
    sides.add(Box::new(Quad::new(
        Vec3::new(min.x, min.y, min.z),
        dx,
        dz,
        material,
    ))); // bottom

    sides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<Lambertian> {
        Arc::new(Lambertian::new(Vec3::new(0.5, 0.5, 0.5)))
    }

    fn unit_quad() -> Quad {
        // 2x2 quad in the z=-2 plane facing +Z
        Quad::new(
            Vec3::new(-1.0, -1.0, -2.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            gray(),
        )
    }

    #[test]
    fn test_quad_hit_inside() {
        let quad = unit_quad();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z, 0.0);

        let rec = quad
            .hit(&ray, Interval::new(0.001, f32::INFINITY))
            .expect("center ray must hit");

        assert!((rec.t - 2.0).abs() < 1e-4);
        assert!((rec.u - 0.5).abs() < 1e-4);
        assert!((rec.v - 0.5).abs() < 1e-4);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < 1e-4);
    }

    #[test]
    fn test_quad_miss_outside_edges() {
        let quad = unit_quad();

        // Past the +X edge
        let ray = Ray::new(Vec3::new(1.5, 0.0, 0.0), Vec3::NEG_Z, 0.0);
        assert!(quad.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());

        // Past the -Y edge
        let ray = Ray::new(Vec3::new(0.0, -1.5, 0.0), Vec3::NEG_Z, 0.0);
        assert!(quad.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_quad_parallel_ray_misses() {
        let quad = unit_quad();
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);

        assert!(quad.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_quad_back_face() {
        let quad = unit_quad();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -4.0), Vec3::Z, 0.0);

        let rec = quad
            .hit(&ray, Interval::new(0.001, f32::INFINITY))
            .expect("must hit from behind");

        assert!(!rec.front_face);
        assert!((rec.normal - Vec3::NEG_Z).length() < 1e-4);
    }

    #[test]
    fn test_quad_pdf_value() {
        let quad = unit_quad();

        // Head on: distance 2, area 4, cosine 1 -> pdf = 4 / 4 = 1
        let pdf = quad.pdf_value(Vec3::ZERO, Vec3::NEG_Z);
        assert!((pdf - 1.0).abs() < 1e-4, "got {pdf}");

        // A direction that misses has zero density
        assert_eq!(quad.pdf_value(Vec3::ZERO, Vec3::Z), 0.0);
    }

    #[test]
    fn test_quad_random_toward_lands_on_surface() {
        let quad = unit_quad();
        let mut rng = StdRng::seed_from_u64(23);

        for _ in 0..100 {
            let direction = quad.random_toward(Vec3::ZERO, &mut rng);
            let ray = Ray::new(Vec3::ZERO, direction, 0.0);
            assert!(
                quad.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_some(),
                "sampled point fell off the quad"
            );
        }
    }

    #[test]
    fn test_box_has_six_quads_any_corner_order() {
        let p0 = Vec3::new(0.0, 165.0, 0.0);
        let p1 = Vec3::new(165.0, 330.0, 165.0);
        let expected = Aabb::from_points(p0, p1);

        for (a, b) in [(p0, p1), (p1, p0)] {
            let the_box = make_box(a, b, gray());

            assert_eq!(the_box.len(), 6);

            let bbox = the_box.bounding_box();
            assert!((bbox.min_point() - expected.min_point()).length() < 1e-3);
            assert!((bbox.max_point() - expected.max_point()).length() < 1e-3);
        }
    }

    #[test]
    fn test_box_mixed_corner_components() {
        // Neither input is the min or the max corner outright
        let the_box = make_box(
            Vec3::new(2.0, 0.0, 5.0),
            Vec3::new(0.0, 3.0, 1.0),
            gray(),
        );

        let bbox = the_box.bounding_box();
        assert!((bbox.min_point() - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-3);
        assert!((bbox.max_point() - Vec3::new(2.0, 3.0, 5.0)).length() < 1e-3);
    }

    #[test]
    fn test_box_normals_point_outward() {
        let the_box = make_box(Vec3::ZERO, Vec3::splat(2.0), gray());

        // From outside each face, the first hit must be front-facing
        let probes = [
            (Vec3::new(1.0, 1.0, 5.0), Vec3::NEG_Z, Vec3::Z),
            (Vec3::new(1.0, 1.0, -5.0), Vec3::Z, Vec3::NEG_Z),
            (Vec3::new(5.0, 1.0, 1.0), Vec3::NEG_X, Vec3::X),
            (Vec3::new(-5.0, 1.0, 1.0), Vec3::X, Vec3::NEG_X),
            (Vec3::new(1.0, 5.0, 1.0), Vec3::NEG_Y, Vec3::Y),
            (Vec3::new(1.0, -5.0, 1.0), Vec3::Y, Vec3::NEG_Y),
        ];

        for (origin, direction, expected_normal) in probes {
            let ray = Ray::new(origin, direction, 0.0);
            let rec = the_box
                .hit(&ray, Interval::new(0.001, f32::INFINITY))
                .expect("probe must hit its face");
            assert!(rec.front_face, "face hit from outside must be front");
            assert!(
                (rec.normal - expected_normal).length() < 1e-4,
                "normal {:?} is not outward {:?}",
                rec.normal,
                expected_normal
            );
        }
    }

    #[test]
    fn test_box_flat_extent_is_valid() {
        // Zero depth on Z: a flattened box, not an error
        let flat = make_box(
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(2.0, 2.0, 1.0),
            gray(),
        );

        assert_eq!(flat.len(), 6);

        let ray = Ray::new(Vec3::new(1.0, 1.0, 5.0), Vec3::NEG_Z, 0.0);
        let rec = flat
            .hit(&ray, Interval::new(0.001, f32::INFINITY))
            .expect("flattened box is still hittable");
        assert!((rec.p.z - 1.0).abs() < 1e-3);
    }
}
