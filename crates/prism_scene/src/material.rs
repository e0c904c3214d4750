//! Materials that decide how surfaces respond to light.

use crate::hittable::HitRecord;
use crate::texture::{SolidColor, Texture};
use prism_math::{gen_f32, Ray, Vec3};
use rand::RngCore;
use std::f32::consts::PI;
use std::sync::Arc;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// The outcome of a scattering event.
pub enum Scatter {
    /// Follow this exact ray; no density weighting applies.
    Specular { attenuation: Color, ray: Ray },
    /// The surface reflects diffusely. The integrator chooses the
    /// direction and weights the sample with [`Material::scattering_pdf`].
    Diffuse { attenuation: Color },
}

/// How light interacts with a surface.
///
/// Materials are shared between surfaces through `Arc<dyn Material>`.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray at a hit, or absorb it (`None`).
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<Scatter> {
        None
    }

    /// Density this material assigns to a sampled outgoing direction.
    /// Only meaningful for materials that scatter [`Scatter::Diffuse`].
    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        0.0
    }

    /// Light emitted at the hit. Most materials emit nothing.
    fn emitted(&self, _rec: &HitRecord) -> Color {
        Color::ZERO
    }
}

/// Lambertian (diffuse) material over a texture.
pub struct Lambertian {
    texture: Arc<dyn Texture>,
}

impl Lambertian {
    /// Create a Lambertian material with a constant albedo.
    pub fn new(albedo: Color) -> Self {
        Self {
            texture: Arc::new(SolidColor::new(albedo)),
        }
    }

    /// Create a Lambertian material over an arbitrary texture.
    pub fn textured(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for Lambertian {
    fn scatter(&self, _ray_in: &Ray, rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<Scatter> {
        Some(Scatter::Diffuse {
            attenuation: self.texture.value(rec.u, rec.v, rec.p),
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f32 {
        let cos_theta = rec.normal.dot(scattered.direction().normalize());
        if cos_theta < 0.0 {
            0.0
        } else {
            cos_theta / PI
        }
    }
}

/// Dielectric (glass) material.
pub struct Dielectric {
    /// Refractive index relative to the surrounding medium
    refraction_index: f32,
}

impl Dielectric {
    /// Create a dielectric material (1.0 = air, 1.5 = glass, 2.4 = diamond).
    pub fn new(refraction_index: f32) -> Self {
        Self { refraction_index }
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.refraction_index
        } else {
            self.refraction_index
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction =
            if cannot_refract || reflectance(cos_theta, refraction_ratio) > gen_f32(rng) {
                reflect(unit_direction, rec.normal)
            } else {
                refract(unit_direction, rec.normal, refraction_ratio)
            };

        Some(Scatter::Specular {
            attenuation: Color::ONE,
            ray: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Diffuse light emitter.
pub struct DiffuseLight {
    emit: Color,
}

impl DiffuseLight {
    /// Create a diffuse light with the given emission color.
    pub fn new(emit: Color) -> Self {
        Self { emit }
    }
}

impl Material for DiffuseLight {
    // Lights never scatter; the default scatter() already absorbs.

    fn emitted(&self, rec: &HitRecord) -> Color {
        // One-sided: only the front face glows
        if rec.front_face {
            self.emit
        } else {
            Color::ZERO
        }
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a vector through a surface.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for reflectance.
fn reflectance(cosine: f32, refraction_ratio: f32) -> f32 {
    let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
