//! Monte Carlo path tracing integrator.
//!
//! Diffuse bounces are importance sampled from an even mixture of the
//! cosine lobe about the surface normal and directions toward the
//! light list, which is what the light list exists for.

use crate::camera::{Camera, Viewport};
use prism_math::{gen_f32, random_cosine_direction, Interval, Onb, Ray};
use prism_scene::{Color, Hittable, HittableList, Scatter};
use rand::RngCore;
use std::f32::consts::PI;
use std::path::Path;

/// Compute the color seen by a ray.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    lights: &HittableList,
    depth: u32,
    background: Color,
    rng: &mut dyn RngCore,
) -> Color {
    // Bounce budget exhausted: no more light gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(0.001, f32::INFINITY)) else {
        return background;
    };

    // Geometry-only surfaces (light-list duplicates) absorb outright
    let Some(material) = rec.material else {
        return Color::ZERO;
    };

    let emitted = material.emitted(&rec);

    let Some(scatter) = material.scatter(ray, &rec, rng) else {
        return emitted;
    };

    match scatter {
        Scatter::Specular {
            attenuation,
            ray: specular,
        } => {
            let sample = ray_color(&specular, world, lights, depth - 1, background, rng);
            emitted + attenuation * sample
        }
        Scatter::Diffuse { attenuation } => {
            // Half the samples aim at the lights, half follow the cosine
            // lobe; with no lights the mixture degenerates to pure cosine.
            let sample_lights = !lights.is_empty();
            let direction = if sample_lights && gen_f32(rng) < 0.5 {
                lights.random_toward(rec.p, rng)
            } else {
                Onb::new(rec.normal).transform(random_cosine_direction(rng))
            };
            let scattered = Ray::new(rec.p, direction, ray.time());

            let cosine_pdf = (rec.normal.dot(direction.normalize()) / PI).max(0.0);
            let pdf = if sample_lights {
                0.5 * cosine_pdf + 0.5 * lights.pdf_value(rec.p, direction)
            } else {
                cosine_pdf
            };
            if pdf <= 0.0 {
                return emitted;
            }

            let scattering_pdf = material.scattering_pdf(ray, &rec, &scattered);
            let sample = ray_color(&scattered, world, lights, depth - 1, background, rng);

            emitted + attenuation * scattering_pdf * sample / pdf
        }
    }
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    viewport: &Viewport,
    world: &dyn Hittable,
    lights: &HittableList,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel {
        let ray = viewport.get_ray(x, y, rng);
        pixel_color += ray_color(
            &ray,
            world,
            lights,
            camera.max_depth,
            camera.background,
            rng,
        );
    }

    pixel_color / camera.samples_per_pixel as f32
}

/// Render the whole scene to an image buffer, one scanline at a time.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    lights: &HittableList,
    rng: &mut dyn RngCore,
) -> ImageBuffer {
    let height = camera.image_height();
    let viewport = Viewport::new(camera);
    let mut image = ImageBuffer::new(camera.image_width, height);

    for y in 0..height {
        log::debug!("Scanline {}/{}", y + 1, height);
        for x in 0..camera.image_width {
            let color = render_pixel(camera, &viewport, world, lights, x, y, rng);
            image.set(x, y, color);
        }
    }

    image
}

impl Camera {
    /// Render the world from this viewpoint. Blocks until the image is
    /// complete; the aggregates are only ever read.
    pub fn render(&self, world: &dyn Hittable, lights: &HittableList) -> ImageBuffer {
        let mut rng = rand::thread_rng();
        render(self, world, lights, &mut rng)
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * linear_to_gamma(color.x).clamp(0.0, 1.0)) as u8;
    let g = (255.0 * linear_to_gamma(color.y).clamp(0.0, 1.0)) as u8;
    let b = (255.0 * linear_to_gamma(color.z).clamp(0.0, 1.0)) as u8;
    [r, g, b, 255]
}

/// Linear-color render output.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to gamma-corrected RGBA bytes.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }

    /// Encode and write the image; the format follows the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        image::save_buffer(
            path,
            &self.to_rgba(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
        )
    }
}
