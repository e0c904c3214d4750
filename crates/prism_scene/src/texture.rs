//! Textures sampled by materials at hit points.

use std::path::{Path, PathBuf};

use crate::material::Color;
use prism_math::Vec3;
use thiserror::Error;

/// Errors that can occur while loading texture resources.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture {path}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// A color field over surface UV coordinates and the hit point.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// The same color everywhere.
#[derive(Debug, Clone)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.albedo
    }
}

/// An image sampled bilinearly, stored as linear RGB floats.
pub struct ImageTexture {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 3]>,
}

impl ImageTexture {
    /// Decode an image file once, converting sRGB bytes to linear floats.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| TextureError::Load {
            path: path.to_path_buf(),
            source,
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb
            .pixels()
            .map(|p| {
                [
                    srgb_to_linear(p[0]),
                    srgb_to_linear(p[1]),
                    srgb_to_linear(p[2]),
                ]
            })
            .collect();

        log::debug!("Loaded texture: {} ({}x{})", path.display(), width, height);

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a texture from linear pixel data, row-major from the top-left.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<[f32; 3]>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    fn get_pixel(&self, x: u32, y: u32) -> [f32; 3] {
        let idx = (y * self.width + x) as usize;
        self.pixels.get(idx).copied().unwrap_or([0.0, 0.0, 0.0])
    }
}

impl Texture for ImageTexture {
    /// Bilinear sample with wrapped UVs; (0, 0) is the bottom-left.
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        if self.pixels.is_empty() {
            // No data; cyan makes the problem visible in renders
            return Color::new(0.0, 1.0, 1.0);
        }

        let u = wrap_uv(u);
        let v = wrap_uv(v);

        // Flip V: image rows run top to bottom
        let x = u * (self.width as f32 - 1.0);
        let y = (1.0 - v) * (self.height as f32 - 1.0);

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let fx = x.fract();
        let fy = y.fract();

        let p00 = self.get_pixel(x0, y0);
        let p10 = self.get_pixel(x1, y0);
        let p01 = self.get_pixel(x0, y1);
        let p11 = self.get_pixel(x1, y1);

        let top = Vec3::new(
            p00[0] * (1.0 - fx) + p10[0] * fx,
            p00[1] * (1.0 - fx) + p10[1] * fx,
            p00[2] * (1.0 - fx) + p10[2] * fx,
        );
        let bottom = Vec3::new(
            p01[0] * (1.0 - fx) + p11[0] * fx,
            p01[1] * (1.0 - fx) + p11[1] * fx,
            p01[2] * (1.0 - fx) + p11[2] * fx,
        );

        top * (1.0 - fy) + bottom * fy
    }
}

/// Wrap a texture coordinate into [0, 1], keeping the closed upper edge
/// reachable: a plain `rem_euclid` would fold exactly 1.0 onto 0.0 and
/// the last texel row/column could never be sampled.
fn wrap_uv(x: f32) -> f32 {
    let wrapped = x.rem_euclid(1.0);
    if wrapped == 0.0 && x >= 1.0 {
        1.0
    } else {
        wrapped
    }
}

/// Convert an sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
