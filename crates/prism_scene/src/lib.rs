//! Scene graph construction: surfaces, materials, textures, and the
//! transform wrappers that place them.
//!
//! Everything here is built once by a scene driver and then read-only;
//! all capability traits are `Send + Sync` so a renderer may traverse
//! the finished graph from any thread.

mod hittable;
mod material;
mod quad;
mod sphere;
mod texture;
mod transform;

pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Color, Dielectric, DiffuseLight, Lambertian, Material, Scatter};
pub use quad::{make_box, Quad};
pub use sphere::Sphere;
pub use texture::{ImageTexture, SolidColor, Texture, TextureError};
pub use transform::{RotateY, Translate};
