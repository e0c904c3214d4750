// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod onb;
mod ray;
mod sample;

pub use aabb::Aabb;
pub use interval::Interval;
pub use onb::Onb;
pub use ray::Ray;
pub use sample::{gen_f32, random_cosine_direction, random_in_unit_disk, random_unit_vector};
