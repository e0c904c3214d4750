//! CPU path tracing back end.
//!
//! Consumes a finished scene graph (a world aggregate plus a
//! light-importance aggregate) and a camera configuration, and produces
//! an image. The aggregates are read-only for the whole render.

mod camera;
mod renderer;

pub use camera::{Camera, Viewport};
pub use renderer::{color_to_rgba, linear_to_gamma, ray_color, render, render_pixel, ImageBuffer};
