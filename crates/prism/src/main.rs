//! Cornell box gallery: one scene, five viewpoints.

use anyhow::{Context, Result};
use prism_math::Vec3;
use prism_render::Camera;
use prism_scene::{
    make_box, Color, Dielectric, DiffuseLight, HittableList, ImageTexture, Lambertian, Material,
    Quad, RotateY, Sphere, SolidColor, Texture, Translate,
};
use std::sync::Arc;
use std::time::Instant;

/// Load an image texture, falling back to a solid color if the file is
/// missing or unreadable. The failure is logged, never hidden.
fn load_texture(path: &str, fallback: Color) -> Arc<dyn Texture> {
    match ImageTexture::open(path) {
        Ok(texture) => Arc::new(texture),
        Err(err) => {
            log::warn!("{err}; using solid fallback for {path}");
            Arc::new(SolidColor::new(fallback))
        }
    }
}

/// Build the Cornell box world and its light-importance list.
///
/// Pure construction: no globals, nothing is mutated afterwards. The
/// light list holds geometry-only duplicates of the surfaces worth
/// aiming rays at.
fn build_scene() -> (HittableList, HittableList) {
    let red: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let white: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.73, 0.73, 0.73)));
    let green: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.12, 0.45, 0.15)));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::new(15.0, 15.0, 15.0)));

    let ground_surface: Arc<dyn Material> = Arc::new(Lambertian::textured(load_texture(
        "assets/ground.jpg",
        Color::new(0.4, 0.3, 0.2),
    )));
    let water_surface: Arc<dyn Material> = Arc::new(Lambertian::textured(load_texture(
        "assets/water.jpg",
        Color::new(0.2, 0.3, 0.5),
    )));
    let fire_surface: Arc<dyn Material> = Arc::new(Lambertian::textured(load_texture(
        "assets/fogo.jpg",
        Color::new(0.8, 0.3, 0.1),
    )));

    let mut world = HittableList::new();

    // Cornell box walls: green side, floor, back
    world.add(Box::new(Quad::new(
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(0.0, 555.0, 0.0),
        green,
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -555.0),
        white.clone(),
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(555.0, 0.0, 555.0),
        Vec3::new(-555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        white,
    )));

    // Ceiling light
    world.add(Box::new(Quad::new(
        Vec3::new(213.0, 554.0, 227.0),
        Vec3::new(130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 105.0),
        light,
    )));

    // Tall water box: rotate about its own origin first, then place it
    let tall_box = make_box(
        Vec3::new(0.0, 165.0, 0.0),
        Vec3::new(165.0, 330.0, 165.0),
        water_surface,
    );
    world.add(Box::new(Translate::new(
        Box::new(RotateY::new(Box::new(tall_box), 15.0)),
        Vec3::new(265.0, 50.0, 295.0),
    )));

    // Ground-textured cube, translation only
    let ground_box = make_box(Vec3::ZERO, Vec3::splat(200.0), ground_surface);
    world.add(Box::new(Translate::new(
        Box::new(ground_box),
        Vec3::new(300.0, 0.0, 100.0),
    )));

    // Spheres: glass, fire-textured, red
    world.add(Box::new(Sphere::new(
        Vec3::new(190.0, 90.0, 250.0),
        50.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(190.0, 250.0, 100.0),
        50.0,
        fire_surface,
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(190.0, 90.0, 400.0),
        25.0,
        red,
    )));

    // Sampling targets: the ceiling light, plus a sphere around the
    // glass region to aim rays where refraction matters
    let mut lights = HittableList::new();
    lights.add(Box::new(Quad::geometry_only(
        Vec3::new(343.0, 554.0, 332.0),
        Vec3::new(-130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -105.0),
    )));
    lights.add(Box::new(Sphere::geometry_only(
        Vec3::new(190.0, 90.0, 190.0),
        90.0,
    )));

    (world, lights)
}

/// The five gallery viewpoints.
fn gallery() -> Vec<(&'static str, Camera)> {
    let base = Camera::new()
        .with_resolution(600, 1.0)
        .with_quality(100, 50)
        .with_background(Color::ZERO);

    vec![
        (
            "front",
            base.clone().with_position(
                Vec3::new(278.0, 278.0, -800.0),
                Vec3::new(278.0, 278.0, 0.0),
                Vec3::Y,
            ),
        ),
        (
            "left",
            base.clone().with_position(
                Vec3::new(-800.0, 278.0, 278.0),
                Vec3::new(190.0, 278.0, 278.0),
                Vec3::Y,
            ),
        ),
        (
            "right",
            base.clone().with_position(
                Vec3::new(1500.0, 278.0, 278.0),
                Vec3::new(278.0, 278.0, 278.0),
                Vec3::Y,
            ),
        ),
        (
            "back",
            base.clone().with_position(
                Vec3::new(278.0, 278.0, 1400.0),
                Vec3::new(278.0, 278.0, 278.0),
                Vec3::Y,
            ),
        ),
        (
            "overhead",
            base.with_position(
                Vec3::new(-800.0, 800.0, -800.0),
                Vec3::new(278.0, 278.0, 278.0),
                Vec3::Y,
            ),
        ),
    ]
    .into_iter()
    .map(|(name, camera)| (name, camera.with_lens(40.0, 0.0, 10.0)))
    .collect()
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let (world, lights) = build_scene();
    log::info!(
        "Scene assembled: {} objects, {} light-sampling targets",
        world.len(),
        lights.len()
    );

    for (name, camera) in gallery() {
        let start = Instant::now();
        log::info!(
            "Rendering {name} ({}x{}, {} spp)",
            camera.image_width,
            camera.image_height(),
            camera.samples_per_pixel
        );

        let image = camera.render(&world, &lights);

        let path = format!("cornell_{name}.png");
        image
            .save(&path)
            .with_context(|| format!("failed to write {path}"))?;
        log::info!("Wrote {path} in {:.1}s", start.elapsed().as_secs_f32());
    }

    Ok(())
}
