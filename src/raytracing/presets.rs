//! Built-in scenes for the command line renderer.

use std::f64::consts::FRAC_PI_4;

use clap::ValueEnum;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::camera::Camera;
use super::error::SceneResult;
use super::light::Light;
use super::material::{Material, Texture};
use super::model::Model;
use super::scene::{Scene, SceneBuilder, TraceSettings};
use super::shape::Geometry;
use super::{Color, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// one of each material over a checkered floor
    Showcase,
    /// a sphere between two facing mirrors
    Mirrors,
    /// a field of randomly placed spheres
    Random,
}

#[derive(Debug, Clone)]
pub struct PresetOptions {
    pub max_depth: u32,
    pub seed: u64,
    /// optional OBJ mesh placed in the middle of the scene
    pub model: Option<String>,
    /// optional image tiled on the floor, one copy per unit square
    pub texture: Option<String>,
}

impl Default for PresetOptions {
    fn default() -> Self {
        PresetOptions {
            max_depth: TraceSettings::default().max_depth,
            seed: 0,
            model: None,
            texture: None,
        }
    }
}

pub fn build(preset: Preset, options: &PresetOptions) -> SceneResult<Scene> {
    let mut builder = Scene::builder();
    builder.settings(TraceSettings {
        max_depth: options.max_depth,
        ..TraceSettings::default()
    });

    let floor_texture = match &options.texture {
        Some(path) => Texture::load(path)?,
        None => Texture::checker(1.0, Color::one(), Color::splat(0.2)),
    };
    add_floor(&mut builder, floor_texture)?;
    match preset {
        Preset::Showcase => showcase(&mut builder)?,
        Preset::Mirrors => mirrors(&mut builder)?,
        Preset::Random => random(&mut builder, options.seed)?,
    }

    if let Some(path) = &options.model {
        let model = Model::load(path)?;
        info!("loaded {} with {} triangles", path, model.triangles().len());
        add_model(&mut builder, model)?;
    }

    Ok(builder.build())
}

fn add_floor(builder: &mut SceneBuilder, texture: Texture) -> SceneResult<()> {
    builder.add_material(
        Material::new("floor")
            .ambient(Color::splat(0.05))
            .diffuse(Color::splat(0.9))
            .texture(texture),
    )?;
    builder.add_shape(Geometry::plane(Vec3::y_axis(), -1.0), "floor")?;
    Ok(())
}

fn common_materials(builder: &mut SceneBuilder) -> SceneResult<()> {
    builder.add_material(
        Material::new("red plastic")
            .ambient(Color::new(0.1, 0.0, 0.0))
            .diffuse(Color::new(0.8, 0.1, 0.1))
            .specular(Color::splat(0.5), 40.0),
    )?;
    builder.add_material(
        Material::new("mirror")
            .diffuse(Color::splat(0.05))
            .specular(Color::one(), 200.0)
            .reflective(Color::splat(0.9)),
    )?;
    builder.add_material(
        Material::new("glass")
            .diffuse(Color::zero())
            .specular(Color::one(), 300.0)
            .reflective(Color::splat(0.1))
            .transmissive(Color::splat(0.9))
            .refraction_index(1.5),
    )?;
    Ok(())
}

fn showcase(builder: &mut SceneBuilder) -> SceneResult<()> {
    common_materials(builder)?;
    builder.add_material(
        Material::new("blue matte")
            .ambient(Color::new(0.0, 0.0, 0.05))
            .diffuse(Color::new(0.2, 0.3, 0.9)),
    )?;
    builder.add_material(
        Material::new("green matte")
            .ambient(Color::new(0.0, 0.05, 0.0))
            .diffuse(Color::new(0.2, 0.8, 0.3)),
    )?;

    builder.add_shape(Geometry::sphere(Vec3::new(-2.2, 0.0, 0.0), 1.0), "red plastic")?;
    builder.add_shape(Geometry::sphere(Vec3::new(0.0, 0.0, -1.0), 1.0), "mirror")?;
    builder.add_shape(Geometry::sphere(Vec3::new(1.4, -0.3, 1.2), 0.7), "glass")?;

    let transforms = builder.transforms();
    transforms.push();
    transforms.translate(Vec3::new(2.6, -0.4, -1.2));
    transforms.rotate(Vec3::y_axis(), FRAC_PI_4);
    builder.add_shape(Geometry::cuboid(Vec3::splat(-0.6), Vec3::splat(0.6)), "blue matte")?;
    builder.transforms().pop()?;

    // a pennant standing behind the spheres
    builder.add_shape(
        Geometry::triangle(
            Vec3::new(-1.5, -1.0, -3.5),
            Vec3::new(1.5, -1.0, -3.5),
            Vec3::new(0.0, 2.5, -4.0),
        ),
        "green matte",
    )?;

    builder.add_light(
        Light::point(Vec3::new(-3.0, 5.0, 4.0), Color::splat(0.9)).with_attenuation(1.0, 0.02, 0.005),
    );
    builder.add_light(Light::directional(Vec3::new(1.0, -1.0, -0.5), Color::splat(0.4)));
    builder.camera(
        Camera::look_at(Vec3::new(0.0, 1.5, 7.0), Vec3::new(0.0, 0.0, 0.0), Vec3::y_axis()).with_fov(50.0),
    );
    Ok(())
}

fn mirrors(builder: &mut SceneBuilder) -> SceneResult<()> {
    common_materials(builder)?;
    for x in [-3.0, 3.0] {
        let transforms = builder.transforms();
        transforms.push();
        transforms.translate(Vec3::new(x, 0.5, 0.0));
        builder.add_shape(Geometry::cuboid(Vec3::new(-0.05, -1.5, -3.0), Vec3::new(0.05, 1.5, 3.0)), "mirror")?;
        builder.transforms().pop()?;
    }
    builder.add_shape(Geometry::sphere(Vec3::zero(), 0.8), "red plastic")?;
    builder.add_shape(Geometry::disk(Vec3::new(0.0, 2.5, 0.0), -Vec3::y_axis(), 0.5), "glass")?;

    builder.add_light(Light::point(Vec3::new(0.0, 4.0, 4.0), Color::one()).with_attenuation(1.0, 0.05, 0.01));
    builder.camera(
        Camera::look_at(Vec3::new(-1.0, 1.0, 8.0), Vec3::new(0.5, 0.0, 0.0), Vec3::y_axis()).with_fov(40.0),
    );
    Ok(())
}

fn random(builder: &mut SceneBuilder, seed: u64) -> SceneResult<()> {
    common_materials(builder)?;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut diffuse_count = 0;
    for a in -5..5 {
        for b in -5..5 {
            let radius = rng.gen_range(0.15..0.35);
            let center = Vec3::new(
                a as f64 + rng.gen_range(0.0..0.8),
                radius - 1.0,
                b as f64 + rng.gen_range(0.0..0.8),
            );
            let choose_mat: f64 = rng.gen();
            let material = if choose_mat < 0.7 {
                let name = format!("diffuse {diffuse_count}");
                diffuse_count += 1;
                let albedo = Color::new(rng.gen(), rng.gen(), rng.gen());
                builder.add_material(
                    Material::new(name.as_str())
                        .ambient(albedo * 0.1)
                        .diffuse(albedo)
                        .specular(Color::splat(0.3), 20.0),
                )?;
                name
            } else if choose_mat < 0.9 {
                "mirror".to_string()
            } else {
                "glass".to_string()
            };
            builder.add_shape(Geometry::sphere(center, radius), &material)?;
        }
    }

    builder.add_light(Light::point(Vec3::new(4.0, 6.0, 6.0), Color::splat(0.8)));
    builder.add_light(Light::directional(Vec3::new(-0.3, -1.0, -0.2), Color::splat(0.3)));
    builder.camera(
        Camera::look_at(Vec3::new(0.0, 3.0, 9.0), Vec3::new(0.0, -1.0, 0.0), Vec3::y_axis()).with_fov(45.0),
    );
    Ok(())
}

fn add_model(builder: &mut SceneBuilder, model: Model) -> SceneResult<()> {
    builder.add_material(
        Material::new("model")
            .ambient(Color::splat(0.05))
            .diffuse(Color::new(0.9, 0.7, 0.3))
            .specular(Color::splat(0.4), 30.0),
    )?;

    // fit the mesh in a unit box resting on the floor
    let size = model.bounding_box.half_extension.max_component().max(f64::MIN_POSITIVE);
    let center = model.bounding_box.center;
    let lift = model.bounding_box.half_extension.y / size - 1.0;

    let transforms = builder.transforms();
    transforms.push();
    transforms.translate(Vec3::new(0.0, lift, 1.5));
    transforms.scale(Vec3::splat(1.0 / size));
    transforms.translate(-center);
    builder.add_shape(Geometry::Mesh(model), "model")?;
    builder.transforms().pop()?;
    Ok(())
}
