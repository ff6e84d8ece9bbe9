use std::sync::Arc;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;

use super::camera::Camera;
use super::error::{SceneError, SceneResult};
use super::image_buffer::{display_color, Image};
use super::light::Light;
use super::material::Material;
use super::math::{Color, Ray, Vec3};
use super::shape::{Geometry, ISect, Shape};
use super::transform_stack::TransformStack;

/// Constants of a render pass, fixed once the scene is built.
#[derive(Debug, Clone, Copy)]
pub struct TraceSettings {
    /// deepest recursion level that is still shaded, primary rays are level 0
    pub max_depth: u32,
    /// minimum accepted t, keeps secondary rays off their own surface
    pub epsilon: f64,
    pub background: Color,
}

impl Default for TraceSettings {
    fn default() -> Self {
        TraceSettings {
            max_depth: 3,
            epsilon: 1e-5,
            background: Color::zero(),
        }
    }
}

/// Options of a single `render` call; none of them changes the pixels.
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    /// show a progress bar on stderr
    pub verbose: bool,
    /// shade rows on the rayon thread pool
    pub parallel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            verbose: false,
            parallel: true,
        }
    }
}

fn find_material(materials: &[Arc<Material>], name: &str) -> SceneResult<Arc<Material>> {
    // unspecified material gets the default one
    let name = if name.is_empty() {
        Material::DEFAULT_NAME
    } else {
        name
    };
    materials
        .iter()
        .find(|material| material.name == name)
        .cloned()
        .ok_or_else(|| SceneError::UndefinedMaterial(name.to_string()))
}

/// Collects the scene elements while the scene description is read.
///
/// Shapes and lights are placed with the transform on top of the stack at the
/// moment they are added; the stack is dropped by `build`.
#[derive(Debug)]
pub struct SceneBuilder {
    shapes: Vec<Shape>,
    lights: Vec<Light>,
    materials: Vec<Arc<Material>>,
    camera: Option<Camera>,
    transforms: TransformStack,
    settings: TraceSettings,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        SceneBuilder::new()
    }
}

impl SceneBuilder {
    pub fn new() -> Self {
        SceneBuilder {
            shapes: Vec::new(),
            lights: Vec::new(),
            materials: vec![Arc::new(Material::default())],
            camera: None,
            transforms: TransformStack::new(),
            settings: TraceSettings::default(),
        }
    }

    pub fn settings(&mut self, settings: TraceSettings) -> &mut Self {
        self.settings = settings;
        self
    }

    pub fn camera(&mut self, camera: Camera) -> &mut Self {
        self.camera = Some(camera);
        self
    }

    pub fn transforms(&mut self) -> &mut TransformStack {
        &mut self.transforms
    }

    pub fn add_material(&mut self, material: Material) -> SceneResult<Arc<Material>> {
        material.validate()?;
        if self.materials.iter().any(|m| m.name == material.name) {
            return Err(SceneError::DuplicateMaterial(material.name));
        }
        let material = Arc::new(material);
        self.materials.push(material.clone());
        Ok(material)
    }

    pub fn material(&self, name: &str) -> SceneResult<Arc<Material>> {
        find_material(&self.materials, name)
    }

    /// Places a shape with the current transform. An empty material name selects
    /// the default material.
    pub fn add_shape(&mut self, geometry: Geometry, material_name: &str) -> SceneResult<&mut Self> {
        let material = self.material(material_name)?;
        let shape = Shape::new(geometry, material, *self.transforms.peek())?;
        self.shapes.push(shape);
        Ok(self)
    }

    pub fn add_light(&mut self, light: Light) -> &mut Self {
        self.lights.push(light.transform(self.transforms.peek()));
        self
    }

    pub fn build(self) -> Scene {
        let scene = Scene {
            shapes: self.shapes,
            lights: self.lights,
            materials: self.materials,
            camera: self.camera.unwrap_or_default(),
            settings: self.settings,
        };
        debug!(
            "scene built with {} shapes, {} lights, {} materials",
            scene.shapes.len(),
            scene.lights.len(),
            scene.materials.len()
        );
        scene
    }
}

/// Immutable scene: everything the renderer reads.
#[derive(Debug)]
pub struct Scene {
    shapes: Vec<Shape>,
    lights: Vec<Light>,
    materials: Vec<Arc<Material>>,
    camera: Camera,
    settings: TraceSettings,
}

/// Direction of the ray transmitted through a surface with Snell's law, `None`
/// on total internal reflection. `normal` faces the incoming `direction`.
pub fn refract(direction: Vec3, normal: Vec3, eta: f64) -> Option<Vec3> {
    let cos_i = (-direction.dot(normal)).min(1.0);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return None;
    }
    Some((direction * eta + normal * (eta * cos_i - k.sqrt())).normalize())
}

fn normalized_coordinate(index: u32, size: u32) -> f64 {
    if size > 1 {
        index as f64 / (size - 1) as f64 * 2.0 - 1.0
    } else {
        0.0
    }
}

impl Scene {
    pub fn builder() -> SceneBuilder {
        SceneBuilder::new()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn settings(&self) -> &TraceSettings {
        &self.settings
    }

    pub fn get_material(&self, name: &str) -> SceneResult<Arc<Material>> {
        find_material(&self.materials, name)
    }

    /// Closest intersection along `ray` with t >= epsilon.
    pub fn intersects(&self, ray: &Ray) -> Option<ISect<'_>> {
        let mut closest: Option<ISect> = None;
        for shape in &self.shapes {
            if let Some(hit) = shape.intersect(ray, self.settings.epsilon) {
                if closest.map_or(true, |c| hit.t < c.t) {
                    closest = Some(hit);
                }
            }
        }
        closest
    }

    /// Fraction of light that travels along `ray` up to `max_t`: the product of
    /// the transmission of every shape crossed in between.
    pub fn shadow_tint(&self, ray: &Ray, max_t: f64) -> Color {
        let epsilon = self.settings.epsilon;
        let mut tint = Color::one();
        for shape in &self.shapes {
            if let Some(hit) = shape.intersect(ray, epsilon) {
                if hit.t > epsilon && hit.t < max_t {
                    tint *= shape.material().kt;
                    if tint.is_zero() {
                        // fully blocked
                        break;
                    }
                }
            }
        }
        tint
    }

    fn direct_lighting(&self, isect: &ISect, ray: &Ray) -> Color {
        let mut color = Color::zero();
        for light in &self.lights {
            let incidence = light.incidence(isect.point);
            let tint = if isect.normal.dot(incidence.to_light) > 0.0 {
                let feeler = Ray {
                    origin: isect.point,
                    direction: incidence.to_light,
                };
                self.shadow_tint(&feeler, incidence.max_t)
            } else {
                // the surface faces away, only the ambient term remains
                Color::zero()
            };
            color += light.compute(isect, tint, ray);
        }
        color
    }

    /// Color seen along `ray` at the given recursion depth. The result is not
    /// clamped.
    pub fn cast_ray(&self, ray: &Ray, depth: u32) -> Color {
        let settings = &self.settings;
        if depth > settings.max_depth {
            return settings.background;
        }
        let isect = match self.intersects(ray) {
            Some(isect) => isect,
            None => return settings.background,
        };

        let material = isect.material();
        let mut color = self.direct_lighting(&isect, ray);

        if material.is_reflective() {
            let reflected = Ray::new(
                isect.point + isect.normal * settings.epsilon,
                ray.direction.reflect(isect.normal),
            );
            color += material.kr * self.cast_ray(&reflected, depth + 1);
        }

        if let Some(ior) = material.ior.filter(|_| material.is_refractive()) {
            let eta = if isect.front_face { 1.0 / ior } else { ior };
            // total internal reflection contributes nothing
            if let Some(direction) = refract(ray.direction, isect.normal, eta) {
                let refracted = Ray::new(isect.point - isect.normal * settings.epsilon, direction);
                color += material.kt * self.cast_ray(&refracted, depth + 1);
            }
        }

        color
    }

    /// Traces one primary ray per pixel. Pixel (0, 0) is the bottom left corner.
    pub fn render(&self, width: u32, height: u32, config: &RenderConfig) -> SceneResult<Image> {
        if width == 0 || height == 0 {
            return Err(SceneError::InvalidResolution { width, height });
        }

        // set up camera for this image resolution
        let mut camera = self.camera.clone();
        camera.setup(width, height);

        let threads = if config.parallel {
            rayon::current_num_threads()
        } else {
            1
        };
        info!("rendering {width}x{height} on {threads} threads");
        let start = Instant::now();

        let progress = if config.verbose {
            ProgressBar::new(height as u64)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::default_bar().template("{bar:40} {pos}/{len} rows ETA: {eta}") {
            progress.set_style(style);
        }

        let shade_row = |(j, row): (usize, &mut [Color])| {
            let y = normalized_coordinate(j as u32, height);
            for (i, pixel) in row.iter_mut().enumerate() {
                let x = normalized_coordinate(i as u32, width);
                let ray = camera.pixel_ray(x, y);
                *pixel = display_color(self.cast_ray(&ray, 0));
            }
            progress.inc(1);
        };

        let mut image = Image::new(width, height);
        let rows: Vec<(usize, &mut [Color])> = image.rows_mut().enumerate().collect();
        if config.parallel {
            rows.into_par_iter().for_each(shade_row);
        } else {
            rows.into_iter().for_each(shade_row);
        }

        progress.finish_and_clear();
        info!("rendered in {:?}", start.elapsed());
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::raytracing::Mat4;

    fn camera_on_z(distance: f64) -> Camera {
        Camera::look_at(Vec3::new(0.0, 0.0, distance), Vec3::zero(), Vec3::y_axis())
    }

    /// Scene with a perfect mirror sphere in the origin and a red ambient sphere
    /// behind the viewer, seen with the given recursion limit.
    fn mirror_scene(max_depth: u32) -> Scene {
        let mut builder = Scene::builder();
        builder.settings(TraceSettings {
            max_depth,
            ..TraceSettings::default()
        });
        builder
            .add_material(
                Material::new("mirror")
                    .diffuse(Color::zero())
                    .reflective(Color::one()),
            )
            .unwrap();
        builder
            .add_material(
                Material::new("red")
                    .ambient(Color::x_axis())
                    .diffuse(Color::zero()),
            )
            .unwrap();
        builder
            .add_shape(Geometry::sphere(Vec3::zero(), 1.0), "mirror")
            .unwrap();
        builder
            .add_shape(Geometry::sphere(Vec3::new(0.0, 0.0, 10.0), 2.0), "red")
            .unwrap();
        builder.add_light(Light::point(Vec3::new(0.0, 5.0, 0.0), Color::one()));
        builder.camera(camera_on_z(5.0));
        builder.build()
    }

    fn toward_origin() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::z_axis())
    }

    #[test]
    fn missing_ray_returns_background() {
        let mut builder = Scene::builder();
        builder.settings(TraceSettings {
            background: Color::new(0.1, 0.2, 0.3),
            ..TraceSettings::default()
        });
        builder
            .add_shape(Geometry::sphere(Vec3::zero(), 1.0), "")
            .unwrap();
        builder.add_light(Light::point(Vec3::new(0.0, 5.0, 0.0), Color::one()));
        let scene = builder.build();

        let away = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::z_axis());
        for depth in 0..=scene.settings().max_depth {
            assert_eq!(scene.cast_ray(&away, depth), Color::new(0.1, 0.2, 0.3));
        }
        // past the budget even a hit is background
        let depth = scene.settings().max_depth + 1;
        assert_eq!(scene.cast_ray(&toward_origin(), depth), Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn intersects_reports_closest_shape() {
        let mut builder = Scene::builder();
        builder.add_material(Material::new("far")).unwrap();
        builder
            .add_shape(Geometry::sphere(Vec3::new(0.0, 0.0, -5.0), 1.0), "far")
            .unwrap();
        builder
            .add_shape(Geometry::sphere(Vec3::zero(), 1.0), "")
            .unwrap();
        let scene = builder.build();

        let isect = scene.intersects(&toward_origin()).expect("hit");
        assert_relative_eq!(isect.t, 4.0, epsilon = 1e-9);
        assert_eq!(isect.material().name, Material::DEFAULT_NAME);
        assert_relative_eq!(isect.normal, Vec3::z_axis(), epsilon = 1e-9);

        let miss = Ray::new(Vec3::new(0.0, 3.0, 5.0), -Vec3::z_axis());
        assert!(scene.intersects(&miss).is_none());
    }

    fn tint_through(kts: &[Color]) -> Color {
        let mut builder = Scene::builder();
        for (i, kt) in kts.iter().enumerate() {
            let name = format!("filter{i}");
            builder
                .add_material(Material::new(name.as_str()).transmissive(*kt))
                .unwrap();
            let z = -2.0 - 2.0 * i as f64;
            builder
                .add_shape(Geometry::disk(Vec3::new(0.0, 0.0, z), Vec3::z_axis(), 1.0), &name)
                .unwrap();
        }
        let scene = builder.build();
        let feeler = Ray::new(Vec3::zero(), -Vec3::z_axis());
        scene.shadow_tint(&feeler, 100.0)
    }

    #[test]
    fn shadow_tint_multiplies_transmission() {
        assert_eq!(tint_through(&[]), Color::one());
        assert_eq!(tint_through(&[Color::one()]), Color::one());
        assert_eq!(tint_through(&[Color::zero()]), Color::zero());
        assert_relative_eq!(
            tint_through(&[Color::new(0.5, 1.0, 0.25), Color::splat(0.5)]),
            Color::new(0.25, 0.5, 0.125)
        );
    }

    #[test]
    fn shadow_tint_never_grows_with_obstacles() {
        let filters = [
            Color::new(0.9, 0.5, 1.0),
            Color::new(0.3, 0.8, 0.7),
            Color::one(),
            Color::zero(),
            Color::splat(0.5),
        ];
        let mut previous = tint_through(&[]);
        for n in 1..=filters.len() {
            let tint = tint_through(&filters[..n]);
            assert!(tint.x <= previous.x && tint.y <= previous.y && tint.z <= previous.z);
            previous = tint;
        }
        assert_eq!(previous, Color::zero());
    }

    #[test]
    fn shadow_tint_ignores_shapes_beyond_the_light() {
        let mut builder = Scene::builder();
        builder.add_material(Material::new("opaque")).unwrap();
        builder
            .add_shape(Geometry::disk(Vec3::new(0.0, 0.0, -5.0), Vec3::z_axis(), 1.0), "opaque")
            .unwrap();
        let scene = builder.build();
        let feeler = Ray::new(Vec3::zero(), -Vec3::z_axis());
        assert_eq!(scene.shadow_tint(&feeler, 4.0), Color::one());
        assert_eq!(scene.shadow_tint(&feeler, f64::INFINITY), Color::zero());
    }

    #[test]
    fn occluded_light_leaves_only_ambient() {
        let mut builder = Scene::builder();
        builder
            .add_material(Material::new("wall").ambient(Color::splat(0.1)).diffuse(Color::one()))
            .unwrap();
        builder
            .add_shape(Geometry::plane(Vec3::z_axis(), 0.0), "wall")
            .unwrap();
        // opaque blocker between the wall and the light
        builder
            .add_shape(Geometry::disk(Vec3::new(0.0, 0.0, 2.0), Vec3::z_axis(), 1.0), "")
            .unwrap();
        builder.add_light(Light::point(Vec3::new(0.0, 0.0, 4.0), Color::one()));
        let scene = builder.build();

        // passes beside the blocker and hits the wall in the origin
        let ray = Ray::new(Vec3::new(0.0, -4.0, 4.0), Vec3::new(0.0, 1.0, -1.0));
        let color = scene.cast_ray(&ray, 0);
        assert_relative_eq!(color, Color::splat(0.1), epsilon = 1e-12);
    }

    #[test]
    fn ambient_is_summed_per_light() {
        let build = |lights: usize| {
            let mut builder = Scene::builder();
            builder
                .add_material(Material::new("dim").ambient(Color::splat(0.2)).diffuse(Color::zero()))
                .unwrap();
            builder
                .add_shape(Geometry::sphere(Vec3::zero(), 1.0), "dim")
                .unwrap();
            for _ in 0..lights {
                builder.add_light(Light::directional(Vec3::y_axis(), Color::one()));
            }
            builder.build()
        };
        let one = build(1).cast_ray(&toward_origin(), 0);
        let two = build(2).cast_ray(&toward_origin(), 0);
        assert_relative_eq!(one, Color::splat(0.2), epsilon = 1e-12);
        assert_relative_eq!(two, Color::splat(0.4), epsilon = 1e-12);
    }

    #[test]
    fn reflection_respects_depth_limit() {
        let direct_only = mirror_scene(0).cast_ray(&toward_origin(), 0);
        assert_eq!(direct_only, Color::zero());

        let reflected = mirror_scene(1).cast_ray(&toward_origin(), 0);
        assert_relative_eq!(reflected, Color::x_axis(), epsilon = 1e-9);
    }

    #[test]
    fn transparent_sphere_lets_background_object_through() {
        let mut builder = Scene::builder();
        builder
            .add_material(
                Material::new("glass")
                    .diffuse(Color::zero())
                    .transmissive(Color::one())
                    .refraction_index(1.0),
            )
            .unwrap();
        builder
            .add_material(Material::new("red").ambient(Color::x_axis()).diffuse(Color::zero()))
            .unwrap();
        builder
            .add_shape(Geometry::sphere(Vec3::zero(), 1.0), "glass")
            .unwrap();
        builder
            .add_shape(Geometry::sphere(Vec3::new(0.0, 0.0, -10.0), 2.0), "red")
            .unwrap();
        builder.add_light(Light::directional(-Vec3::z_axis(), Color::one()));
        let scene = builder.build();

        let color = scene.cast_ray(&toward_origin(), 0);
        assert_relative_eq!(color, Color::x_axis(), epsilon = 1e-9);
    }

    #[test]
    fn glass_bends_rays_on_entry_and_exit() {
        let mut builder = Scene::builder();
        builder
            .add_material(
                Material::new("glass")
                    .diffuse(Color::zero())
                    .transmissive(Color::one())
                    .refraction_index(1.5),
            )
            .unwrap();
        builder
            .add_material(Material::new("red").ambient(Color::x_axis()).diffuse(Color::zero()))
            .unwrap();
        builder
            .add_shape(Geometry::sphere(Vec3::zero(), 1.0), "glass")
            .unwrap();
        // where a ray entering at y = 0.5 ends up after bending toward the
        // normal at the entry and away from it at the exit
        builder
            .add_shape(Geometry::sphere(Vec3::new(0.0, -1.28, -4.72), 0.3), "red")
            .unwrap();
        builder.add_light(Light::directional(-Vec3::z_axis(), Color::one()));
        let scene = builder.build();

        let ray = Ray::new(Vec3::new(0.0, 0.5, 5.0), -Vec3::z_axis());
        assert_relative_eq!(scene.cast_ray(&ray, 0), Color::x_axis(), epsilon = 1e-9);

        // an undeviated ray misses the target
        let beside = Ray::new(Vec3::new(0.0, 0.5, -1.0), -Vec3::z_axis());
        assert_eq!(scene.cast_ray(&beside, 0), Color::zero());
    }

    #[test]
    fn total_internal_reflection_adds_nothing() {
        let mut builder = Scene::builder();
        builder
            .add_material(
                Material::new("glass")
                    .diffuse(Color::zero())
                    .transmissive(Color::one())
                    .refraction_index(1.5),
            )
            .unwrap();
        builder
            .add_material(Material::new("red").ambient(Color::x_axis()).diffuse(Color::zero()))
            .unwrap();
        builder
            .add_shape(Geometry::sphere(Vec3::zero(), 1.0), "glass")
            .unwrap();
        // encloses everything, any escaping ray sees red
        builder
            .add_shape(Geometry::sphere(Vec3::zero(), 10.0), "red")
            .unwrap();
        builder.add_light(Light::directional(-Vec3::y_axis(), Color::one()));
        let scene = builder.build();

        // sin(incidence) = 0.9, past the critical angle of the glass
        let trapped = Ray::new(Vec3::new(0.0, 0.9, 0.0), Vec3::x_axis());
        assert_eq!(scene.cast_ray(&trapped, 0), Color::zero());

        // sin(incidence) = 0.3, the ray leaves the glass
        let escaping = Ray::new(Vec3::new(0.0, 0.3, 0.0), Vec3::x_axis());
        assert_relative_eq!(scene.cast_ray(&escaping, 0), Color::x_axis(), epsilon = 1e-9);
    }

    #[test]
    fn refraction_follows_snell_and_total_internal_reflection() {
        let straight = refract(-Vec3::z_axis(), Vec3::z_axis(), 1.0 / 1.5).expect("transmitted");
        assert_relative_eq!(straight, -Vec3::z_axis(), epsilon = 1e-12);

        // 45 degrees into glass: sin(out) = sin(45) / 1.5
        let incoming = Vec3::new(1.0, 0.0, -1.0).normalize();
        let bent = refract(incoming, Vec3::z_axis(), 1.0 / 1.5).expect("transmitted");
        assert_relative_eq!(bent.x, 45f64.to_radians().sin() / 1.5, epsilon = 1e-12);

        // leaving glass beyond the critical angle of about 41.8 degrees
        let grazing = Vec3::new(60f64.to_radians().sin(), 0.0, -60f64.to_radians().cos());
        assert!(refract(grazing, Vec3::z_axis(), 1.5).is_none());
    }

    #[test]
    fn undefined_material_is_a_configuration_error() {
        let mut builder = Scene::builder();
        let result = builder.add_shape(Geometry::sphere(Vec3::zero(), 1.0), "missing");
        assert!(matches!(result, Err(SceneError::UndefinedMaterial(name)) if name == "missing"));

        builder.add_material(Material::new("shiny")).unwrap();
        assert!(matches!(
            builder.add_material(Material::new("shiny")),
            Err(SceneError::DuplicateMaterial(_))
        ));
        assert!(matches!(
            builder.add_material(Material::new(Material::DEFAULT_NAME)),
            Err(SceneError::DuplicateMaterial(_))
        ));

        let scene = builder.build();
        assert_eq!(scene.get_material("").unwrap().name, Material::DEFAULT_NAME);
        assert_eq!(scene.get_material("shiny").unwrap().name, "shiny");
        assert!(scene.get_material("nope").is_err());
    }

    #[test]
    fn shapes_and_lights_take_the_current_transform() {
        let mut builder = Scene::builder();
        builder.transforms().push();
        builder.transforms().translate(Vec3::new(0.0, 0.0, -3.0));
        builder
            .add_shape(Geometry::sphere(Vec3::zero(), 1.0), "")
            .unwrap();
        builder.add_light(Light::point(Vec3::zero(), Color::one()));
        builder.transforms().pop().unwrap();
        builder
            .add_shape(Geometry::sphere(Vec3::new(5.0, 0.0, 0.0), 1.0), "")
            .unwrap();
        let scene = builder.build();

        assert_eq!(*scene.shapes()[0].transform(), Mat4::translate(Vec3::new(0.0, 0.0, -3.0)));
        assert_eq!(*scene.shapes()[1].transform(), Mat4::identity());
        let incidence = scene.lights()[0].incidence(Vec3::zero());
        assert_relative_eq!(incidence.max_t, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn invalid_resolution_is_rejected() {
        let scene = mirror_scene(3);
        assert!(matches!(
            scene.render(0, 10, &RenderConfig::default()),
            Err(SceneError::InvalidResolution { width: 0, height: 10 })
        ));
    }

    #[test]
    fn render_is_deterministic() {
        let scene = mirror_scene(3);
        let parallel = RenderConfig::default();
        let sequential = RenderConfig {
            parallel: false,
            ..RenderConfig::default()
        };
        let first = scene.render(24, 16, &parallel).unwrap();
        let second = scene.render(24, 16, &parallel).unwrap();
        let third = scene.render(24, 16, &sequential).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, third);
    }

    #[test]
    fn single_pixel_image_looks_through_the_center() {
        let scene = mirror_scene(1);
        let image = scene.render(1, 1, &RenderConfig::default()).unwrap();
        assert_relative_eq!(image.get_pixel(0, 0), Color::x_axis(), epsilon = 1e-9);
    }

    #[test]
    fn red_sphere_under_directional_light() {
        let mut builder = Scene::builder();
        builder
            .add_material(
                Material::new("red")
                    .ambient(Color::zero())
                    .diffuse(Color::x_axis())
                    .specular(Color::zero(), 1.0),
            )
            .unwrap();
        builder
            .add_shape(Geometry::sphere(Vec3::zero(), 1.0), "red")
            .unwrap();
        builder.add_light(Light::directional(-Vec3::z_axis(), Color::one()));
        builder.camera(camera_on_z(5.0));
        let scene = builder.build();

        let (width, height) = (33, 33);
        let image = scene.render(width, height, &RenderConfig::default()).unwrap();

        let mut camera = scene.camera().clone();
        camera.setup(width, height);
        let mut covered = 0;
        for j in 0..height {
            for i in 0..width {
                let pixel = image.get_pixel(i, j);
                let ray = camera.pixel_ray(
                    normalized_coordinate(i, width),
                    normalized_coordinate(j, height),
                );
                match scene.intersects(&ray) {
                    Some(isect) => {
                        covered += 1;
                        let brightness = isect.normal.dot(Vec3::z_axis()).max(0.0);
                        assert_relative_eq!(pixel, Color::new(brightness, 0.0, 0.0), epsilon = 1e-9);
                    }
                    None => assert_eq!(pixel, Color::zero()),
                }
            }
        }
        assert!(covered > 0);
        // the view axis hits the sphere head on
        assert_relative_eq!(image.get_pixel(16, 16), Color::x_axis(), epsilon = 1e-9);
        assert_eq!(image.get_pixel(0, 0), Color::zero());
    }
}
