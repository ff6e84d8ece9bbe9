use std::sync::Arc;

use image::RgbImage;

use super::error::{SceneError, SceneResult};
use super::math::{Color, Vec3};

const CHECKER_BIAS: f64 = 1e-9;

/// Surface color modulation applied on top of the ambient and diffuse coefficients.
#[derive(Debug, Clone)]
pub enum Texture {
    /// Solid 3D checkerboard evaluated at the local hit point.
    Checker { size: f64, even: Color, odd: Color },
    /// Bitmap sampled at the (u, v) surface coordinates, nearest texel.
    Image { path: String, pixels: Arc<RgbImage> },
}

impl Texture {
    pub fn checker(size: f64, even: Color, odd: Color) -> Texture {
        Texture::Checker { size, even, odd }
    }

    pub fn load(path: &str) -> SceneResult<Texture> {
        let pixels = image::open(path)
            .map_err(|err| SceneError::TextureLoad {
                path: path.to_string(),
                reason: err.to_string(),
            })?
            .to_rgb8();
        Ok(Texture::from_image(path, pixels))
    }

    pub fn from_image(path: &str, pixels: RgbImage) -> Texture {
        Texture::Image {
            path: path.to_string(),
            pixels: Arc::new(pixels),
        }
    }

    pub fn sample(&self, uv: (f64, f64), local_point: Vec3) -> Color {
        match self {
            Texture::Checker { size, even, odd } => {
                // surfaces lying on a cell boundary (the y = -1 floor) fall
                // consistently in the cell above it
                let cell_of = |coordinate: f64| (coordinate / size + CHECKER_BIAS).floor();
                let cell = cell_of(local_point.x) + cell_of(local_point.y) + cell_of(local_point.z);
                if (cell as i64).rem_euclid(2) == 0 {
                    *even
                } else {
                    *odd
                }
            }
            Texture::Image { pixels, .. } => {
                let (width, height) = pixels.dimensions();
                if width == 0 || height == 0 {
                    return Color::one();
                }
                let u = uv.0.rem_euclid(1.0);
                let v = uv.1.rem_euclid(1.0);
                // image rows go top to bottom while v grows upward
                let x = ((u * width as f64) as u32).min(width - 1);
                let y = (((1.0 - v) * height as f64) as u32).min(height - 1);
                let [r, g, b] = pixels.get_pixel(x, y).0;
                Color::new(r as f64, g as f64, b as f64) / 255.0
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    /// ambient reflectance
    pub ka: Color,
    /// diffuse reflectance
    pub kd: Color,
    /// specular reflectance
    pub ks: Color,
    /// weight of the mirror reflection
    pub kr: Color,
    /// transmission: tints shadows and weights the refracted ray
    pub kt: Color,
    pub shininess: f64,
    pub ior: Option<f64>,
    pub texture: Option<Texture>,
}

impl Default for Material {
    fn default() -> Self {
        Material::new(Material::DEFAULT_NAME)
    }
}

impl Material {
    pub const DEFAULT_NAME: &'static str = "default";

    pub fn new(name: impl Into<String>) -> Material {
        Material {
            name: name.into(),
            ka: Color::zero(),
            kd: Color::splat(0.8),
            ks: Color::zero(),
            kr: Color::zero(),
            kt: Color::zero(),
            shininess: 1.0,
            ior: None,
            texture: None,
        }
    }

    pub fn ambient(mut self, ka: Color) -> Self {
        self.ka = ka;
        self
    }

    pub fn diffuse(mut self, kd: Color) -> Self {
        self.kd = kd;
        self
    }

    pub fn specular(mut self, ks: Color, shininess: f64) -> Self {
        self.ks = ks;
        self.shininess = shininess;
        self
    }

    pub fn reflective(mut self, kr: Color) -> Self {
        self.kr = kr;
        self
    }

    pub fn transmissive(mut self, kt: Color) -> Self {
        self.kt = kt;
        self
    }

    pub fn refraction_index(mut self, ior: f64) -> Self {
        self.ior = Some(ior);
        self
    }

    pub fn texture(mut self, texture: Texture) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn is_reflective(&self) -> bool {
        !self.kr.is_zero()
    }

    pub fn is_refractive(&self) -> bool {
        !self.kt.is_zero() && self.ior.is_some()
    }

    /// Texture color at a surface point, white when the material is untextured.
    pub fn surface_color(&self, uv: (f64, f64), local_point: Vec3) -> Color {
        self.texture
            .as_ref()
            .map_or(Color::one(), |texture| texture.sample(uv, local_point))
    }

    pub fn validate(&self) -> SceneResult<()> {
        let invalid = |reason: &str| SceneError::InvalidMaterial {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        for (label, coefficient) in [
            ("ka", self.ka),
            ("kd", self.kd),
            ("ks", self.ks),
            ("kr", self.kr),
            ("kt", self.kt),
        ] {
            if !coefficient.is_finite() || coefficient.min_component() < 0.0 {
                return Err(invalid(&format!("{label} must be non-negative")));
            }
        }
        if self.shininess.is_nan() || self.shininess < 0.0 {
            return Err(invalid("shininess must be non-negative"));
        }
        if let Some(ior) = self.ior {
            if ior.is_nan() || ior <= 0.0 {
                return Err(invalid("index of refraction must be positive"));
            }
        }
        if let Some(Texture::Checker { size, .. }) = &self.texture {
            if size.is_nan() || *size <= 0.0 {
                return Err(invalid("checker size must be positive"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use image::Rgb;

    use super::*;

    #[test]
    fn negative_coefficients_are_rejected() {
        let material = Material::new("bad").diffuse(Color::new(1.0, -0.1, 0.0));
        assert!(matches!(
            material.validate(),
            Err(SceneError::InvalidMaterial { .. })
        ));
        let material = Material::new("bad").specular(Color::one(), -2.0);
        assert!(material.validate().is_err());
        assert!(Material::default().validate().is_ok());
    }

    #[test]
    fn refraction_needs_transmission_and_index() {
        let glass = Material::new("glass").transmissive(Color::one());
        assert!(!glass.is_refractive());
        assert!(glass.refraction_index(1.5).is_refractive());
    }

    #[test]
    fn checker_alternates_cells() {
        let texture = Texture::checker(1.0, Color::one(), Color::zero());
        assert_eq!(texture.sample((0.0, 0.0), Vec3::new(0.5, 0.5, 0.5)), Color::one());
        assert_eq!(texture.sample((0.0, 0.0), Vec3::new(1.5, 0.5, 0.5)), Color::zero());
        assert_eq!(texture.sample((0.0, 0.0), Vec3::new(-0.5, 0.5, 0.5)), Color::zero());
    }

    #[test]
    fn checker_is_stable_on_a_cell_boundary() {
        let texture = Texture::checker(1.0, Color::one(), Color::zero());
        let reference = texture.sample((0.0, 0.0), Vec3::new(0.5, -1.0, 0.5));
        for noise in [-1e-13, -1e-15, 0.0, 1e-15, 1e-13] {
            let point = Vec3::new(0.5, -1.0 + noise, 0.5);
            assert_eq!(texture.sample((0.0, 0.0), point), reference);
        }
    }

    #[test]
    fn checker_floor_hits_sample_the_cell_under_them() {
        use crate::raytracing::math::{Mat4, Ray};
        use crate::raytracing::shape::{Geometry, Shape};

        let texture = Texture::checker(1.0, Color::one(), Color::zero());
        let floor = Shape::new(
            Geometry::plane(Vec3::y_axis(), -1.0),
            Arc::new(Material::new("floor").texture(texture.clone())),
            Mat4::identity(),
        )
        .expect("valid plane");

        let eye = Vec3::new(0.0, 1.5, 7.0);
        let mut checked = 0;
        for i in 0..100 {
            for j in 0..100 {
                let target = Vec3::new(-8.0 + 0.163 * i as f64, -1.0, -9.0 + 0.171 * j as f64);
                let ray = Ray::new(eye, target - eye);
                let Some(isect) = floor.intersect(&ray, 1e-5) else {
                    continue;
                };
                let (fx, fz) = (isect.point.x.rem_euclid(1.0), isect.point.z.rem_euclid(1.0));
                // stay clear of the x and z cell edges
                if !(0.05..0.95).contains(&fx) || !(0.05..0.95).contains(&fz) {
                    continue;
                }
                let parity = (isect.point.x.floor() + isect.point.z.floor() - 1.0) as i64;
                let expected = if parity.rem_euclid(2) == 0 {
                    Color::one()
                } else {
                    Color::zero()
                };
                assert_eq!(isect.material().surface_color(isect.uv, isect.local_point), expected);
                checked += 1;
            }
        }
        assert!(checked > 1000);
    }

    #[test]
    fn image_texture_samples_nearest_texel() {
        let pixels = RgbImage::from_fn(2, 2, |x, y| {
            if y == 0 {
                Rgb([255, 0, 0])
            } else if x == 0 {
                Rgb([0, 255, 0])
            } else {
                Rgb([0, 0, 255])
            }
        });
        let texture = Texture::from_image("memory", pixels);
        // v = 0.9 is the top row of the bitmap
        assert_eq!(texture.sample((0.2, 0.9), Vec3::zero()), Color::x_axis());
        assert_eq!(texture.sample((0.2, 0.1), Vec3::zero()), Color::y_axis());
        assert_eq!(texture.sample((0.7, 0.1), Vec3::zero()), Color::z_axis());
    }
}
