use log::warn;

use super::math::{Color, Mat4, Ray, Vec3};
use super::shape::ISect;

/// Where the light comes from. A light is either positional or directional,
/// never both.
#[derive(Debug, Clone, Copy)]
pub enum LightSource {
    Point { position: Vec3 },
    /// unit vector along which the light travels
    Directional { direction: Vec3 },
}

#[derive(Debug, Clone)]
pub struct Light {
    pub source: LightSource,
    pub color: Color,
    /// (Kc, Kl, Kq): distance falloff is `1 / (Kc + Kl * D + Kq * D^2)`
    pub attenuation: Vec3,
}

/// Geometry of a light as seen from a surface point.
#[derive(Debug, Clone, Copy)]
pub struct Incidence {
    /// unit vector from the point toward the light
    pub to_light: Vec3,
    /// parametric distance of the light along `to_light`
    pub max_t: f64,
}

impl Light {
    pub fn point(position: Vec3, color: Color) -> Light {
        Light {
            source: LightSource::Point { position },
            color,
            attenuation: Vec3::new(1.0, 0.0, 0.0),
        }
    }

    pub fn directional(direction: Vec3, color: Color) -> Light {
        if direction.is_zero() {
            warn!("directional light with a zero direction never lights a surface");
        }
        Light {
            source: LightSource::Directional {
                direction: direction.normalize(),
            },
            color,
            attenuation: Vec3::new(1.0, 0.0, 0.0),
        }
    }

    pub fn with_attenuation(mut self, constant: f64, linear: f64, quadratic: f64) -> Self {
        self.attenuation = Vec3::new(constant, linear, quadratic);
        self
    }

    pub fn is_directional(&self) -> bool {
        matches!(self.source, LightSource::Directional { .. })
    }

    /// Moves the light into the space described by `m`.
    pub fn transform(&self, m: &Mat4) -> Light {
        let source = match self.source {
            LightSource::Point { position } => LightSource::Point {
                position: m.apply(position),
            },
            LightSource::Directional { direction } => LightSource::Directional {
                direction: m.apply_vector(direction).normalize(),
            },
        };
        Light {
            source,
            ..self.clone()
        }
    }

    pub fn incidence(&self, point: Vec3) -> Incidence {
        match self.source {
            LightSource::Point { position } => {
                let offset = position - point;
                Incidence {
                    to_light: offset.normalize(),
                    max_t: offset.len(),
                }
            }
            LightSource::Directional { direction } => Incidence {
                to_light: -direction,
                max_t: f64::INFINITY,
            },
        }
    }

    /// Distance falloff factor. Directional lights never fall off; a
    /// non-positive denominator means the light is fully attenuated.
    pub fn attenuation_at(&self, distance: f64) -> f64 {
        if self.is_directional() {
            return 1.0;
        }
        let Vec3 {
            x: constant,
            y: linear,
            z: quadratic,
        } = self.attenuation;
        let denominator = constant + linear * distance + quadratic * distance * distance;
        if denominator <= 0.0 || !denominator.is_finite() {
            return 0.0;
        }
        1.0 / denominator
    }

    /// Phong contribution of this light at an intersection.
    ///
    /// `tint` is the fraction of the light reaching the point after shadowing,
    /// it scales the diffuse and specular terms but never the ambient one.
    pub fn compute(&self, isect: &ISect, tint: Color, ray: &Ray) -> Color {
        let material = isect.material();
        let surface = material.surface_color(isect.uv, isect.local_point);

        let ambient = material.ka * surface * self.color;

        let Incidence { to_light, max_t } = self.incidence(isect.point);
        let n_dot_l = isect.normal.dot(to_light);
        if n_dot_l <= 0.0 || tint.is_zero() {
            return ambient;
        }

        let light = self.color * tint * self.attenuation_at(max_t);

        let diffuse = material.kd * surface * light * n_dot_l;

        let reflected = to_light.reflect(isect.normal) * -1.0;
        let to_viewer = -ray.direction.normalize();
        let r_dot_v = reflected.dot(to_viewer).max(0.0);
        let specular = material.ks * light * r_dot_v.powf(material.shininess);

        ambient + diffuse + specular
    }
}
