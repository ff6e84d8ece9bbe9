use std::f64::consts::PI;
use std::sync::Arc;

use super::error::{SceneError, SceneResult};
use super::material::Material;
use super::model::{is_degenerate, Model, Triangle};
use super::{Box3, Mat4, Ray, Vec3};

/// Intersection in the local space of a shape.
#[derive(Debug, Clone, Copy)]
pub struct HitResult {
    pub t: f64,
    /// local normal, not necessarily unit length
    pub normal: Vec3,
    pub uv: (f64, f64),
}

/// Geometry that can be intersected in its own space.
///
/// Implementations return the smallest root `t >= t_min`, or `None` when the
/// ray misses: a miss is an ordinary outcome, never an error.
pub trait RayHittable {
    fn hit(&self, ray: &Ray, t_min: f64) -> Option<HitResult>;
}

#[derive(Debug, Clone)]
pub enum Geometry {
    Sphere { center: Vec3, radius: f64 },
    /// all the points `p` with `normal . p = offset`
    Plane { normal: Vec3, offset: f64 },
    Disk { center: Vec3, normal: Vec3, radius: f64 },
    Cuboid(Box3),
    Triangle(Triangle),
    Mesh(Model),
}

impl Geometry {
    pub fn sphere(center: Vec3, radius: f64) -> Geometry {
        Geometry::Sphere { center, radius }
    }

    pub fn plane(normal: Vec3, offset: f64) -> Geometry {
        Geometry::Plane {
            normal: normal.normalize(),
            offset,
        }
    }

    pub fn disk(center: Vec3, normal: Vec3, radius: f64) -> Geometry {
        Geometry::Disk {
            center,
            normal: normal.normalize(),
            radius,
        }
    }

    pub fn cuboid(min: Vec3, max: Vec3) -> Geometry {
        Geometry::Cuboid(Box3::from_min_max(min, max))
    }

    pub fn triangle(v0: Vec3, v1: Vec3, v2: Vec3) -> Geometry {
        Geometry::Triangle((v0, v1, v2))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Sphere { .. } => "sphere",
            Geometry::Plane { .. } => "plane",
            Geometry::Disk { .. } => "disk",
            Geometry::Cuboid(_) => "box",
            Geometry::Triangle(_) => "triangle",
            Geometry::Mesh(_) => "mesh",
        }
    }

    pub fn validate(&self) -> SceneResult<()> {
        let invalid = |reason: &str| Err(SceneError::InvalidGeometry(reason.to_string()));
        match self {
            Geometry::Sphere { radius, .. } if radius.is_nan() || *radius <= 0.0 => {
                invalid("sphere radius must be positive")
            }
            Geometry::Disk { radius, .. } if radius.is_nan() || *radius <= 0.0 => {
                invalid("disk radius must be positive")
            }
            Geometry::Plane { normal, .. } | Geometry::Disk { normal, .. } if normal.is_zero() => {
                invalid("zero length normal")
            }
            // the plane offset is measured along the normal
            Geometry::Plane { normal, .. } | Geometry::Disk { normal, .. }
                if (normal.len() - 1.0).abs() > 1e-9 =>
            {
                invalid("normal must be unit length")
            }
            Geometry::Cuboid(bbox) if bbox.half_extension.min_component() < 0.0 => {
                invalid("box minimum corner exceeds the maximum one")
            }
            Geometry::Triangle(triangle) if is_degenerate(triangle) => {
                invalid("triangle with collinear vertices")
            }
            _ => Ok(()),
        }
    }
}

// two tangent directions spanning the plane orthogonal to `normal`
fn plane_basis(normal: Vec3) -> (Vec3, Vec3) {
    let helper = if normal.x.abs() > 0.9 {
        Vec3::y_axis()
    } else {
        Vec3::x_axis()
    };
    let tangent = helper.cross(normal).normalize();
    let bitangent = normal.cross(tangent);
    (tangent, bitangent)
}

fn intersect_plane(ray: &Ray, normal: Vec3, offset: f64, t_min: f64) -> Option<f64> {
    let dv = normal.dot(ray.direction);
    if dv.abs() < 1e-12 {
        return None;
    }
    let t = (offset - normal.dot(ray.origin)) / dv;
    if t < t_min {
        return None;
    }
    Some(t)
}

impl RayHittable for Geometry {
    fn hit(&self, ray: &Ray, t_min: f64) -> Option<HitResult> {
        match self {
            Geometry::Sphere { center, radius } => {
                let oc = ray.origin - *center;
                let a = ray.direction.squared_len();
                let half_b = ray.direction.dot(oc);
                let c = oc.squared_len() - radius * radius;
                let discriminant = half_b * half_b - a * c;
                if discriminant < 0.0 || a == 0.0 {
                    return None;
                }

                // nearest root first, the far one when we start inside the sphere
                let sqrt_d = discriminant.sqrt();
                let near = (-half_b - sqrt_d) / a;
                let far = (-half_b + sqrt_d) / a;
                let t = if near >= t_min {
                    near
                } else if far >= t_min {
                    far
                } else {
                    return None;
                };

                let normal = (ray.at(t) - *center) / *radius;
                let u = 0.5 + (-normal.z).atan2(normal.x) / (2.0 * PI);
                let v = 0.5 + normal.y.clamp(-1.0, 1.0).asin() / PI;
                Some(HitResult {
                    t,
                    normal,
                    uv: (u, v),
                })
            }
            Geometry::Plane { normal, offset } => {
                let t = intersect_plane(ray, *normal, *offset, t_min)?;
                let point = ray.at(t);
                let (tangent, bitangent) = plane_basis(*normal);
                Some(HitResult {
                    t,
                    normal: *normal,
                    uv: (point.dot(tangent), point.dot(bitangent)),
                })
            }
            Geometry::Disk {
                center,
                normal,
                radius,
            } => {
                let t = intersect_plane(ray, *normal, normal.dot(*center), t_min)?;
                let relative = ray.at(t) - *center;
                if relative.squared_len() > radius * radius {
                    return None;
                }
                let (tangent, bitangent) = plane_basis(*normal);
                let u = 0.5 + relative.dot(tangent) / (2.0 * radius);
                let v = 0.5 + relative.dot(bitangent) / (2.0 * radius);
                Some(HitResult {
                    t,
                    normal: *normal,
                    uv: (u, v),
                })
            }
            Geometry::Cuboid(bbox) => {
                let (t_enter, t_exit) = bbox.intersect_ray(ray)?;
                let t = if t_enter >= t_min {
                    t_enter
                } else if t_exit >= t_min {
                    t_exit
                } else {
                    return None;
                };

                let point = ray.at(t);
                let normal = bbox.face_normal(point);
                let size = bbox.half_extension * 2.0;
                let relative = point - bbox.min();
                let ratio = |value: f64, extent: f64| if extent > 0.0 { value / extent } else { 0.0 };
                // project on the two axes spanning the hit face
                let uv = if normal.x != 0.0 {
                    (ratio(relative.z, size.z), ratio(relative.y, size.y))
                } else if normal.y != 0.0 {
                    (ratio(relative.x, size.x), ratio(relative.z, size.z))
                } else {
                    (ratio(relative.x, size.x), ratio(relative.y, size.y))
                };
                Some(HitResult { t, normal, uv })
            }
            Geometry::Triangle(triangle) => triangle.hit(ray, t_min),
            Geometry::Mesh(model) => model.hit(ray, t_min),
        }
    }
}

/// A geometry placed in the world with its material.
///
/// The world transform is fixed at construction; the inverse and the matrix used
/// for normals are cached so that rendering never mutates a shape.
#[derive(Debug, Clone)]
pub struct Shape {
    pub geometry: Geometry,
    material: Arc<Material>,
    transform: Mat4,
    inverse: Mat4,
    normal_matrix: Mat4,
}

/// World space intersection record.
#[derive(Debug, Clone, Copy)]
pub struct ISect<'a> {
    pub shape: &'a Shape,
    pub t: f64,
    pub point: Vec3,
    /// unit normal, oriented against the incoming ray
    pub normal: Vec3,
    /// false when the ray hit the surface from the inside
    pub front_face: bool,
    pub local_point: Vec3,
    pub uv: (f64, f64),
}

impl<'a> ISect<'a> {
    pub fn material(&self) -> &'a Material {
        self.shape.material()
    }
}

impl Shape {
    pub fn new(geometry: Geometry, material: Arc<Material>, transform: Mat4) -> SceneResult<Shape> {
        geometry.validate()?;
        let inverse = transform.inverse().ok_or(SceneError::SingularTransform)?;
        Ok(Shape {
            geometry,
            material,
            transform,
            inverse,
            normal_matrix: inverse.transpose(),
        })
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    pub fn intersect(&self, ray: &Ray, epsilon: f64) -> Option<ISect<'_>> {
        let local_ray = ray.transform(&self.inverse);
        let hit = self.geometry.hit(&local_ray, epsilon)?;

        let mut normal = self.normal_matrix.apply_vector(hit.normal).normalize();
        let front_face = ray.direction.dot(normal) <= 0.0;
        if !front_face {
            // reverse the normal when we hit an internal surface
            normal = -normal;
        }

        Some(ISect {
            shape: self,
            t: hit.t,
            point: ray.at(hit.t),
            normal,
            front_face,
            local_point: local_ray.at(hit.t),
            uv: hit.uv,
        })
    }
}
