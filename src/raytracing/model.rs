use std::fs::File;
use std::io::{BufRead, BufReader};

use obj::{load_obj, Obj, Position};

use super::error::{SceneError, SceneResult};
use super::shape::{HitResult, RayHittable};
use super::{Box3, Ray, Vec3};

pub type Triangle = (Vec3, Vec3, Vec3);

impl RayHittable for Triangle {
    fn hit(&self, ray: &Ray, t_min: f64) -> Option<HitResult> {
        // https://en.wikipedia.org/wiki/M%C3%B6ller%E2%80%93Trumbore_intersection_algorithm
        let (v0, v1, v2) = *self;
        let v0v1 = v1 - v0;
        let v0v2 = v2 - v0;
        let ray_cross_e2 = ray.direction.cross(v0v2);
        let determinant = v0v1.dot(ray_cross_e2);
        // ray and triangle are parallel if det is close to 0, relative to the
        // magnitude it would have for a perpendicular ray
        let scale = v0v1.len() * v0v2.len() * ray.direction.len();
        if determinant.abs() <= f64::EPSILON * scale {
            return None;
        }
        let inverse_determinant = 1.0 / determinant;
        let tvec = ray.origin - v0;
        let u = tvec.dot(ray_cross_e2) * inverse_determinant;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(v0v1);
        let v = ray.direction.dot(qvec) * inverse_determinant;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = v0v2.dot(qvec) * inverse_determinant;
        if t < t_min {
            return None;
        }

        Some(HitResult {
            t,
            normal: v0v1.cross(v0v2),
            uv: (u, v),
        })
    }
}

pub fn is_degenerate(triangle: &Triangle) -> bool {
    let (v0, v1, v2) = *triangle;
    (v1 - v0).cross(v2 - v0).is_zero()
}

/// Triangle mesh in the local space of its shape.
#[derive(Debug, Clone)]
pub struct Model {
    triangles: Vec<Triangle>,
    pub bounding_box: Box3,
}

impl Model {
    /// Loads a Wavefront OBJ file.
    pub fn load(path: &str) -> SceneResult<Model> {
        let model_error = |reason: String| SceneError::ModelLoad {
            path: path.to_string(),
            reason,
        };
        let input = BufReader::new(File::open(path).map_err(|err| model_error(err.to_string()))?);
        Model::from_reader(input).map_err(|err| match err {
            SceneError::ModelLoad { reason, .. } => model_error(reason),
            other => other,
        })
    }

    pub fn from_reader(input: impl BufRead) -> SceneResult<Model> {
        // positions only: normals and texture coordinates are optional in OBJ
        let obj: Obj<Position, u32> = load_obj(input).map_err(|err| SceneError::ModelLoad {
            path: String::new(),
            reason: err.to_string(),
        })?;

        let vertex = |i: usize| -> Vec3 { obj.vertices[obj.indices[i] as usize].position.into() };
        let triangles = (0..obj.indices.len() / 3)
            .map(|i| (vertex(i * 3), vertex(i * 3 + 1), vertex(i * 3 + 2)))
            .collect();
        Model::from_triangles(triangles)
    }

    pub fn from_triangles(triangles: Vec<Triangle>) -> SceneResult<Model> {
        let first = triangles
            .first()
            .ok_or_else(|| SceneError::InvalidGeometry("mesh without triangles".to_string()))?;

        let mut bounding_box = Box3::from_single_point(first.0);
        for (v0, v1, v2) in &triangles {
            bounding_box.include(*v0);
            bounding_box.include(*v1);
            bounding_box.include(*v2);
        }

        Ok(Model {
            triangles,
            bounding_box,
        })
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }
}

impl RayHittable for Model {
    fn hit(&self, ray: &Ray, t_min: f64) -> Option<HitResult> {
        // reject the whole mesh when the ray misses its bounding box
        match self.bounding_box.intersect_ray(ray) {
            Some((_, t_exit)) if t_exit >= t_min => {}
            _ => return None,
        }

        let mut closest_hit: Option<HitResult> = None;
        for triangle in &self.triangles {
            if let Some(hit) = triangle.hit(ray, t_min) {
                if closest_hit.map_or(true, |closest| hit.t < closest.t) {
                    closest_hit = Some(hit);
                }
            }
        }
        closest_hit
    }
}
