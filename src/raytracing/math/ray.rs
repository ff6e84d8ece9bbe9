use super::{Mat4, Vec3};

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Builds a ray with a normalized direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Ray {
        Ray {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Moves the ray in another space. The direction is left unnormalized so that
    /// the parameter t of a point is the same before and after the transformation.
    pub fn transform(&self, m: &Mat4) -> Ray {
        Ray {
            origin: m.apply(self.origin),
            direction: m.apply_vector(self.direction),
        }
    }
}
