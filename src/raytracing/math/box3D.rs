use super::{Ray, Vec3};

#[derive(Debug, Clone, Copy)]
pub struct Box3 {
    pub center: Vec3,
    pub half_extension: Vec3,
}

impl Box3 {
    pub fn from_single_point(point: Vec3) -> Box3 {
        Box3 {
            center: point,
            half_extension: Vec3::zero(),
        }
    }

    pub fn from_min_max(min: Vec3, max: Vec3) -> Box3 {
        Box3 {
            center: (min + max) * 0.5,
            half_extension: (max - min) * 0.5,
        }
    }

    /// Grows the box so that it contains `point`.
    pub fn include(&mut self, point: Vec3) {
        let min = self.min();
        let max = self.max();
        let min = Vec3::new(min.x.min(point.x), min.y.min(point.y), min.z.min(point.z));
        let max = Vec3::new(max.x.max(point.x), max.y.max(point.y), max.z.max(point.z));
        *self = Box3::from_min_max(min, max);
    }

    #[inline(always)]
    pub fn contains(&self, point: Vec3) -> bool {
        let dist = point - self.center;
        (dist.x >= -self.half_extension.x && dist.x <= self.half_extension.x)
            && (dist.y >= -self.half_extension.y && dist.y <= self.half_extension.y)
            && (dist.z >= -self.half_extension.z && dist.z <= self.half_extension.z)
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extension
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extension
    }

    /// Slab test: returns the parametric interval `(t_enter, t_exit)` in which the
    /// ray line is inside the box, `None` when it misses or the box is behind.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f64, f64)> {
        let relative_min_box = self.min() - ray.origin;
        let relative_max_box = self.max() - ray.origin;

        let mut tmin = f64::NEG_INFINITY;
        let mut tmax = f64::INFINITY;
        for (direction, low, high) in [
            (ray.direction.x, relative_min_box.x, relative_max_box.x),
            (ray.direction.y, relative_min_box.y, relative_max_box.y),
            (ray.direction.z, relative_min_box.z, relative_max_box.z),
        ] {
            if direction == 0.0 {
                // parallel to the slab: either always inside it or never
                if low > 0.0 || high < 0.0 {
                    return None;
                }
                continue;
            }
            let t1 = low / direction;
            let t2 = high / direction;
            tmin = tmin.max(t1.min(t2));
            tmax = tmax.min(t1.max(t2));
        }

        // if tmax < 0, ray (line) is intersecting AABB, but the whole AABB is behind us
        if tmax < 0.0 {
            return None;
        }
        // if tmin > tmax, ray doesn't intersect AABB
        if tmin > tmax {
            return None;
        }
        Some((tmin, tmax))
    }

    /// Outward normal of the face closest to a point on the surface.
    pub fn face_normal(&self, point: Vec3) -> Vec3 {
        let local = point - self.center;
        let scaled = Vec3::new(
            local.x / self.half_extension.x.max(f64::MIN_POSITIVE),
            local.y / self.half_extension.y.max(f64::MIN_POSITIVE),
            local.z / self.half_extension.z.max(f64::MIN_POSITIVE),
        );
        let (ax, ay, az) = (scaled.x.abs(), scaled.y.abs(), scaled.z.abs());
        if ax >= ay && ax >= az {
            Vec3::new(scaled.x.signum(), 0.0, 0.0)
        } else if ay >= az {
            Vec3::new(0.0, scaled.y.signum(), 0.0)
        } else {
            Vec3::new(0.0, 0.0, scaled.z.signum())
        }
    }
}
