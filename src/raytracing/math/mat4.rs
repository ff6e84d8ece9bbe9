use std::ops;

use super::Vec3;

/// Row major 4x4 affine transformation matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    value: [f64; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Mat4::identity()
    }
}

impl Mat4 {
    pub fn identity() -> Mat4 {
        Mat4 {
            value: [
                1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    pub fn scale(factor: f64) -> Mat4 {
        Mat4::scale_xyz(Vec3::splat(factor))
    }

    /// Non uniform scale along the three axes.
    pub fn scale_xyz(factors: Vec3) -> Mat4 {
        Mat4 {
            value: [
                factors.x, 0.0, 0.0, 0.0, 0.0, factors.y, 0.0, 0.0, 0.0, 0.0, factors.z, 0.0, 0.0,
                0.0, 0.0, 1.0,
            ],
        }
    }

    pub fn translate(offset: Vec3) -> Mat4 {
        Mat4 {
            value: [
                1.0, 0.0, 0.0, offset.x, 0.0, 1.0, 0.0, offset.y, 0.0, 0.0, 1.0, offset.z, 0.0,
                0.0, 0.0, 1.0,
            ],
        }
    }

    /// Counterclockwise rotation of `angle` radians around `axis`.
    pub fn rotate(axis: Vec3, angle: f64) -> Mat4 {
        // https://en.wikipedia.org/wiki/Rotation_matrix#Rotation_matrix_from_axis_and_angle
        let u = axis.normalize();
        let cos_t = angle.cos();
        let sin_t = angle.sin();
        let k = 1.0 - cos_t;
        Mat4 {
            value: [
                cos_t + u.x * u.x * k,
                u.x * u.y * k - u.z * sin_t,
                u.x * u.z * k + u.y * sin_t,
                0.0,
                u.y * u.x * k + u.z * sin_t,
                cos_t + u.y * u.y * k,
                u.y * u.z * k - u.x * sin_t,
                0.0,
                u.z * u.x * k - u.y * sin_t,
                u.z * u.y * k + u.x * sin_t,
                cos_t + u.z * u.z * k,
                0.0,
                0.0,
                0.0,
                0.0,
                1.0,
            ],
        }
    }

    #[inline(always)]
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.value[row * 4 + col]
    }

    // determinant of the 3x3 minor obtained removing a row and a column
    fn minor(&self, row_to_remove: usize, col_to_remove: usize) -> f64 {
        let mut m = [0.0; 9];
        let mut idx = 0;
        for row in (0..4).filter(|r| *r != row_to_remove) {
            for col in (0..4).filter(|c| *c != col_to_remove) {
                m[idx] = self.at(row, col);
                idx += 1;
            }
        }
        m[0] * (m[4] * m[8] - m[5] * m[7]) - m[1] * (m[3] * m[8] - m[5] * m[6])
            + m[2] * (m[3] * m[7] - m[4] * m[6])
    }

    fn cofactor(&self, row: usize, col: usize) -> f64 {
        let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
        sign * self.minor(row, col)
    }

    pub fn determinant(&self) -> f64 {
        (0..4).map(|col| self.at(0, col) * self.cofactor(0, col)).sum()
    }

    /// Inverse through the adjugate, `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<Mat4> {
        let det = self.determinant();
        if det.abs() < 1e-12 || !det.is_finite() {
            return None;
        }

        let mut value = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                // the adjugate is the transposed cofactor matrix
                value[col * 4 + row] = self.cofactor(row, col) / det;
            }
        }
        Some(Mat4 { value })
    }

    pub fn transpose(&self) -> Mat4 {
        let mut value = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                value[col * 4 + row] = self.at(row, col);
            }
        }
        Mat4 { value }
    }

    /// Composition that applies `self` first and `other` after (`other * self`).
    pub fn then(&self, other: &Mat4) -> Mat4 {
        *other * *self
    }

    /// Transforms a point, honoring the translation and the homogeneous divide.
    pub fn apply(&self, v: Vec3) -> Vec3 {
        let x = self.at(0, 0) * v.x + self.at(0, 1) * v.y + self.at(0, 2) * v.z + self.at(0, 3);
        let y = self.at(1, 0) * v.x + self.at(1, 1) * v.y + self.at(1, 2) * v.z + self.at(1, 3);
        let z = self.at(2, 0) * v.x + self.at(2, 1) * v.y + self.at(2, 2) * v.z + self.at(2, 3);
        let w = self.at(3, 0) * v.x + self.at(3, 1) * v.y + self.at(3, 2) * v.z + self.at(3, 3);
        if w == 1.0 || w == 0.0 {
            Vec3::new(x, y, z)
        } else {
            Vec3::new(x / w, y / w, z / w)
        }
    }

    /// Transforms a direction: only the linear part is used.
    pub fn apply_vector(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.at(0, 0) * v.x + self.at(0, 1) * v.y + self.at(0, 2) * v.z,
            self.at(1, 0) * v.x + self.at(1, 1) * v.y + self.at(1, 2) * v.z,
            self.at(2, 0) * v.x + self.at(2, 1) * v.y + self.at(2, 2) * v.z,
        )
    }
}

impl ops::Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut value = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                value[row * 4 + col] = (0..4).map(|k| self.at(row, k) * rhs.at(k, col)).sum();
            }
        }
        Mat4 { value }
    }
}
