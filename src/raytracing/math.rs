//! Vectors, matrices, rays and boxes shared by the whole tracer.

pub mod mat4;
pub mod ray;
pub mod vec3;
#[allow(non_snake_case)]
pub mod box3D;

pub use box3D::Box3;
pub use mat4::Mat4;
pub use ray::Ray;
pub use vec3::{Color, Vec3};
