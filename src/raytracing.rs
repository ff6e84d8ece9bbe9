pub mod camera;
pub mod error;
pub mod image_buffer;
pub mod light;
pub mod material;
pub mod math;
pub mod model;
pub mod presets;
pub mod scene;
pub mod shape;
pub mod transform_stack;

pub use math::*;
