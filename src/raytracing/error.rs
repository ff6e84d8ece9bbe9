use thiserror::Error;

/// Configuration errors: the scene cannot be built or rendered as described.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("undefined material \"{0}\"")]
    UndefinedMaterial(String),
    #[error("material \"{0}\" is already defined")]
    DuplicateMaterial(String),
    #[error("invalid material \"{name}\": {reason}")]
    InvalidMaterial { name: String, reason: String },
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("the current transformation is not invertible")]
    SingularTransform,
    #[error("cannot pop the base of the transform stack")]
    TransformStackUnderflow,
    #[error("invalid image resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },
    #[error("cannot load model \"{path}\": {reason}")]
    ModelLoad { path: String, reason: String },
    #[error("cannot load texture \"{path}\": {reason}")]
    TextureLoad { path: String, reason: String },
}

pub type SceneResult<T> = Result<T, SceneError>;
