use super::error::{SceneError, SceneResult};
use super::{Mat4, Vec3};

/// Nested transformations used while the scene is being built.
///
/// The top of the stack is the cumulative local-to-world transform; the base is
/// the identity and can never be popped.
#[derive(Debug, Clone)]
pub struct TransformStack {
    stack: Vec<Mat4>,
}

impl Default for TransformStack {
    fn default() -> Self {
        TransformStack::new()
    }
}

impl TransformStack {
    pub fn new() -> Self {
        TransformStack {
            stack: vec![Mat4::identity()],
        }
    }

    pub fn peek(&self) -> &Mat4 {
        // the base identity is never removed
        &self.stack[self.stack.len() - 1]
    }

    /// Opens a nested level starting from the current transform.
    pub fn push(&mut self) {
        let top = *self.peek();
        self.stack.push(top);
    }

    pub fn pop(&mut self) -> SceneResult<Mat4> {
        if self.stack.len() == 1 {
            return Err(SceneError::TransformStackUnderflow);
        }
        self.stack.pop().ok_or(SceneError::TransformStackUnderflow)
    }

    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Post-multiplies the top: `m` acts in the local space of the current level.
    pub fn apply(&mut self, m: &Mat4) {
        let last = self.stack.len() - 1;
        self.stack[last] = m.then(&self.stack[last]);
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.apply(&Mat4::translate(offset));
    }

    pub fn scale(&mut self, factors: Vec3) {
        self.apply(&Mat4::scale_xyz(factors));
    }

    pub fn rotate(&mut self, axis: Vec3, angle: f64) {
        self.apply(&Mat4::rotate(axis, angle));
    }
}
