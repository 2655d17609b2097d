// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A push/pop model-matrix stack for hierarchical rendering.

use super::{degrees_to_radians, Mat4, Vec3};

/// A stack of model matrices.
///
/// The top of the stack is the current model transform. Scene nodes push it,
/// post-multiply their own translation/rotation, render, recurse into their
/// children and pop it again, so a child always inherits its parent's transform.
#[derive(Debug, Clone)]
pub struct TransformStack {
    current: Mat4,
    saved: Vec<Mat4>,
}

impl TransformStack {
    /// Creates a stack whose current transform is the identity.
    pub fn new() -> Self {
        Self {
            current: Mat4::IDENTITY,
            saved: Vec::new(),
        }
    }

    /// Returns the current model transform.
    #[inline]
    pub fn current(&self) -> Mat4 {
        self.current
    }

    /// Saves the current transform so it can be restored by [`pop`](Self::pop).
    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    /// Restores the most recently pushed transform.
    ///
    /// Popping an empty stack resets the current transform to the identity.
    pub fn pop(&mut self) {
        self.current = self.saved.pop().unwrap_or(Mat4::IDENTITY);
    }

    /// Post-multiplies a translation onto the current transform.
    pub fn translate(&mut self, offset: Vec3) {
        self.current = self.current * Mat4::from_translation(offset);
    }

    /// Post-multiplies a rotation about the up-axis, in degrees.
    pub fn rotate_y_degrees(&mut self, degrees: f32) {
        self.current = self.current * Mat4::from_rotation_y(degrees_to_radians(degrees));
    }

    /// Number of saved entries.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn push_pop_restores_the_parent_transform() {
        let mut stack = TransformStack::new();
        stack.translate(Vec3::new(10.0, 0.0, 0.0));
        stack.push();
        stack.translate(Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(
            stack.current().transform_point(Vec3::ZERO),
            Vec3::new(10.0, 2.0, 0.0)
        );
        stack.pop();
        assert_eq!(
            stack.current().transform_point(Vec3::ZERO),
            Vec3::new(10.0, 0.0, 0.0)
        );
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn rotation_is_applied_in_local_space() {
        let mut stack = TransformStack::new();
        stack.translate(Vec3::new(0.0, 0.0, 5.0));
        stack.rotate_y_degrees(90.0);
        let p = stack.current().transform_point(Vec3::Z);
        assert_abs_diff_eq!(p, Vec3::new(1.0, 0.0, 5.0), epsilon = 1e-5);
    }
}
