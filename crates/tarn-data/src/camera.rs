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

//! The Euler-angle fly camera.

use serde::{Deserialize, Serialize};
use tarn_core::math::{degrees_to_radians, wrap_angle, Mat4, Vec3};

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Vertical field of view, in degrees.
    pub fov_y_degrees: f32,
    /// Width divided by height.
    pub aspect_ratio: f32,
    /// Near clipping distance.
    pub z_near: f32,
    /// Far clipping distance.
    pub z_far: f32,
}

impl Projection {
    /// Builds the projection matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh_zo(
            degrees_to_radians(self.fov_y_degrees),
            self.aspect_ratio,
            self.z_near,
            self.z_far,
        )
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            aspect_ratio: 1.0,
            z_near: 0.1,
            z_far: 6000.0,
        }
    }
}

/// How the view is adapted for an off-screen pass.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum CameraMode {
    /// The camera as the user flies it.
    #[default]
    Normal,
    /// Pitch zeroed and roll forced to 180 degrees, flipping the view vertically.
    Reflect,
    /// A true mirror about the horizontal plane at the given height: the eye
    /// is reflected below the plane and pitch is negated.
    Mirror(f32),
}

/// One frame's worth of movement input.
///
/// Axis fields are in `[-1, 1]`; a keyboard produces `-1`, `0` or `1`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementIntent {
    /// Positive moves forward.
    pub forward: f32,
    /// Positive strafes right.
    pub strafe: f32,
    /// Positive turns left.
    pub turn: f32,
    /// Positive pitches down.
    pub pitch: f32,
    /// Positive flies up.
    pub ascend: f32,
    /// Change to walk speed.
    pub speed_delta: i32,
}

impl MovementIntent {
    /// Returns `true` if the intent moves nothing.
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// The viewer: a position plus pitch/yaw/roll in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye position.
    pub position: Vec3,
    /// Rotation about the local right axis, degrees.
    pub pitch: f32,
    /// Rotation about the up axis, degrees.
    pub yaw: f32,
    /// Rotation about the view axis, degrees.
    pub roll: f32,
    /// Units moved per unit of intent.
    pub walk_speed: f32,
    /// Degrees turned per unit of intent.
    pub turn_speed: f32,
    /// Projection parameters.
    pub projection: Projection,
    view: Mat4,
    projection_matrix: Mat4,
}

impl Camera {
    /// Creates a camera at `position` facing down `-Z`.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            pitch: 0.0,
            yaw: 0.0,
            roll: 0.0,
            walk_speed: 1.0,
            turn_speed: 1.0,
            projection: Projection::default(),
            view: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
        }
    }

    /// Sets pitch and yaw, in degrees.
    pub fn set_rotation(&mut self, pitch: f32, yaw: f32) {
        self.pitch = pitch;
        self.yaw = yaw;
    }

    /// Rebuilds the view and projection matrices.
    ///
    /// The view is `Rx(pitch) * Ry(360 - yaw) * Rz(roll) * T(-position)`. With
    /// `reflect`, pitch is zeroed and roll forced to 180 degrees.
    pub fn update(&mut self, reflect: bool) {
        let mode = if reflect {
            CameraMode::Reflect
        } else {
            CameraMode::Normal
        };
        self.update_with(mode);
    }

    /// Rebuilds the view and projection matrices for the given mode.
    pub fn update_with(&mut self, mode: CameraMode) {
        let mut eye = self.position;
        let mut pitch = self.pitch;
        let mut roll = self.roll;

        match mode {
            CameraMode::Normal => {}
            CameraMode::Reflect => {
                pitch = 0.0;
                roll = 180.0;
            }
            CameraMode::Mirror(plane) => {
                eye.y = 2.0 * plane - eye.y;
                pitch = -pitch;
            }
        }

        self.view = Mat4::from_rotation_x(degrees_to_radians(pitch))
            * Mat4::from_rotation_y(degrees_to_radians(360.0 - self.yaw))
            * Mat4::from_rotation_z(degrees_to_radians(roll))
            * Mat4::from_translation(-eye);
        self.projection_matrix = self.projection.matrix();
    }

    /// The view matrix from the last update.
    #[inline]
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    /// The projection matrix from the last update.
    #[inline]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    /// Applies one frame of movement input.
    ///
    /// Forward motion follows the yaw heading; strafing follows yaw + 90.
    /// Walk speed never drops below zero and turning keeps yaw in `[0, 360]`.
    pub fn apply_intent(&mut self, intent: &MovementIntent) {
        if intent.speed_delta != 0 {
            self.walk_speed = (self.walk_speed + intent.speed_delta as f32).max(0.0);
        }

        if intent.turn != 0.0 {
            self.yaw = wrap_angle(self.yaw + intent.turn * self.turn_speed);
        }
        self.pitch += intent.pitch * self.turn_speed;

        let (sin_yaw, cos_yaw) = degrees_to_radians(self.yaw).sin_cos();
        let (sin_side, cos_side) = degrees_to_radians(self.yaw + 90.0).sin_cos();

        self.position.x -= sin_yaw * self.walk_speed * intent.forward;
        self.position.z -= cos_yaw * self.walk_speed * intent.forward;

        self.position.x += sin_side * self.walk_speed * intent.strafe;
        self.position.z += cos_side * self.walk_speed * intent.strafe;

        self.position.y += self.walk_speed * intent.ascend;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 100.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn view_moves_eye_to_origin() {
        let mut camera = Camera::new(Vec3::new(10.0, 20.0, 30.0));
        camera.update(false);
        let p = camera.view_matrix().transform_point(Vec3::new(10.0, 20.0, 30.0));
        assert_abs_diff_eq!(p, Vec3::ZERO, epsilon = 1e-4);
    }

    #[test]
    fn reflect_flips_the_up_axis() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.pitch = 30.0;
        camera.update(true);
        let up = camera.view_matrix().transform_point(Vec3::Y);
        assert_abs_diff_eq!(up, -Vec3::Y, epsilon = 1e-4);
    }

    #[test]
    fn mirror_reflects_eye_below_the_plane() {
        let mut camera = Camera::new(Vec3::new(0.0, 80.0, 0.0));
        camera.update_with(CameraMode::Mirror(50.0));
        // The mirrored eye sits at y = 20, so that point maps to the origin.
        let p = camera.view_matrix().transform_point(Vec3::new(0.0, 20.0, 0.0));
        assert_abs_diff_eq!(p, Vec3::ZERO, epsilon = 1e-4);
    }

    #[test]
    fn forward_follows_yaw() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.walk_speed = 2.0;
        camera.apply_intent(&MovementIntent {
            forward: 1.0,
            ..Default::default()
        });
        assert_abs_diff_eq!(camera.position, Vec3::new(0.0, 0.0, -2.0), epsilon = 1e-5);

        camera.yaw = 90.0;
        camera.apply_intent(&MovementIntent {
            forward: 1.0,
            ..Default::default()
        });
        assert_abs_diff_eq!(camera.position, Vec3::new(-2.0, 0.0, -2.0), epsilon = 1e-5);
    }

    #[test]
    fn turning_wraps_yaw_into_a_full_circle() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.turn_speed = 30.0;
        camera.yaw = 350.0;
        camera.apply_intent(&MovementIntent {
            turn: 1.0,
            ..Default::default()
        });
        assert_abs_diff_eq!(camera.yaw, 20.0, epsilon = 1e-4);

        camera.yaw = 10.0;
        camera.apply_intent(&MovementIntent {
            turn: -1.0,
            ..Default::default()
        });
        assert_abs_diff_eq!(camera.yaw, 340.0, epsilon = 1e-4);
    }

    #[test]
    fn strafe_and_ascend() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.apply_intent(&MovementIntent {
            strafe: 1.0,
            ascend: 1.0,
            ..Default::default()
        });
        assert_abs_diff_eq!(camera.position, Vec3::new(1.0, 1.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn walk_speed_is_never_negative() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.apply_intent(&MovementIntent {
            speed_delta: -5,
            ..Default::default()
        });
        assert_eq!(camera.walk_speed, 0.0);
        assert!(MovementIntent::default().is_idle());
    }

    #[test]
    fn update_builds_projection() {
        let mut camera = Camera::default();
        camera.update(false);
        assert_ne!(camera.projection_matrix(), Mat4::IDENTITY);
    }
}
