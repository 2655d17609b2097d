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

//! Provides the mathematics primitives used by the renderer and the scene.
//!
//! Matrices operate in **radians**. Scene-facing angles (camera pitch/yaw,
//! node yaw) are stored in **degrees** and converted at the matrix boundary
//! with [`degrees_to_radians`].

// --- Fundamental Constants ---

/// A small constant for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

pub use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// The factor to convert degrees to radians (PI / 180.0).
pub const DEG_TO_RAD: f32 = PI / 180.0;
/// The factor to convert radians to degrees (180.0 / PI).
pub const RAD_TO_DEG: f32 = 180.0 / PI;

// --- Declare Sub-Modules ---

pub mod matrix;
pub mod transform_stack;
pub mod vector;

// --- Re-export Principal Types ---

pub use self::matrix::Mat4;
pub use self::transform_stack::TransformStack;
pub use self::vector::{Vec2, Vec3, Vec4};

// --- Utility Functions ---

/// Converts an angle from degrees to radians.
///
/// # Examples
///
/// ```
/// use tarn_core::math::{degrees_to_radians, PI};
/// assert_eq!(degrees_to_radians(180.0), PI);
/// ```
#[inline]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * DEG_TO_RAD
}

/// Converts an angle from radians to degrees.
///
/// # Examples
///
/// ```
/// use tarn_core::math::{radians_to_degrees, PI};
/// assert_eq!(radians_to_degrees(PI), 180.0);
/// ```
#[inline]
pub fn radians_to_degrees(radians: f32) -> f32 {
    radians * RAD_TO_DEG
}

/// Wraps an angle in degrees back into `[0, 360]` after a single overflow.
///
/// # Examples
///
/// ```
/// use tarn_core::math::wrap_angle;
/// assert_eq!(wrap_angle(370.0), 10.0);
/// assert_eq!(wrap_angle(-90.0), 270.0);
/// ```
#[inline]
pub fn wrap_angle(degrees: f32) -> f32 {
    if degrees < 0.0 {
        degrees + 360.0
    } else if degrees > 360.0 {
        degrees - 360.0
    } else {
        degrees
    }
}

/// Maps `value` from the `[low, high]` range onto `[0, 1]`.
///
/// A degenerate range (`high == low`) maps everything to `0.0`.
///
/// # Examples
///
/// ```
/// use tarn_core::math::normalize_range;
/// assert_eq!(normalize_range(5.0, 0.0, 10.0), 0.5);
/// assert_eq!(normalize_range(3.0, 3.0, 3.0), 0.0);
/// ```
#[inline]
pub fn normalize_range(value: f32, low: f32, high: f32) -> f32 {
    let span = high - low;
    if span.abs() < EPSILON {
        0.0
    } else {
        (value - low) / span
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn radians_and_degrees_round_trip_the_common_angles() {
        assert_abs_diff_eq!(radians_to_degrees(1.0), 57.30, epsilon = 1e-2);
        assert_abs_diff_eq!(degrees_to_radians(1.0), 0.017, epsilon = 1e-3);
    }

    #[test]
    fn wrap_angle_leaves_in_range_values_untouched() {
        assert_eq!(wrap_angle(180.0), 180.0);
        assert_eq!(wrap_angle(360.0), 360.0);
    }
}
