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

//! Light, fog and the per-frame shading environment.

use serde::{Deserialize, Serialize};
use tarn_core::math::{Vec3, Vec4};

/// A directional light source.
///
/// `direction` is what the shader receives; `render_position` is only where
/// the light's marker is drawn, so a sun can show its icon somewhere useful.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    /// Direction the light shines along.
    pub direction: Vec3,
    /// Ambient color.
    pub ambient: Vec4,
    /// Diffuse color.
    pub diffuse: Vec4,
    /// Specular color.
    pub specular: Vec4,
    /// Where the light's marker sits in the scene.
    pub render_position: Vec3,
    /// Disabled lights contribute nothing and stop their marker's path.
    pub enabled: bool,
}

impl Default for Light {
    /// A white-ish sun shining down at 45 degrees.
    fn default() -> Self {
        Self {
            direction: Vec3::new(1.0, -1.0, 1.0),
            ambient: Vec4::new(0.4, 0.4, 0.4, 1.0),
            diffuse: Vec4::new(0.7, 0.7, 0.7, 1.0),
            specular: Vec4::new(0.6, 0.6, 0.6, 1.0),
            render_position: Vec3::new(500.0, 500.0, 500.0),
            enabled: true,
        }
    }
}

/// Linear distance fog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fog {
    /// Fog color.
    pub color: Vec4,
    /// Distance at which fog starts.
    pub near: f32,
    /// Distance at which fog is opaque.
    pub far: f32,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            color: Vec4::new(0.8, 0.9, 1.0, 1.0),
            near: 1000.0,
            far: 5000.0,
        }
    }
}

/// Everything a node's shading step reads besides its own state.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    /// Lights, uploaded as `u_Light{i}*`.
    pub lights: Vec<Light>,
    /// Scene fog.
    pub fog: Fog,
    /// Material shininess.
    pub shininess: f32,
    /// Height of the water plane.
    pub water_level: f32,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            lights: vec![Light::default()],
            fog: Fog::default(),
            shininess: 1.0,
            water_level: 0.0,
        }
    }
}
