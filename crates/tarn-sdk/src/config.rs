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

//! Engine configuration, loadable from RON.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tarn_core::math::{Vec3, Vec4};
use tarn_core::renderer::PrimitiveTopology;
use tarn_data::{Fog, Light, Projection};
use tarn_lanes::animation_lane::PathSettings;
use tarn_lanes::primitives::DomeShape;
use tarn_lanes::render_lane::TargetCamera;
use tarn_lanes::terrain_lane::IndexWidth;

/// Top-level engine settings. Every field has a default, so a RON file only
/// needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Terrain meshing and regeneration.
    pub terrain: TerrainConfig,
    /// Water plane and its two off-screen passes.
    pub water: WaterConfig,
    /// Starting camera.
    pub camera: CameraConfig,
    /// Scene lights, uploaded as `u_Light0`, `u_Light1`, ...
    pub lights: Vec<Light>,
    /// Distance fog.
    pub fog: Fog,
    /// Material shininess.
    pub shininess: f32,
    /// Clear color of the default framebuffer.
    pub clear_color: Vec4,
    /// Clear color of off-screen targets.
    pub target_clear_color: Vec4,
    /// Sky dome shape.
    pub sky: DomeShape,
    /// Path animator speeds.
    pub paths: PathSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            terrain: TerrainConfig::default(),
            water: WaterConfig::default(),
            camera: CameraConfig::default(),
            lights: vec![Light::default()],
            fog: Fog::default(),
            shininess: 1.0,
            clear_color: Vec4::new(0.8, 0.9, 1.0, 1.0),
            target_clear_color: Vec4::new(0.392, 0.584, 0.929, 1.0),
            sky: DomeShape::default(),
            paths: PathSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Parses a RON document.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        ron::from_str(source).context("Failed to parse engine config")
    }

    /// Reads and parses a RON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        Self::from_ron_str(&source).with_context(|| format!("In config '{}'", path.display()))
    }

    /// Serializes to pretty RON.
    pub fn to_ron_string(&self) -> Result<String> {
        let pretty = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        ron::ser::to_string_pretty(self, pretty).context("Failed to serialize engine config")
    }
}

/// Terrain meshing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// World units per grid cell.
    pub stretch: f32,
    /// Texture repeats across the terrain.
    pub tiling: f32,
    /// Index width policy.
    pub index_width: IndexWidth,
    /// Strip or list indices; other topologies fail when the terrain is meshed.
    pub topology: PrimitiveTopology,
    /// Seed of the fault-line generator used by regeneration.
    pub seed: u64,
    /// Shader class the terrain is drawn with.
    pub shader: String,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            stretch: 8.0,
            tiling: 128.0,
            index_width: IndexWidth::Auto,
            topology: PrimitiveTopology::TriangleStrip,
            seed: 0x7a72,
            shader: "base".to_owned(),
        }
    }
}

/// Water plane settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    /// Height of the water surface.
    pub level: f32,
    /// Side length of the reflection and refraction targets, in pixels.
    pub target_size: u32,
    /// How the reflection pass adapts the camera.
    pub reflection_camera: TargetCamera,
    /// Half-extent of the water quad.
    pub plane_size: f32,
    /// Shader class the water is drawn with.
    pub shader: String,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            level: 0.0,
            target_size: 512,
            reflection_camera: TargetCamera::Reflect,
            plane_size: 1000.0,
            shader: "base".to_owned(),
        }
    }
}

/// Starting camera placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Eye position.
    pub position: Vec3,
    /// Pitch, degrees.
    pub pitch: f32,
    /// Yaw, degrees.
    pub yaw: f32,
    /// Units per unit of forward intent.
    pub walk_speed: f32,
    /// Degrees per unit of turn intent.
    pub turn_speed: f32,
    /// Projection parameters.
    pub projection: Projection,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(-160.0, 440.0, -63.0),
            pitch: 19.0,
            yaw: -128.0,
            walk_speed: 1.0,
            turn_speed: 1.0,
            projection: Projection::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_keep_defaults() {
        let config = EngineConfig::from_ron_str(
            "(terrain: (stretch: 4.0, index_width: Uint32), water: (level: 35.0))",
        )
        .unwrap();
        assert_eq!(config.terrain.stretch, 4.0);
        assert_eq!(config.terrain.index_width, IndexWidth::Uint32);
        assert_eq!(config.terrain.tiling, 128.0);
        assert_eq!(config.water.level, 35.0);
        assert_eq!(config.fog.far, 5000.0);
        assert_eq!(config.camera.yaw, -128.0);
    }

    #[test]
    fn pretty_output_parses_back() {
        let config = EngineConfig::default();
        let text = config.to_ron_string().unwrap();
        assert_eq!(EngineConfig::from_ron_str(&text).unwrap(), config);
    }

    #[test]
    fn bad_documents_report_context() {
        let err = EngineConfig::from_ron_str("(terrain: 5)").unwrap_err();
        assert!(err.to_string().contains("engine config"));
    }

    #[test]
    fn files_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.ron");
        std::fs::write(&path, "(shininess: 8.0)").unwrap();
        assert_eq!(EngineConfig::from_file(&path).unwrap().shininess, 8.0);
        assert!(EngineConfig::from_file(dir.path().join("absent.ron")).is_err());
    }
}
