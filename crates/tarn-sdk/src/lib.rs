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

//! The public-facing SDK for Tarn.
//!
//! [`Engine`] wraps a graphics device together with the scene, the
//! compositor and the asset registries. Applications configure it through
//! [`EngineConfig`], register their assets, then call [`Engine::tick`] once
//! per display refresh.

#![warn(missing_docs)]

pub mod config;
mod engine;
mod input;

pub use config::EngineConfig;
pub use engine::{Engine, HEIGHTMAP_ASSET, REFLECTION_TARGET, REFRACTION_TARGET};
pub use input::{InputSource, ScriptedInput};

/// Everything an application usually needs in one import.
pub mod prelude {
    pub use crate::config::{CameraConfig, EngineConfig, TerrainConfig, WaterConfig};
    pub use crate::{Engine, InputSource, ScriptedInput};
    pub use tarn_core::math::{Vec2, Vec3, Vec4};
    pub use tarn_core::renderer::{
        GraphicsDevice, HeadlessDevice, PrimitiveTopology, ShaderCapabilities,
    };
    pub use tarn_data::{HeightField, Light, MovementIntent, NodeId, SceneError, SceneNode};
    pub use tarn_io::{decode_grayscale, load_grayscale, FaultLineGenerator};
    pub use tarn_lanes::animation_lane::{PathMode, DEFAULT_WAYPOINTS};
    pub use tarn_lanes::render_lane::{FrameStats, QueueKind};
    pub use tarn_lanes::terrain_lane::IndexWidth;
}
