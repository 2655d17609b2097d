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

//! Hot paths that turn scene data into draw calls.
//!
//! - `terrain_lane`: height field to mesh, indices and normals.
//! - `render_lane`: geometry upload, queues, targets and the frame compositor.
//! - `animation_lane`: waypoint paths.
//! - `scene_lane`: the camera-following sky and material hooks.

#![warn(missing_docs)]

pub mod animation_lane;
pub mod geometry;
pub mod primitives;
pub mod render_lane;
pub mod scene_lane;
pub mod terrain_lane;

pub use geometry::GeometryData;
pub use tarn_data::SceneError;
