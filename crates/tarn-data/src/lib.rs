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

//! Data owned by the scene: height fields, the scene graph arena, the camera,
//! lighting and the asset registries.
//!
//! Nothing here issues draw calls. The hot paths that consume this data live
//! in `tarn-lanes`.

#![warn(missing_docs)]

pub mod assets;
pub mod camera;
pub mod height_field;
pub mod lighting;
pub mod scene;

pub use camera::{Camera, CameraMode, MovementIntent, Projection};
pub use height_field::HeightField;
pub use lighting::{Environment, Fog, Light};
pub use scene::{NodeId, SceneError, SceneGraph, SceneNode};
