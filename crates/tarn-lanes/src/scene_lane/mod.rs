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

//! Per-frame scene behaviours: the camera-following sky and material hooks.

mod sky;
mod water;

pub use self::sky::{SkyDome, SKY_FLOOR_SIZE, SKY_OFFSET};
pub use self::water::{WaterScroll, WATER_SCROLL_RATE};

use tarn_data::SceneGraph;

/// Advances every node's material hook once.
pub fn tick_hooks(graph: &mut SceneGraph, delta_ms: f32) {
    for node in graph.iter_mut() {
        if let Some(hook) = node.hook_mut() {
            hook.tick(delta_ms);
        }
    }
}
