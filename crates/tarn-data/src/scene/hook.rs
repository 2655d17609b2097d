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

use crate::lighting::Environment;
use std::fmt::Debug;
use tarn_core::renderer::GraphicsDevice;

/// Per-node behaviour run around the node's draw.
///
/// A node is drawn once per pass it is queued in, so state advances in
/// [`tick`](Self::tick), which runs once per frame, and [`apply`](Self::apply)
/// only writes uniforms.
pub trait MaterialHook: Debug {
    /// Advances per-frame state by `delta_ms` milliseconds.
    fn tick(&mut self, _delta_ms: f32) {}

    /// Writes extra uniforms after the node's shader is bound.
    fn apply(&self, device: &mut dyn GraphicsDevice, environment: &Environment);
}
