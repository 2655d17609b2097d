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

use tarn_core::renderer::{GraphicsDevice, UniformValue};
use tarn_data::scene::MaterialHook;
use tarn_data::Environment;

/// Phase advance per millisecond.
pub const WATER_SCROLL_RATE: f32 = 0.00003;

/// Scrolls the water distortion and publishes the water level.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WaterScroll {
    phase: f32,
}

impl WaterScroll {
    /// Starts at phase zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase, always in `[0, 1)`.
    pub fn phase(&self) -> f32 {
        self.phase
    }
}

impl MaterialHook for WaterScroll {
    fn tick(&mut self, delta_ms: f32) {
        self.phase = (self.phase + delta_ms * WATER_SCROLL_RATE).rem_euclid(1.0);
    }

    fn apply(&self, device: &mut dyn GraphicsDevice, environment: &Environment) {
        device.set_uniform("u_WaterMovement", UniformValue::Float(self.phase));
        device.set_uniform("u_WaterLevel", UniformValue::Float(environment.water_level));
    }
}
