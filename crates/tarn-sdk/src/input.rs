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

use tarn_data::MovementIntent;

/// Something that turns raw device input into per-frame movement.
///
/// Key codes and bindings stay behind this trait; the engine only sees the
/// resulting [`MovementIntent`].
pub trait InputSource {
    /// Returns the movement requested since the last poll.
    fn poll_movement_intent(&mut self) -> MovementIntent;
}

/// Replays a fixed list of intents, then idles.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    script: Vec<MovementIntent>,
    cursor: usize,
}

impl ScriptedInput {
    /// Creates a source that yields `script` in order.
    pub fn new(script: Vec<MovementIntent>) -> Self {
        Self { script, cursor: 0 }
    }

    /// Returns `true` once every scripted intent has been polled.
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.script.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll_movement_intent(&mut self) -> MovementIntent {
        let intent = self.script.get(self.cursor).copied().unwrap_or_default();
        self.cursor = (self.cursor + 1).min(self.script.len());
        intent
    }
}
