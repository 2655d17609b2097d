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

use serde::{Deserialize, Serialize};
use tarn_data::NodeId;

/// Which of a target's two queues an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueueKind {
    /// Drawn first with depth testing off (sky dome, floor).
    NonDepth,
    /// Drawn second with depth testing on.
    Static,
}

impl QueueKind {
    /// Both queues in draw order.
    pub const DRAW_ORDER: [QueueKind; 2] = [QueueKind::NonDepth, QueueKind::Static];

    /// Whether draws from this queue are depth tested.
    pub fn depth_test(self) -> bool {
        matches!(self, QueueKind::Static)
    }
}

/// One queued root and the shader class it is drawn with in this queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    /// The queued node.
    pub node: NodeId,
    /// Shader class used for the root draw.
    pub shader: String,
}

/// Nodes keyed by identity. Re-queuing a node replaces its shader class and
/// keeps its slot.
#[derive(Debug, Clone, Default)]
pub struct RenderQueue {
    entries: Vec<QueueEntry>,
}

impl RenderQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `node` with `shader`. Returns `false` if the node was already
    /// queued.
    pub fn insert(&mut self, node: NodeId, shader: impl Into<String>) -> bool {
        let shader = shader.into();
        match self.entries.iter_mut().find(|e| e.node == node) {
            Some(entry) => {
                entry.shader = shader;
                false
            }
            None => {
                self.entries.push(QueueEntry { node, shader });
                true
            }
        }
    }

    /// Removes `node` from the queue.
    pub fn remove(&mut self, node: NodeId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.node != node);
        self.entries.len() != before
    }

    /// Returns `true` if `node` is queued.
    pub fn contains(&self, node: NodeId) -> bool {
        self.entries.iter().any(|e| e.node == node)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }

    /// Number of queued nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
