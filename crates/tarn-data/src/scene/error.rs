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

use super::NodeId;
use tarn_core::renderer::VertexAttribute;

/// Errors raised while building or rendering the scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// A node reached the draw step with no position stream.
    #[error("node '{node}' has no position buffer")]
    MissingPositionBuffer {
        /// Node name.
        node: String,
    },

    /// A node carries geometry its shader cannot consume.
    #[error("shader '{shader}' bound to node '{node}' declares no {attribute:?} attribute")]
    MissingShaderAttribute {
        /// Node name.
        node: String,
        /// Shader class name.
        shader: String,
        /// The attribute the shader is missing.
        attribute: VertexAttribute,
    },

    /// The handle does not name a node in the arena.
    #[error("unknown scene node {0:?}")]
    UnknownNode(NodeId),

    /// No node is registered under this name.
    #[error("no scene node named '{0}'")]
    UnknownNodeName(String),

    /// The child already has a parent.
    #[error("node {child:?} is already parented to {parent:?}")]
    AlreadyParented {
        /// The child being attached.
        child: NodeId,
        /// Its existing parent.
        parent: NodeId,
    },

    /// Attaching would make a node its own ancestor.
    #[error("attaching {child:?} under {parent:?} would form a cycle")]
    WouldCycle {
        /// The prospective parent.
        parent: NodeId,
        /// The prospective child.
        child: NodeId,
    },

    /// No render target is registered under this name.
    #[error("no render target named '{0}'")]
    UnknownTarget(String),

    /// No shader is registered under this class name.
    #[error("no shader registered as '{0}'")]
    UnknownShader(String),

    /// A terrain regeneration is still pending.
    #[error("terrain regeneration already in progress")]
    RegenerationInProgress,

    /// Rendering was requested before every required asset reported loaded.
    #[error("assets not loaded: {}", missing.join(", "))]
    AssetsNotReady {
        /// Names of the assets still outstanding.
        missing: Vec<String>,
    },
}
