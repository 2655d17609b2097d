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

use super::{MaterialHook, NodeId};
use tarn_core::math::Vec3;
use tarn_core::renderer::{BufferId, IndexFormat, PrimitiveTopology, TextureId, VertexAttribute};

/// An uploaded index buffer and how to read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexBuffer {
    /// The device buffer.
    pub buffer: BufferId,
    /// Element width.
    pub format: IndexFormat,
    /// Number of indices.
    pub count: u32,
}

/// The device buffers a node owns.
///
/// Every stream is optional; only `positions` is required to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeGeometry {
    /// `vec3` positions.
    pub positions: Option<BufferId>,
    /// `vec3` normals.
    pub normals: Option<BufferId>,
    /// Vertex colors.
    pub colors: Option<BufferId>,
    /// `vec2` texture coordinates.
    pub tex_coords: Option<BufferId>,
    /// Index buffer. Without one the node draws as an array.
    pub indices: Option<IndexBuffer>,
    /// Number of vertices in the attribute streams.
    pub vertex_count: u32,
}

impl NodeGeometry {
    /// Returns the buffer bound to `attribute`, if any.
    pub fn attribute(&self, attribute: VertexAttribute) -> Option<BufferId> {
        match attribute {
            VertexAttribute::Position => self.positions,
            VertexAttribute::Normal => self.normals,
            VertexAttribute::Color => self.colors,
            VertexAttribute::TexCoord => self.tex_coords,
        }
    }

    /// Every buffer this geometry owns.
    pub fn buffers(&self) -> Vec<BufferId> {
        [self.positions, self.normals, self.colors, self.tex_coords]
            .into_iter()
            .flatten()
            .chain(self.indices.map(|i| i.buffer))
            .collect()
    }

    /// Returns `true` if no buffer has been uploaded.
    pub fn is_empty(&self) -> bool {
        self.buffers().is_empty()
    }
}

/// A positioned, renderable item in the scene graph.
///
/// Hierarchy links live here but are maintained by
/// [`SceneGraph`](super::SceneGraph): `parent` is an arena handle, never an
/// owning pointer.
#[derive(Debug)]
pub struct SceneNode {
    /// Debug name, also the registry key.
    pub name: String,
    /// Translation relative to the parent.
    pub position: Vec3,
    /// Rotation about the up axis, degrees.
    pub yaw: f32,
    /// Owned device buffers.
    pub geometry: NodeGeometry,
    /// Primary texture, sampled on unit 0.
    pub texture: Option<TextureId>,
    /// Secondary texture (normal map), sampled on unit 1.
    pub secondary_texture: Option<TextureId>,
    /// Disabled nodes and their subtrees are never drawn.
    pub enabled: bool,
    /// Upload light uniforms before drawing.
    pub use_lighting: bool,
    /// Upload fog uniforms before drawing.
    pub use_fog: bool,
    /// Shader class used when this node is drawn as a child.
    pub shader: String,
    flip_yaw: bool,
    topology: PrimitiveTopology,
    topology_override: Option<PrimitiveTopology>,
    hook: Option<Box<dyn MaterialHook>>,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
}

impl SceneNode {
    /// Creates an enabled node at the origin drawn as a triangle list.
    pub fn new(name: impl Into<String>, shader: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vec3::ZERO,
            yaw: 0.0,
            geometry: NodeGeometry::default(),
            texture: None,
            secondary_texture: None,
            enabled: true,
            use_lighting: false,
            use_fog: false,
            shader: shader.into(),
            flip_yaw: false,
            topology: PrimitiveTopology::TriangleList,
            topology_override: None,
            hook: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Sets the topology (builder form).
    pub fn with_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.set_render_mode(topology);
        self
    }

    /// Sets the node's own topology. An active override stays in effect.
    pub fn set_render_mode(&mut self, topology: PrimitiveTopology) {
        self.topology = topology;
    }

    /// Forces a topology for debugging until cleared.
    pub fn set_render_mode_override(&mut self, topology: PrimitiveTopology) {
        self.topology_override = Some(topology);
    }

    /// Restores the node's own topology.
    pub fn clear_render_mode_override(&mut self) {
        self.topology_override = None;
    }

    /// The topology draws use: the override if set, otherwise the node's own.
    pub fn topology(&self) -> PrimitiveTopology {
        self.topology_override.unwrap_or(self.topology)
    }

    /// The node's own topology, ignoring any override.
    pub fn base_topology(&self) -> PrimitiveTopology {
        self.topology
    }

    /// Turns the node around by 180 degrees at render time.
    pub fn set_flip_yaw(&mut self, flip: bool) {
        self.flip_yaw = flip;
    }

    /// The yaw applied when rendering, including the flip offset.
    pub fn render_yaw(&self) -> f32 {
        if self.flip_yaw {
            self.yaw + 180.0
        } else {
            self.yaw
        }
    }

    /// Attaches a per-frame material hook.
    pub fn set_hook(&mut self, hook: Box<dyn MaterialHook>) {
        self.hook = Some(hook);
    }

    /// The material hook, if any.
    pub fn hook(&self) -> Option<&dyn MaterialHook> {
        self.hook.as_deref()
    }

    /// Mutable access to the material hook.
    pub fn hook_mut(&mut self) -> Option<&mut (dyn MaterialHook + 'static)> {
        self.hook.as_deref_mut()
    }

    /// The parent handle, or `None` for a root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child handles in attachment order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Returns `true` if the node may be dequeued as a render root.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_is_reversible() {
        let mut node =
            SceneNode::new("terrain", "base").with_topology(PrimitiveTopology::TriangleStrip);
        node.set_render_mode_override(PrimitiveTopology::LineList);
        assert_eq!(node.topology(), PrimitiveTopology::LineList);
        assert_eq!(node.base_topology(), PrimitiveTopology::TriangleStrip);

        node.clear_render_mode_override();
        assert_eq!(node.topology(), PrimitiveTopology::TriangleStrip);
    }

    #[test]
    fn flip_yaw_does_not_touch_yaw() {
        let mut node = SceneNode::new("tank", "base");
        node.yaw = 30.0;
        node.set_flip_yaw(true);
        assert_eq!(node.render_yaw(), 210.0);
        assert_eq!(node.yaw, 30.0);
    }

    #[test]
    fn geometry_lists_owned_buffers() {
        let geometry = NodeGeometry {
            positions: Some(BufferId(1)),
            colors: Some(BufferId(2)),
            indices: Some(IndexBuffer {
                buffer: BufferId(3),
                format: IndexFormat::Uint16,
                count: 6,
            }),
            vertex_count: 4,
            ..Default::default()
        };
        assert_eq!(
            geometry.buffers(),
            vec![BufferId(1), BufferId(2), BufferId(3)]
        );
        assert_eq!(geometry.attribute(VertexAttribute::Normal), None);
        assert!(NodeGeometry::default().is_empty());
    }
}
