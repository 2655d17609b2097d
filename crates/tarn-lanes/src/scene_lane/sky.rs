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

use crate::primitives::{dome, quad_plane, DomeShape};
use crate::render_lane::{upload_geometry, PassError};
use tarn_core::math::Vec3;
use tarn_core::renderer::{GraphicsDevice, TextureId};
use tarn_data::{NodeId, SceneGraph, SceneNode};

/// Half-extent of the floor quad under the dome.
pub const SKY_FLOOR_SIZE: f32 = 1000.0;

/// Offset from the camera to the dome centre.
pub const SKY_OFFSET: Vec3 = Vec3::new(0.0, -100.0, 0.0);

/// A textured dome and floor that stay centred on the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkyDome {
    /// The dome node.
    pub dome: NodeId,
    /// The floor node.
    pub floor: NodeId,
}

impl SkyDome {
    /// Uploads the dome and floor and adds them to `graph`.
    pub fn build(
        device: &mut dyn GraphicsDevice,
        graph: &mut SceneGraph,
        shape: DomeShape,
        dome_texture: Option<TextureId>,
        floor_texture: Option<TextureId>,
    ) -> Result<Self, PassError> {
        let dome_data = dome(shape);
        let mut dome_node = SceneNode::new("sky_dome", "base").with_topology(dome_data.topology);
        dome_node.geometry = upload_geometry(device, "sky_dome", &dome_data)?;
        dome_node.texture = dome_texture;

        let floor_data = quad_plane(SKY_FLOOR_SIZE, false);
        let mut floor_node = SceneNode::new("sky_floor", "base").with_topology(floor_data.topology);
        floor_node.geometry = upload_geometry(device, "sky_floor", &floor_data)?;
        floor_node.texture = floor_texture;

        Ok(Self {
            dome: graph.add(dome_node),
            floor: graph.add(floor_node),
        })
    }

    /// Moves both nodes to sit just under the camera.
    pub fn follow(&self, graph: &mut SceneGraph, camera_position: Vec3) {
        let position = camera_position + SKY_OFFSET;
        for id in [self.dome, self.floor] {
            if let Some(node) = graph.get_mut(id) {
                node.position = position;
            }
        }
    }
}
