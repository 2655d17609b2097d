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

//! Draws one scene node and, through it, its subtree.

use super::{FrameStats, PassError};
use tarn_core::math::{Mat4, TransformStack};
use tarn_core::renderer::{
    ClipPlane, GraphicsDevice, ShaderHandle, UniformValue, VertexAttribute,
};
use tarn_data::assets::ShaderRegistry;
use tarn_data::scene::SceneNode;
use tarn_data::{Environment, NodeId, SceneError, SceneGraph};

const OPTIONAL_ATTRIBUTES: [VertexAttribute; 3] = [
    VertexAttribute::Normal,
    VertexAttribute::Color,
    VertexAttribute::TexCoord,
];

/// Everything a pass shares across its node draws.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// The node arena.
    pub graph: &'a SceneGraph,
    /// Shader classes by name.
    pub shaders: &'a ShaderRegistry,
    /// Lights, fog and water level.
    pub environment: &'a Environment,
    /// Camera view for this pass.
    pub view: Mat4,
    /// Camera projection for this pass.
    pub projection: Mat4,
    /// Clip plane active for this pass, if any.
    pub clip_plane: Option<ClipPlane>,
}

/// Walks node subtrees with a transform stack.
#[derive(Debug, Default)]
pub struct NodeRenderer {
    stack: TransformStack,
}

impl NodeRenderer {
    /// Creates a renderer with an identity model transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stack depth. Zero between root draws.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Draws `root` with `shader` and then every enabled descendant with its
    /// own shader class.
    ///
    /// Per-node failures are logged and counted in `stats`; the walk carries on
    /// with the remaining nodes.
    pub fn render(
        &mut self,
        device: &mut dyn GraphicsDevice,
        ctx: &RenderContext<'_>,
        root: NodeId,
        shader: &str,
        stats: &mut FrameStats,
    ) {
        let Some(node) = ctx.graph.get(root) else {
            log::warn!("Queued node {:?} is not in the scene graph", root);
            stats.failed_draws += 1;
            return;
        };
        if !node.enabled {
            stats.nodes_skipped += 1;
            return;
        }

        self.stack.push();
        self.stack.translate(node.position);
        self.stack.rotate_y_degrees(node.render_yaw());

        match self.draw_node(device, ctx, node, shader) {
            Ok(()) => {
                stats.draw_calls += 1;
                stats.nodes_drawn += 1;
            }
            Err(e) => {
                log::error!("Failed to draw '{}': {}", node.name, e);
                stats.failed_draws += 1;
            }
        }

        for &child in node.children() {
            let child_shader = match ctx.graph.get(child) {
                Some(c) => c.shader.as_str(),
                None => continue,
            };
            self.render(device, ctx, child, child_shader, stats);
        }

        self.stack.pop();
    }

    fn draw_node(
        &self,
        device: &mut dyn GraphicsDevice,
        ctx: &RenderContext<'_>,
        node: &SceneNode,
        shader_name: &str,
    ) -> Result<(), PassError> {
        let positions = node
            .geometry
            .positions
            .ok_or_else(|| SceneError::MissingPositionBuffer {
                node: node.name.clone(),
            })?;
        let shader = ctx
            .shaders
            .get(shader_name)
            .ok_or_else(|| SceneError::UnknownShader(shader_name.to_owned()))?;

        device.use_shader(shader.id)?;
        self.upload_uniforms(device, ctx, node);
        if let Some(hook) = node.hook() {
            hook.apply(device, ctx.environment);
        }

        device.bind_attribute(VertexAttribute::Position, positions)?;
        bind_optional_attributes(device, node, &shader)?;

        if let Some(texture) = node.texture {
            device.bind_texture(0, texture)?;
            device.set_uniform("u_Sampler", UniformValue::Int(0));
        }
        match node.secondary_texture {
            Some(normal_map) => {
                device.bind_texture(1, normal_map)?;
                device.set_uniform("u_NormalSampler", UniformValue::Int(1));
                device.set_uniform("u_UseNormalMapping", UniformValue::Bool(true));
            }
            None => device.set_uniform("u_UseNormalMapping", UniformValue::Bool(false)),
        }

        let topology = node.topology();
        match node.geometry.indices {
            Some(indices) => {
                device.draw_indexed(topology, indices.buffer, indices.format, indices.count)?
            }
            None => device.draw(topology, 0, node.geometry.vertex_count)?,
        }
        Ok(())
    }

    fn upload_uniforms(
        &self,
        device: &mut dyn GraphicsDevice,
        ctx: &RenderContext<'_>,
        node: &SceneNode,
    ) {
        device.set_uniform("u_ProjectionMatrix", UniformValue::Mat4(ctx.projection));
        device.set_uniform(
            "u_ModelViewMatrix",
            UniformValue::Mat4(ctx.view * self.stack.current()),
        );

        match ctx.clip_plane {
            Some(plane) => {
                device.set_uniform("u_UseClipPlane", UniformValue::Bool(true));
                device.set_uniform("u_ClipPlane", UniformValue::Vec4(plane.as_vec4()));
            }
            None => device.set_uniform("u_UseClipPlane", UniformValue::Bool(false)),
        }

        let env = ctx.environment;
        device.set_uniform("u_UseLighting", UniformValue::Bool(node.use_lighting));
        if node.use_lighting {
            for (i, light) in env.lights.iter().enumerate() {
                let slot = format!("u_Light{i}");
                device.set_uniform(&format!("{slot}Enabled"), UniformValue::Bool(light.enabled));
                device.set_uniform(&format!("{slot}Position"), UniformValue::Vec3(light.direction));
                device.set_uniform(&format!("{slot}Ambient"), UniformValue::Vec4(light.ambient));
                device.set_uniform(&format!("{slot}Diffuse"), UniformValue::Vec4(light.diffuse));
                device.set_uniform(&format!("{slot}Specular"), UniformValue::Vec4(light.specular));
            }
            device.set_uniform("u_Shininess", UniformValue::Float(env.shininess));
        }

        device.set_uniform("u_UseFog", UniformValue::Bool(node.use_fog));
        if node.use_fog {
            device.set_uniform("u_FogColor", UniformValue::Vec4(env.fog.color));
            device.set_uniform("u_FogNear", UniformValue::Float(env.fog.near));
            device.set_uniform("u_FogFar", UniformValue::Float(env.fog.far));
        }
    }
}

/// Binds the streams the node has and the shader reads. Anything else is
/// skipped.
fn bind_optional_attributes(
    device: &mut dyn GraphicsDevice,
    node: &SceneNode,
    shader: &ShaderHandle,
) -> Result<(), PassError> {
    for attribute in OPTIONAL_ATTRIBUTES {
        if !shader.capabilities.supports(attribute) {
            continue;
        }
        if let Some(buffer) = node.geometry.attribute(attribute) {
            device.bind_attribute(attribute, buffer)?;
        }
    }
    Ok(())
}
