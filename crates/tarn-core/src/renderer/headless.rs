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

//! A [`GraphicsDevice`] that records commands instead of executing them.
//!
//! Used by the runtime when no window is available and by tests that assert on
//! the exact order of device calls issued for a frame.

use crate::math::Vec4;
use crate::renderer::api::*;
use crate::renderer::error::{RenderError, ResourceError};
use crate::renderer::traits::GraphicsDevice;
use std::collections::{HashMap, HashSet};

/// One recorded device call.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    /// A vertex or index buffer was created.
    CreateBuffer {
        /// The new buffer.
        id: BufferId,
        /// Its debug label.
        label: String,
        /// Number of elements uploaded.
        len: usize,
    },
    /// A buffer was released.
    DestroyBuffer(BufferId),
    /// An off-screen target was allocated.
    CreateRenderTarget {
        /// The target label.
        label: String,
        /// The allocated attachments.
        attachments: RenderTargetAttachments,
    },
    /// An off-screen target was released.
    DestroyRenderTarget(FramebufferId),
    /// A framebuffer was bound (`None` is the default framebuffer).
    BindFramebuffer(Option<FramebufferId>),
    /// The viewport changed.
    SetViewport(Viewport),
    /// The bound framebuffer was cleared.
    Clear(Vec4),
    /// Depth testing was toggled.
    SetDepthTest(bool),
    /// A program was made current.
    UseShader(ShaderId),
    /// A uniform was written.
    SetUniform {
        /// Uniform name.
        name: String,
        /// Uniform value.
        value: UniformValue,
    },
    /// An attribute stream was bound.
    BindAttribute {
        /// Which attribute.
        attribute: VertexAttribute,
        /// The source buffer.
        buffer: BufferId,
    },
    /// A texture was bound to a sampler unit.
    BindTexture {
        /// Sampler unit.
        unit: u32,
        /// The texture.
        texture: TextureId,
    },
    /// A non-indexed draw.
    Draw {
        /// Primitive topology.
        topology: PrimitiveTopology,
        /// Vertex count.
        count: u32,
    },
    /// An indexed draw.
    DrawIndexed {
        /// Primitive topology.
        topology: PrimitiveTopology,
        /// The index buffer.
        index_buffer: BufferId,
        /// Index width.
        format: IndexFormat,
        /// Index count.
        count: u32,
    },
}

impl DeviceCommand {
    /// Returns `true` for [`DeviceCommand::Draw`] and [`DeviceCommand::DrawIndexed`].
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            DeviceCommand::Draw { .. } | DeviceCommand::DrawIndexed { .. }
        )
    }
}

/// A recording device with no GPU behind it.
#[derive(Debug)]
pub struct HeadlessDevice {
    surface: (u32, u32),
    next_id: usize,
    buffers: HashSet<BufferId>,
    textures: HashSet<TextureId>,
    shaders: HashMap<String, ShaderId>,
    framebuffers: HashSet<FramebufferId>,
    bound_shader: Option<ShaderId>,
    commands: Vec<DeviceCommand>,
    failing_draws: usize,
    fail_target_allocation: bool,
}

impl HeadlessDevice {
    /// Creates a device whose default framebuffer is `width` x `height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: (width, height),
            next_id: 1,
            buffers: HashSet::new(),
            textures: HashSet::new(),
            shaders: HashMap::new(),
            framebuffers: HashSet::new(),
            bound_shader: None,
            commands: Vec::new(),
            failing_draws: 0,
            fail_target_allocation: false,
        }
    }

    /// Makes the next `count` draw calls fail with [`RenderError::DrawFailed`].
    pub fn fail_next_draws(&mut self, count: usize) {
        self.failing_draws = count;
    }

    /// Makes every subsequent render target allocation fail.
    pub fn fail_target_allocation(&mut self, fail: bool) {
        self.fail_target_allocation = fail;
    }

    /// Every command recorded so far, in issue order.
    pub fn commands(&self) -> &[DeviceCommand] {
        &self.commands
    }

    /// Drains the recorded commands.
    pub fn take_commands(&mut self) -> Vec<DeviceCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of recorded draw calls.
    pub fn draw_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_draw()).count()
    }

    /// Number of buffers that are still alive.
    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    /// Number of render targets that are still alive.
    pub fn live_render_targets(&self) -> usize {
        self.framebuffers.len()
    }

    fn next(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn consume_draw_failure(&mut self) -> Result<(), RenderError> {
        if self.failing_draws > 0 {
            self.failing_draws -= 1;
            return Err(RenderError::DrawFailed("injected failure".to_string()));
        }
        Ok(())
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn create_vertex_buffer(
        &mut self,
        label: &str,
        data: &[f32],
    ) -> Result<BufferId, ResourceError> {
        let id = BufferId(self.next());
        self.buffers.insert(id);
        self.commands.push(DeviceCommand::CreateBuffer {
            id,
            label: label.to_string(),
            len: data.len(),
        });
        Ok(id)
    }

    fn create_index_buffer(
        &mut self,
        label: &str,
        data: &IndexData,
    ) -> Result<BufferId, ResourceError> {
        let id = BufferId(self.next());
        self.buffers.insert(id);
        self.commands.push(DeviceCommand::CreateBuffer {
            id,
            label: label.to_string(),
            len: data.len(),
        });
        Ok(id)
    }

    fn destroy_buffer(&mut self, id: BufferId) -> Result<(), ResourceError> {
        if !self.buffers.remove(&id) {
            return Err(ResourceError::UnknownBuffer(id));
        }
        self.commands.push(DeviceCommand::DestroyBuffer(id));
        Ok(())
    }

    fn create_shader_program(&mut self, name: &str) -> Result<ShaderId, ResourceError> {
        if let Some(id) = self.shaders.get(name) {
            return Ok(*id);
        }
        let id = ShaderId(self.next());
        self.shaders.insert(name.to_string(), id);
        Ok(id)
    }

    fn create_texture(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
    ) -> Result<TextureId, ResourceError> {
        if width == 0 || height == 0 {
            return Err(ResourceError::BackendError(format!(
                "texture '{name}' has a zero-sized dimension"
            )));
        }
        let id = TextureId(self.next());
        self.textures.insert(id);
        Ok(id)
    }

    fn create_render_target(
        &mut self,
        descriptor: &RenderTargetDescriptor,
    ) -> Result<RenderTargetAttachments, ResourceError> {
        if descriptor.width == 0 || descriptor.height == 0 {
            return Err(ResourceError::ZeroSizedTarget {
                label: descriptor.label.clone(),
            });
        }
        if self.fail_target_allocation {
            return Err(ResourceError::BackendError(format!(
                "framebuffer '{}' incomplete",
                descriptor.label
            )));
        }
        let attachments = RenderTargetAttachments {
            framebuffer: FramebufferId(self.next()),
            color: TextureId(self.next()),
            depth: TextureId(self.next()),
        };
        log::debug!(
            "Headless target '{}' allocated ({}x{})",
            descriptor.label,
            descriptor.width,
            descriptor.height
        );
        self.framebuffers.insert(attachments.framebuffer);
        self.textures.insert(attachments.color);
        self.textures.insert(attachments.depth);
        self.commands.push(DeviceCommand::CreateRenderTarget {
            label: descriptor.label.clone(),
            attachments,
        });
        Ok(attachments)
    }

    fn destroy_render_target(
        &mut self,
        attachments: &RenderTargetAttachments,
    ) -> Result<(), ResourceError> {
        if !self.framebuffers.remove(&attachments.framebuffer) {
            return Err(ResourceError::UnknownFramebuffer(attachments.framebuffer));
        }
        self.textures.remove(&attachments.color);
        self.textures.remove(&attachments.depth);
        self.commands
            .push(DeviceCommand::DestroyRenderTarget(attachments.framebuffer));
        Ok(())
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferId>) {
        self.commands.push(DeviceCommand::BindFramebuffer(framebuffer));
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.commands.push(DeviceCommand::SetViewport(viewport));
    }

    fn clear(&mut self, color: Vec4) {
        self.commands.push(DeviceCommand::Clear(color));
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.commands.push(DeviceCommand::SetDepthTest(enabled));
    }

    fn use_shader(&mut self, shader: ShaderId) -> Result<(), RenderError> {
        if !self.shaders.values().any(|id| *id == shader) {
            return Err(ResourceError::UnknownShader(shader).into());
        }
        self.bound_shader = Some(shader);
        self.commands.push(DeviceCommand::UseShader(shader));
        Ok(())
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.commands.push(DeviceCommand::SetUniform {
            name: name.to_string(),
            value,
        });
    }

    fn bind_attribute(
        &mut self,
        attribute: VertexAttribute,
        buffer: BufferId,
    ) -> Result<(), RenderError> {
        if !self.buffers.contains(&buffer) {
            return Err(ResourceError::UnknownBuffer(buffer).into());
        }
        self.commands
            .push(DeviceCommand::BindAttribute { attribute, buffer });
        Ok(())
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureId) -> Result<(), RenderError> {
        if !self.textures.contains(&texture) {
            return Err(ResourceError::UnknownTexture(texture).into());
        }
        self.commands
            .push(DeviceCommand::BindTexture { unit, texture });
        Ok(())
    }

    fn draw(
        &mut self,
        topology: PrimitiveTopology,
        _first: u32,
        count: u32,
    ) -> Result<(), RenderError> {
        if self.bound_shader.is_none() {
            return Err(RenderError::NoShaderBound);
        }
        self.consume_draw_failure()?;
        self.commands.push(DeviceCommand::Draw { topology, count });
        Ok(())
    }

    fn draw_indexed(
        &mut self,
        topology: PrimitiveTopology,
        index_buffer: BufferId,
        format: IndexFormat,
        count: u32,
    ) -> Result<(), RenderError> {
        if self.bound_shader.is_none() {
            return Err(RenderError::NoShaderBound);
        }
        if !self.buffers.contains(&index_buffer) {
            return Err(ResourceError::UnknownBuffer(index_buffer).into());
        }
        self.consume_draw_failure()?;
        self.commands.push(DeviceCommand::DrawIndexed {
            topology,
            index_buffer,
            format,
            count,
        });
        Ok(())
    }

    fn surface_size(&self) -> (u32, u32) {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_without_shader_is_rejected() {
        let mut device = HeadlessDevice::new(64, 64);
        let err = device.draw(PrimitiveTopology::TriangleList, 0, 3);
        assert!(matches!(err, Err(RenderError::NoShaderBound)));
    }

    #[test]
    fn buffers_are_tracked_until_destroyed() {
        let mut device = HeadlessDevice::new(64, 64);
        let id = device.create_vertex_buffer("positions", &[0.0; 9]).unwrap();
        assert_eq!(device.live_buffers(), 1);
        device.destroy_buffer(id).unwrap();
        assert_eq!(device.live_buffers(), 0);
        assert!(device.destroy_buffer(id).is_err());
    }

    #[test]
    fn injected_failures_are_consumed() {
        let mut device = HeadlessDevice::new(64, 64);
        let shader = device.create_shader_program("base").unwrap();
        device.use_shader(shader).unwrap();
        device.fail_next_draws(1);
        assert!(device.draw(PrimitiveTopology::TriangleList, 0, 3).is_err());
        assert!(device.draw(PrimitiveTopology::TriangleList, 0, 3).is_ok());
        assert_eq!(device.draw_count(), 1);
    }

    #[test]
    fn zero_sized_targets_are_rejected() {
        let mut device = HeadlessDevice::new(64, 64);
        let desc = RenderTargetDescriptor {
            label: "reflection".to_string(),
            width: 0,
            height: 512,
        };
        assert!(matches!(
            device.create_render_target(&desc),
            Err(ResourceError::ZeroSizedTarget { .. })
        ));
    }
}
