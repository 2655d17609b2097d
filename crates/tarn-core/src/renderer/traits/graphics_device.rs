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

use crate::math::Vec4;
use crate::renderer::api::*;
use crate::renderer::error::{RenderError, ResourceError};
use std::fmt::Debug;

/// A stateful, immediate-mode graphics device.
///
/// The device mirrors a GL-style state machine: a framebuffer, a program and a
/// set of attribute streams are bound, then a draw call consumes that state.
/// All calls happen on the render thread.
pub trait GraphicsDevice: Debug {
    /// Uploads a tightly packed float attribute stream.
    /// ## Arguments
    /// * `label` - A debug label for the buffer.
    /// * `data` - The attribute data (3 floats per position, 2 per texcoord, ...).
    /// ## Errors
    /// * `ResourceError` - If the backend cannot allocate the buffer.
    fn create_vertex_buffer(&mut self, label: &str, data: &[f32])
        -> Result<BufferId, ResourceError>;

    /// Uploads an index buffer in the width carried by `data`.
    /// ## Errors
    /// * `ResourceError` - If the backend cannot allocate the buffer.
    fn create_index_buffer(
        &mut self,
        label: &str,
        data: &IndexData,
    ) -> Result<BufferId, ResourceError>;

    /// Releases a buffer.
    /// ## Errors
    /// * `ResourceError::UnknownBuffer` - If the buffer was never created or is already gone.
    fn destroy_buffer(&mut self, id: BufferId) -> Result<(), ResourceError>;

    /// Resolves a shader program by name. Compiling the program source is the
    /// backend's concern.
    fn create_shader_program(&mut self, name: &str) -> Result<ShaderId, ResourceError>;

    /// Creates a sampleable texture of the given size.
    fn create_texture(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
    ) -> Result<TextureId, ResourceError>;

    /// Allocates an off-screen color + depth target.
    /// ## Errors
    /// * `ResourceError` - If the framebuffer is incomplete or cannot be allocated.
    fn create_render_target(
        &mut self,
        descriptor: &RenderTargetDescriptor,
    ) -> Result<RenderTargetAttachments, ResourceError>;

    /// Releases a target's framebuffer and its attachments.
    fn destroy_render_target(
        &mut self,
        attachments: &RenderTargetAttachments,
    ) -> Result<(), ResourceError>;

    /// Binds an off-screen framebuffer, or the default framebuffer when `None`.
    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferId>);

    /// Sets the viewport of the bound framebuffer.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Clears the color and depth attachments of the bound framebuffer.
    fn clear(&mut self, color: Vec4);

    /// Enables or disables depth testing.
    fn set_depth_test(&mut self, enabled: bool);

    /// Makes `shader` the current program.
    /// ## Errors
    /// * `RenderError` - If the program is unknown to the device.
    fn use_shader(&mut self, shader: ShaderId) -> Result<(), RenderError>;

    /// Writes a uniform on the current program. Unknown names are ignored, as
    /// GL does for inactive uniforms.
    fn set_uniform(&mut self, name: &str, value: UniformValue);

    /// Binds an attribute stream for the next draw.
    fn bind_attribute(
        &mut self,
        attribute: VertexAttribute,
        buffer: BufferId,
    ) -> Result<(), RenderError>;

    /// Binds a texture to a sampler unit.
    fn bind_texture(&mut self, unit: u32, texture: TextureId) -> Result<(), RenderError>;

    /// Draws `count` vertices from the bound attribute streams.
    fn draw(
        &mut self,
        topology: PrimitiveTopology,
        first: u32,
        count: u32,
    ) -> Result<(), RenderError>;

    /// Draws `count` indices from `index_buffer`.
    fn draw_indexed(
        &mut self,
        topology: PrimitiveTopology,
        index_buffer: BufferId,
        format: IndexFormat,
        count: u32,
    ) -> Result<(), RenderError>;

    /// The size of the default framebuffer, in pixels.
    fn surface_size(&self) -> (u32, u32);
}
