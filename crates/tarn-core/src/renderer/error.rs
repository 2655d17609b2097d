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

//! Defines the hierarchy of error types for the rendering subsystem.

use crate::renderer::api::{BufferId, FramebufferId, ShaderId, TextureId};
use std::fmt;

/// An error related to the creation or use of a device resource.
#[derive(Debug)]
pub enum ResourceError {
    /// The buffer handle does not name a live buffer.
    UnknownBuffer(BufferId),
    /// The texture handle does not name a live texture.
    UnknownTexture(TextureId),
    /// The shader handle does not name a compiled program.
    UnknownShader(ShaderId),
    /// The framebuffer handle does not name a live render target.
    UnknownFramebuffer(FramebufferId),
    /// A render target was requested with a zero width or height.
    ZeroSizedTarget {
        /// The label of the rejected target.
        label: String,
    },
    /// An error originating from the specific graphics backend implementation.
    BackendError(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::UnknownBuffer(id) => write!(f, "Unknown buffer: {id:?}"),
            ResourceError::UnknownTexture(id) => write!(f, "Unknown texture: {id:?}"),
            ResourceError::UnknownShader(id) => write!(f, "Unknown shader program: {id:?}"),
            ResourceError::UnknownFramebuffer(id) => {
                write!(f, "Unknown framebuffer: {id:?}")
            }
            ResourceError::ZeroSizedTarget { label } => {
                write!(f, "Render target '{label}' has a zero-sized dimension")
            }
            ResourceError::BackendError(msg) => {
                write!(f, "Backend-specific resource error: {msg}")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

/// A high-level error raised while issuing a frame's draw calls.
#[derive(Debug)]
pub enum RenderError {
    /// A draw was issued with no shader program bound.
    NoShaderBound,
    /// A draw call was rejected by the backend.
    DrawFailed(String),
    /// An error occurred while managing a device resource.
    ResourceError(ResourceError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NoShaderBound => write!(f, "Draw issued with no shader bound."),
            RenderError::DrawFailed(msg) => write!(f, "Draw call failed: {msg}"),
            RenderError::ResourceError(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::ResourceError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::ResourceError(err)
    }
}
