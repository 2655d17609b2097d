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

//! Resource handles and draw parameters shared by the renderer and its backends.

use crate::math::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

// --- Handles ---

/// An opaque handle to a GPU buffer (vertex attribute or index data).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub usize);

/// An opaque handle to a texture. It may name a static image texture or the
/// color attachment of a render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// An opaque handle to a compiled shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(pub usize);

/// An opaque handle to an off-screen framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FramebufferId(pub usize);

// --- Draw parameters ---

/// Describes how vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PrimitiveTopology {
    /// Vertices are rendered as a list of isolated points.
    PointList,
    /// Every two vertices form a line.
    LineList,
    /// Vertices are rendered as a connected line strip.
    LineStrip,
    /// Every three vertices form a triangle.
    #[default]
    TriangleList,
    /// Each new vertex forms a triangle with the previous two.
    TriangleStrip,
}

/// Specifies the data type of indices in an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexFormat {
    /// Indices are 16-bit unsigned integers.
    Uint16,
    /// Indices are 32-bit unsigned integers.
    Uint32,
}

impl IndexFormat {
    /// The largest vertex index this format can address.
    pub fn max_index(self) -> u64 {
        match self {
            IndexFormat::Uint16 => u16::MAX as u64,
            IndexFormat::Uint32 => u32::MAX as u64,
        }
    }
}

/// CPU-side index data in either 16- or 32-bit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexData {
    /// 16-bit indices.
    U16(Vec<u16>),
    /// 32-bit indices.
    U32(Vec<u32>),
}

impl IndexData {
    /// The number of indices.
    pub fn len(&self) -> usize {
        match self {
            IndexData::U16(v) => v.len(),
            IndexData::U32(v) => v.len(),
        }
    }

    /// Returns `true` if there are no indices.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element format of this data.
    pub fn format(&self) -> IndexFormat {
        match self {
            IndexData::U16(_) => IndexFormat::Uint16,
            IndexData::U32(_) => IndexFormat::Uint32,
        }
    }

    /// Returns the index at `position`, widened to `u32`.
    pub fn get(&self, position: usize) -> Option<u32> {
        match self {
            IndexData::U16(v) => v.get(position).map(|&i| i as u32),
            IndexData::U32(v) => v.get(position).copied(),
        }
    }

    /// Returns every index widened to `u32`.
    pub fn to_u32_vec(&self) -> Vec<u32> {
        match self {
            IndexData::U16(v) => v.iter().map(|&i| i as u32).collect(),
            IndexData::U32(v) => v.clone(),
        }
    }

    /// The raw little-endian bytes, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            IndexData::U16(v) => bytemuck::cast_slice(v),
            IndexData::U32(v) => bytemuck::cast_slice(v),
        }
    }
}

/// The per-vertex attribute streams a scene node may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttribute {
    /// `vec3` position. Required for any draw.
    Position,
    /// `vec3` normal.
    Normal,
    /// Vertex color (`vec3` or `vec4`).
    Color,
    /// `vec2` texture coordinate.
    TexCoord,
}

/// The attribute inputs a shader program declares.
///
/// The render step checks these before binding each buffer so a shader that
/// ignores, say, normals never gets a normal stream bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShaderCapabilities {
    /// Shader reads a position attribute.
    pub has_position_attr: bool,
    /// Shader reads a normal attribute.
    pub has_normal_attr: bool,
    /// Shader reads a color attribute.
    pub has_color_attr: bool,
    /// Shader reads a texture coordinate attribute.
    pub has_tex_coord_attr: bool,
}

impl ShaderCapabilities {
    /// A shader that consumes every attribute stream.
    pub const ALL: Self = Self {
        has_position_attr: true,
        has_normal_attr: true,
        has_color_attr: true,
        has_tex_coord_attr: true,
    };

    /// Returns whether the shader declares the given attribute.
    pub fn supports(&self, attribute: VertexAttribute) -> bool {
        match attribute {
            VertexAttribute::Position => self.has_position_attr,
            VertexAttribute::Normal => self.has_normal_attr,
            VertexAttribute::Color => self.has_color_attr,
            VertexAttribute::TexCoord => self.has_tex_coord_attr,
        }
    }
}

/// A compiled program plus the attribute inputs it declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle {
    /// The device program.
    pub id: ShaderId,
    /// Which attribute streams the program reads.
    pub capabilities: ShaderCapabilities,
}

/// A value that can be written to a named shader uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// A boolean flag (uploaded as an int on most backends).
    Bool(bool),
    /// A signed integer.
    Int(i32),
    /// A single float.
    Float(f32),
    /// A 3-component vector.
    Vec3(Vec3),
    /// A 4-component vector.
    Vec4(Vec4),
    /// A column-major 4x4 matrix.
    Mat4(Mat4),
}

/// A rectangular region of the current framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Left edge, in pixels.
    pub x: u32,
    /// Bottom edge, in pixels.
    pub y: u32,
    /// Width, in pixels.
    pub width: u32,
    /// Height, in pixels.
    pub height: u32,
}

impl Viewport {
    /// A viewport covering a whole `width` x `height` surface.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

/// A plane equation `ax + by + cz + d = 0` handed to shaders that discard
/// fragments on one side of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipPlane(pub [f32; 4]);

impl ClipPlane {
    /// A plane that keeps geometry below `height` (refraction pass).
    pub fn keep_below(height: f32) -> Self {
        Self([0.0, -1.0, 0.0, height])
    }

    /// A plane that keeps geometry above `height` (reflection pass).
    pub fn keep_above(height: f32) -> Self {
        Self([0.0, 1.0, 0.0, -height])
    }

    /// The plane as a `Vec4` uniform.
    pub fn as_vec4(&self) -> Vec4 {
        Vec4::new(self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

/// Describes an off-screen color + depth target to allocate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTargetDescriptor {
    /// A debug label, also used as the target's queue name.
    pub label: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// The device resources backing an allocated render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTargetAttachments {
    /// The framebuffer to bind while rendering into the target.
    pub framebuffer: FramebufferId,
    /// The color attachment, sampleable as a texture once the pass completes.
    pub color: TextureId,
    /// The depth attachment.
    pub depth: TextureId,
}
