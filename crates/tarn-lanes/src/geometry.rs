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

//! CPU-side geometry ready for upload.

use tarn_core::math::{Vec2, Vec3, Vec4};
use tarn_core::renderer::{IndexData, PrimitiveTopology};

/// Attribute streams and optional indices for one drawable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeometryData {
    /// Vertex positions. Always present.
    pub positions: Vec<Vec3>,
    /// Per-vertex normals.
    pub normals: Option<Vec<Vec3>>,
    /// Per-vertex RGBA colors.
    pub colors: Option<Vec<Vec4>>,
    /// Per-vertex texture coordinates.
    pub tex_coords: Option<Vec<Vec2>>,
    /// Indices. Without them the geometry draws as an array.
    pub indices: Option<IndexData>,
    /// How the vertices (or indices) form primitives.
    pub topology: PrimitiveTopology,
}

impl GeometryData {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of elements a draw consumes: indices if present, else vertices.
    pub fn draw_count(&self) -> usize {
        self.indices
            .as_ref()
            .map_or(self.positions.len(), IndexData::len)
    }

    /// Positions flattened to `[x, y, z, x, y, z, ...]`.
    pub fn flat_positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Normals flattened to `[x, y, z, ...]`.
    pub fn flat_normals(&self) -> Option<&[f32]> {
        self.normals.as_deref().map(bytemuck::cast_slice)
    }

    /// Colors flattened to `[r, g, b, a, ...]`.
    pub fn flat_colors(&self) -> Option<&[f32]> {
        self.colors.as_deref().map(bytemuck::cast_slice)
    }

    /// Texture coordinates flattened to `[s, t, ...]`.
    pub fn flat_tex_coords(&self) -> Option<&[f32]> {
        self.tex_coords.as_deref().map(bytemuck::cast_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattening_keeps_component_order() {
        let geometry = GeometryData {
            positions: vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)],
            tex_coords: Some(vec![Vec2::new(0.5, 0.25), Vec2::new(1.0, 0.0)]),
            ..Default::default()
        };
        assert_eq!(geometry.flat_positions(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(geometry.flat_tex_coords().unwrap(), &[0.5, 0.25, 1.0, 0.0]);
        assert!(geometry.flat_normals().is_none());
        assert_eq!(geometry.draw_count(), 2);
    }
}
