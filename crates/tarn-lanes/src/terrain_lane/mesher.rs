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

//! Height field to terrain mesh.

use super::indices::{build_triangle_list_indices, build_triangle_strip_indices, IndexWidth};
use super::MeshError;
use crate::geometry::GeometryData;
use bytemuck::{Pod, Zeroable};
use tarn_core::math::{normalize_range, Vec2, Vec3, Vec4};
use tarn_core::renderer::{IndexData, PrimitiveTopology};
use tarn_data::HeightField;

/// One terrain vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct TerrainVertex {
    /// `(x * stretch, elevation, z * stretch)`.
    pub position: Vec3,
    /// Grayscale elevation, alpha 1.
    pub color: Vec4,
    /// Tiled texture coordinate.
    pub tex_coord: Vec2,
    /// Unit normal for interior vertices, zero on the border.
    pub normal: Vec3,
}

/// Checks the preconditions every mesh build relies on.
pub fn validate(field: &HeightField) -> Result<(), MeshError> {
    let (width, height) = (field.width(), field.height());
    if field.is_empty() {
        return Err(MeshError::EmptyHeightField);
    }
    if width < 3 || height < 3 {
        return Err(MeshError::TooSmall { width, height });
    }
    if width != height {
        return Err(MeshError::NonSquare { width, height });
    }
    Ok(())
}

/// Produces one vertex per grid cell.
///
/// The vertex for cell `(x, z)` lands at index `x * width + z`. Elevation is
/// not stretched.
pub fn build_vertices(
    field: &HeightField,
    stretch: f32,
    tiling: f32,
) -> Result<Vec<TerrainVertex>, MeshError> {
    validate(field)?;
    let (width, height) = (field.width(), field.height());
    let tile_step_x = tiling / width as f32;
    let tile_step_z = tiling / height as f32;
    let (low, high) = (field.low_value(), field.high_value());

    let mut vertices = vec![TerrainVertex::default(); width * height];
    for x in 0..width {
        for z in 0..height {
            let y = field.get(x, z).unwrap_or_default();
            let shade = normalize_range(y, low, high);
            vertices[x * width + z] = TerrainVertex {
                position: Vec3::new(x as f32 * stretch, y, z as f32 * stretch),
                color: Vec4::new(shade, shade, shade, 1.0),
                tex_coord: Vec2::new(x as f32 * tile_step_x, z as f32 * tile_step_z),
                normal: Vec3::ZERO,
            };
        }
    }
    Ok(vertices)
}

/// Estimates a smooth normal for every interior vertex.
///
/// For each vertex the four axis neighbours are crossed in rotational order,
/// the four products averaged and normalized. Border vertices are untouched.
pub fn build_normals(
    vertices: &mut [TerrainVertex],
    width: usize,
    height: usize,
) -> Result<(), MeshError> {
    if vertices.len() != width * height {
        return Err(MeshError::VertexCountMismatch {
            expected: width * height,
            actual: vertices.len(),
        });
    }

    for z in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            let at = |gx: usize, gz: usize| vertices[gx * width + gz].position;
            let top = at(x + 1, z);
            let bottom = at(x - 1, z);
            let left = at(x, z - 1);
            let right = at(x, z + 1);

            let sum = right.cross(top) + top.cross(left) + bottom.cross(right) + left.cross(bottom);
            vertices[x * width + z].normal = (sum / 4.0).normalize();
        }
    }
    Ok(())
}

/// Mesh-build settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainMesher {
    /// World units per grid cell.
    pub stretch: f32,
    /// Texture repeats across the whole terrain.
    pub tiling: f32,
    /// Index width policy.
    pub index_width: IndexWidth,
    /// Strip (one draw, degenerate stitching) or triangle list.
    pub topology: PrimitiveTopology,
}

impl Default for TerrainMesher {
    fn default() -> Self {
        Self {
            stretch: 8.0,
            tiling: 128.0,
            index_width: IndexWidth::Auto,
            topology: PrimitiveTopology::TriangleStrip,
        }
    }
}

/// A finished terrain mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainMesh {
    /// Grid extent along x.
    pub width: usize,
    /// Grid extent along z.
    pub height: usize,
    /// Vertices in `x * width + z` order.
    pub vertices: Vec<TerrainVertex>,
    /// Strip or list indices.
    pub indices: IndexData,
    /// Topology the indices are meant for.
    pub topology: PrimitiveTopology,
}

impl TerrainMesher {
    /// Builds vertices, indices and normals for `field`.
    ///
    /// Fails without producing anything on a malformed field, on a topology
    /// other than a triangle list or strip, or when the indices do not fit
    /// the configured width.
    pub fn build(&self, field: &HeightField) -> Result<TerrainMesh, MeshError> {
        let build_indices = match self.topology {
            PrimitiveTopology::TriangleList => build_triangle_list_indices,
            PrimitiveTopology::TriangleStrip => build_triangle_strip_indices,
            other => return Err(MeshError::UnsupportedTopology(other)),
        };
        let mut vertices = build_vertices(field, self.stretch, self.tiling)?;
        let (width, height) = (field.width(), field.height());

        let indices = build_indices(width, height, self.index_width)?;
        build_normals(&mut vertices, width, height)?;

        log::debug!(
            "Terrain mesh {}x{}: {} vertices, {} {:?} indices",
            width,
            height,
            vertices.len(),
            indices.len(),
            indices.format()
        );

        Ok(TerrainMesh {
            width,
            height,
            vertices,
            indices,
            topology: self.topology,
        })
    }
}

impl TerrainMesh {
    /// Splits the interleaved vertices into upload streams.
    pub fn to_geometry(&self) -> GeometryData {
        GeometryData {
            positions: self.vertices.iter().map(|v| v.position).collect(),
            normals: Some(self.vertices.iter().map(|v| v.normal).collect()),
            colors: Some(self.vertices.iter().map(|v| v.color).collect()),
            tex_coords: Some(self.vertices.iter().map(|v| v.tex_coord).collect()),
            indices: Some(self.indices.clone()),
            topology: self.topology,
        }
    }

    /// Raw interleaved vertex bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
