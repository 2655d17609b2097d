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

//! Line geometry that visualises vertex normals.

use super::mesher::TerrainVertex;
use crate::geometry::GeometryData;
use tarn_core::math::Vec4;
use tarn_core::renderer::PrimitiveTopology;

/// Length of each debug line, in world units.
pub const NORMAL_LINE_LENGTH: f32 = 5.0;

const BASE_COLOR: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);
const TIP_COLOR: Vec4 = Vec4::new(0.0, 1.0, 0.0, 1.0);

/// One line segment per vertex along its normal, red at the base and green
/// at the tip. Border vertices produce zero-length lines.
pub fn normal_lines(vertices: &[TerrainVertex]) -> GeometryData {
    let mut positions = Vec::with_capacity(vertices.len() * 2);
    let mut colors = Vec::with_capacity(vertices.len() * 2);
    for vertex in vertices {
        positions.push(vertex.position);
        positions.push(vertex.position + vertex.normal * NORMAL_LINE_LENGTH);
        colors.push(BASE_COLOR);
        colors.push(TIP_COLOR);
    }

    GeometryData {
        positions,
        colors: Some(colors),
        topology: PrimitiveTopology::LineList,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarn_core::math::Vec3;

    #[test]
    fn lines_start_at_the_vertex() {
        let vertices = [TerrainVertex {
            position: Vec3::new(8.0, 2.0, 8.0),
            normal: Vec3::Y,
            ..Default::default()
        }];
        let lines = normal_lines(&vertices);
        assert_eq!(lines.positions, vec![Vec3::new(8.0, 2.0, 8.0), Vec3::new(8.0, 7.0, 8.0)]);
        assert_eq!(lines.colors.unwrap(), vec![BASE_COLOR, TIP_COLOR]);
        assert_eq!(lines.topology, PrimitiveTopology::LineList);
        assert!(lines.indices.is_none());
    }
}
