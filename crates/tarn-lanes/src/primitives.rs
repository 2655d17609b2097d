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

//! Fixed-shape geometry: the sky dome and the quad plane.

use crate::geometry::GeometryData;
use serde::{Deserialize, Serialize};
use tarn_core::math::{Vec2, Vec3, FRAC_PI_2, TAU};
use tarn_core::renderer::{IndexData, PrimitiveTopology};

/// Dome shape parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomeShape {
    /// Distance from the centre to the rim.
    pub radius: f32,
    /// Vertical squash; `1.0` is a hemisphere.
    pub dampen: f32,
    /// Rings from the rim to the top.
    pub slices: u32,
    /// Segments around the up axis.
    pub sides: u32,
}

impl Default for DomeShape {
    fn default() -> Self {
        Self {
            radius: 1000.0,
            dampen: 0.5,
            slices: 16,
            sides: 32,
        }
    }
}

/// Builds a textured hemisphere drawn as one triangle strip.
///
/// Ring `j` sits at elevation angle `j * (pi / 2) / slices`; every ring repeats
/// its first vertex at the end so the texture wraps without a seam.
pub fn dome(shape: DomeShape) -> GeometryData {
    let DomeShape {
        radius,
        dampen,
        slices,
        sides,
    } = shape;
    let ring = sides + 1;
    let vertex_count = ((slices + 1) * ring) as usize;

    let mut positions = Vec::with_capacity(vertex_count);
    let mut tex_coords = Vec::with_capacity(vertex_count);
    for j in 0..=slices {
        let elevation = j as f32 * FRAC_PI_2 / slices as f32;
        for i in 0..=sides {
            let around = i as f32 * TAU / sides as f32;
            positions.push(
                Vec3::new(
                    around.cos() * elevation.cos(),
                    dampen * elevation.sin(),
                    around.sin() * elevation.cos(),
                ) * radius,
            );
            tex_coords.push(Vec2::new(
                i as f32 / sides as f32,
                j as f32 / slices as f32,
            ));
        }
    }

    let mut indices = Vec::with_capacity((slices * ring * 2) as usize);
    for j in 1..=slices {
        for i in 0..=sides {
            indices.push(j * ring + i);
            indices.push((j - 1) * ring + i);
        }
    }

    GeometryData {
        positions,
        tex_coords: Some(tex_coords),
        indices: Some(pack(indices)),
        topology: PrimitiveTopology::TriangleStrip,
        ..Default::default()
    }
}

/// Builds a square of half-extent `size` centred on the origin.
///
/// Lies in the ground plane facing down, or stands in the xy plane facing
/// `+z` when `upright` is set.
pub fn quad_plane(size: f32, upright: bool) -> GeometryData {
    let (positions, normal) = if upright {
        (
            vec![
                Vec3::new(-size, -size, 0.0),
                Vec3::new(size, -size, 0.0),
                Vec3::new(size, size, 0.0),
                Vec3::new(-size, size, 0.0),
            ],
            Vec3::Z,
        )
    } else {
        (
            vec![
                Vec3::new(-size, 0.0, -size),
                Vec3::new(size, 0.0, -size),
                Vec3::new(size, 0.0, size),
                Vec3::new(-size, 0.0, size),
            ],
            -Vec3::Y,
        )
    };

    GeometryData {
        positions,
        normals: Some(vec![normal; 4]),
        tex_coords: Some(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]),
        indices: Some(IndexData::U16(vec![0, 1, 2, 0, 2, 3])),
        topology: PrimitiveTopology::TriangleList,
        ..Default::default()
    }
}

fn pack(indices: Vec<u32>) -> IndexData {
    if indices.iter().all(|&i| i <= u32::from(u16::MAX)) {
        IndexData::U16(indices.into_iter().map(|i| i as u16).collect())
    } else {
        IndexData::U32(indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn dome_rim_and_top() {
        let shape = DomeShape {
            radius: 10.0,
            dampen: 0.5,
            slices: 4,
            sides: 8,
        };
        let geometry = dome(shape);
        assert_eq!(geometry.vertex_count(), 5 * 9);
        assert_eq!(geometry.draw_count(), 4 * 9 * 2);

        assert_abs_diff_eq!(geometry.positions[0], Vec3::new(10.0, 0.0, 0.0), epsilon = 1e-4);
        let top = geometry.positions[4 * 9];
        assert_abs_diff_eq!(top.y, 5.0, epsilon = 1e-4);
        assert_abs_diff_eq!(top.x, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn dome_strip_alternates_rings() {
        let geometry = dome(DomeShape {
            slices: 2,
            sides: 3,
            ..Default::default()
        });
        let indices = geometry.indices.unwrap().to_u32_vec();
        assert_eq!(&indices[..4], &[4, 0, 5, 1]);
        assert_eq!(&indices[8..10], &[8, 4]);
    }

    #[test]
    fn flat_quad_faces_down() {
        let quad = quad_plane(100.0, false);
        assert_eq!(quad.positions[2], Vec3::new(100.0, 0.0, 100.0));
        assert_eq!(quad.normals.unwrap()[0], Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(
            quad.indices.unwrap().to_u32_vec(),
            vec![0, 1, 2, 0, 2, 3]
        );
    }

    #[test]
    fn upright_quad_stands_in_xy() {
        let quad = quad_plane(2.0, true);
        assert!(quad.positions.iter().all(|p| p.z == 0.0));
        assert_eq!(quad.positions[3], Vec3::new(-2.0, 2.0, 0.0));
    }
}
