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

//! Index arithmetic for grid meshes.
//!
//! The corner and neighbour helpers address a grid row by row
//! (`z * width + x`). Index buffers built here carry the same values.

use super::MeshError;
use serde::{Deserialize, Serialize};
use tarn_core::renderer::{IndexData, IndexFormat};

/// Top-left corner of cell `(x, z)`.
#[inline]
pub fn corner_tl(x: usize, z: usize, width: usize) -> usize {
    z * width + x
}

/// Bottom-left corner of cell `(x, z)`.
#[inline]
pub fn corner_bl(x: usize, z: usize, width: usize) -> usize {
    (z + 1) * width + x
}

/// Bottom-right corner of cell `(x, z)`.
#[inline]
pub fn corner_br(x: usize, z: usize, width: usize) -> usize {
    (z + 1) * width + x + 1
}

/// Top-right corner of cell `(x, z)`.
#[inline]
pub fn corner_tr(x: usize, z: usize, width: usize) -> usize {
    z * width + x + 1
}

/// The vertex above `(x, z)`. Requires `z >= 1`.
#[inline]
pub fn neighbour_top(x: usize, z: usize, width: usize) -> usize {
    (z - 1) * width + x
}

/// The vertex below `(x, z)`.
#[inline]
pub fn neighbour_bottom(x: usize, z: usize, width: usize) -> usize {
    (z + 1) * width + x
}

/// The vertex left of `(x, z)`. Requires `x >= 1`.
#[inline]
pub fn neighbour_left(x: usize, z: usize, width: usize) -> usize {
    z * width + x - 1
}

/// The vertex right of `(x, z)`.
#[inline]
pub fn neighbour_right(x: usize, z: usize, width: usize) -> usize {
    z * width + x + 1
}

/// How wide mesh indices may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IndexWidth {
    /// 16-bit when every index fits, otherwise 32-bit.
    #[default]
    Auto,
    /// Always 16-bit; larger grids are rejected.
    Uint16,
    /// Always 32-bit.
    Uint32,
}

impl IndexWidth {
    /// Picks the index format for a mesh of `vertex_count` vertices.
    pub fn resolve(self, vertex_count: usize) -> Result<IndexFormat, MeshError> {
        let max_index = vertex_count.saturating_sub(1) as u64;
        let format = match self {
            IndexWidth::Auto if max_index <= IndexFormat::Uint16.max_index() => {
                IndexFormat::Uint16
            }
            IndexWidth::Auto | IndexWidth::Uint32 => IndexFormat::Uint32,
            IndexWidth::Uint16 => IndexFormat::Uint16,
        };
        if max_index > format.max_index() {
            return Err(MeshError::IndexOverflow { max_index, format });
        }
        Ok(format)
    }
}

/// Narrows or keeps `indices` in `format`.
///
/// Callers must have checked the range with [`IndexWidth::resolve`].
pub fn pack_indices(indices: Vec<u32>, format: IndexFormat) -> IndexData {
    match format {
        IndexFormat::Uint16 => IndexData::U16(indices.into_iter().map(|i| i as u16).collect()),
        IndexFormat::Uint32 => IndexData::U32(indices),
    }
}

/// Number of indices [`triangle_strip_indices`] emits for a grid.
pub fn strip_index_count(width: usize, height: usize) -> usize {
    if height < 2 {
        return 0;
    }
    let strips = height - 1;
    2 * width * strips + 2 * (strips - 1)
}

/// One triangle strip covering the grid, rows stitched with degenerate
/// triangles so the whole grid is a single draw.
pub fn triangle_strip_indices(width: usize, height: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(strip_index_count(width, height));
    if height < 2 || width == 0 {
        return indices;
    }
    let strips = height - 1;

    for z in 0..strips {
        if z > 0 {
            // Repeat the first index of the new strip.
            indices.push((z * width) as u32);
        }
        for x in 0..width {
            indices.push((x + z * width) as u32);
            indices.push((x + (z + 1) * width) as u32);
        }
        if z != height - 2 {
            // Repeat the last index of the finished strip.
            indices.push(((z + 1) * width + (width - 1)) as u32);
        }
    }
    indices
}

/// Two counter-clockwise triangles per cell: `TL, BL, BR` and `BR, TR, TL`.
pub fn triangle_list_indices(width: usize, height: usize) -> Vec<u32> {
    let cells = width.saturating_sub(1) * height.saturating_sub(1);
    let mut indices = Vec::with_capacity(cells * 6);
    for z in 0..height.saturating_sub(1) {
        for x in 0..width.saturating_sub(1) {
            let tl = corner_tl(x, z, width) as u32;
            let bl = corner_bl(x, z, width) as u32;
            let br = corner_br(x, z, width) as u32;
            let tr = corner_tr(x, z, width) as u32;
            indices.extend_from_slice(&[tl, bl, br, br, tr, tl]);
        }
    }
    indices
}

/// Builds the strip index buffer in the width chosen by `policy`.
pub fn build_triangle_strip_indices(
    width: usize,
    height: usize,
    policy: IndexWidth,
) -> Result<IndexData, MeshError> {
    let format = policy.resolve(width * height)?;
    Ok(pack_indices(triangle_strip_indices(width, height), format))
}

/// Builds the triangle-list index buffer in the width chosen by `policy`.
pub fn build_triangle_list_indices(
    width: usize,
    height: usize,
    policy: IndexWidth,
) -> Result<IndexData, MeshError> {
    let format = policy.resolve(width * height)?;
    Ok(pack_indices(triangle_list_indices(width, height), format))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_formulas() {
        assert_eq!(
            (corner_tl(0, 0, 3), corner_bl(0, 0, 3), corner_br(0, 0, 3), corner_tr(0, 0, 3)),
            (0, 3, 4, 1)
        );
        assert_eq!(
            (corner_tl(1, 0, 3), corner_bl(1, 0, 3), corner_br(1, 0, 3), corner_tr(1, 0, 3)),
            (1, 4, 5, 2)
        );
        assert_eq!(
            (corner_tl(0, 1, 3), corner_bl(0, 1, 3), corner_br(0, 1, 3), corner_tr(0, 1, 3)),
            (3, 6, 7, 4)
        );
    }

    #[test]
    fn neighbour_formulas() {
        assert_eq!(neighbour_top(1, 1, 3), 1);
        assert_eq!(neighbour_bottom(1, 1, 3), 7);
        assert_eq!(neighbour_left(1, 1, 3), 3);
        assert_eq!(neighbour_right(1, 1, 3), 5);
    }

    #[test]
    fn triangle_list_for_three_by_three() {
        let expected: [u32; 24] = [
            0, 3, 4, 4, 1, 0, 1, 4, 5, 5, 2, 1, 3, 6, 7, 7, 4, 3, 4, 7, 8, 8, 5, 4,
        ];
        assert_eq!(triangle_list_indices(3, 3), expected);
    }

    #[test]
    fn strip_for_three_by_three() {
        assert_eq!(
            triangle_strip_indices(3, 3),
            vec![0, 3, 1, 4, 2, 5, 5, 3, 3, 6, 4, 7, 5, 8]
        );
    }

    #[test]
    fn strip_count_matches_formula() {
        for (w, h) in [(2, 2), (3, 3), (4, 7), (16, 16), (128, 128)] {
            assert_eq!(triangle_strip_indices(w, h).len(), 2 * w * (h - 1) + 2 * (h - 2));
            assert_eq!(strip_index_count(w, h), 2 * w * (h - 1) + 2 * (h - 2));
        }
        assert!(triangle_strip_indices(5, 1).is_empty());
    }

    #[test]
    fn strip_and_list_share_corner_values() {
        let strip = triangle_strip_indices(4, 4);
        for &i in &triangle_list_indices(4, 4) {
            assert!(strip.contains(&i));
        }
    }

    #[test]
    fn auto_widens_past_sixteen_bits() {
        assert_eq!(IndexWidth::Auto.resolve(256 * 256), Ok(IndexFormat::Uint16));
        assert_eq!(IndexWidth::Auto.resolve(257 * 257), Ok(IndexFormat::Uint32));

        let data = build_triangle_strip_indices(300, 300, IndexWidth::Auto).unwrap();
        assert_eq!(data.format(), IndexFormat::Uint32);
        assert_eq!(data.get(data.len() - 1), Some(300 * 300 - 1));
    }

    #[test]
    fn forced_sixteen_bit_overflow_is_reported() {
        assert_eq!(
            build_triangle_list_indices(300, 300, IndexWidth::Uint16),
            Err(MeshError::IndexOverflow {
                max_index: 89_999,
                format: IndexFormat::Uint16,
            })
        );
    }
}
