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

use tarn_core::renderer::{IndexFormat, PrimitiveTopology};

/// Errors raised while turning a height field into a mesh.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    /// The height field has a zero dimension.
    #[error("height field is empty")]
    EmptyHeightField,

    /// Interior normals need at least one interior ring.
    #[error("height field is {width}x{height}; meshing needs at least 3x3")]
    TooSmall {
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },

    /// The vertex layout `x * width + z` only covers square grids.
    #[error("height field is {width}x{height}; meshing needs a square grid")]
    NonSquare {
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },

    /// The largest vertex index does not fit the index format.
    #[error("vertex index {max_index} does not fit {format:?} indices")]
    IndexOverflow {
        /// The largest index the mesh needs.
        max_index: u64,
        /// The format that was requested.
        format: IndexFormat,
    },

    /// Terrain meshes are built as triangle lists or strips only.
    #[error("terrain meshes cannot use {0:?} topology")]
    UnsupportedTopology(PrimitiveTopology),

    /// A vertex slice does not match the grid it claims to cover.
    #[error("expected {expected} vertices, got {actual}")]
    VertexCountMismatch {
        /// `width * height`.
        expected: usize,
        /// The slice length.
        actual: usize,
    },
}
