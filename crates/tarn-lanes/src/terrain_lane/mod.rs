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

//! Height field to GPU-ready terrain geometry.
//!
//! Vertices are laid out x-major (`x * width + z`) while index helpers address
//! the grid z-major (`z * width + x`); both agree on square grids, which is
//! all the mesher accepts.

mod error;
pub mod indices;
pub mod mesher;
pub mod normal_debug;

pub use self::error::MeshError;
pub use self::indices::IndexWidth;
pub use self::mesher::{TerrainMesh, TerrainMesher, TerrainVertex};
pub use self::normal_debug::normal_lines;
