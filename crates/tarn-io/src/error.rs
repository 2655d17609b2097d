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

use std::path::PathBuf;

/// Errors raised while acquiring a height field.
#[derive(Debug, thiserror::Error)]
pub enum HeightmapError {
    /// The bytes are not a decodable image.
    #[error("failed to decode heightmap image")]
    Decode(#[from] image::ImageError),

    /// The file could not be read or decoded.
    #[error("failed to load heightmap '{path}'")]
    Load {
        /// The file that failed.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: image::ImageError,
    },

    /// The preview image could not be written.
    #[error("failed to write heightmap preview '{path}'")]
    Save {
        /// The destination.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: image::ImageError,
    },

    /// After truncating odd dimensions nothing is left to sample.
    #[error("heightmap is {width}x{height}; nothing left after truncating to even dimensions")]
    Degenerate {
        /// Source width.
        width: u32,
        /// Source height.
        height: u32,
    },
}
