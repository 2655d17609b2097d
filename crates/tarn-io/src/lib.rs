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

//! Heightmap acquisition.
//!
//! Two sources produce a [`HeightField`](tarn_data::HeightField) that is
//! already range-computed and shifted to a zero minimum: grayscale images and
//! the fault-line generator.

#![warn(missing_docs)]

mod error;
pub mod fault_line;
pub mod grayscale;

pub use error::HeightmapError;
pub use fault_line::FaultLineGenerator;
pub use grayscale::{decode_grayscale, load_grayscale, save_preview, to_preview};
