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

//! Height fields from grayscale images.
//!
//! The red channel of each pixel is the elevation. Odd dimensions lose their
//! last row or column so the grid stays even.

use crate::HeightmapError;
use image::{DynamicImage, GrayImage, Luma};
use std::path::Path;
use tarn_data::height_field::even_floor;
use tarn_data::HeightField;

/// Decodes an in-memory image into a normalized height field.
pub fn decode_grayscale(bytes: &[u8]) -> Result<HeightField, HeightmapError> {
    let image = image::load_from_memory(bytes)?;
    sample(&image)
}

/// Loads and decodes an image file into a normalized height field.
pub fn load_grayscale(path: impl AsRef<Path>) -> Result<HeightField, HeightmapError> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|source| HeightmapError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    let field = sample(&image)?;
    log::info!(
        "Loaded heightmap '{}' ({}x{}, range {})",
        path.display(),
        field.width(),
        field.height(),
        field.high_value()
    );
    Ok(field)
}

fn sample(image: &DynamicImage) -> Result<HeightField, HeightmapError> {
    let rgb = image.to_rgb8();
    let (source_width, source_height) = rgb.dimensions();
    let width = even_floor(source_width as usize);
    let height = even_floor(source_height as usize);
    if width == 0 || height == 0 {
        return Err(HeightmapError::Degenerate {
            width: source_width,
            height: source_height,
        });
    }

    let mut field = HeightField::from_fn(width, height, |x, z| {
        f32::from(rgb.get_pixel(x as u32, z as u32).0[0])
    });
    field.normalize();
    Ok(field)
}

/// Renders `field` as an 8-bit grayscale preview, scaled by its range.
pub fn to_preview(field: &HeightField) -> GrayImage {
    GrayImage::from_fn(field.width() as u32, field.height() as u32, |x, z| {
        let shade = field.normalized(x as usize, z as usize).unwrap_or_default();
        Luma([(shade * 255.0).round() as u8])
    })
}

/// Writes the preview of `field` to `path`; the format follows the extension.
pub fn save_preview(field: &HeightField, path: impl AsRef<Path>) -> Result<(), HeightmapError> {
    let path = path.as_ref();
    to_preview(field)
        .save(path)
        .map_err(|source| HeightmapError::Save {
            path: path.to_path_buf(),
            source,
        })
}
