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

//! Moves CPU-side geometry into device buffers owned by a scene node.

use crate::geometry::GeometryData;
use tarn_core::renderer::{GraphicsDevice, ResourceError};
use tarn_data::scene::{IndexBuffer, NodeGeometry};

/// Uploads every stream `geometry` carries.
///
/// On failure the buffers created so far are released before the error is
/// returned, so nothing leaks.
pub fn upload_geometry(
    device: &mut dyn GraphicsDevice,
    label: &str,
    geometry: &GeometryData,
) -> Result<NodeGeometry, ResourceError> {
    let mut uploaded = NodeGeometry {
        vertex_count: geometry.vertex_count() as u32,
        ..Default::default()
    };

    if let Err(e) = upload_streams(device, label, geometry, &mut uploaded) {
        release_geometry(device, &uploaded);
        return Err(e);
    }

    log::debug!(
        "Uploaded '{}': {} vertices, {} draw elements",
        label,
        geometry.vertex_count(),
        geometry.draw_count()
    );
    Ok(uploaded)
}

fn upload_streams(
    device: &mut dyn GraphicsDevice,
    label: &str,
    geometry: &GeometryData,
    out: &mut NodeGeometry,
) -> Result<(), ResourceError> {
    out.positions =
        Some(device.create_vertex_buffer(&format!("{label}.positions"), geometry.flat_positions())?);

    if let Some(normals) = geometry.flat_normals() {
        out.normals = Some(device.create_vertex_buffer(&format!("{label}.normals"), normals)?);
    }
    if let Some(colors) = geometry.flat_colors() {
        out.colors = Some(device.create_vertex_buffer(&format!("{label}.colors"), colors)?);
    }
    if let Some(tex_coords) = geometry.flat_tex_coords() {
        out.tex_coords =
            Some(device.create_vertex_buffer(&format!("{label}.tex_coords"), tex_coords)?);
    }
    if let Some(indices) = &geometry.indices {
        let buffer = device.create_index_buffer(&format!("{label}.indices"), indices)?;
        out.indices = Some(IndexBuffer {
            buffer,
            format: indices.format(),
            count: indices.len() as u32,
        });
    }
    Ok(())
}

/// Destroys every buffer in `geometry`. Failures are logged, not returned.
pub fn release_geometry(device: &mut dyn GraphicsDevice, geometry: &NodeGeometry) {
    for buffer in geometry.buffers() {
        if let Err(e) = device.destroy_buffer(buffer) {
            log::warn!("Failed to release buffer {:?}: {}", buffer, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::quad_plane;
    use tarn_core::renderer::{HeadlessDevice, IndexFormat};

    #[test]
    fn quad_uploads_four_buffers() {
        let mut device = HeadlessDevice::new(64, 64);
        let geometry = upload_geometry(&mut device, "water", &quad_plane(10.0, false)).unwrap();

        assert_eq!(geometry.vertex_count, 4);
        assert!(geometry.colors.is_none());
        let indices = geometry.indices.unwrap();
        assert_eq!(indices.count, 6);
        assert_eq!(indices.format, IndexFormat::Uint16);
        assert_eq!(device.live_buffers(), 4);

        release_geometry(&mut device, &geometry);
        assert_eq!(device.live_buffers(), 0);
    }
}
