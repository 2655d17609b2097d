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

use super::{PassError, QueueKind, RenderQueue};
use serde::{Deserialize, Serialize};
use tarn_core::math::Vec4;
use tarn_core::renderer::{
    ClipPlane, FramebufferId, GraphicsDevice, RenderTargetAttachments, RenderTargetDescriptor,
    TextureId, Viewport,
};
use tarn_data::CameraMode;

/// Which side of the water plane a pass keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClipSide {
    /// Discards fragments below the water (reflection).
    KeepAbove,
    /// Discards fragments above the water (refraction).
    KeepBelow,
}

impl ClipSide {
    /// The plane equation for a water surface at `water_level`.
    pub fn plane(self, water_level: f32) -> ClipPlane {
        match self {
            ClipSide::KeepAbove => ClipPlane::keep_above(water_level),
            ClipSide::KeepBelow => ClipPlane::keep_below(water_level),
        }
    }
}

/// How a target adapts the primary camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetCamera {
    /// Uses the camera unchanged.
    #[default]
    Primary,
    /// Pitch zeroed, roll 180.
    Reflect,
    /// Mirrors the eye about the current water level.
    MirrorAboutWater,
}

impl TargetCamera {
    /// The camera mode for a pass with the water at `water_level`.
    pub fn mode(self, water_level: f32) -> CameraMode {
        match self {
            TargetCamera::Primary => CameraMode::Normal,
            TargetCamera::Reflect => CameraMode::Reflect,
            TargetCamera::MirrorAboutWater => CameraMode::Mirror(water_level),
        }
    }
}

/// Where a target draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Surface {
    Default,
    Offscreen(RenderTargetAttachments),
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetState {
    Inactive,
    Active,
}

/// A pass destination plus the two queues drawn into it.
///
/// Off-screen targets own their framebuffer until [`release`](Self::release);
/// the default target draws to the surface and owns nothing.
#[derive(Debug)]
pub struct RenderTarget {
    name: String,
    surface: Surface,
    width: u32,
    height: u32,
    clip: Option<ClipSide>,
    camera: TargetCamera,
    clear_color: Vec4,
    state: TargetState,
    non_depth: RenderQueue,
    static_queue: RenderQueue,
}

impl RenderTarget {
    /// Allocates an off-screen color and depth target.
    ///
    /// Allocation failure is returned to the caller; no half-built target
    /// exists afterwards.
    pub fn offscreen(
        device: &mut dyn GraphicsDevice,
        descriptor: &RenderTargetDescriptor,
        clip: Option<ClipSide>,
        camera: TargetCamera,
        clear_color: Vec4,
    ) -> Result<Self, PassError> {
        let attachments = device.create_render_target(descriptor)?;
        log::info!(
            "Created render target '{}' ({}x{})",
            descriptor.label,
            descriptor.width,
            descriptor.height
        );
        Ok(Self {
            name: descriptor.label.clone(),
            surface: Surface::Offscreen(attachments),
            width: descriptor.width,
            height: descriptor.height,
            clip,
            camera,
            clear_color,
            state: TargetState::Inactive,
            non_depth: RenderQueue::new(),
            static_queue: RenderQueue::new(),
        })
    }

    /// The default framebuffer, sized to the device surface at activation.
    pub fn default_framebuffer(clear_color: Vec4) -> Self {
        Self {
            name: "default".to_owned(),
            surface: Surface::Default,
            width: 0,
            height: 0,
            clip: None,
            camera: TargetCamera::Primary,
            clear_color,
            state: TargetState::Inactive,
            non_depth: RenderQueue::new(),
            static_queue: RenderQueue::new(),
        }
    }

    /// Target name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` for the default framebuffer.
    pub fn is_default(&self) -> bool {
        self.surface == Surface::Default
    }

    /// Returns `true` between activate and deactivate.
    pub fn is_active(&self) -> bool {
        self.state == TargetState::Active
    }

    /// The color attachment, sampleable once the pass has run.
    pub fn color_texture(&self) -> Option<TextureId> {
        match self.surface {
            Surface::Offscreen(attachments) => Some(attachments.color),
            _ => None,
        }
    }

    /// The clip plane for this target with the water at `water_level`.
    pub fn clip_plane(&self, water_level: f32) -> Option<ClipPlane> {
        self.clip.map(|side| side.plane(water_level))
    }

    /// The camera mode for this target with the water at `water_level`.
    pub fn camera_mode(&self, water_level: f32) -> CameraMode {
        self.camera.mode(water_level)
    }

    /// The queue of the given kind.
    pub fn queue(&self, kind: QueueKind) -> &RenderQueue {
        match kind {
            QueueKind::NonDepth => &self.non_depth,
            QueueKind::Static => &self.static_queue,
        }
    }

    /// The queue of the given kind, mutably.
    pub fn queue_mut(&mut self, kind: QueueKind) -> &mut RenderQueue {
        match kind {
            QueueKind::NonDepth => &mut self.non_depth,
            QueueKind::Static => &mut self.static_queue,
        }
    }

    fn framebuffer(&self) -> Result<Option<FramebufferId>, PassError> {
        match self.surface {
            Surface::Default => Ok(None),
            Surface::Offscreen(attachments) => Ok(Some(attachments.framebuffer)),
            Surface::Released => Err(PassError::Released(self.name.clone())),
        }
    }

    /// Binds the target, sets its viewport and clears it.
    pub fn activate(&mut self, device: &mut dyn GraphicsDevice) -> Result<(), PassError> {
        if self.is_active() {
            return Err(PassError::AlreadyActive(self.name.clone()));
        }
        let framebuffer = self.framebuffer()?;
        let (width, height) = match framebuffer {
            Some(_) => (self.width, self.height),
            None => device.surface_size(),
        };

        device.bind_framebuffer(framebuffer);
        device.set_viewport(Viewport::full(width, height));
        device.clear(self.clear_color);
        self.state = TargetState::Active;
        Ok(())
    }

    /// Restores the default framebuffer and its viewport.
    pub fn deactivate(&mut self, device: &mut dyn GraphicsDevice) -> Result<(), PassError> {
        if !self.is_active() {
            return Err(PassError::NotActive(self.name.clone()));
        }
        let (width, height) = device.surface_size();
        device.bind_framebuffer(None);
        device.set_viewport(Viewport::full(width, height));
        self.state = TargetState::Inactive;
        Ok(())
    }

    /// Frees the target's attachments. Releasing twice, or releasing the
    /// default target, does nothing.
    pub fn release(&mut self, device: &mut dyn GraphicsDevice) -> Result<(), PassError> {
        if let Surface::Offscreen(attachments) = self.surface {
            device.destroy_render_target(&attachments)?;
            self.surface = Surface::Released;
            log::info!("Released render target '{}'", self.name);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarn_core::renderer::{DeviceCommand, HeadlessDevice};

    fn descriptor(label: &str) -> RenderTargetDescriptor {
        RenderTargetDescriptor {
            label: label.to_owned(),
            width: 256,
            height: 128,
        }
    }

    #[test]
    fn activation_cycle() {
        let mut device = HeadlessDevice::new(800, 600);
        let mut target = RenderTarget::offscreen(
            &mut device,
            &descriptor("reflection"),
            Some(ClipSide::KeepAbove),
            TargetCamera::Reflect,
            Vec4::W,
        )
        .unwrap();
        device.take_commands();

        target.activate(&mut device).unwrap();
        assert!(target.is_active());
        assert!(matches!(
            target.activate(&mut device),
            Err(PassError::AlreadyActive(_))
        ));
        target.deactivate(&mut device).unwrap();
        assert!(matches!(
            target.deactivate(&mut device),
            Err(PassError::NotActive(_))
        ));

        let commands = device.take_commands();
        assert!(matches!(commands[0], DeviceCommand::BindFramebuffer(Some(_))));
        assert_eq!(commands[1], DeviceCommand::SetViewport(Viewport::full(256, 128)));
        assert_eq!(commands[2], DeviceCommand::Clear(Vec4::W));
        assert_eq!(commands[3], DeviceCommand::BindFramebuffer(None));
        assert_eq!(commands[4], DeviceCommand::SetViewport(Viewport::full(800, 600)));
    }

    #[test]
    fn clip_planes_follow_the_water() {
        let above = ClipSide::KeepAbove.plane(30.0);
        let below = ClipSide::KeepBelow.plane(30.0);
        assert_eq!(above.as_vec4(), Vec4::new(0.0, 1.0, 0.0, -30.0));
        assert_eq!(below.as_vec4(), Vec4::new(0.0, -1.0, 0.0, 30.0));
        assert_eq!(
            TargetCamera::MirrorAboutWater.mode(30.0),
            CameraMode::Mirror(30.0)
        );
    }

    #[test]
    fn default_target_uses_the_surface() {
        let mut device = HeadlessDevice::new(640, 480);
        let mut target = RenderTarget::default_framebuffer(Vec4::new(1.0, 1.0, 1.0, 1.0));
        assert!(target.is_default());
        assert_eq!(target.color_texture(), None);
        target.activate(&mut device).unwrap();
        assert_eq!(
            device.commands()[1],
            DeviceCommand::SetViewport(Viewport::full(640, 480))
        );
    }

    #[test]
    fn released_targets_cannot_activate() {
        let mut device = HeadlessDevice::new(64, 64);
        let mut target = RenderTarget::offscreen(
            &mut device,
            &descriptor("refraction"),
            Some(ClipSide::KeepBelow),
            TargetCamera::Primary,
            Vec4::W,
        )
        .unwrap();
        target.release(&mut device).unwrap();
        target.release(&mut device).unwrap();
        assert_eq!(device.live_render_targets(), 0);
        assert!(matches!(
            target.activate(&mut device),
            Err(PassError::Released(_))
        ));
    }

    #[test]
    fn allocation_failure_propagates() {
        let mut device = HeadlessDevice::new(64, 64);
        device.fail_target_allocation(true);
        let result = RenderTarget::offscreen(
            &mut device,
            &descriptor("reflection"),
            None,
            TargetCamera::Primary,
            Vec4::W,
        );
        assert!(matches!(result, Err(PassError::Resource(_))));
    }
}
