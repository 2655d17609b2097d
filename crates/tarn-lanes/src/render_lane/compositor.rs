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

//! Multi-pass frame driver.
//!
//! Every off-screen target is rendered, in registration order, before the
//! default framebuffer, so the final pass can sample what they produced.

use super::{NodeRenderer, PassError, QueueKind, RenderContext, RenderTarget};
use tarn_core::math::Vec4;
use tarn_core::renderer::{GraphicsDevice, VertexAttribute};
use tarn_data::assets::ShaderRegistry;
use tarn_data::{Camera, CameraMode, Environment, NodeId, SceneError, SceneGraph};

/// What a frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Target passes completed.
    pub passes: usize,
    /// Successful draw calls.
    pub draw_calls: usize,
    /// Nodes drawn, roots and children alike.
    pub nodes_drawn: usize,
    /// Queued roots skipped because they were disabled or parented.
    pub nodes_skipped: usize,
    /// Draws that failed and were logged.
    pub failed_draws: usize,
    /// Passes abandoned because their target could not be bound.
    pub failed_passes: usize,
}

/// Owns the off-screen targets and the default target.
#[derive(Debug)]
pub struct FrameCompositor {
    targets: Vec<RenderTarget>,
    default_target: RenderTarget,
    renderer: NodeRenderer,
}

impl FrameCompositor {
    /// Creates a compositor with only the default target.
    pub fn new(clear_color: Vec4) -> Self {
        Self {
            targets: Vec::new(),
            default_target: RenderTarget::default_framebuffer(clear_color),
            renderer: NodeRenderer::new(),
        }
    }

    /// Appends an off-screen target. Its passes run after those of earlier
    /// targets. A target with the same name is replaced in place; the caller
    /// gets the old one back to release it.
    pub fn add_target(&mut self, target: RenderTarget) -> Option<RenderTarget> {
        match self.targets.iter_mut().find(|t| t.name() == target.name()) {
            Some(slot) => {
                log::warn!("Render target '{}' replaced", target.name());
                Some(std::mem::replace(slot, target))
            }
            None => {
                self.targets.push(target);
                None
            }
        }
    }

    /// Looks up a target by name; `None` selects the default target.
    pub fn target(&self, name: Option<&str>) -> Result<&RenderTarget, SceneError> {
        match name {
            None => Ok(&self.default_target),
            Some(name) => self
                .targets
                .iter()
                .find(|t| t.name() == name)
                .ok_or_else(|| SceneError::UnknownTarget(name.to_owned())),
        }
    }

    fn target_mut(&mut self, name: Option<&str>) -> Result<&mut RenderTarget, SceneError> {
        match name {
            None => Ok(&mut self.default_target),
            Some(name) => self
                .targets
                .iter_mut()
                .find(|t| t.name() == name)
                .ok_or_else(|| SceneError::UnknownTarget(name.to_owned())),
        }
    }

    /// Queues `node` into one of a target's queues.
    ///
    /// Fails if the node or shader is unknown or the shader has no position
    /// input. The same node may sit in many queues at once.
    pub fn queue_node(
        &mut self,
        graph: &SceneGraph,
        shaders: &ShaderRegistry,
        target: Option<&str>,
        kind: QueueKind,
        node: NodeId,
        shader: &str,
    ) -> Result<(), SceneError> {
        let scene_node = graph.node(node)?;
        let handle = shaders
            .get(shader)
            .ok_or_else(|| SceneError::UnknownShader(shader.to_owned()))?;
        if !handle.capabilities.supports(VertexAttribute::Position) {
            return Err(SceneError::MissingShaderAttribute {
                node: scene_node.name.clone(),
                shader: shader.to_owned(),
                attribute: VertexAttribute::Position,
            });
        }
        if !scene_node.is_root() {
            log::warn!(
                "Node '{}' is queued but has a parent; it will be drawn through the parent only",
                scene_node.name
            );
        }

        self.target_mut(target)?.queue_mut(kind).insert(node, shader);
        Ok(())
    }

    /// Removes `node` from one of a target's queues.
    pub fn dequeue_node(
        &mut self,
        target: Option<&str>,
        kind: QueueKind,
        node: NodeId,
    ) -> Result<bool, SceneError> {
        Ok(self.target_mut(target)?.queue_mut(kind).remove(node))
    }

    /// Renders one frame: every off-screen target, then the default target.
    ///
    /// The camera is rebuilt for each pass with the target's camera mode and
    /// finally restored to its normal mode for the default pass. Failures are
    /// logged and counted; the frame always runs to the end.
    pub fn render_frame(
        &mut self,
        device: &mut dyn GraphicsDevice,
        graph: &SceneGraph,
        shaders: &ShaderRegistry,
        environment: &Environment,
        camera: &mut Camera,
    ) -> FrameStats {
        let mut stats = FrameStats::default();
        let water_level = environment.water_level;

        for target in &mut self.targets {
            camera.update_with(target.camera_mode(water_level));
            let ctx = RenderContext {
                graph,
                shaders,
                environment,
                view: camera.view_matrix(),
                projection: camera.projection_matrix(),
                clip_plane: target.clip_plane(water_level),
            };
            run_pass(&mut self.renderer, device, target, &ctx, &mut stats);
        }

        camera.update_with(CameraMode::Normal);
        let ctx = RenderContext {
            graph,
            shaders,
            environment,
            view: camera.view_matrix(),
            projection: camera.projection_matrix(),
            clip_plane: None,
        };
        run_pass(
            &mut self.renderer,
            device,
            &mut self.default_target,
            &ctx,
            &mut stats,
        );

        stats
    }

    /// Releases every off-screen target's attachments.
    pub fn release(&mut self, device: &mut dyn GraphicsDevice) -> Result<(), PassError> {
        let mut first_error = None;
        for target in &mut self.targets {
            if let Err(e) = target.release(device) {
                log::error!("Failed to release target '{}': {}", target.name(), e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

fn run_pass(
    renderer: &mut NodeRenderer,
    device: &mut dyn GraphicsDevice,
    target: &mut RenderTarget,
    ctx: &RenderContext<'_>,
    stats: &mut FrameStats,
) {
    if let Err(e) = target.activate(device) {
        log::error!("Skipping pass '{}': {}", target.name(), e);
        stats.failed_passes += 1;
        return;
    }

    for kind in QueueKind::DRAW_ORDER {
        let queue = target.queue(kind);
        if queue.is_empty() {
            continue;
        }
        device.set_depth_test(kind.depth_test());
        for entry in queue.iter() {
            let is_root = ctx.graph.get(entry.node).map_or(true, |n| n.is_root());
            if !is_root {
                stats.nodes_skipped += 1;
                continue;
            }
            renderer.render(device, ctx, entry.node, &entry.shader, stats);
        }
        if !kind.depth_test() {
            device.set_depth_test(true);
        }
    }

    match target.deactivate(device) {
        Ok(()) => stats.passes += 1,
        Err(e) => {
            log::error!("Pass '{}' did not end cleanly: {}", target.name(), e);
            stats.failed_passes += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_lane::{ClipSide, TargetCamera};
    use tarn_core::math::Vec3;
    use tarn_core::renderer::{
        DeviceCommand, HeadlessDevice, RenderTargetDescriptor, ShaderCapabilities, ShaderHandle,
    };
    use tarn_data::SceneNode;

    fn setup() -> (HeadlessDevice, SceneGraph, ShaderRegistry, NodeId) {
        let mut device = HeadlessDevice::new(320, 240);
        let id = device.create_shader_program("base").unwrap();
        let mut shaders = ShaderRegistry::new();
        shaders.insert(
            "base",
            ShaderHandle {
                id,
                capabilities: ShaderCapabilities::ALL,
            },
        );
        shaders.insert(
            "nopos",
            ShaderHandle {
                id,
                capabilities: ShaderCapabilities::default(),
            },
        );

        let mut graph = SceneGraph::new();
        let mut node = SceneNode::new("terrain", "base");
        node.geometry.positions = Some(device.create_vertex_buffer("p", &[0.0; 9]).unwrap());
        node.geometry.vertex_count = 3;
        let node = graph.add(node);
        (device, graph, shaders, node)
    }

    #[test]
    fn shaders_without_positions_are_rejected_at_queue_time() {
        let (_device, graph, shaders, node) = setup();
        let mut compositor = FrameCompositor::new(Vec4::W);
        assert!(matches!(
            compositor.queue_node(&graph, &shaders, None, QueueKind::Static, node, "nopos"),
            Err(SceneError::MissingShaderAttribute { .. })
        ));
        assert!(matches!(
            compositor.queue_node(&graph, &shaders, Some("nowhere"), QueueKind::Static, node, "base"),
            Err(SceneError::UnknownTarget(_))
        ));
    }

    #[test]
    fn non_depth_queue_draws_without_depth_test() {
        let (mut device, mut graph, shaders, node) = setup();
        let mut sky = SceneNode::new("sky", "base");
        sky.geometry.positions = Some(device.create_vertex_buffer("s", &[0.0; 9]).unwrap());
        sky.geometry.vertex_count = 3;
        let sky = graph.add(sky);

        let mut compositor = FrameCompositor::new(Vec4::W);
        compositor
            .queue_node(&graph, &shaders, None, QueueKind::Static, node, "base")
            .unwrap();
        compositor
            .queue_node(&graph, &shaders, None, QueueKind::NonDepth, sky, "base")
            .unwrap();
        device.take_commands();

        let mut camera = Camera::new(Vec3::ZERO);
        let stats = compositor.render_frame(
            &mut device,
            &graph,
            &shaders,
            &Environment::default(),
            &mut camera,
        );
        assert_eq!(stats.passes, 1);
        assert_eq!(stats.draw_calls, 2);

        let depth_and_draws: Vec<String> = device
            .commands()
            .iter()
            .filter_map(|c| match c {
                DeviceCommand::SetDepthTest(on) => Some(format!("depth:{on}")),
                c if c.is_draw() => Some("draw".to_owned()),
                _ => None,
            })
            .collect();
        assert_eq!(
            depth_and_draws,
            vec!["depth:false", "draw", "depth:true", "depth:true", "draw"]
        );
    }

    #[test]
    fn offscreen_pass_uploads_its_clip_plane() {
        let (mut device, graph, shaders, node) = setup();
        let mut compositor = FrameCompositor::new(Vec4::W);
        let target = RenderTarget::offscreen(
            &mut device,
            &RenderTargetDescriptor {
                label: "refraction".into(),
                width: 64,
                height: 64,
            },
            Some(ClipSide::KeepBelow),
            TargetCamera::Primary,
            Vec4::W,
        )
        .unwrap();
        assert!(compositor.add_target(target).is_none());
        compositor
            .queue_node(&graph, &shaders, Some("refraction"), QueueKind::Static, node, "base")
            .unwrap();

        let environment = Environment {
            water_level: 12.0,
            ..Default::default()
        };
        let mut camera = Camera::new(Vec3::ZERO);
        let stats = compositor.render_frame(&mut device, &graph, &shaders, &environment, &mut camera);
        assert_eq!(stats.passes, 2);

        assert!(device.commands().contains(&DeviceCommand::SetUniform {
            name: "u_ClipPlane".into(),
            value: tarn_core::renderer::UniformValue::Vec4(Vec4::new(0.0, -1.0, 0.0, 12.0)),
        }));

        compositor.release(&mut device).unwrap();
        assert_eq!(device.live_render_targets(), 0);
    }

    #[test]
    fn released_target_fails_its_pass_but_not_the_frame() {
        let (mut device, graph, shaders, node) = setup();
        let mut compositor = FrameCompositor::new(Vec4::W);
        let mut target = RenderTarget::offscreen(
            &mut device,
            &RenderTargetDescriptor {
                label: "refraction".into(),
                width: 64,
                height: 64,
            },
            Some(ClipSide::KeepBelow),
            TargetCamera::Primary,
            Vec4::W,
        )
        .unwrap();
        target.release(&mut device).unwrap();
        assert!(compositor.add_target(target).is_none());
        compositor
            .queue_node(&graph, &shaders, Some("refraction"), QueueKind::Static, node, "base")
            .unwrap();
        compositor
            .queue_node(&graph, &shaders, None, QueueKind::Static, node, "base")
            .unwrap();

        let mut camera = Camera::new(Vec3::ZERO);
        let stats = compositor.render_frame(
            &mut device,
            &graph,
            &shaders,
            &Environment::default(),
            &mut camera,
        );
        assert_eq!(stats.failed_passes, 1);
        assert_eq!(stats.passes, 1);
        assert_eq!(stats.draw_calls, 1);
        assert!(!compositor.target(Some("refraction")).unwrap().is_active());
    }

    #[test]
    fn parented_roots_are_skipped() {
        let (mut device, mut graph, shaders, node) = setup();
        let parent = graph.add(SceneNode::new("parent", "base"));
        let mut compositor = FrameCompositor::new(Vec4::W);
        compositor
            .queue_node(&graph, &shaders, None, QueueKind::Static, node, "base")
            .unwrap();
        graph.attach_child(parent, node).unwrap();

        let mut camera = Camera::new(Vec3::ZERO);
        let stats = compositor.render_frame(
            &mut device,
            &graph,
            &shaders,
            &Environment::default(),
            &mut camera,
        );
        assert_eq!(stats.nodes_skipped, 1);
        assert_eq!(stats.draw_calls, 0);
    }
}
