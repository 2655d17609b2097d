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

//! The engine facade: owns the device, the scene and the compositor, and
//! drives one frame per [`Engine::tick`].

use crate::config::EngineConfig;
use anyhow::{Context, Result};
use tarn_core::math::Vec3;
use tarn_core::renderer::{
    GraphicsDevice, PrimitiveTopology, RenderTargetDescriptor, ShaderCapabilities, ShaderHandle,
    TextureId,
};
use tarn_data::assets::{AssetManifest, ShaderRegistry, TextureRegistry};
use tarn_data::{
    Camera, Environment, HeightField, MovementIntent, NodeId, SceneError, SceneGraph, SceneNode,
};
use tarn_io::FaultLineGenerator;
use tarn_lanes::animation_lane::{LightPath, PathAnimator, PathMode};
use tarn_lanes::primitives::quad_plane;
use tarn_lanes::render_lane::{
    release_geometry, upload_geometry, ClipSide, FrameCompositor, FrameStats, QueueKind,
    RenderTarget, TargetCamera,
};
use tarn_lanes::scene_lane::{tick_hooks, SkyDome, WaterScroll};
use tarn_lanes::terrain_lane::{normal_lines, TerrainMesher};

/// Off-screen target holding everything above the water.
pub const REFLECTION_TARGET: &str = "reflection";
/// Off-screen target holding everything below the water.
pub const REFRACTION_TARGET: &str = "refraction";
/// Manifest entry for the terrain heightmap.
pub const HEIGHTMAP_ASSET: &str = "heightmap";

const TERRAIN_TEXTURE: &str = "terrain";
const TERRAIN_NORMAL_MAP: &str = "terrain_normal";
const SKY_TEXTURE: &str = "sky";
const FLOOR_TEXTURE: &str = "floor";
const LIGHT_MARKER_TEXTURE: &str = "lightbulb";
const LIGHT_MARKER_SIZE: f32 = 20.0;
const NORMAL_DEBUG_SHADER: &str = "line";

#[derive(Debug, Clone, Copy)]
struct TerrainNodes {
    surface: NodeId,
    normals: NodeId,
}

#[derive(Debug, Clone, Copy)]
struct Regeneration {
    width: usize,
    height: usize,
    steps: u32,
}

/// The running engine.
///
/// Setup goes through the `register_*` and `add_*` methods; after every
/// declared asset has been reported loaded, [`tick`](Self::tick) renders one
/// frame. Resources are released by [`shutdown`](Self::shutdown) or on drop.
#[derive(Debug)]
pub struct Engine<D: GraphicsDevice> {
    device: D,
    config: EngineConfig,
    graph: SceneGraph,
    shaders: ShaderRegistry,
    textures: TextureRegistry,
    manifest: AssetManifest,
    environment: Environment,
    camera: Camera,
    compositor: FrameCompositor,
    mesher: TerrainMesher,
    generator: FaultLineGenerator,
    terrain: Option<TerrainNodes>,
    sky: Option<SkyDome>,
    paths: Vec<PathAnimator>,
    light_paths: Vec<(LightPath, NodeId)>,
    pending_regeneration: Option<Regeneration>,
    render_mode_override: Option<PrimitiveTopology>,
    shut_down: bool,
}

impl<D: GraphicsDevice> Engine<D> {
    /// Builds the engine and allocates the reflection and refraction targets.
    ///
    /// Target allocation failure is fatal and returned.
    pub fn new(mut device: D, config: EngineConfig) -> Result<Self> {
        let mut compositor = FrameCompositor::new(config.clear_color);
        let mut textures = TextureRegistry::new();
        let size = config.water.target_size;

        let targets = [
            (REFLECTION_TARGET, ClipSide::KeepAbove, config.water.reflection_camera),
            (REFRACTION_TARGET, ClipSide::KeepBelow, TargetCamera::Primary),
        ];
        for (name, clip, camera) in targets {
            let descriptor = RenderTargetDescriptor {
                label: name.to_owned(),
                width: size,
                height: size,
            };
            let target = match RenderTarget::offscreen(
                &mut device,
                &descriptor,
                Some(clip),
                camera,
                config.target_clear_color,
            ) {
                Ok(target) => target,
                Err(e) => {
                    if let Err(release) = compositor.release(&mut device) {
                        log::warn!("Failed to release partially built targets: {release}");
                    }
                    return Err(e).with_context(|| format!("Failed to create the {name} target"));
                }
            };
            if let Some(color) = target.color_texture() {
                textures.insert(name, color);
            }
            compositor.add_target(target);
        }

        let mut camera = Camera::new(config.camera.position);
        camera.set_rotation(config.camera.pitch, config.camera.yaw);
        camera.walk_speed = config.camera.walk_speed;
        camera.turn_speed = config.camera.turn_speed;
        camera.projection = config.camera.projection;

        let environment = Environment {
            lights: config.lights.clone(),
            fog: config.fog,
            shininess: config.shininess,
            water_level: config.water.level,
        };

        let mesher = TerrainMesher {
            stretch: config.terrain.stretch,
            tiling: config.terrain.tiling,
            index_width: config.terrain.index_width,
            topology: config.terrain.topology,
        };

        let mut manifest = AssetManifest::new();
        manifest.declare(HEIGHTMAP_ASSET);

        log::info!("Engine created with {size}x{size} water targets");

        Ok(Self {
            device,
            generator: FaultLineGenerator::new(config.terrain.seed),
            config,
            graph: SceneGraph::new(),
            shaders: ShaderRegistry::new(),
            textures,
            manifest,
            environment,
            camera,
            compositor,
            mesher,
            terrain: None,
            sky: None,
            paths: Vec::new(),
            light_paths: Vec::new(),
            pending_regeneration: None,
            render_mode_override: None,
            shut_down: false,
        })
    }

    /// Resolves a shader program on the device and registers it by class name.
    pub fn register_shader(
        &mut self,
        name: &str,
        capabilities: ShaderCapabilities,
    ) -> Result<ShaderHandle> {
        let id = self
            .device
            .create_shader_program(name)
            .with_context(|| format!("Failed to create shader '{name}'"))?;
        let handle = ShaderHandle { id, capabilities };
        if self.shaders.insert(name, handle).is_some() {
            log::warn!("Shader '{name}' re-registered");
        }
        Ok(handle)
    }

    /// Creates a texture and declares it as an asset that must finish loading
    /// before the first frame.
    pub fn register_texture(&mut self, name: &str, width: u32, height: u32) -> Result<TextureId> {
        let id = self
            .device
            .create_texture(name, width, height)
            .with_context(|| format!("Failed to create texture '{name}'"))?;
        self.textures.insert(name, id);
        self.manifest.declare(name);
        Ok(id)
    }

    /// Reports that an asset finished loading. Returns `false` for names
    /// that were never declared.
    pub fn mark_asset_loaded(&mut self, name: &str) -> bool {
        self.manifest.mark_loaded(name)
    }

    /// Returns `true` once every declared asset has loaded.
    pub fn assets_ready(&self) -> bool {
        self.manifest.is_ready()
    }

    /// Meshes `field` into the terrain node plus its normal-debug node and
    /// queues the terrain into every target.
    ///
    /// Registering the terrain also reports the heightmap as loaded.
    pub fn register_terrain_node(&mut self, name: &str, field: &HeightField) -> Result<NodeId> {
        if self.terrain.is_some() {
            anyhow::bail!("A terrain is already registered");
        }

        let mesh = self
            .mesher
            .build(field)
            .with_context(|| format!("Failed to mesh terrain '{name}'"))?;

        let mut surface = SceneNode::new(name, self.config.terrain.shader.as_str())
            .with_topology(mesh.topology);
        surface.geometry = upload_geometry(&mut self.device, name, &mesh.to_geometry())?;
        surface.texture = self.textures.get(TERRAIN_TEXTURE);
        surface.secondary_texture = self.textures.get(TERRAIN_NORMAL_MAP);
        surface.use_lighting = true;
        surface.use_fog = true;

        let normals_name = format!("{name}_normals");
        let lines = normal_lines(&mesh.vertices);
        let mut normals = SceneNode::new(normals_name.as_str(), NORMAL_DEBUG_SHADER)
            .with_topology(lines.topology);
        normals.geometry = match upload_geometry(&mut self.device, &normals_name, &lines) {
            Ok(geometry) => geometry,
            Err(e) => {
                release_geometry(&mut self.device, &surface.geometry);
                return Err(e).context("Failed to upload terrain normals");
            }
        };
        normals.enabled = false;

        let surface = self.add_node(surface);
        let normals = self.add_node(normals);
        self.terrain = Some(TerrainNodes { surface, normals });

        let shader = self.config.terrain.shader.clone();
        for target in [None, Some(REFLECTION_TARGET), Some(REFRACTION_TARGET)] {
            self.queue_node(target, QueueKind::Static, surface, &shader)?;
        }
        if self.shaders.get(NORMAL_DEBUG_SHADER).is_some() {
            self.queue_node(None, QueueKind::Static, normals, NORMAL_DEBUG_SHADER)?;
        } else {
            log::warn!("No '{NORMAL_DEBUG_SHADER}' shader registered; terrain normals will never draw");
        }

        self.manifest.mark_loaded(HEIGHTMAP_ASSET);
        log::info!(
            "Registered terrain '{}' ({}x{}, {} vertices)",
            name,
            mesh.width,
            mesh.height,
            mesh.vertices.len()
        );
        Ok(surface)
    }

    /// Adds the water plane, textured with the reflection and refraction
    /// targets, to the default target.
    pub fn add_water(&mut self) -> Result<NodeId> {
        let data = quad_plane(self.config.water.plane_size, false);
        let mut node =
            SceneNode::new("water", self.config.water.shader.as_str()).with_topology(data.topology);
        node.geometry = upload_geometry(&mut self.device, "water", &data)?;
        node.position = Vec3::new(0.0, self.environment.water_level, 0.0);
        node.texture = self.textures.get(REFLECTION_TARGET);
        node.secondary_texture = self.textures.get(REFRACTION_TARGET);
        node.use_fog = true;
        node.set_hook(Box::new(WaterScroll::new()));

        let id = self.add_node(node);
        let shader = self.config.water.shader.clone();
        self.queue_node(None, QueueKind::Static, id, &shader)?;
        Ok(id)
    }

    /// Adds the camera-following sky dome and floor to the default and
    /// reflection targets.
    pub fn add_sky(&mut self) -> Result<SkyDome> {
        let sky = SkyDome::build(
            &mut self.device,
            &mut self.graph,
            self.config.sky,
            self.textures.get(SKY_TEXTURE),
            self.textures.get(FLOOR_TEXTURE),
        )
        .context("Failed to build the sky dome")?;
        if let Some(mode) = self.render_mode_override {
            for id in [sky.floor, sky.dome] {
                if let Some(node) = self.graph.get_mut(id) {
                    node.set_render_mode_override(mode);
                }
            }
        }

        for target in [None, Some(REFLECTION_TARGET)] {
            self.queue_node(target, QueueKind::NonDepth, sky.floor, "base")?;
            self.queue_node(target, QueueKind::NonDepth, sky.dome, "base")?;
        }
        sky.follow(&mut self.graph, self.camera.position);
        self.sky = Some(sky);
        Ok(sky)
    }

    /// Adds a marker for light `light` that travels `waypoints` while the
    /// light is enabled. The light's render position follows the marker.
    pub fn add_light_marker(
        &mut self,
        light: usize,
        waypoints: Vec<Vec3>,
        mode: PathMode,
    ) -> Result<NodeId> {
        let Some(source) = self.environment.lights.get(light) else {
            anyhow::bail!("No light at index {light}");
        };
        let start = source.render_position;

        let mut path = PathAnimator::new(waypoints, mode, self.config.paths)?;
        let name = format!("light_{light}");
        let data = quad_plane(LIGHT_MARKER_SIZE, true);
        let mut node = SceneNode::new(name.as_str(), "base").with_topology(data.topology);
        node.geometry = upload_geometry(&mut self.device, &name, &data)?;
        node.texture = self.textures.get(LIGHT_MARKER_TEXTURE);
        node.position = start;

        let id = self.add_node(node);
        self.queue_node(None, QueueKind::Static, id, "base")?;
        path.attach(id);
        self.light_paths.push((LightPath { light, path }, id));
        Ok(id)
    }

    /// Adds a path and returns its index for [`attach_to_path`](Self::attach_to_path).
    pub fn add_path(&mut self, waypoints: Vec<Vec3>, mode: PathMode) -> Result<usize> {
        self.paths
            .push(PathAnimator::new(waypoints, mode, self.config.paths)?);
        Ok(self.paths.len() - 1)
    }

    /// Puts an existing node on path `path`.
    pub fn attach_to_path(&mut self, path: usize, node: NodeId) -> Result<()> {
        self.graph.node(node)?;
        let animator = self
            .paths
            .get_mut(path)
            .with_context(|| format!("No path at index {path}"))?;
        animator.attach(node);
        Ok(())
    }

    /// Adds a node to the scene, applying any active render-mode override.
    pub fn add_node(&mut self, mut node: SceneNode) -> NodeId {
        if let Some(mode) = self.render_mode_override {
            node.set_render_mode_override(mode);
        }
        self.graph.add(node)
    }

    /// Queues `node` into a target's queue. `None` is the default target.
    pub fn queue_node(
        &mut self,
        target: Option<&str>,
        kind: QueueKind,
        node: NodeId,
        shader: &str,
    ) -> Result<(), SceneError> {
        self.compositor
            .queue_node(&self.graph, &self.shaders, target, kind, node, shader)
    }

    /// Removes `node` from a target's queue.
    pub fn dequeue_node(
        &mut self,
        target: Option<&str>,
        kind: QueueKind,
        node: NodeId,
    ) -> Result<bool, SceneError> {
        self.compositor.dequeue_node(target, kind, node)
    }

    /// Asks for a new fault-line terrain. The swap happens at the start of the
    /// next tick; a second request before then is refused.
    pub fn request_regeneration(
        &mut self,
        width: usize,
        height: usize,
        steps: u32,
    ) -> Result<(), SceneError> {
        if self.pending_regeneration.is_some() {
            return Err(SceneError::RegenerationInProgress);
        }
        if self.terrain.is_none() {
            return Err(SceneError::UnknownNodeName("terrain".to_owned()));
        }
        self.pending_regeneration = Some(Regeneration {
            width,
            height,
            steps,
        });
        Ok(())
    }

    /// Returns `true` while a regeneration request waits for the next tick.
    pub fn regeneration_pending(&self) -> bool {
        self.pending_regeneration.is_some()
    }

    /// Forces every node to draw with `mode`, or restores their own
    /// topology with `None`.
    pub fn set_render_mode_override(&mut self, mode: Option<PrimitiveTopology>) {
        self.render_mode_override = mode;
        for node in self.graph.iter_mut() {
            match mode {
                Some(mode) => node.set_render_mode_override(mode),
                None => node.clear_render_mode_override(),
            }
        }
    }

    /// Shows or hides the terrain normal lines.
    pub fn set_normal_debug_visible(&mut self, visible: bool) {
        let Some(terrain) = self.terrain else {
            return;
        };
        if let Some(node) = self.graph.get_mut(terrain.normals) {
            node.enabled = visible;
        }
    }

    /// Moves the water surface. Both off-screen passes clip against the new
    /// level from the next frame on.
    pub fn set_water_level(&mut self, level: f32) {
        self.environment.water_level = level;
        if let Some(water) = self.graph.find("water") {
            if let Some(node) = self.graph.get_mut(water) {
                node.position.y = level;
            }
        }
    }

    /// Advances the scene by `delta_ms` milliseconds and renders one frame.
    ///
    /// Fails before any rendering while declared assets are still loading, or
    /// when a pending regeneration produced an unusable terrain. Draw failures
    /// inside the frame are logged and counted in the returned stats.
    pub fn tick(&mut self, delta_ms: f32, intent: &MovementIntent) -> Result<FrameStats> {
        if !self.manifest.is_ready() {
            return Err(SceneError::AssetsNotReady {
                missing: self.manifest.missing(),
            }
            .into());
        }

        if let Some(request) = self.pending_regeneration.take() {
            self.regenerate(request)
                .context("Terrain regeneration failed")?;
        }

        self.camera.apply_intent(intent);
        tick_hooks(&mut self.graph, delta_ms);

        for path in &mut self.paths {
            path.tick(&mut self.graph, delta_ms);
        }
        for (light_path, marker) in &mut self.light_paths {
            if light_path.tick(&mut self.graph, &self.environment, delta_ms) {
                let position = self.graph.get(*marker).map(|n| n.position);
                if let (Some(position), Some(light)) =
                    (position, self.environment.lights.get_mut(light_path.light))
                {
                    light.render_position = position;
                }
            }
        }

        if let Some(sky) = &self.sky {
            sky.follow(&mut self.graph, self.camera.position);
        }

        let stats = self.compositor.render_frame(
            &mut self.device,
            &self.graph,
            &self.shaders,
            &self.environment,
            &mut self.camera,
        );
        if stats.failed_draws > 0 || stats.failed_passes > 0 {
            log::warn!(
                "Frame finished with {} failed draws and {} failed passes",
                stats.failed_draws,
                stats.failed_passes
            );
        }
        Ok(stats)
    }

    fn regenerate(&mut self, request: Regeneration) -> Result<()> {
        let terrain = self
            .terrain
            .ok_or_else(|| SceneError::UnknownNodeName("terrain".to_owned()))?;
        log::info!(
            "Regenerating terrain: {}x{}, {} fault lines",
            request.width,
            request.height,
            request.steps
        );

        let field = self
            .generator
            .generate(request.width, request.height, request.steps);
        let mesh = self.mesher.build(&field)?;

        let surface_name = self.graph.node(terrain.surface)?.name.clone();
        let normals_name = self.graph.node(terrain.normals)?.name.clone();

        let surface = upload_geometry(&mut self.device, &surface_name, &mesh.to_geometry())?;
        let normals =
            match upload_geometry(&mut self.device, &normals_name, &normal_lines(&mesh.vertices)) {
                Ok(geometry) => geometry,
                Err(e) => {
                    release_geometry(&mut self.device, &surface);
                    return Err(e.into());
                }
            };

        for (id, geometry) in [(terrain.surface, surface), (terrain.normals, normals)] {
            let node = self.graph.node_mut(id)?;
            let old = std::mem::replace(&mut node.geometry, geometry);
            release_geometry(&mut self.device, &old);
        }
        Ok(())
    }

    /// Releases every node buffer and target attachment. Safe to call twice.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        for node in self.graph.iter_mut() {
            release_geometry(&mut self.device, &node.geometry);
            node.geometry = Default::default();
        }
        if let Err(e) = self.compositor.release(&mut self.device) {
            log::error!("Failed to release render targets: {e}");
        }
        log::info!("Engine shut down");
    }

    /// The graphics device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// The graphics device, mutably.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// The scene graph.
    pub fn scene(&self) -> &SceneGraph {
        &self.graph
    }

    /// The scene graph, mutably.
    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// The camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The shading environment.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// The shading environment, mutably. Lights and fog may change between
    /// frames.
    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    /// Texture handle registered under `name`.
    pub fn texture(&self, name: &str) -> Option<TextureId> {
        self.textures.get(name)
    }

    /// Terrain node handle, once registered.
    pub fn terrain_node(&self) -> Option<NodeId> {
        self.terrain.map(|t| t.surface)
    }

    /// Terrain normal-debug node handle, once registered.
    pub fn normal_debug_node(&self) -> Option<NodeId> {
        self.terrain.map(|t| t.normals)
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl<D: GraphicsDevice> Drop for Engine<D> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarn_core::renderer::HeadlessDevice;

    fn engine() -> Engine<HeadlessDevice> {
        let mut engine = Engine::new(HeadlessDevice::new(640, 480), EngineConfig::default()).unwrap();
        engine.register_shader("base", ShaderCapabilities::ALL).unwrap();
        engine
    }

    fn field() -> HeightField {
        let mut field = HeightField::from_fn(4, 4, |x, z| (x + z) as f32);
        field.normalize();
        field
    }

    #[test]
    fn targets_are_registered_as_textures() {
        let engine = engine();
        assert!(engine.texture(REFLECTION_TARGET).is_some());
        assert!(engine.texture(REFRACTION_TARGET).is_some());
        assert_eq!(engine.device().live_render_targets(), 2);
    }

    #[test]
    fn target_allocation_failure_is_fatal() {
        let mut device = HeadlessDevice::new(64, 64);
        device.fail_target_allocation(true);
        assert!(Engine::new(device, EngineConfig::default()).is_err());
    }

    #[test]
    fn terrain_registration_marks_heightmap_loaded() {
        let mut engine = engine();
        assert!(!engine.assets_ready());
        engine.register_terrain_node("terrain", &field()).unwrap();
        assert!(engine.assets_ready());

        let normals = engine.normal_debug_node().unwrap();
        assert!(!engine.scene().get(normals).unwrap().enabled);
        engine.set_normal_debug_visible(true);
        assert!(engine.scene().get(normals).unwrap().enabled);
    }

    #[test]
    fn second_terrain_is_refused() {
        let mut engine = engine();
        engine.register_terrain_node("terrain", &field()).unwrap();
        assert!(engine.register_terrain_node("terrain", &field()).is_err());
    }

    #[test]
    fn override_reaches_every_node() {
        let mut engine = engine();
        engine.register_terrain_node("terrain", &field()).unwrap();
        engine.set_render_mode_override(Some(PrimitiveTopology::LineList));
        let water = engine.add_water().unwrap();

        for (_, node) in engine.scene().iter() {
            assert_eq!(node.topology(), PrimitiveTopology::LineList);
        }
        engine.set_render_mode_override(None);
        assert_eq!(
            engine.scene().get(water).unwrap().topology(),
            PrimitiveTopology::TriangleList
        );
    }

    #[test]
    fn water_level_moves_the_plane() {
        let mut engine = engine();
        let water = engine.add_water().unwrap();
        engine.set_water_level(42.0);
        assert_eq!(engine.environment().water_level, 42.0);
        assert_eq!(engine.scene().get(water).unwrap().position.y, 42.0);
    }

    #[test]
    fn shutdown_releases_everything_once() {
        let mut engine = engine();
        engine.register_terrain_node("terrain", &field()).unwrap();
        engine.add_sky().unwrap();
        engine.shutdown();
        assert_eq!(engine.device().live_buffers(), 0);
        assert_eq!(engine.device().live_render_targets(), 0);

        let recorded = engine.device().commands().len();
        engine.shutdown();
        assert_eq!(engine.device().commands().len(), recorded);
    }
}
