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

use anyhow::Result;
use tarn_core::renderer::{DeviceCommand, HeadlessDevice, ShaderCapabilities};
use tarn_data::{HeightField, MovementIntent, SceneError, SceneNode};
use tarn_lanes::primitives::quad_plane;
use tarn_lanes::render_lane::{upload_geometry, QueueKind};
use tarn_lanes::terrain_lane::MeshError;
use tarn_sdk::{Engine, EngineConfig};

fn field() -> HeightField {
    let mut field = HeightField::from_fn(8, 8, |x, z| ((x * z) % 5) as f32);
    field.normalize();
    field
}

fn ready_engine() -> Result<Engine<HeadlessDevice>> {
    let mut engine = Engine::new(HeadlessDevice::new(800, 600), EngineConfig::default())?;
    engine.register_shader("base", ShaderCapabilities::ALL)?;
    engine.register_shader("line", ShaderCapabilities::ALL)?;
    engine.register_terrain_node("terrain", &field())?;
    Ok(engine)
}

#[test]
fn offscreen_passes_complete_before_the_default_pass() -> Result<()> {
    let mut engine = ready_engine()?;
    engine.add_sky()?;
    engine.add_water()?;
    engine.device_mut().take_commands();

    let stats = engine.tick(16.0, &MovementIntent::default())?;
    assert_eq!(stats.passes, 3);
    assert_eq!(stats.failed_draws, 0);

    let commands = engine.device().commands();
    let clears: Vec<usize> = commands
        .iter()
        .enumerate()
        .filter(|(_, c)| matches!(c, DeviceCommand::Clear(_)))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(clears.len(), 3);

    let last_offscreen_bind = commands
        .iter()
        .rposition(|c| matches!(c, DeviceCommand::BindFramebuffer(Some(_))))
        .expect("offscreen passes bind their framebuffer");
    let unbind_after = commands[last_offscreen_bind..]
        .iter()
        .position(|c| matches!(c, DeviceCommand::BindFramebuffer(None)))
        .map(|i| i + last_offscreen_bind)
        .expect("offscreen pass is deactivated");
    assert!(unbind_after < clears[2]);

    // Both offscreen passes drew the terrain.
    for window in [clears[0]..clears[1], clears[1]..clears[2]] {
        assert!(commands[window].iter().any(DeviceCommand::is_draw));
    }
    let default_clear = &commands[clears[2]];
    assert_eq!(
        default_clear,
        &DeviceCommand::Clear(EngineConfig::default().clear_color)
    );
    assert!(commands[clears[2]..].iter().any(DeviceCommand::is_draw));
    Ok(())
}

#[test]
fn nothing_renders_until_assets_load() -> Result<()> {
    let mut engine = Engine::new(HeadlessDevice::new(320, 240), EngineConfig::default())?;
    engine.register_shader("base", ShaderCapabilities::ALL)?;
    engine.register_texture("terrain", 64, 64)?;
    engine.register_terrain_node("terrain", &field())?;

    let err = engine
        .tick(16.0, &MovementIntent::default())
        .expect_err("texture is still loading");
    match err.downcast_ref::<SceneError>() {
        Some(SceneError::AssetsNotReady { missing }) => assert_eq!(missing, &["terrain"]),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(engine.device().draw_count(), 0);

    assert!(engine.mark_asset_loaded("terrain"));
    engine.tick(16.0, &MovementIntent::default())?;
    assert!(engine.device().draw_count() > 0);
    Ok(())
}

#[test]
fn disabled_parent_hides_its_subtree_without_touching_children() -> Result<()> {
    let mut engine = ready_engine()?;

    let data = quad_plane(10.0, false);
    let mut parent = SceneNode::new("plane", "base");
    parent.geometry = upload_geometry(engine.device_mut(), "plane", &data)?;
    let mut child = SceneNode::new("propeller", "base");
    child.geometry = upload_geometry(engine.device_mut(), "propeller", &data)?;
    let child_positions = child.geometry.positions;

    let parent = engine.add_node(parent);
    let child = engine.add_node(child);
    engine.scene_mut().attach_child(parent, child)?;
    engine.queue_node(None, QueueKind::Static, parent, "base")?;

    let binds_child = |commands: &[DeviceCommand]| {
        commands.iter().any(|c| {
            matches!(c, DeviceCommand::BindAttribute { buffer, .. } if Some(*buffer) == child_positions)
        })
    };

    let enabled = engine.tick(16.0, &MovementIntent::default())?;
    assert!(binds_child(&engine.device_mut().take_commands()[..]));

    engine.scene_mut().node_mut(parent)?.enabled = false;
    let disabled = engine.tick(16.0, &MovementIntent::default())?;
    assert!(!binds_child(engine.device().commands()));
    assert_eq!(disabled.nodes_drawn + 2, enabled.nodes_drawn);
    assert!(engine.scene().node(child)?.enabled);
    Ok(())
}

#[test]
fn light_markers_travel_only_while_lit() -> Result<()> {
    let mut engine = ready_engine()?;
    let marker = engine.add_light_marker(
        0,
        tarn_lanes::animation_lane::DEFAULT_WAYPOINTS.to_vec(),
        Default::default(),
    )?;
    let start = engine.scene().node(marker)?.position;

    engine.environment_mut().lights[0].enabled = false;
    engine.tick(100.0, &MovementIntent::default())?;
    assert_eq!(engine.scene().node(marker)?.position, start);

    engine.environment_mut().lights[0].enabled = true;
    engine.tick(100.0, &MovementIntent::default())?;
    let moved = engine.scene().node(marker)?.position;
    assert_ne!(moved, start);
    assert_eq!(engine.environment().lights[0].render_position, moved);
    Ok(())
}

#[test]
fn camera_follows_the_input() -> Result<()> {
    let mut engine = ready_engine()?;
    let before = engine.camera().position;
    let ascend = MovementIntent {
        ascend: 1.0,
        ..Default::default()
    };
    engine.tick(16.0, &ascend)?;
    assert_eq!(engine.camera().position.y, before.y + 1.0);
    Ok(())
}

#[test]
fn a_failed_draw_only_costs_one_frame() -> Result<()> {
    let mut engine = ready_engine()?;
    engine.device_mut().fail_next_draws(1);

    let first = engine.tick(16.0, &MovementIntent::default())?;
    let second = engine.tick(16.0, &MovementIntent::default())?;

    assert_eq!(first.failed_draws, 1);
    assert_eq!(second.failed_draws, 0);
    assert_eq!(first.passes, 3);
    assert_eq!(second.passes, 3);
    assert_eq!(second.draw_calls, first.draw_calls + 1);
    Ok(())
}

#[test]
fn non_square_heightmaps_are_refused() -> Result<()> {
    let mut engine = Engine::new(HeadlessDevice::new(320, 240), EngineConfig::default())?;
    engine.register_shader("base", ShaderCapabilities::ALL)?;
    let live = engine.device().live_buffers();

    let err = engine
        .register_terrain_node("terrain", &HeightField::new(8, 6))
        .expect_err("8x6 is not square");
    assert_eq!(
        err.downcast_ref::<MeshError>(),
        Some(&MeshError::NonSquare {
            width: 8,
            height: 6
        })
    );
    assert!(engine.terrain_node().is_none());
    assert_eq!(engine.device().live_buffers(), live);
    Ok(())
}
