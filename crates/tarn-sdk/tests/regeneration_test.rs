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
use tarn_core::renderer::{HeadlessDevice, ShaderCapabilities};
use tarn_data::{HeightField, MovementIntent, SceneError};
use tarn_sdk::{Engine, EngineConfig};

fn engine() -> Result<Engine<HeadlessDevice>> {
    let mut engine = Engine::new(HeadlessDevice::new(320, 240), EngineConfig::default())?;
    engine.register_shader("base", ShaderCapabilities::ALL)?;
    let mut field = HeightField::from_fn(4, 4, |x, _| x as f32);
    field.normalize();
    engine.register_terrain_node("terrain", &field)?;
    Ok(engine)
}

#[test]
fn regeneration_swaps_the_terrain_buffers() -> Result<()> {
    let mut engine = engine()?;
    let terrain = engine.terrain_node().expect("terrain registered");
    let old = engine.scene().node(terrain)?.geometry;
    let live = engine.device().live_buffers();

    engine.request_regeneration(16, 16, 32)?;
    engine.tick(16.0, &MovementIntent::default())?;

    let new = engine.scene().node(terrain)?.geometry;
    assert_eq!(new.vertex_count, 16 * 16);
    assert_ne!(new.positions, old.positions);
    assert_eq!(engine.device().live_buffers(), live);
    assert!(!engine.regeneration_pending());
    Ok(())
}

#[test]
fn a_second_request_waits_for_the_first() -> Result<()> {
    let mut engine = engine()?;
    engine.request_regeneration(8, 8, 4)?;
    assert!(matches!(
        engine.request_regeneration(8, 8, 4),
        Err(SceneError::RegenerationInProgress)
    ));

    engine.tick(16.0, &MovementIntent::default())?;
    engine.request_regeneration(8, 8, 4)?;
    Ok(())
}

#[test]
fn unusable_terrain_fails_the_tick_and_keeps_the_old_mesh() -> Result<()> {
    let mut engine = engine()?;
    let terrain = engine.terrain_node().expect("terrain registered");
    let old = engine.scene().node(terrain)?.geometry;

    engine.request_regeneration(8, 6, 4)?;
    assert!(engine.tick(16.0, &MovementIntent::default()).is_err());
    assert_eq!(engine.scene().node(terrain)?.geometry, old);
    assert!(!engine.regeneration_pending());

    engine.tick(16.0, &MovementIntent::default())?;
    Ok(())
}
