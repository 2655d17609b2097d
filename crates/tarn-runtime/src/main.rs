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

//! Headless fly-through.
//!
//! Usage: `tarn-runtime [config.ron] [heightmap.png]`. Without a heightmap a
//! fault-line terrain is generated from the configured seed. The heightmap
//! must be square and at least 3x3; other images are rejected when the
//! terrain is meshed.

use anyhow::{Context, Result};
use tarn_sdk::prelude::*;

const FRAMES: usize = 240;
const FRAME_MS: f32 = 1000.0 / 60.0;
const REGENERATE_AT: usize = 120;
const STATS_EVERY: usize = 60;

const SHADERS: [&str; 3] = ["line", "base", "normalmapping"];
const TEXTURES: [&str; 5] = ["terrain", "terrain_normal", "sky", "floor", "lightbulb"];

fn fly_script() -> Vec<MovementIntent> {
    let forward = MovementIntent {
        forward: 1.0,
        ..Default::default()
    };
    let turn = MovementIntent {
        forward: 1.0,
        turn: 1.0,
        ..Default::default()
    };
    let climb = MovementIntent {
        ascend: 1.0,
        speed_delta: 1,
        ..Default::default()
    };

    let mut script = vec![forward; 90];
    script.extend(std::iter::repeat(turn).take(60));
    script.extend(std::iter::repeat(climb).take(10));
    script
}

fn heightmap(path: Option<&str>, seed: u64) -> Result<HeightField> {
    match path {
        Some(path) => load_grayscale(path).with_context(|| format!("Loading heightmap '{path}'")),
        None => Ok(FaultLineGenerator::new(seed).generate(128, 128, 256)),
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => EngineConfig::from_file(&path)?,
        None => EngineConfig::default(),
    };
    let field = heightmap(args.next().as_deref(), config.terrain.seed)?;

    let mut engine = Engine::new(HeadlessDevice::new(1280, 720), config)?;
    for shader in SHADERS {
        engine.register_shader(shader, ShaderCapabilities::ALL)?;
    }
    for texture in TEXTURES {
        engine.register_texture(texture, 512, 512)?;
        engine.mark_asset_loaded(texture);
    }

    engine.register_terrain_node("terrain", &field)?;
    engine.add_water()?;
    engine.add_sky()?;
    engine.add_light_marker(0, DEFAULT_WAYPOINTS.to_vec(), PathMode::Loop)?;

    let mut input = ScriptedInput::new(fly_script());
    let mut totals = FrameStats::default();

    for frame in 0..FRAMES {
        if frame == REGENERATE_AT {
            engine.request_regeneration(64, 64, 128)?;
            engine.set_normal_debug_visible(true);
        }

        let intent = input.poll_movement_intent();
        match engine.tick(FRAME_MS, &intent) {
            Ok(stats) => {
                totals.passes += stats.passes;
                totals.draw_calls += stats.draw_calls;
                totals.failed_draws += stats.failed_draws;
                if frame % STATS_EVERY == 0 {
                    log::info!("Frame {frame}: {stats:?}");
                }
            }
            Err(e) => log::error!("Frame {frame} failed: {e:#}"),
        }
    }

    let camera = engine.camera().position;
    log::info!(
        "Flew {} frames: {} passes, {} draw calls, {} failed draws; camera at ({:.1}, {:.1}, {:.1})",
        FRAMES,
        totals.passes,
        totals.draw_calls,
        totals.failed_draws,
        camera.x,
        camera.y,
        camera.z
    );
    engine.shutdown();
    Ok(())
}
