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

use serde::{Deserialize, Serialize};
use tarn_core::math::Vec3;
use tarn_data::{Environment, NodeId, SceneGraph};

/// What a rider does after the last waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PathMode {
    /// Heads back to the first waypoint from wherever it is.
    #[default]
    Loop,
    /// Jumps to the first waypoint and starts over.
    Repeat,
    /// Stops at the last waypoint.
    Once,
}

/// Speeds and distances used by [`PathAnimator`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Units per second while travelling between waypoints.
    pub cruise_speed: f32,
    /// Units per second on the tick a waypoint is reached.
    pub arrival_speed: f32,
    /// Distance under which a waypoint counts as reached.
    pub threshold: f32,
    /// Also turn the rider to face its heading while cruising. When off, yaw
    /// changes only on arrival ticks.
    pub steer_while_cruising: bool,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            cruise_speed: 500.0,
            arrival_speed: 50.0,
            threshold: 10.0,
            steer_while_cruising: false,
        }
    }
}

/// A square circuit high above the terrain, used when no waypoints are given.
pub const DEFAULT_WAYPOINTS: [Vec3; 4] = [
    Vec3::new(0.0, 500.0, 0.0),
    Vec3::new(0.0, 500.0, 2000.0),
    Vec3::new(2000.0, 500.0, 2000.0),
    Vec3::new(2000.0, 500.0, 0.0),
];

/// Errors raised when building a path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// A path needs at least one waypoint.
    #[error("a path needs at least one waypoint")]
    NoWaypoints,
}

/// Per-rider progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rider {
    /// The node being moved.
    pub node: NodeId,
    /// Index of the waypoint being approached.
    pub target: usize,
    /// Displacement applied on the last tick.
    pub velocity: Vec3,
}

/// Moves scene nodes along a polyline.
#[derive(Debug, Clone)]
pub struct PathAnimator {
    waypoints: Vec<Vec3>,
    mode: PathMode,
    settings: PathSettings,
    riders: Vec<Rider>,
}

impl PathAnimator {
    /// Creates an animator with no riders.
    pub fn new(
        waypoints: Vec<Vec3>,
        mode: PathMode,
        settings: PathSettings,
    ) -> Result<Self, PathError> {
        if waypoints.is_empty() {
            return Err(PathError::NoWaypoints);
        }
        Ok(Self {
            waypoints,
            mode,
            settings,
            riders: Vec::new(),
        })
    }

    /// The waypoints in travel order.
    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    /// Termination mode.
    pub fn mode(&self) -> PathMode {
        self.mode
    }

    /// Riders in attachment order.
    pub fn riders(&self) -> &[Rider] {
        &self.riders
    }

    /// Puts `node` on the path, heading for the first waypoint.
    pub fn attach(&mut self, node: NodeId) {
        self.riders.push(Rider {
            node,
            target: 0,
            velocity: Vec3::ZERO,
        });
    }

    /// Advances every rider by `delta_ms` milliseconds.
    ///
    /// Riders whose node is gone from the graph are left alone.
    pub fn tick(&mut self, graph: &mut SceneGraph, delta_ms: f32) {
        let seconds = delta_ms / 1000.0;
        for rider in &mut self.riders {
            let Some(node) = graph.get_mut(rider.node) else {
                log::warn!("Path rider {:?} is not in the scene graph", rider.node);
                continue;
            };

            let arrived =
                node.position.distance(self.waypoints[rider.target]) < self.settings.threshold;
            let speed = if arrived {
                rider.target += 1;
                if rider.target == self.waypoints.len() {
                    match self.mode {
                        PathMode::Repeat => {
                            rider.target = 0;
                            node.position = self.waypoints[0];
                        }
                        PathMode::Loop => rider.target = 0,
                        PathMode::Once => rider.target -= 1,
                    }
                }
                self.settings.arrival_speed
            } else {
                self.settings.cruise_speed
            };

            let destination = self.waypoints[rider.target];
            let remaining = node.position.distance(destination);
            let step = (speed * seconds).min(remaining);
            rider.velocity = node.position.velocity_towards(destination, step);
            node.position += rider.velocity;

            let steer = arrived || self.settings.steer_while_cruising;
            if steer && rider.velocity != Vec3::ZERO {
                node.yaw = rider.velocity.heading_degrees();
            }
        }
    }
}

/// A path whose riders only move while a light is switched on.
#[derive(Debug, Clone)]
pub struct LightPath {
    /// Index into [`Environment::lights`].
    pub light: usize,
    /// The path the light's marker follows.
    pub path: PathAnimator,
}

impl LightPath {
    /// Ticks the path if the light exists and is enabled. Returns whether it
    /// ticked.
    pub fn tick(
        &mut self,
        graph: &mut SceneGraph,
        environment: &Environment,
        delta_ms: f32,
    ) -> bool {
        let enabled = environment
            .lights
            .get(self.light)
            .is_some_and(|light| light.enabled);
        if enabled {
            self.path.tick(graph, delta_ms);
        }
        enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tarn_data::SceneNode;

    fn rider_at(graph: &mut SceneGraph, position: Vec3) -> NodeId {
        let mut node = SceneNode::new("marker", "base");
        node.position = position;
        graph.add(node)
    }

    #[test]
    fn empty_paths_are_rejected() {
        assert_eq!(
            PathAnimator::new(Vec::new(), PathMode::Loop, PathSettings::default()).unwrap_err(),
            PathError::NoWaypoints
        );
    }

    #[test]
    fn reaching_a_waypoint_targets_the_next() {
        let mut graph = SceneGraph::new();
        let node = rider_at(&mut graph, Vec3::new(0.0, 0.0, 2.0));
        let mut path = PathAnimator::new(
            vec![Vec3::ZERO, Vec3::new(0.0, 0.0, 1000.0)],
            PathMode::Loop,
            PathSettings::default(),
        )
        .unwrap();
        path.attach(node);

        path.tick(&mut graph, 100.0);
        assert_eq!(path.riders()[0].target, 1);

        // arrival ticks move at 50 units/s and face the heading
        let moved = graph.get(node).unwrap();
        assert_abs_diff_eq!(moved.position.z, 7.0, epsilon = 1e-3);
        assert_abs_diff_eq!(moved.yaw, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn cruising_does_not_turn() {
        let mut graph = SceneGraph::new();
        let node = rider_at(&mut graph, Vec3::ZERO);
        graph.get_mut(node).unwrap().yaw = 42.0;
        let mut path = PathAnimator::new(
            vec![Vec3::new(1000.0, 0.0, 0.0)],
            PathMode::Loop,
            PathSettings::default(),
        )
        .unwrap();
        path.attach(node);

        path.tick(&mut graph, 100.0);
        let n = graph.get(node).unwrap();
        assert_abs_diff_eq!(n.position.x, 50.0, epsilon = 1e-3);
        assert_eq!(n.yaw, 42.0);

        let mut steering = path.clone();
        steering.settings.steer_while_cruising = true;
        steering.tick(&mut graph, 100.0);
        assert_abs_diff_eq!(graph.get(node).unwrap().yaw, 90.0, epsilon = 1e-3);
    }

    #[test]
    fn loop_wraps_without_snapping() {
        let mut graph = SceneGraph::new();
        let end = Vec3::new(0.0, 0.0, 500.0);
        let node = rider_at(&mut graph, end);
        let mut path =
            PathAnimator::new(vec![Vec3::ZERO, end], PathMode::Loop, PathSettings::default())
                .unwrap();
        path.attach(node);
        path.riders[0].target = 1;

        path.tick(&mut graph, 100.0);
        assert_eq!(path.riders()[0].target, 0);
        assert_abs_diff_eq!(graph.get(node).unwrap().position.z, 495.0, epsilon = 1e-3);
    }

    #[test]
    fn repeat_snaps_to_the_start() {
        let mut graph = SceneGraph::new();
        let end = Vec3::new(0.0, 0.0, 500.0);
        let node = rider_at(&mut graph, end);
        let mut path = PathAnimator::new(
            vec![Vec3::new(0.0, 0.0, -100.0), end],
            PathMode::Repeat,
            PathSettings::default(),
        )
        .unwrap();
        path.attach(node);
        path.riders[0].target = 1;

        path.tick(&mut graph, 10.0);
        assert_eq!(path.riders()[0].target, 0);
        assert_eq!(graph.get(node).unwrap().position, Vec3::new(0.0, 0.0, -100.0));
    }

    #[test]
    fn once_holds_at_the_last_waypoint() {
        let mut graph = SceneGraph::new();
        let end = Vec3::new(0.0, 0.0, 100.0);
        let node = rider_at(&mut graph, Vec3::new(0.0, 0.0, 95.0));
        let mut path =
            PathAnimator::new(vec![Vec3::ZERO, end], PathMode::Once, PathSettings::default())
                .unwrap();
        path.attach(node);
        path.riders[0].target = 1;

        for _ in 0..20 {
            path.tick(&mut graph, 1000.0);
            assert_eq!(path.riders()[0].target, 1);
            assert!(graph.get(node).unwrap().position.z <= 100.0 + 1e-4);
        }
        assert_eq!(graph.get(node).unwrap().position, end);
    }

    #[test]
    fn light_paths_pause_with_their_light() {
        let mut graph = SceneGraph::new();
        let node = rider_at(&mut graph, Vec3::ZERO);
        let mut path = PathAnimator::new(
            vec![Vec3::new(0.0, 0.0, 1000.0)],
            PathMode::Loop,
            PathSettings::default(),
        )
        .unwrap();
        path.attach(node);
        let mut light_path = LightPath { light: 0, path };

        let mut environment = Environment::default();
        environment.lights[0].enabled = false;
        assert!(!light_path.tick(&mut graph, &environment, 100.0));
        assert_eq!(graph.get(node).unwrap().position, Vec3::ZERO);

        environment.lights[0].enabled = true;
        assert!(light_path.tick(&mut graph, &environment, 100.0));
        assert_ne!(graph.get(node).unwrap().position, Vec3::ZERO);
    }
}
