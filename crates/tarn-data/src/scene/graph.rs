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

use super::{NodeId, SceneError, SceneNode};
use std::collections::HashMap;

/// An arena owning every scene node.
///
/// Nodes are never removed while the scene runs, so a [`NodeId`] stays valid
/// for the arena's lifetime.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    names: HashMap<String, NodeId>,
}

impl SceneGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its handle.
    ///
    /// A later node with the same name shadows the earlier one in
    /// [`find`](Self::find); both stay in the arena.
    pub fn add(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        if let Some(previous) = self.names.insert(node.name.clone(), id) {
            log::warn!(
                "Scene node name '{}' re-registered; {:?} now shadows {:?}",
                node.name,
                id,
                previous
            );
        }
        self.nodes.push(node);
        id
    }

    /// Returns the node behind `id`.
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    /// Returns the node behind `id` mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    /// Like [`get`](Self::get) but reports an unknown handle as an error.
    pub fn node(&self, id: NodeId) -> Result<&SceneNode, SceneError> {
        self.get(id).ok_or(SceneError::UnknownNode(id))
    }

    /// Like [`get_mut`](Self::get_mut) but reports an unknown handle as an error.
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut SceneNode, SceneError> {
        self.get_mut(id).ok_or(SceneError::UnknownNode(id))
    }

    /// Looks a node up by name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Makes `child` a child of `parent`.
    ///
    /// The child stops being a render root; it is drawn only through its
    /// parent from then on.
    pub fn attach_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.node(parent)?;
        let existing = self.node(child)?.parent;
        if let Some(existing) = existing {
            return Err(SceneError::AlreadyParented {
                child,
                parent: existing,
            });
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(SceneError::WouldCycle { parent, child });
        }

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// Returns `true` if `ancestor` is on the parent chain of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = self.get(node).and_then(|n| n.parent);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.get(current).and_then(|n| n.parent);
        }
        false
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over every node with its handle.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Iterates mutably over every node.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SceneNode> {
        self.nodes.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attaching_moves_node_out_of_the_roots() {
        let mut graph = SceneGraph::new();
        let parent = graph.add(SceneNode::new("plane", "base"));
        let child = graph.add(SceneNode::new("propeller", "base"));

        graph.attach_child(parent, child).unwrap();

        assert!(graph.get(parent).unwrap().is_root());
        assert!(!graph.get(child).unwrap().is_root());
        assert_eq!(graph.get(parent).unwrap().children(), &[child]);
    }

    #[test]
    fn a_node_has_one_parent() {
        let mut graph = SceneGraph::new();
        let a = graph.add(SceneNode::new("a", "base"));
        let b = graph.add(SceneNode::new("b", "base"));
        let c = graph.add(SceneNode::new("c", "base"));
        graph.attach_child(a, c).unwrap();

        assert!(matches!(
            graph.attach_child(b, c),
            Err(SceneError::AlreadyParented { parent, .. }) if parent == a
        ));
    }

    #[test]
    fn cycles_are_rejected() {
        let mut graph = SceneGraph::new();
        let a = graph.add(SceneNode::new("a", "base"));
        let b = graph.add(SceneNode::new("b", "base"));
        graph.attach_child(a, b).unwrap();

        assert!(matches!(
            graph.attach_child(b, a),
            Err(SceneError::WouldCycle { .. })
        ));
        assert!(matches!(
            graph.attach_child(a, a),
            Err(SceneError::WouldCycle { .. })
        ));
    }

    #[test]
    fn names_resolve_to_handles() {
        let mut graph = SceneGraph::new();
        let id = graph.add(SceneNode::new("terrain", "base"));
        assert_eq!(graph.find("terrain"), Some(id));
        assert_eq!(graph.find("water"), None);
        assert!(matches!(
            graph.node(NodeId(9)),
            Err(SceneError::UnknownNode(NodeId(9)))
        ));
    }
}
