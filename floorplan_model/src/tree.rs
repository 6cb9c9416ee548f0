// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena-backed model tree: construction, decoding, and transient annotations.

use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::node::{ModelNode, NodeData, NodeError, NodeId};
use crate::plan::FloorNr;
use crate::wire::RawNode;

/// A building model stored as an arena of [`ModelNode`]s.
///
/// The structure is immutable once loaded: nodes can be appended while building, but never
/// removed or moved. A reload produces a new tree.
#[derive(Clone)]
pub struct ModelTree {
    nodes: Vec<ModelNode>,
}

impl core::fmt::Debug for ModelTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let areas = self.nodes.iter().filter(|n| n.is_area()).count();
        f.debug_struct("ModelTree")
            .field("nodes", &self.nodes.len())
            .field("areas", &areas)
            .finish()
    }
}

impl ModelTree {
    /// Create a tree holding a single root node.
    pub fn new(root: NodeData) -> Self {
        Self {
            nodes: vec![ModelNode::new(NodeId(0), None, root)],
        }
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree only holds its root.
    ///
    /// A tree always has a root, so this never returns `true` for a zero-node tree.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Append a node as the last child of `parent`.
    ///
    /// Returns `None`, leaving the tree unchanged, when `parent` does not belong to this
    /// tree or the id space is exhausted.
    pub fn insert(&mut self, parent: NodeId, data: NodeData) -> Option<NodeId> {
        let Ok(raw) = u32::try_from(self.nodes.len()) else {
            warn!(nodes = self.nodes.len(), "node id space exhausted");
            return None;
        };
        let id = NodeId(raw);
        let Some(p) = self.nodes.get_mut(parent.idx()) else {
            warn!(parent = parent.index(), "insert under unknown parent ignored");
            return None;
        };
        p.children.push(id);
        self.nodes.push(ModelNode::new(id, Some(parent), data));
        Some(id)
    }

    /// Look up a node.
    pub fn get(&self, id: NodeId) -> Option<&ModelNode> {
        self.nodes.get(id.idx())
    }

    /// All nodes in id order, which is document order for decoded trees.
    pub fn nodes(&self) -> impl Iterator<Item = &ModelNode> + '_ {
        self.nodes.iter()
    }

    /// Area-kind nodes in document order.
    pub fn area_nodes(&self) -> impl Iterator<Item = &ModelNode> + '_ {
        self.nodes.iter().filter(|n| n.is_area())
    }

    /// Build a tree from its wire form, assigning ids in document pre-order.
    pub fn from_raw(mut raw: RawNode) -> Self {
        let children = core::mem::take(&mut raw.children);
        let mut tree = Self::new(raw.take_data());
        // Reversed so pops come out in document order.
        let mut stack: Vec<(RawNode, NodeId)> = children
            .into_iter()
            .rev()
            .map(|c| (c, NodeId(0)))
            .collect();
        while let Some((mut node, parent)) = stack.pop() {
            let children = core::mem::take(&mut node.children);
            // Parents are always inserted before their children.
            let Some(id) = tree.insert(parent, node.take_data()) else {
                break;
            };
            stack.extend(children.into_iter().rev().map(|c| (c, id)));
        }
        tree
    }

    /// Decode a tree from the model service's JSON payload.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawNode = serde_json::from_str(json)?;
        let tree = Self::from_raw(raw);
        debug!(
            nodes = tree.len(),
            areas = tree.area_nodes().count(),
            "decoded model tree"
        );
        Ok(tree)
    }

    /// Attach a floor number to every node for rendering.
    pub fn assign_floor(&mut self, floor_nr: FloorNr) {
        for node in &mut self.nodes {
            node.floor_nr = Some(floor_nr);
        }
    }

    /// Append validation errors to a node. Unknown ids are ignored.
    pub fn attach_errors(&mut self, id: NodeId, errors: impl IntoIterator<Item = NodeError>) {
        match self.nodes.get_mut(id.idx()) {
            Some(node) => node.data.errors.extend(errors),
            None => trace!(node = id.index(), "errors for unknown node dropped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ElementKind;
    use kurbo::Point;

    const NESTED: &str = r#"{
        "type": "floor",
        "children": [
            {"type": "space", "children": [
                {"type": "area", "id": "a1"},
                {"type": "wall"}
            ]},
            {"type": "area", "id": "a2"}
        ]
    }"#;

    #[test]
    fn ids_follow_document_order() {
        let tree = ModelTree::from_json_str(NESTED).unwrap();
        let kinds: Vec<_> = tree.nodes().map(|n| n.kind().clone()).collect();
        assert_eq!(
            kinds,
            vec![
                ElementKind::Floor,
                ElementKind::Space,
                ElementKind::Area,
                ElementKind::Wall,
                ElementKind::Area,
            ]
        );
        let root = tree.get(tree.root()).unwrap();
        assert_eq!(root.children(), &[NodeId(1), NodeId(4)]);
        assert_eq!(tree.get(NodeId(3)).unwrap().parent(), Some(NodeId(1)));
        let areas: Vec<_> = tree
            .area_nodes()
            .filter_map(|n| n.area_id().map(|a| a.as_str().to_owned()))
            .collect();
        assert_eq!(areas, vec!["a1", "a2"]);
    }

    #[test]
    fn decode_error_is_reported() {
        let err = ModelTree::from_json_str("{\"children\": 3}").unwrap_err();
        assert!(err.to_string().starts_with("model decode failed"));
    }

    #[test]
    fn transient_annotations() {
        let mut tree = ModelTree::from_json_str(NESTED).unwrap();
        assert!(tree.nodes().all(|n| n.floor_nr().is_none()));
        tree.assign_floor(3);
        assert!(tree.nodes().all(|n| n.floor_nr() == Some(3)));

        tree.attach_errors(
            NodeId(2),
            [NodeError {
                point: Point::new(1.0, 1.0),
                message: "overlap".into(),
            }],
        );
        tree.attach_errors(NodeId(99), []);
        assert_eq!(tree.get(NodeId(2)).unwrap().errors().len(), 1);
    }

    #[test]
    fn insert_under_unknown_parent_is_refused() {
        let mut tree = ModelTree::new(NodeData::default());
        let child = tree.insert(tree.root(), NodeData::default()).unwrap();
        assert_eq!(tree.insert(NodeId(42), NodeData::default()), None);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get(tree.root()).unwrap().children(), &[child]);
    }

    #[test]
    fn only_root_is_empty() {
        let tree = ModelTree::new(NodeData::default());
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 1);
    }
}
