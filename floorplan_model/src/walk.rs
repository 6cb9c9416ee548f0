// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Depth-first traversal that accumulates local offsets.
//!
//! The effective offset of a node is its parent's effective offset plus its own
//! `position`, or the parent's offset unchanged when it has none. Offsets travel with the
//! traversal stack; nodes are never written to, so walks can nest and re-enter freely.

use floorplan_geometry::Footprint;
use kurbo::Vec2;

use crate::node::{ModelNode, NodeId};
use crate::tree::ModelTree;

/// Pre-order iterator over `(node, effective offset)` pairs.
///
/// Uses an explicit stack, so arbitrarily deep trees do not recurse.
#[derive(Debug)]
pub struct Walker<'a> {
    tree: &'a ModelTree,
    // Pending nodes with the offset inherited from their parent.
    stack: Vec<(NodeId, Vec2)>,
}

impl<'a> Walker<'a> {
    /// Walk the subtree rooted at `start`, whose parent frame sits at `offset`.
    pub fn new(tree: &'a ModelTree, start: NodeId, offset: Vec2) -> Self {
        let mut stack = Vec::new();
        if tree.get(start).is_some() {
            stack.push((start, offset));
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for Walker<'a> {
    type Item = (&'a ModelNode, Vec2);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, inherited) = self.stack.pop()?;
        let node = self.tree.get(id)?;
        let effective = node.position().map_or(inherited, |p| inherited + p);
        self.stack
            .extend(node.children().iter().rev().map(|&c| (c, effective)));
        Some((node, effective))
    }
}

/// Visit every node with a footprint under `start`, in document order.
pub fn walk<'a>(
    tree: &'a ModelTree,
    start: NodeId,
    offset: Vec2,
    mut visit: impl FnMut(&'a ModelNode, Vec2),
) {
    for (node, effective) in Walker::new(tree, start, offset) {
        if node.footprint().is_some() {
            visit(node, effective);
        }
    }
}

/// The node's footprint in the root frame, given its effective offset.
pub fn global_footprint(node: &ModelNode, offset: Vec2) -> Option<Footprint> {
    node.footprint().map(|fp| fp.translated(offset))
}
