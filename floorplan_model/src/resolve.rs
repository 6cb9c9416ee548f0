// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point-to-area resolution for batch classification.
//!
//! Resolution returns the first area in document order whose global footprint contains the
//! point. Candidate sizes are not compared: batch data is expected to be non-overlapping.
//! Interactive picking uses a smallest-area policy instead (see `floorplan_interact`).

use kurbo::{Point, Vec2};

use crate::node::{ModelNode, NodeId};
use crate::tree::ModelTree;
use crate::walk::Walker;

/// Find the first area-kind node whose footprint contains `point` (root frame).
///
/// `None` means the point has no enclosing area; callers loading classification data treat
/// that as a data-integrity failure.
pub fn find_area_by_point(tree: &ModelTree, point: Point) -> Option<NodeId> {
    find_area_from(tree, tree.root(), Vec2::ZERO, point)
}

/// Like [`find_area_by_point`], restricted to the subtree at `start` whose parent frame is
/// at `offset`.
pub fn find_area_from(tree: &ModelTree, start: NodeId, offset: Vec2, point: Point) -> Option<NodeId> {
    Walker::new(tree, start, offset)
        .find(|(node, effective)| area_contains(node, *effective, point))
        .map(|(node, _)| node.id())
}

fn area_contains(node: &ModelNode, offset: Vec2, point: Point) -> bool {
    if !node.is_area() {
        return false;
    }
    // Testing the point in the node's local frame is the same as translating every ring.
    node.footprint()
        .is_some_and(|fp| !fp.is_degenerate() && fp.contains(point - offset))
}
