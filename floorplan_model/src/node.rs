// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public node types: identifiers, element kinds, and per-node payload.

use std::fmt;

use floorplan_geometry::Footprint;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

use crate::plan::{AreaId, FloorNr};

/// Identifier for a node in a [`ModelTree`](crate::ModelTree).
///
/// Ids are slot indices assigned in document (pre-)order when a tree is built from the
/// wire format, so comparing two ids from the same load compares their document position.
/// Ids are only meaningful for the tree that produced them; a reload produces a new tree.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Raw slot index, mostly useful for logging.
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// Element type tag.
///
/// Unrecognised tags are kept verbatim in [`ElementKind::Other`] so they survive a
/// decode/encode cycle and can still be shown as a raw display type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementKind {
    /// A polygon-bounded classified region.
    Area,
    /// Wall segment.
    Wall,
    /// Door or window.
    Opening,
    /// Furniture item.
    Furniture,
    /// Generic container of areas.
    Space,
    /// Top-level floor container.
    Floor,
    /// Area without a classification.
    Unassigned,
    /// Any other tag.
    Other(String),
}

impl Default for ElementKind {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl ElementKind {
    /// Wire tag for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Area => "area",
            Self::Wall => "wall",
            Self::Opening => "opening",
            Self::Furniture => "furniture",
            Self::Space => "space",
            Self::Floor => "floor",
            Self::Unassigned => "unassigned",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for ElementKind {
    fn from(tag: String) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "area" => Self::Area,
            "wall" => Self::Wall,
            "opening" => Self::Opening,
            "furniture" => Self::Furniture,
            "space" => Self::Space,
            "floor" => Self::Floor,
            "unassigned" => Self::Unassigned,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for ElementKind {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_owned())
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Other(tag) => tag,
            k => k.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validation error attached to a node for rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeError {
    /// Marker position in the node's local frame.
    pub point: Point,
    /// Human-readable message.
    pub message: String,
}

/// Payload supplied when inserting a node.
#[derive(Clone, Debug, Default)]
pub struct NodeData {
    /// Element type tag.
    pub kind: ElementKind,
    /// Backend area id, present on area elements.
    pub area_id: Option<AreaId>,
    /// Raw area type tag as delivered by the model service.
    pub raw_type: Option<String>,
    /// Local offset applied to this node and its subtree.
    pub position: Option<Vec2>,
    /// Outline in the local frame.
    pub footprint: Option<Footprint>,
    /// Validation errors.
    pub errors: Vec<NodeError>,
}

/// A node stored in a [`ModelTree`](crate::ModelTree).
#[derive(Clone, Debug)]
pub struct ModelNode {
    pub(crate) id: NodeId,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) data: NodeData,
    pub(crate) floor_nr: Option<FloorNr>,
}

impl ModelNode {
    pub(crate) fn new(id: NodeId, parent: Option<NodeId>, data: NodeData) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            data,
            floor_nr: None,
        }
    }

    /// This node's id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Parent node, `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in document order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Element kind.
    pub fn kind(&self) -> &ElementKind {
        &self.data.kind
    }

    /// Backend area id.
    pub fn area_id(&self) -> Option<&AreaId> {
        self.data.area_id.as_ref()
    }

    /// Raw type tag.
    pub fn raw_type(&self) -> Option<&str> {
        self.data.raw_type.as_deref()
    }

    /// Local offset.
    pub fn position(&self) -> Option<Vec2> {
        self.data.position
    }

    /// Footprint in the local frame.
    pub fn footprint(&self) -> Option<&Footprint> {
        self.data.footprint.as_ref()
    }

    /// Attached validation errors.
    pub fn errors(&self) -> &[NodeError] {
        &self.data.errors
    }

    /// Floor number attached for rendering, if any.
    pub fn floor_nr(&self) -> Option<FloorNr> {
        self.floor_nr
    }

    /// Whether this node takes part in point resolution.
    pub fn is_area(&self) -> bool {
        self.data.kind == ElementKind::Area
    }
}
