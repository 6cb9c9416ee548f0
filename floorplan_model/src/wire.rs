// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wire representation of a model tree.
//!
//! The model service delivers a nested JSON document. These types mirror it one to one
//! and are converted into a [`ModelTree`](crate::ModelTree) by
//! [`ModelTree::from_raw`](crate::ModelTree::from_raw).

use floorplan_geometry::{Footprint, Polygon};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

use crate::node::{ElementKind, NodeData, NodeError};
use crate::plan::AreaId;

/// A nested model element as delivered by the model service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    /// Element type tag.
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Backend area id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AreaId>,
    /// Raw area type tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_type: Option<String>,
    /// Local offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<RawPosition>,
    /// Outline in the local frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footprint: Option<RawFootprint>,
    /// Children in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RawNode>,
    /// Validation errors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<RawError>,
}

/// Local offset on the wire.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPosition {
    /// Horizontal offset.
    pub x: f64,
    /// Vertical offset.
    pub y: f64,
}

/// GeoJSON-style footprint: rings of `[x, y]` pairs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum RawFootprint {
    /// Outer ring followed by holes.
    Polygon(Vec<Vec<[f64; 2]>>),
    /// Several polygons.
    MultiPolygon(Vec<Vec<Vec<[f64; 2]>>>),
}

/// Validation error on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawError {
    /// Marker x.
    pub x: f64,
    /// Marker y.
    pub y: f64,
    /// Message text.
    #[serde(default)]
    pub message: String,
}

fn polygon_from_rings(rings: &[Vec<[f64; 2]>]) -> Polygon {
    Polygon::from_rings(
        rings
            .iter()
            .map(|ring| ring.iter().map(|&[x, y]| Point::new(x, y)).collect())
            .collect(),
    )
}

impl From<&RawFootprint> for Footprint {
    fn from(raw: &RawFootprint) -> Self {
        match raw {
            RawFootprint::Polygon(rings) => Self::Polygon(polygon_from_rings(rings)),
            RawFootprint::MultiPolygon(polys) => {
                Self::MultiPolygon(polys.iter().map(|p| polygon_from_rings(p)).collect())
            }
        }
    }
}

impl From<RawError> for NodeError {
    fn from(e: RawError) -> Self {
        Self {
            point: Point::new(e.x, e.y),
            message: e.message,
        }
    }
}

impl RawNode {
    /// Split off the per-node payload, leaving `children` in place.
    pub(crate) fn take_data(&mut self) -> NodeData {
        NodeData {
            kind: core::mem::take(&mut self.kind),
            area_id: self.id.take(),
            raw_type: self.area_type.take(),
            position: self.position.map(|p| Vec2::new(p.x, p.y)),
            footprint: self.footprint.as_ref().map(Footprint::from),
            errors: self.errors.drain(..).map(NodeError::from).collect(),
        }
    }
}
