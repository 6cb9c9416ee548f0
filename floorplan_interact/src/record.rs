// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Classification records and the persistence payloads derived from them.

use std::fmt;

use floorplan_model::{AreaId, FloorAreaKey, PlanId};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Id of a classification record. Records share the backend's area id space.
pub type RecordId = AreaId;

/// Semantic area type such as `ROOM` or `BATHROOM`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaType(String);

impl AreaType {
    /// Wrap a type tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Display type derived from a raw model tag: trimmed and upper-cased.
    pub fn from_raw_tag(tag: &str) -> Self {
        Self(tag.trim().to_ascii_uppercase())
    }

    /// The tag text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AreaType {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl fmt::Display for AreaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Backend-sourced classification of the area enclosing `(coord_x, coord_y)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AreaClassificationRecord {
    /// Record id.
    pub id: RecordId,
    /// Assigned type; `None` while unclassified.
    #[serde(default)]
    pub area_type: Option<AreaType>,
    /// Position hint, x.
    pub coord_x: f64,
    /// Position hint, y.
    pub coord_y: f64,
}

impl AreaClassificationRecord {
    /// The position hint as a point in plan coordinates.
    pub fn coord(&self) -> Point {
        Point::new(self.coord_x, self.coord_y)
    }
}

/// Area type edit to persist.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AreaTypeChange {
    /// Record whose type changed.
    pub record_id: RecordId,
    /// Key of the edited area.
    pub key: FloorAreaKey,
    /// New type.
    pub area_type: AreaType,
}

/// Plan scale edit to persist.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleChange {
    /// Plan being scaled.
    pub plan_id: PlanId,
    /// Metres per plan unit.
    pub scale_factor: f64,
}
