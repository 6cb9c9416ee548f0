// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data-integrity errors.
//!
//! Missing lookups are not errors: they return `None` and log at warning level.

use std::fmt;

use floorplan_model::FloorAreaKey;
use kurbo::Point;

use crate::record::RecordId;

/// Errors that abort a load or edit step.
#[derive(Debug)]
pub enum Error {
    /// A classification record's coordinate has no enclosing area.
    UnresolvedRecord {
        /// The offending record.
        record_id: RecordId,
        /// Where the record points.
        point: Point,
    },
    /// A unit assignment references an area that is not classified.
    UnknownArea {
        /// The offending key.
        key: FloorAreaKey,
    },
    /// The model payload could not be decoded.
    Model(floorplan_model::Error),
}

/// Result alias for annotation operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedRecord { record_id, point } => write!(
                f,
                "classification record {record_id} at ({}, {}) has no enclosing area",
                point.x, point.y
            ),
            Self::UnknownArea { key } => write!(f, "unit assignment references unknown area {key}"),
            Self::Model(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Model(e) => Some(e),
            _ => None,
        }
    }
}

impl From<floorplan_model::Error> for Error {
    fn from(e: floorplan_model::Error) -> Self {
        Self::Model(e)
    }
}
