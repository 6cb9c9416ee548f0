// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identifiers shared across the model and annotation layers.
//!
//! Backends hand out plan and area ids either as strings or as integers; both decode into
//! the same string-backed identifier so lookups never depend on the wire representation.
//!
//! [`FloorAreaKey`] is the business key for areas. The same plan can be reused on several
//! floors, so an area id alone is ambiguous; every area-keyed index uses the composite
//! `floor:area` key and falls back to [`DEFAULT_FLOOR_NR`] when no floor is known.

use core::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Floor number within a building.
pub type FloorNr = u32;

/// Floor used when a model or record carries no floor number.
pub const DEFAULT_FLOOR_NR: FloorNr = 1;

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Int(i64),
}

impl From<IdRepr> for String {
    fn from(r: IdRepr) -> Self {
        match r {
            IdRepr::Text(s) => s,
            IdRepr::Int(n) => n.to_string(),
        }
    }
}

/// Identifier of a floorplan.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "IdRepr", into = "String")]
pub struct PlanId(String);

/// Identifier of an area element in the model.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "IdRepr", into = "String")]
pub struct AreaId(String);

macro_rules! string_id {
    ($ty:ident) => {
        impl $ty {
            /// Create an identifier from anything string-like.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The identifier text.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<IdRepr> for $ty {
            fn from(r: IdRepr) -> Self {
                Self(r.into())
            }
        }

        impl From<$ty> for String {
            fn from(id: $ty) -> Self {
                id.0
            }
        }

        impl From<&str> for $ty {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<u64> for $ty {
            fn from(n: u64) -> Self {
                Self(n.to_string())
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(PlanId);
string_id!(AreaId);

/// Composite `floor:area` key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FloorAreaKey {
    /// Floor the area is rendered on.
    pub floor_nr: FloorNr,
    /// Area id within the plan.
    pub area_id: AreaId,
}

impl FloorAreaKey {
    /// Key for an area on a known floor.
    pub fn new(floor_nr: FloorNr, area_id: impl Into<AreaId>) -> Self {
        Self {
            floor_nr,
            area_id: area_id.into(),
        }
    }

    /// Key for an area on `floor_nr`, or on [`DEFAULT_FLOOR_NR`] when the floor is unknown.
    pub fn on_floor(floor_nr: Option<FloorNr>, area_id: impl Into<AreaId>) -> Self {
        Self::new(floor_nr.unwrap_or(DEFAULT_FLOOR_NR), area_id)
    }
}

impl fmt::Display for FloorAreaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.floor_nr, self.area_id)
    }
}

/// Error returned when a `floor:area` string cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseKeyError(String);

impl fmt::Display for ParseKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid floor-qualified area key {:?}", self.0)
    }
}

impl std::error::Error for ParseKeyError {}

impl FromStr for FloorAreaKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (floor, area) = s.split_once(':').ok_or_else(|| ParseKeyError(s.to_owned()))?;
        let floor_nr = floor
            .trim()
            .parse::<FloorNr>()
            .map_err(|_| ParseKeyError(s.to_owned()))?;
        if area.is_empty() {
            return Err(ParseKeyError(s.to_owned()));
        }
        Ok(Self::new(floor_nr, area))
    }
}

impl TryFrom<String> for FloorAreaKey {
    type Error = ParseKeyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FloorAreaKey> for String {
    fn from(k: FloorAreaKey) -> Self {
        k.to_string()
    }
}

/// Pixel dimensions of a plan image.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanImage {
    /// Width in pixels.
    pub image_width: u32,
    /// Height in pixels.
    pub image_height: u32,
}

/// Outcome of comparing two plan images of the same building.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SizeComparison {
    /// At least one dimension is larger than the reference.
    Bigger,
    /// No dimension is larger and at least one is smaller.
    Smaller,
    /// Same width and height.
    Same,
}

impl PlanImage {
    /// Compare against a reference plan by width and height.
    ///
    /// Plans of one building are expected to share a scale, so any larger dimension is
    /// flagged even when the other one shrinks. Polygon areas are deliberately not used.
    pub fn compare(&self, reference: &Self) -> SizeComparison {
        let w = self.image_width.cmp(&reference.image_width);
        let h = self.image_height.cmp(&reference.image_height);
        match (w, h) {
            (Ordering::Greater, _) | (_, Ordering::Greater) => SizeComparison::Bigger,
            (Ordering::Equal, Ordering::Equal) => SizeComparison::Same,
            _ => SizeComparison::Smaller,
        }
    }
}
