// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Floorplan Geometry: Kurbo-native polygon measurement for annotated floorplans.
//!
//! This crate is the stateless kernel underneath the model walker and the hit resolver.
//!
//! - Polygons are ordered lists of rings: ring 0 is the outer boundary, rings 1.. are holes.
//! - Areas are measured with the shoelace formula; holes are subtracted from the outer ring.
//! - Containment is an even–odd crossing test; holes exclude points.
//! - Door swings are approximated by a closed fan usable for clipping.
//!
//! Rings do not need to repeat their first point at the end; the closing edge is implied.
//! Float inputs are assumed to be finite (no NaNs).
//!
//! ## API overview
//!
//! - [`Polygon`]: one outer ring plus holes, with [`Polygon::area`] and [`Polygon::contains`].
//! - [`Footprint`]: a polygon or a multi-polygon, the shape carried by model nodes.
//! - [`polygon_area`], [`signed_ring_area`], [`contains_point`]: ring-level helpers.
//! - [`distance`], [`bounding_box`]: measurements.
//! - [`door_swing_arc`]: door-swing fan construction.
//!
//! ## Example
//!
//! ```
//! use floorplan_geometry::{Footprint, Polygon};
//! use kurbo::{Point, Vec2};
//!
//! let outer = vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(4.0, 0.0),
//!     Point::new(4.0, 4.0),
//!     Point::new(0.0, 4.0),
//! ];
//! let hole = vec![
//!     Point::new(1.0, 1.0),
//!     Point::new(2.0, 1.0),
//!     Point::new(2.0, 2.0),
//!     Point::new(1.0, 2.0),
//! ];
//! let room = Footprint::Polygon(Polygon::new(outer, vec![hole]));
//! assert_eq!(room.area(), 15.0);
//!
//! // Holes exclude points.
//! assert!(room.contains(Point::new(3.0, 3.0)));
//! assert!(!room.contains(Point::new(1.5, 1.5)));
//!
//! // Footprints move with their node's offset.
//! let moved = room.translated(Vec2::new(10.0, 0.0));
//! assert!(moved.contains(Point::new(13.0, 3.0)));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod arc;
mod measure;
mod polygon;

pub use arc::{DEFAULT_ARC_SEGMENTS, door_swing_arc};
pub use measure::{bounding_box, distance};
pub use polygon::{Footprint, Polygon, contains_point, polygon_area, signed_ring_area};
