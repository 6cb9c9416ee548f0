// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Floorplan Model: the nested building tree and point-to-area resolution.
//!
//! A building model arrives as a nested tree of elements (floors, spaces, areas, walls,
//! openings, furniture). Each element may carry a local `position` offset that applies to
//! itself and its whole subtree, and an optional footprint polygon expressed in that local
//! frame.
//!
//! - [`ModelTree`]: arena of [`ModelNode`]s addressed by [`NodeId`], built from the wire
//!   format ([`ModelTree::from_json_str`]) or programmatically ([`ModelTree::insert`]).
//! - [`walk`] / [`Walker`]: depth-first pre-order traversal that accumulates offsets as a
//!   traversal parameter; nothing is cached on the nodes.
//! - [`find_area_by_point`]: first area (in document order) whose global footprint
//!   contains a point.
//! - [`plan`]: identifiers shared with the annotation layer ([`FloorAreaKey`], [`PlanId`]) and
//!   the plan image size comparison.
//!
//! ## Example
//!
//! ```
//! use floorplan_geometry::{Footprint, Polygon};
//! use floorplan_model::{ElementKind, ModelTree, NodeData, find_area_by_point};
//! use kurbo::{Point, Vec2};
//!
//! let unit_square = Footprint::from(Polygon::new(
//!     vec![
//!         Point::new(0.0, 0.0),
//!         Point::new(1.0, 0.0),
//!         Point::new(1.0, 1.0),
//!         Point::new(0.0, 1.0),
//!     ],
//!     vec![],
//! ));
//!
//! let mut tree = ModelTree::new(NodeData {
//!     kind: ElementKind::Floor,
//!     position: Some(Vec2::new(10.0, 0.0)),
//!     ..Default::default()
//! });
//! let area = tree.insert(
//!     tree.root(),
//!     NodeData {
//!         kind: ElementKind::Area,
//!         position: Some(Vec2::new(0.0, 5.0)),
//!         footprint: Some(unit_square),
//!         ..Default::default()
//!     },
//! ).unwrap();
//!
//! // Offsets compose additively down the tree.
//! assert_eq!(find_area_by_point(&tree, Point::new(10.5, 5.5)), Some(area));
//! assert_eq!(find_area_by_point(&tree, Point::new(0.5, 0.5)), None);
//! ```

mod error;
mod node;
pub mod plan;
mod resolve;
mod tree;
mod walk;
mod wire;

pub use error::{Error, Result};
pub use node::{ElementKind, ModelNode, NodeData, NodeError, NodeId};
pub use plan::{AreaId, DEFAULT_FLOOR_NR, FloorAreaKey, FloorNr, PlanId, PlanImage, SizeComparison};
pub use resolve::{find_area_by_point, find_area_from};
pub use tree::ModelTree;
pub use walk::{Walker, global_footprint, walk};
pub use wire::{RawError, RawFootprint, RawNode, RawPosition};
