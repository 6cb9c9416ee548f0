// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Distances and bounds.

use kurbo::{Point, Rect};

/// Euclidean distance between two points.
///
/// `distance(p, p)` is exactly zero.
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// Axis-aligned bounding box of a point sequence, or `None` when it is empty.
pub fn bounding_box<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Rect> {
    let mut it = points.into_iter().copied();
    let first = it.next()?;
    Some(it.fold(Rect::from_points(first, first), |acc, p| acc.union_pt(p)))
}
