// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Door-swing arcs.

use alloc::vec::Vec;

use kurbo::Point;

use crate::measure::distance;

/// Number of arc segments used when the caller has no preference.
pub const DEFAULT_ARC_SEGMENTS: usize = 10;

/// Build the closed fan swept by a door leaf rotating around `axis` from `open` to `close`.
///
/// `segments + 1` samples are interpolated linearly between `open` and `close` and then
/// projected onto the circle of radius `distance(axis, open)` centred at `axis`. The result
/// starts and ends with `axis` itself so it can be used directly as a clip polygon.
///
/// Returns an empty sequence when the leaf has no length or `segments` is zero. Samples that
/// land exactly on `axis` have no direction and are dropped.
///
/// ```
/// use floorplan_geometry::{DEFAULT_ARC_SEGMENTS, door_swing_arc};
/// use kurbo::Point;
///
/// let axis = Point::new(0.0, 0.0);
/// let fan = door_swing_arc(Point::new(1.0, 0.0), axis, Point::new(0.0, 1.0), DEFAULT_ARC_SEGMENTS);
/// assert_eq!(fan.len(), DEFAULT_ARC_SEGMENTS + 3);
/// assert_eq!(fan.first(), Some(&axis));
/// assert_eq!(fan.last(), Some(&axis));
/// ```
pub fn door_swing_arc(open: Point, axis: Point, close: Point, segments: usize) -> Vec<Point> {
    let radius = distance(axis, open);
    if radius <= 0.0 || segments == 0 {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(segments + 3);
    out.push(axis);
    let steps = segments as f64;
    for i in 0..=segments {
        let t = i as f64 / steps;
        let dir = open.lerp(close, t) - axis;
        let len = dir.hypot();
        if len == 0.0 {
            continue;
        }
        out.push(axis + dir * (radius / len));
    }
    out.push(axis);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn fan_is_closed_at_axis() {
        let axis = Point::new(2.0, 3.0);
        let fan = door_swing_arc(Point::new(5.0, 3.0), axis, Point::new(2.0, 6.0), 10);
        assert_eq!(fan.len(), 13);
        assert_eq!(fan[0], axis);
        assert_eq!(fan[fan.len() - 1], axis);
    }

    #[test]
    fn interior_points_are_on_the_circle() {
        let axis = Point::new(-1.0, 4.0);
        let open = Point::new(-1.0, 0.0);
        let fan = door_swing_arc(open, axis, Point::new(3.0, 4.0), 7);
        let r = distance(axis, open);
        for p in &fan[1..fan.len() - 1] {
            assert!((distance(axis, *p) - r).abs() < EPS, "{p:?} off the arc");
        }
    }

    #[test]
    fn first_sample_is_the_open_point() {
        let axis = Point::new(0.0, 0.0);
        let open = Point::new(0.0, 2.0);
        let close = Point::new(2.0, 0.0);
        let fan = door_swing_arc(open, axis, close, 4);
        assert!((fan[1] - open).hypot() < EPS);
        assert!((fan[fan.len() - 2] - close).hypot() < EPS);
    }

    #[test]
    fn degenerate_leaf_yields_nothing() {
        let p = Point::new(1.0, 1.0);
        assert!(door_swing_arc(p, p, Point::new(2.0, 2.0), 10).is_empty());
        assert!(door_swing_arc(Point::new(2.0, 1.0), p, Point::new(1.0, 2.0), 0).is_empty());
    }

    #[test]
    fn sample_through_axis_is_dropped() {
        // Opposite ends: the midpoint sample lands on the axis.
        let axis = Point::new(0.0, 0.0);
        let fan = door_swing_arc(Point::new(-1.0, 0.0), axis, Point::new(1.0, 0.0), 2);
        assert_eq!(fan.len(), 4);
        assert_eq!(fan[0], axis);
        assert_eq!(fan[3], axis);
    }
}
