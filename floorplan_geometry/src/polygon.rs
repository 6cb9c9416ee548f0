// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rings, polygons with holes, and footprints.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Vec2};

use crate::measure::bounding_box;

/// Signed shoelace area of a ring.
///
/// Positive for counter-clockwise rings in a y-up frame. The closing edge is implied.
pub fn signed_ring_area(ring: &[Point]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    let mut prev = ring[ring.len() - 1];
    for &p in ring {
        sum += prev.x * p.y - p.x * prev.y;
        prev = p;
    }
    sum * 0.5
}

/// Area of a polygon given as rings: the outer ring minus every hole.
///
/// Ring orientation is ignored; a unit square measures 1 either way.
pub fn polygon_area<R: AsRef<[Point]>>(rings: &[R]) -> f64 {
    let Some((outer, holes)) = rings.split_first() else {
        return 0.0;
    };
    let holes: f64 = holes
        .iter()
        .map(|h| signed_ring_area(h.as_ref()).abs())
        .sum();
    signed_ring_area(outer.as_ref()).abs() - holes
}

/// Even–odd point-in-polygon test on a single ring.
///
/// The ring does not need to repeat its first point. Points exactly on an edge may land on
/// either side.
pub fn contains_point(ring: &[Point], point: Point) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[j];
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// A polygon: ring 0 is the outer boundary, the remaining rings are holes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    rings: Vec<Vec<Point>>,
}

impl Polygon {
    /// Build a polygon from an outer ring and its holes.
    pub fn new(outer: Vec<Point>, holes: Vec<Vec<Point>>) -> Self {
        let mut rings = Vec::with_capacity(holes.len() + 1);
        rings.push(outer);
        rings.extend(holes);
        Self { rings }
    }

    /// Build a polygon from an ordered ring list (outer first).
    pub fn from_rings(rings: Vec<Vec<Point>>) -> Self {
        Self { rings }
    }

    /// All rings, outer first.
    pub fn rings(&self) -> &[Vec<Point>] {
        &self.rings
    }

    /// The outer ring, empty for a polygon without rings.
    pub fn outer(&self) -> &[Point] {
        self.rings.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// The hole rings.
    pub fn holes(&self) -> &[Vec<Point>] {
        self.rings.get(1..).unwrap_or(&[])
    }

    /// Outer area minus hole areas.
    pub fn area(&self) -> f64 {
        polygon_area(&self.rings)
    }

    /// True if the point is inside the outer ring and outside every hole.
    ///
    /// Stops at the first hole that excludes the point.
    pub fn contains(&self, point: Point) -> bool {
        if !contains_point(self.outer(), point) {
            return false;
        }
        !self.holes().iter().any(|h| contains_point(h, point))
    }

    /// Bounding box of the outer ring.
    pub fn bounding_box(&self) -> Option<Rect> {
        bounding_box(self.outer())
    }

    /// A copy moved by `offset`.
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            rings: self
                .rings
                .iter()
                .map(|r| r.iter().map(|&p| p + offset).collect())
                .collect(),
        }
    }

    /// True for polygons that cannot be drawn: fewer than three outer points or no area.
    pub fn is_degenerate(&self) -> bool {
        self.outer().len() < 3 || self.area() <= 0.0
    }
}

/// Shape carried by a model node.
#[derive(Clone, Debug, PartialEq)]
pub enum Footprint {
    /// A single polygon with holes.
    Polygon(Polygon),
    /// Several disjoint polygons measured and hit-tested together.
    MultiPolygon(Vec<Polygon>),
}

impl Footprint {
    /// Iterate the polygons of this footprint.
    pub fn polygons(&self) -> impl Iterator<Item = &Polygon> + '_ {
        let slice = match self {
            Self::Polygon(p) => core::slice::from_ref(p),
            Self::MultiPolygon(ps) => ps.as_slice(),
        };
        slice.iter()
    }

    /// Total area: the sum of each polygon's area.
    pub fn area(&self) -> f64 {
        self.polygons().map(Polygon::area).sum()
    }

    /// True if any polygon contains the point.
    pub fn contains(&self, point: Point) -> bool {
        self.polygons().any(|p| p.contains(point))
    }

    /// Union of the polygons' bounding boxes.
    pub fn bounding_box(&self) -> Option<Rect> {
        self.polygons()
            .filter_map(Polygon::bounding_box)
            .reduce(|a, b| a.union(b))
    }

    /// A copy moved by `offset`.
    pub fn translated(&self, offset: Vec2) -> Self {
        match self {
            Self::Polygon(p) => Self::Polygon(p.translated(offset)),
            Self::MultiPolygon(ps) => {
                Self::MultiPolygon(ps.iter().map(|p| p.translated(offset)).collect())
            }
        }
    }

    /// True if there is nothing to draw.
    pub fn is_degenerate(&self) -> bool {
        self.polygons().all(Polygon::is_degenerate)
    }
}

impl From<Polygon> for Footprint {
    fn from(p: Polygon) -> Self {
        Self::Polygon(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn square(x0: f64, y0: f64, size: f64) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x0 + size, y0),
            Point::new(x0 + size, y0 + size),
            Point::new(x0, y0 + size),
        ]
    }

    #[test]
    fn unit_square_area_in_both_orientations() {
        let ccw = square(0.0, 0.0, 1.0);
        let mut cw = ccw.clone();
        cw.reverse();
        assert_eq!(polygon_area(&[ccw.clone()]), 1.0);
        assert_eq!(polygon_area(&[cw.clone()]), 1.0);
        assert_eq!(signed_ring_area(&ccw), 1.0);
        assert_eq!(signed_ring_area(&cw), -1.0);
    }

    #[test]
    fn half_square_triangle() {
        let tri = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
        ];
        assert_eq!(polygon_area(&[tri]), 0.5);
    }

    #[test]
    fn hole_is_subtracted() {
        let outer = square(0.0, 0.0, 4.0);
        let hole = square(1.0, 1.0, 2.0);
        let whole = polygon_area(&[outer.clone(), hole.clone()]);
        assert_eq!(
            polygon_area(&[outer]) - polygon_area(&[hole]),
            whole,
            "outer minus hole must equal the holed polygon"
        );
        assert_eq!(whole, 12.0);
    }

    #[test]
    fn hole_orientation_does_not_matter() {
        let outer = square(0.0, 0.0, 4.0);
        let mut hole = square(1.0, 1.0, 2.0);
        hole.reverse();
        assert_eq!(polygon_area(&[outer.clone(), hole.clone()]), 12.0);
        let mut cw_outer = outer;
        cw_outer.reverse();
        assert_eq!(polygon_area(&[cw_outer, hole]), 12.0);
    }

    #[test]
    fn repeated_closing_point_does_not_change_area() {
        let mut closed = square(0.0, 0.0, 2.0);
        closed.push(closed[0]);
        assert_eq!(polygon_area(&[closed]), 4.0);
    }

    #[test]
    fn no_rings_has_no_area() {
        let rings: [Vec<Point>; 0] = [];
        assert_eq!(polygon_area(&rings), 0.0);
        assert!(Polygon::default().is_degenerate());
    }

    #[test]
    fn containment_respects_holes() {
        let poly = Polygon::new(square(0.0, 0.0, 4.0), vec![square(1.0, 1.0, 1.0)]);
        assert!(poly.contains(Point::new(3.0, 3.0)));
        assert!(!poly.contains(Point::new(1.5, 1.5)));
        assert!(!poly.contains(Point::new(5.0, 1.0)));
    }

    #[test]
    fn concave_ring_containment() {
        // L-shaped ring.
        let ring = vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 2.0),
            Point::new(0.0, 2.0),
        ];
        assert!(contains_point(&ring, Point::new(0.5, 1.5)));
        assert!(contains_point(&ring, Point::new(1.5, 0.5)));
        assert!(!contains_point(&ring, Point::new(1.5, 1.5)));
    }

    #[test]
    fn multipolygon_sums_parts() {
        let fp = Footprint::MultiPolygon(vec![
            Polygon::new(square(0.0, 0.0, 1.0), vec![]),
            Polygon::new(square(5.0, 5.0, 2.0), vec![]),
        ]);
        assert_eq!(fp.area(), 5.0);
        assert!(fp.contains(Point::new(6.0, 6.0)));
        assert!(!fp.contains(Point::new(3.0, 3.0)));
        assert_eq!(fp.bounding_box(), Some(Rect::new(0.0, 0.0, 7.0, 7.0)));
    }

    #[test]
    fn translation_moves_every_ring() {
        let poly = Polygon::new(square(0.0, 0.0, 4.0), vec![square(1.0, 1.0, 1.0)]);
        let moved = poly.translated(Vec2::new(10.0, 5.0));
        assert_eq!(moved.area(), poly.area());
        assert!(!moved.contains(Point::new(11.5, 6.5)));
        assert!(moved.contains(Point::new(13.0, 8.0)));
    }

    #[test]
    fn degenerate_shapes() {
        let line = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)], vec![]);
        assert!(line.is_degenerate());
        let flat = Polygon::new(
            vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(2.0, 0.0),
            ],
            vec![],
        );
        assert!(flat.is_degenerate());
        assert!(!Polygon::new(square(0.0, 0.0, 1.0), vec![]).is_degenerate());
    }
}
