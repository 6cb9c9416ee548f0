// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pick surfaces: the intersectable geometry behind each render handle.
//!
//! Surfaces are kept in draw order in a flat vector and scanned linearly; a plan has at most
//! a few thousand surfaces, and the list is rebuilt on a trailing debounce after structural
//! changes rather than maintained incrementally.

use floorplan_geometry::Footprint;
use kurbo::{Point, Rect};
use tracing::trace;

use crate::render_index::RenderHandle;

/// Kind of primitive a render node draws.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Filled surface. Only fills take part in picking.
    Fill,
    /// Outline.
    Edge,
    /// Label.
    Text,
}

/// A render node hit by the pointer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// Hit handle.
    pub handle: RenderHandle,
    /// What the handle draws.
    pub primitive: Primitive,
}

/// Source of measured areas for hit tie-breaking.
pub trait MeasureArea {
    /// Area of the surface behind `handle`, in plan units.
    fn area_of(&self, handle: RenderHandle) -> Option<f64>;
}

impl<F: Fn(RenderHandle) -> Option<f64>> MeasureArea for F {
    fn area_of(&self, handle: RenderHandle) -> Option<f64> {
        self(handle)
    }
}

#[derive(Clone, Debug)]
struct Surface {
    handle: RenderHandle,
    primitive: Primitive,
    bounds: Rect,
    footprint: Footprint,
    area: f64,
}

/// Registered surfaces in draw order: first drawn is farthest from the viewer.
#[derive(Clone, Debug, Default)]
pub struct PickSurfaces {
    surfaces: Vec<Surface>,
}

impl PickSurfaces {
    /// Create an empty surface list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of surfaces.
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Whether there are no surfaces.
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Append a surface on top of the existing ones. `footprint` is in plan coordinates.
    ///
    /// Degenerate footprints are not pickable and are skipped; returns whether the
    /// surface was added.
    pub fn push(&mut self, handle: RenderHandle, primitive: Primitive, footprint: Footprint) -> bool {
        let bounds = match footprint.bounding_box() {
            Some(b) if !footprint.is_degenerate() => b,
            _ => {
                trace!(handle = handle.get(), "skipping degenerate surface");
                return false;
            }
        };
        let area = footprint.area();
        self.surfaces.push(Surface {
            handle,
            primitive,
            bounds,
            footprint,
            area,
        });
        true
    }

    /// Remove every surface of `handle`.
    pub fn remove(&mut self, handle: RenderHandle) {
        self.surfaces.retain(|s| s.handle != handle);
    }

    /// Remove all surfaces.
    pub fn clear(&mut self) {
        self.surfaces.clear();
    }

    /// Surfaces under `point`, farthest first and nearest last.
    pub fn candidates_at(&self, point: Point) -> Vec<Candidate> {
        self.surfaces
            .iter()
            .filter(|s| s.bounds.contains(point) && s.footprint.contains(point))
            .map(|s| Candidate {
                handle: s.handle,
                primitive: s.primitive,
            })
            .collect()
    }
}

impl MeasureArea for PickSurfaces {
    fn area_of(&self, handle: RenderHandle) -> Option<f64> {
        self.surfaces
            .iter()
            .rev()
            .find(|s| s.handle == handle && s.primitive == Primitive::Fill)
            .map(|s| s.area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_index::HandleAllocator;
    use floorplan_geometry::Polygon;

    fn square(x: f64, y: f64, size: f64) -> Footprint {
        Footprint::from(Polygon::new(
            vec![
                Point::new(x, y),
                Point::new(x + size, y),
                Point::new(x + size, y + size),
                Point::new(x, y + size),
            ],
            vec![],
        ))
    }

    #[test]
    fn candidates_follow_draw_order() {
        let mut alloc = HandleAllocator::new();
        let mut surfaces = PickSurfaces::new();
        let (a, b, c) = (alloc.alloc(), alloc.alloc(), alloc.alloc());
        assert!(surfaces.push(a, Primitive::Fill, square(0.0, 0.0, 10.0)));
        assert!(surfaces.push(b, Primitive::Edge, square(0.0, 0.0, 10.0)));
        assert!(surfaces.push(c, Primitive::Fill, square(5.0, 5.0, 1.0)));

        let hits: Vec<_> = surfaces.candidates_at(Point::new(5.5, 5.5)).iter().map(|c| c.handle).collect();
        assert_eq!(hits, vec![a, b, c]);
        let hits: Vec<_> = surfaces.candidates_at(Point::new(1.0, 1.0)).iter().map(|c| c.handle).collect();
        assert_eq!(hits, vec![a, b]);
        assert!(surfaces.candidates_at(Point::new(20.0, 1.0)).is_empty());
    }

    #[test]
    fn fill_area_is_measured() {
        let mut alloc = HandleAllocator::new();
        let mut surfaces = PickSurfaces::new();
        let a = alloc.alloc();
        surfaces.push(a, Primitive::Fill, square(0.0, 0.0, 2.0));
        assert_eq!(surfaces.area_of(a), Some(4.0));
        assert_eq!(surfaces.area_of(alloc.alloc()), None);
        surfaces.remove(a);
        assert!(surfaces.is_empty());
    }

    #[test]
    fn degenerate_surfaces_are_skipped() {
        let mut alloc = HandleAllocator::new();
        let mut surfaces = PickSurfaces::new();
        let line = Footprint::from(Polygon::new(
            vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 2.0)],
            vec![],
        ));
        assert!(!surfaces.push(alloc.alloc(), Primitive::Fill, line));
        assert_eq!(surfaces.len(), 0);
    }
}
