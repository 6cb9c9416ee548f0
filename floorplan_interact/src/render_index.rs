// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bidirectional index between render handles and domain objects.
//!
//! The index holds four maps that are only ever cleared together:
//!
//! - handle → [`IndexEntry`]
//! - area id → handle, for area and unit objects
//! - [`FloorAreaKey`] → handle, for area and unit objects
//! - error index → handle
//!
//! Reverse lookups resolve to the most recently registered handle. A fresh index is built
//! for every load and swapped in whole; nothing patches an old index after a reload.

use std::collections::HashMap;

use floorplan_model::{AreaId, FloorAreaKey, NodeId};
use tracing::{trace, warn};

use crate::units::ApartmentNo;

/// Opaque identity of a visual node.
///
/// Handles only track registration. Business identity always goes through
/// [`FloorAreaKey`] or a record id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderHandle(u64);

impl RenderHandle {
    /// Raw value, for logging and for renderers that keep their own tables.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Hands out unique [`RenderHandle`]s.
#[derive(Clone, Debug, Default)]
pub struct HandleAllocator {
    next: u64,
}

impl HandleAllocator {
    /// Create an allocator starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh handle.
    pub fn alloc(&mut self) -> RenderHandle {
        let h = RenderHandle(self.next);
        self.next += 1;
        h
    }
}

/// Class of domain object behind a handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DomainGroup {
    /// A classified area.
    Area,
    /// An area drawn as part of an apartment unit.
    Unit,
    /// A validation error marker.
    Error,
}

/// Domain object registered for a handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomainObject {
    /// Area fill.
    Area {
        /// Area key.
        key: FloorAreaKey,
        /// Model node.
        node: NodeId,
    },
    /// Area fill coloured by unit.
    Unit {
        /// Area key.
        key: FloorAreaKey,
        /// Unit the area belonged to when registered.
        apartment_no: Option<ApartmentNo>,
        /// Model node.
        node: NodeId,
    },
    /// Error marker.
    Error {
        /// Position of the error in registration order.
        index: usize,
        /// Node carrying the error.
        node: NodeId,
    },
}

impl DomainObject {
    /// The object's group.
    pub fn group(&self) -> DomainGroup {
        match self {
            Self::Area { .. } => DomainGroup::Area,
            Self::Unit { .. } => DomainGroup::Unit,
            Self::Error { .. } => DomainGroup::Error,
        }
    }

    /// Area key, for area and unit objects.
    pub fn area_key(&self) -> Option<&FloorAreaKey> {
        match self {
            Self::Area { key, .. } | Self::Unit { key, .. } => Some(key),
            Self::Error { .. } => None,
        }
    }

    /// Model node behind the object.
    pub fn node(&self) -> NodeId {
        match self {
            Self::Area { node, .. } | Self::Unit { node, .. } | Self::Error { node, .. } => *node,
        }
    }
}

/// One registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    /// Registered handle.
    pub handle: RenderHandle,
    /// Group of `object`.
    pub group: DomainGroup,
    /// Domain object.
    pub object: DomainObject,
}

/// Handle ↔ domain object index.
#[derive(Clone, Debug, Default)]
pub struct RenderIndex {
    entries: HashMap<RenderHandle, IndexEntry>,
    by_area_id: HashMap<AreaId, RenderHandle>,
    by_key: HashMap<FloorAreaKey, RenderHandle>,
    by_error: HashMap<usize, RenderHandle>,
}

impl RenderIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered handles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register `object` for `handle`, replacing any previous registration of that handle.
    pub fn register(&mut self, handle: RenderHandle, object: DomainObject) {
        if let Some(old) = self.entries.remove(&handle) {
            self.unlink(&old);
        }
        match &object {
            DomainObject::Area { key, .. } | DomainObject::Unit { key, .. } => {
                self.by_area_id.insert(key.area_id.clone(), handle);
                self.by_key.insert(key.clone(), handle);
            }
            DomainObject::Error { index, .. } => {
                self.by_error.insert(*index, handle);
            }
        }
        trace!(handle = handle.get(), group = ?object.group(), "registered render node");
        self.entries.insert(
            handle,
            IndexEntry {
                handle,
                group: object.group(),
                object,
            },
        );
    }

    // Drop reverse links that still point at the replaced entry's handle.
    fn unlink(&mut self, old: &IndexEntry) {
        let h = old.handle;
        match &old.object {
            DomainObject::Area { key, .. } | DomainObject::Unit { key, .. } => {
                if self.by_area_id.get(&key.area_id) == Some(&h) {
                    self.by_area_id.remove(&key.area_id);
                }
                if self.by_key.get(key) == Some(&h) {
                    self.by_key.remove(key);
                }
            }
            DomainObject::Error { index, .. } => {
                if self.by_error.get(index) == Some(&h) {
                    self.by_error.remove(index);
                }
            }
        }
    }

    /// Remove every registration from all four maps.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_area_id.clear();
        self.by_key.clear();
        self.by_error.clear();
    }

    /// Entry registered for `handle`.
    pub fn entry(&self, handle: RenderHandle) -> Option<&IndexEntry> {
        let e = self.entries.get(&handle);
        if e.is_none() {
            warn!(handle = handle.get(), "render handle not indexed");
        }
        e
    }

    /// Most recent handle for an area id, across floors.
    pub fn handle_for_area(&self, area_id: &AreaId) -> Option<RenderHandle> {
        let h = self.by_area_id.get(area_id).copied();
        if h.is_none() {
            warn!(%area_id, "no render node for area id");
        }
        h
    }

    /// Most recent handle for a floor-qualified key.
    pub fn handle_for_key(&self, key: &FloorAreaKey) -> Option<RenderHandle> {
        let h = self.by_key.get(key).copied();
        if h.is_none() {
            warn!(%key, "no render node for area key");
        }
        h
    }

    /// Handle of an error marker.
    pub fn handle_for_error(&self, index: usize) -> Option<RenderHandle> {
        let h = self.by_error.get(&index).copied();
        if h.is_none() {
            warn!(index, "no render node for error");
        }
        h
    }

    /// All entries, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> + '_ {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn area(floor: u32, id: &str, node: u32) -> DomainObject {
        DomainObject::Area {
            key: FloorAreaKey::new(floor, id),
            node: node_id(node),
        }
    }

    fn node_id(n: u32) -> NodeId {
        // Node ids are only minted by trees; build a tiny one to get real ids.
        let mut tree = floorplan_model::ModelTree::new(Default::default());
        let mut last = tree.root();
        for _ in 0..n {
            last = tree.insert(tree.root(), Default::default()).unwrap();
        }
        last
    }

    #[test]
    fn lookups_in_both_directions() {
        let mut alloc = HandleAllocator::new();
        let mut index = RenderIndex::new();
        let h1 = alloc.alloc();
        let h2 = alloc.alloc();
        let h3 = alloc.alloc();
        assert_ne!(h1, h2);
        index.register(h1, area(1, "a", 1));
        index.register(
            h2,
            DomainObject::Unit {
                key: FloorAreaKey::new(1, "b"),
                apartment_no: Some(3),
                node: node_id(2),
            },
        );
        index.register(h3, DomainObject::Error { index: 0, node: node_id(1) });

        assert_eq!(index.len(), 3);
        assert_eq!(index.entry(h1).map(|e| e.group), Some(DomainGroup::Area));
        assert_eq!(index.entry(h2).map(|e| e.group), Some(DomainGroup::Unit));
        assert_eq!(index.handle_for_key(&FloorAreaKey::new(1, "a")), Some(h1));
        assert_eq!(index.handle_for_area(&"b".into()), Some(h2));
        assert_eq!(index.handle_for_error(0), Some(h3));
    }

    #[test]
    fn latest_registration_wins_for_duplicates() {
        let mut alloc = HandleAllocator::new();
        let mut index = RenderIndex::new();
        let first = alloc.alloc();
        let second = alloc.alloc();
        index.register(first, area(1, "a", 1));
        index.register(second, area(1, "a", 1));
        assert_eq!(index.handle_for_key(&FloorAreaKey::new(1, "a")), Some(second));
        // Same area id on another floor: id lookup follows the newest, keys stay apart.
        let third = alloc.alloc();
        index.register(third, area(2, "a", 1));
        assert_eq!(index.handle_for_area(&"a".into()), Some(third));
        assert_eq!(index.handle_for_key(&FloorAreaKey::new(1, "a")), Some(second));
    }

    #[test]
    fn reregistering_a_handle_overwrites() {
        let mut alloc = HandleAllocator::new();
        let mut index = RenderIndex::new();
        let h = alloc.alloc();
        index.register(h, area(1, "a", 1));
        index.register(h, area(1, "a", 1));
        assert_eq!(index.len(), 1);
        index.register(h, area(1, "b", 2));
        assert_eq!(index.len(), 1);
        assert_eq!(index.by_key.get(&FloorAreaKey::new(1, "a")), None);
        assert_eq!(index.handle_for_key(&FloorAreaKey::new(1, "b")), Some(h));
    }

    #[test]
    #[traced_test]
    fn clear_empties_every_map() {
        let mut alloc = HandleAllocator::new();
        let mut index = RenderIndex::new();
        let h = alloc.alloc();
        index.register(h, area(1, "a", 1));
        index.register(alloc.alloc(), DomainObject::Error { index: 2, node: node_id(1) });
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.entry(h), None);
        assert_eq!(index.handle_for_key(&FloorAreaKey::new(1, "a")), None);
        assert_eq!(index.handle_for_area(&"a".into()), None);
        assert_eq!(index.handle_for_error(2), None);
        assert!(logs_contain("no render node for area key"));
    }
}
