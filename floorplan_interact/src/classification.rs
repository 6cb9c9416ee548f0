// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Classification cache: records resolved onto model areas.
//!
//! Every record is resolved to an area with the point resolver at load time. The cache
//! keeps two maps so both directions are O(1):
//!
//! - [`FloorAreaKey`] of the resolved area → record and area node
//! - record id → area node and key
//!
//! A third map holds the key of every resolved node. It is the single source of area keys:
//! the render index and unit assignments use the same key for the same node.
//!
//! Loading is all-or-nothing. The maps are filled on a fresh value that is only returned
//! once every record has resolved, so a failed load never leaves a half-built cache behind.

use std::collections::HashMap;

use floorplan_model::{
    DEFAULT_FLOOR_NR, FloorAreaKey, FloorNr, ModelNode, ModelTree, NodeId, PlanId,
    find_area_by_point,
};
use tracing::{debug, debug_span, info, warn};

use crate::error::{Error, Result};
use crate::record::{AreaClassificationRecord, AreaType, RecordId};

/// Whether a display type may be derived from the model when the cache has none.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TypeFallback {
    /// Only cached types are shown.
    #[default]
    Disabled,
    /// Derive a display type from the node's raw type tag, logging each use.
    RawTag,
}

#[derive(Clone, Debug)]
struct Entry {
    record: AreaClassificationRecord,
    node: NodeId,
}

/// Classification records indexed by area key and by record id.
#[derive(Clone, Debug)]
pub struct ClassificationCache {
    plan_id: PlanId,
    by_key: HashMap<FloorAreaKey, Entry>,
    by_record: HashMap<RecordId, (NodeId, FloorAreaKey)>,
    by_node: HashMap<NodeId, FloorAreaKey>,
}

impl ClassificationCache {
    /// Resolve `records` against `tree`, using [`DEFAULT_FLOOR_NR`] for nodes without a floor.
    pub fn load(
        plan_id: PlanId,
        tree: &ModelTree,
        records: impl IntoIterator<Item = AreaClassificationRecord>,
    ) -> Result<Self> {
        Self::load_on_floor(plan_id, tree, records, DEFAULT_FLOOR_NR)
    }

    /// Resolve `records` against `tree`, using `default_floor` for nodes without a floor.
    ///
    /// Fails with [`Error::UnresolvedRecord`] on the first record whose coordinate has no
    /// enclosing area.
    ///
    /// A node's key is its area id on its floor. Nodes without an id take the id of the
    /// first record that resolved to them. When several records resolve to the same area
    /// the latest one wins: a warning is logged and the earlier record is dropped from both
    /// maps, so it no longer resolves through [`key_for_record`](Self::key_for_record).
    pub fn load_on_floor(
        plan_id: PlanId,
        tree: &ModelTree,
        records: impl IntoIterator<Item = AreaClassificationRecord>,
        default_floor: FloorNr,
    ) -> Result<Self> {
        let _span = debug_span!("classification_load", plan = %plan_id).entered();
        let mut cache = Self {
            plan_id,
            by_key: HashMap::new(),
            by_record: HashMap::new(),
            by_node: HashMap::new(),
        };
        for record in records {
            let point = record.coord();
            let Some(node_id) = find_area_by_point(tree, point) else {
                return Err(Error::UnresolvedRecord {
                    record_id: record.id,
                    point,
                });
            };
            let key = match cache.by_node.get(&node_id) {
                Some(key) => key.clone(),
                None => match tree.get(node_id) {
                    Some(node) => area_key(node, &record.id, default_floor),
                    None => FloorAreaKey::new(default_floor, record.id.clone()),
                },
            };
            debug!(record = %record.id, %key, node = node_id.index(), "resolved record");
            if let Some(prev) = cache.by_key.get(&key) {
                warn!(
                    %key,
                    previous = %prev.record.id,
                    record = %record.id,
                    "records resolve to the same area; keeping the latest"
                );
                cache.by_record.remove(&prev.record.id);
            }
            cache.by_node.insert(node_id, key.clone());
            cache.by_record.insert(record.id.clone(), (node_id, key.clone()));
            cache.by_key.insert(
                key,
                Entry {
                    record,
                    node: node_id,
                },
            );
        }
        info!(plan = %cache.plan_id, records = cache.by_record.len(), "classification loaded");
        Ok(cache)
    }

    /// Plan this cache was loaded for.
    pub fn plan_id(&self) -> &PlanId {
        &self.plan_id
    }

    /// Number of classified areas.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Whether no area is classified.
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Whether `key` is classified.
    pub fn contains_key(&self, key: &FloorAreaKey) -> bool {
        self.by_key.contains_key(key)
    }

    /// All classified keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &FloorAreaKey> + '_ {
        self.by_key.keys()
    }

    /// The record stored for `key`.
    pub fn record(&self, key: &FloorAreaKey) -> Option<&AreaClassificationRecord> {
        self.by_key.get(key).map(|e| &e.record)
    }

    /// Cached type for `key`. Missing keys log a warning.
    pub fn area_type(&self, key: &FloorAreaKey) -> Option<&AreaType> {
        match self.by_key.get(key) {
            Some(e) => e.record.area_type.as_ref(),
            None => {
                warn!(%key, "area type lookup for unknown key");
                None
            }
        }
    }

    /// Overwrite the type for `key`.
    ///
    /// Returns `false`, logs, and leaves the cache untouched when `key` is not classified.
    pub fn set_area_type(&mut self, key: &FloorAreaKey, area_type: AreaType) -> bool {
        match self.by_key.get_mut(key) {
            Some(e) => {
                debug!(%key, %area_type, "area type set");
                e.record.area_type = Some(area_type);
                true
            }
            None => {
                warn!(%key, %area_type, "ignoring area type for unknown key");
                false
            }
        }
    }

    /// Area node a record resolved to.
    pub fn node_for_record(&self, id: &RecordId) -> Option<NodeId> {
        self.by_record.get(id).map(|(node, _)| *node)
    }

    /// Area key a record resolved to.
    pub fn key_for_record(&self, id: &RecordId) -> Option<&FloorAreaKey> {
        self.by_record.get(id).map(|(_, key)| key)
    }

    /// Area key of a node that a record resolved to.
    pub fn key_for_node(&self, node: NodeId) -> Option<&FloorAreaKey> {
        self.by_node.get(&node)
    }

    /// Area node stored for `key`.
    pub fn node_for_key(&self, key: &FloorAreaKey) -> Option<NodeId> {
        self.by_key.get(key).map(|e| e.node)
    }

    /// Type to display for a rendered area.
    ///
    /// Cached types win. With [`TypeFallback::RawTag`] a missing cache value is replaced by
    /// the node's raw type tag (or its kind), and the substitution is logged.
    pub fn display_type(
        &self,
        key: &FloorAreaKey,
        node: &ModelNode,
        fallback: TypeFallback,
    ) -> Option<AreaType> {
        if let Some(t) = self.by_key.get(key).and_then(|e| e.record.area_type.as_ref()) {
            return Some(t.clone());
        }
        match fallback {
            TypeFallback::Disabled => None,
            TypeFallback::RawTag => {
                let tag = node.raw_type().unwrap_or_else(|| node.kind().as_str());
                let derived = AreaType::from_raw_tag(tag);
                warn!(%key, %derived, "no cached type, falling back to raw model tag");
                Some(derived)
            }
        }
    }
}

/// Cache key of an area node, falling back to the record id when the node carries none.
fn area_key(node: &ModelNode, record_id: &RecordId, default_floor: FloorNr) -> FloorAreaKey {
    let area_id = node.area_id().unwrap_or(record_id).clone();
    FloorAreaKey::new(node.floor_nr().unwrap_or(default_floor), area_id)
}
