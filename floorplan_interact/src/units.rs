// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Apartment/unit assignments.
//!
//! An area belongs to at most one unit. Moving an area removes it from its old unit before
//! adding it to the new one, so no intermediate state ever lists it twice.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use floorplan_model::{FloorAreaKey, FloorNr};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, info};

use crate::classification::ClassificationCache;
use crate::error::{Error, Result};

/// Apartment number within a floor.
pub type ApartmentNo = u32;

/// Identity of a unit: floor and apartment number.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitKey {
    /// Floor the unit lives on.
    pub floor_id: FloorNr,
    /// Apartment number.
    pub apartment_no: ApartmentNo,
}

/// Wire form of a unit: the areas grouped under one apartment number.
///
/// `apartment_no` is `null` or `-1` on the wire for unassigned areas (public space).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitAssignment {
    /// Member areas.
    pub area_ids: Vec<FloorAreaKey>,
    /// Apartment number, `None` for public space.
    #[serde(
        serialize_with = "serialize_apartment_no",
        deserialize_with = "deserialize_apartment_no",
        default
    )]
    pub apartment_no: Option<ApartmentNo>,
    /// Floor of the unit.
    pub floor_id: FloorNr,
}

fn serialize_apartment_no<S: Serializer>(v: &Option<ApartmentNo>, s: S) -> Result<S::Ok, S::Error> {
    v.serialize(s)
}

fn deserialize_apartment_no<'de, D: Deserializer<'de>>(d: D) -> Result<Option<ApartmentNo>, D::Error> {
    let raw = Option::<i64>::deserialize(d)?;
    Ok(raw.and_then(|n| ApartmentNo::try_from(n).ok()))
}

/// Unit membership of every assigned area.
#[derive(Clone, Debug, Default)]
pub struct UnitAssignments {
    members: BTreeMap<UnitKey, BTreeSet<FloorAreaKey>>,
    unit_of: HashMap<FloorAreaKey, UnitKey>,
}

impl UnitAssignments {
    /// Create an empty set of assignments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build assignments from their wire form.
    ///
    /// Every key must be classified in `cache`; the first unknown key aborts with
    /// [`Error::UnknownArea`]. Public-space entries are skipped. An area listed in several
    /// units ends up in the last one.
    pub fn load(
        assignments: impl IntoIterator<Item = UnitAssignment>,
        cache: &ClassificationCache,
    ) -> Result<Self> {
        let mut units = Self::new();
        for a in assignments {
            if let Some(key) = a.area_ids.iter().find(|k| !cache.contains_key(k)) {
                return Err(Error::UnknownArea { key: key.clone() });
            }
            let Some(apartment_no) = a.apartment_no else {
                continue;
            };
            let unit = UnitKey {
                floor_id: a.floor_id,
                apartment_no,
            };
            for key in a.area_ids {
                units.insert(key, unit);
            }
        }
        info!(units = units.members.len(), areas = units.unit_of.len(), "unit assignments loaded");
        Ok(units)
    }

    fn insert(&mut self, key: FloorAreaKey, unit: UnitKey) -> Option<UnitKey> {
        let previous = self.remove(&key);
        self.members.entry(unit).or_default().insert(key.clone());
        self.unit_of.insert(key, unit);
        previous
    }

    fn remove(&mut self, key: &FloorAreaKey) -> Option<UnitKey> {
        let unit = self.unit_of.remove(key)?;
        if let Some(set) = self.members.get_mut(&unit) {
            set.remove(key);
            if set.is_empty() {
                self.members.remove(&unit);
            }
        }
        Some(unit)
    }

    /// Move `key` into `apartment_no` on `floor_id`, or to public space for `None`.
    ///
    /// Returns the unit the area was in before. Unknown keys fail with
    /// [`Error::UnknownArea`] and leave the assignments unchanged.
    pub fn assign(
        &mut self,
        key: &FloorAreaKey,
        floor_id: FloorNr,
        apartment_no: Option<ApartmentNo>,
        cache: &ClassificationCache,
    ) -> Result<Option<UnitKey>> {
        if !cache.contains_key(key) {
            return Err(Error::UnknownArea { key: key.clone() });
        }
        let previous = match apartment_no {
            Some(apartment_no) => self.insert(
                key.clone(),
                UnitKey {
                    floor_id,
                    apartment_no,
                },
            ),
            None => self.remove(key),
        };
        debug!(%key, ?previous, ?apartment_no, "unit assignment changed");
        Ok(previous)
    }

    /// Move `key` to public space, returning its former unit.
    pub fn unassign(&mut self, key: &FloorAreaKey) -> Option<UnitKey> {
        self.remove(key)
    }

    /// Unit `key` belongs to.
    pub fn unit_of(&self, key: &FloorAreaKey) -> Option<UnitKey> {
        self.unit_of.get(key).copied()
    }

    /// Areas of `unit`, in key order.
    pub fn areas_of(&self, unit: UnitKey) -> impl Iterator<Item = &FloorAreaKey> + '_ {
        self.members.get(&unit).into_iter().flatten()
    }

    /// Move every area of `from` into `into` on `floor_id`. Returns the moved keys.
    pub fn merge(&mut self, floor_id: FloorNr, from: ApartmentNo, into: ApartmentNo) -> Vec<FloorAreaKey> {
        let from = UnitKey {
            floor_id,
            apartment_no: from,
        };
        let into = UnitKey {
            floor_id,
            apartment_no: into,
        };
        if from == into {
            return Vec::new();
        }
        let moved: Vec<_> = self.members.remove(&from).into_iter().flatten().collect();
        for key in &moved {
            self.unit_of.insert(key.clone(), into);
        }
        self.members
            .entry(into)
            .or_default()
            .extend(moved.iter().cloned());
        debug!(floor_id, from = from.apartment_no, into = into.apartment_no, moved = moved.len(), "units merged");
        moved
    }

    /// Units in key order.
    pub fn units(&self) -> impl Iterator<Item = UnitKey> + '_ {
        self.members.keys().copied()
    }

    /// Wire form of one unit; empty when the unit has no areas.
    pub fn snapshot_unit(&self, unit: UnitKey) -> UnitAssignment {
        UnitAssignment {
            area_ids: self.areas_of(unit).cloned().collect(),
            apartment_no: Some(unit.apartment_no),
            floor_id: unit.floor_id,
        }
    }

    /// Wire form of every unit, for persistence.
    pub fn snapshot(&self) -> Vec<UnitAssignment> {
        self.units().map(|u| self.snapshot_unit(u)).collect()
    }
}
