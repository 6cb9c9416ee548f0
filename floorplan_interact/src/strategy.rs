// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interaction strategies: per-mode reactions to clicks and hovers.
//!
//! A session is generic over one [`InteractionStrategy`] chosen when it is created. Shared
//! code calls through the trait and never inspects which mode is active.

use std::collections::BTreeSet;

use floorplan_model::{FloorAreaKey, FloorNr, ModelNode, ModelTree, NodeId, PlanId};
use tracing::debug;

use crate::classification::{ClassificationCache, TypeFallback};
use crate::error::Result;
use crate::palette::{Palette, Rgba8};
use crate::record::{AreaType, AreaTypeChange, ScaleChange};
use crate::render_index::DomainObject;
use crate::units::{ApartmentNo, UnitAssignment, UnitAssignments, UnitKey};

bitflags::bitflags! {
    /// External data a strategy wants to hear about.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ChangeTopics: u8 {
        /// Area types were edited elsewhere.
        const AREA_TYPES = 0b0000_0001;
        /// Unit assignments were edited elsewhere.
        const UNITS      = 0b0000_0010;
        /// Validation errors were recomputed.
        const ERRORS     = 0b0000_0100;
        /// Plan scale changed.
        const SCALE      = 0b0000_1000;
    }
}

bitflags::bitflags! {
    /// How a highlighted render node should be drawn.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct HighlightFlags: u8 {
        /// Pointer is over the node.
        const HOVER    = 0b0000_0001;
        /// Node is selected.
        const SELECTED = 0b0000_0010;
        /// Highlight the node's whole unit.
        const UNIT     = 0b0000_0100;
        /// Node is an error marker.
        const ERROR    = 0b0000_1000;
    }
}

/// Read-only view of the annotation state.
#[derive(Copy, Clone, Debug)]
pub struct View<'a> {
    /// Loaded model.
    pub tree: &'a ModelTree,
    /// Classification cache.
    pub cache: &'a ClassificationCache,
    /// Unit assignments.
    pub units: &'a UnitAssignments,
    /// Colours.
    pub palette: &'a Palette,
    /// Display-type fallback policy.
    pub fallback: TypeFallback,
}

/// Mutable access to the annotation state during a click.
#[derive(Debug)]
pub struct EditContext<'a> {
    /// Loaded model.
    pub tree: &'a ModelTree,
    /// Classification cache.
    pub cache: &'a mut ClassificationCache,
    /// Unit assignments.
    pub units: &'a mut UnitAssignments,
    /// Colours.
    pub palette: &'a Palette,
    /// Display-type fallback policy.
    pub fallback: TypeFallback,
}

impl EditContext<'_> {
    /// Borrow as a read-only view.
    pub fn view(&self) -> View<'_> {
        View {
            tree: self.tree,
            cache: self.cache,
            units: self.units,
            palette: self.palette,
            fallback: self.fallback,
        }
    }
}

/// Edit the caller has to persist or reflect.
#[derive(Clone, Debug, PartialEq)]
pub enum Change {
    /// An area type changed.
    AreaType(AreaTypeChange),
    /// These units changed; each snapshot replaces the stored unit.
    Units(Vec<UnitAssignment>),
    /// The working selection changed.
    Selection(Vec<FloorAreaKey>),
    /// The errors of a node were selected.
    ErrorSelected {
        /// Node carrying the errors.
        node: NodeId,
        /// Number of errors on it.
        count: usize,
    },
    /// A reference area was measured for scaling.
    Measured {
        /// Measured area.
        key: FloorAreaKey,
        /// Area in plan units.
        area: f64,
    },
}

/// Result of a strategy callback.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrategyOutcome {
    /// Edit to persist, if any.
    pub change: Option<Change>,
    /// Areas whose appearance changed.
    pub dirty: Vec<FloorAreaKey>,
}

/// Per-mode interaction behaviour.
pub trait InteractionStrategy {
    /// Short mode name for logs.
    fn name(&self) -> &'static str;

    /// React to a click on `target`.
    fn on_click(&mut self, target: &DomainObject, ctx: &mut EditContext<'_>) -> Result<StrategyOutcome>;

    /// Highlight to apply while hovering `target`.
    fn on_hover(&mut self, target: &DomainObject, view: View<'_>) -> HighlightFlags {
        let _ = (target, view);
        HighlightFlags::HOVER
    }

    /// React to a click that hit nothing. Returns the areas to redraw.
    fn on_clear(&mut self) -> Vec<FloorAreaKey> {
        Vec::new()
    }

    /// Fill colour for an area node.
    fn color_for(&self, node: &ModelNode, key: &FloorAreaKey, view: View<'_>) -> Rgba8;

    /// External changes this mode reacts to.
    fn subscriptions(&self) -> ChangeTopics {
        ChangeTopics::empty()
    }

    /// React to subscribed external changes. Returns the areas to redraw.
    fn on_external_change(&mut self, topics: ChangeTopics, ctx: &mut EditContext<'_>) -> Vec<FloorAreaKey> {
        let _ = topics;
        ctx.cache.keys().cloned().collect()
    }
}

/// Paint areas with a type brush.
#[derive(Clone, Debug)]
pub struct ClassificationMode {
    brush: AreaType,
}

impl ClassificationMode {
    /// Start with `brush` as the active type.
    pub fn new(brush: AreaType) -> Self {
        Self { brush }
    }

    /// Current brush.
    pub fn brush(&self) -> &AreaType {
        &self.brush
    }

    /// Change the brush.
    pub fn set_brush(&mut self, brush: AreaType) {
        self.brush = brush;
    }
}

impl InteractionStrategy for ClassificationMode {
    fn name(&self) -> &'static str {
        "classification"
    }

    fn on_click(&mut self, target: &DomainObject, ctx: &mut EditContext<'_>) -> Result<StrategyOutcome> {
        let Some(key) = target.area_key() else {
            return Ok(StrategyOutcome::default());
        };
        if !ctx.cache.set_area_type(key, self.brush.clone()) {
            return Ok(StrategyOutcome::default());
        }
        let change = ctx.cache.record(key).map(|r| {
            Change::AreaType(AreaTypeChange {
                record_id: r.id.clone(),
                key: key.clone(),
                area_type: self.brush.clone(),
            })
        });
        Ok(StrategyOutcome {
            change,
            dirty: vec![key.clone()],
        })
    }

    fn color_for(&self, node: &ModelNode, key: &FloorAreaKey, view: View<'_>) -> Rgba8 {
        let t = view.cache.display_type(key, node, view.fallback);
        view.palette.color_for_type(t.as_ref())
    }

    fn subscriptions(&self) -> ChangeTopics {
        ChangeTopics::AREA_TYPES
    }
}

/// Link areas into the current apartment.
#[derive(Clone, Debug)]
pub struct LinkingMode {
    current: UnitKey,
}

impl LinkingMode {
    /// Link clicked areas to `apartment_no` on `floor_id`.
    pub fn new(floor_id: FloorNr, apartment_no: ApartmentNo) -> Self {
        Self {
            current: UnitKey {
                floor_id,
                apartment_no,
            },
        }
    }

    /// Unit clicks currently link into.
    pub fn current(&self) -> UnitKey {
        self.current
    }

    /// Switch the target apartment.
    pub fn set_apartment(&mut self, apartment_no: ApartmentNo) {
        self.current.apartment_no = apartment_no;
    }
}

fn unit_snapshots(units: &UnitAssignments, touched: &[UnitKey]) -> (Vec<UnitAssignment>, Vec<FloorAreaKey>) {
    let mut dirty = Vec::new();
    let mut snaps = Vec::new();
    for &u in touched {
        dirty.extend(units.areas_of(u).cloned());
        snaps.push(units.snapshot_unit(u));
    }
    (snaps, dirty)
}

impl InteractionStrategy for LinkingMode {
    fn name(&self) -> &'static str {
        "linking"
    }

    fn on_click(&mut self, target: &DomainObject, ctx: &mut EditContext<'_>) -> Result<StrategyOutcome> {
        let Some(key) = target.area_key() else {
            return Ok(StrategyOutcome::default());
        };
        // Clicking an area already in the current unit takes it back out.
        let next = if ctx.units.unit_of(key) == Some(self.current) {
            None
        } else {
            Some(self.current.apartment_no)
        };
        let previous = ctx.units.assign(key, self.current.floor_id, next, ctx.cache)?;
        let mut touched = vec![self.current];
        if let Some(p) = previous.filter(|p| *p != self.current) {
            touched.push(p);
        }
        let (snaps, mut dirty) = unit_snapshots(ctx.units, &touched);
        dirty.push(key.clone());
        Ok(StrategyOutcome {
            change: Some(Change::Units(snaps)),
            dirty,
        })
    }

    fn on_hover(&mut self, target: &DomainObject, view: View<'_>) -> HighlightFlags {
        match target.area_key().and_then(|k| view.units.unit_of(k)) {
            Some(_) => HighlightFlags::HOVER | HighlightFlags::UNIT,
            None => HighlightFlags::HOVER,
        }
    }

    fn color_for(&self, _node: &ModelNode, key: &FloorAreaKey, view: View<'_>) -> Rgba8 {
        let unit = view.units.unit_of(key).map(|u| u.apartment_no);
        view.palette.color_for_unit(unit)
    }

    fn subscriptions(&self) -> ChangeTopics {
        ChangeTopics::UNITS
    }
}

/// Collect a selection of areas to split off into a new unit.
#[derive(Clone, Debug, Default)]
pub struct SplittingMode {
    selection: BTreeSet<FloorAreaKey>,
}

impl SplittingMode {
    /// Start with an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected areas in key order.
    pub fn selection(&self) -> impl Iterator<Item = &FloorAreaKey> + '_ {
        self.selection.iter()
    }

    /// Move every selected area into `apartment_no` on `floor_id` and clear the selection.
    ///
    /// Fails without touching anything when a selected area is not classified.
    pub fn split(
        &mut self,
        floor_id: FloorNr,
        apartment_no: ApartmentNo,
        ctx: &mut EditContext<'_>,
    ) -> Result<StrategyOutcome> {
        if let Some(key) = self.selection.iter().find(|k| !ctx.cache.contains_key(k)) {
            return Err(crate::Error::UnknownArea { key: key.clone() });
        }
        let target = UnitKey {
            floor_id,
            apartment_no,
        };
        let mut touched = vec![target];
        for key in &self.selection {
            if let Some(prev) = ctx.units.assign(key, floor_id, Some(apartment_no), ctx.cache)? {
                if !touched.contains(&prev) {
                    touched.push(prev);
                }
            }
        }
        debug!(floor_id, apartment_no, areas = self.selection.len(), "split selection into unit");
        self.selection.clear();
        let (snaps, dirty) = unit_snapshots(ctx.units, &touched);
        Ok(StrategyOutcome {
            change: Some(Change::Units(snaps)),
            dirty,
        })
    }
}

impl InteractionStrategy for SplittingMode {
    fn name(&self) -> &'static str {
        "splitting"
    }

    fn on_click(&mut self, target: &DomainObject, _ctx: &mut EditContext<'_>) -> Result<StrategyOutcome> {
        let Some(key) = target.area_key() else {
            return Ok(StrategyOutcome::default());
        };
        if !self.selection.remove(key) {
            self.selection.insert(key.clone());
        }
        Ok(StrategyOutcome {
            change: Some(Change::Selection(self.selection.iter().cloned().collect())),
            dirty: vec![key.clone()],
        })
    }

    fn on_clear(&mut self) -> Vec<FloorAreaKey> {
        core::mem::take(&mut self.selection).into_iter().collect()
    }

    fn color_for(&self, _node: &ModelNode, key: &FloorAreaKey, view: View<'_>) -> Rgba8 {
        if self.selection.contains(key) {
            view.palette.selection
        } else {
            view.palette
                .color_for_unit(view.units.unit_of(key).map(|u| u.apartment_no))
        }
    }

    fn subscriptions(&self) -> ChangeTopics {
        ChangeTopics::UNITS
    }
}

/// Inspect validation errors.
///
/// Error markers are not pickable, so clicking an area selects the errors it carries.
#[derive(Clone, Debug, Default)]
pub struct ValidationMode {
    selected: Option<NodeId>,
}

impl ValidationMode {
    /// Start with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Node whose errors are selected.
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }
}

impl InteractionStrategy for ValidationMode {
    fn name(&self) -> &'static str {
        "validation"
    }

    fn on_click(&mut self, target: &DomainObject, ctx: &mut EditContext<'_>) -> Result<StrategyOutcome> {
        let node = target.node();
        let count = ctx.tree.get(node).map_or(0, |n| n.errors().len());
        if count == 0 {
            return Ok(StrategyOutcome::default());
        }
        self.selected = Some(node);
        Ok(StrategyOutcome {
            change: Some(Change::ErrorSelected { node, count }),
            dirty: target.area_key().cloned().into_iter().collect(),
        })
    }

    fn on_hover(&mut self, target: &DomainObject, view: View<'_>) -> HighlightFlags {
        let has_errors = view
            .tree
            .get(target.node())
            .is_some_and(|n| !n.errors().is_empty());
        if has_errors {
            HighlightFlags::HOVER | HighlightFlags::ERROR
        } else {
            HighlightFlags::HOVER
        }
    }

    fn on_clear(&mut self) -> Vec<FloorAreaKey> {
        self.selected = None;
        Vec::new()
    }

    fn color_for(&self, node: &ModelNode, _key: &FloorAreaKey, view: View<'_>) -> Rgba8 {
        if self.selected == Some(node.id()) {
            view.palette.selection
        } else if node.errors().is_empty() {
            view.palette.neutral
        } else {
            view.palette.error
        }
    }

    fn subscriptions(&self) -> ChangeTopics {
        ChangeTopics::ERRORS
    }
}

/// Derive the plan scale from one area of known real size.
#[derive(Clone, Debug, Default)]
pub struct ScalingMode {
    measured: Option<(FloorAreaKey, f64)>,
}

impl ScalingMode {
    /// Start with nothing measured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reference area and its size in plan units.
    pub fn measured(&self) -> Option<(&FloorAreaKey, f64)> {
        self.measured.as_ref().map(|(k, a)| (k, *a))
    }

    /// Metres per plan unit, given the reference area's real size in square metres.
    pub fn scale_factor(&self, real_m2: f64) -> Option<f64> {
        let (_, measured) = self.measured.as_ref()?;
        (*measured > 0.0 && real_m2 > 0.0).then(|| (real_m2 / measured).sqrt())
    }

    /// Scale edit to persist for `plan_id`.
    pub fn scale_change(&self, plan_id: &PlanId, real_m2: f64) -> Option<ScaleChange> {
        self.scale_factor(real_m2).map(|scale_factor| ScaleChange {
            plan_id: plan_id.clone(),
            scale_factor,
        })
    }
}

impl InteractionStrategy for ScalingMode {
    fn name(&self) -> &'static str {
        "scaling"
    }

    fn on_click(&mut self, target: &DomainObject, ctx: &mut EditContext<'_>) -> Result<StrategyOutcome> {
        let Some(key) = target.area_key() else {
            return Ok(StrategyOutcome::default());
        };
        // Area is translation invariant, so the local footprint is enough.
        let Some(area) = ctx
            .tree
            .get(target.node())
            .and_then(ModelNode::footprint)
            .map(|fp| fp.area())
        else {
            return Ok(StrategyOutcome::default());
        };
        let mut dirty = vec![key.clone()];
        if let Some((old, _)) = self.measured.replace((key.clone(), area)) {
            dirty.push(old);
        }
        Ok(StrategyOutcome {
            change: Some(Change::Measured {
                key: key.clone(),
                area,
            }),
            dirty,
        })
    }

    fn color_for(&self, _node: &ModelNode, key: &FloorAreaKey, view: View<'_>) -> Rgba8 {
        match &self.measured {
            Some((k, _)) if k == key => view.palette.selection,
            _ => view.palette.neutral,
        }
    }

    fn subscriptions(&self) -> ChangeTopics {
        ChangeTopics::SCALE
    }
}
