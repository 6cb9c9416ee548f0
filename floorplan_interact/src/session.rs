// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Annotation session: one loaded plan wired to one interaction strategy.
//!
//! ## Loading
//!
//! Fetching happens outside this crate. A load starts with [`LoadSession::begin`], which
//! hands out a [`LoadTicket`]; when the fetched data has been indexed into a
//! [`LoadedPlan`], [`LoadSession::commit`] checks that the ticket is still the newest one
//! for the active plan. Superseded loads come back as [`LoadOutcome::Discarded`] and are
//! dropped whole.
//!
//! ## Interaction
//!
//! Render nodes are registered through the session so the render index and pick surfaces
//! stay in step. Pointer events run the hit resolver; strategy edits mark areas dirty in a
//! debounced render queue that the presentation layer drains with
//! [`AnnotationSession::poll_render`].

use std::time::Instant;

use floorplan_model::{
    DEFAULT_FLOOR_NR, FloorAreaKey, FloorNr, ModelTree, NodeId, PlanId, Walker, global_footprint,
};
use kurbo::{Point, Vec2};
use tracing::{debug, info, trace};

use crate::classification::{ClassificationCache, TypeFallback};
use crate::error::{Error, Result};
use crate::hit::{HitResolver, HitResponse, Interaction};
use crate::palette::{Palette, Rgba8};
use crate::pick::{Candidate, PickSurfaces, Primitive};
use crate::record::AreaClassificationRecord;
use crate::render_index::{DomainObject, HandleAllocator, RenderHandle, RenderIndex};
use crate::scheduler::{Debouncer, SchedulerConfig};
use crate::strategy::{
    Change, ChangeTopics, EditContext, InteractionStrategy, StrategyOutcome, View,
};
use crate::units::{UnitAssignment, UnitAssignments};

/// Session settings.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InteractConfig {
    /// Floor used for keys of nodes without a floor number.
    pub default_floor_nr: FloorNr,
    /// Whether display types may fall back to raw model tags.
    pub type_fallback: TypeFallback,
    /// Debounce settings for re-render and pick rebuilds.
    pub scheduler: SchedulerConfig,
}

impl Default for InteractConfig {
    fn default() -> Self {
        Self {
            default_floor_nr: DEFAULT_FLOOR_NR,
            type_fallback: TypeFallback::default(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

/// Identifies one load attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    plan_id: PlanId,
    generation: u64,
}

impl LoadTicket {
    /// Plan being loaded.
    pub fn plan_id(&self) -> &PlanId {
        &self.plan_id
    }

    /// Sequence number of the attempt.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of committing a load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome<T> {
    /// The load was current; here is its result.
    Committed(T),
    /// A newer load started, or the plan is no longer active.
    Discarded,
}

/// Guards against committing superseded loads.
#[derive(Clone, Debug, Default)]
pub struct LoadSession {
    active: Option<PlanId>,
    generation: u64,
}

impl LoadSession {
    /// Create a session with no active plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan currently being shown or loaded.
    pub fn active_plan(&self) -> Option<&PlanId> {
        self.active.as_ref()
    }

    /// Start loading `plan_id`, superseding every earlier ticket.
    pub fn begin(&mut self, plan_id: PlanId) -> LoadTicket {
        self.generation += 1;
        debug!(plan = %plan_id, generation = self.generation, "load started");
        self.active = Some(plan_id.clone());
        LoadTicket {
            plan_id,
            generation: self.generation,
        }
    }

    /// Whether `ticket` is the newest load of the active plan.
    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation && self.active.as_ref() == Some(&ticket.plan_id)
    }

    /// Hand back `value` if `ticket` is current, otherwise drop it.
    pub fn commit<T>(&self, ticket: &LoadTicket, value: T) -> LoadOutcome<T> {
        if self.is_current(ticket) {
            info!(plan = %ticket.plan_id, generation = ticket.generation, "load committed");
            LoadOutcome::Committed(value)
        } else {
            info!(plan = %ticket.plan_id, generation = ticket.generation, "stale load discarded");
            LoadOutcome::Discarded
        }
    }

    /// Leave the current plan; pending loads will be discarded.
    pub fn deactivate(&mut self) {
        self.active = None;
    }
}

/// Indexed data of one plan load.
#[derive(Clone, Debug)]
pub struct LoadedPlan {
    /// The model.
    pub tree: ModelTree,
    /// Classification cache resolved against `tree`.
    pub cache: ClassificationCache,
    /// Unit assignments validated against `cache`.
    pub units: UnitAssignments,
}

impl LoadedPlan {
    /// Index fetched data. Fails on the first unresolvable record or unknown unit area.
    ///
    /// `floor_nr`, when known, is attached to every node before indexing.
    pub fn build(
        plan_id: PlanId,
        mut tree: ModelTree,
        records: impl IntoIterator<Item = AreaClassificationRecord>,
        assignments: impl IntoIterator<Item = UnitAssignment>,
        floor_nr: Option<FloorNr>,
        config: &InteractConfig,
    ) -> Result<Self> {
        if let Some(nr) = floor_nr {
            tree.assign_floor(nr);
        }
        let cache = ClassificationCache::load_on_floor(plan_id, &tree, records, config.default_floor_nr)?;
        let units = UnitAssignments::load(assignments, &cache)?;
        Ok(Self { tree, cache, units })
    }

    /// Decode and index the JSON payloads of the model, classification and unit services.
    pub fn from_json(
        plan_id: PlanId,
        model: &str,
        records: &str,
        assignments: &str,
        floor_nr: Option<FloorNr>,
        config: &InteractConfig,
    ) -> Result<Self> {
        let tree = ModelTree::from_json_str(model)?;
        let records: Vec<AreaClassificationRecord> =
            serde_json::from_str(records).map_err(|e| Error::Model(e.into()))?;
        let assignments: Vec<UnitAssignment> =
            serde_json::from_str(assignments).map_err(|e| Error::Model(e.into()))?;
        Self::build(plan_id, tree, records, assignments, floor_nr, config)
    }
}

/// A loaded plan wired to an interaction strategy.
#[derive(Debug)]
pub struct AnnotationSession<S> {
    config: InteractConfig,
    tree: ModelTree,
    cache: ClassificationCache,
    units: UnitAssignments,
    index: RenderIndex,
    surfaces: PickSurfaces,
    handles: HandleAllocator,
    errors_registered: usize,
    hit: HitResolver,
    render: Debouncer<FloorAreaKey>,
    pick_rebuild: Debouncer<()>,
    palette: Palette,
    strategy: S,
}

impl<S: InteractionStrategy> AnnotationSession<S> {
    /// Wire `plan` to `strategy`. Nothing is registered yet; see
    /// [`register_all`](Self::register_all).
    pub fn new(plan: LoadedPlan, strategy: S, config: InteractConfig) -> Self {
        Self {
            config,
            tree: plan.tree,
            cache: plan.cache,
            units: plan.units,
            index: RenderIndex::new(),
            surfaces: PickSurfaces::new(),
            handles: HandleAllocator::new(),
            errors_registered: 0,
            hit: HitResolver::new(),
            render: Debouncer::new(config.scheduler),
            pick_rebuild: Debouncer::new(config.scheduler),
            palette: Palette::default(),
            strategy,
        }
    }

    /// Use `palette` for colouring.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Swap in a freshly loaded plan. Registrations and pending work are dropped.
    pub fn replace_plan(&mut self, plan: LoadedPlan) {
        self.tree = plan.tree;
        self.cache = plan.cache;
        self.units = plan.units;
        self.reset_render_state();
        self.hit.reset();
        self.render.cancel();
        self.pick_rebuild.cancel();
    }

    fn reset_render_state(&mut self) {
        self.index = RenderIndex::new();
        self.surfaces = PickSurfaces::new();
        self.errors_registered = 0;
    }

    /// Session settings.
    pub fn config(&self) -> &InteractConfig {
        &self.config
    }

    /// Plan being annotated.
    pub fn plan_id(&self) -> &PlanId {
        self.cache.plan_id()
    }

    /// Loaded model.
    pub fn tree(&self) -> &ModelTree {
        &self.tree
    }

    /// Classification cache.
    pub fn cache(&self) -> &ClassificationCache {
        &self.cache
    }

    /// Unit assignments.
    pub fn units(&self) -> &UnitAssignments {
        &self.units
    }

    /// Render index.
    pub fn index(&self) -> &RenderIndex {
        &self.index
    }

    /// Pick surfaces.
    pub fn surfaces(&self) -> &PickSurfaces {
        &self.surfaces
    }

    /// Active strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Active strategy, mutably (e.g. to change a brush).
    pub fn strategy_mut(&mut self) -> &mut S {
        &mut self.strategy
    }

    /// Currently highlighted render node.
    pub fn highlighted(&self) -> Option<RenderHandle> {
        self.hit.highlighted()
    }

    fn view(&self) -> View<'_> {
        View {
            tree: &self.tree,
            cache: &self.cache,
            units: &self.units,
            palette: &self.palette,
            fallback: self.config.type_fallback,
        }
    }

    /// Area key of a node.
    ///
    /// Classified nodes use the key the cache resolved for them. Other nodes use their
    /// area id on their floor, or on the configured default floor.
    pub fn key_for_node(&self, node: NodeId) -> Option<FloorAreaKey> {
        if let Some(key) = self.cache.key_for_node(node) {
            return Some(key.clone());
        }
        let n = self.tree.get(node)?;
        let area_id = n.area_id()?.clone();
        Some(FloorAreaKey::new(
            n.floor_nr().unwrap_or(self.config.default_floor_nr),
            area_id,
        ))
    }

    fn register_fill(&mut self, node: NodeId, offset: Vec2, unit: bool) -> Option<RenderHandle> {
        let key = self.key_for_node(node)?;
        let footprint = self.tree.get(node).and_then(|n| global_footprint(n, offset))?;
        if footprint.is_degenerate() {
            trace!(node = node.index(), "degenerate area not registered");
            return None;
        }
        let object = if unit {
            DomainObject::Unit {
                apartment_no: self.units.unit_of(&key).map(|u| u.apartment_no),
                key,
                node,
            }
        } else {
            DomainObject::Area { key, node }
        };
        let handle = self.handles.alloc();
        self.surfaces.push(handle, Primitive::Fill, footprint);
        self.index.register(handle, object);
        Some(handle)
    }

    /// Register the fill of an area node at its effective `offset`, as reported by
    /// [`walk`](floorplan_model::walk).
    ///
    /// Returns `None` for nodes without an area id and for degenerate footprints.
    pub fn register_area(&mut self, node: NodeId, offset: Vec2) -> Option<RenderHandle> {
        self.register_fill(node, offset, false)
    }

    /// Register the fill of an area drawn as part of its unit.
    pub fn register_unit(&mut self, node: NodeId, offset: Vec2) -> Option<RenderHandle> {
        self.register_fill(node, offset, true)
    }

    /// Register one marker per validation error on `node`.
    ///
    /// Markers are indexed for rendering lookups but are not pickable.
    pub fn register_error(&mut self, node: NodeId) -> Vec<RenderHandle> {
        let count = self.tree.get(node).map_or(0, |n| n.errors().len());
        (0..count)
            .map(|_| {
                let handle = self.handles.alloc();
                let index = self.errors_registered;
                self.errors_registered += 1;
                self.index.register(handle, DomainObject::Error { index, node });
                handle
            })
            .collect()
    }

    /// Rebuild the render index and pick surfaces for the whole model.
    ///
    /// Areas that belong to a unit are registered as unit fills. Returns the number of
    /// registered handles.
    ///
    /// Handles are never reused, so a node highlighted before the rebuild stays
    /// [`highlighted`](Self::highlighted) under its old handle until the next pointer event
    /// unhighlights it.
    pub fn register_all(&mut self) -> usize {
        self.reset_render_state();
        let visits: Vec<(NodeId, Vec2, bool, bool)> =
            Walker::new(&self.tree, self.tree.root(), Vec2::ZERO)
                .map(|(n, offset)| (n.id(), offset, n.is_area(), !n.errors().is_empty()))
                .collect();
        for (node, offset, is_area, has_errors) in visits {
            if is_area {
                let in_unit = self
                    .key_for_node(node)
                    .is_some_and(|k| self.units.unit_of(&k).is_some());
                self.register_fill(node, offset, in_unit);
            }
            if has_errors {
                self.register_error(node);
            }
        }
        debug!(
            handles = self.index.len(),
            surfaces = self.surfaces.len(),
            "render index rebuilt"
        );
        self.index.len()
    }

    /// Resolve a pointer event at `point` (plan coordinates).
    pub fn handle_pointer(&mut self, point: Point, interaction: Interaction, now: Instant) -> Result<HitResponse> {
        let candidates = self.surfaces.candidates_at(point);
        self.handle_candidates(&candidates, interaction, now)
    }

    /// Resolve a pointer event from externally computed candidates (farthest first).
    pub fn handle_candidates(
        &mut self,
        candidates: &[Candidate],
        interaction: Interaction,
        now: Instant,
    ) -> Result<HitResponse> {
        let mut ctx = EditContext {
            tree: &self.tree,
            cache: &mut self.cache,
            units: &mut self.units,
            palette: &self.palette,
            fallback: self.config.type_fallback,
        };
        let response = self.hit.resolve(
            candidates,
            interaction,
            &self.index,
            &self.surfaces,
            &mut self.strategy,
            &mut ctx,
        )?;
        self.schedule(&response.outcome, now);
        Ok(response)
    }

    /// Run a strategy operation that is not tied to a pointer event, such as
    /// [`SplittingMode::split`](crate::SplittingMode::split).
    pub fn edit(
        &mut self,
        now: Instant,
        f: impl FnOnce(&mut S, &mut EditContext<'_>) -> Result<StrategyOutcome>,
    ) -> Result<StrategyOutcome> {
        let mut ctx = EditContext {
            tree: &self.tree,
            cache: &mut self.cache,
            units: &mut self.units,
            palette: &self.palette,
            fallback: self.config.type_fallback,
        };
        let outcome = f(&mut self.strategy, &mut ctx)?;
        self.schedule(&outcome, now);
        Ok(outcome)
    }

    fn schedule(&mut self, outcome: &StrategyOutcome, now: Instant) {
        self.render.request_all_at(outcome.dirty.iter().cloned(), now);
        // Unit edits turn area fills into unit fills and back.
        if matches!(outcome.change, Some(Change::Units(_))) {
            self.pick_rebuild.request_at((), now);
        }
    }

    /// Tell the strategy that data changed elsewhere. Unsubscribed topics are ignored.
    pub fn notify_external_change(&mut self, topics: ChangeTopics, now: Instant) {
        let relevant = topics & self.strategy.subscriptions();
        if relevant.is_empty() {
            return;
        }
        let mut ctx = EditContext {
            tree: &self.tree,
            cache: &mut self.cache,
            units: &mut self.units,
            palette: &self.palette,
            fallback: self.config.type_fallback,
        };
        let dirty = self.strategy.on_external_change(relevant, &mut ctx);
        self.render.request_all_at(dirty, now);
    }

    /// Request a pick-surface rebuild after a structural change.
    pub fn request_pick_rebuild(&mut self, now: Instant) {
        self.pick_rebuild.request_at((), now);
    }

    /// Areas to redraw, once the render queue has been quiet long enough.
    pub fn poll_render(&mut self, now: Instant) -> Option<Vec<FloorAreaKey>> {
        self.render.tick_at(now)
    }

    /// Rebuild pick surfaces if a rebuild is due. Returns whether one ran.
    pub fn poll_pick_rebuild(&mut self, now: Instant) -> bool {
        if self.pick_rebuild.tick_at(now).is_none() {
            return false;
        }
        self.register_all();
        true
    }

    /// Fill colour of the area at `key`.
    pub fn color_for(&self, key: &FloorAreaKey) -> Option<Rgba8> {
        let node = self.tree.get(self.cache.node_for_key(key)?)?;
        Some(self.strategy.color_for(node, key, self.view()))
    }

    /// Fill colour of an area node, whether classified or not.
    pub fn color_for_node(&self, node: NodeId) -> Option<Rgba8> {
        let key = self.key_for_node(node)?;
        let n = self.tree.get(node)?;
        Some(self.strategy.color_for(n, &key, self.view()))
    }
}
