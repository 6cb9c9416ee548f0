// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer hit resolution with smallest-area tie-breaking.
//!
//! ## Policy
//!
//! Candidates arrive ordered farthest first and nearest last. Only fill primitives whose
//! handle resolves to an area or unit object are eligible. Walking from farthest to nearest,
//! a candidate becomes the pick when it is the first eligible one or when its measured area
//! is strictly smaller than the current pick's. For fully overlapping stacks the smallest
//! area wins regardless of draw order, so inset annotations stay selectable.
//!
//! Equal areas keep the farther candidate.
//!
//! ## Effects
//!
//! The resolver does not draw. It returns [`HitEffect`]s describing highlight and selection
//! changes, and forwards clicks to the session's [`InteractionStrategy`].

use tracing::{debug, trace};

use crate::error::Result;
use crate::pick::{Candidate, MeasureArea, Primitive};
use crate::render_index::{DomainGroup, DomainObject, RenderHandle, RenderIndex};
use crate::strategy::{EditContext, HighlightFlags, InteractionStrategy, StrategyOutcome};

/// Kind of pointer interaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Interaction {
    /// Pointer moved.
    Hover,
    /// Pointer clicked.
    Click,
}

/// The candidate chosen by the tie-break.
#[derive(Clone, Debug, PartialEq)]
pub struct Pick {
    /// Picked handle.
    pub handle: RenderHandle,
    /// Domain object behind it.
    pub object: DomainObject,
    /// Measured area in plan units.
    pub area: f64,
}

/// Presentation change requested by the resolver.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HitEffect {
    /// Draw `handle` highlighted.
    Highlight {
        /// Node to highlight.
        handle: RenderHandle,
        /// Highlight style.
        flags: HighlightFlags,
    },
    /// Restore `handle` to its normal appearance.
    Unhighlight(RenderHandle),
    /// Mark `handle` as selected.
    Select(RenderHandle),
    /// Return every node to its unselected appearance.
    RestoreDefault,
}

/// Outcome of one pointer event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HitResponse {
    /// Picked candidate.
    pub pick: Option<Pick>,
    /// Presentation changes, in order.
    pub effects: Vec<HitEffect>,
    /// Strategy result for clicks.
    pub outcome: StrategyOutcome,
}

/// Choose the smallest eligible candidate.
pub fn pick(candidates: &[Candidate], index: &RenderIndex, measure: &impl MeasureArea) -> Option<Pick> {
    let mut best: Option<Pick> = None;
    for c in candidates.iter().filter(|c| c.primitive == Primitive::Fill) {
        let Some(entry) = index.entry(c.handle) else {
            continue;
        };
        if !matches!(entry.group, DomainGroup::Area | DomainGroup::Unit) {
            continue;
        }
        let Some(area) = measure.area_of(c.handle) else {
            trace!(handle = c.handle.get(), "candidate has no measurable area");
            continue;
        };
        if best.as_ref().is_none_or(|b| area < b.area) {
            best = Some(Pick {
                handle: c.handle,
                object: entry.object.clone(),
                area,
            });
        }
    }
    best
}

/// Tracks the highlighted node across pointer events.
#[derive(Clone, Debug, Default)]
pub struct HitResolver {
    highlighted: Option<RenderHandle>,
}

impl HitResolver {
    /// Create a resolver with nothing highlighted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently highlighted node.
    pub fn highlighted(&self) -> Option<RenderHandle> {
        self.highlighted
    }

    /// Forget the highlight, e.g. when a new plan replaces the rendered one.
    pub fn reset(&mut self) {
        self.highlighted = None;
    }

    /// Resolve one pointer event and apply it.
    ///
    /// Hover moves the highlight to the pick, restoring the previous target, or clears it
    /// when nothing is eligible. Click forwards the pick to `strategy`, or restores the
    /// default appearance when nothing is eligible.
    pub fn resolve<S: InteractionStrategy + ?Sized>(
        &mut self,
        candidates: &[Candidate],
        interaction: Interaction,
        index: &RenderIndex,
        measure: &impl MeasureArea,
        strategy: &mut S,
        ctx: &mut EditContext<'_>,
    ) -> Result<HitResponse> {
        let picked = pick(candidates, index, measure);
        let mut response = HitResponse::default();
        match (interaction, &picked) {
            (Interaction::Hover, Some(p)) => {
                if self.highlighted != Some(p.handle) {
                    if let Some(prev) = self.highlighted.take() {
                        response.effects.push(HitEffect::Unhighlight(prev));
                    }
                    let flags = strategy.on_hover(&p.object, ctx.view());
                    response.effects.push(HitEffect::Highlight {
                        handle: p.handle,
                        flags,
                    });
                    self.highlighted = Some(p.handle);
                }
            }
            (Interaction::Hover, None) => {
                if let Some(prev) = self.highlighted.take() {
                    response.effects.push(HitEffect::Unhighlight(prev));
                }
            }
            (Interaction::Click, Some(p)) => {
                debug!(mode = strategy.name(), handle = p.handle.get(), area = p.area, "click");
                response.effects.push(HitEffect::Select(p.handle));
                response.outcome = strategy.on_click(&p.object, ctx)?;
            }
            (Interaction::Click, None) => {
                response.effects.push(HitEffect::RestoreDefault);
                response.outcome.dirty = strategy.on_clear();
            }
        }
        response.pick = picked;
        Ok(response)
    }
}
