// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Floorplan Interact: classification, render bookkeeping, and pointer interaction.
//!
//! This crate sits between a loaded [`ModelTree`](floorplan_model::ModelTree) and the
//! presentation layer:
//!
//! - [`ClassificationCache`]: classification records resolved onto areas, keyed by
//!   [`FloorAreaKey`](floorplan_model::FloorAreaKey) and by record id.
//! - [`UnitAssignments`]: which areas form which apartment.
//! - [`RenderIndex`]: opaque [`RenderHandle`]s ↔ domain objects, in both directions.
//! - [`PickSurfaces`] and [`HitResolver`]: pointer candidates and the smallest-area pick.
//! - [`InteractionStrategy`]: what a click or hover means in the current editing mode.
//! - [`Debouncer`]: coalesced re-render requests driven by explicit instants.
//! - [`AnnotationSession`] and [`LoadSession`]: the pieces wired together, with stale-load
//!   protection.
//!
//! Everything is single-threaded and synchronous. Fetching and drawing stay outside; this
//! crate exchanges plain values with them.
//!
//! ## Example
//!
//! ```
//! use std::time::{Duration, Instant};
//!
//! use floorplan_interact::{
//!     AnnotationSession, AreaType, ClassificationMode, InteractConfig, Interaction, LoadOutcome,
//!     LoadSession, LoadedPlan,
//! };
//! use kurbo::Point;
//!
//! let model = r#"{"type": "floor", "children": [
//!     {"type": "area", "id": "kitchen", "position": {"x": 0, "y": 0},
//!      "footprint": {"type": "Polygon", "coordinates": [[[-1,-1],[1,-1],[1,1],[-1,1]]]}}
//! ]}"#;
//! let records = r#"[{"id": "kitchen", "area_type": null, "coord_x": 0, "coord_y": 0}]"#;
//!
//! let config = InteractConfig::default();
//! let mut loads = LoadSession::new();
//! let ticket = loads.begin("plan-7".into());
//! let plan = LoadedPlan::from_json("plan-7".into(), model, records, "[]", None, &config)?;
//! let LoadOutcome::Committed(plan) = loads.commit(&ticket, plan) else {
//!     unreachable!("no newer load was started");
//! };
//!
//! let mut session = AnnotationSession::new(plan, ClassificationMode::new(AreaType::new("KITCHEN")), config);
//! session.register_all();
//!
//! let t0 = Instant::now();
//! let response = session.handle_pointer(Point::new(0.2, 0.3), Interaction::Click, t0)?;
//! assert!(response.pick.is_some());
//! let dirty = session.poll_render(t0 + Duration::from_secs(1)).unwrap_or_default();
//! assert_eq!(dirty.len(), 1);
//! # Ok::<(), floorplan_interact::Error>(())
//! ```

mod classification;
mod error;
mod hit;
mod palette;
mod pick;
mod record;
mod render_index;
mod scheduler;
mod session;
mod strategy;
mod units;

pub use classification::{ClassificationCache, TypeFallback};
pub use error::{Error, Result};
pub use hit::{HitEffect, HitResolver, HitResponse, Interaction, Pick, pick};
pub use palette::{Palette, Rgba8};
pub use pick::{Candidate, MeasureArea, PickSurfaces, Primitive};
pub use record::{AreaClassificationRecord, AreaType, AreaTypeChange, RecordId, ScaleChange};
pub use render_index::{
    DomainGroup, DomainObject, HandleAllocator, IndexEntry, RenderHandle, RenderIndex,
};
pub use scheduler::{Debouncer, SchedulerConfig};
pub use session::{
    AnnotationSession, InteractConfig, LoadOutcome, LoadSession, LoadTicket, LoadedPlan,
};
pub use strategy::{
    Change, ChangeTopics, ClassificationMode, EditContext, HighlightFlags, InteractionStrategy,
    LinkingMode, ScalingMode, SplittingMode, StrategyOutcome, ValidationMode, View,
};
pub use units::{ApartmentNo, UnitAssignment, UnitAssignments, UnitKey};
