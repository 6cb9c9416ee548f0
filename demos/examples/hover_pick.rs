// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover and click over overlapping areas while linking rooms into an apartment.
//!
//! A closet overlaps a larger room and is drawn beneath it. Pointer picks prefer the
//! smaller area regardless of draw order, so the closet wins wherever the two overlap.
//!
//! Run:
//! - `cargo run -p floorplan_demos --example hover_pick`

use std::time::{Duration, Instant};

use floorplan_interact::{
    AnnotationSession, Change, HitEffect, InteractConfig, Interaction, LinkingMode, LoadedPlan,
};
use kurbo::Point;
use tracing_subscriber::EnvFilter;

const MODEL: &str = r#"{
    "type": "floor",
    "children": [
        {"type": "area", "id": "closet", "position": {"x": 4, "y": 0},
         "footprint": {"type": "Polygon", "coordinates": [[[0,0],[2,0],[2,2],[0,2]]]}},
        {"type": "area", "id": "room",
         "footprint": {"type": "Polygon", "coordinates": [[[0,0],[6,0],[6,4],[0,4]]]}},
        {"type": "area", "id": "hall", "position": {"x": 7, "y": 0},
         "footprint": {"type": "Polygon", "coordinates": [[[0,0],[2,0],[2,4],[0,4]]]}}
    ]
}"#;

const RECORDS: &str = r#"[
    {"id": "room", "area_type": "BEDROOM", "coord_x": 1, "coord_y": 1},
    {"id": "closet", "area_type": "STORAGE", "coord_x": 5, "coord_y": 1},
    {"id": "hall", "area_type": "CORRIDOR", "coord_x": 8, "coord_y": 2}
]"#;

fn describe(effects: &[HitEffect]) -> String {
    if effects.is_empty() {
        return "unchanged".into();
    }
    effects
        .iter()
        .map(|e| match e {
            HitEffect::Highlight { handle, flags } => format!("highlight #{} {flags:?}", handle.get()),
            HitEffect::Unhighlight(h) => format!("unhighlight #{}", h.get()),
            HitEffect::Select(h) => format!("select #{}", h.get()),
            HitEffect::RestoreDefault => "restore".into(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = InteractConfig::default();
    let plan = LoadedPlan::from_json("hover".into(), MODEL, RECORDS, "[]", None, &config)?;
    let mut session = AnnotationSession::new(plan, LinkingMode::new(1, 3), config);
    session.register_all();

    let t0 = Instant::now();
    let path = [
        Point::new(1.0, 1.0),
        Point::new(2.0, 1.0),
        Point::new(5.0, 1.0),
        Point::new(8.0, 2.0),
        Point::new(20.0, 2.0),
    ];
    for p in path {
        let r = session.handle_pointer(p, Interaction::Hover, t0)?;
        let over = r
            .pick
            .as_ref()
            .and_then(|pick| pick.object.area_key())
            .map_or_else(|| "nothing".to_owned(), ToString::to_string);
        println!("hover ({}, {}) over {over}: {}", p.x, p.y, describe(&r.effects));
    }

    for p in [Point::new(1.0, 3.0), Point::new(5.0, 1.0)] {
        let r = session.handle_pointer(p, Interaction::Click, t0)?;
        if let Some(Change::Units(units)) = r.outcome.change {
            for u in units {
                let areas: Vec<String> = u.area_ids.iter().map(ToString::to_string).collect();
                println!("unit {:?} now holds [{}]", u.apartment_no, areas.join(", "));
            }
        }
    }

    let settled = t0 + Duration::from_secs(1);
    if session.poll_pick_rebuild(settled) {
        println!("pick surfaces rebuilt: {} fills", session.surfaces().len());
    }
    for key in session.poll_render(settled).unwrap_or_default() {
        println!("redraw {key} in {:?}", session.color_for(&key));
    }
    Ok(())
}
