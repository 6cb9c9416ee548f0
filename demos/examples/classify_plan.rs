// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Load a small generated plan and classify rooms by clicking them.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p floorplan_demos --example classify_plan`

use std::time::{Duration, Instant};

use floorplan_geometry::{DEFAULT_ARC_SEGMENTS, door_swing_arc};
use floorplan_interact::{
    AnnotationSession, AreaType, Change, ClassificationMode, InteractConfig, Interaction,
    LoadOutcome, LoadSession, LoadedPlan,
};
use floorplan_model::find_area_by_point;
use kurbo::Point;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

const COLS: usize = 3;
const ROWS: usize = 2;
const PITCH: f64 = 5.0;

fn room_id(row: usize, col: usize) -> String {
    format!("r{row}{col}")
}

fn centre(row: usize, col: usize) -> Point {
    Point::new(col as f64 * PITCH + 2.0, row as f64 * PITCH + 2.0)
}

fn model() -> Value {
    let mut children = Vec::new();
    for row in 0..ROWS {
        for col in 0..COLS {
            children.push(json!({
                "type": "area",
                "id": room_id(row, col),
                "position": {"x": col as f64 * PITCH, "y": row as f64 * PITCH},
                "footprint": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [4, 0], [4, 4], [0, 4]]]
                }
            }));
        }
    }
    children.push(json!({
        "type": "opening",
        "position": {"x": 4, "y": 1},
        "footprint": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1]]]}
    }));
    json!({"type": "floor", "children": children})
}

fn records() -> Value {
    let mut out = Vec::new();
    for row in 0..ROWS {
        for col in 0..COLS {
            let c = centre(row, col);
            out.push(json!({"id": room_id(row, col), "area_type": null, "coord_x": c.x, "coord_y": c.y}));
        }
    }
    Value::Array(out)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = InteractConfig::default();
    let mut loads = LoadSession::new();
    let ticket = loads.begin("demo".into());
    let plan = LoadedPlan::from_json(
        "demo".into(),
        &model().to_string(),
        &records().to_string(),
        "[]",
        Some(1),
        &config,
    )?;
    let LoadOutcome::Committed(plan) = loads.commit(&ticket, plan) else {
        return Err("load was superseded".into());
    };

    // Batch resolution, the same query the loader ran for every record.
    let probe = centre(1, 2);
    if let Some(node) = find_area_by_point(&plan.tree, probe).and_then(|id| plan.tree.get(id)) {
        println!("({}, {}) lies in {:?}", probe.x, probe.y, node.area_id());
    }

    let mut session = AnnotationSession::new(plan, ClassificationMode::new(AreaType::new("BEDROOM")), config);
    let registered = session.register_all();
    println!("registered {registered} render nodes");

    let t0 = Instant::now();
    let clicks = [(0, 0, "BEDROOM"), (0, 1, "KITCHEN"), (1, 2, "BATH")];
    for (i, (row, col, brush)) in clicks.into_iter().enumerate() {
        session.strategy_mut().set_brush(AreaType::new(brush));
        let at = t0 + Duration::from_millis(10 * i as u64);
        let response = session.handle_pointer(centre(row, col), Interaction::Click, at)?;
        if let Some(Change::AreaType(change)) = response.outcome.change {
            println!("persist {} -> {}", change.record_id, change.area_type);
        }
    }

    // Clicks landed within one quiet period, so they flush as a single redraw.
    let settled = t0 + Duration::from_secs(1);
    for key in session.poll_render(settled).unwrap_or_default() {
        println!("redraw {key} in {:?}", session.color_for(&key));
    }

    let arc = door_swing_arc(
        Point::new(5.0, 1.0),
        Point::new(4.0, 1.0),
        Point::new(4.0, 2.0),
        DEFAULT_ARC_SEGMENTS,
    );
    println!("door swing polyline has {} points", arc.len());
    Ok(())
}
