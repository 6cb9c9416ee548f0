// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::time::Instant;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use floorplan_interact::{
    AnnotationSession, AreaType, ClassificationMode, InteractConfig, Interaction, LoadedPlan,
    pick,
};
use floorplan_model::{ModelTree, find_area_by_point};
use kurbo::Point;
use serde_json::{Value, json};

const CELL: f64 = 4.0;

/// `n * n` square rooms, each nested in its own group node so offsets accumulate.
fn gen_grid_model(n: usize) -> Value {
    let mut groups = Vec::with_capacity(n);
    for y in 0..n {
        let mut rooms = Vec::with_capacity(n);
        for x in 0..n {
            rooms.push(json!({
                "type": "area",
                "id": format!("{x}-{y}"),
                "position": {"x": x as f64 * CELL, "y": 0},
                "footprint": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [CELL, 0], [CELL, CELL], [0, CELL]]]
                }
            }));
        }
        groups.push(json!({
            "type": "space",
            "position": {"x": 0, "y": y as f64 * CELL},
            "children": rooms
        }));
    }
    json!({"type": "floor", "children": groups})
}

fn gen_records(n: usize) -> Value {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let c = centre(x, y);
            out.push(json!({"id": format!("{x}-{y}"), "coord_x": c.x, "coord_y": c.y}));
        }
    }
    Value::Array(out)
}

fn centre(x: usize, y: usize) -> Point {
    Point::new((x as f64 + 0.5) * CELL, (y as f64 + 0.5) * CELL)
}

fn gen_probes(n: usize) -> Vec<Point> {
    (0..n * n).map(|i| centre(i % n, i / n)).collect()
}

fn bench_find_area(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_area_by_point");
    for &n in &[8_usize, 16, 32] {
        let tree = ModelTree::from_json_str(&gen_grid_model(n).to_string()).unwrap();
        let probes = gen_probes(n);
        group.throughput(Throughput::Elements(probes.len() as u64));
        group.bench_function(format!("grid_{n}x{n}"), |b| {
            b.iter(|| {
                for &p in &probes {
                    black_box(find_area_by_point(&tree, p));
                }
            });
        });
    }
    group.finish();
}

fn loaded(n: usize) -> LoadedPlan {
    LoadedPlan::from_json(
        "bench".into(),
        &gen_grid_model(n).to_string(),
        &gen_records(n).to_string(),
        "[]",
        None,
        &InteractConfig::default(),
    )
    .unwrap()
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_plan");
    for &n in &[8_usize, 16] {
        let model = gen_grid_model(n).to_string();
        let records = gen_records(n).to_string();
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("grid_{n}x{n}"), |b| {
            b.iter(|| {
                black_box(
                    LoadedPlan::from_json(
                        "bench".into(),
                        &model,
                        &records,
                        "[]",
                        None,
                        &InteractConfig::default(),
                    )
                    .unwrap(),
                )
            });
        });
    }
    group.finish();
}

fn bench_pointer(c: &mut Criterion) {
    let mut group = c.benchmark_group("pointer");
    for &n in &[8_usize, 16, 32] {
        let mut session = AnnotationSession::new(
            loaded(n),
            ClassificationMode::new(AreaType::new("ROOM")),
            InteractConfig::default(),
        );
        session.register_all();
        let probes = gen_probes(n);
        group.throughput(Throughput::Elements(probes.len() as u64));

        group.bench_function(format!("candidates_and_pick_{n}x{n}"), |b| {
            b.iter(|| {
                for &p in &probes {
                    let candidates = session.surfaces().candidates_at(p);
                    black_box(pick(&candidates, session.index(), session.surfaces()));
                }
            });
        });

        let t0 = Instant::now();
        group.bench_function(format!("hover_sweep_{n}x{n}"), |b| {
            b.iter(|| {
                for &p in &probes {
                    black_box(session.handle_pointer(p, Interaction::Hover, t0).unwrap());
                }
            });
        });
    }
    group.finish();
}

fn bench_register(c: &mut Criterion) {
    let mut group = c.benchmark_group("register_all");
    for &n in &[8_usize, 16, 32] {
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("grid_{n}x{n}"), |b| {
            b.iter_batched(
                || {
                    AnnotationSession::new(
                        loaded(n),
                        ClassificationMode::new(AreaType::new("ROOM")),
                        InteractConfig::default(),
                    )
                },
                |mut s| black_box(s.register_all()),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_find_area, bench_load, bench_pointer, bench_register);
criterion_main!(benches);
