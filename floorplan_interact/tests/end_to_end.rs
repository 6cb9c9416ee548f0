// Copyright 2025 the Floorplan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Load → index → pointer scenarios over small hand-written plans.

use std::time::{Duration, Instant};

use floorplan_geometry::Footprint;
use floorplan_interact::{
    AnnotationSession, AreaClassificationRecord, AreaType, Candidate, ClassificationCache,
    ClassificationMode, DomainGroup, HitEffect, InteractConfig, Interaction, LoadedPlan, Primitive,
    RenderHandle,
};
use floorplan_model::{DEFAULT_FLOOR_NR, FloorAreaKey, ModelTree};
use kurbo::Point;

// Square A centred on (0,0), 2x2; square B centred on (5,5), 1x1. One floor, no overlap.
const TWO_SQUARES: &str = r#"{
    "type": "floor",
    "children": [
        {"type": "area", "id": "A", "position": {"x": 0, "y": 0},
         "footprint": {"type": "Polygon", "coordinates": [[[-1,-1],[1,-1],[1,1],[-1,1]]]}},
        {"type": "wall", "footprint": {"type": "Polygon", "coordinates": [[[2,2],[3,2],[3,3],[2,3]]]}},
        {"type": "area", "id": "B", "position": {"x": 5, "y": 5},
         "footprint": {"type": "Polygon", "coordinates": [[[-0.5,-0.5],[0.5,-0.5],[0.5,0.5],[-0.5,0.5]]]}}
    ]
}"#;

const RECORDS: &str = r#"[
    {"id": 1, "area_type": null, "coord_x": 0, "coord_y": 0},
    {"id": 2, "area_type": "BATH", "coord_x": 5, "coord_y": 5}
]"#;

// A 2x2 room with a 1x1 closet drawn on top of it, both area-kind.
const NESTED: &str = r#"{
    "type": "floor",
    "children": [
        {"type": "area", "id": "room",
         "footprint": {"type": "Polygon", "coordinates": [[[0,0],[2,0],[2,2],[0,2]]]}},
        {"type": "area", "id": "closet",
         "footprint": {"type": "Polygon", "coordinates": [[[0.5,0.5],[1.5,0.5],[1.5,1.5],[0.5,1.5]]]}}
    ]
}"#;

// The same two squares without area ids: records name the areas.
const ANONYMOUS_SQUARES: &str = r#"{
    "type": "floor",
    "children": [
        {"type": "area", "position": {"x": 0, "y": 0},
         "footprint": {"type": "Polygon", "coordinates": [[[-1,-1],[1,-1],[1,1],[-1,1]]]}},
        {"type": "area", "position": {"x": 5, "y": 5},
         "footprint": {"type": "Polygon", "coordinates": [[[-0.5,-0.5],[0.5,-0.5],[0.5,0.5],[-0.5,0.5]]]}}
    ]
}"#;

fn session(model: &str, records: &str) -> AnnotationSession<ClassificationMode> {
    let config = InteractConfig::default();
    let plan = LoadedPlan::from_json("plan".into(), model, records, "[]", None, &config).unwrap();
    let mut s = AnnotationSession::new(plan, ClassificationMode::new(AreaType::new("ROOM")), config);
    s.register_all();
    s
}

fn key(id: &str) -> FloorAreaKey {
    FloorAreaKey::new(DEFAULT_FLOOR_NR, id)
}

#[test]
fn records_map_to_their_squares() {
    let tree = ModelTree::from_json_str(TWO_SQUARES).unwrap();
    let records: Vec<AreaClassificationRecord> = serde_json::from_str(RECORDS).unwrap();
    let cache = ClassificationCache::load("plan".into(), &tree, records).unwrap();

    let a = cache.node_for_record(&"1".into()).unwrap();
    let b = cache.node_for_record(&"2".into()).unwrap();
    let node_a = tree.get(a).unwrap();
    let node_b = tree.get(b).unwrap();
    assert_eq!(node_a.area_id().map(|id| id.as_str()), Some("A"));
    assert_eq!(node_b.area_id().map(|id| id.as_str()), Some("B"));
    assert_eq!(node_a.footprint().map(Footprint::area), Some(4.0));
    assert_eq!(node_b.footprint().map(Footprint::area), Some(1.0));
    assert_eq!(cache.area_type(&key("B")).map(AreaType::as_str), Some("BATH"));
}

#[test]
fn unresolvable_record_fails_the_whole_load() {
    let config = InteractConfig::default();
    let records = r#"[
        {"id": 1, "coord_x": 0, "coord_y": 0},
        {"id": 3, "coord_x": 2.5, "coord_y": 2.5}
    ]"#;
    let err = LoadedPlan::from_json("plan".into(), TWO_SQUARES, records, "[]", None, &config)
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("record 3"), "{msg}");
}

#[test]
fn every_area_is_registered_and_pickable() {
    let s = session(TWO_SQUARES, RECORDS);
    assert_eq!(s.index().len(), 2);
    assert_eq!(s.surfaces().len(), 2);
    let h = s.index().handle_for_key(&key("A")).unwrap();
    assert_eq!(s.index().entry(h).map(|e| e.group), Some(DomainGroup::Area));
    // Pointer over the wall only: walls are not registered.
    assert!(s.surfaces().candidates_at(Point::new(2.5, 2.5)).is_empty());
}

#[test]
fn hover_moves_and_clears_highlight() {
    let mut s = session(TWO_SQUARES, RECORDS);
    let t0 = Instant::now();
    let ha = s.index().handle_for_key(&key("A")).unwrap();
    let hb = s.index().handle_for_key(&key("B")).unwrap();

    let r = s.handle_pointer(Point::new(0.1, 0.1), Interaction::Hover, t0).unwrap();
    assert!(matches!(r.effects.as_slice(), [HitEffect::Highlight { handle, .. }] if *handle == ha));
    // Same target again: nothing to do.
    let r = s.handle_pointer(Point::new(0.2, 0.1), Interaction::Hover, t0).unwrap();
    assert!(r.effects.is_empty());

    let r = s.handle_pointer(Point::new(5.0, 5.0), Interaction::Hover, t0).unwrap();
    assert_eq!(r.effects[0], HitEffect::Unhighlight(ha));
    assert!(matches!(r.effects[1], HitEffect::Highlight { handle, .. } if handle == hb));
    assert_eq!(s.highlighted(), Some(hb));

    let r = s.handle_pointer(Point::new(20.0, 20.0), Interaction::Hover, t0).unwrap();
    assert_eq!(r.effects, vec![HitEffect::Unhighlight(hb)]);
    assert_eq!(s.highlighted(), None);
}

#[test]
fn click_classifies_and_schedules_one_redraw() {
    let mut s = session(TWO_SQUARES, RECORDS);
    let t0 = Instant::now();
    s.handle_pointer(Point::new(0.5, 0.5), Interaction::Click, t0).unwrap();
    s.handle_pointer(Point::new(0.6, 0.5), Interaction::Click, t0 + Duration::from_millis(10))
        .unwrap();
    assert_eq!(s.cache().area_type(&key("A")).map(AreaType::as_str), Some("ROOM"));

    assert_eq!(s.poll_render(t0 + Duration::from_millis(20)), None);
    assert_eq!(
        s.poll_render(t0 + Duration::from_secs(1)),
        Some(vec![key("A")])
    );
    assert_eq!(s.poll_render(t0 + Duration::from_secs(2)), None);
}

#[test]
fn click_on_nothing_restores_default() {
    let mut s = session(TWO_SQUARES, RECORDS);
    let r = s
        .handle_pointer(Point::new(-9.0, 0.0), Interaction::Click, Instant::now())
        .unwrap();
    assert_eq!(r.effects, vec![HitEffect::RestoreDefault]);
    assert!(r.pick.is_none());
    assert!(r.outcome.change.is_none());
}

#[test]
fn nested_closet_wins_the_pick_but_not_the_record() {
    // Batch resolution takes the first area in document order ...
    let records = r#"[{"id": "r", "coord_x": 1, "coord_y": 1}]"#;
    let mut s = session(NESTED, records);
    assert!(s.cache().contains_key(&key("room")));
    assert!(!s.cache().contains_key(&key("closet")));

    // ... while the pointer picks the smaller closet.
    let r = s
        .handle_pointer(Point::new(1.0, 1.0), Interaction::Hover, Instant::now())
        .unwrap();
    let pick = r.pick.unwrap();
    assert_eq!(pick.object.area_key(), Some(&key("closet")));
    assert_eq!(pick.area, 1.0);
}

#[test]
fn tie_break_ignores_candidate_order() {
    let s = session(NESTED, r#"[{"id": "r", "coord_x": 1, "coord_y": 1}]"#);
    let room = s.index().handle_for_key(&key("room")).unwrap();
    let closet = s.index().handle_for_key(&key("closet")).unwrap();
    let fill = |handle: RenderHandle| Candidate {
        handle,
        primitive: Primitive::Fill,
    };
    for order in [[fill(room), fill(closet)], [fill(closet), fill(room)]] {
        let p = floorplan_interact::pick(&order, s.index(), s.surfaces()).unwrap();
        assert_eq!(p.handle, closet);
    }
}

#[test]
fn degenerate_area_is_silently_skipped() {
    let model = r#"{"type": "floor", "children": [
        {"type": "area", "id": "sliver",
         "footprint": {"type": "Polygon", "coordinates": [[[0,0],[4,0]]]}},
        {"type": "area", "id": "ok",
         "footprint": {"type": "Polygon", "coordinates": [[[0,0],[4,0],[4,4],[0,4]]]}}
    ]}"#;
    let s = session(model, r#"[{"id": "ok", "coord_x": 1, "coord_y": 1}]"#);
    assert_eq!(s.surfaces().len(), 1);
    assert_eq!(s.index().len(), 1);
}

#[test]
fn areas_without_ids_are_registered_under_record_keys() {
    let mut s = session(ANONYMOUS_SQUARES, RECORDS);
    assert_eq!(s.cache().len(), 2);
    assert_eq!(s.index().len(), 2);
    let h1 = s.index().handle_for_key(&key("1")).unwrap();
    let node = s.cache().node_for_key(&key("1")).unwrap();
    assert_eq!(s.key_for_node(node), Some(key("1")));

    let t0 = Instant::now();
    let r = s.handle_pointer(Point::new(0.1, 0.1), Interaction::Click, t0).unwrap();
    assert_eq!(r.pick.map(|p| p.handle), Some(h1));
    assert_eq!(s.cache().area_type(&key("1")).map(AreaType::as_str), Some("ROOM"));
    assert!(s.color_for(&key("1")).is_some());
    assert!(s.color_for_node(node).is_some());
    assert_eq!(s.poll_render(t0 + Duration::from_secs(1)), Some(vec![key("1")]));
}
