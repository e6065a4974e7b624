use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use chrono::NaiveDate;
use gantt_timeline::interaction::{DragEngine, DragTarget, PointerCapture, RangeController, ScrollSync};
use gantt_timeline::io::parse_snapshot_json;
use gantt_timeline::layout::dependencies::{dependency_edges, route_connectors};
use gantt_timeline::layout::{compute_layout, BarAnchor, LayoutOptions, ViewMode};
use gantt_timeline::model::{parse_snapshot, InMemoryStore, ItemId, ScheduledItem, TaskStore, ZoomLevel};

const SNAPSHOT: &str = r#"{
    "name": "Release",
    "items": [
        { "id": "T1", "name": "Design", "start": "2024-06-03", "end": "2024-06-07", "owner": "u1" },
        { "id": "T2", "name": "Build", "start": "2024-06-10", "end": "2024-06-12", "predecessors": ["T1"] },
        { "id": "T3", "name": "Review design", "start": "2024-06-04", "end": "2024-06-05", "parent": "T1" },
        { "id": "T4", "name": "Broken", "start": "June", "end": "2024-06-05" }
    ],
    "labels": { "u1": "Alice" }
}"#;

fn d(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

#[derive(Default, Clone)]
struct CountingCapture {
    held: Rc<Cell<i32>>,
}

impl PointerCapture for CountingCapture {
    fn acquire(&mut self) {
        self.held.set(self.held.get() + 1);
    }

    fn release(&mut self) {
        self.held.set(self.held.get() - 1);
    }
}

fn store() -> InMemoryStore {
    let file = parse_snapshot_json(SNAPSHOT).unwrap();
    InMemoryStore::new(file.name.unwrap_or_default(), file.items, file.labels)
}

#[test]
fn test_drag_commit_round_trip_through_store() {
    let mut store = store();
    let parsed = parse_snapshot(&store.items());
    assert_eq!(parsed.items.len(), 3);
    assert_eq!(parsed.excluded.len(), 1);
    assert_eq!(parsed.excluded[0].id, "T4");

    let today = d(1, 1);
    let mut range = RangeController::new(&parsed.items, ZoomLevel::Week, today);
    let viewport = range.viewport();
    assert_eq!((viewport.start, viewport.end), (d(5, 31), d(6, 15)));

    let options = LayoutOptions::default();
    let geometry = compute_layout(&parsed.items, &viewport, None, &options);
    let order: Vec<&str> = geometry.bars.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(order, vec!["T1", "T3", "T2"]);

    // Drag the body of T2 right by 40px at 20px per day.
    let t2 = parsed.items.iter().find(|i| i.id.as_str() == "T2").unwrap();
    let bar = geometry.bar(&t2.id).unwrap();
    let capture = CountingCapture::default();
    let held = capture.held.clone();
    let mut drag = DragEngine::new(capture);

    let x0 = bar.x_start + 10.0;
    assert!(drag.pointer_down(t2, DragTarget::Body, x0, viewport.pixels_per_day()));
    assert_eq!(held.get(), 1);
    drag.pointer_move(x0 + 40.0);

    let dragged = compute_layout(&parsed.items, &viewport, drag.draft(), &options);
    let draft_bar = dragged.bar(&t2.id).unwrap();
    assert!(draft_bar.is_draft);
    assert_eq!((draft_bar.start, draft_bar.end), (d(6, 12), d(6, 14)));
    assert_eq!(draft_bar.row, bar.row);
    assert!(!dragged.bar(&ItemId::from("T1")).unwrap().is_draft);

    let commit = drag.pointer_up(x0 + 40.0).unwrap();
    assert_eq!(held.get(), 0);
    assert!(drag.draft().is_none());
    assert_eq!(commit.start_iso(), "2024-06-12");
    assert_eq!(commit.end_iso(), "2024-06-14");

    let revision = store.revision();
    commit.send(&mut store);
    assert!(store.revision() > revision);
    let record = store.record(&t2.id).unwrap();
    assert_eq!((record.start.as_str(), record.end.as_str()), ("2024-06-12", "2024-06-14"));

    // The next snapshot widens the default window and the controller resets to it.
    let reparsed = parse_snapshot(&store.items());
    range.shift(gantt_timeline::interaction::Shift::Forward);
    assert!(range.sync_items(&reparsed.items, today));
    assert_eq!((range.viewport().start, range.viewport().end), (d(5, 31), d(6, 17)));
}

#[test]
fn test_dropping_engine_mid_drag_releases_capture() {
    let capture = CountingCapture::default();
    let held = capture.held.clone();
    {
        let mut drag = DragEngine::new(capture);
        let item = ScheduledItem::new("a", "A", d(6, 10), d(6, 12));
        drag.pointer_down(&item, DragTarget::EndHandle, 100.0, 20.0);
        drag.pointer_move(160.0);
        assert_eq!(held.get(), 1);
    }
    assert_eq!(held.get(), 0);
}

#[test]
fn test_overlapping_items_get_distinct_lanes() {
    let items = vec![
        ScheduledItem::new("a", "A", d(6, 1), d(6, 3)),
        ScheduledItem::new("b", "B", d(6, 2), d(6, 5)),
    ];
    let range = RangeController::new(&items, ZoomLevel::Day, d(1, 1));
    let options = LayoutOptions {
        mode: ViewMode::Lanes,
        ..LayoutOptions::default()
    };
    let geometry = compute_layout(&items, &range.viewport(), None, &options);

    assert_eq!(geometry.row_count, 2);
    assert_eq!(geometry.bar(&ItemId::from("a")).unwrap().row, 0);
    assert_eq!(geometry.bar(&ItemId::from("b")).unwrap().row, 1);
}

#[test]
fn test_connector_runs_from_predecessor_end_to_successor_start() {
    let store = store();
    let parsed = parse_snapshot(&store.items());
    let range = RangeController::new(&parsed.items, ZoomLevel::Week, d(1, 1));
    let geometry = compute_layout(&parsed.items, &range.viewport(), None, &LayoutOptions::default());

    assert_eq!(geometry.connectors.len(), 1);
    let t1 = geometry.bar(&ItemId::from("T1")).unwrap();
    let t2 = geometry.bar(&ItemId::from("T2")).unwrap();
    let points = geometry.connectors[0].points;
    assert_eq!((points[0].x, points[0].y), (t1.x_end, 16.0));
    assert_eq!((points[3].x, points[3].y), (t2.x_start, 2.0 * 32.0 + 16.0));
}

#[test]
fn test_absent_successor_draws_nothing() {
    let items = vec![
        ScheduledItem::new("T1", "One", d(6, 3), d(6, 7)),
        ScheduledItem::new("T2", "Two", d(6, 10), d(6, 12)).with_predecessor("T1"),
    ];
    let edges = dependency_edges(&items);
    assert_eq!(edges.len(), 1);

    let mut anchors = HashMap::new();
    anchors.insert(
        ItemId::from("T1"),
        BarAnchor {
            row: 0,
            x_start: 0.0,
            x_end: 100.0,
        },
    );
    assert!(route_connectors(&edges, &anchors, 32.0).is_empty());

    // Same through the layout: T2 hidden under a collapsed parent.
    let items = vec![
        ScheduledItem::new("P", "Parent", d(6, 1), d(6, 14)),
        ScheduledItem::new("T1", "One", d(6, 3), d(6, 7)),
        ScheduledItem::new("T2", "Two", d(6, 10), d(6, 12))
            .with_parent("P")
            .with_predecessor("T1"),
    ];
    let range = RangeController::new(&items, ZoomLevel::Week, d(1, 1));
    let options = LayoutOptions {
        collapsed: HashSet::from([ItemId::from("P")]),
        ..LayoutOptions::default()
    };
    let geometry = compute_layout(&items, &range.viewport(), None, &options);
    assert!(geometry.bar(&ItemId::from("T2")).is_none());
    assert!(geometry.connectors.is_empty());
}

#[test]
fn test_scroll_to_item_moves_header_with_body() {
    let store = store();
    let parsed = parse_snapshot(&store.items());
    let range = RangeController::new(&parsed.items, ZoomLevel::Day, d(1, 1));
    let geometry = compute_layout(&parsed.items, &range.viewport(), None, &LayoutOptions::default());
    let t2 = geometry.bar(&ItemId::from("T2")).unwrap();

    let mut scroll = ScrollSync::new();
    let offset = scroll.scroll_to_item(t2.x_start);
    assert!(offset > 0.0);
    assert_eq!(scroll.header_offset(), offset);
    assert_eq!(scroll.take_pending(), Some(offset));

    scroll.on_body_scroll(12.5);
    assert_eq!(scroll.header_offset(), 12.5);
}
