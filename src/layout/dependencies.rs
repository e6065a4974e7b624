use std::collections::{HashMap, HashSet};

use crate::model::{ItemId, ScheduledItem};

/// Minimum horizontal run before the vertical segment.
pub const MIN_STUB: f32 = 8.0;

/// A derived predecessor → successor relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyEdge {
    pub from: ItemId,
    pub to: ItemId,
}

/// A point in timeline content coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Where a bar sits, as far as connector routing is concerned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarAnchor {
    pub row: usize,
    pub x_start: f32,
    pub x_end: f32,
}

/// A three-segment orthogonal connector.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub edge: DependencyEdge,
    /// Four points joined by three axis-aligned segments.
    pub points: [Point; 4],
}

/// All distinct predecessor edges declared by the items, in input order.
pub fn dependency_edges(items: &[ScheduledItem]) -> Vec<DependencyEdge> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for item in items {
        for pred in &item.predecessors {
            if *pred == item.id {
                continue;
            }
            let edge = DependencyEdge {
                from: pred.clone(),
                to: item.id.clone(),
            };
            if seen.insert(edge.clone()) {
                edges.push(edge);
            }
        }
    }
    edges
}

/// Route one connector per edge whose two ends are both rendered, from the
/// predecessor's right edge to the successor's left edge.
pub fn route_connectors(
    edges: &[DependencyEdge],
    anchors: &HashMap<ItemId, BarAnchor>,
    row_height: f32,
) -> Vec<Connector> {
    edges
        .iter()
        .filter_map(|edge| {
            let from = anchors.get(&edge.from)?;
            let to = anchors.get(&edge.to)?;
            Some(Connector {
                edge: edge.clone(),
                points: route(from, to, row_height),
            })
        })
        .collect()
}

fn route(from: &BarAnchor, to: &BarAnchor, row_height: f32) -> [Point; 4] {
    let y1 = row_center(from.row, row_height);
    let y2 = row_center(to.row, row_height);
    let x1 = from.x_end;
    let x2 = to.x_start;

    let mid_x = if x2 - x1 >= MIN_STUB * 2.0 {
        (x1 + x2) / 2.0
    } else {
        x1 + MIN_STUB
    };

    [
        Point::new(x1, y1),
        Point::new(mid_x, y1),
        Point::new(mid_x, y2),
        Point::new(x2, y2),
    ]
}

fn row_center(row: usize, row_height: f32) -> f32 {
    row as f32 * row_height + row_height / 2.0
}
