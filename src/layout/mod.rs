pub mod dependencies;
pub mod lanes;
pub mod tree;

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::interaction::DraftOverride;
use crate::model::{ItemId, ScheduledItem, TimelineViewport};

pub use dependencies::{BarAnchor, Connector, DependencyEdge, Point};
pub use lanes::LanePlacement;
pub use tree::TreeRow;

/// Row height used when the host does not override it.
pub const DEFAULT_ROW_HEIGHT: f32 = 32.0;

/// How rows are assigned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// One row per item, indented by hierarchy.
    #[default]
    Tree,
    /// Dense overview: overlapping items packed into lanes, no hierarchy.
    Lanes,
}

#[derive(Debug, Clone)]
pub struct LayoutOptions {
    pub mode: ViewMode,
    pub show_dependencies: bool,
    pub row_height: f32,
    /// Items whose descendants are hidden in tree mode.
    pub collapsed: HashSet<ItemId>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            mode: ViewMode::Tree,
            show_dependencies: true,
            row_height: DEFAULT_ROW_HEIGHT,
            collapsed: HashSet::new(),
        }
    }
}

/// Geometry of one bar, in content coordinates relative to the window start.
#[derive(Debug, Clone, PartialEq)]
pub struct BarGeometry {
    /// Index into the input slice.
    pub index: usize,
    pub id: ItemId,
    pub row: usize,
    /// Hierarchy depth; always 0 in lane mode.
    pub depth: usize,
    pub has_children: bool,
    /// Dates being displayed: the draft override if one applies.
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub x_start: f32,
    pub x_end: f32,
    pub is_draft: bool,
    /// The bar continues before the window start.
    pub clipped_start: bool,
    /// The bar continues past the window end.
    pub clipped_end: bool,
}

impl BarGeometry {
    pub fn width(&self) -> f32 {
        self.x_end - self.x_start
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Default)]
pub struct TimelineGeometry {
    /// Bars in row order.
    pub bars: Vec<BarGeometry>,
    pub connectors: Vec<Connector>,
    pub row_count: usize,
    pub row_height: f32,
    pub content_width: f32,
}

impl TimelineGeometry {
    pub fn bar(&self, id: &ItemId) -> Option<&BarGeometry> {
        self.bars.iter().find(|b| &b.id == id)
    }

    pub fn content_height(&self) -> f32 {
        self.row_count as f32 * self.row_height
    }

    pub fn row_top(&self, row: usize) -> f32 {
        row as f32 * self.row_height
    }
}

/// Lay out the items for the given window, applying the draft override (if
/// any) in place of the committed dates of the item it targets.
pub fn compute_layout(
    items: &[ScheduledItem],
    viewport: &TimelineViewport,
    draft: Option<&DraftOverride>,
    options: &LayoutOptions,
) -> TimelineGeometry {
    let dates_of = |item: &ScheduledItem| match draft {
        Some(d) if d.item_id == item.id => (d.start, d.end.max(d.start), true),
        _ => (item.start, item.end.max(item.start), false),
    };

    let mut bars = Vec::with_capacity(items.len());
    let row_count;

    match options.mode {
        ViewMode::Tree => {
            // Row order follows committed dates so rows do not jump mid-drag.
            let rows = tree::build_tree_collapsed(items, &options.collapsed);
            row_count = rows.len();
            for (row, tree_row) in rows.iter().enumerate() {
                let item = &items[tree_row.index];
                let (start, end, is_draft) = dates_of(item);
                bars.push(bar(viewport, item, tree_row.index, row, tree_row.depth, tree_row.has_children, start, end, is_draft));
            }
        }
        ViewMode::Lanes => {
            let effective: Vec<ScheduledItem> = match draft {
                Some(_) => items
                    .iter()
                    .map(|item| {
                        let (start, end, _) = dates_of(item);
                        ScheduledItem {
                            start,
                            end,
                            ..item.clone()
                        }
                    })
                    .collect(),
                None => items.to_vec(),
            };
            let placements = lanes::pack_lanes(&effective, viewport);
            row_count = lanes::lane_count(&placements);
            for p in &placements {
                let item = &items[p.index];
                let (start, end, is_draft) = dates_of(item);
                bars.push(bar(viewport, item, p.index, p.lane, 0, false, start, end, is_draft));
            }
            bars.sort_by_key(|b| (b.row, b.index));
        }
    }

    let connectors = if options.show_dependencies {
        let anchors: HashMap<ItemId, BarAnchor> = bars
            .iter()
            .map(|b| {
                (
                    b.id.clone(),
                    BarAnchor {
                        row: b.row,
                        x_start: b.x_start,
                        x_end: b.x_end,
                    },
                )
            })
            .collect();
        dependencies::route_connectors(&dependencies::dependency_edges(items), &anchors, options.row_height)
    } else {
        Vec::new()
    };

    TimelineGeometry {
        bars,
        connectors,
        row_count,
        row_height: options.row_height,
        content_width: viewport.total_width(),
    }
}

#[allow(clippy::too_many_arguments)]
fn bar(
    viewport: &TimelineViewport,
    item: &ScheduledItem,
    index: usize,
    row: usize,
    depth: usize,
    has_children: bool,
    start: NaiveDate,
    end: NaiveDate,
    is_draft: bool,
) -> BarGeometry {
    let (x_start, x_end) = viewport.bar_span(start, end);
    BarGeometry {
        index,
        id: item.id.clone(),
        row,
        depth,
        has_children,
        start,
        end,
        x_start,
        x_end,
        is_draft,
        clipped_start: start < viewport.start,
        clipped_end: end > viewport.end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ZoomLevel;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn window(zoom: ZoomLevel) -> TimelineViewport {
        TimelineViewport::new(d(1), d(30), zoom)
    }

    fn items() -> Vec<ScheduledItem> {
        vec![
            ScheduledItem::new("parent", "Parent", d(1), d(20)),
            ScheduledItem::new("a", "A", d(2), d(4)).with_parent("parent"),
            ScheduledItem::new("b", "B", d(3), d(8)).with_parent("parent").with_predecessor("a"),
            ScheduledItem::new("c", "C", d(10), d(10)).with_predecessor("missing"),
        ]
    }

    #[test]
    fn test_tree_layout_positions() {
        let geometry = compute_layout(&items(), &window(ZoomLevel::Week), None, &LayoutOptions::default());

        assert_eq!(geometry.row_count, 4);
        let b = geometry.bar(&ItemId::from("b")).unwrap();
        assert_eq!(b.row, 2);
        assert_eq!(b.depth, 1);
        assert_eq!(b.x_start, 40.0);
        assert_eq!(b.x_end, 160.0);
        assert_eq!(geometry.connectors.len(), 1);
        assert_eq!(geometry.content_width, 600.0);
    }

    #[test]
    fn test_no_negative_width_bars() {
        let mut all = items();
        all.push(ScheduledItem::new("outside", "Outside", d(1) - chrono::Duration::days(40), d(1) - chrono::Duration::days(30)));
        for zoom in ZoomLevel::ALL {
            for mode in [ViewMode::Tree, ViewMode::Lanes] {
                let options = LayoutOptions {
                    mode,
                    ..LayoutOptions::default()
                };
                let geometry = compute_layout(&all, &window(zoom), None, &options);
                for bar in &geometry.bars {
                    assert!(bar.x_start <= bar.x_end, "{:?}", bar);
                }
            }
        }
    }

    #[test]
    fn test_draft_override_takes_precedence() {
        let draft = DraftOverride {
            item_id: ItemId::from("a"),
            start: d(5),
            end: d(6),
        };
        let geometry = compute_layout(&items(), &window(ZoomLevel::Day), Some(&draft), &LayoutOptions::default());
        let a = geometry.bar(&ItemId::from("a")).unwrap();
        assert!(a.is_draft);
        assert_eq!(a.start, d(5));
        assert_eq!(a.x_start, 4.0 * 44.0);
        // Row order still follows the committed dates.
        assert_eq!(a.row, 1);
    }

    #[test]
    fn test_lane_mode_packs_overlaps() {
        let options = LayoutOptions {
            mode: ViewMode::Lanes,
            show_dependencies: false,
            ..LayoutOptions::default()
        };
        let geometry = compute_layout(&items(), &window(ZoomLevel::Month), None, &options);
        assert_eq!(geometry.row_count, 3);
        assert!(geometry.connectors.is_empty());
        assert!(geometry.bars.iter().all(|b| b.depth == 0));
        assert_eq!(geometry.bar(&ItemId::from("c")).unwrap().row, 1);
    }

    #[test]
    fn test_clipped_flags() {
        let items = vec![ScheduledItem::new("long", "Long", d(1) - chrono::Duration::days(3), d(30) + chrono::Duration::days(3))];
        let geometry = compute_layout(&items, &window(ZoomLevel::Week), None, &LayoutOptions::default());
        let bar = &geometry.bars[0];
        assert!(bar.clipped_start && bar.clipped_end);
        assert_eq!(bar.x_start, 0.0);
        assert_eq!(bar.x_end, 600.0);
    }

    #[test]
    fn test_collapsed_parent_hides_children_and_their_connectors() {
        let options = LayoutOptions {
            collapsed: HashSet::from([ItemId::from("parent")]),
            ..LayoutOptions::default()
        };
        let geometry = compute_layout(&items(), &window(ZoomLevel::Week), None, &options);
        assert_eq!(geometry.row_count, 2);
        assert!(geometry.connectors.is_empty());
    }
}
