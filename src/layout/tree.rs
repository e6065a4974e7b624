use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::model::{ItemId, ScheduledItem};

/// One flattened row of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeRow {
    /// Index into the input slice.
    pub index: usize,
    pub depth: usize,
    pub has_children: bool,
}

/// Flatten all items depth-first. The output is a permutation of the input:
/// an unresolved parent, a self-parent or a parent cycle makes the item a root.
pub fn build_tree(items: &[ScheduledItem]) -> Vec<TreeRow> {
    build_tree_collapsed(items, &HashSet::new())
}

/// Flatten depth-first, omitting descendants of collapsed items.
pub fn build_tree_collapsed(items: &[ScheduledItem], collapsed: &HashSet<ItemId>) -> Vec<TreeRow> {
    // First occurrence wins when ids repeat.
    let mut by_id: HashMap<&ItemId, usize> = HashMap::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        by_id.entry(&item.id).or_insert(i);
    }

    let raw_parent: Vec<Option<usize>> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.parent
                .as_ref()
                .and_then(|p| by_id.get(p).copied())
                .filter(|&p| p != i)
        })
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); items.len()];
    let mut roots = Vec::new();
    let on_cycle = cycle_members(&raw_parent);
    for i in 0..items.len() {
        match raw_parent[i] {
            Some(p) if !on_cycle[i] => children[p].push(i),
            Some(_) => {
                warn!(id = %items[i].id, "cyclic parent reference, treating item as root");
                roots.push(i);
            }
            None => roots.push(i),
        }
    }

    roots.sort_by(|&a, &b| sibling_order(items, a, b));
    for siblings in &mut children {
        siblings.sort_by(|&a, &b| sibling_order(items, a, b));
    }

    let mut rows = Vec::with_capacity(items.len());
    let mut stack: Vec<(usize, usize)> = roots.iter().rev().map(|&r| (r, 0)).collect();
    while let Some((index, depth)) = stack.pop() {
        let kids = &children[index];
        rows.push(TreeRow {
            index,
            depth,
            has_children: !kids.is_empty(),
        });
        if collapsed.contains(&items[index].id) {
            continue;
        }
        stack.extend(kids.iter().rev().map(|&c| (c, depth + 1)));
    }
    rows
}

/// Marks the nodes lying on a parent cycle. Each node is walked once.
fn cycle_members(raw_parent: &[Option<usize>]) -> Vec<bool> {
    #[derive(Clone, Copy)]
    enum Mark {
        Unvisited,
        OnPath(usize),
        Done,
    }

    let mut marks = vec![Mark::Unvisited; raw_parent.len()];
    let mut on_cycle = vec![false; raw_parent.len()];
    let mut path = Vec::new();
    for start in 0..raw_parent.len() {
        let mut current = Some(start);
        while let Some(node) = current {
            match marks[node] {
                Mark::Done => break,
                Mark::OnPath(pos) => {
                    for &n in &path[pos..] {
                        on_cycle[n] = true;
                    }
                    break;
                }
                Mark::Unvisited => {
                    marks[node] = Mark::OnPath(path.len());
                    path.push(node);
                    current = raw_parent[node];
                }
            }
        }
        for n in path.drain(..) {
            marks[n] = Mark::Done;
        }
    }
    on_cycle
}

/// Start date ascending, then id, then input position.
fn sibling_order(items: &[ScheduledItem], a: usize, b: usize) -> Ordering {
    items[a]
        .start
        .cmp(&items[b].start)
        .then_with(|| items[a].id.cmp(&items[b].id))
        .then_with(|| a.cmp(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn item(id: &str, start: u32) -> ScheduledItem {
        ScheduledItem::new(id, id.to_uppercase(), d(start), d(start + 2))
    }

    fn ids(items: &[ScheduledItem], rows: &[TreeRow]) -> Vec<String> {
        rows.iter().map(|r| items[r.index].id.to_string()).collect()
    }

    fn assert_permutation(items: &[ScheduledItem], rows: &[TreeRow]) {
        let mut seen: Vec<usize> = rows.iter().map(|r| r.index).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..items.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_depth_first_with_sorted_siblings() {
        let items = vec![
            item("late-root", 9),
            item("child-b", 6).with_parent("root"),
            item("root", 1),
            item("child-a", 3).with_parent("root"),
            item("grandchild", 4).with_parent("child-a"),
        ];
        let rows = build_tree(&items);

        assert_eq!(ids(&items, &rows), vec!["root", "child-a", "grandchild", "child-b", "late-root"]);
        let depths: Vec<usize> = rows.iter().map(|r| r.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 1, 0]);
        assert!(rows[0].has_children);
        assert!(!rows[2].has_children);
    }

    #[test]
    fn test_same_start_ties_break_by_id() {
        let items = vec![item("c", 1), item("a", 1), item("b", 1)];
        assert_eq!(ids(&items, &build_tree(&items)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_missing_parent_becomes_root() {
        let items = vec![item("a", 2).with_parent("ghost"), item("b", 1)];
        let rows = build_tree(&items);
        assert_eq!(ids(&items, &rows), vec!["b", "a"]);
        assert!(rows.iter().all(|r| r.depth == 0));
    }

    #[test]
    fn test_cycle_is_detected_and_every_item_emitted() {
        let items = vec![
            item("a", 1).with_parent("b"),
            item("b", 2).with_parent("a"),
            item("c", 3).with_parent("a"),
            item("self", 4).with_parent("self"),
            item("d", 5).with_parent("e"),
            item("e", 6).with_parent("f"),
            item("f", 7).with_parent("d"),
        ];
        let rows = build_tree(&items);

        assert_permutation(&items, &rows);
        assert_eq!(ids(&items, &rows), vec!["a", "c", "b", "self", "d", "e", "f"]);
        let c = rows.iter().find(|r| items[r.index].id.as_str() == "c").unwrap();
        assert_eq!(c.depth, 1);
    }

    #[test]
    fn test_chain_under_cycle_keeps_its_parent() {
        let items = vec![
            item("x", 1).with_parent("y"),
            item("y", 2).with_parent("x"),
            item("tail", 3).with_parent("x"),
            item("leaf", 4).with_parent("tail"),
        ];
        let rows = build_tree(&items);
        assert_permutation(&items, &rows);
        let depth_of = |id: &str| rows.iter().find(|r| items[r.index].id.as_str() == id).unwrap().depth;
        assert_eq!(depth_of("tail"), 1);
        assert_eq!(depth_of("leaf"), 2);
    }

    #[test]
    fn test_duplicate_ids_are_not_dropped() {
        let items = vec![item("a", 1), item("a", 1), item("b", 2).with_parent("a")];
        let rows = build_tree(&items);
        assert_permutation(&items, &rows);
    }

    #[test]
    fn test_collapsed_hides_descendants() {
        let items = vec![
            item("root", 1),
            item("child", 2).with_parent("root"),
            item("grandchild", 3).with_parent("child"),
            item("other", 4),
        ];
        let collapsed = HashSet::from([ItemId::from("root")]);
        let rows = build_tree_collapsed(&items, &collapsed);
        assert_eq!(ids(&items, &rows), vec!["root", "other"]);
        assert!(rows[0].has_children);
    }

    #[test]
    fn test_output_is_stable_across_calls() {
        let items: Vec<ScheduledItem> = (0..50)
            .map(|i| {
                let it = item(&format!("t{}", i), 1 + (i % 5) as u32);
                if i % 3 == 0 && i > 0 {
                    it.with_parent(format!("t{}", i / 3))
                } else {
                    it
                }
            })
            .collect();
        let first = build_tree(&items);
        assert_permutation(&items, &first);
        assert_eq!(first, build_tree(&items));
    }

    #[test]
    fn test_deep_chain_and_cycle_in_one_pass() {
        let mut items: Vec<ScheduledItem> = (0..20_000)
            .map(|i| {
                let it = item(&format!("c{:05}", i), 1);
                if i > 0 {
                    it.with_parent(format!("c{:05}", i - 1))
                } else {
                    it
                }
            })
            .collect();
        items.push(item("x", 2).with_parent("y"));
        items.push(item("y", 2).with_parent("x"));
        items.push(item("z", 3).with_parent("x"));

        let rows = build_tree(&items);
        assert_permutation(&items, &rows);
        assert!(rows[..20_000].iter().enumerate().all(|(k, r)| r.index == k && r.depth == k));
        assert_eq!(ids(&items, &rows[20_000..]), vec!["x", "z", "y"]);
        assert_eq!(rows[20_001].depth, 1);
    }
}
