use crate::model::{ItemId, ScheduledItem, TimelineViewport};

/// Placement of one item in the lane view. Columns are day offsets from the
/// window start, both inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanePlacement {
    /// Index into the input slice.
    pub index: usize,
    pub id: ItemId,
    pub lane: usize,
    pub start_column: usize,
    pub end_column: usize,
}

/// Greedy first-fit in input order: each item takes the lowest lane whose
/// occupied columns miss its window-clipped columns. Items entirely outside
/// the window get no placement.
pub fn pack_lanes(items: &[ScheduledItem], viewport: &TimelineViewport) -> Vec<LanePlacement> {
    let columns = viewport.day_count().max(0) as usize;
    let mut occupied: Vec<Vec<bool>> = Vec::new();
    let mut placements = Vec::new();

    for (index, item) in items.iter().enumerate() {
        if !viewport.intersects(item.start, item.end) {
            continue;
        }
        let start_column = viewport.column_of(viewport.clamp(item.start)) as usize;
        let end_column = viewport.column_of(viewport.clamp(item.end)) as usize;

        let lane = match occupied
            .iter()
            .position(|cols| !cols[start_column..=end_column].iter().any(|&taken| taken))
        {
            Some(lane) => lane,
            None => {
                occupied.push(vec![false; columns]);
                occupied.len() - 1
            }
        };
        occupied[lane][start_column..=end_column].fill(true);

        placements.push(LanePlacement {
            index,
            id: item.id.clone(),
            lane,
            start_column,
            end_column,
        });
    }

    placements
}

/// Number of lanes used by a packing.
pub fn lane_count(placements: &[LanePlacement]) -> usize {
    placements.iter().map(|p| p.lane + 1).max().unwrap_or(0)
}
