//! Pointer-driven drag/resize state machine.
//!
//! ```text
//! Idle --pointer-down(bar)----> Dragging(Move)
//! Idle --pointer-down(handle)-> Dragging(ResizeStart | ResizeEnd)
//! Dragging --pointer-move-----> Dragging   (recompute draft)
//! Dragging --pointer-up-------> Idle       (clear draft, commit if changed)
//! ```
//!
//! Pointer capture is acquired on entering `Dragging` and released on leaving
//! it, or when the engine is dropped mid-drag. There is no cancel gesture.

use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::model::{format_iso_date, ItemId, ScheduledItem, TaskStore};

/// Which part of a bar the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    Body,
    StartHandle,
    EndHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Move,
    ResizeStart,
    ResizeEnd,
}

impl From<DragTarget> for DragMode {
    fn from(target: DragTarget) -> Self {
        match target {
            DragTarget::Body => DragMode::Move,
            DragTarget::StartHandle => DragMode::ResizeStart,
            DragTarget::EndHandle => DragMode::ResizeEnd,
        }
    }
}

/// Ephemeral dates shown for the dragged item instead of its committed ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftOverride {
    pub item_id: ItemId,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Final dates of a completed drag, to be handed to the store once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRequest {
    pub item_id: ItemId,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CommitRequest {
    pub fn start_iso(&self) -> String {
        format_iso_date(self.start)
    }

    pub fn end_iso(&self) -> String {
        format_iso_date(self.end)
    }

    /// Fire-and-forget delivery to the store.
    pub fn send(&self, store: &mut dyn TaskStore) {
        store.on_date_change(&self.item_id, &self.start_iso(), &self.end_iso());
    }
}

/// Window-level pointer subscription, held only while dragging.
pub trait PointerCapture {
    fn acquire(&mut self);
    fn release(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub mode: DragMode,
    pub item_id: ItemId,
    pub anchor_x: f32,
    pub pixels_per_day: f32,
    pub original_start: NaiveDate,
    pub original_end: NaiveDate,
    pub draft: DraftOverride,
}

impl DragSession {
    /// Dates for a pointer at `x`.
    fn dates_at(&self, x: f32) -> (NaiveDate, NaiveDate) {
        let delta = delta_days(x - self.anchor_x, self.pixels_per_day);
        match self.mode {
            DragMode::Move => (shift_date(self.original_start, delta), shift_date(self.original_end, delta)),
            DragMode::ResizeStart => (shift_date(self.original_start, delta).min(self.original_end), self.original_end),
            DragMode::ResizeEnd => (self.original_start, shift_date(self.original_end, delta).max(self.original_start)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Owns the single global drag state.
pub struct DragEngine<C: PointerCapture> {
    state: DragState,
    capture: C,
}

impl<C: PointerCapture> DragEngine<C> {
    pub fn new(capture: C) -> Self {
        Self {
            state: DragState::Idle,
            capture,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn capture(&self) -> &C {
        &self.capture
    }

    /// The draft override of the active drag, if any.
    pub fn draft(&self) -> Option<&DraftOverride> {
        match &self.state {
            DragState::Dragging(session) => Some(&session.draft),
            DragState::Idle => None,
        }
    }

    /// Start a drag. Ignored (returns false) while another drag is active.
    pub fn pointer_down(&mut self, item: &ScheduledItem, target: DragTarget, x: f32, pixels_per_day: f32) -> bool {
        if self.is_dragging() {
            return false;
        }
        let mode = DragMode::from(target);
        debug!(id = %item.id, ?mode, x, "drag started");

        self.capture.acquire();
        self.state = DragState::Dragging(DragSession {
            mode,
            item_id: item.id.clone(),
            anchor_x: x,
            pixels_per_day,
            original_start: item.start,
            original_end: item.end,
            draft: DraftOverride {
                item_id: item.id.clone(),
                start: item.start,
                end: item.end,
            },
        });
        true
    }

    /// Recompute the draft for a pointer at `x`.
    pub fn pointer_move(&mut self, x: f32) -> Option<&DraftOverride> {
        match &mut self.state {
            DragState::Dragging(session) => {
                let (start, end) = session.dates_at(x);
                session.draft.start = start;
                session.draft.end = end;
                Some(&session.draft)
            }
            DragState::Idle => None,
        }
    }

    /// Finish the drag at `x`. The draft is always cleared; a commit request
    /// is returned only if the dates differ from the originals.
    pub fn pointer_up(&mut self, x: f32) -> Option<CommitRequest> {
        let session = match std::mem::take(&mut self.state) {
            DragState::Dragging(session) => session,
            DragState::Idle => return None,
        };
        self.capture.release();

        let (start, end) = session.dates_at(x);
        if start == session.original_start && end == session.original_end {
            debug!(id = %session.item_id, "drag ended without change");
            return None;
        }
        debug!(id = %session.item_id, %start, %end, "drag committed");
        Some(CommitRequest {
            item_id: session.item_id,
            start,
            end,
        })
    }

    /// Drop any active drag without committing, releasing the capture.
    pub fn teardown(&mut self) {
        if let DragState::Dragging(session) = std::mem::take(&mut self.state) {
            debug!(id = %session.item_id, "drag torn down");
            self.capture.release();
        }
    }
}

impl<C: PointerCapture> Drop for DragEngine<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Whole days for a horizontal pointer delta.
/// Non-finite deltas count as no movement.
pub fn delta_days(delta_x: f32, pixels_per_day: f32) -> i64 {
    let days = delta_x / pixels_per_day;
    if days.is_finite() {
        days.round() as i64
    } else {
        0
    }
}

/// `date + days`, saturating at the calendar's bounds.
fn shift_date(date: NaiveDate, days: i64) -> NaiveDate {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct CountingCapture {
        active: Rc<Cell<i32>>,
        acquired: Rc<Cell<u32>>,
    }

    impl PointerCapture for CountingCapture {
        fn acquire(&mut self) {
            self.active.set(self.active.get() + 1);
            self.acquired.set(self.acquired.get() + 1);
        }

        fn release(&mut self) {
            self.active.set(self.active.get() - 1);
        }
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn item() -> ScheduledItem {
        ScheduledItem::new("t1", "Task", d(10), d(12))
    }

    fn engine() -> DragEngine<CountingCapture> {
        DragEngine::new(CountingCapture::default())
    }

    #[test]
    fn test_move_by_forty_pixels_at_week_zoom() {
        let mut engine = engine();
        assert!(engine.pointer_down(&item(), DragTarget::Body, 100.0, 20.0));
        engine.pointer_move(130.0);
        let commit = engine.pointer_up(140.0).unwrap();

        assert_eq!(commit.start_iso(), "2024-06-12");
        assert_eq!(commit.end_iso(), "2024-06-14");
        assert!(engine.draft().is_none());
    }

    #[test]
    fn test_move_preserves_duration_in_both_directions() {
        for n in -5i64..=5 {
            let mut engine = engine();
            engine.pointer_down(&item(), DragTarget::Body, 0.0, 44.0);
            let draft = engine.pointer_move(n as f32 * 44.0).unwrap().clone();
            assert_eq!(draft.start, d(10) + Duration::days(n));
            assert_eq!(draft.end, d(12) + Duration::days(n));
        }
    }

    #[test]
    fn test_resize_start_clamps_to_end() {
        let mut engine = engine();
        engine.pointer_down(&item(), DragTarget::StartHandle, 0.0, 10.0);

        let draft = engine.pointer_move(-20.0).unwrap();
        assert_eq!((draft.start, draft.end), (d(8), d(12)));

        for x in [30.0, 100.0, 500.0] {
            let draft = engine.pointer_move(x).unwrap();
            assert_eq!(draft.start, d(12));
            assert_eq!(draft.end, d(12));
        }
        let commit = engine.pointer_up(500.0).unwrap();
        assert_eq!((commit.start, commit.end), (d(12), d(12)));
    }

    #[test]
    fn test_resize_end_clamps_to_start() {
        let mut engine = engine();
        engine.pointer_down(&item(), DragTarget::EndHandle, 0.0, 20.0);
        assert_eq!(engine.pointer_move(40.0).unwrap().end, d(14));
        let draft = engine.pointer_move(-400.0).unwrap();
        assert_eq!((draft.start, draft.end), (d(10), d(10)));
    }

    #[test]
    fn test_huge_pointer_offsets_saturate() {
        let mut engine = engine();
        engine.pointer_down(&item(), DragTarget::EndHandle, 0.0, 10.0);
        let draft = engine.pointer_move(1.0e10).unwrap();
        assert_eq!(draft.start, d(10));
        assert!(draft.end > d(12));

        let draft = engine.pointer_move(-1.0e10).unwrap();
        assert_eq!((draft.start, draft.end), (d(10), d(10)));

        let mut engine = self::engine();
        engine.pointer_down(&item(), DragTarget::Body, 0.0, 10.0);
        let draft = engine.pointer_move(f32::MAX).unwrap();
        assert!(draft.start <= draft.end);
        let draft = engine.pointer_move(f32::NEG_INFINITY).unwrap();
        assert_eq!((draft.start, draft.end), (d(10), d(12)));
        assert!(engine.pointer_up(f32::NAN).is_none());
    }

    #[test]
    fn test_delta_days_ignores_non_finite() {
        assert_eq!(delta_days(f32::INFINITY, 20.0), 0);
        assert_eq!(delta_days(f32::NAN, 20.0), 0);
        assert_eq!(delta_days(41.0, 20.0), 2);
    }

    #[test]
    fn test_no_commit_when_dates_unchanged() {
        let mut engine = engine();
        engine.pointer_down(&item(), DragTarget::Body, 50.0, 20.0);
        engine.pointer_move(90.0);
        // Back to within half a day of the anchor.
        assert!(engine.pointer_up(58.0).is_none());
        assert!(!engine.is_dragging());
    }

    #[test]
    fn test_capture_scoped_to_dragging() {
        let capture = CountingCapture::default();
        let active = capture.active.clone();
        let acquired = capture.acquired.clone();
        let mut engine = DragEngine::new(capture);

        assert_eq!(active.get(), 0);
        engine.pointer_down(&item(), DragTarget::Body, 0.0, 20.0);
        assert_eq!(active.get(), 1);

        // A second pointer-down while dragging is ignored.
        assert!(!engine.pointer_down(&item(), DragTarget::EndHandle, 0.0, 20.0));
        assert_eq!(acquired.get(), 1);

        engine.pointer_up(0.0);
        assert_eq!(active.get(), 0);

        // Pointer events while idle do nothing.
        assert!(engine.pointer_move(10.0).is_none());
        assert!(engine.pointer_up(10.0).is_none());
        assert_eq!(active.get(), 0);
    }

    #[test]
    fn test_drop_mid_drag_releases_capture() {
        let capture = CountingCapture::default();
        let active = capture.active.clone();
        {
            let mut engine = DragEngine::new(capture);
            engine.pointer_down(&item(), DragTarget::Body, 0.0, 20.0);
            engine.pointer_move(200.0);
            assert_eq!(active.get(), 1);
        }
        assert_eq!(active.get(), 0);
    }

    #[test]
    fn test_commit_is_sent_to_store() {
        use crate::model::{InMemoryStore, ItemRecord, Priority, Status};

        let mut store = InMemoryStore::new(
            "Test",
            vec![ItemRecord {
                id: "t1".to_string(),
                code: String::new(),
                name: "Task".to_string(),
                start: "2024-06-10".to_string(),
                end: "2024-06-12".to_string(),
                owner: None,
                status: Status::Todo,
                priority: Priority::Low,
                progress: None,
                parent: None,
                predecessors: Vec::new(),
            }],
            Default::default(),
        );

        let mut engine = engine();
        engine.pointer_down(&item(), DragTarget::EndHandle, 0.0, 20.0);
        engine.pointer_up(60.0).unwrap().send(&mut store);
        assert_eq!(store.record(&ItemId::from("t1")).unwrap().end, "2024-06-15");
    }
}
