pub mod item;
pub mod store;
pub mod timeline;

pub use item::{
    format_iso_date, parse_iso_date, parse_snapshot, ExcludedItem, ItemId, ItemRecord, ParsedSnapshot,
    Priority, ScheduledItem, Status,
};
pub use store::{InMemoryStore, TaskStore};
pub use timeline::{RulerTick, TickKind, TimelineViewport, ZoomLevel};
