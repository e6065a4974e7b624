use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::item::{parse_iso_date, ItemId, ItemRecord};

/// The external owner of the task records.
///
/// The timeline pulls a snapshot per render and reports changes back; it
/// never mutates records itself. Both callbacks are fire-and-forget: the
/// engine does not wait for or inspect their outcome, and the next
/// snapshot is authoritative.
pub trait TaskStore {
    /// Ordered list of item records for this render cycle.
    fn items(&self) -> Vec<ItemRecord>;

    /// A completed drag changed an item's dates.
    fn on_date_change(&mut self, id: &ItemId, new_start_iso: &str, new_end_iso: &str);

    /// An item's label or bar was activated.
    fn on_open_item(&mut self, id: &ItemId);
}

/// Snapshot store held in memory by the desktop host.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    pub name: String,
    records: Vec<ItemRecord>,
    /// Display-only id → label directory (owners, people, teams).
    pub labels: HashMap<String, String>,
    pub opened: Option<ItemId>,
    pub modified: DateTime<Utc>,
    revision: u64,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self {
            name: "Untitled Timeline".to_string(),
            records: Vec::new(),
            labels: HashMap::new(),
            opened: None,
            modified: Utc::now(),
            revision: 0,
        }
    }
}

impl InMemoryStore {
    pub fn new(name: impl Into<String>, records: Vec<ItemRecord>, labels: HashMap<String, String>) -> Self {
        Self {
            name: name.into(),
            records,
            labels,
            ..Default::default()
        }
    }

    /// Bumped whenever the record set changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace all records, e.g. after loading a file.
    pub fn replace(&mut self, name: impl Into<String>, records: Vec<ItemRecord>, labels: HashMap<String, String>) {
        self.name = name.into();
        self.records = records;
        self.labels = labels;
        self.opened = None;
        self.touch();
    }

    pub fn record(&self, id: &ItemId) -> Option<&ItemRecord> {
        self.records.iter().find(|r| r.id == id.as_str())
    }

    fn touch(&mut self) {
        self.modified = Utc::now();
        self.revision += 1;
    }
}

impl TaskStore for InMemoryStore {
    fn items(&self) -> Vec<ItemRecord> {
        self.records.clone()
    }

    fn on_date_change(&mut self, id: &ItemId, new_start_iso: &str, new_end_iso: &str) {
        let (start, end) = match (parse_iso_date(new_start_iso), parse_iso_date(new_end_iso)) {
            (Ok(s), Ok(e)) => (s, e),
            _ => {
                warn!(%id, new_start_iso, new_end_iso, "rejecting date change with unparseable dates");
                return;
            }
        };
        if end < start {
            warn!(%id, new_start_iso, new_end_iso, "rejecting inverted date change");
            return;
        }

        match self.records.iter_mut().find(|r| r.id == id.as_str()) {
            Some(record) => {
                record.start = new_start_iso.to_string();
                record.end = new_end_iso.to_string();
                info!(%id, start = new_start_iso, end = new_end_iso, "item dates updated");
                self.touch();
            }
            None => warn!(%id, "rejecting date change for unknown item"),
        }
    }

    fn on_open_item(&mut self, id: &ItemId) {
        debug!(%id, "open item");
        self.opened = Some(id.clone());
    }
}
