use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

/// Calendar date format used on every external surface.
pub const ISO_DATE: &str = "%Y-%m-%d";

/// Identifier of a scheduled item, as issued by the external store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Workflow state of an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Todo,
    Doing,
    Review,
    Done,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Todo => "To do",
            Status::Doing => "Doing",
            Status::Review => "Review",
            Status::Done => "Done",
        }
    }
}

/// Priority level for an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }
}

/// An item exactly as the external store hands it over: dates are still
/// ISO strings and may not parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: String,
    #[serde(default)]
    pub code: String,
    pub name: String,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub priority: Priority,
    /// Completion in percent (0–100).
    #[serde(default)]
    pub progress: Option<f32>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub predecessors: Vec<String>,
}

/// A unit of work with an inclusive, whole-day date range.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledItem {
    pub id: ItemId,
    pub code: String,
    pub name: String,
    pub start: NaiveDate,
    /// Inclusive last day.
    pub end: NaiveDate,
    pub owner: Option<ItemId>,
    pub status: Status,
    pub priority: Priority,
    /// Completion in percent (0–100).
    pub progress: Option<f32>,
    pub parent: Option<ItemId>,
    pub predecessors: Vec<ItemId>,
}

impl ScheduledItem {
    /// Create an item with default status and priority.
    pub fn new(id: impl Into<String>, name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id: ItemId::new(id),
            code: String::new(),
            name: name.into(),
            start,
            end: end.max(start),
            owner: None,
            status: Status::default(),
            priority: Priority::default(),
            progress: None,
            parent: None,
            predecessors: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(ItemId::new(parent));
        self
    }

    pub fn with_predecessor(mut self, predecessor: impl Into<String>) -> Self {
        self.predecessors.push(ItemId::new(predecessor));
        self
    }

    /// Number of calendar days covered, counting both ends.
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Parse a store record. An inverted range is clamped so that end == start.
    pub fn from_record(record: &ItemRecord) -> Result<Self> {
        let start = parse_iso_date(&record.start)?;
        let mut end = parse_iso_date(&record.end)?;
        if end < start {
            warn!(id = %record.id, start = %record.start, end = %record.end, "inverted date range, clamping end to start");
            end = start;
        }

        Ok(Self {
            id: ItemId::new(record.id.clone()),
            code: record.code.clone(),
            name: record.name.clone(),
            start,
            end,
            owner: record.owner.clone().filter(|o| !o.is_empty()).map(ItemId),
            status: record.status,
            priority: record.priority,
            progress: record.progress.map(|p| p.clamp(0.0, 100.0)),
            parent: record.parent.clone().filter(|p| !p.is_empty()).map(ItemId),
            predecessors: record.predecessors.iter().cloned().map(ItemId).collect(),
        })
    }
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), ISO_DATE).map_err(|_| Error::InvalidDate(s.to_string()))
}

/// Format a calendar date in `YYYY-MM-DD` form.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

/// A record that was left out of layout, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct ExcludedItem {
    pub id: String,
    pub reason: String,
}

/// Parsed items for one render cycle.
#[derive(Debug, Clone, Default)]
pub struct ParsedSnapshot {
    pub items: Vec<ScheduledItem>,
    pub excluded: Vec<ExcludedItem>,
}

/// Parse store records, keeping input order and excluding records whose
/// dates do not parse.
pub fn parse_snapshot(records: &[ItemRecord]) -> ParsedSnapshot {
    let mut snapshot = ParsedSnapshot::default();
    for record in records {
        match ScheduledItem::from_record(record) {
            Ok(item) => snapshot.items.push(item),
            Err(e) => {
                warn!(id = %record.id, error = %e, "excluding item from layout");
                snapshot.excluded.push(ExcludedItem {
                    id: record.id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, start: &str, end: &str) -> ItemRecord {
        ItemRecord {
            id: id.to_string(),
            code: format!("T-{}", id),
            name: format!("Item {}", id),
            start: start.to_string(),
            end: end.to_string(),
            owner: None,
            status: Status::Todo,
            priority: Priority::Medium,
            progress: None,
            parent: None,
            predecessors: Vec::new(),
        }
    }

    #[test]
    fn test_unparseable_dates_are_excluded() {
        let records = vec![
            record("a", "2024-06-10", "2024-06-12"),
            record("b", "not a date", "2024-06-12"),
            record("c", "2024-06-10", "2024/06/12"),
            record("d", "2024-06-01", "2024-06-02"),
        ];
        let snapshot = parse_snapshot(&records);

        let ids: Vec<&str> = snapshot.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d"]);
        assert_eq!(snapshot.excluded.len(), 2);
        assert_eq!(snapshot.excluded[0].id, "b");
        assert!(snapshot.excluded[1].reason.contains("2024/06/12"));
    }

    #[test]
    fn test_inverted_range_is_clamped() {
        let item = ScheduledItem::from_record(&record("a", "2024-06-10", "2024-06-05")).unwrap();
        assert_eq!(item.start, item.end);
        assert_eq!(item.duration_days(), 1);
    }

    #[test]
    fn test_record_json_defaults() {
        let json = r#"{"id":"x","name":"X","start":"2024-01-01","end":"2024-01-03","status":"review","priority":"critical"}"#;
        let record: ItemRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, Status::Review);
        assert_eq!(record.priority, Priority::Critical);
        assert!(record.predecessors.is_empty());

        let item = ScheduledItem::from_record(&record).unwrap();
        assert_eq!(item.duration_days(), 3);
        assert_eq!(format_iso_date(item.end), "2024-01-03");
    }

    #[test]
    fn test_empty_parent_and_owner_are_none() {
        let mut r = record("a", "2024-06-10", "2024-06-12");
        r.parent = Some(String::new());
        r.owner = Some(String::new());
        r.progress = Some(140.0);
        let item = ScheduledItem::from_record(&r).unwrap();
        assert!(item.parent.is_none());
        assert!(item.owner.is_none());
        assert_eq!(item.progress, Some(100.0));
    }
}
