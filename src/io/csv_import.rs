use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{format_iso_date, ItemRecord, Priority, Status};

/// Records read from a CSV file, plus how many rows were dropped.
#[derive(Debug, Clone, Default)]
pub struct CsvImport {
    pub records: Vec<ItemRecord>,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    Id,
    Code,
    Name,
    Start,
    End,
    Owner,
    Status,
    Priority,
    Progress,
    Parent,
    Predecessors,
}

/// Map a status string to a [`Status`].
fn parse_status(s: &str) -> Status {
    match s.trim().to_lowercase().as_str() {
        "done" | "finished" | "complete" | "completed" => Status::Done,
        "review" | "in review" | "in-review" | "qa" => Status::Review,
        "doing" | "in progress" | "in-progress" | "active" | "started" => Status::Doing,
        _ => Status::Todo,
    }
}

fn parse_priority(s: &str) -> Priority {
    match s.trim().to_lowercase().as_str() {
        "critical" | "urgent" => Priority::Critical,
        "high" => Priority::High,
        "low" => Priority::Low,
        _ => Priority::Medium,
    }
}

/// Percent from "45", "45%" or a fraction such as "0.45".
fn parse_progress(s: &str) -> Option<f32> {
    let s = s.trim();
    let value: f32 = s.trim_end_matches('%').trim().parse().ok()?;
    if !s.ends_with('%') && s.contains('.') && value <= 1.0 {
        Some(value * 100.0)
    } else {
        Some(value)
    }
}

/// Try parsing a date string with several common formats.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Normalise to ISO when the date parses; otherwise keep the raw text so the
/// record is excluded at layout time rather than silently dropped here.
fn normalize_date(s: &str) -> String {
    parse_date(s).map(format_iso_date).unwrap_or_else(|| s.trim().to_string())
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

/// Normalize a header string to a canonical column key.
fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-', '_'], "")
}

fn header_to_col(normalized: &str) -> Option<Column> {
    match normalized {
        "id" | "taskid" | "itemid" | "key" => Some(Column::Id),
        "code" | "ref" | "reference" | "number" => Some(Column::Code),
        "name" | "task" | "tasklabel" | "taskname" | "label" | "title" | "activity" => Some(Column::Name),
        "start" | "startdate" | "from" | "begin" | "begindate" => Some(Column::Start),
        "end" | "enddate" | "to" | "finish" | "finishdate" | "due" | "duedate" => Some(Column::End),
        "owner" | "assignee" | "assignedto" | "responsible" => Some(Column::Owner),
        "status" | "state" | "stage" => Some(Column::Status),
        "priority" | "pri" | "importance" => Some(Column::Priority),
        "progress" | "percent" | "complete" | "percentcomplete" => Some(Column::Progress),
        "parent" | "parenttask" | "parentname" | "parentid" | "subtaskof" => Some(Column::Parent),
        "predecessors" | "predecessor" | "dependson" | "dependencies" | "after" => Some(Column::Predecessors),
        _ => None,
    }
}

/// Import item records from a CSV file.
pub fn import_csv(path: &Path) -> Result<CsvImport> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let import = import_csv_str(&content)?;
    info!(path = %path.display(), records = import.records.len(), skipped = import.skipped, "csv imported");
    Ok(import)
}

/// Import item records from CSV text.
///
/// Auto-detects the delimiter (semicolon, comma, tab) and matches column
/// headers flexibly. Parent and predecessor cells may hold either ids or item
/// names; names are resolved to ids once all rows are read.
pub fn import_csv_str(content: &str) -> Result<CsvImport> {
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let col_map: Vec<Option<Column>> = headers.iter().map(|h| header_to_col(&normalize_header(h))).collect();

    let has = |c: Column| col_map.contains(&Some(c));
    if !has(Column::Name) || !has(Column::Start) || !has(Column::End) {
        return Err(Error::MissingColumns {
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    let mut records: Vec<ItemRecord> = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(row = i + 2, error = %e, "skipping csv row");
                skipped += 1;
                continue;
            }
        };

        let mut cells: HashMap<Column, &str> = HashMap::new();
        for (field, col) in row.iter().zip(col_map.iter()) {
            if let Some(col) = col {
                cells.insert(*col, field);
            }
        }
        let cell = |c: Column| cells.get(&c).copied().filter(|s| !s.is_empty());

        let name = match cell(Column::Name) {
            Some(n) => n.to_string(),
            None => {
                skipped += 1;
                continue;
            }
        };

        let record = ItemRecord {
            id: cell(Column::Id).map(str::to_string).unwrap_or_else(|| Uuid::new_v4().to_string()),
            code: cell(Column::Code).unwrap_or_default().to_string(),
            name,
            start: normalize_date(cell(Column::Start).unwrap_or_default()),
            end: normalize_date(cell(Column::End).unwrap_or_default()),
            owner: cell(Column::Owner).map(str::to_string),
            status: cell(Column::Status).map(parse_status).unwrap_or_default(),
            priority: cell(Column::Priority).map(parse_priority).unwrap_or_default(),
            progress: cell(Column::Progress).and_then(parse_progress),
            parent: cell(Column::Parent).map(str::to_string),
            predecessors: cell(Column::Predecessors)
                .map(|s| {
                    s.split('|')
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        };
        records.push(record);
    }

    if records.is_empty() {
        return Err(Error::NoItems { skipped });
    }

    resolve_references(&mut records);
    Ok(CsvImport { records, skipped })
}

/// Rewrite parent/predecessor cells that name an item into that item's id.
fn resolve_references(records: &mut [ItemRecord]) {
    let ids: HashSet<String> = records.iter().map(|r| r.id.clone()).collect();
    let name_to_id: HashMap<String, String> = records
        .iter()
        .map(|r| (r.name.to_lowercase(), r.id.clone()))
        .collect();
    let resolve = |reference: &str| -> Option<String> {
        if ids.contains(reference) {
            Some(reference.to_string())
        } else {
            name_to_id.get(&reference.to_lowercase()).cloned()
        }
    };

    for record in records.iter_mut() {
        if let Some(parent) = record.parent.take() {
            match resolve(&parent) {
                Some(id) => record.parent = Some(id),
                None => {
                    warn!(item = %record.name, parent = %parent, "parent not found, keeping reference as-is");
                    record.parent = Some(parent);
                }
            }
        }
        record.predecessors = record
            .predecessors
            .iter()
            .map(|p| resolve(p).unwrap_or_else(|| p.clone()))
            .collect();
    }
}
