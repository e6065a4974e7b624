use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::model::ItemRecord;

/// On-disk snapshot: the store's records plus the display label directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotFile {
    #[serde(default)]
    pub name: Option<String>,
    pub items: Vec<ItemRecord>,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

/// Load a snapshot from a JSON file.
pub fn load_snapshot(path: &Path) -> Result<SnapshotFile> {
    let json = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot = parse_snapshot_json(&json)?;
    info!(path = %path.display(), items = snapshot.items.len(), "snapshot loaded");
    Ok(snapshot)
}

/// Parse snapshot JSON. A bare array of records is accepted as well.
pub fn parse_snapshot_json(json: &str) -> Result<SnapshotFile> {
    if json.trim_start().starts_with('[') {
        let items: Vec<ItemRecord> = serde_json::from_str(json)?;
        return Ok(SnapshotFile {
            items,
            ..Default::default()
        });
    }
    Ok(serde_json::from_str(json)?)
}
