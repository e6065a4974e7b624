use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::layout::ViewMode;
use crate::model::ZoomLevel;

/// Persisted user settings. Missing keys fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub zoom: ZoomLevel,
    pub show_dependencies: bool,
    pub view_mode: ViewMode,
    /// Snapshot file reopened on start-up.
    pub last_snapshot: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            zoom: ZoomLevel::Week,
            show_dependencies: true,
            view_mode: ViewMode::Tree,
            last_snapshot: None,
        }
    }
}

impl AppConfig {
    /// Where settings live: `<config dir>/settings.json`, or `./settings.json`
    /// when no home directory can be resolved.
    pub fn default_path() -> PathBuf {
        match directories::ProjectDirs::from("", "", "GanttTimeline") {
            Some(dirs) => dirs.config_dir().join("settings.json"),
            None => PathBuf::from("settings.json"),
        }
    }

    /// Load settings, falling back to defaults on any error.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring invalid settings file");
                Self::default()
            }),
            Err(_) => {
                debug!(path = %path.display(), "no settings file, using defaults");
                Self::default()
            }
        }
    }

    /// Save settings. Failures are logged, never fatal.
    pub fn save(&self, path: &Path) {
        let json = match serde_json::to_string_pretty(self) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialise settings");
                return;
            }
        };
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        if let Err(e) = std::fs::write(path, json) {
            warn!(path = %path.display(), error = %e, "failed to save settings");
        }
    }
}

/// What the host hands the timeline each frame.
#[derive(Debug, Clone, Default)]
pub struct TimelineConfig {
    pub zoom: ZoomLevel,
    pub show_dependencies: bool,
    /// Display-only id → label directory.
    pub labels: HashMap<String, String>,
}

impl TimelineConfig {
    pub fn from_app(config: &AppConfig, labels: HashMap<String, String>) -> Self {
        Self {
            zoom: config.zoom,
            show_dependencies: config.show_dependencies,
            labels,
        }
    }

    /// Resolve an id through the directory, falling back to the id itself.
    pub fn label<'a>(&'a self, id: &'a str) -> &'a str {
        self.labels.get(id).map(String::as_str).unwrap_or(id)
    }
}
