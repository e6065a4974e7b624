use std::path::PathBuf;
use thiserror::Error;

/// Main error type for gantt-timeline.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("CSV is missing required columns. Found headers: {found:?}. Need columns for: name, start date, end date.")]
    MissingColumns { found: Vec<String> },

    #[error("No valid items found in CSV ({skipped} rows skipped)")]
    NoItems { skipped: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
