pub mod csv_import;
pub mod snapshot;

pub use csv_import::{import_csv, import_csv_str, CsvImport};
pub use snapshot::{load_snapshot, parse_snapshot_json, SnapshotFile};
