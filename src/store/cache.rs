use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::{error, warn};

use crate::models::WorkRecord;

/// Durable on-device mirror of the record list: one JSON document holding
/// the serialized array, read at startup and overwritten after every
/// mutation. Reads never fail the caller — a missing or malformed file is
/// an empty list. Writes are best-effort and only logged on failure.
#[derive(Debug, Clone)]
pub struct RecordCache {
    path: PathBuf,
}

impl RecordCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    pub fn load(&self) -> Vec<WorkRecord> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                warn!("failed to read record cache {}: {err}", self.path.display());
                return Vec::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    "discarding malformed record cache {}: {err}",
                    self.path.display()
                );
                Vec::new()
            }
        }
    }

    pub fn save(&self, records: &[WorkRecord]) {
        let serialized = match serde_json::to_string(records) {
            Ok(serialized) => serialized,
            Err(err) => {
                error!("failed to serialize record cache: {err}");
                return;
            }
        };

        if let Err(err) = fs::write(&self.path, serialized) {
            error!("failed to write record cache {}: {err}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use tempfile::TempDir;

    use crate::models::NewWorkRecord;

    fn sample_record(id: &str) -> WorkRecord {
        NewWorkRecord::new(
            NaiveDate::from_ymd_opt(2025, 4, 18).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveDate::from_ymd_opt(2025, 4, 18).unwrap(),
            NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            "task A",
        )
        .unwrap()
        .with_id(id.to_string())
    }

    #[test]
    fn missing_file_loads_as_empty_list() {
        let dir = TempDir::new().unwrap();
        let cache = RecordCache::new(dir.path().join("work_records.json"));
        assert!(cache.load().is_empty());
    }

    #[test]
    fn malformed_file_loads_as_empty_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("work_records.json");
        fs::write(&path, "{not json").unwrap();

        let cache = RecordCache::new(path);
        assert!(cache.load().is_empty());
    }

    #[test]
    fn save_then_load_preserves_records_and_order() {
        let dir = TempDir::new().unwrap();
        let cache = RecordCache::new(dir.path().join("work_records.json"));

        let records = vec![sample_record("2"), sample_record("1")];
        cache.save(&records);

        assert_eq!(cache.load(), records);
    }

    #[test]
    fn save_overwrites_previous_contents() {
        let dir = TempDir::new().unwrap();
        let cache = RecordCache::new(dir.path().join("work_records.json"));

        cache.save(&[sample_record("1"), sample_record("2")]);
        cache.save(&[sample_record("3")]);

        let loaded = cache.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "3");
    }
}
