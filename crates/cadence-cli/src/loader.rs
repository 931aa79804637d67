use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use cadence_core::record::ChangeRecord;

/// Load one change record from a JSON file.
pub fn load_change(path: &Path) -> anyhow::Result<ChangeRecord> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let record: ChangeRecord =
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(record)
}

/// Load a batch of change records with per-item failure isolation: a file
/// that fails to load is warned about and skipped, never aborting the
/// batch. Returns the loaded records and the number of skipped files.
pub fn load_changes(paths: &[PathBuf]) -> (Vec<ChangeRecord>, usize) {
    let mut records = Vec::with_capacity(paths.len());
    let mut skipped = 0;
    for path in paths {
        match load_change(path) {
            Ok(record) => records.push(record),
            Err(err) => {
                tracing::warn!("skipping {}: {err:#}", path.display());
                skipped += 1;
            }
        }
    }
    (records, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    const GOOD: &str = r#"{
        "id": "1",
        "title": "Add retry",
        "author": "alice",
        "created_at": "2026-03-01T09:00:00Z"
    }"#;

    #[test]
    fn load_change_reads_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "change.json", GOOD);
        let record = load_change(&path).unwrap();
        assert_eq!(record.id, "1");
        assert_eq!(record.author, "alice");
    }

    #[test]
    fn load_change_missing_file_names_path() {
        let err = load_change(Path::new("/nonexistent/change.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/change.json"));
    }

    #[test]
    fn load_changes_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_file(dir.path(), "good.json", GOOD);
        let bad = write_file(dir.path(), "bad.json", "not json at all");
        let missing = dir.path().join("missing.json");
        let (records, skipped) = load_changes(&[good, bad, missing]);
        assert_eq!(records.len(), 1);
        assert_eq!(skipped, 2);
    }
}
