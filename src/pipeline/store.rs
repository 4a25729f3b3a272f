//! Dataset persistence: one pretty-printed JSON list per dataset file.
//!
//! Loading is forgiving: a blank path, a missing or unreadable file, invalid
//! JSON, or JSON whose root is not a list all load as an empty dataset.
//! Saving rewrites the whole file in place. There is no temp-file/rename
//! step and no locking, so a crash mid-write can truncate the file and two
//! concurrent writers can lose each other's updates.

use crate::error::AnnotatorError;
use crate::pipeline::entry::DatasetEntry;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};

/// Every item of the dataset list at `path`, exactly as stored. Never fails.
///
/// Items are opaque here: legacy or hand-edited objects whose fields do not
/// match [`DatasetEntry`] are returned too, so an append that rewrites the
/// file keeps them.
pub fn load_items(path: &Path) -> Vec<Value> {
    if path.as_os_str().is_empty() || !path.exists() {
        debug!("No dataset at '{}'", path.display());
        return Vec::new();
    }

    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            warn!("Cannot read dataset '{}': {}", path.display(), e);
            return Vec::new();
        }
    };

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Array(items)) => {
            debug!("Loaded {} items from '{}'", items.len(), path.display());
            items
        }
        Ok(_) => {
            warn!("Dataset '{}' is not a JSON list; ignoring it", path.display());
            Vec::new()
        }
        Err(e) => {
            warn!("Dataset '{}' is not valid JSON: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Typed view of the dataset at `path`. Never fails.
///
/// Items that do not fit [`DatasetEntry`] are left out of the view only;
/// the file itself is not modified.
pub fn load(path: &Path) -> Vec<DatasetEntry> {
    let items = load_items(path);
    let total = items.len();
    let entries: Vec<DatasetEntry> = items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping dataset item {} in '{}': {}", i, path.display(), e);
                None
            }
        })
        .collect();

    if entries.len() != total {
        debug!(
            "Typed view of '{}' holds {}/{} items",
            path.display(),
            entries.len(),
            total
        );
    }
    entries
}

/// Write `entries` to `path`, replacing the file.
///
/// Creates the parent directory when needed; a bare file name is written to
/// the current directory.
pub fn save(path: &Path, entries: &[DatasetEntry]) -> Result<(), AnnotatorError> {
    write_list(path, entries, entries.len())
}

/// [`save`] for raw items, as returned by [`load_items`].
pub fn save_items(path: &Path, items: &[Value]) -> Result<(), AnnotatorError> {
    write_list(path, items, items.len())
}

fn write_list<T: Serialize + ?Sized>(
    path: &Path,
    list: &T,
    count: usize,
) -> Result<(), AnnotatorError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| AnnotatorError::DatasetWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    let json = serde_json::to_string_pretty(list)?;
    std::fs::write(path, json).map_err(|e| AnnotatorError::DatasetWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    info!("Saved {} entries to '{}'", count, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample(id: &str, page: usize) -> DatasetEntry {
        DatasetEntry {
            id: id.to_string(),
            pdf_name: "manual.pdf".to_string(),
            pdf_path: "/docs/manual.pdf".to_string(),
            page,
            question: "Which pin drives the LED?".to_string(),
            answer: "PA5".to_string(),
            question_type: "free_form".to_string(),
            structured_metadata: None,
            timestamp: "2026-01-02T03:04:05Z".to_string(),
            extra: Default::default(),
        }
    }

    #[test]
    fn blank_and_missing_paths_load_empty() {
        assert!(load(Path::new("")).is_empty());
        assert!(load(Path::new("/definitely/not/here.json")).is_empty());
    }

    #[test]
    fn object_root_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("d.json");
        std::fs::write(&path, r#"{"id": "x"}"#).unwrap();
        assert!(load(&path).is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("d.json");
        std::fs::write(&path, "[{\"id\": ").unwrap();
        assert!(load(&path).is_empty());
    }

    #[test]
    fn save_then_load_preserves_entries_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/d.json");
        let entries = vec![sample("manual_p3_q0001", 3), sample("manual_p1_q0002", 1)];

        save(&path, &entries).expect("save should succeed");
        assert_eq!(load(&path), entries);
    }

    #[test]
    fn saved_file_is_pretty_printed_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("d.json");
        save(&path, &[sample("a_p1_q0001", 1)]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n  {\n    \"id\""), "got: {text}");
    }

    #[test]
    fn typed_view_skips_items_that_do_not_fit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("d.json");
        std::fs::write(&path, r#"[1, {"id": "kept", "page": 2}, {"page": "7"}, "x"]"#).unwrap();

        let entries = load(&path);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "kept");
        assert_eq!(entries[0].page, 2);

        // The raw list still has all of them.
        assert_eq!(load_items(&path).len(), 4);
    }

    #[test]
    fn raw_items_round_trip_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("d.json");
        let items = vec![
            serde_json::json!({"id": "a_p1_q0001", "question_type": null}),
            serde_json::json!({"id": "a_p2_q0002", "page": "2"}),
            serde_json::json!("stray"),
        ];

        save_items(&path, &items).unwrap();
        assert_eq!(load_items(&path), items);
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file cannot act as a parent directory.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let path: PathBuf = blocker.join("d.json");

        let err = save(&path, &[]).unwrap_err();
        assert!(matches!(err, AnnotatorError::DatasetWriteFailed { .. }));
    }
}
