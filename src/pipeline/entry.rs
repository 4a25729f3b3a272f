//! Entry assembly: validate an annotator submission, build a
//! [`DatasetEntry`], and append it to the dataset file.
//!
//! ## Identifier race
//!
//! Ids embed `dataset length + 1` read at assembly time. Two writers appending
//! to the same file concurrently can both read length N and produce the same
//! `_q{N+1}` suffix, and the later rewrite drops the earlier entry. The
//! annotator is assumed to be the only writer.

use crate::error::{AnnotatorError, Rejection};
use crate::pipeline::catalog::PdfCatalog;
use crate::pipeline::store;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Dataset file used when the caller leaves the path blank.
pub const DEFAULT_DATASET_FILE: &str = "dataset.json";

/// Timestamp layout stored on every entry (UTC).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// One persisted question/answer annotation tied to a PDF page.
///
/// Missing keys load as defaults and unknown keys are carried in `extra`, so
/// files written by newer or older tools survive a load/save cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetEntry {
    pub id: String,
    pub pdf_name: String,
    pub pdf_path: String,
    pub page: usize,
    pub question: String,
    pub answer: String,
    pub question_type: String,
    /// Parsed metadata, `{"raw": text}` when it did not parse, or `null`.
    pub structured_metadata: Option<Value>,
    pub timestamp: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What the annotator typed, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub pdf_name: String,
    /// 1-based; values below 1 are stored as 1.
    pub page: usize,
    pub question: String,
    pub answer: String,
    pub question_type: String,
    /// Free text, usually an edited template.
    pub structured_metadata: String,
}

/// Result of [`add_entry`]. `Display` renders the status line for the UI.
#[derive(Debug)]
pub enum AddOutcome {
    Added {
        entry: DatasetEntry,
        /// 1-based position of the entry in the dataset after the append.
        position: usize,
        dataset_path: PathBuf,
    },
    Rejected(Rejection),
    SaveFailed {
        dataset_path: PathBuf,
        error: AnnotatorError,
    },
}

impl AddOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added { .. })
    }

    pub fn entry(&self) -> Option<&DatasetEntry> {
        match self {
            AddOutcome::Added { entry, .. } => Some(entry),
            _ => None,
        }
    }
}

impl fmt::Display for AddOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddOutcome::Added {
                entry,
                position,
                dataset_path,
            } => write!(
                f,
                "Added question #{position}.\n\n\
                 - ID: `{}`\n\
                 - PDF: `{}` page {}\n\
                 - Saved to: `{}`",
                entry.id,
                entry.pdf_name,
                entry.page,
                dataset_path.display()
            ),
            AddOutcome::Rejected(r) => write!(f, "{r}"),
            AddOutcome::SaveFailed { error, .. } => write!(f, "{error}"),
        }
    }
}

/// `{stem}_p{page}_q{NNNN}` where NNNN is `existing_len + 1`, zero-padded.
pub fn entry_id(pdf_name: &str, page: usize, existing_len: usize) -> String {
    let stem = Path::new(pdf_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{stem}_p{page}_q{:04}", existing_len + 1)
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse the metadata box. Blank → `None`; unparsable text is kept verbatim
/// under a `raw` key instead of being rejected.
pub fn parse_structured_metadata(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("Structured metadata is not valid JSON ({}); storing raw text", e);
            let mut raw = Map::new();
            raw.insert("raw".to_string(), Value::String(trimmed.to_string()));
            Some(Value::Object(raw))
        }
    }
}

/// Blank paths fall back to `default`.
pub fn resolve_dataset_path(raw: &str, default: &Path) -> PathBuf {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        default.to_path_buf()
    } else {
        PathBuf::from(trimmed)
    }
}

/// Check a draft against the catalog. Returns the selected PDF's path.
pub fn validate<'a>(catalog: &'a PdfCatalog, draft: &EntryDraft) -> Result<&'a Path, Rejection> {
    let pdf_path = catalog
        .get(&draft.pdf_name)
        .ok_or(Rejection::NoPdfSelected)?;
    if draft.question.trim().is_empty() {
        return Err(Rejection::EmptyQuestion);
    }
    if draft.answer.trim().is_empty() {
        return Err(Rejection::EmptyAnswer);
    }
    Ok(pdf_path)
}

/// Build an entry without touching disk.
pub fn assemble(
    catalog: &PdfCatalog,
    draft: &EntryDraft,
    existing_len: usize,
    at: DateTime<Utc>,
) -> Result<DatasetEntry, Rejection> {
    let pdf_path = validate(catalog, draft)?;
    let page = draft.page.max(1);

    Ok(DatasetEntry {
        id: entry_id(&draft.pdf_name, page, existing_len),
        pdf_name: draft.pdf_name.clone(),
        pdf_path: pdf_path.to_string_lossy().into_owned(),
        page,
        question: draft.question.trim().to_string(),
        answer: draft.answer.trim().to_string(),
        question_type: draft.question_type.clone(),
        structured_metadata: parse_structured_metadata(&draft.structured_metadata),
        timestamp: format_timestamp(at),
        extra: Map::new(),
    })
}

/// Validate, assemble and append one entry. A blank `dataset_path` means
/// [`DEFAULT_DATASET_FILE`].
pub fn add_entry(catalog: &PdfCatalog, draft: &EntryDraft, dataset_path: &str) -> AddOutcome {
    let path = resolve_dataset_path(dataset_path, Path::new(DEFAULT_DATASET_FILE));
    append_entry(catalog, draft, &path)
}

/// Load → append → save against an already resolved dataset path.
///
/// Nothing is read or written when the draft is rejected. Items already in
/// the file are written back as they were, whatever their shape.
pub fn append_entry(catalog: &PdfCatalog, draft: &EntryDraft, dataset_path: &Path) -> AddOutcome {
    if let Err(r) = validate(catalog, draft) {
        return AddOutcome::Rejected(r);
    }

    let mut items = store::load_items(dataset_path);
    let entry = match assemble(catalog, draft, items.len(), Utc::now()) {
        Ok(e) => e,
        Err(r) => return AddOutcome::Rejected(r),
    };

    let saved = serde_json::to_value(&entry)
        .map_err(AnnotatorError::from)
        .and_then(|item| {
            items.push(item);
            store::save_items(dataset_path, &items)
        });
    if let Err(error) = saved {
        warn!("{}", error);
        return AddOutcome::SaveFailed {
            dataset_path: dataset_path.to_path_buf(),
            error,
        };
    }

    info!(
        "Added entry {} ({} page {}) to '{}'",
        entry.id,
        entry.pdf_name,
        entry.page,
        dataset_path.display()
    );
    AddOutcome::Added {
        entry,
        position: items.len(),
        dataset_path: dataset_path.to_path_buf(),
    }
}
