//! Directory scanning: build the name → path catalog of PDFs.
//!
//! The catalog is rebuilt on every scan and never persisted. Entries point at
//! paths that existed when the scan ran; later filesystem changes are not
//! tracked.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Display name → absolute path for every PDF in one directory.
///
/// Backed by a `BTreeMap` so iteration is always in filename order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfCatalog {
    entries: BTreeMap<String, PathBuf>,
}

impl PdfCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        self.entries.insert(name.into(), path.into());
    }

    /// Resolve a display name. Blank or unknown names yield `None`.
    pub fn get(&self, name: &str) -> Option<&Path> {
        if name.is_empty() {
            return None;
        }
        self.entries.get(name).map(PathBuf::as_path)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Display names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_path()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of a scan, distinguishing "nothing there" from "no such directory".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStatus {
    DirectoryNotFound { directory: String },
    NoPdfs { directory: PathBuf },
    Found { directory: PathBuf, count: usize },
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanStatus::DirectoryNotFound { directory } => {
                write!(f, "Directory not found: '{directory}'")
            }
            ScanStatus::NoPdfs { directory } => {
                write!(f, "No PDFs found in: '{}'", directory.display())
            }
            ScanStatus::Found { directory, count } => write!(
                f,
                "Found {count} PDF(s) in '{}'. Select one to preview.",
                directory.display()
            ),
        }
    }
}

/// Catalog plus the status line that describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub catalog: PdfCatalog,
    pub status: ScanStatus,
}

impl ScanResult {
    fn empty(status: ScanStatus) -> Self {
        Self {
            catalog: PdfCatalog::new(),
            status,
        }
    }

    /// `true` only when at least one PDF was catalogued.
    pub fn found(&self) -> bool {
        matches!(self.status, ScanStatus::Found { .. })
    }
}

/// Whether a file name carries a `.pdf` extension, in any letter case.
pub fn is_pdf_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Scan one directory (no recursion) for PDF files.
///
/// Never fails: a blank path, a missing directory or an unreadable one all
/// come back as an empty catalog with a `DirectoryNotFound` status.
pub fn scan(directory: &str) -> ScanResult {
    let trimmed = directory.trim();
    let not_found = || {
        ScanResult::empty(ScanStatus::DirectoryNotFound {
            directory: trimmed.to_string(),
        })
    };

    if trimmed.is_empty() {
        return not_found();
    }

    let dir = Path::new(trimmed);
    if !dir.is_dir() {
        debug!("Not a directory: {}", dir.display());
        return not_found();
    }

    let dir = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());

    let read_dir = match std::fs::read_dir(&dir) {
        Ok(rd) => rd,
        Err(e) => {
            warn!("Cannot list {}: {}", dir.display(), e);
            return not_found();
        }
    };

    let mut catalog = PdfCatalog::new();
    for entry in read_dir.flatten() {
        let name = match entry.file_name().into_string() {
            Ok(n) => n,
            Err(raw) => {
                debug!("Skipping non UTF-8 file name {:?}", raw);
                continue;
            }
        };
        if !is_pdf_name(&name) {
            continue;
        }
        let path = entry.path();
        if !path.is_file() {
            debug!("Skipping non-file entry {}", path.display());
            continue;
        }
        catalog.insert(name, path);
    }

    let status = if catalog.is_empty() {
        ScanStatus::NoPdfs {
            directory: dir.clone(),
        }
    } else {
        ScanStatus::Found {
            directory: dir.clone(),
            count: catalog.len(),
        }
    };
    info!("{}", status);

    ScanResult { catalog, status }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_extension_is_case_insensitive() {
        assert!(is_pdf_name("a.pdf"));
        assert!(is_pdf_name("A.PDF"));
        assert!(is_pdf_name("report.Pdf"));
        assert!(!is_pdf_name("notes.txt"));
        assert!(!is_pdf_name("pdf"));
        assert!(!is_pdf_name("archive.pdf.gz"));
    }

    #[test]
    fn catalog_rejects_blank_and_unknown_names() {
        let mut c = PdfCatalog::new();
        c.insert("a.pdf", "/docs/a.pdf");
        assert_eq!(c.get("a.pdf"), Some(Path::new("/docs/a.pdf")));
        assert!(c.get("").is_none());
        assert!(!c.contains("b.pdf"));
    }

    #[test]
    fn catalog_iterates_in_name_order() {
        let mut c = PdfCatalog::new();
        c.insert("b.pdf", "/x/b.pdf");
        c.insert("A.PDF", "/x/A.PDF");
        c.insert("a.pdf", "/x/a.pdf");
        let names: Vec<&str> = c.names().collect();
        assert_eq!(names, ["A.PDF", "a.pdf", "b.pdf"]);
    }

    #[test]
    fn blank_directory_is_not_found() {
        let r = scan("   ");
        assert!(r.catalog.is_empty());
        assert!(matches!(r.status, ScanStatus::DirectoryNotFound { .. }));
        assert!(!r.found());
    }

    #[test]
    fn missing_directory_is_not_found() {
        let r = scan("/definitely/not/a/real/dir");
        assert!(r.catalog.is_empty());
        assert!(!r.found());
        assert!(r.status.to_string().contains("not found"));
    }
}
