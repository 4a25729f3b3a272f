//! The five entry points a presentation layer calls.
//!
//! An [`AnnotationSession`] is the explicit context that replaces hidden UI
//! state: it remembers the last scanned directory and its catalog so page
//! navigation and entry submission never re-scan. The hosting layer owns the
//! session and passes it to every call.
//!
//! | UI action            | method                                   |
//! |----------------------|------------------------------------------|
//! | scan catalog         | [`AnnotationSession::scan`]              |
//! | select/open PDF      | [`AnnotationSession::select_pdf`]        |
//! | change page          | [`AnnotationSession::change_page`]       |
//! | change question type | [`AnnotationSession::change_question_type`] |
//! | add entry            | [`AnnotationSession::add_entry`]         |

use crate::config::AnnotatorConfig;
use crate::pipeline::catalog::{self, PdfCatalog, ScanStatus};
use crate::pipeline::entry::{self, AddOutcome, EntryDraft};
use crate::pipeline::render::{PageRender, PageRenderer};
use crate::pipeline::template;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Status for page requests made before a valid PDF is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoPdfSelected;

impl fmt::Display for NoPdfSelected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("No PDF selected.")
    }
}

/// What the preview pane shows after a select or page change.
#[derive(Debug)]
pub enum PageView {
    /// The name was blank or not in the catalog; nothing was opened.
    NoSelection(NoPdfSelected),
    Rendered(PageRender),
}

impl PageView {
    pub fn render(&self) -> Option<&PageRender> {
        match self {
            PageView::Rendered(r) => Some(r),
            PageView::NoSelection(_) => None,
        }
    }

    /// Inclusive page-navigation bounds. Always at least `(1, 1)`.
    pub fn page_bounds(&self) -> (usize, usize) {
        let total = self.render().map_or(0, |r| r.total_pages);
        (1, total.max(1))
    }

    pub fn status(&self) -> String {
        match self {
            PageView::NoSelection(s) => s.to_string(),
            PageView::Rendered(r) => r.status.to_string(),
        }
    }
}

/// Catalog, directory and renderer shared across one editing session.
#[derive(Debug, Default)]
pub struct AnnotationSession {
    config: AnnotatorConfig,
    directory: PathBuf,
    catalog: PdfCatalog,
    renderer: PageRenderer,
}

impl AnnotationSession {
    pub fn new(config: AnnotatorConfig) -> Self {
        let renderer = PageRenderer::new(config.pdfium_library.clone());
        Self {
            config,
            directory: PathBuf::new(),
            catalog: PdfCatalog::new(),
            renderer,
        }
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &PdfCatalog {
        &self.catalog
    }

    /// Directory of the last scan, as typed (trimmed).
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Scan `directory` and replace the session catalog with the result.
    pub fn scan(&mut self, directory: &str) -> ScanStatus {
        let result = catalog::scan(directory);
        self.directory = PathBuf::from(directory.trim());
        self.catalog = result.catalog;
        result.status
    }

    /// Open a PDF at page 1.
    pub fn select_pdf(&self, pdf_name: &str) -> PageView {
        self.change_page(pdf_name, 1)
    }

    /// Render `page` of an already catalogued PDF.
    pub fn change_page(&self, pdf_name: &str, page: usize) -> PageView {
        match self.catalog.get(pdf_name) {
            Some(path) => PageView::Rendered(self.renderer.render(path, page)),
            None => {
                debug!("Page request for unknown PDF '{}'", pdf_name);
                PageView::NoSelection(NoPdfSelected)
            }
        }
    }

    /// Template text for the metadata box.
    pub fn change_question_type(&self, question_type: &str) -> String {
        template::template_for(question_type)
    }

    /// Template for the configured default type, for a fresh form.
    pub fn initial_template(&self) -> String {
        template::template_for(self.config.default_question_type.as_str())
    }

    /// Validate and append an entry. A blank `dataset_path` means the
    /// configured default.
    pub fn add_entry(&self, draft: &EntryDraft, dataset_path: &str) -> AddOutcome {
        let path = entry::resolve_dataset_path(dataset_path, &self.config.dataset_path);
        entry::append_entry(&self.catalog, draft, &path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Rejection;

    #[test]
    fn unknown_pdf_yields_no_selection() {
        let s = AnnotationSession::default();
        let v = s.select_pdf("missing.pdf");
        assert!(matches!(v, PageView::NoSelection(_)));
        assert_eq!(v.page_bounds(), (1, 1));
        assert_eq!(v.status(), "No PDF selected.");

        let v = s.change_page("", 5);
        assert!(v.render().is_none());
    }

    #[test]
    fn stale_catalog_entry_reports_not_found() {
        let mut s = AnnotationSession::default();
        s.catalog.insert("gone.pdf", "/definitely/not/gone.pdf");
        let v = s.change_page("gone.pdf", 2);
        let r = v.render().expect("rendered view");
        assert!(!r.is_loaded());
        assert_eq!(v.page_bounds(), (1, 1));
        assert!(v.status().contains("not found"));
    }

    #[test]
    fn failed_scan_clears_previous_catalog() {
        let mut s = AnnotationSession::default();
        s.catalog.insert("old.pdf", "/x/old.pdf");
        let status = s.scan("/definitely/not/a/real/dir");
        assert!(matches!(status, ScanStatus::DirectoryNotFound { .. }));
        assert!(s.catalog().is_empty());
    }

    #[test]
    fn add_entry_without_selection_is_rejected() {
        let s = AnnotationSession::default();
        let draft = EntryDraft {
            pdf_name: "a.pdf".into(),
            page: 1,
            question: "q".into(),
            answer: "a".into(),
            ..Default::default()
        };
        let out = s.add_entry(&draft, "");
        assert!(matches!(out, AddOutcome::Rejected(Rejection::NoPdfSelected)));
    }

    #[test]
    fn initial_template_follows_config() {
        let config = AnnotatorConfig::builder()
            .default_question_type(crate::QuestionType::TruthTable)
            .build()
            .unwrap();
        let s = AnnotationSession::new(config);
        assert_eq!(s.initial_template(), s.change_question_type("truth_table"));
    }
}
