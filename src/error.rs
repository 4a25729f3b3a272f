//! Error types for the pdfqa-annotator library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`AnnotatorError`] (**environment**): something outside the annotator's
//!   control went wrong (PDF missing or corrupt, libpdfium not loadable,
//!   dataset path not writable).
//!
//! * [`Rejection`] (**input shape**): the annotator submitted an entry that
//!   cannot be accepted yet (no PDF selected, blank question or answer). The
//!   dataset is never touched when a submission is rejected.
//!
//! Neither type is ever raised past a component boundary. The public
//! operations return status-carrying values ([`crate::pipeline::render::PageRender`],
//! [`crate::pipeline::entry::AddOutcome`], …) that embed these errors, so the
//! hosting UI can display the message and let the human correct and resubmit.

use std::path::PathBuf;
use thiserror::Error;

/// Environment failures surfaced by the renderer and the dataset store.
#[derive(Debug, Error)]
pub enum AnnotatorError {
    // ── PDF errors ────────────────────────────────────────────────────────
    /// The PDF path did not exist when the render was requested.
    #[error("PDF file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// pdfium refused to open the document (corrupt, unsupported, encrypted).
    #[error("Error opening PDF '{}': {detail}", path.display())]
    OpenFailed { path: PathBuf, detail: String },

    /// The document opened but contains no pages.
    #[error("PDF has no pages.")]
    NoPages,

    /// A single page could not be loaded or rasterised.
    #[error("Error rendering page {page}: {detail}")]
    RenderFailed { page: usize, detail: String },

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or place the library next to the binary."
    )]
    PdfiumBindingFailed(String),

    // ── Dataset errors ────────────────────────────────────────────────────
    /// Could not create the dataset directory or write the dataset file.
    #[error("Error saving dataset to '{}': {source}", path.display())]
    DatasetWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The entry list could not be serialised.
    #[error("Error serialising dataset: {0}")]
    Serialize(#[from] serde_json::Error),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Why an entry submission was turned away before touching the dataset.
///
/// Checks run in declaration order and the first failure wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The PDF name is blank or not part of the current catalog.
    #[error("Cannot add question: no valid PDF selected.")]
    NoPdfSelected,

    /// The question is empty after trimming.
    #[error("Question is empty.")]
    EmptyQuestion,

    /// The ground-truth answer is empty after trimming.
    #[error("Answer is empty.")]
    EmptyAnswer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_display() {
        let e = AnnotatorError::FileNotFound {
            path: PathBuf::from("/tmp/missing.pdf"),
        };
        let msg = e.to_string();
        assert!(msg.contains("not found"), "got: {msg}");
        assert!(msg.contains("missing.pdf"), "got: {msg}");
    }

    #[test]
    fn write_failure_keeps_source() {
        use std::error::Error as _;
        let e = AnnotatorError::DatasetWriteFailed {
            path: PathBuf::from("out/dataset.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.to_string().contains("dataset.json"));
        assert!(e.source().is_some());
    }

    #[test]
    fn rejections_have_distinct_messages() {
        let msgs = [
            Rejection::NoPdfSelected.to_string(),
            Rejection::EmptyQuestion.to_string(),
            Rejection::EmptyAnswer.to_string(),
        ];
        assert_ne!(msgs[0], msgs[1]);
        assert_ne!(msgs[1], msgs[2]);
        assert!(msgs[1].contains("Question"));
        assert!(msgs[2].contains("Answer"));
    }
}
