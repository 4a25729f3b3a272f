//! # pdfqa-annotator
//!
//! Build page-anchored question/answer datasets from a directory of PDFs, for
//! evaluating multimodal question-answering systems.
//!
//! An annotator scans a directory, previews a page (rendered bitmap plus its
//! extracted text), writes a question and its ground-truth answer, optionally
//! fills in type-specific structured metadata, and appends the result to a
//! JSON dataset file. The library is the core of that loop; forms, sliders
//! and windows belong to whatever presentation layer calls it.
//!
//! ## Pipeline Overview
//!
//! ```text
//! directory
//!  │
//!  ├─ 1. Catalog   name → path for every *.pdf (case-insensitive), sorted
//!  ├─ 2. Render    page bitmap at 2× + plain text, page clamped into range
//!  ├─ 3. Template  editable JSON skeleton per question type
//!  ├─ 4. Entry     validate, mint `{stem}_p{page}_q{NNNN}`, timestamp
//!  └─ 5. Store     load list → append → rewrite file
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfqa_annotator::{AnnotationSession, AnnotatorConfig, EntryDraft};
//!
//! let mut session = AnnotationSession::new(AnnotatorConfig::default());
//! println!("{}", session.scan("./pdfs"));
//!
//! let view = session.select_pdf("manual.pdf");
//! println!("{}", view.status());
//!
//! let draft = EntryDraft {
//!     pdf_name: "manual.pdf".into(),
//!     page: 1,
//!     question: "Which pin drives LD2?".into(),
//!     answer: "PA5".into(),
//!     question_type: "free_form".into(),
//!     structured_metadata: session.change_question_type("free_form"),
//! };
//! println!("{}", session.add_entry(&draft, ""));
//! ```
//!
//! ## Failure model
//!
//! No operation panics or returns `Err` to its caller. Scans, renders and
//! submissions all return values carrying a status; see [`error`] for the
//! two failure families.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfqa` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod pipeline;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{AnnotatorConfig, AnnotatorConfigBuilder};
pub use error::{AnnotatorError, Rejection};
pub use pipeline::catalog::{scan, PdfCatalog, ScanResult, ScanStatus};
pub use pipeline::entry::{
    add_entry, AddOutcome, DatasetEntry, EntryDraft, DEFAULT_DATASET_FILE,
};
pub use pipeline::render::{
    render_page_async, PageRender, PageRenderer, RenderStatus, RENDER_SCALE,
};
pub use pipeline::store::{
    load as load_dataset, load_items as load_dataset_items, save as save_dataset,
};
pub use pipeline::template::{template_for, QuestionType, StructuredTemplate};
pub use session::{AnnotationSession, PageView};
