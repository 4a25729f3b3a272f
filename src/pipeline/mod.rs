//! Stages of the annotation pipeline.
//!
//! ## Data Flow
//!
//! ```text
//! catalog ──▶ render ──▶ encode            (preview)
//!    │
//!    └──────▶ entry ◀── template           (authoring)
//!               │
//!               ▼
//!             store                        (persistence)
//! ```
//!
//! 1. [`catalog`]: list the PDFs of one directory, sorted by name
//! 2. [`render`]: rasterise one page at 2× and pull its text layer
//! 3. [`encode`]: PNG / data-URI for whatever displays the preview
//! 4. [`template`]: per-question-type metadata skeletons
//! 5. [`entry`]: validate a submission, mint its id, append it
//! 6. [`store`]: whole-file JSON load and save

pub mod catalog;
pub mod encode;
pub mod entry;
pub mod render;
pub mod store;
pub mod template;
