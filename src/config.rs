//! Session configuration.
//!
//! All session-wide knobs live in [`AnnotatorConfig`], built via
//! [`AnnotatorConfigBuilder`]. The render magnification is not configurable:
//! it is the fixed [`crate::pipeline::render::RENDER_SCALE`].

use crate::error::AnnotatorError;
use crate::pipeline::entry::DEFAULT_DATASET_FILE;
use crate::pipeline::template::QuestionType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for an [`crate::session::AnnotationSession`].
///
/// # Example
/// ```rust
/// use pdfqa_annotator::{AnnotatorConfig, QuestionType};
///
/// let config = AnnotatorConfig::builder()
///     .dataset_path("annotations/qa.json")
///     .default_question_type(QuestionType::MultipleChoice)
///     .build()
///     .unwrap();
/// assert_eq!(config.dataset_path.to_str(), Some("annotations/qa.json"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatorConfig {
    /// Dataset file used when an add-entry call passes a blank path.
    /// Default: `dataset.json` in the working directory.
    pub dataset_path: PathBuf,

    /// Explicit libpdfium to bind. When `None`, `PDFIUM_LIB_PATH`, the
    /// working directory and the system library are tried in that order.
    pub pdfium_library: Option<PathBuf>,

    /// Question type whose template seeds the metadata box. Default: `free_form`.
    pub default_question_type: QuestionType,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_FILE),
            pdfium_library: None,
            default_question_type: QuestionType::default(),
        }
    }
}

impl AnnotatorConfig {
    /// Create a new builder for `AnnotatorConfig`.
    pub fn builder() -> AnnotatorConfigBuilder {
        AnnotatorConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AnnotatorConfig`].
#[derive(Debug)]
pub struct AnnotatorConfigBuilder {
    config: AnnotatorConfig,
}

impl AnnotatorConfigBuilder {
    /// Blank paths keep the default.
    pub fn dataset_path(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if !path.as_os_str().to_string_lossy().trim().is_empty() {
            self.config.dataset_path = path;
        }
        self
    }

    pub fn pdfium_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library = Some(path.into());
        self
    }

    pub fn default_question_type(mut self, qtype: QuestionType) -> Self {
        self.config.default_question_type = qtype;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnnotatorConfig, AnnotatorError> {
        let c = &self.config;
        if let Some(ref lib) = c.pdfium_library {
            if !lib.is_file() {
                return Err(AnnotatorError::InvalidConfig(format!(
                    "pdfium library '{}' does not exist",
                    lib.display()
                )));
            }
        }
        if c.dataset_path.is_dir() {
            return Err(AnnotatorError::InvalidConfig(format!(
                "dataset path '{}' is a directory",
                c.dataset_path.display()
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = AnnotatorConfig::default();
        assert_eq!(c.dataset_path, PathBuf::from("dataset.json"));
        assert!(c.pdfium_library.is_none());
        assert_eq!(c.default_question_type, QuestionType::FreeForm);
    }

    #[test]
    fn blank_dataset_path_keeps_default() {
        let c = AnnotatorConfig::builder().dataset_path("  ").build().unwrap();
        assert_eq!(c.dataset_path, PathBuf::from("dataset.json"));
    }

    #[test]
    fn missing_pdfium_library_is_rejected() {
        let err = AnnotatorConfig::builder()
            .pdfium_library("/definitely/not/libpdfium.so")
            .build()
            .unwrap_err();
        assert!(matches!(err, AnnotatorError::InvalidConfig(_)));
    }

    #[test]
    fn directory_dataset_path_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = AnnotatorConfig::builder()
            .dataset_path(dir.path())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("directory"));
    }
}
