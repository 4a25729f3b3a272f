//! Page preview: rasterise one PDF page via pdfium and extract its text.
//!
//! Every call is a fresh open → render → close cycle. The `PdfDocument` lives
//! only inside [`PageRenderer::render`], so it is dropped (and the pdfium
//! handle released) on every return path: not-found, open failure, zero
//! pages, render failure and success alike. Only the library binding is kept
//! between calls.
//!
//! Out-of-range page numbers are clamped, never rejected: a UI slider with
//! stale bounds still gets the nearest valid page.

use crate::error::AnnotatorError;
use crate::pipeline::encode;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::cell::OnceCell;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Magnification applied when rasterising (2× keeps body text legible).
pub const RENDER_SCALE: f32 = 2.0;

/// Environment variable naming an explicit libpdfium to bind.
pub const PDFIUM_LIB_ENV: &str = "PDFIUM_LIB_PATH";

/// Outcome of one render call.
#[derive(Debug)]
pub enum RenderStatus {
    /// The page was rasterised; `page` is the page actually shown after clamping.
    Loaded {
        page: usize,
        total_pages: usize,
        file_name: String,
    },
    Failed(AnnotatorError),
}

impl fmt::Display for RenderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStatus::Loaded {
                page,
                total_pages,
                file_name,
            } => write!(f, "Loaded page {page} / {total_pages} from '{file_name}'."),
            RenderStatus::Failed(e) => write!(f, "{e}"),
        }
    }
}

/// Bitmap, text and page count for one (pdf, page) request.
///
/// On any failure `image` is `None`, `text` is empty and `total_pages` is 0.
#[derive(Debug)]
pub struct PageRender {
    pub image: Option<DynamicImage>,
    pub text: String,
    pub total_pages: usize,
    pub status: RenderStatus,
}

impl PageRender {
    pub(crate) fn failed(error: AnnotatorError) -> Self {
        debug!("Render failed: {}", error);
        Self {
            image: None,
            text: String::new(),
            total_pages: 0,
            status: RenderStatus::Failed(error),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.status, RenderStatus::Loaded { .. })
    }

    /// The 1-based page that was rendered, if any.
    pub fn page(&self) -> Option<usize> {
        match self.status {
            RenderStatus::Loaded { page, .. } => Some(page),
            RenderStatus::Failed(_) => None,
        }
    }

    /// The error behind a failed render.
    pub fn error(&self) -> Option<&AnnotatorError> {
        match &self.status {
            RenderStatus::Failed(e) => Some(e),
            RenderStatus::Loaded { .. } => None,
        }
    }

    /// Write the bitmap to `path` as PNG. Returns `Ok(false)` when there is
    /// no bitmap to write.
    pub fn save_png(&self, path: &Path) -> Result<bool, image::ImageError> {
        match &self.image {
            Some(img) => encode::write_png(img, path).map(|()| true),
            None => Ok(false),
        }
    }
}

/// Clamp a requested 1-based page into `[1, total_pages]`.
///
/// `total_pages` must be at least 1.
pub fn clamp_page(requested: usize, total_pages: usize) -> usize {
    requested.clamp(1, total_pages.max(1))
}

/// Bind to a pdfium library.
///
/// Resolution order: the explicit `library` path, then `PDFIUM_LIB_PATH`,
/// then a platform library in the working directory, then the system library.
pub fn bind_pdfium(library: Option<&Path>) -> Result<Pdfium, AnnotatorError> {
    let explicit = library
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(PDFIUM_LIB_ENV).map(PathBuf::from));

    let bindings = match explicit {
        Some(path) => Pdfium::bind_to_library(&path).map_err(|e| {
            AnnotatorError::PdfiumBindingFailed(format!("{}: {}", path.display(), e))
        })?,
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| AnnotatorError::PdfiumBindingFailed(e.to_string()))?,
    };

    Ok(Pdfium::new(bindings))
}

/// Renders pages on demand, binding pdfium lazily on first use.
///
/// Not `Sync`: the renderer belongs to one session. Use
/// [`render_page_async`] to render from async code.
pub struct PageRenderer {
    library: Option<PathBuf>,
    pdfium: OnceCell<Pdfium>,
}

impl fmt::Debug for PageRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageRenderer")
            .field("library", &self.library)
            .field("bound", &self.pdfium.get().is_some())
            .finish()
    }
}

impl Default for PageRenderer {
    fn default() -> Self {
        Self::new(None)
    }
}

impl PageRenderer {
    /// Create a renderer. `library` overrides the libpdfium lookup.
    pub fn new(library: Option<PathBuf>) -> Self {
        Self {
            library,
            pdfium: OnceCell::new(),
        }
    }

    fn pdfium(&self) -> Result<&Pdfium, AnnotatorError> {
        if let Some(p) = self.pdfium.get() {
            return Ok(p);
        }
        let bound = bind_pdfium(self.library.as_deref())?;
        Ok(self.pdfium.get_or_init(|| bound))
    }

    fn open<'a>(&'a self, pdf_path: &Path) -> Result<PdfDocument<'a>, AnnotatorError> {
        if !pdf_path.exists() {
            return Err(AnnotatorError::FileNotFound {
                path: pdf_path.to_path_buf(),
            });
        }
        self.pdfium()?
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| AnnotatorError::OpenFailed {
                path: pdf_path.to_path_buf(),
                detail: e.to_string(),
            })
    }

    /// Number of pages in a PDF, without rendering anything.
    pub fn page_count(&self, pdf_path: &Path) -> Result<usize, AnnotatorError> {
        let document = self.open(pdf_path)?;
        Ok(document.pages().len() as usize)
    }

    /// Render the 1-based `page_number` of `pdf_path`. Never panics, never
    /// returns an error: failures are carried in [`PageRender::status`].
    pub fn render(&self, pdf_path: &Path, page_number: usize) -> PageRender {
        let document = match self.open(pdf_path) {
            Ok(d) => d,
            Err(e) => return PageRender::failed(e),
        };

        let total_pages = document.pages().len() as usize;
        if total_pages == 0 {
            return PageRender::failed(AnnotatorError::NoPages);
        }

        let page = clamp_page(page_number, total_pages);
        if page != page_number {
            debug!(
                "Clamped page {} to {} (total={})",
                page_number, page, total_pages
            );
        }

        match render_document_page(&document, page) {
            Ok((image, text)) => {
                debug!(
                    "Rendered page {} → {}x{} px, {} chars of text",
                    page,
                    image.width(),
                    image.height(),
                    text.len()
                );
                let file_name = pdf_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                PageRender {
                    image: Some(image),
                    text,
                    total_pages,
                    status: RenderStatus::Loaded {
                        page,
                        total_pages,
                        file_name,
                    },
                }
            }
            Err(e) => {
                warn!("{}", e);
                PageRender::failed(e)
            }
        }
    }
}

/// Rasterise one page of an open document and pull its text layer.
fn render_document_page(
    document: &PdfDocument<'_>,
    page: usize,
) -> Result<(DynamicImage, String), AnnotatorError> {
    let index = PdfPageIndex::try_from(page - 1).map_err(|_| AnnotatorError::RenderFailed {
        page,
        detail: "page index exceeds pdfium range".to_string(),
    })?;

    let pdf_page = document
        .pages()
        .get(index)
        .map_err(|e| AnnotatorError::RenderFailed {
            page,
            detail: e.to_string(),
        })?;

    let render_config = PdfRenderConfig::new().scale_page_by_factor(RENDER_SCALE);
    let bitmap = pdf_page
        .render_with_config(&render_config)
        .map_err(|e| AnnotatorError::RenderFailed {
            page,
            detail: e.to_string(),
        })?;
    let image = bitmap.as_image();

    // Image-only pages have no text layer; that is not an error.
    let text = match pdf_page.text() {
        Ok(t) => t.all(),
        Err(e) => {
            debug!("No text layer on page {}: {}", page, e);
            String::new()
        }
    };

    Ok((image, text))
}

/// Render a page from async code.
///
/// pdfium is blocking and not async-safe, so the whole open/render/close
/// cycle (including binding) runs on the blocking thread pool.
pub async fn render_page_async(
    library: Option<PathBuf>,
    pdf_path: PathBuf,
    page_number: usize,
) -> PageRender {
    tokio::task::spawn_blocking(move || PageRenderer::new(library).render(&pdf_path, page_number))
        .await
        .unwrap_or_else(|e| {
            PageRender::failed(AnnotatorError::RenderFailed {
                page: page_number,
                detail: format!("Render task panicked: {e}"),
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_pages_in_range() {
        assert_eq!(clamp_page(0, 10), 1);
        assert_eq!(clamp_page(1, 10), 1);
        assert_eq!(clamp_page(7, 10), 7);
        assert_eq!(clamp_page(10, 10), 10);
        assert_eq!(clamp_page(1000, 10), 10);
        assert_eq!(clamp_page(3, 1), 1);
    }

    #[test]
    fn missing_file_is_reported_not_raised() {
        let renderer = PageRenderer::default();
        let path = Path::new("/definitely/not/a/real/file.pdf");

        for _ in 0..2 {
            let r = renderer.render(path, 1);
            assert!(r.image.is_none());
            assert!(r.text.is_empty());
            assert_eq!(r.total_pages, 0);
            assert!(matches!(
                r.error(),
                Some(AnnotatorError::FileNotFound { .. })
            ));
            assert!(r.status.to_string().contains("not found"));
        }
        // The not-found check runs before any binding attempt.
        assert!(renderer.pdfium.get().is_none());
    }

    #[test]
    fn loaded_status_display() {
        let s = RenderStatus::Loaded {
            page: 3,
            total_pages: 12,
            file_name: "manual.pdf".into(),
        };
        assert_eq!(s.to_string(), "Loaded page 3 / 12 from 'manual.pdf'.");
    }

    #[test]
    fn render_failure_after_open_is_its_own_status() {
        let r = PageRender::failed(AnnotatorError::RenderFailed {
            page: 4,
            detail: "bitmap allocation failed".into(),
        });
        assert!(r.image.is_none());
        assert!(r.text.is_empty());
        assert_eq!(r.total_pages, 0);
        assert_eq!(r.page(), None);
        assert!(matches!(
            r.error(),
            Some(AnnotatorError::RenderFailed { page: 4, .. })
        ));
        let status = r.status.to_string();
        assert!(status.contains("Error rendering page 4"), "{status}");
        assert!(!status.contains("opening"), "{status}");
    }

    #[test]
    fn save_png_without_bitmap_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("p.png");
        let r = PageRender::failed(AnnotatorError::NoPages);
        assert!(!r.save_png(&out).unwrap());
        assert!(!out.exists());
    }
}
