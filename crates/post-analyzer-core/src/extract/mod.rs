//! Text extraction backends.
//!
//! Extraction is abstracted behind the [`Extractor`] trait so the session and
//! presentation layers never depend on which engine is active:
//!
//! - [`PdfExtractor`]: reads the PDF text layer with `lopdf`
//! - [`OcrExtractor`]: recognizes text in images with the `tesseract` CLI
//!
//! Use [`extractor_for`] to pick the backend for an [`ExtractMode`].

pub mod input;
pub mod ocr;
pub mod pdf;

use std::sync::Arc;

use async_trait::async_trait;
use camino::Utf8PathBuf;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ExtractResult;

pub use input::InputFile;
pub use ocr::OcrExtractor;
pub use pdf::PdfExtractor;

/// Which extraction backend the caller wants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ExtractMode {
    /// Choose from the detected file type.
    #[default]
    Auto,
    /// Extract the PDF text layer.
    Pdf,
    /// Run OCR on an image.
    Image,
}

impl ExtractMode {
    /// Returns the mode as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Pdf => "pdf",
            Self::Image => "image",
        }
    }
}

impl std::fmt::Display for ExtractMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad media category of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// A PDF document.
    Document,
    /// Any raster image.
    Image,
}

impl MediaKind {
    /// Classify a MIME type. Returns `None` for anything that is neither a
    /// PDF nor an image.
    pub fn from_mime(mime: &str) -> Option<Self> {
        if mime == "application/pdf" {
            Some(Self::Document)
        } else if mime.starts_with("image/") {
            Some(Self::Image)
        } else {
            None
        }
    }

    /// The concrete mode that handles this kind.
    pub const fn mode(&self) -> ExtractMode {
        match self {
            Self::Document => ExtractMode::Pdf,
            Self::Image => ExtractMode::Image,
        }
    }
}

/// Optional progress callback receiving a percentage in `0..=100`.
///
/// Cheap to clone; clones share the same callback.
#[derive(Clone, Default)]
pub struct Progress {
    sink: Option<Arc<dyn Fn(u8) + Send + Sync>>,
}

impl Progress {
    /// Wrap a callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        Self {
            sink: Some(Arc::new(callback)),
        }
    }

    /// A progress handle that discards every report.
    pub fn none() -> Self {
        Self::default()
    }

    /// Report a percentage. Values above 100 are clamped.
    pub fn report(&self, percent: u8) {
        if let Some(ref sink) = self.sink {
            sink(percent.min(100));
        }
    }

    /// Report `done` of `total` units of work as a rounded percentage.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn report_fraction(&self, done: usize, total: usize) {
        if total == 0 {
            self.report(100);
            return;
        }
        let percent = (done as f64 * 100.0 / total as f64).round();
        self.report(percent.clamp(0.0, 100.0) as u8);
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress")
            .field("enabled", &self.sink.is_some())
            .finish()
    }
}

/// A text extraction backend.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Short backend name for logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Status line shown while this backend is working.
    fn loading_message(&self) -> &'static str;

    /// Whether the backend's dependencies are present.
    fn is_available(&self) -> bool;

    /// Extract all text from `file`, reporting progress along the way.
    ///
    /// The returned text may be empty (a PDF without a text layer, an image
    /// without legible text).
    async fn extract(&self, file: &InputFile, progress: &Progress) -> ExtractResult<String>;
}

/// Settings shared by the extraction backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorSettings {
    /// Tesseract language code(s), e.g. `eng` or `eng+deu`.
    pub ocr_language: String,
    /// Tesseract executable (name on `PATH` or absolute path).
    pub tesseract_path: Utf8PathBuf,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            ocr_language: ocr::DEFAULT_LANGUAGE.to_string(),
            tesseract_path: Utf8PathBuf::from(ocr::DEFAULT_TESSERACT),
        }
    }
}

/// Build the backend for a concrete mode.
///
/// `Auto` must be resolved first (see [`InputFile::resolve_mode`]); it falls
/// back to the PDF backend here.
pub fn extractor_for(mode: ExtractMode, settings: &ExtractorSettings) -> Box<dyn Extractor> {
    match mode {
        ExtractMode::Image => Box::new(OcrExtractor::new(
            settings.tesseract_path.clone(),
            settings.ocr_language.clone(),
        )),
        ExtractMode::Pdf | ExtractMode::Auto => Box::new(PdfExtractor::new()),
    }
}
