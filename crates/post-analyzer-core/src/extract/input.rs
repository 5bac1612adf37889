//! Input file acquisition and type detection.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};

use super::{ExtractMode, MediaKind};
use crate::error::{ExtractError, ExtractResult};

/// Fallback MIME type when neither content nor extension identify the file.
const OCTET_STREAM: &str = "application/octet-stream";

/// A single selected file, read fully into memory.
#[derive(Debug, Clone)]
pub struct InputFile {
    path: Utf8PathBuf,
    bytes: Arc<[u8]>,
    mime: String,
}

impl InputFile {
    /// Load the selected file, or fail with [`ExtractError::NoFile`] when
    /// nothing was selected.
    pub fn from_selection(
        path: Option<&Utf8Path>,
        max_bytes: Option<usize>,
    ) -> ExtractResult<Self> {
        let path = path.ok_or(ExtractError::NoFile)?;
        Self::load(path, max_bytes)
    }

    /// Read a file from disk and detect its MIME type.
    ///
    /// The size is checked against `max_bytes` via metadata before the file
    /// is read into memory.
    #[tracing::instrument(skip(max_bytes), fields(path = %path))]
    pub fn load(path: &Utf8Path, max_bytes: Option<usize>) -> ExtractResult<Self> {
        let metadata = std::fs::metadata(path.as_std_path())?;
        if let Some(limit) = max_bytes {
            let size = metadata.len();
            if size > limit as u64 {
                return Err(ExtractError::TooLarge {
                    path: path.to_path_buf(),
                    size,
                    limit,
                });
            }
        }

        let bytes = std::fs::read(path.as_std_path())?;
        let file = Self::from_bytes(path, bytes);
        tracing::debug!(mime = %file.mime, size = file.bytes.len(), "input file loaded");
        Ok(file)
    }

    /// Wrap bytes that are already in memory.
    ///
    /// `path` is used for extension-based type detection and for messages;
    /// it does not need to exist.
    pub fn from_bytes(path: impl Into<Utf8PathBuf>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let path = path.into();
        let bytes = bytes.into();
        let mime = detect_mime(&path, &bytes);
        Self { path, bytes, mime }
    }

    /// Path the file was selected from.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// File contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Shared handle to the contents, for moving onto a worker thread.
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    /// Detected MIME type.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Media category, if the file is a PDF or an image.
    pub fn kind(&self) -> Option<MediaKind> {
        MediaKind::from_mime(&self.mime)
    }

    /// Resolve the requested mode against the detected type.
    ///
    /// Returns the concrete mode to run, or [`ExtractError::WrongType`] when
    /// the file does not fit it.
    pub fn resolve_mode(&self, requested: ExtractMode) -> ExtractResult<ExtractMode> {
        match (requested, self.kind()) {
            (ExtractMode::Pdf, Some(MediaKind::Document)) => Ok(ExtractMode::Pdf),
            (ExtractMode::Pdf, _) => Err(ExtractError::WrongType(
                "Please upload a PDF file".to_string(),
            )),
            (ExtractMode::Image, Some(MediaKind::Image)) => Ok(ExtractMode::Image),
            (ExtractMode::Image, _) => Err(ExtractError::WrongType(
                "Please upload an image file".to_string(),
            )),
            (ExtractMode::Auto, Some(kind)) => Ok(kind.mode()),
            (ExtractMode::Auto, None) => Err(ExtractError::WrongType(format!(
                "Please upload a PDF or image file ({} is {})",
                self.path, self.mime
            ))),
        }
    }
}

/// Sniff the MIME type from magic bytes, then from the extension.
fn detect_mime(path: &Utf8Path, bytes: &[u8]) -> String {
    if let Some(kind) = infer::get(bytes) {
        return kind.mime_type().to_string();
    }
    mime_guess::from_path(path.as_std_path())
        .first()
        .map_or_else(|| OCTET_STREAM.to_string(), |m| m.essence_str().to_string())
}
