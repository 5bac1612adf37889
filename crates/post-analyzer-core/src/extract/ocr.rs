//! OCR backend using the Tesseract command-line tool.
//!
//! Tesseract reads the image straight from the selected file's path and writes
//! recognized text to stdout. It does not report intermediate progress, so the
//! backend reports 0% when recognition starts and 100% when it finishes.

use std::process::Stdio;

use async_trait::async_trait;
use camino::Utf8PathBuf;
use tokio::process::Command;
use tracing::debug;

use super::{Extractor, InputFile, Progress};
use crate::error::{ExtractError, ExtractResult};

/// Default recognition language.
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Default executable name, resolved on `PATH`.
pub const DEFAULT_TESSERACT: &str = "tesseract";

/// Recognizes text in images via `tesseract <image> stdout -l <lang>`.
#[derive(Debug, Clone)]
pub struct OcrExtractor {
    binary: Utf8PathBuf,
    language: String,
}

impl OcrExtractor {
    /// Create an OCR extractor for the given executable and language.
    pub fn new(binary: impl Into<Utf8PathBuf>, language: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            language: language.into(),
        }
    }

    /// Recognition language passed to `-l`.
    pub fn language(&self) -> &str {
        &self.language
    }

    fn not_installed(&self) -> ExtractError {
        ExtractError::BackendNotAvailable(format!(
            "{} not found (install tesseract-ocr)",
            self.binary
        ))
    }
}

impl Default for OcrExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_TESSERACT, DEFAULT_LANGUAGE)
    }
}

#[async_trait]
impl Extractor for OcrExtractor {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn loading_message(&self) -> &'static str {
        "OCR in progress"
    }

    fn is_available(&self) -> bool {
        std::process::Command::new(self.binary.as_std_path())
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success())
    }

    #[tracing::instrument(skip_all, fields(path = %file.path(), language = %self.language))]
    async fn extract(&self, file: &InputFile, progress: &Progress) -> ExtractResult<String> {
        progress.report(0);

        let output = Command::new(self.binary.as_std_path())
            .arg(file.path().as_std_path())
            .arg("stdout")
            .args(["-l", &self.language])
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    self.not_installed()
                } else {
                    ExtractError::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::Failed(format!(
                "Failed OCR: {}",
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(chars = text.len(), "OCR finished");
        progress.report(100);
        Ok(text)
    }
}
