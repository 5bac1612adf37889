//! PDF text-layer extraction backed by `lopdf`.
//!
//! Pages are read in order. Within a page, text runs are joined with a single
//! space; every page is followed by a blank line (`"\n\n"`). Scanned PDFs
//! without a text layer produce blank pages rather than an error.

use async_trait::async_trait;
use lopdf::Document;
use tracing::{debug, warn};

use super::{Extractor, InputFile, Progress};
use crate::error::{ExtractError, ExtractResult};

/// Separator appended after each page.
const PAGE_BREAK: &str = "\n\n";

/// Extracts the embedded text layer of a PDF.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a PDF extractor.
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Extractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn loading_message(&self) -> &'static str {
        "Extracting text from PDF…"
    }

    fn is_available(&self) -> bool {
        true
    }

    #[tracing::instrument(skip_all, fields(path = %file.path(), size = file.bytes().len()))]
    async fn extract(&self, file: &InputFile, progress: &Progress) -> ExtractResult<String> {
        let bytes = file.shared_bytes();
        let progress = progress.clone();
        tokio::task::spawn_blocking(move || extract_pages(&bytes, &progress))
            .await
            .map_err(|e| ExtractError::Failed(format!("PDF extraction task failed: {e}")))?
    }
}

/// Parse a PDF from memory and collect the text of every page.
fn extract_pages(bytes: &[u8], progress: &Progress) -> ExtractResult<String> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| ExtractError::Failed(format!("Failed to parse PDF: {e}")))?;

    // BTreeMap keys are page numbers in ascending order.
    let pages = doc.get_pages();
    let total = pages.len();
    debug!(pages = total, "PDF loaded");

    let mut full_text = String::new();
    for (done, page_number) in pages.keys().enumerate() {
        match doc.extract_text(&[*page_number]) {
            Ok(raw) => full_text.push_str(&join_runs(&raw)),
            Err(e) => warn!(page = page_number, error = %e, "page text extraction failed"),
        }
        full_text.push_str(PAGE_BREAK);
        progress.report_fraction(done + 1, total);
    }

    Ok(full_text)
}

/// Collapse a page's line-separated text runs onto one line.
fn join_runs(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
