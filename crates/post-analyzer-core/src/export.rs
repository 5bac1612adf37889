//! Saving extracted text as a plain-text file.

use camino::{Utf8Path, Utf8PathBuf};

/// File name used when the caller does not choose one.
pub const DEFAULT_FILE_NAME: &str = "extracted-text.txt";

/// Resolve where a download should land.
///
/// An explicit path wins; a directory gets [`DEFAULT_FILE_NAME`] appended;
/// with no path at all the default name in `base_dir` is used.
pub fn resolve_target(explicit: Option<&Utf8Path>, base_dir: &Utf8Path) -> Utf8PathBuf {
    match explicit {
        Some(path) if path.is_dir() => path.join(DEFAULT_FILE_NAME),
        Some(path) => path.to_path_buf(),
        None => base_dir.join(DEFAULT_FILE_NAME),
    }
}

/// Write text verbatim to `path`, replacing any existing file.
///
/// Empty text produces an empty file.
#[tracing::instrument(skip(text), fields(path = %path, bytes = text.len()))]
pub fn save_text(path: &Utf8Path, text: &str) -> std::io::Result<()> {
    std::fs::write(path.as_std_path(), text)?;
    tracing::info!("extracted text saved");
    Ok(())
}
