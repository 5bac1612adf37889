//! Error types for post-analyzer-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while acquiring a file or extracting its text.
///
/// The `Display` text of every variant is written for end users: it is shown
/// verbatim by the CLI and returned by the MCP server.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// No file was selected.
    #[error("no file selected")]
    NoFile,

    /// The file is not of the kind the selected mode accepts.
    #[error("{0}")]
    WrongType(String),

    /// The file exceeds the configured input limit.
    #[error("input too large: {path} is {size} bytes (limit: {limit} bytes)")]
    TooLarge {
        /// The offending file.
        path: Utf8PathBuf,
        /// Actual size in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// The extraction backend is not installed or cannot be started.
    #[error("extraction backend not available: {0}")]
    BackendNotAvailable(String),

    /// The backend ran but could not produce text.
    #[error("{0}")]
    Failed(String),

    /// Reading the input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    /// Whether re-running the same file through the same backend may succeed.
    ///
    /// Selection problems (no file, wrong type, too large) and a missing
    /// backend need user action first, so they are not retryable.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Failed(_) | Self::Io(_))
    }
}

/// Result type alias using [`ExtractError`].
pub type ExtractResult<T> = Result<T, ExtractError>;
