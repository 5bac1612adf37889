//! Core library for post-analyzer.
//!
//! This crate provides the foundational types and functionality used by the
//! `post-analyzer` CLI and any downstream consumers.
//!
//! # Modules
//!
//! - [`analysis`] - Word/sentence metrics and editorial suggestions
//! - [`text`] - Word counting, sentence splitting, link detection
//! - [`extract`] - PDF and OCR text extraction backends
//! - [`session`] - Extraction session state machine
//! - [`export`] - Saving extracted text to disk
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use post_analyzer_core::analysis;
//!
//! let report = analysis::analyze("Hello world.");
//! assert_eq!(report.word_count, 2);
//! assert_eq!(report.sentence_count, 1);
//! ```
#![deny(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod session;
pub mod text;

pub use analysis::{AnalysisReport, Suggestion, Thresholds, analyze, analyze_with};
pub use config::{Config, ConfigLoader, LogLevel};
pub use error::{ConfigError, ConfigResult, ExtractError, ExtractResult};
pub use extract::{ExtractMode, Extractor, InputFile, MediaKind};
pub use session::{Session, SessionEvent, SessionState};

/// Default maximum input size in bytes (25 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 25 * 1024 * 1024;
