//! Logging setup: stderr output plus an optional log file.
//!
//! Filtering follows `RUST_LOG` when set; otherwise `-q`/`-v` and the
//! configured `log_level` decide. A file layer is added when a log path or
//! directory is configured.

use std::path::PathBuf;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const ENV_LOG_PATH: &str = "POST_ANALYZER_LOG_PATH";
const ENV_LOG_DIR: &str = "POST_ANALYZER_LOG_DIR";
const DEFAULT_LOG_FILE: &str = "post-analyzer.log";

/// Where (if anywhere) to write the log file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Explicit log file path; wins over `log_dir`.
    pub log_path: Option<PathBuf>,
    /// Directory for a `post-analyzer.log` file.
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Read the log destination from the environment, letting a configured
    /// directory take precedence over `POST_ANALYZER_LOG_DIR`.
    pub fn from_env_with_overrides(log_dir: Option<PathBuf>) -> Self {
        let env_path = std::env::var_os(ENV_LOG_PATH).map(PathBuf::from);
        let env_dir = std::env::var_os(ENV_LOG_DIR).map(PathBuf::from);
        Self {
            log_path: env_path,
            log_dir: log_dir.or(env_dir),
        }
    }

    /// Resolved log file as (directory, file name).
    fn file_target(&self) -> Option<(PathBuf, String)> {
        if let Some(path) = &self.log_path {
            let name = path.file_name()?.to_string_lossy().into_owned();
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), PathBuf::from);
            return Some((dir, name));
        }
        self.log_dir
            .as_ref()
            .map(|dir| (dir.clone(), DEFAULT_LOG_FILE.to_string()))
    }
}

/// Filter directive for the given verbosity flags and configured level.
fn filter_directive(quiet: bool, verbose: u8, level: &str) -> String {
    if quiet {
        return "error".to_string();
    }
    match verbose {
        0 => level.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Build the event filter. `RUST_LOG` overrides the flags when set.
pub fn env_filter(quiet: bool, verbose: u8, level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(quiet, verbose, level)))
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for the life of the program so buffered
/// file output is flushed on exit.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let (file_layer, guard) = match config.file_target() {
        Some((dir, name)) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(&dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(filter_directive(true, 2, "info"), "error");
    }

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(filter_directive(false, 0, "warn"), "warn");
        assert_eq!(filter_directive(false, 1, "warn"), "debug");
        assert_eq!(filter_directive(false, 3, "warn"), "trace");
    }

    #[test]
    fn explicit_path_beats_directory() {
        let config = ObservabilityConfig {
            log_path: Some(PathBuf::from("/tmp/logs/custom.log")),
            log_dir: Some(PathBuf::from("/var/log/other")),
        };
        assert_eq!(
            config.file_target(),
            Some((PathBuf::from("/tmp/logs"), "custom.log".to_string()))
        );
    }

    #[test]
    fn directory_uses_default_file_name() {
        let config = ObservabilityConfig {
            log_path: None,
            log_dir: Some(PathBuf::from("/var/log/pa")),
        };
        assert_eq!(
            config.file_target(),
            Some((PathBuf::from("/var/log/pa"), DEFAULT_LOG_FILE.to_string()))
        );
    }

    #[test]
    fn bare_file_name_logs_to_cwd() {
        let config = ObservabilityConfig {
            log_path: Some(PathBuf::from("run.log")),
            log_dir: None,
        };
        assert_eq!(
            config.file_target(),
            Some((PathBuf::from("."), "run.log".to_string()))
        );
    }

    #[test]
    fn no_destination_means_no_file() {
        assert!(ObservabilityConfig::default().file_target().is_none());
    }
}
