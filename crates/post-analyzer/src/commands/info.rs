//! Info command implementation

use clap::Args;
use owo_colors::OwoColorize;
use post_analyzer_core::config::{Config, ConfigSources};
use post_analyzer_core::extract::{Extractor, OcrExtractor};
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    min_words: usize,
    max_avg_sentence_words: usize,
    ocr_language: String,
    tesseract_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_input_bytes: Option<usize>,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        let thresholds = config.thresholds();
        let settings = config.extractor_settings();
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            min_words: thresholds.min_words,
            max_avg_sentence_words: thresholds.max_avg_sentence_words,
            ocr_language: settings.ocr_language,
            tesseract_path: settings.tesseract_path.into_string(),
            default_mode: config.default_mode.map(|m| m.as_str().to_string()),
            output_file: config.output_file.as_ref().map(|p| p.to_string()),
            max_input_bytes: config.max_input(),
        }
    }
}

#[derive(Serialize)]
struct BackendInfo {
    pdf: bool,
    ocr: bool,
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
    backends: BackendInfo,
}

/// Print package information
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `config` - Loaded configuration
/// * `sources` - Config source metadata from loading
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let settings = config.extractor_settings();
    let ocr = OcrExtractor::new(settings.tesseract_path, settings.ocr_language);
    let full_info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, sources),
        backends: BackendInfo {
            pdf: true,
            ocr: ocr.is_available(),
        },
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
        return Ok(());
    }

    println!(
        "{} {}",
        full_info.package.name.bold(),
        full_info.package.version.green()
    );
    if !full_info.package.description.is_empty() {
        println!("{}", full_info.package.description);
    }
    if !full_info.package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), full_info.package.license);
    }
    if !full_info.package.repository.is_empty() {
        println!(
            "{}: {}",
            "Repository".dimmed(),
            full_info.package.repository.cyan()
        );
    }

    let cfg = &full_info.config;
    println!();
    println!("{}", "Configuration".bold().underline());
    if let Some(ref path) = cfg.config_file {
        println!("{}: {}", "Config file".dimmed(), path.cyan());
    } else {
        println!("{}: {}", "Config file".dimmed(), "none loaded".yellow());
    }
    println!("{}: {}", "Log level".dimmed(), cfg.log_level);
    if let Some(ref dir) = cfg.log_dir {
        println!("{}: {}", "Log directory".dimmed(), dir);
    }
    print_opt("Default mode", cfg.default_mode.as_ref());
    print_opt("Output file", cfg.output_file.as_ref());
    match cfg.max_input_bytes {
        Some(limit) => println!("{}: {limit} bytes", "Input limit".dimmed()),
        None => println!("{}: {}", "Input limit".dimmed(), "disabled".yellow()),
    }

    println!();
    println!("{}", "Suggestions".bold().underline());
    println!("{}: {}", "Min words".dimmed(), cfg.min_words);
    println!(
        "{}: {}",
        "Max avg words/sentence".dimmed(),
        cfg.max_avg_sentence_words
    );

    println!();
    println!("{}", "Backends".bold().underline());
    println!("{}: {}", "PDF (lopdf)".dimmed(), "available".green());
    if full_info.backends.ocr {
        println!(
            "{}: {} ({}, lang {})",
            "OCR (tesseract)".dimmed(),
            "available".green(),
            cfg.tesseract_path,
            cfg.ocr_language
        );
    } else {
        println!(
            "{}: {} ({} not found)",
            "OCR (tesseract)".dimmed(),
            "unavailable".red(),
            cfg.tesseract_path
        );
    }

    Ok(())
}

/// Print an optional value or "(not set)".
fn print_opt<T: std::fmt::Display>(label: &str, value: Option<&T>) {
    match value {
        Some(v) => println!("{}: {}", label.dimmed(), v),
        None => println!("{}: {}", label.dimmed(), "(not set)".dimmed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use post_analyzer_core::ExtractMode;

    #[test]
    fn test_cmd_info_text_succeeds() {
        assert!(
            cmd_info(
                InfoArgs::default(),
                false,
                &Config::default(),
                &ConfigSources::default()
            )
            .is_ok()
        );
    }

    #[test]
    fn test_cmd_info_json_via_global() {
        assert!(
            cmd_info(
                InfoArgs::default(),
                true,
                &Config::default(),
                &ConfigSources::default()
            )
            .is_ok()
        );
    }

    #[test]
    fn test_config_info_defaults() {
        let info = ConfigInfo::from_config(&Config::default(), &ConfigSources::default());
        assert!(info.config_file.is_none());
        assert_eq!(info.log_level, "info");
        assert_eq!(info.min_words, 30);
        assert_eq!(info.max_avg_sentence_words, 25);
        assert_eq!(info.ocr_language, "eng");
        assert_eq!(info.tesseract_path, "tesseract");
        assert_eq!(
            info.max_input_bytes,
            Some(post_analyzer_core::DEFAULT_MAX_INPUT_BYTES)
        );
    }

    #[test]
    fn test_config_info_reflects_overrides() {
        let config = Config {
            min_words: Some(10),
            default_mode: Some(ExtractMode::Image),
            disable_input_limit: true,
            ..Config::default()
        };
        let info = ConfigInfo::from_config(&config, &ConfigSources::default());
        assert_eq!(info.min_words, 10);
        assert_eq!(info.default_mode.as_deref(), Some("image"));
        assert!(info.max_input_bytes.is_none());
    }
}
