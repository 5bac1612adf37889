//! Analyze command — editorial metrics for a plain-text file.

use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use post_analyzer_core::analysis::{self, Thresholds};

use super::read_input_file;
use crate::render;

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Text file to analyze.
    pub file: Utf8PathBuf,

    /// Word count below which the post is flagged as short.
    #[arg(long)]
    pub min_words: Option<usize>,

    /// Average sentence length above which sentences are flagged as long.
    #[arg(long)]
    pub max_sentence_words: Option<usize>,
}

/// Analyze a text file and print the report.
#[instrument(name = "cmd_analyze", skip_all, fields(file = %args.file))]
pub fn cmd_analyze(
    args: AnalyzeArgs,
    global_json: bool,
    config_thresholds: Thresholds,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = %args.file, "executing analyze command");

    let content = read_input_file(&args.file, max_input_bytes)?;

    let thresholds = Thresholds {
        min_words: args.min_words.unwrap_or(config_thresholds.min_words),
        max_avg_sentence_words: args
            .max_sentence_words
            .unwrap_or(config_thresholds.max_avg_sentence_words),
    };
    let report = analysis::analyze_with(&content, &thresholds);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}\n", args.file.bold());
        render::print_report(&report);
    }

    Ok(())
}
