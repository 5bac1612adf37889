//! Extract command — pull text out of a PDF or image, then analyze it.

use anyhow::bail;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use post_analyzer_core::config::Config;
use post_analyzer_core::extract::{self, ExtractMode, InputFile};
use post_analyzer_core::{AnalysisReport, Session, SessionState, export};

use crate::render::{self, ProgressView};

/// Arguments for the `extract` subcommand.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// PDF or image file to extract text from.
    pub file: Option<Utf8PathBuf>,

    /// Extraction backend (defaults to the detected file type).
    #[arg(short, long, value_enum)]
    pub mode: Option<ExtractMode>,

    /// Save the extracted text (to `extracted-text.txt` unless --output is given).
    #[arg(short, long)]
    pub save: bool,

    /// Save the extracted text to this path (implies --save).
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,

    /// Retry failed extractions this many times.
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Skip the analysis and print only the extracted text.
    #[arg(long)]
    pub no_analysis: bool,

    /// OCR language(s) for tesseract (e.g. eng, deu, eng+fra).
    #[arg(long)]
    pub language: Option<String>,
}

#[derive(Serialize)]
struct ExtractOutput<'a> {
    file: &'a Utf8Path,
    mode: ExtractMode,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis: Option<&'a AnalysisReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved_to: Option<Utf8PathBuf>,
}

/// Extract text from a file, analyze it, and optionally save it.
#[instrument(name = "cmd_extract", skip_all, fields(file = ?args.file))]
pub async fn cmd_extract(
    args: ExtractArgs,
    global_json: bool,
    quiet: bool,
    config: &Config,
    cwd: &Utf8Path,
) -> anyhow::Result<()> {
    debug!(mode = ?args.mode, retries = args.retries, "executing extract command");

    let mut session = Session::new().with_thresholds(config.thresholds());

    let file = match InputFile::from_selection(args.file.as_deref(), config.max_input()) {
        Ok(file) => file,
        Err(err) => {
            session.reject(&err);
            return finish_failed(session.state());
        }
    };

    let requested = args.mode.or(config.default_mode).unwrap_or_default();
    let mode = match file.resolve_mode(requested) {
        Ok(mode) => mode,
        Err(err) => {
            session.reject(&err);
            return finish_failed(session.state());
        }
    };

    let mut settings = config.extractor_settings();
    if let Some(language) = args.language.clone() {
        settings.ocr_language = language;
    }
    let extractor = extract::extractor_for(mode, &settings);
    debug!(backend = extractor.name(), mime = file.mime(), "backend selected");

    let mut view = ProgressView::new(quiet || global_json);
    let mut attempt: u32 = 0;
    loop {
        let state = session
            .drive(extractor.as_ref(), &file, |state| view.update(state))
            .await;
        if state.can_retry() && attempt < args.retries {
            attempt += 1;
            warn!(attempt, max = args.retries, "extraction failed, retrying");
            continue;
        }
        break;
    }
    drop(view);

    let (text, report) = match session.into_state() {
        SessionState::Success { text, report } => (text, report),
        failed @ SessionState::Failed { .. } => return finish_failed(&failed),
        other => bail!("extraction ended in unexpected state: {other:?}"),
    };

    let saved_to = if args.save || args.output.is_some() {
        let explicit = args.output.as_deref().or(config.output_file.as_deref());
        let target = export::resolve_target(explicit, cwd);
        match export::save_text(&target, &text) {
            Ok(()) => Some(target),
            Err(e) => {
                // Saving is best-effort; the extraction itself succeeded.
                warn!(path = %target, error = %e, "failed to save extracted text");
                eprintln!(
                    "{} could not save to {target}: {e}",
                    "warning:".yellow().bold()
                );
                None
            }
        }
    } else {
        None
    };

    let analysis = (!args.no_analysis).then_some(&report);

    if global_json {
        let output = ExtractOutput {
            file: file.path(),
            mode,
            text: &text,
            analysis,
            saved_to,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}\n", file.path().bold());
    println!("{}", "Extracted Text".cyan().bold());
    if text.trim().is_empty() {
        println!("  {}", "(no text found)".dimmed());
    } else {
        println!("{}", text.trim_end());
    }
    if shows_analysis(&text)
        && let Some(report) = analysis
    {
        println!();
        render::print_report(report);
    }
    if let Some(path) = saved_to {
        println!("\n{} {path}", "Saved to".green());
    }

    Ok(())
}

/// Any extracted text, even whitespace, gets an analysis block.
const fn shows_analysis(text: &str) -> bool {
    !text.is_empty()
}

/// Turn a failed session state into the command's error.
fn finish_failed(state: &SessionState) -> anyhow::Result<()> {
    match state {
        SessionState::Failed {
            message,
            retryable: true,
        } => bail!("{message} (run again or pass --retries to retry)"),
        SessionState::Failed { message, .. } => bail!("{message}"),
        other => bail!("extraction ended in unexpected state: {other:?}"),
    }
}
