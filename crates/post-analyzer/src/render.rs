//! Terminal rendering for reports and extraction progress.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use post_analyzer_core::{AnalysisReport, SessionState};

/// Shown when a report has no suggestions.
pub const NO_SUGGESTIONS: &str = "No specific suggestions. Looks good!";

/// Print an analysis report as indented text.
pub fn print_report(report: &AnalysisReport) {
    println!("{}", "Analysis".cyan().bold());
    println!("  Word count: {}", report.word_count);
    println!("  Sentence count: {}", report.sentence_count);
    println!("  Avg words/sentence: {}", report.avg_words_per_sentence);

    println!("\n{}", "Suggestions".cyan().bold());
    if report.looks_good() {
        println!("  {}", NO_SUGGESTIONS.green());
    } else {
        for suggestion in &report.suggestions {
            println!("  {} {suggestion}", "•".yellow());
        }
    }
}

/// Status line for a loading state, e.g. `OCR in progress — 40%`.
pub fn loading_line(message: &str, progress: Option<u8>) -> String {
    match progress {
        Some(percent) => format!("{message} — {percent}%"),
        None => message.to_string(),
    }
}

/// Progress bar that mirrors a session's loading state.
pub struct ProgressView {
    bar: ProgressBar,
    hidden: bool,
}

impl ProgressView {
    /// Create a progress view; `hidden` suppresses all drawing.
    pub fn new(hidden: bool) -> Self {
        Self {
            bar: new_bar(hidden),
            hidden,
        }
    }

    /// Reflect a session state transition.
    ///
    /// A `Loading` state after a finished attempt starts a fresh bar.
    pub fn update(&mut self, state: &SessionState) {
        match state {
            SessionState::Loading { message, progress } => {
                if self.bar.is_finished() {
                    self.bar = new_bar(self.hidden);
                }
                self.bar.set_message(loading_line(message, *progress));
                self.bar.set_position(u64::from(progress.unwrap_or(0)));
            }
            SessionState::Success { .. } | SessionState::Failed { .. } | SessionState::Idle => {
                self.bar.finish_and_clear();
            }
        }
    }
}

fn new_bar(hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(100);
    let style =
        ProgressStyle::with_template("{spinner:.green} [{bar:30.cyan/blue}] {pos:>3}% {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
    bar.set_style(style);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

impl Drop for ProgressView {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
