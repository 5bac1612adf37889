//! Editorial analysis of extracted text.
//!
//! Produces word and sentence counts plus up to three suggestions aimed at
//! social media posts. Every input, including the empty string, yields a
//! valid [`AnalysisReport`].
//!
//! The average words per sentence is rounded half away from zero
//! ([`f64::round`]). Both operands are non-negative, so this is the same as
//! rounding half up.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::text;

/// Default word count below which a post is considered short.
pub const DEFAULT_MIN_WORDS: usize = 30;

/// Default average sentence length (in words) above which sentences are long.
pub const DEFAULT_MAX_AVG_SENTENCE_WORDS: usize = 25;

/// Limits that decide which suggestions fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Thresholds {
    /// Posts with fewer words than this get [`Suggestion::ShortPost`].
    pub min_words: usize,
    /// Averages strictly above this get [`Suggestion::LongSentences`].
    pub max_avg_sentence_words: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_words: DEFAULT_MIN_WORDS,
            max_avg_sentence_words: DEFAULT_MAX_AVG_SENTENCE_WORDS,
        }
    }
}

/// An editorial suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Suggestion {
    /// The post has too few words.
    ShortPost,
    /// Sentences are too long on average.
    LongSentences,
    /// The post contains a link.
    ContainsLinks,
}

impl Suggestion {
    /// Human-readable advice for this suggestion.
    pub const fn message(&self) -> &'static str {
        match self {
            Self::ShortPost => {
                "Post is short — consider adding more context or a question to increase engagement."
            }
            Self::LongSentences => {
                "Sentences are long — break into shorter sentences for readability."
            }
            Self::ContainsLinks => "Contains links — add a short caption or CTA near the link.",
        }
    }
}

impl std::fmt::Display for Suggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of analyzing a piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisReport {
    /// Whitespace-delimited words in the trimmed text.
    pub word_count: usize,
    /// Non-empty sentence segments.
    pub sentence_count: usize,
    /// Rounded average of words per sentence (0 when there are no sentences).
    pub avg_words_per_sentence: usize,
    /// Suggestion messages in fixed order: length, sentence length, links.
    pub suggestions: Vec<String>,
}

impl AnalysisReport {
    /// Whether the report carries the given suggestion.
    pub fn has(&self, suggestion: Suggestion) -> bool {
        self.suggestions.iter().any(|s| s == suggestion.message())
    }

    /// Whether the text earned no suggestions at all.
    pub fn looks_good(&self) -> bool {
        self.suggestions.is_empty()
    }
}

/// Analyze text with the default thresholds.
pub fn analyze(text: &str) -> AnalysisReport {
    analyze_with(text, &Thresholds::default())
}

/// Analyze text with explicit thresholds.
#[tracing::instrument(skip(text), fields(text_len = text.len()))]
pub fn analyze_with(text: &str, thresholds: &Thresholds) -> AnalysisReport {
    let word_count = text::count_words(text);
    let sentence_count = text::split_sentences(text).len();
    let avg_words_per_sentence = average(word_count, sentence_count);

    let mut suggestions = Vec::new();
    if word_count < thresholds.min_words {
        suggestions.push(Suggestion::ShortPost);
    }
    if avg_words_per_sentence > thresholds.max_avg_sentence_words {
        suggestions.push(Suggestion::LongSentences);
    }
    if text::contains_link(text) {
        suggestions.push(Suggestion::ContainsLinks);
    }

    tracing::debug!(
        word_count,
        sentence_count,
        avg_words_per_sentence,
        suggestions = suggestions.len(),
        "analysis complete"
    );

    AnalysisReport {
        word_count,
        sentence_count,
        avg_words_per_sentence,
        suggestions: suggestions
            .iter()
            .map(|s| s.message().to_string())
            .collect(),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn average(words: usize, sentences: usize) -> usize {
    if sentences == 0 {
        return 0;
    }
    (words as f64 / sentences as f64).round() as usize
}
