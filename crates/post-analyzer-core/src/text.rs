//! Text processing utilities.
//!
//! Provides the word counting, sentence splitting, and link detection used by
//! [`crate::analysis`]. The rules are deliberately simple punctuation
//! heuristics: a sentence ends at `.`, `!` or `?` followed by exactly one
//! whitespace character.
//!
//! "Whitespace" is Unicode whitespace plus U+FEFF (zero-width no-break space),
//! so a leading byte-order mark from a text file or OCR output never counts
//! as a word.

use regex::Regex;
use std::sync::LazyLock;

/// Sentence terminator followed by a single whitespace character.
static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?][\s\x{FEFF}]").expect("valid regex"));

/// `http://` or `https://` plus whatever non-whitespace follows.
static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s\x{FEFF}]*").expect("valid regex"));

/// Zero-width no-break space, also seen as a byte-order mark.
const ZWNBSP: char = '\u{FEFF}';

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ZWNBSP
}

/// Count whitespace-delimited words.
///
/// Leading and trailing whitespace is ignored; whitespace-only input has no
/// words.
pub fn count_words(text: &str) -> usize {
    text.split(is_separator)
        .filter(|word| !word.is_empty())
        .count()
}

/// Split text into sentence segments.
///
/// Splits the untrimmed input on a terminator followed by one whitespace
/// character and drops empty segments. Segments consisting only of
/// whitespace are kept. Text with no such break yields a single segment.
///
/// `"A.B.C."` is one segment: terminators without a following space do not
/// split.
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_BREAK
        .split(text)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Whether the text contains an `http://` or `https://` link (case-sensitive).
pub fn contains_link(text: &str) -> bool {
    LINK_PATTERN.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_words_across_mixed_whitespace() {
        assert_eq!(count_words("  one\ttwo\n\nthree   four "), 4);
    }

    #[test]
    fn byte_order_mark_is_whitespace() {
        assert_eq!(count_words("\u{FEFF} Hello world."), 2);
        assert_eq!(count_words("\u{FEFF}"), 0);
        assert_eq!(split_sentences("Hi.\u{FEFF}There"), vec!["Hi", "There"]);
        assert!(contains_link("see https://example.com\u{FEFF}"));
    }

    #[test]
    fn whitespace_only_has_no_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words(" \n\t "), 0);
    }

    #[test]
    fn basic_sentences() {
        let sentences = split_sentences("This is a sentence. This is another sentence.");
        assert_eq!(sentences, vec!["This is a sentence", "This is another sentence."]);
    }

    #[test]
    fn question_and_exclamation() {
        let sentences = split_sentences("Are you serious? I can't believe it! This is amazing.");
        assert_eq!(sentences.len(), 3);
    }

    #[test]
    fn trailing_break_leaves_no_empty_segment() {
        assert_eq!(split_sentences("Done. "), vec!["Done"]);
    }

    #[test]
    fn no_terminator_is_one_segment() {
        assert_eq!(split_sentences("no punctuation here"), vec!["no punctuation here"]);
    }

    #[test]
    fn unspaced_terminators_do_not_split() {
        assert_eq!(split_sentences("A.B.C."), vec!["A.B.C."]);
    }

    #[test]
    fn double_space_keeps_whitespace_segment() {
        // The break consumes one space; the second belongs to the next segment.
        assert_eq!(split_sentences("Hi.  There"), vec!["Hi", " There"]);
    }

    #[test]
    fn empty_input_has_no_segments() {
        assert!(split_sentences("").is_empty());
    }

    #[test]
    fn whitespace_only_input_is_one_segment() {
        assert_eq!(split_sentences("   "), vec!["   "]);
    }

    #[test]
    fn detects_links() {
        assert!(contains_link("Check this out https://example.com now"));
        assert!(contains_link("plain http://x"));
        assert!(!contains_link("HTTPS://EXAMPLE.COM"));
        assert!(!contains_link("no links at all"));
    }
}
