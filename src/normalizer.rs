//! # Text Normalizer
//!
//! Deterministic string transforms used to tidy model output and to synthesize
//! metadata when the model path fails. Nothing here touches the network or
//! keeps state between calls.
//!
//! - `extract_keywords`: first five distinct non-trivial words of a text
//! - `clean_description`: strips list numbering and boilerplate openers
//! - `format_description`: reduces a text to at most two tidy sentences

use std::sync::LazyLock;

use regex::Regex;

/// Maximum number of keywords returned by `extract_keywords`
pub const MAX_KEYWORDS: usize = 5;

/// Words shorter than this are never keywords
const MIN_KEYWORD_LEN: usize = 3;

/// Sentences kept by `format_description`
const MAX_SENTENCES: usize = 2;

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "your", "yours", "all", "any", "can", "had",
    "has", "have", "her", "his", "its", "our", "ours", "out", "was", "were", "will", "with",
    "this", "that", "these", "those", "from", "they", "them", "their", "there", "then", "than",
    "what", "when", "where", "which", "while", "who", "whom", "why", "how", "into", "onto",
    "been", "being", "about", "also", "just", "more", "most", "some", "such", "only", "very",
    "each", "other", "should", "would", "could", "does", "did", "doing", "here", "she", "him",
    "may", "might", "must", "shall", "upon", "because", "through",
];

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid non-word pattern"));

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s)\d{1,2}\.\s+").expect("valid list marker pattern"));

static TIPS_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)here are \d+ tips for").expect("valid tips opener pattern")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([.,])").expect("valid punctuation pattern"));

// Letters only, so decimals like 2.5 stay intact
static MISSING_SPACE_AFTER_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.,])([A-Za-z])").expect("valid punctuation pattern"));

static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.?!]\s+").expect("valid sentence break pattern"));

/// Extract up to five keywords from free text
///
/// The text is lower-cased and stripped of punctuation. Stop words and words
/// shorter than three characters are dropped, duplicates are removed keeping
/// the first occurrence, and the survivors are joined with `", "`.
///
/// # Examples
///
/// ```
/// use metagen::normalizer::extract_keywords;
///
/// assert_eq!(
///     extract_keywords("The quick brown fox jumps over the lazy dog"),
///     "quick, brown, fox, jumps, over"
/// );
/// ```
pub fn extract_keywords(content: &str) -> String {
    let lowered = content.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, "");

    let mut keywords: Vec<&str> = Vec::with_capacity(MAX_KEYWORDS);
    for word in stripped.split_whitespace() {
        if word.chars().count() < MIN_KEYWORD_LEN || STOP_WORDS.contains(&word) {
            continue;
        }
        if keywords.contains(&word) {
            continue;
        }
        keywords.push(word);
        if keywords.len() == MAX_KEYWORDS {
            break;
        }
    }

    keywords.join(", ")
}

/// Tidy a model-written description
///
/// Removes numbered-list markers, rewrites "here are N tips for" openers,
/// collapses whitespace and normalizes spacing around periods and commas: no
/// space before them, one space after them when a letter follows.
pub fn clean_description(text: &str) -> String {
    let text = TIPS_OPENER.replace_all(text, "Discover essential tips for");
    let text = LIST_MARKER.replace_all(&text, "$1");
    let text = WHITESPACE.replace_all(&text, " ");
    let text = SPACE_BEFORE_PUNCT.replace_all(&text, "$1");
    let text = MISSING_SPACE_AFTER_PUNCT.replace_all(&text, "$1 $2");
    text.trim().to_string()
}

/// Reduce a description to at most two sentences ending in a single period
///
/// Returns an empty string for empty input. If cleaning leaves nothing that
/// looks like a sentence, the cleaned text is returned as is.
pub fn format_description(description: &str) -> String {
    if description.is_empty() {
        return String::new();
    }

    let cleaned = clean_description(description);
    let sentences: Vec<&str> = SENTENCE_BREAK
        .split(&cleaned)
        .map(|fragment| fragment.trim().trim_end_matches(['.', '?', '!']).trim_end())
        .filter(|fragment| !fragment.is_empty())
        .take(MAX_SENTENCES)
        .collect();

    if sentences.is_empty() {
        return cleaned;
    }

    format!("{}.", sentences.join(". "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_keywords_filters_stop_words() {
        assert_eq!(
            extract_keywords("The quick brown fox jumps over the lazy dog"),
            "quick, brown, fox, jumps, over"
        );
    }

    #[test]
    fn test_extract_keywords_dedupes_and_strips_punctuation() {
        let keywords = extract_keywords("Rust, rust! RUST? Ownership; borrowing: lifetimes.");
        assert_eq!(keywords, "rust, ownership, borrowing, lifetimes");
    }

    #[test]
    fn test_extract_keywords_empty() {
        assert_eq!(extract_keywords(""), "");
        assert_eq!(extract_keywords("a an of to"), "");
    }

    #[test]
    fn test_extract_keywords_is_deterministic() {
        let text = "Healthy eating matters. It helps you feel better every day.";
        let first = extract_keywords(text);
        assert_eq!(first, "healthy, eating, matters, helps, feel");
        assert_eq!(extract_keywords(text), first);
    }

    #[test]
    fn test_clean_description_rewrites_tips_and_lists() {
        let raw = "Here are 5 tips for healthy eating:\n1. Eat greens.\n2. Drink   water .";
        assert_eq!(
            clean_description(raw),
            "Discover essential tips for healthy eating: Eat greens. Drink water."
        );
    }

    #[test]
    fn test_clean_description_spacing() {
        assert_eq!(clean_description("  One , two  .  "), "One, two.");
    }

    #[test]
    fn test_clean_description_adds_space_after_punctuation() {
        assert_eq!(
            clean_description("Learn to cook.Save money ,every week"),
            "Learn to cook. Save money, every week"
        );
        assert_eq!(
            clean_description("Costs 2.5 dollars, 1,000 times."),
            "Costs 2.5 dollars, 1,000 times."
        );
    }

    #[test]
    fn test_format_description_splits_run_together_sentences() {
        assert_eq!(
            format_description("Learn to cook.Save money. Third. Fourth."),
            "Learn to cook. Save money."
        );
    }

    #[test]
    fn test_format_description_keeps_two_sentences() {
        let formatted = format_description("First point. Second point! Third point? Fourth.");
        assert_eq!(formatted, "First point. Second point.");
    }

    #[test]
    fn test_format_description_adds_period() {
        assert_eq!(format_description("No terminator here"), "No terminator here.");
    }

    #[test]
    fn test_format_description_empty() {
        assert_eq!(format_description(""), "");
    }

    #[test]
    fn test_format_description_without_fragments_returns_cleaned() {
        assert_eq!(format_description("... !"), "... !");
    }

    #[test]
    fn test_format_description_is_idempotent() {
        let inputs = [
            "Learn how to cook. Save money every week.",
            "A single sentence.",
            "Here are 3 tips for gardening. 1. Water daily. 2. Prune often.",
        ];
        for input in inputs {
            let once = format_description(input);
            assert_eq!(format_description(&once), once, "input: {input}");
        }
    }
}
