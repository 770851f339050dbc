//! Cosmetic cleanup of generated prose.
//!
//! Rules run in a fixed order; later rules assume the earlier cleanup has happened. This is a
//! spacing and capitalization repair pass, not a grammar checker.

use regex::Regex;
use std::sync::LazyLock;

static SUMMARY_ECHO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^.*?Write.*?summary.*?:").expect("valid regex"));
static TITLE_ECHO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^.*?Document Title.*?:").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static MISSING_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.!?])\s*([a-z])").expect("valid regex"));
static MERGED_SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").expect("valid regex"));
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid regex"));

/// Clean generated prose and cap it at `target_words` words.
pub fn normalize_text(raw: &str, target_words: usize) -> String {
    let text = SUMMARY_ECHO.replace(raw, "");
    let text = TITLE_ECHO.replace(&text, "");
    let text = WHITESPACE.replace_all(&text, " ");
    let text = MISSING_SPACE.replace_all(&text, "${1} ${2}");
    let text = MERGED_SENTENCE.replace_all(&text, "${1}. ${2}");

    let sentences: Vec<String> = SENTENCE_END
        .split(&text)
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .map(capitalize_first)
        .collect();
    let joined = sentences.join(". ");

    truncate_words(joined, target_words)
}

fn capitalize_first(sentence: &str) -> String {
    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate_words(text: String, target_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= target_words {
        return text;
    }
    let mut truncated = words[..target_words].join(" ");
    if !truncated.ends_with(['.', '!', '?']) {
        truncated.push('.');
    }
    truncated
}

/// Count whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repairs_missing_space_and_capitalization() {
        assert_eq!(
            normalize_text("the model works.it is fast", 100),
            "The model works. It is fast"
        );
    }

    #[test]
    fn splits_merged_sentences() {
        assert_eq!(
            normalize_text("results improvedThe method   generalizes", 100),
            "Results improved. The method generalizes"
        );
    }

    #[test]
    fn strips_echoed_instruction() {
        let raw = "Write a comprehensive research paper summary in 500-600 words. Include:\n\
                   the paper studies sleep. it finds effects!";
        assert_eq!(
            normalize_text(raw, 100),
            "The paper studies sleep. It finds effects"
        );
    }

    #[test]
    fn strips_document_title_echo() {
        assert_eq!(
            normalize_text("Document Title: Sleep study. findings are robust", 100),
            "Sleep study. Findings are robust"
        );
    }

    #[test]
    fn truncates_and_terminates() {
        assert_eq!(
            normalize_text("one two three four five six seven", 5),
            "One two three four five."
        );
    }

    #[test]
    fn is_idempotent_on_clean_text() {
        let clean = "The study measures sleep quality. Results show strong effects";
        let once = normalize_text(clean, 600);
        assert_eq!(once, clean);
        assert_eq!(normalize_text(&once, 600), once);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize_text("", 600), "");
        assert_eq!(normalize_text(" ...!? ", 600), "");
    }

    #[test]
    fn counts_words() {
        assert_eq!(word_count("  a b\tc\n"), 3);
        assert_eq!(word_count(""), 0);
    }
}
