//! Helpers for normalizing ingest input before it reaches the stores.

use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;

/// Characters of document text copied into a record preview.
pub const PREVIEW_CHARS: usize = 200;

/// Filename used when sanitization leaves nothing behind.
pub const FALLBACK_FILENAME: &str = "document.txt";

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?\S+|www\S+").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Sanitize arbitrary string input by trimming whitespace and dropping empties.
pub(crate) fn sanitize_string(value: Option<String>) -> Option<String> {
    value.and_then(|input| {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Reduce a client-supplied filename to a safe ASCII basename.
///
/// Path separators become spaces, whitespace runs become `_`, anything outside
/// `[A-Za-z0-9._-]` is dropped and leading/trailing dots or underscores are trimmed.
pub fn sanitize_filename(value: Option<String>) -> String {
    let Some(raw) = sanitize_string(value) else {
        return FALLBACK_FILENAME.to_string();
    };
    let spaced = raw.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let filtered: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    let trimmed = filtered.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Strip URLs, collapse whitespace and cap the text at `max_chars` characters.
pub fn clean_document_text(text: &str, max_chars: usize) -> String {
    let without_urls = URL.replace_all(text, " ");
    let collapsed = WHITESPACE.replace_all(&without_urls, " ");
    let trimmed = collapsed.trim();
    if trimmed.chars().count() <= max_chars {
        trimmed.to_string()
    } else {
        trimmed.chars().take(max_chars).collect::<String>().trim_end().to_string()
    }
}

/// First [`PREVIEW_CHARS`] characters of `text`, with `...` appended when truncated.
pub fn text_preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Hex-encoded SHA-256 of the cleaned document text.
pub fn content_hash(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}
