//! Fixed-offset windows over a document's text.
//!
//! Offsets are counted in characters, never bytes, so slicing cannot split a code point.

/// Characters taken from the start of the document.
pub const OVERVIEW_CHARS: usize = 5000;
/// Characters taken from the end of the document.
pub const CONCLUSION_CHARS: usize = 4000;

/// Half-open character range `[start, end)` within the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharSpan {
    /// First character offset.
    pub start: usize,
    /// One past the last character offset.
    pub end: usize,
}

impl CharSpan {
    /// Number of characters covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no characters.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether two spans share at least one character.
    pub fn overlaps(&self, other: &CharSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Overview, body and conclusion views of one document.
#[derive(Debug, Clone)]
pub struct Windows<'a> {
    /// Opening of the paper.
    pub overview: &'a str,
    /// Middle half of the paper.
    pub body: &'a str,
    /// Closing of the paper.
    pub conclusion: &'a str,
    /// Source span of `overview`.
    pub overview_span: CharSpan,
    /// Source span of `body`.
    pub body_span: CharSpan,
    /// Source span of `conclusion`.
    pub conclusion_span: CharSpan,
}

/// Slice `text` into its overview, body and conclusion windows.
///
/// Short documents (under `OVERVIEW_CHARS + CONCLUSION_CHARS` characters) get overlapping
/// windows. Longer ones have the body clamped to the gap between the other two.
pub fn split_windows(text: &str) -> Windows<'_> {
    let len = text.chars().count();

    let overview_span = CharSpan {
        start: 0,
        end: len.min(OVERVIEW_CHARS),
    };
    let conclusion_span = CharSpan {
        start: len.saturating_sub(CONCLUSION_CHARS),
        end: len,
    };
    let mut body_span = CharSpan {
        start: len / 4,
        end: 3 * len / 4,
    };
    if len >= OVERVIEW_CHARS + CONCLUSION_CHARS {
        body_span.start = body_span.start.max(overview_span.end);
        body_span.end = body_span.end.min(conclusion_span.start);
    }

    Windows {
        overview: slice_chars(text, overview_span),
        body: slice_chars(text, body_span),
        conclusion: slice_chars(text, conclusion_span),
        overview_span,
        body_span,
        conclusion_span,
    }
}

fn slice_chars(text: &str, span: CharSpan) -> &str {
    let start = byte_offset(text, span.start);
    let end = byte_offset(text, span.end);
    &text[start..end]
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_empty_windows() {
        let windows = split_windows("");
        assert!(windows.overview.is_empty());
        assert!(windows.body.is_empty());
        assert!(windows.conclusion.is_empty());
    }

    #[test]
    fn short_text_windows_overlap() {
        let text = "abcdefghijklmnopqrstuvwxyz".repeat(10);
        let windows = split_windows(&text);
        assert_eq!(windows.overview, text);
        assert_eq!(windows.conclusion, text);
        assert_eq!(windows.body_span, CharSpan { start: 65, end: 195 });
        assert_eq!(windows.body, &text[65..195]);
    }

    #[test]
    fn long_text_windows_respect_bounds_and_do_not_overlap() {
        for len in [9_000, 12_345, 20_000, 64_001] {
            let text: String = (0..len).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
            let windows = split_windows(&text);

            assert_eq!(windows.overview.chars().count(), OVERVIEW_CHARS);
            assert_eq!(windows.conclusion.chars().count(), CONCLUSION_CHARS);
            assert!(!windows.overview_span.overlaps(&windows.body_span));
            assert!(!windows.body_span.overlaps(&windows.conclusion_span));
            assert!(!windows.overview_span.overlaps(&windows.conclusion_span));
            assert_eq!(windows.body.chars().count(), windows.body_span.len());
        }
    }

    #[test]
    fn wide_documents_keep_the_middle_half() {
        let text = "x".repeat(40_000);
        let windows = split_windows(&text);
        assert_eq!(windows.body_span, CharSpan { start: 10_000, end: 30_000 });
    }

    #[test]
    fn multibyte_text_is_sliced_on_char_boundaries() {
        let text = "é".repeat(10_000);
        let windows = split_windows(&text);
        assert_eq!(windows.overview.chars().count(), OVERVIEW_CHARS);
        assert_eq!(windows.conclusion.chars().count(), CONCLUSION_CHARS);
        assert_eq!(windows.body.chars().count(), 1_000);
    }
}
