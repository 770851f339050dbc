//! Extraction of discrete advantage/limitation points from generated text.

use super::normalize::word_count;
use super::prompt::POINTS_PER_LIST;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Minimum words for an accepted point.
pub const MIN_POINT_WORDS: usize = 10;
/// Maximum words for an accepted point.
pub const MAX_POINT_WORDS: usize = 30;

static LIST_ECHO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^.*?List \d+.*?:").expect("valid regex"));
static FOCUS_ECHO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^.*?Focus on.*?:").expect("valid regex"));
static NUMBERED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.):]?\s*\S").expect("valid regex"));
static BULLETED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[•\-*–]\s*\S").expect("valid regex"));
static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.):]?\s*").expect("valid regex"));
static LEADING_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[•\-*–]\s*").expect("valid regex"));

/// Which list a point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointCategory {
    /// Strengths of the paper.
    Advantage,
    /// Weaknesses of the paper.
    Limitation,
}

impl fmt::Display for PointCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Advantage => f.write_str("advantages"),
            Self::Limitation => f.write_str("limitations"),
        }
    }
}

/// Line shapes tried in order until one matches at least two lines.
#[derive(Debug, Clone, Copy)]
enum LineShape {
    Numbered,
    Bulleted,
    Any,
}

impl LineShape {
    fn matches(self, line: &str) -> bool {
        match self {
            Self::Numbered => NUMBERED_LINE.is_match(line),
            Self::Bulleted => BULLETED_LINE.is_match(line),
            Self::Any => true,
        }
    }
}

/// Parse at most three distinct, well-sized points out of `raw`.
///
/// Returning fewer than three is expected for sparse output; the caller tops the list up.
pub fn extract_points(raw: &str, category: PointCategory) -> Vec<String> {
    let text = LIST_ECHO.replace(raw, "");
    let text = FOCUS_ECHO.replace(&text, "");
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let candidates: Vec<&str> = [LineShape::Numbered, LineShape::Bulleted, LineShape::Any]
        .into_iter()
        .map(|shape| {
            lines
                .iter()
                .copied()
                .filter(|line| shape.matches(line))
                .collect::<Vec<_>>()
        })
        .find(|matches| matches.len() >= 2)
        .unwrap_or_default();

    let mut accepted: Vec<String> = Vec::with_capacity(POINTS_PER_LIST);
    for candidate in &candidates {
        let cleaned = clean_candidate(candidate);
        let words = word_count(&cleaned);
        if (MIN_POINT_WORDS..=MAX_POINT_WORDS).contains(&words) && !accepted.contains(&cleaned) {
            accepted.push(cleaned);
        }
        if accepted.len() >= POINTS_PER_LIST {
            break;
        }
    }

    tracing::debug!(
        %category,
        candidates = candidates.len(),
        accepted = accepted.len(),
        "Extracted points"
    );
    accepted
}

fn clean_candidate(line: &str) -> String {
    let without_number = LEADING_NUMBER.replace(line.trim(), "");
    let without_bullet = LEADING_BULLET.replace(without_number.trim(), "");
    without_bullet.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRST: &str =
        "The study recruits a large and diverse cohort across twelve regional hospitals";
    const SECOND: &str =
        "Analysis combines mixed effects models with careful sensitivity checks for confounders";
    const THIRD: &str =
        "Findings translate into concrete guidance that clinicians can apply during routine visits";
    const FOURTH: &str =
        "Open data and code release allows independent teams to reproduce every reported result";

    #[test]
    fn extracts_numbered_points() {
        let raw = format!("1. {FIRST}\n2) {SECOND}\n3 {THIRD}\n");
        let points = extract_points(&raw, PointCategory::Advantage);
        assert_eq!(points, vec![FIRST, SECOND, THIRD]);
    }

    #[test]
    fn extracts_bulleted_points_when_no_numbering() {
        let raw = format!("- {FIRST}\n• {SECOND}\n");
        let points = extract_points(&raw, PointCategory::Advantage);
        assert_eq!(points, vec![FIRST, SECOND]);
    }

    #[test]
    fn falls_back_to_plain_lines() {
        let raw = format!("{FIRST}\n\n{SECOND}\n");
        let points = extract_points(&raw, PointCategory::Limitation);
        assert_eq!(points, vec![FIRST, SECOND]);
    }

    #[test]
    fn single_line_output_yields_nothing() {
        assert!(extract_points(FIRST, PointCategory::Advantage).is_empty());
        assert!(extract_points("", PointCategory::Advantage).is_empty());
    }

    #[test]
    fn filters_by_word_count_and_exact_duplicates() {
        let long = "word ".repeat(31);
        let raw = format!("1. too short to count\n2. {FIRST}\n3. {long}\n4. {FIRST}\n5. {SECOND}");
        let points = extract_points(&raw, PointCategory::Advantage);
        assert_eq!(points, vec![FIRST, SECOND]);
        for point in &points {
            let words = word_count(point);
            assert!((MIN_POINT_WORDS..=MAX_POINT_WORDS).contains(&words));
        }
    }

    #[test]
    fn caps_at_three_points() {
        let raw = format!("1. {FIRST}\n2. {SECOND}\n3. {THIRD}\n4. {FOURTH}");
        let points = extract_points(&raw, PointCategory::Advantage);
        assert_eq!(points.len(), 3);
        assert!(!points.contains(&FOURTH.to_string()));
    }

    #[test]
    fn strips_echoed_instructions() {
        let raw = format!(
            "List 3 strengths in this format:\n1. [Specific strength with evidence]\n\
             Focus on:\n- Novel methodology or approach\n1. {FIRST}\n2. {SECOND}"
        );
        let points = extract_points(&raw, PointCategory::Advantage);
        assert_eq!(points, vec![FIRST, SECOND]);
    }
}
