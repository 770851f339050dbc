//! Canned points used when extraction under-delivers.
//!
//! Keyword checks against the windows pick the most relevant canned sentences; the fixed
//! default triple for the category fills whatever is left. Output is always three distinct,
//! non-empty strings and depends only on the input windows.

use super::points::PointCategory;
use super::prompt::POINTS_PER_LIST;
use super::window::Windows;

struct KeywordRule {
    keywords: &'static [&'static str],
    point: &'static str,
}

const METHOD_STRENGTH: KeywordRule = KeywordRule {
    keywords: &["novel", "innovative", "comprehensive", "rigorous"],
    point: "Applies a novel and rigorous methodology that supports a comprehensive analysis of the research problem",
};
const DATA_STRENGTH: KeywordRule = KeywordRule {
    keywords: &["large sample", "statistical", "significant"],
    point: "Draws on a substantial dataset and robust statistical analysis to support its main conclusions",
};
const PRACTICAL_STRENGTH: KeywordRule = KeywordRule {
    keywords: &["practical", "application", "implementation"],
    point: "Offers clear practical applications and actionable insights for implementation in real settings",
};

const SCOPE_LIMITATION: KeywordRule = KeywordRule {
    keywords: &["limited", "constraint", "scope"],
    point: "The narrow research scope may limit how well the findings generalize to other contexts",
};
const SAMPLE_LIMITATION: KeywordRule = KeywordRule {
    keywords: &["small sample", "limited data"],
    point: "Sample size constraints may reduce statistical power and the reliability of the reported results",
};
const COLLECTION_LIMITATION: KeywordRule = KeywordRule {
    keywords: &["cross-sectional", "survey", "self-report"],
    point: "The data collection approach may introduce bias through self-reported or single-point measurements",
};

const DEFAULT_ADVANTAGES: [&str; POINTS_PER_LIST] = [
    "Addresses an important research gap with a systematic and well structured approach",
    "Uses a methodology that is appropriate for the stated research objectives",
    "Contributes valuable insights that extend the existing body of knowledge",
];

const DEFAULT_LIMITATIONS: [&str; POINTS_PER_LIST] = [
    "Sample characteristics may limit the broader applicability of the results",
    "The study design does not allow firm conclusions about causal relationships",
    "Further research is needed to validate the findings in different populations",
];

/// Synthesize exactly three points for `category` from keyword cues in `windows`.
pub fn synthesize_points(category: PointCategory, windows: &Windows<'_>) -> Vec<String> {
    let (checks, defaults): ([(&KeywordRule, &str); 3], &[&str; POINTS_PER_LIST]) = match category
    {
        PointCategory::Advantage => (
            [
                (&METHOD_STRENGTH, windows.overview),
                (&DATA_STRENGTH, windows.body),
                (&PRACTICAL_STRENGTH, windows.body),
            ],
            &DEFAULT_ADVANTAGES,
        ),
        PointCategory::Limitation => (
            [
                (&SCOPE_LIMITATION, windows.conclusion),
                (&SAMPLE_LIMITATION, windows.body),
                (&COLLECTION_LIMITATION, windows.body),
            ],
            &DEFAULT_LIMITATIONS,
        ),
    };

    let triggered = checks
        .iter()
        .filter(|(rule, window)| mentions_any(window, rule.keywords))
        .map(|(rule, _)| rule.point);

    let mut points: Vec<String> = Vec::with_capacity(POINTS_PER_LIST);
    for point in triggered.chain(defaults.iter().copied()) {
        if points.len() == POINTS_PER_LIST {
            break;
        }
        if !points.iter().any(|existing| existing == point) {
            points.push(point.to_string());
        }
    }
    points
}

/// Top `extracted` up to three entries with synthesized points that are not already present.
///
/// Extracted points are kept verbatim and in order. Duplicates are detected on trimmed,
/// case-insensitive text.
pub fn complete_points(mut extracted: Vec<String>, synthesized: Vec<String>) -> Vec<String> {
    for candidate in synthesized {
        if extracted.len() >= POINTS_PER_LIST {
            break;
        }
        let key = candidate.trim().to_lowercase();
        if !extracted
            .iter()
            .any(|existing| existing.trim().to_lowercase() == key)
        {
            extracted.push(candidate);
        }
    }
    extracted
}

fn mentions_any(window: &str, keywords: &[&str]) -> bool {
    let lowered = window.to_lowercase();
    keywords.iter().any(|keyword| lowered.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::window::split_windows;

    #[test]
    fn empty_windows_yield_default_triples() {
        let windows = split_windows("");
        assert_eq!(
            synthesize_points(PointCategory::Advantage, &windows),
            DEFAULT_ADVANTAGES
        );
        assert_eq!(
            synthesize_points(PointCategory::Limitation, &windows),
            DEFAULT_LIMITATIONS
        );
    }

    #[test]
    fn keyword_hits_come_first_and_defaults_pad() {
        let text = format!(
            "We propose a NOVEL estimator. {}",
            "It has practical implications. ".repeat(20)
        );
        let windows = split_windows(&text);
        let points = synthesize_points(PointCategory::Advantage, &windows);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], METHOD_STRENGTH.point);
        assert_eq!(points[1], PRACTICAL_STRENGTH.point);
        assert_eq!(points[2], DEFAULT_ADVANTAGES[0]);
    }

    #[test]
    fn limitation_rules_read_the_right_windows() {
        let text = format!(
            "{}a cross-sectional survey with a small sample{}",
            "x".repeat(6000),
            " the scope is limited".repeat(300)
        );
        let windows = split_windows(&text);
        let points = synthesize_points(PointCategory::Limitation, &windows);
        assert_eq!(
            points,
            vec![
                SCOPE_LIMITATION.point,
                SAMPLE_LIMITATION.point,
                COLLECTION_LIMITATION.point
            ]
        );
    }

    #[test]
    fn always_three_distinct_non_empty_points() {
        for text in ["", "novel rigorous statistical practical", "limited survey small sample"] {
            let windows = split_windows(text);
            for category in [PointCategory::Advantage, PointCategory::Limitation] {
                let points = synthesize_points(category, &windows);
                assert_eq!(points.len(), 3);
                assert!(points.iter().all(|p| !p.trim().is_empty()));
                assert_ne!(points[0], points[1]);
                assert_ne!(points[1], points[2]);
                assert_ne!(points[0], points[2]);
                assert_eq!(points, synthesize_points(category, &windows));
            }
        }
    }

    #[test]
    fn completion_preserves_extracted_and_skips_duplicates() {
        let extracted = vec!["First extracted point".to_string(), "Second one".to_string()];
        let synthesized = vec![
            "second ONE ".to_string(),
            "Synthesized point".to_string(),
            "Another".to_string(),
        ];
        let completed = complete_points(extracted, synthesized);
        assert_eq!(
            completed,
            vec!["First extracted point", "Second one", "Synthesized point"]
        );
    }

    #[test]
    fn completion_leaves_full_lists_alone() {
        let extracted: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let completed = complete_points(extracted.clone(), vec!["d".into()]);
        assert_eq!(completed, extracted);
    }
}
