//! Removal of near-duplicate points across the advantage and limitation lists.

use super::prompt::POINTS_PER_LIST;

/// Similarity at or above which two points count as the same observation.
pub const OVERLAP_THRESHOLD: f64 = 0.6;

/// Case-insensitive normalized edit-distance similarity in `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// Drop every point that closely matches a point in the opposite list.
///
/// Both lists are compared against the other's original contents, so a matching pair is
/// removed from both sides. Survivors keep their order and are capped at three per list.
pub fn resolve_overlap(
    advantages: Vec<String>,
    limitations: Vec<String>,
) -> (Vec<String>, Vec<String>) {
    let clashes = |point: &String, others: &[String]| {
        others
            .iter()
            .any(|other| similarity(point, other) >= OVERLAP_THRESHOLD)
    };

    let kept_advantages: Vec<String> = advantages
        .iter()
        .filter(|point| !clashes(point, &limitations))
        .take(POINTS_PER_LIST)
        .cloned()
        .collect();
    let kept_limitations: Vec<String> = limitations
        .iter()
        .filter(|point| !clashes(point, &advantages))
        .take(POINTS_PER_LIST)
        .cloned()
        .collect();

    let removed = (advantages.len() - kept_advantages.len())
        + (limitations.len() - kept_limitations.len());
    if removed > 0 {
        tracing::debug!(removed, "Dropped overlapping points");
    }
    (kept_advantages, kept_limitations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(points: &[&str]) -> Vec<String> {
        points.iter().map(|p| p.to_string()).collect()
    }

    const LARGE_SAMPLE: &str =
        "The study uses a large and diverse sample of participants from many regions";
    const SMALL_SAMPLE: &str =
        "The study uses a small and narrow sample of participants from few regions";
    const OPEN_DATA: &str =
        "Open data and code release allows independent teams to reproduce every reported result";
    const GUIDANCE: &str =
        "Findings translate into concrete guidance that clinicians can apply during routine visits";
    const FOLLOW_UP: &str =
        "Follow-up period is short so long term effects remain unknown to readers";
    const SELF_REPORT: &str =
        "Self reported outcomes may overstate the benefits observed by participants";

    #[test]
    fn similarity_is_case_insensitive_and_bounded() {
        assert_eq!(similarity("Same Text", "same text"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
        let value = similarity(LARGE_SAMPLE, SMALL_SAMPLE);
        assert!(value >= OVERLAP_THRESHOLD && value < 1.0);
        assert!(similarity(OPEN_DATA, FOLLOW_UP) < OVERLAP_THRESHOLD);
    }

    #[test]
    fn near_duplicates_are_removed_from_both_lists() {
        let (advantages, limitations) = resolve_overlap(
            owned(&[LARGE_SAMPLE, OPEN_DATA, GUIDANCE]),
            owned(&[SMALL_SAMPLE, FOLLOW_UP, SELF_REPORT]),
        );
        assert_eq!(advantages, owned(&[OPEN_DATA, GUIDANCE]));
        assert_eq!(limitations, owned(&[FOLLOW_UP, SELF_REPORT]));

        for a in &advantages {
            for l in &limitations {
                assert!(similarity(a, l) < OVERLAP_THRESHOLD);
            }
        }
    }

    #[test]
    fn distinct_lists_pass_through() {
        let (advantages, limitations) = resolve_overlap(
            owned(&[OPEN_DATA, GUIDANCE]),
            owned(&[FOLLOW_UP, SELF_REPORT]),
        );
        assert_eq!(advantages, owned(&[OPEN_DATA, GUIDANCE]));
        assert_eq!(limitations, owned(&[FOLLOW_UP, SELF_REPORT]));
    }

    #[test]
    fn caps_each_list_at_three() {
        let (advantages, _) = resolve_overlap(owned(&["a1", "a2", "a3", "a4"]), Vec::new());
        assert_eq!(advantages, owned(&["a1", "a2", "a3"]));
    }
}
