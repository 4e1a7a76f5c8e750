//! Character-level similarity built on the longest common subsequence.

use similar::{capture_diff_slices, Algorithm, DiffTag};

use fdiff_types::{Section, NOT_COMPUTED};

use crate::normalize::{normalize_heading, normalize_text};

/// Number of characters in the longest common subsequence of `a` and `b`,
/// along with the character length of each input.
pub fn common_chars(a: &str, b: &str) -> (usize, usize, usize) {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a == b {
        return (a.len(), a.len(), b.len());
    }
    let matched = capture_diff_slices(Algorithm::Myers, &a, &b)
        .iter()
        .map(|op| op.as_tag_tuple())
        .filter(|(tag, _, _)| *tag == DiffTag::Equal)
        .map(|(_, old, _)| old.len())
        .sum();
    (matched, a.len(), b.len())
}

/// `2M / (|a| + |b|)`, in `[0, 1]`. Two empty strings are identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let (matched, la, lb) = common_chars(a, b);
    if la + lb == 0 {
        return 1.0;
    }
    (2 * matched) as f64 / (la + lb) as f64
}

/// Ratio rescaled by `(|a| + |b|) / (2 * min(|a|, |b|))`, which reduces to
/// `M / min(|a|, |b|)`.
///
/// A heading wholly contained in the other scores 1. Returns 0 when either
/// side is empty.
pub fn heading_similarity(a: &str, b: &str) -> f64 {
    let (matched, la, lb) = common_chars(a, b);
    let shorter = la.min(lb);
    if shorter == 0 {
        return 0.0;
    }
    matched as f64 / shorter as f64
}

/// Raw similarity signals between two sections.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionSignals {
    pub heading: f64,
    /// Similarity of the space-joined child headings, or [`NOT_COMPUTED`].
    pub subsection: f64,
    /// Similarity of the normalized bodies, or [`NOT_COMPUTED`].
    pub content: f64,
}

impl SectionSignals {
    pub fn between(old: &Section, new: &Section) -> Self {
        let heading = heading_similarity(
            &normalize_heading(&old.heading_text),
            &normalize_heading(&new.heading_text),
        );

        let subsection = if !old.subsections.is_empty() && !new.subsections.is_empty() {
            heading_similarity(&child_headings(old), &child_headings(new))
        } else {
            NOT_COMPUTED
        };

        let content = if old.has_content() && new.has_content() {
            ratio(&normalize_text(&old.content), &normalize_text(&new.content))
        } else {
            NOT_COMPUTED
        };

        Self {
            heading,
            subsection,
            content,
        }
    }
}

fn child_headings(section: &Section) -> String {
    section
        .subsections
        .iter()
        .map(|s| normalize_heading(&s.heading_text))
        .collect::<Vec<_>>()
        .join(" ")
}
