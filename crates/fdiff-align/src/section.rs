//! Section-level alignment of two document trees.
//!
//! Sibling lists are aligned level by level. Lists made entirely of
//! parenthesized "note" headings are matched optimally because their order
//! is unreliable between editions; every other list is matched greedily in
//! order. Matched pairs recurse into their children.

use tracing::debug;

use fdiff_types::{AlignConfig, Section, SectionPair, SimilarityScores, NOT_COMPUTED};

use crate::flatten::flatten_document;
use crate::matching::{
    find_optimal, find_ordered, ordered_slots, unordered_slots, Match, MatchTable, Slot,
};
use crate::normalize::normalize_heading;
use crate::similarity::{heading_similarity, SectionSignals};

/// Aligns section trees with a fixed configuration.
#[derive(Clone, Debug, Default)]
pub struct SectionAligner {
    config: AlignConfig,
}

impl SectionAligner {
    pub fn new(config: AlignConfig) -> Self {
        Self { config }
    }

    /// Flatten both documents once, then align them from the top level.
    pub fn align(&self, old: Vec<Section>, new: Vec<Section>) -> Vec<SectionPair> {
        let suffix = &self.config.file_reference_suffix;
        let old = flatten_document(old, suffix);
        let new = flatten_document(new, suffix);
        self.align_level(&old, &new, 0)
    }

    /// Align one pair of sibling lists at `level`, recursing into matches.
    ///
    /// No flattening is performed here.
    pub fn align_level(&self, old: &[Section], new: &[Section], level: usize) -> Vec<SectionPair> {
        let (table, slots) = if is_note_list(old) && is_note_list(new) {
            debug!(level, old = old.len(), new = new.len(), "note siblings, optimal matching");
            let table = self.optimal_matches(old, new);
            let slots = unordered_slots(&table, new.len());
            (table, slots)
        } else {
            let table = self.ordered_matches(old, new, level);
            let slots = ordered_slots(&table, new.len());
            (table, slots)
        };

        // Child alignments are independent of each other; order comes only
        // from `slots`.
        let mut children: Vec<Option<Vec<SectionPair>>> = table
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                entry.as_ref().map(|m| {
                    self.align_level(&old[i].subsections, &new[m.new_index].subsections, level + 1)
                })
            })
            .collect();

        slots
            .into_iter()
            .map(|slot| match slot {
                Slot::Matched { old: i, new: j } => {
                    let scores = table[i].as_ref().map_or(SimilarityScores::zero(), |m| m.score);
                    let subsections = children[i].take().unwrap_or_default();
                    SectionPair::matched(level, &old[i], &new[j], scores, subsections)
                }
                Slot::Deleted { old: i } => SectionPair::deleted(level, &old[i]),
                Slot::Added { new: j } => SectionPair::added(level, &new[j]),
            })
            .collect()
    }

    /// Greedy in-order matching with a heading → child-list → content
    /// cascade. At the top level the first sections are always paired.
    fn ordered_matches(
        &self,
        old: &[Section],
        new: &[Section],
        level: usize,
    ) -> MatchTable<SimilarityScores> {
        let c = &self.config;
        find_ordered(old.len(), new.len(), |i, j| {
            if level == 0 && i == 0 {
                return Some(SimilarityScores::anchored());
            }

            let signals = SectionSignals::between(&old[i], &new[j]);
            let overall = if signals.heading > c.heading_threshold {
                signals.heading
            } else if signals.subsection > c.heading_threshold {
                debug!(
                    old = %old[i].heading_text,
                    new = %new[j].heading_text,
                    "matched on subsection headings"
                );
                signals.subsection
            } else if level <= c.content_fallback_max_level
                && signals.content > c.content_threshold
            {
                debug!(
                    old = %old[i].heading_text,
                    new = %new[j].heading_text,
                    "matched on content"
                );
                signals.content
            } else {
                return None;
            };

            Some(SimilarityScores {
                overall,
                heading: signals.heading,
                subsection: signals.subsection,
                content: signals.content,
            })
        })
    }

    /// Maximum-weight matching on heading similarity alone; cells at or
    /// below the heading threshold are disallowed.
    fn optimal_matches(&self, old: &[Section], new: &[Section]) -> MatchTable<SimilarityScores> {
        let old_keys: Vec<String> =
            old.iter().map(|s| normalize_heading(&s.heading_text)).collect();
        let new_keys: Vec<String> =
            new.iter().map(|s| normalize_heading(&s.heading_text)).collect();

        let weights: Vec<Vec<f64>> = old_keys
            .iter()
            .map(|o| {
                new_keys
                    .iter()
                    .map(|n| {
                        let sim = heading_similarity(o, n);
                        if sim > self.config.heading_threshold {
                            sim
                        } else {
                            -1.0
                        }
                    })
                    .collect()
            })
            .collect();

        find_optimal(&weights)
            .into_iter()
            .map(|entry| {
                entry.map(|m| Match {
                    new_index: m.new_index,
                    score: SimilarityScores {
                        overall: m.score,
                        heading: m.score,
                        subsection: NOT_COMPUTED,
                        content: NOT_COMPUTED,
                    },
                })
            })
            .collect()
    }
}

/// Align two documents with the default configuration.
pub fn align_sections(old: Vec<Section>, new: Vec<Section>) -> Vec<SectionPair> {
    SectionAligner::default().align(old, new)
}

/// A non-empty list whose every heading is wrapped in parentheses.
fn is_note_list(sections: &[Section]) -> bool {
    !sections.is_empty()
        && sections
            .iter()
            .all(|s| s.heading_text.starts_with('(') && s.heading_text.ends_with(')'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fdiff_types::AlignmentType;

    fn leaf(level: usize, heading: &str, content: &str) -> Section {
        Section::new(level, heading, content)
    }

    fn sample_document() -> Vec<Section> {
        vec![
            leaf(0, "Cover", "Company name"),
            leaf(0, "1. Business overview", "")
                .with_subsection(leaf(1, "(1) Results", "売上は増加した。"))
                .with_subsection(leaf(1, "(2) Outlook", "見通しは据え置き。")),
            leaf(0, "2. Risks", "為替リスクがある。"),
        ]
    }

    fn assert_all_matched(pairs: &[SectionPair]) {
        for pair in pairs {
            assert_eq!(pair.alignment_type, AlignmentType::Matched, "{:?}", pair.old_heading);
            assert_eq!(pair.scores.overall, 1.0);
            assert_all_matched(&pair.subsections);
        }
    }

    #[test]
    fn identical_documents_match_everywhere() {
        let doc = sample_document();
        let pairs = align_sections(doc.clone(), doc);
        assert_eq!(pairs.len(), 3);
        assert_all_matched(&pairs);
        assert_eq!(pairs[1].subsections.len(), 2);
        assert_eq!(pairs[1].subsections[0].level, 1);
    }

    #[test]
    fn appended_section_is_added() {
        let old = vec![leaf(0, "1. Intro", "old content")];
        let new = vec![leaf(0, "1. Intro", "new content"), leaf(0, "2. Added", "")];

        let pairs = align_sections(old, new);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].alignment_type, AlignmentType::Matched);
        assert_eq!(pairs[0].old_heading.as_deref(), Some("1. Intro"));
        assert_eq!(pairs[0].new_heading.as_deref(), Some("1. Intro"));
        assert_eq!(pairs[1].alignment_type, AlignmentType::Added);
        assert!(pairs[1].old_heading.is_none());
        assert_eq!(pairs[1].new_heading.as_deref(), Some("2. Added"));
    }

    #[test]
    fn first_top_level_section_is_anchored() {
        let old = vec![leaf(0, "Cover A", "x")];
        let new = vec![leaf(0, "Totally different", "y")];
        let pairs = align_sections(old, new);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].alignment_type, AlignmentType::Matched);
        assert_eq!(pairs[0].scores, SimilarityScores::anchored());
    }

    #[test]
    fn removed_section_is_deleted_in_place() {
        let old = vec![
            leaf(0, "Cover", ""),
            leaf(0, "Alpha", "a"),
            leaf(0, "Beta", "b"),
        ];
        let new = vec![leaf(0, "Cover", ""), leaf(0, "Beta", "b")];

        let pairs = align_sections(old, new);
        let types: Vec<_> = pairs.iter().map(|p| p.alignment_type).collect();
        assert_eq!(
            types,
            vec![AlignmentType::Matched, AlignmentType::Deleted, AlignmentType::Matched]
        );
        assert!(pairs[1].new_heading.is_none() && pairs[1].new_content.is_none());
    }

    #[test]
    fn inserted_sections_fill_gaps_in_order() {
        let old = vec![leaf(0, "Cover", ""), leaf(0, "Dividends", "")];
        let new = vec![
            leaf(0, "Cover", ""),
            leaf(0, "Capex plan", ""),
            leaf(0, "Governance", ""),
            leaf(0, "Dividends", ""),
            leaf(0, "Trailer", ""),
        ];

        let pairs = align_sections(old, new);
        let headings: Vec<_> = pairs
            .iter()
            .map(|p| (p.alignment_type, p.new_heading.clone().unwrap_or_default()))
            .collect();
        assert_eq!(
            headings,
            vec![
                (AlignmentType::Matched, "Cover".to_string()),
                (AlignmentType::Added, "Capex plan".to_string()),
                (AlignmentType::Added, "Governance".to_string()),
                (AlignmentType::Matched, "Dividends".to_string()),
                (AlignmentType::Added, "Trailer".to_string()),
            ]
        );
    }

    #[test]
    fn heading_threshold_is_strict() {
        // Shared "abc" over a shorter side of 5 characters: exactly 0.6.
        let aligner = SectionAligner::default();
        let old = vec![leaf(1, "abcxy", "")];
        let new = vec![leaf(1, "abcuvw", "")];
        let pairs = aligner.align_level(&old, &new, 2);
        assert_eq!(pairs[0].alignment_type, AlignmentType::Deleted);
        assert_eq!(pairs[1].alignment_type, AlignmentType::Added);

        // "abcd" of a 6-character shorter side: 0.666...
        let old = vec![leaf(1, "abcdxy", "")];
        let new = vec![leaf(1, "abcduvw", "")];
        let pairs = aligner.align_level(&old, &new, 2);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].alignment_type, AlignmentType::Matched);
    }

    #[test]
    fn renamed_parent_matches_on_child_headings() {
        let children = || {
            vec![
                leaf(2, "Revenue", ""),
                leaf(2, "Operating income", ""),
            ]
        };
        let mut old_parent = leaf(1, "Segment data", "");
        old_parent.subsections = children();
        let mut new_parent = leaf(1, "Reportable units", "");
        new_parent.subsections = children();

        let pairs = SectionAligner::default().align_level(&[old_parent], &[new_parent], 1);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].alignment_type, AlignmentType::Matched);
        assert_eq!(pairs[0].scores.overall, pairs[0].scores.subsection);
        assert_eq!(pairs[0].subsections.len(), 2);
        assert_eq!(pairs[0].subsections[0].level, 2);
    }

    #[test]
    fn content_fallback_only_at_shallow_levels() {
        let old = vec![leaf(1, "Alpha", "同じ本文が続きます。")];
        let new = vec![leaf(1, "Omega", "同じ本文が続きます。")];
        let aligner = SectionAligner::default();

        let shallow = aligner.align_level(&old, &new, 1);
        assert_eq!(shallow.len(), 1);
        assert_eq!(shallow[0].scores.overall, shallow[0].scores.content);

        let deep = aligner.align_level(&old, &new, 2);
        assert_eq!(deep.len(), 2);
        assert_eq!(deep[0].alignment_type, AlignmentType::Deleted);
    }

    #[test]
    fn note_lists_use_optimal_matching() {
        let old = vec![
            leaf(0, "(資産セクション)", "A"),
            leaf(0, "(負債セクション)", "B"),
        ];
        let new = vec![
            leaf(0, "(負債セクション)", "B updated"),
            leaf(0, "(資産セクション改訂)", "A updated"),
        ];

        let pairs = align_sections(old, new);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].new_heading.as_deref(), Some("(資産セクション改訂)"));
        assert_eq!(pairs[1].new_heading.as_deref(), Some("(負債セクション)"));
        assert_eq!(pairs[0].scores.subsection, NOT_COMPUTED);
    }

    #[test]
    fn note_lists_append_unmatched_new_items() {
        let old = vec![leaf(1, "(Leases)", ""), leaf(1, "(Goodwill)", "")];
        let new = vec![leaf(1, "(Revenue)", ""), leaf(1, "(Goodwill)", "")];

        let pairs = SectionAligner::default().align_level(&old, &new, 1);
        let shape: Vec<_> = pairs
            .iter()
            .map(|p| (p.alignment_type, p.old_heading.clone(), p.new_heading.clone()))
            .collect();
        assert_eq!(
            shape,
            vec![
                (AlignmentType::Deleted, Some("(Leases)".into()), None),
                (AlignmentType::Matched, Some("(Goodwill)".into()), Some("(Goodwill)".into())),
                (AlignmentType::Added, None, Some("(Revenue)".into())),
            ]
        );
    }

    #[test]
    fn flatten_runs_before_alignment() {
        let old = vec![
            leaf(0, "Cover", ""),
            leaf(0, "Attachments", "")
                .with_subsection(leaf(1, "A", "a_ixbrl.htm"))
                .with_subsection(leaf(1, "B", "b_ixbrl.htm")),
        ];
        let new = vec![leaf(0, "Cover", ""), leaf(0, "Attachments", "a_ixbrl.htm, b_ixbrl.htm")];

        let pairs = align_sections(old, new);
        assert_eq!(pairs[1].alignment_type, AlignmentType::Matched);
        assert_eq!(pairs[1].old_content, pairs[1].new_content);
        assert!(pairs[1].subsections.is_empty());
    }

    #[test]
    fn empty_inputs_yield_empty_or_one_sided_output() {
        assert!(align_sections(Vec::new(), Vec::new()).is_empty());

        let pairs = align_sections(Vec::new(), sample_document());
        assert_eq!(pairs.len(), 3);
        assert!(pairs.iter().all(|p| p.alignment_type == AlignmentType::Added));

        let pairs = align_sections(sample_document(), Vec::new());
        assert!(pairs.iter().all(|p| p.alignment_type == AlignmentType::Deleted));
    }
}
