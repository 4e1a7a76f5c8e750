//! Number-aware character diff rendered with `<del>` / `<add>` tags.

use std::collections::VecDeque;
use std::ops::Range;

use similar::{capture_diff_slices, Algorithm, DiffTag};

use fdiff_align::NUMBER_PLACEHOLDER;

use crate::numbers::{replay, tokenize, NumberedText};

/// One span of a rendered diff.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment {
    Equal(String),
    Deleted(String),
    Added(String),
}

impl Fragment {
    fn is_empty_change(&self) -> bool {
        match self {
            Fragment::Deleted(s) | Fragment::Added(s) => s.is_empty(),
            Fragment::Equal(_) => false,
        }
    }

    fn render_into(&self, out: &mut String) {
        match self {
            Fragment::Equal(s) => out.push_str(s),
            Fragment::Deleted(s) => {
                out.push_str("<del>");
                out.push_str(s);
                out.push_str("</del>");
            }
            Fragment::Added(s) => {
                out.push_str("<add>");
                out.push_str(s);
                out.push_str("</add>");
            }
        }
    }
}

/// Render fragments as tagged text.
pub fn render(fragments: &[Fragment]) -> String {
    let mut out = String::new();
    for fragment in fragments {
        fragment.render_into(&mut out);
    }
    out
}

/// Diff two sentences into cleaned-up fragments.
///
/// Only equal runs longer than `min_common` characters survive as shared
/// text; anything shorter is folded into the surrounding change.
pub fn diff_fragments(old: &str, new: &str, min_common: usize) -> Vec<Fragment> {
    let mut old = NumberedText::extract(old);
    let mut new = NumberedText::extract(new);

    let parts = split_on_common_runs(&old.text, &new.text, min_common);
    let restored = restore_numbers(parts, &mut old.numbers, &mut new.numbers);
    let mut merged = merge_short_runs(restored, min_common);
    merged.retain(|f| !f.is_empty_change());
    merged
}

/// Diff two sentences into tagged text.
pub fn make_diff(old: &str, new: &str, min_common: usize) -> String {
    render(&diff_fragments(old, new, min_common))
}

/// Cut placeholder text at every equal run longer than `min_common`.
///
/// Each run is preceded by the pending mismatch as a deletion/addition pair,
/// kept even when empty so that later merging sees the pair; the trailing
/// mismatch closes the list.
fn split_on_common_runs(old: &str, new: &str, min_common: usize) -> Vec<Fragment> {
    let old_tokens = tokenize(old);
    let new_tokens = tokenize(new);

    let mut parts = Vec::new();
    let mut old_at = 0;
    let mut new_at = 0;

    for (old_run, new_run) in equal_runs(&old_tokens, &new_tokens) {
        let common = &old_tokens[old_run.clone()];
        if char_len(common) <= min_common {
            continue;
        }
        parts.push(Fragment::Deleted(old_tokens[old_at..old_run.start].concat()));
        parts.push(Fragment::Added(new_tokens[new_at..new_run.start].concat()));
        parts.push(Fragment::Equal(common.concat()));
        old_at = old_run.end;
        new_at = new_run.end;
    }

    parts.push(Fragment::Deleted(old_tokens[old_at..].concat()));
    parts.push(Fragment::Added(new_tokens[new_at..].concat()));
    parts
}

/// Maximal equal runs of the LCS alignment, adjacent runs coalesced.
fn equal_runs(old: &[&str], new: &[&str]) -> Vec<(Range<usize>, Range<usize>)> {
    let mut runs: Vec<(Range<usize>, Range<usize>)> = Vec::new();
    for op in capture_diff_slices(Algorithm::Myers, old, new) {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        if tag != DiffTag::Equal {
            continue;
        }
        match runs.last_mut() {
            Some((o, n)) if o.end == old_range.start && n.end == new_range.start => {
                o.end = old_range.end;
                n.end = new_range.end;
            }
            _ => runs.push((old_range, new_range)),
        }
    }
    runs
}

fn char_len(tokens: &[&str]) -> usize {
    tokens.iter().map(|t| t.chars().count()).sum()
}

/// Put the real numerals back.
///
/// Deletions draw from the old queue and additions from the new queue. In
/// shared text one numeral is drawn from each: identical numerals stay
/// shared, different ones become an inline deletion/addition pair.
fn restore_numbers(
    parts: Vec<Fragment>,
    old_numbers: &mut VecDeque<String>,
    new_numbers: &mut VecDeque<String>,
) -> Vec<Fragment> {
    let mut out = Vec::with_capacity(parts.len());
    for part in parts {
        match part {
            Fragment::Deleted(text) => out.push(Fragment::Deleted(replay(&text, old_numbers))),
            Fragment::Added(text) => out.push(Fragment::Added(replay(&text, new_numbers))),
            Fragment::Equal(text) => restore_shared(&text, old_numbers, new_numbers, &mut out),
        }
    }
    out
}

fn restore_shared(
    text: &str,
    old_numbers: &mut VecDeque<String>,
    new_numbers: &mut VecDeque<String>,
    out: &mut Vec<Fragment>,
) {
    let mut shared = String::new();
    let mut pieces = text.split(NUMBER_PLACEHOLDER);
    if let Some(first) = pieces.next() {
        shared.push_str(first);
    }

    for piece in pieces {
        let numbers = if old_numbers.is_empty() || new_numbers.is_empty() {
            None
        } else {
            old_numbers.pop_front().zip(new_numbers.pop_front())
        };
        match numbers {
            None => shared.push_str(NUMBER_PLACEHOLDER),
            Some((old, new)) if old == new => shared.push_str(&old),
            Some((old, new)) => {
                if !shared.is_empty() {
                    out.push(Fragment::Equal(std::mem::take(&mut shared)));
                }
                out.push(Fragment::Deleted(old));
                out.push(Fragment::Added(new));
            }
        }
        shared.push_str(piece);
    }

    if !shared.is_empty() {
        out.push(Fragment::Equal(shared));
    }
}

/// Fold short shared runs, and the change that follows them, into the
/// preceding deletion/addition pair.
fn merge_short_runs(parts: Vec<Fragment>, min_common: usize) -> Vec<Fragment> {
    let mut merged: Vec<Fragment> = Vec::with_capacity(parts.len());
    let mut parts = parts.into_iter().peekable();

    while let Some(part) = parts.next() {
        match part {
            Fragment::Deleted(old) => {
                let next_added = if ends_with_change(&merged) {
                    parts.next_if(|p| matches!(p, Fragment::Added(_)))
                } else {
                    None
                };
                match next_added {
                    Some(Fragment::Added(new)) => extend_change(&mut merged, &old, &new),
                    _ => merged.push(Fragment::Deleted(old)),
                }
            }
            Fragment::Added(new) => merged.push(Fragment::Added(new)),
            Fragment::Equal(text) => {
                if text.chars().count() <= min_common && ends_with_change(&merged) {
                    extend_change(&mut merged, &text, &text);
                } else {
                    merged.push(Fragment::Equal(text));
                }
            }
        }
    }
    merged
}

fn ends_with_change(fragments: &[Fragment]) -> bool {
    matches!(fragments, [.., Fragment::Deleted(_), Fragment::Added(_)])
}

fn extend_change(fragments: &mut [Fragment], old: &str, new: &str) {
    if let [.., Fragment::Deleted(deleted), Fragment::Added(added)] = fragments {
        deleted.push_str(old);
        added.push_str(new);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: usize = 5;

    #[test]
    fn changed_number_absorbs_short_context() {
        assert_eq!(
            make_diff("売上は100億円", "売上は120億円", MIN),
            "<del>売上は100億円</del><add>売上は120億円</add>"
        );
    }

    #[test]
    fn identical_number_stays_bare() {
        let diff = make_diff(
            "当期の売上高は100億円となりました。",
            "当期の売上高は100億円となり、増収でした。",
            MIN,
        );
        assert!(diff.starts_with("当期の売上高は100億円となり"), "{diff}");
        assert!(!diff.contains("<del>100") && !diff.contains("<add>100"), "{diff}");
    }

    #[test]
    fn changed_number_inside_long_shared_text() {
        let diff = make_diff(
            "当社グループの売上高は1,000百万円であり前年と比べて増加しました。",
            "当社グループの売上高は1,200百万円であり前年と比べて増加しました。",
            MIN,
        );
        assert_eq!(
            diff,
            "当社グループの売上高は<del>1,000</del><add>1,200</add>百万円であり前年と比べて増加しました。"
        );
    }

    #[test]
    fn pure_insertion() {
        assert_eq!(
            make_diff("リスク要因は以下の通りです。", "主要なリスク要因は以下の通りです。", MIN),
            "<add>主要な</add>リスク要因は以下の通りです。"
        );
    }

    #[test]
    fn completely_different_text() {
        assert_eq!(make_diff("abc", "xyz", MIN), "<del>abc</del><add>xyz</add>");
    }

    #[test]
    fn identical_text_has_no_tags() {
        let text = "同じ文章です。変更なし。";
        assert_eq!(make_diff(text, text, MIN), text);
    }

    #[test]
    fn number_count_mismatch_keeps_placeholder() {
        let parts = restore_numbers(
            vec![Fragment::Equal("a<NUM>b<NUM>c".into())],
            &mut VecDeque::from(vec!["1".to_string()]),
            &mut VecDeque::from(vec!["1".to_string(), "2".to_string()]),
        );
        assert_eq!(parts, vec![Fragment::Equal("a1b<NUM>c".into())]);
    }

    #[test]
    fn merge_folds_short_equal_into_previous_change() {
        let merged = merge_short_runs(
            vec![
                Fragment::Deleted("x".into()),
                Fragment::Added("y".into()),
                Fragment::Equal("ab".into()),
                Fragment::Deleted("1".into()),
                Fragment::Added("2".into()),
                Fragment::Equal("long shared".into()),
            ],
            MIN,
        );
        assert_eq!(
            merged,
            vec![
                Fragment::Deleted("xab1".into()),
                Fragment::Added("yab2".into()),
                Fragment::Equal("long shared".into()),
            ]
        );
    }

    #[test]
    fn merge_keeps_short_equal_without_preceding_change() {
        let merged = merge_short_runs(
            vec![Fragment::Equal("ab".into()), Fragment::Added("c".into())],
            MIN,
        );
        assert_eq!(merged, vec![Fragment::Equal("ab".into()), Fragment::Added("c".into())]);
    }
}
