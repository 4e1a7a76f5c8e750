//! Sentence-level alignment inside matched sections.
//!
//! Each body is first cut at in-body headings ("anchor lines") that match
//! across editions, then sentences are aligned segment by segment with the
//! same forward-only matcher the section aligner uses.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use fdiff_types::{AlignConfig, AlignedSentence, SectionPair, SentencePair};

use crate::matching::{find_ordered, ordered_slots, MatchTable, Slot};
use crate::normalize::{normalize_inline_heading, normalize_text};
use crate::similarity::ratio;

/// Separator between ancestor headings in a heading path.
pub const HEADING_PATH_SEPARATOR: &str = " > ";

static TABLE_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<table\d+>$").expect("table pattern is valid"));

/// Roman numeral, bracketed label, or a lone leading digit that does not
/// start a quantity.
static ANCHOR_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[IV]|[(\[{<〔][^)\]}〕>]+[)\]}〕>]|[0-9](?:[^0-9.,十百千万億兆]|$))")
        .expect("anchor pattern is valid")
});

/// A single bracketed character alone on its line, e.g. a footnote marker.
static FOOTNOTE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[(\[{<〔][^)\]}〕>][)\]}〕>]\s*$").expect("footnote pattern is valid")
});

static SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^。\n]+。|[^。\n]+").expect("sentence pattern is valid"));

const NOTE_PREFIX: &str = "(注)";

/// A body with table placeholders removed and its anchor lines listed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractedBody {
    /// Every kept line, anchors included, each terminated by `\n`.
    pub body: String,
    pub headings: Vec<String>,
}

/// Aligns sentences of matched section pairs with a fixed configuration.
#[derive(Clone, Debug, Default)]
pub struct SentenceAligner {
    config: AlignConfig,
}

impl SentenceAligner {
    pub fn new(config: AlignConfig) -> Self {
        Self { config }
    }

    /// Drop empty and table-placeholder lines and collect anchor lines.
    pub fn extract(&self, text: &str) -> ExtractedBody {
        let mut extracted = ExtractedBody::default();
        for line in text.lines() {
            if line.is_empty() || TABLE_PLACEHOLDER.is_match(line) {
                continue;
            }
            if self.is_anchor(line) {
                extracted.headings.push(line.to_string());
            }
            extracted.body.push_str(line);
            extracted.body.push('\n');
        }
        extracted
    }

    /// Whether `line` looks like a numbered or bracketed sub-heading.
    pub fn is_anchor(&self, line: &str) -> bool {
        let len = line.chars().count();
        len > self.config.anchor_min_length
            && len < self.config.anchor_max_length
            && !line.starts_with(NOTE_PREFIX)
            && !FOOTNOTE_MARKER.is_match(line)
            && ANCHOR_START.is_match(line)
    }

    /// Align two bodies, using their matched anchor lines as cut points.
    pub fn align(
        &self,
        old_text: &str,
        new_text: &str,
        old_headings: &[String],
        new_headings: &[String],
    ) -> Vec<AlignedSentence> {
        let heading_table =
            self.find_matches(old_headings, new_headings, normalize_inline_heading);
        let heading_alignment = build_alignment(old_headings, new_headings, &heading_table);

        let (old_segments, new_segments) = cut_segments(old_text, new_text, &heading_alignment);

        let mut results = Vec::new();
        for (old_segment, new_segment) in old_segments.iter().zip(&new_segments) {
            let old_sentences = split_sentences(old_segment);
            let new_sentences = split_sentences(new_segment);
            if old_sentences.is_empty() && new_sentences.is_empty() {
                continue;
            }
            let table = self.find_matches(&old_sentences, &new_sentences, normalize_text);
            results.extend(build_alignment(&old_sentences, &new_sentences, &table));
        }
        results
    }

    /// Ordered matching at the sentence threshold on normalized keys.
    pub fn find_matches(
        &self,
        old: &[String],
        new: &[String],
        normalize: fn(&str) -> String,
    ) -> MatchTable<f64> {
        let old_keys: Vec<String> = old.iter().map(|s| normalize(s)).collect();
        let new_keys: Vec<String> = new.iter().map(|s| normalize(s)).collect();
        let threshold = self.config.sentence_threshold;

        find_ordered(old_keys.len(), new_keys.len(), |i, j| {
            let similarity = ratio(&old_keys[i], &new_keys[j]);
            (similarity > threshold).then_some(similarity)
        })
    }

    /// Walk an aligned tree and build a [`SentencePair`] for every matched
    /// section whose body changed.
    pub fn collect(&self, pairs: &[SectionPair]) -> Vec<SentencePair> {
        let mut out = Vec::new();
        let mut old_path = Vec::new();
        let mut new_path = Vec::new();
        for pair in pairs {
            self.collect_pair(pair, &mut old_path, &mut new_path, &mut out);
        }
        debug!(sentence_pairs = out.len(), "sentence alignment complete");
        out
    }

    fn collect_pair<'a>(
        &self,
        pair: &'a SectionPair,
        old_path: &mut Vec<&'a str>,
        new_path: &mut Vec<&'a str>,
        out: &mut Vec<SentencePair>,
    ) {
        if let Some(h) = pair.old_heading.as_deref() {
            old_path.push(h);
        }
        if let Some(h) = pair.new_heading.as_deref() {
            new_path.push(h);
        }

        if let (Some(old), Some(new)) = (pair.old_content.as_deref(), pair.new_content.as_deref()) {
            if let Some(sentence_pair) = self.sentence_pair(old, new, old_path, new_path) {
                out.push(sentence_pair);
            }
        }

        for child in &pair.subsections {
            self.collect_pair(child, old_path, new_path, out);
        }

        if pair.new_heading.is_some() {
            new_path.pop();
        }
        if pair.old_heading.is_some() {
            old_path.pop();
        }
    }

    fn sentence_pair(
        &self,
        old_content: &str,
        new_content: &str,
        old_path: &[&str],
        new_path: &[&str],
    ) -> Option<SentencePair> {
        if old_content.is_empty() || new_content.is_empty() {
            return None;
        }
        let suffix = self.config.external_reference_suffix.as_str();
        if is_external_reference(old_content, suffix)
            || is_external_reference(new_content, suffix)
        {
            return None;
        }

        let old = self.extract(old_content);
        let new = self.extract(new_content);
        if old.body == new.body {
            return None;
        }

        let overall_similarity_score = ratio(&old.body, &new.body);
        let sentence_alignments = self.align(&old.body, &new.body, &old.headings, &new.headings);

        Some(SentencePair {
            old_heading: old_path.join(HEADING_PATH_SEPARATOR),
            new_heading: new_path.join(HEADING_PATH_SEPARATOR),
            old_content: old.body,
            new_content: new.body,
            overall_similarity_score,
            sentence_alignments,
        })
    }
}

/// Sentence pairs for an aligned tree with the default configuration.
pub fn aligned_sentences(pairs: &[SectionPair]) -> Vec<SentencePair> {
    SentenceAligner::default().collect(pairs)
}

/// Split into sentences: runs ending with `。` (kept) or at a line break.
pub fn split_sentences(text: &str) -> Vec<String> {
    SENTENCE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Turn a match table into aligned sentences in old order, with unmatched
/// new sentences placed at their gap.
pub fn build_alignment(
    old: &[String],
    new: &[String],
    table: &MatchTable<f64>,
) -> Vec<AlignedSentence> {
    ordered_slots(table, new.len())
        .into_iter()
        .map(|slot| match slot {
            Slot::Matched { old: i, new: j } => {
                let score = table[i].as_ref().map_or(0.0, |m| m.score);
                AlignedSentence::matched(old[i].as_str(), new[j].as_str(), score)
            }
            Slot::Deleted { old: i } => AlignedSentence::deleted(old[i].as_str()),
            Slot::Added { new: j } => AlignedSentence::added(new[j].as_str()),
        })
        .collect()
}

/// Cut both bodies at each matched heading. Segment `k` runs from the
/// previous cut up to the `k`-th matched heading; the last runs to the end.
/// Headings that cannot be located forward of the previous cut on either
/// side are skipped on both.
fn cut_segments<'t>(
    old_text: &'t str,
    new_text: &'t str,
    headings: &[AlignedSentence],
) -> (Vec<&'t str>, Vec<&'t str>) {
    let mut old_cursor = Cursor::default();
    let mut new_cursor = Cursor::default();
    let mut old_segments = Vec::new();
    let mut new_segments = Vec::new();

    for heading in headings {
        let (Some(old_heading), Some(new_heading)) =
            (heading.old_sentence.as_deref(), heading.new_sentence.as_deref())
        else {
            continue;
        };
        let (Some(old_at), Some(new_at)) = (
            old_cursor.locate(old_text, old_heading),
            new_cursor.locate(new_text, new_heading),
        ) else {
            continue;
        };
        old_segments.push(old_cursor.advance(old_text, old_at, old_heading.len()));
        new_segments.push(new_cursor.advance(new_text, new_at, new_heading.len()));
    }

    old_segments.push(&old_text[old_cursor.start..]);
    new_segments.push(&new_text[new_cursor.start..]);
    (old_segments, new_segments)
}

/// Byte positions while cutting one body.
#[derive(Default)]
struct Cursor {
    /// Start of the segment being built.
    start: usize,
    /// Where the next heading search begins.
    search_from: usize,
}

impl Cursor {
    fn locate(&self, text: &str, heading: &str) -> Option<usize> {
        text[self.search_from..]
            .find(heading)
            .map(|offset| self.search_from + offset)
    }

    fn advance<'t>(&mut self, text: &'t str, at: usize, heading_len: usize) -> &'t str {
        let segment = &text[self.start..at];
        self.start = at;
        self.search_from = at + heading_len;
        segment
    }
}

fn is_external_reference(content: &str, suffix: &str) -> bool {
    !suffix.is_empty() && content.trim_end().ends_with(suffix)
}
