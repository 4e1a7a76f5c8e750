use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelResult;

/// Sentinel score for a signal that was not computed because one side
/// lacked it (no subsections, empty content, anchored match).
pub const NOT_COMPUTED: f64 = -1.0;

/// How an item in one edition relates to the other edition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentType {
    /// Present in both editions.
    Matched,
    /// Present only in the old edition.
    Deleted,
    /// Present only in the new edition.
    Added,
}

impl AlignmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Matched => "matched",
            Self::Deleted => "deleted",
            Self::Added => "added",
        }
    }
}

impl fmt::Display for AlignmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of a parsed document: a heading, its body text and its children.
///
/// Trees are produced by an external parser. Children are owned by their
/// parent, so a tree can never share or cycle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Nesting depth, 0 for top-level sections.
    pub level: usize,
    pub heading_text: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub subsections: Vec<Section>,
}

impl Section {
    /// Create a leaf section.
    pub fn new(level: usize, heading_text: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            level,
            heading_text: heading_text.into(),
            content: content.into(),
            subsections: Vec::new(),
        }
    }

    /// Builder-style helper that appends a child.
    pub fn with_subsection(mut self, subsection: Section) -> Self {
        self.subsections.push(subsection);
        self
    }

    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.subsections.iter().map(Section::node_count).sum::<usize>()
    }

    /// Parse a JSON array of top-level sections.
    pub fn list_from_json(json: &str) -> ModelResult<Vec<Section>> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize a list of top-level sections as pretty JSON.
    pub fn list_to_json(sections: &[Section]) -> ModelResult<String> {
        Ok(serde_json::to_string_pretty(sections)?)
    }
}

/// The four similarity signals recorded for an aligned pair.
///
/// Each value is in `[0, 1]`, or [`NOT_COMPUTED`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimilarityScores {
    /// The signal that decided the match.
    #[serde(rename = "similarity_score")]
    pub overall: f64,
    #[serde(rename = "heading_similarity_score")]
    pub heading: f64,
    #[serde(rename = "subsection_similarity_score")]
    pub subsection: f64,
    #[serde(rename = "content_similarity_score")]
    pub content: f64,
}

impl SimilarityScores {
    pub const fn zero() -> Self {
        Self {
            overall: 0.0,
            heading: 0.0,
            subsection: 0.0,
            content: 0.0,
        }
    }

    /// Scores for a match accepted without comparison.
    pub const fn anchored() -> Self {
        Self {
            overall: 1.0,
            heading: NOT_COMPUTED,
            subsection: NOT_COMPUTED,
            content: NOT_COMPUTED,
        }
    }
}

/// A node of the aligned tree: an old section, a new section, or both.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionPair {
    pub level: usize,
    pub old_heading: Option<String>,
    pub new_heading: Option<String>,
    pub old_content: Option<String>,
    pub new_content: Option<String>,
    pub alignment_type: AlignmentType,
    #[serde(flatten)]
    pub scores: SimilarityScores,
    #[serde(default)]
    pub subsections: Vec<SectionPair>,
}

impl SectionPair {
    /// A pair present on both sides with its already-aligned children.
    pub fn matched(
        level: usize,
        old: &Section,
        new: &Section,
        scores: SimilarityScores,
        subsections: Vec<SectionPair>,
    ) -> Self {
        Self {
            level,
            old_heading: Some(old.heading_text.clone()),
            new_heading: Some(new.heading_text.clone()),
            old_content: Some(old.content.clone()),
            new_content: Some(new.content.clone()),
            alignment_type: AlignmentType::Matched,
            scores,
            subsections,
        }
    }

    /// A leaf for an old section with no counterpart.
    pub fn deleted(level: usize, old: &Section) -> Self {
        Self {
            level,
            old_heading: Some(old.heading_text.clone()),
            new_heading: None,
            old_content: Some(old.content.clone()),
            new_content: None,
            alignment_type: AlignmentType::Deleted,
            scores: SimilarityScores::zero(),
            subsections: Vec::new(),
        }
    }

    /// A leaf for a new section with no counterpart.
    pub fn added(level: usize, new: &Section) -> Self {
        Self {
            level,
            old_heading: None,
            new_heading: Some(new.heading_text.clone()),
            old_content: None,
            new_content: Some(new.content.clone()),
            alignment_type: AlignmentType::Added,
            scores: SimilarityScores::zero(),
            subsections: Vec::new(),
        }
    }

    pub fn is_matched(&self) -> bool {
        self.alignment_type == AlignmentType::Matched
    }

    /// Visit this pair and all descendants depth-first, parents first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a SectionPair)) {
        visit(self);
        for child in &self.subsections {
            child.walk(visit);
        }
    }

    /// Count of pairs with the given type in this subtree.
    pub fn count(&self, alignment_type: AlignmentType) -> usize {
        let mut n = 0;
        self.walk(&mut |p| {
            if p.alignment_type == alignment_type {
                n += 1;
            }
        });
        n
    }

    pub fn list_from_json(json: &str) -> ModelResult<Vec<SectionPair>> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn list_to_json(pairs: &[SectionPair]) -> ModelResult<String> {
        Ok(serde_json::to_string_pretty(pairs)?)
    }
}
