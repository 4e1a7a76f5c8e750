use serde::{Deserialize, Serialize};

use crate::error::ModelResult;
use crate::section::AlignmentType;

/// One sentence-level alignment outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlignedSentence {
    pub old_sentence: Option<String>,
    pub new_sentence: Option<String>,
    /// Ratio of the normalized sentences; 0 for unmatched sentences.
    pub similarity_score: f64,
    pub alignment_type: AlignmentType,
}

impl AlignedSentence {
    pub fn matched(old: impl Into<String>, new: impl Into<String>, similarity_score: f64) -> Self {
        Self {
            old_sentence: Some(old.into()),
            new_sentence: Some(new.into()),
            similarity_score,
            alignment_type: AlignmentType::Matched,
        }
    }

    pub fn deleted(old: impl Into<String>) -> Self {
        Self {
            old_sentence: Some(old.into()),
            new_sentence: None,
            similarity_score: 0.0,
            alignment_type: AlignmentType::Deleted,
        }
    }

    pub fn added(new: impl Into<String>) -> Self {
        Self {
            old_sentence: None,
            new_sentence: Some(new.into()),
            similarity_score: 0.0,
            alignment_type: AlignmentType::Added,
        }
    }
}

/// Sentence alignment of one matched section whose body changed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SentencePair {
    /// Old-side ancestor headings joined with `" > "`.
    pub old_heading: String,
    /// New-side ancestor headings joined with `" > "`.
    pub new_heading: String,
    pub old_content: String,
    pub new_content: String,
    pub overall_similarity_score: f64,
    #[serde(default)]
    pub sentence_alignments: Vec<AlignedSentence>,
}

impl SentencePair {
    pub fn list_from_json(json: &str) -> ModelResult<Vec<SentencePair>> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn list_to_json(pairs: &[SentencePair]) -> ModelResult<String> {
        Ok(serde_json::to_string_pretty(pairs)?)
    }
}

/// A numbered `<edit N>` span.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditUnit {
    pub id: usize,
    /// Full markup, including the surrounding `<edit N>` tags.
    pub markup: String,
}

/// A sentence pair rendered into tagged text for the summarizer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedSentencePair {
    pub old_heading: String,
    pub new_heading: String,
    pub processed_sentence_pair: String,
    pub edit_units: Vec<EditUnit>,
}

impl TaggedSentencePair {
    pub fn list_to_json(pairs: &[TaggedSentencePair]) -> ModelResult<String> {
        Ok(serde_json::to_string_pretty(pairs)?)
    }
}
