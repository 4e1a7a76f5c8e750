//! Edit-unit assembly.

use tracing::debug;

use fdiff_types::{
    AlignedSentence, AlignmentType, EditUnit, SentencePair, TagConfig, TaggedSentencePair,
};

use crate::diff::make_diff;

/// Renders aligned sentences as numbered edit units.
#[derive(Clone, Debug, Default)]
pub struct EditTagger {
    config: TagConfig,
}

impl EditTagger {
    pub fn new(config: TagConfig) -> Self {
        Self { config }
    }

    /// Render one aligned sentence.
    ///
    /// Returns the rendered text, the edit unit if the sentence changed, and
    /// the next free edit id. Unchanged sentences consume no id.
    pub fn edit_unit(
        &self,
        sentence: &AlignedSentence,
        id: usize,
    ) -> (String, Option<EditUnit>, usize) {
        let old = sentence.old_sentence.as_deref().unwrap_or_default();
        let new = sentence.new_sentence.as_deref().unwrap_or_default();

        let body = match sentence.alignment_type {
            AlignmentType::Added => format!("<add>{new}</add>"),
            AlignmentType::Deleted => format!("<del>{old}</del>"),
            AlignmentType::Matched if old == new => return (old.to_string(), None, id),
            AlignmentType::Matched => make_diff(old, new, self.config.common_text_min_length),
        };

        let markup = format!("<edit {id}>{body}</edit {id}>");
        (markup.clone(), Some(EditUnit { id, markup }), id + 1)
    }

    /// Tag one sentence pair, starting from edit id `id`.
    ///
    /// Returns the tagged pair and the next free edit id.
    pub fn tag_pair(&self, pair: &SentencePair, mut id: usize) -> (TaggedSentencePair, usize) {
        let mut processed = String::new();
        let mut edit_units = Vec::new();
        for sentence in &pair.sentence_alignments {
            let (text, unit, next) = self.edit_unit(sentence, id);
            processed.push_str(&text);
            edit_units.extend(unit);
            id = next;
        }

        let tagged = TaggedSentencePair {
            old_heading: pair.old_heading.clone(),
            new_heading: pair.new_heading.clone(),
            processed_sentence_pair: processed,
            edit_units,
        };
        (tagged, id)
    }

    /// Tag every pair with one document-wide counter starting at 0.
    pub fn tag_all(&self, pairs: &[SentencePair]) -> Vec<TaggedSentencePair> {
        let mut id = 0;
        let tagged: Vec<_> = pairs
            .iter()
            .map(|pair| {
                let (tagged, next) = self.tag_pair(pair, id);
                id = next;
                tagged
            })
            .collect();
        debug!(pairs = tagged.len(), edits = id, "tagged sentence pairs");
        tagged
    }
}

/// Tag sentence pairs with the default configuration.
pub fn tag_sentence_pairs(pairs: &[SentencePair]) -> Vec<TaggedSentencePair> {
    EditTagger::default().tag_all(pairs)
}
