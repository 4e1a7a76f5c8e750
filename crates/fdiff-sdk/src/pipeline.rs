use std::fs;
use std::path::Path;

use tracing::info;

use fdiff_align::{SectionAligner, SentenceAligner};
use fdiff_tag::EditTagger;
use fdiff_types::{DiffConfig, Section, SectionPair, SentencePair, TaggedSentencePair};

use crate::error::{SdkError, SdkResult};
use crate::report::DiffReport;

/// The full diff pipeline under one configuration.
#[derive(Clone, Debug, Default)]
pub struct FilingDiff {
    sections: SectionAligner,
    sentences: SentenceAligner,
    tagger: EditTagger,
}

impl FilingDiff {
    pub fn new(config: DiffConfig) -> Self {
        Self {
            sections: SectionAligner::new(config.align.clone()),
            sentences: SentenceAligner::new(config.align.clone()),
            tagger: EditTagger::new(config.tag),
        }
    }

    /// Build a pipeline from a TOML configuration file.
    pub fn from_config_file(path: &Path) -> SdkResult<Self> {
        let source = read_to_string(path)?;
        Ok(Self::new(DiffConfig::from_toml(&source)?))
    }

    /// Load a section tree saved as a JSON array.
    pub fn load_sections(path: &Path) -> SdkResult<Vec<Section>> {
        let json = read_to_string(path)?;
        Ok(Section::list_from_json(&json)?)
    }

    /// Load a sentence-pair list saved by a previous run.
    pub fn load_sentence_pairs(path: &Path) -> SdkResult<Vec<SentencePair>> {
        let json = read_to_string(path)?;
        Ok(SentencePair::list_from_json(&json)?)
    }

    pub fn align_sections(&self, old: Vec<Section>, new: Vec<Section>) -> Vec<SectionPair> {
        self.sections.align(old, new)
    }

    pub fn align_sentences(&self, pairs: &[SectionPair]) -> Vec<SentencePair> {
        self.sentences.collect(pairs)
    }

    pub fn tag(&self, pairs: &[SentencePair]) -> Vec<TaggedSentencePair> {
        self.tagger.tag_all(pairs)
    }

    /// Run every stage over two editions of a document.
    pub fn run(&self, old: Vec<Section>, new: Vec<Section>) -> DiffReport {
        info!(old = old.len(), new = new.len(), "aligning sections");
        let section_pairs = self.align_sections(old.clone(), new.clone());

        info!(pairs = section_pairs.len(), "aligning sentences");
        let sentence_pairs = self.align_sentences(&section_pairs);

        info!(pairs = sentence_pairs.len(), "generating edit units");
        let tagged = self.tag(&sentence_pairs);

        let report = DiffReport {
            old_sections: old,
            new_sections: new,
            section_pairs,
            sentence_pairs,
            tagged,
        };
        info!(edits = report.summary().edits, "pipeline completed");
        report
    }
}

fn read_to_string(path: &Path) -> SdkResult<String> {
    fs::read_to_string(path).map_err(|source| SdkError::Read {
        path: path.to_path_buf(),
        source,
    })
}
