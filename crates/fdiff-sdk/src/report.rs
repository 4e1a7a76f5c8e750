use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use fdiff_types::{AlignmentType, Section, SectionPair, SentencePair, TaggedSentencePair};

use crate::error::{SdkError, SdkResult};

/// Everything one pipeline run produces.
#[derive(Clone, Debug, PartialEq)]
pub struct DiffReport {
    pub old_sections: Vec<Section>,
    pub new_sections: Vec<Section>,
    pub section_pairs: Vec<SectionPair>,
    pub sentence_pairs: Vec<SentencePair>,
    pub tagged: Vec<TaggedSentencePair>,
}

/// The persisted artifacts of a run, in the order they are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactKind {
    OldSections,
    NewSections,
    SectionPairs,
    AlignedSentences,
    ProcessedSentences,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::OldSections,
        ArtifactKind::NewSections,
        ArtifactKind::SectionPairs,
        ArtifactKind::AlignedSentences,
        ArtifactKind::ProcessedSentences,
    ];

    pub fn suffix(&self) -> &'static str {
        match self {
            Self::OldSections => "old",
            Self::NewSections => "new",
            Self::SectionPairs => "section_pairs",
            Self::AlignedSentences => "aligned_sentences",
            Self::ProcessedSentences => "processed_aligned_sentences",
        }
    }

    /// `<ticker>_<suffix>.json`
    pub fn file_name(&self, ticker: &str) -> String {
        format!("{ticker}_{}.json", self.suffix())
    }
}

/// Counts over a report, for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub matched: usize,
    pub deleted: usize,
    pub added: usize,
    pub sentence_pairs: usize,
    pub edits: usize,
}

impl ReportSummary {
    pub fn count(&self, alignment_type: AlignmentType) -> usize {
        match alignment_type {
            AlignmentType::Matched => self.matched,
            AlignmentType::Deleted => self.deleted,
            AlignmentType::Added => self.added,
        }
    }
}

impl DiffReport {
    pub fn summary(&self) -> ReportSummary {
        let count = |t: AlignmentType| -> usize {
            self.section_pairs.iter().map(|p| p.count(t)).sum()
        };
        ReportSummary {
            matched: count(AlignmentType::Matched),
            deleted: count(AlignmentType::Deleted),
            added: count(AlignmentType::Added),
            sentence_pairs: self.sentence_pairs.len(),
            edits: self.tagged.iter().map(|t| t.edit_units.len()).sum(),
        }
    }

    /// Serialize one artifact as pretty JSON.
    pub fn artifact_json(&self, kind: ArtifactKind) -> SdkResult<String> {
        let json = match kind {
            ArtifactKind::OldSections => Section::list_to_json(&self.old_sections)?,
            ArtifactKind::NewSections => Section::list_to_json(&self.new_sections)?,
            ArtifactKind::SectionPairs => SectionPair::list_to_json(&self.section_pairs)?,
            ArtifactKind::AlignedSentences => SentencePair::list_to_json(&self.sentence_pairs)?,
            ArtifactKind::ProcessedSentences => TaggedSentencePair::list_to_json(&self.tagged)?,
        };
        Ok(json)
    }

    /// Write every artifact under `<result_dir>/<ticker>/`.
    ///
    /// Returns the written paths in [`ArtifactKind::ALL`] order.
    pub fn save(&self, result_dir: &Path, ticker: &str) -> SdkResult<Vec<PathBuf>> {
        validate_ticker(ticker)?;
        let dir = result_dir.join(ticker);
        fs::create_dir_all(&dir).map_err(|source| SdkError::Write {
            path: dir.clone(),
            source,
        })?;

        let mut written = Vec::with_capacity(ArtifactKind::ALL.len());
        for kind in ArtifactKind::ALL {
            let path = dir.join(kind.file_name(ticker));
            let json = self.artifact_json(kind)?;
            fs::write(&path, json).map_err(|source| SdkError::Write {
                path: path.clone(),
                source,
            })?;
            written.push(path);
        }
        info!(dir = %dir.display(), files = written.len(), "saved artifacts");
        Ok(written)
    }
}

fn validate_ticker(ticker: &str) -> SdkResult<()> {
    let bad = ticker.is_empty()
        || ticker == "."
        || ticker == ".."
        || ticker.contains(['/', '\\']);
    if bad {
        return Err(SdkError::InvalidTicker(ticker.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::FilingDiff;

    fn sample_report() -> DiffReport {
        let old = vec![
            Section::new(0, "Cover", ""),
            Section::new(0, "Results", "Sales rose.\nMargins held.\n"),
        ];
        let new = vec![
            Section::new(0, "Cover", ""),
            Section::new(0, "Results", "Sales rose sharply.\nMargins held.\n"),
            Section::new(0, "Outlook", "Stable."),
        ];
        FilingDiff::default().run(old, new)
    }

    #[test]
    fn summary_counts_pairs_and_edits() {
        let summary = sample_report().summary();
        assert_eq!(summary.matched, 2);
        assert_eq!(summary.added, 1);
        assert_eq!(summary.deleted, 0);
        assert_eq!(summary.sentence_pairs, 1);
        assert_eq!(summary.edits, 1);
    }

    #[test]
    fn save_writes_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report();
        let written = report.save(dir.path(), "7203").unwrap();

        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "7203_old.json",
                "7203_new.json",
                "7203_section_pairs.json",
                "7203_aligned_sentences.json",
                "7203_processed_aligned_sentences.json",
            ]
        );
        assert!(written.iter().all(|p| p.parent() == Some(dir.path().join("7203").as_path())));

        let saved = fs::read_to_string(&written[3]).unwrap();
        assert_eq!(SentencePair::list_from_json(&saved).unwrap(), report.sentence_pairs);

        let sections = fs::read_to_string(&written[0]).unwrap();
        assert_eq!(Section::list_from_json(&sections).unwrap(), report.old_sections);
    }

    #[test]
    fn ticker_must_be_a_plain_name() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report();
        for ticker in ["", "..", "a/b"] {
            assert!(matches!(
                report.save(dir.path(), ticker),
                Err(SdkError::InvalidTicker(_))
            ));
        }
    }
}
