//! High-level API for filing diffs.
//!
//! Wires the section aligner, the sentence aligner and the edit tagger into
//! one pipeline and persists its artifacts. This is the entry point for
//! applications embedding the diff.

pub mod error;
pub mod pipeline;
pub mod report;

pub use error::{SdkError, SdkResult};
pub use pipeline::FilingDiff;
pub use report::{ArtifactKind, DiffReport, ReportSummary};

// Re-export key types
pub use fdiff_types::{
    AlignedSentence, AlignmentType, DiffConfig, Section, SectionPair, SentencePair,
    TaggedSentencePair,
};
