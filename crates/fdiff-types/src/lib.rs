//! Shared data model for filing diffs.
//!
//! Every other `fdiff` crate depends on `fdiff-types`. Trees of [`Section`]
//! come from an external parser; the aligners turn them into trees of
//! [`SectionPair`] and lists of [`SentencePair`], and the tagger renders those
//! into [`TaggedSentencePair`].
//!
//! # Key Types
//!
//! - [`Section`] -- One heading with its body text and children
//! - [`SectionPair`] / [`SimilarityScores`] -- Aligned section tree node
//! - [`AlignedSentence`] / [`SentencePair`] -- Sentence-level alignment
//! - [`EditUnit`] / [`TaggedSentencePair`] -- Tagged edit stream
//! - [`DiffConfig`] -- Thresholds for every stage

pub mod config;
pub mod error;
pub mod section;
pub mod sentence;

pub use config::{AlignConfig, DiffConfig, TagConfig};
pub use error::{ConfigError, ConfigResult, ModelError, ModelResult};
pub use section::{AlignmentType, Section, SectionPair, SimilarityScores, NOT_COMPUTED};
pub use sentence::{AlignedSentence, EditUnit, SentencePair, TaggedSentencePair};
