//! Alignment engine for filing diffs.
//!
//! Aligns two editions of a sectioned document: first the section trees,
//! then the sentences inside every matched section whose body changed.
//!
//! # Key Types
//!
//! - [`SectionAligner`] -- Tree alignment (ordered or optimal per sibling list)
//! - [`SentenceAligner`] -- Anchor-segmented sentence alignment
//! - [`MatchTable`] / [`Slot`] -- Match discovery and order assembly

pub mod assignment;
pub mod flatten;
pub mod matching;
pub mod normalize;
pub mod section;
pub mod sentence;
pub mod similarity;

pub use flatten::{flatten_document, flatten_file_references};
pub use matching::{Match, MatchTable, Slot};
pub use normalize::{normalize_heading, normalize_text, NUMBER_PLACEHOLDER};
pub use section::{align_sections, SectionAligner};
pub use sentence::{aligned_sentences, split_sentences, SentenceAligner};
pub use similarity::{heading_similarity, ratio, SectionSignals};
