//! Edit tagging for aligned sentences.
//!
//! Turns sentence alignments into text marked up with numbered
//! `<edit N>` spans holding `<del>` / `<add>` changes. Numerals are compared
//! as whole values, so `100` → `120` is never rendered as a one-digit edit.

pub mod diff;
pub mod edit;
pub mod numbers;

pub use diff::{diff_fragments, make_diff, render, Fragment};
pub use edit::{tag_sentence_pairs, EditTagger};
pub use numbers::NumberedText;
