//! Numeral extraction and replay.
//!
//! Numerals are swapped for a placeholder before diffing so that a changed
//! figure does not fragment the surrounding text, then replayed in order.

use std::collections::VecDeque;

use fdiff_align::normalize::NUMBER_RUN;
use fdiff_align::NUMBER_PLACEHOLDER;

/// Text with every numeral replaced by the placeholder, plus the numerals
/// in reading order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NumberedText {
    pub text: String,
    pub numbers: VecDeque<String>,
}

impl NumberedText {
    pub fn extract(text: &str) -> Self {
        let numbers = NUMBER_RUN
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();
        let text = NUMBER_RUN.replace_all(text, NUMBER_PLACEHOLDER).into_owned();
        Self { text, numbers }
    }
}

/// Split placeholder text into diff tokens: one token per character, except
/// that each placeholder is a single indivisible token.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        let len = if rest.starts_with(NUMBER_PLACEHOLDER) {
            NUMBER_PLACEHOLDER.len()
        } else {
            c.len_utf8()
        };
        tokens.push(&rest[..len]);
        rest = &rest[len..];
    }
    tokens
}

/// Replace every placeholder in `text` with the next value from `queue`.
///
/// When the queue runs dry the placeholder is left in place.
pub fn replay(text: &str, queue: &mut VecDeque<String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pieces = text.split(NUMBER_PLACEHOLDER);
    if let Some(first) = pieces.next() {
        out.push_str(first);
    }
    for piece in pieces {
        match queue.pop_front() {
            Some(number) => out.push_str(&number),
            None => out.push_str(NUMBER_PLACEHOLDER),
        }
        out.push_str(piece);
    }
    out
}
