//! Text normalization applied before any similarity comparison.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Token that stands in for every digit run during comparison.
pub const NUMBER_PLACEHOLDER: &str = "<NUM>";

/// A digit followed by any mix of digits, commas and periods.
pub static NUMBER_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9][0-9,.]*").expect("number pattern is valid"));

static HEADING_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9()\[\]（）【】]").expect("heading noise pattern is valid"));

static LEADING_HEADING_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9()\[\]（）【】]+").expect("leading noise pattern is valid"));

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Section heading key: digits and brackets removed anywhere, trimmed and
/// lower-cased, so that renumbering does not affect comparison.
pub fn normalize_heading(heading: &str) -> String {
    HEADING_NOISE.replace_all(heading, "").trim().to_lowercase()
}

/// In-body heading key: only a leading numeral/bracket run is removed.
pub fn normalize_inline_heading(heading: &str) -> String {
    LEADING_HEADING_NOISE.replace(heading, "").trim().to_lowercase()
}

/// Content key: NFKC, digit runs collapsed to [`NUMBER_PLACEHOLDER`],
/// whitespace removed.
pub fn normalize_text(text: &str) -> String {
    let folded: String = text.nfkc().collect();
    let numbered = NUMBER_RUN.replace_all(&folded, NUMBER_PLACEHOLDER);
    WHITESPACE.replace_all(&numbered, "").into_owned()
}
