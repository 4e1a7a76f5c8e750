//! Tuning parameters for alignment and tagging.
//!
//! The defaults were tuned against real disclosure filings and should only be
//! changed together with a regression corpus.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Minimum heading (or subsection-heading-list) similarity to accept a
/// section match. Comparison is strict.
pub const HEADING_THRESHOLD: f64 = 0.6;
/// Minimum content similarity for the shallow-level content fallback.
pub const CONTENT_THRESHOLD: f64 = 0.3;
/// Deepest level at which the content fallback applies.
pub const CONTENT_FALLBACK_MAX_LEVEL: usize = 1;
/// Minimum similarity to match in-body headings and sentences.
pub const SENTENCE_THRESHOLD: f64 = 0.5;
/// Equal runs of at most this many characters are folded into a change.
pub const COMMON_TEXT_MIN_LENGTH: usize = 5;
/// Anchor lines must be shorter than this many characters.
pub const ANCHOR_MAX_LENGTH: usize = 40;
/// Anchor lines must be longer than this many characters.
pub const ANCHOR_MIN_LENGTH: usize = 2;
/// Suffix of a leaf whose content is only a pointer to an inline-XBRL file.
pub const FILE_REFERENCE_SUFFIX: &str = "ixbrl.htm";
/// Suffix of content that merely references an external document.
pub const EXTERNAL_REFERENCE_SUFFIX: &str = ".htm";

/// Section and sentence alignment parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    pub heading_threshold: f64,
    pub content_threshold: f64,
    pub content_fallback_max_level: usize,
    pub sentence_threshold: f64,
    pub anchor_min_length: usize,
    pub anchor_max_length: usize,
    pub file_reference_suffix: String,
    pub external_reference_suffix: String,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            heading_threshold: HEADING_THRESHOLD,
            content_threshold: CONTENT_THRESHOLD,
            content_fallback_max_level: CONTENT_FALLBACK_MAX_LEVEL,
            sentence_threshold: SENTENCE_THRESHOLD,
            anchor_min_length: ANCHOR_MIN_LENGTH,
            anchor_max_length: ANCHOR_MAX_LENGTH,
            file_reference_suffix: FILE_REFERENCE_SUFFIX.to_string(),
            external_reference_suffix: EXTERNAL_REFERENCE_SUFFIX.to_string(),
        }
    }
}

impl AlignConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        check_threshold("heading_threshold", self.heading_threshold)?;
        check_threshold("content_threshold", self.content_threshold)?;
        check_threshold("sentence_threshold", self.sentence_threshold)?;
        if self.anchor_max_length == 0 {
            return Err(ConfigError::ZeroLength { name: "anchor_max_length" });
        }
        Ok(())
    }
}

/// Edit tagging parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagConfig {
    pub common_text_min_length: usize,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            common_text_min_length: COMMON_TEXT_MIN_LENGTH,
        }
    }
}

/// Complete configuration, as read from a TOML file.
///
/// ```toml
/// [align]
/// heading_threshold = 0.6
///
/// [tag]
/// common_text_min_length = 5
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    pub align: AlignConfig,
    pub tag: TagConfig,
}

impl DiffConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml(source: &str) -> ConfigResult<Self> {
        let config: DiffConfig =
            toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.align.validate()
    }
}

fn check_threshold(name: &'static str, value: f64) -> ConfigResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ThresholdOutOfRange { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let c = DiffConfig::default();
        assert_eq!(c.align.heading_threshold, 0.6);
        assert_eq!(c.align.content_threshold, 0.3);
        assert_eq!(c.align.sentence_threshold, 0.5);
        assert_eq!(c.align.anchor_max_length, 40);
        assert_eq!(c.align.content_fallback_max_level, 1);
        assert_eq!(c.tag.common_text_min_length, 5);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let c = DiffConfig::from_toml("[align]\nheading_threshold = 0.7\n").unwrap();
        assert_eq!(c.align.heading_threshold, 0.7);
        assert_eq!(c.align.sentence_threshold, 0.5);
        assert_eq!(c.tag, TagConfig::default());
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(DiffConfig::from_toml("").unwrap(), DiffConfig::default());
    }

    #[test]
    fn out_of_range_threshold_rejected() {
        let err = DiffConfig::from_toml("[align]\ncontent_threshold = 1.5\n").unwrap_err();
        assert_eq!(
            err,
            ConfigError::ThresholdOutOfRange {
                name: "content_threshold",
                value: 1.5
            }
        );
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = DiffConfig::from_toml("[align\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
