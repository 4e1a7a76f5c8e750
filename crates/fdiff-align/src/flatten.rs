//! Pre-pass that folds file-reference leaves into their parent.
//!
//! Parsers sometimes split one logical reference to an inline-XBRL file into
//! several placeholder children under an empty parent. Folding them keeps
//! such parents comparable by content instead of by a brittle child list.

use tracing::debug;

use fdiff_types::Section;

/// Rebuild `section` bottom-up. A node with empty content whose children all
/// end with `suffix` takes the children's contents joined by `", "` and
/// loses its children.
pub fn flatten_file_references(section: Section, suffix: &str) -> Section {
    let Section {
        level,
        heading_text,
        content,
        subsections,
    } = section;

    let subsections: Vec<Section> = subsections
        .into_iter()
        .map(|child| flatten_file_references(child, suffix))
        .collect();

    let all_references = !subsections.is_empty()
        && subsections.iter().all(|child| child.content.ends_with(suffix));

    if content.is_empty() && all_references {
        debug!(
            heading = %heading_text,
            children = subsections.len(),
            "folding file references into parent"
        );
        let content = subsections
            .iter()
            .map(|child| child.content.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return Section {
            level,
            heading_text,
            content,
            subsections: Vec::new(),
        };
    }

    Section {
        level,
        heading_text,
        content,
        subsections,
    }
}

/// Apply [`flatten_file_references`] to every root of a document.
pub fn flatten_document(sections: Vec<Section>, suffix: &str) -> Vec<Section> {
    sections
        .into_iter()
        .map(|section| flatten_file_references(section, suffix))
        .collect()
}
