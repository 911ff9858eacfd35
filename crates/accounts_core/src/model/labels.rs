//! Label string conversions used by edit forms.
//!
//! `format_labels(parse_labels(s))` canonicalizes `s`: whitespace around
//! each label is dropped and empty segments disappear.

use super::account::Label;

const LABEL_SEPARATOR: char = ';';
const LABEL_JOINER: &str = "; ";

/// Splits `text` on `;`, trims each piece and drops empty ones.
pub fn parse_labels(text: &str) -> Vec<Label> {
    text.split(LABEL_SEPARATOR)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(Label::new)
        .collect()
}

/// Joins label texts with `"; "`.
pub fn format_labels(labels: &[Label]) -> String {
    labels
        .iter()
        .map(|label| label.text.as_str())
        .collect::<Vec<_>>()
        .join(LABEL_JOINER)
}
