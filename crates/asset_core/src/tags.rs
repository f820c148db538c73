//! Comma-delimited tag encoding used by the editable tags field.
//!
//! `split_tags(&join_tags(tags)) == tags` only holds for tags that contain no
//! separator and no surrounding whitespace.

pub const TAG_SEPARATOR: char = ',';

pub fn join_tags(tags: &[String]) -> String {
    tags.join(",")
}

/// Splits on every separator and trims each piece. An empty input yields a
/// single empty tag.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(TAG_SEPARATOR)
        .map(|tag| tag.trim().to_string())
        .collect()
}
