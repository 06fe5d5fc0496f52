//! Label normalization shared by extraction and matching.

/// Trim and collapse internal whitespace runs to a single space, keeping casing.
pub fn collapse_whitespace(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

/// Case-folded form used for exact and alias comparisons.
pub fn fold_label(raw: &str) -> String {
    collapse_whitespace(raw).to_lowercase()
}
