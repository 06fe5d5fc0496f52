//! Utility functions for matching operations.

/// Normalizes text for lexical comparison.
///
/// Lowercases, replaces separators and brackets with spaces and collapses
/// whitespace.
pub fn normalize_text(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(['_', '-', '.', '/', '\\', '(', ')'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::normalize_text;

    #[test]
    fn replaces_separators() {
        assert_eq!(normalize_text(" Gas_Volume (m3) "), "gas volume m3");
        assert_eq!(normalize_text("feed-mass/day"), "feed mass day");
        assert_eq!(normalize_text("Date Time"), "date time");
    }
}
