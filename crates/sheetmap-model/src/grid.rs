//! Raw spreadsheet grids and the headers extracted from them.

use serde::{Deserialize, Serialize};

/// A single decoded spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// A date or datetime, kept in its source text form.
    Date(String),
}

impl CellValue {
    /// Returns true if the cell holds no visible content.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) | CellValue::Date(text) => text.trim().is_empty(),
            CellValue::Number(_) | CellValue::Bool(_) => false,
        }
    }

    /// Returns true for values that look like data rather than header text.
    ///
    /// Text that parses as a number counts as typed if it has a digit, so
    /// words like "Inf" or "NaN" stay header text.
    pub fn is_typed(&self) -> bool {
        match self {
            CellValue::Empty => false,
            CellValue::Number(_) | CellValue::Bool(_) | CellValue::Date(_) => true,
            CellValue::Text(text) => {
                let trimmed = text.trim();
                trimmed.chars().any(|ch| ch.is_ascii_digit()) && trimmed.parse::<f64>().is_ok()
            }
        }
    }

    /// Display text of the cell; empty for [`CellValue::Empty`].
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(text) | CellValue::Date(text) => text.clone(),
            CellValue::Number(value) => format_number(*value),
            CellValue::Bool(value) => value.to_string(),
        }
    }
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// A merged rectangular region, anchored at its top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRegion {
    /// Zero-based row of the anchor cell.
    pub row: usize,
    /// Zero-based column of the anchor cell.
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
}

impl MergeRegion {
    pub fn new(row: usize, col: usize, row_span: usize, col_span: usize) -> Self {
        Self {
            row,
            col,
            row_span,
            col_span,
        }
    }

    /// One past the last row covered by the region, saturating at `usize::MAX`.
    pub fn row_end(&self) -> usize {
        self.row.saturating_add(self.row_span)
    }

    /// One past the last column covered by the region, saturating at `usize::MAX`.
    pub fn col_end(&self) -> usize {
        self.col.saturating_add(self.col_span)
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        (self.row..self.row_end()).contains(&row) && (self.col..self.col_end()).contains(&col)
    }

    pub fn overlaps(&self, other: &MergeRegion) -> bool {
        self.row < other.row_end()
            && other.row < self.row_end()
            && self.col < other.col_end()
            && other.col < self.col_end()
    }
}

/// Rows of decoded cells plus the merged regions of the sheet.
///
/// Rows may be ragged; missing trailing cells read as [`CellValue::Empty`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHeaderGrid {
    pub rows: Vec<Vec<CellValue>>,
    #[serde(default)]
    pub merges: Vec<MergeRegion>,
}

impl RawHeaderGrid {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            rows,
            merges: Vec::new(),
        }
    }

    /// Build a grid of text cells; empty strings become empty cells.
    pub fn from_text_rows<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| CellValue::from(cell.as_ref()))
                    .collect()
            })
            .collect();
        Self::new(rows)
    }

    #[must_use]
    pub fn with_merges(mut self, merges: Vec<MergeRegion>) -> Self {
        self.merges = merges;
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row length in the grid.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|cells| cells.get(col))
    }

    pub fn is_blank(&self) -> bool {
        self.rows.iter().flatten().all(CellValue::is_empty)
    }
}

/// One normalized header label per physical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedHeader {
    pub column_index: usize,
    pub label: String,
}

impl ExtractedHeader {
    pub fn new(column_index: usize, label: impl Into<String>) -> Self {
        Self {
            column_index,
            label: label.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_cells() {
        assert!(CellValue::Number(3.0).is_typed());
        assert!(CellValue::Text(" 12.5 ".into()).is_typed());
        assert!(CellValue::Date("2024-01-01".into()).is_typed());
        assert!(!CellValue::Text("Gas".into()).is_typed());
        assert!(!CellValue::Text("Inf".into()).is_typed());
        assert!(!CellValue::Text("NaN".into()).is_typed());
        assert!(!CellValue::Empty.is_typed());
    }

    #[test]
    fn whole_numbers_render_without_fraction() {
        assert_eq!(CellValue::Number(2023.0).as_text(), "2023");
        assert_eq!(CellValue::Number(1.5).as_text(), "1.5");
    }

    #[test]
    fn merge_region_overlap() {
        let a = MergeRegion::new(0, 1, 1, 2);
        let b = MergeRegion::new(0, 2, 2, 1);
        let c = MergeRegion::new(1, 0, 1, 1);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(a.contains(0, 2));
        assert!(!a.contains(1, 2));
    }

    #[test]
    fn huge_spans_saturate() {
        let region = MergeRegion::new(1, 2, usize::MAX, usize::MAX);
        assert_eq!(region.row_end(), usize::MAX);
        assert_eq!(region.col_end(), usize::MAX);
    }
}
