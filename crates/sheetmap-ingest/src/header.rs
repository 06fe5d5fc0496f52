//! Header extraction from raw grids.
//!
//! Resolves merged cells, detects how many leading rows form the header and
//! concatenates multi-row headers into one normalized label per column.

use sheetmap_model::{CellValue, ExtractedHeader, MergeRegion, RawHeaderGrid, collapse_whitespace};
use tracing::debug;

use crate::error::GridError;

/// Default number of leading rows scanned for header content.
pub const DEFAULT_MAX_HEADER_ROWS: usize = 5;
/// Default share of the grid width a row must fill before typed cells mark it as data.
pub const DEFAULT_DATA_ROW_MIN_FILL: f64 = 0.3;

/// Heuristic used to find where header rows end and data begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionPolicy {
    /// Rows beyond this are never treated as header.
    pub max_header_rows: usize,
    /// Fraction of the grid width (0.0-1.0).
    pub data_row_min_fill: f64,
}

impl Default for DetectionPolicy {
    fn default() -> Self {
        Self {
            max_header_rows: DEFAULT_MAX_HEADER_ROWS,
            data_row_min_fill: DEFAULT_DATA_ROW_MIN_FILL,
        }
    }
}

/// How the header row span of a sheet is determined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeaderSpan {
    /// Detect the span from cell contents.
    Auto(DetectionPolicy),
    /// Use a fixed number of leading rows (at least one).
    Fixed(usize),
}

impl Default for HeaderSpan {
    fn default() -> Self {
        Self::Auto(DetectionPolicy::default())
    }
}

/// Headers extracted from one sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetHeaders {
    /// Number of leading rows treated as header; 0 for an empty sheet.
    pub header_row_count: usize,
    pub headers: Vec<ExtractedHeader>,
}

#[derive(Debug, Default, Clone, Copy)]
struct RowStats {
    non_empty: usize,
    typed: usize,
    text: usize,
}

fn row_stats(row: &[CellValue]) -> RowStats {
    let mut stats = RowStats::default();
    for cell in row {
        if cell.is_empty() {
            continue;
        }
        stats.non_empty += 1;
        if cell.is_typed() {
            stats.typed += 1;
        } else {
            stats.text += 1;
        }
    }
    stats
}

fn is_data_like(stats: RowStats, width: usize, policy: &DetectionPolicy) -> bool {
    if stats.typed == 0 {
        return false;
    }
    stats.non_empty as f64 > policy.data_row_min_fill * width as f64 || stats.typed > stats.text
}

fn is_header_like(stats: RowStats) -> bool {
    stats.text * 2 > stats.non_empty
}

/// Count the leading header rows of a merge-resolved grid.
///
/// Blank rows neither extend nor end the header. The result is at least one.
fn detect_header_rows(rows: &[Vec<CellValue>], width: usize, policy: &DetectionPolicy) -> usize {
    let probe = rows.len().min(policy.max_header_rows.max(1));
    let mut header_rows = 0usize;
    for (idx, row) in rows.iter().take(probe).enumerate() {
        let stats = row_stats(row);
        if stats.non_empty == 0 {
            continue;
        }
        if is_data_like(stats, width, policy) {
            break;
        }
        if is_header_like(stats) {
            header_rows = idx + 1;
        }
    }
    header_rows.max(1)
}

/// Check merge regions against the grid bounds and each other.
pub fn validate_merges(grid: &RawHeaderGrid) -> Result<(), GridError> {
    let rows = grid.row_count();
    let cols = grid.width();
    for region in &grid.merges {
        if region.row_span == 0 || region.col_span == 0 {
            return Err(GridError::EmptySpan {
                row: region.row,
                col: region.col,
            });
        }
        let row_end = region.row.checked_add(region.row_span);
        let col_end = region.col.checked_add(region.col_span);
        let fits = matches!((row_end, col_end), (Some(r), Some(c)) if r <= rows && c <= cols);
        if !fits {
            return Err(GridError::OutOfBounds {
                row: region.row,
                col: region.col,
                row_span: region.row_span,
                col_span: region.col_span,
                rows,
                cols,
            });
        }
    }
    for (idx, first) in grid.merges.iter().enumerate() {
        if let Some(second) = grid.merges[idx + 1..].iter().find(|r| first.overlaps(r)) {
            return Err(GridError::Overlapping {
                first_row: first.row,
                first_col: first.col,
                second_row: second.row,
                second_col: second.col,
            });
        }
    }
    Ok(())
}

/// Copy each merged region's anchor value into every cell it covers.
///
/// Rows are padded to the grid width. Merges must already be validated.
fn resolve_merges(grid: &RawHeaderGrid) -> Vec<Vec<CellValue>> {
    let width = grid.width();
    let mut resolved: Vec<Vec<CellValue>> = grid
        .rows
        .iter()
        .map(|row| {
            let mut padded = row.clone();
            padded.resize(width, CellValue::Empty);
            padded
        })
        .collect();
    for region in &grid.merges {
        fill_region(&mut resolved, grid, region);
    }
    resolved
}

fn fill_region(resolved: &mut [Vec<CellValue>], grid: &RawHeaderGrid, region: &MergeRegion) {
    let anchor = grid
        .cell(region.row, region.col)
        .cloned()
        .unwrap_or_default();
    for row in &mut resolved[region.row..region.row_end()] {
        for cell in &mut row[region.col..region.col_end()] {
            *cell = anchor.clone();
        }
    }
}

/// Join the non-empty header cells of a column, top to bottom.
///
/// Consecutive repeats (typically from vertical merges) appear once.
fn column_label(header_rows: &[Vec<CellValue>], col: usize) -> String {
    let mut parts: Vec<String> = Vec::new();
    for row in header_rows {
        let Some(cell) = row.get(col) else {
            continue;
        };
        let text = collapse_whitespace(&cell.as_text());
        if text.is_empty() || parts.last() == Some(&text) {
            continue;
        }
        parts.push(text);
    }
    parts.join(" ")
}

/// Extract one normalized label per column of `grid`.
///
/// An empty or blank grid yields no headers. A column inside the header
/// width without any header text yields an empty label.
pub fn extract_headers(grid: &RawHeaderGrid, span: &HeaderSpan) -> Result<SheetHeaders, GridError> {
    validate_merges(grid)?;
    if grid.is_blank() {
        debug!(rows = grid.row_count(), "blank grid; no headers");
        return Ok(SheetHeaders::default());
    }

    let resolved = resolve_merges(grid);
    let width = grid.width();
    let header_row_count = match span {
        HeaderSpan::Auto(policy) => detect_header_rows(&resolved, width, policy),
        HeaderSpan::Fixed(rows) => (*rows).clamp(1, resolved.len()),
    };
    let header_rows = &resolved[..header_row_count];

    let mut headers: Vec<ExtractedHeader> = (0..width)
        .map(|col| ExtractedHeader::new(col, column_label(header_rows, col)))
        .collect();
    let used_width = headers
        .iter()
        .rposition(|header| !header.label.is_empty())
        .map_or(0, |idx| idx + 1);
    headers.truncate(used_width);

    debug!(
        header_rows = header_row_count,
        columns = headers.len(),
        merges = grid.merges.len(),
        "extracted headers"
    );
    Ok(SheetHeaders {
        header_row_count,
        headers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_grid(rows: &[&[&str]]) -> RawHeaderGrid {
        RawHeaderGrid::from_text_rows(rows.iter().map(|row| row.iter().copied()))
    }

    #[test]
    fn single_header_row_before_numeric_data() {
        let grid = text_grid(&[&["Date", "Gas", "Power"], &["2024-01-01", "12.5", "300"]]);
        let rows = resolve_merges(&grid);
        assert_eq!(detect_header_rows(&rows, 3, &DetectionPolicy::default()), 1);
    }

    #[test]
    fn two_text_rows_form_the_header() {
        let grid = text_grid(&[
            &["Tank", "Temp", "Level"],
            &["", "(C)", "(m)"],
            &["T1", "38.2", "4.1"],
        ]);
        let rows = resolve_merges(&grid);
        assert_eq!(detect_header_rows(&rows, 3, &DetectionPolicy::default()), 2);
    }

    #[test]
    fn all_numeric_first_row_still_yields_one_header_row() {
        let grid = text_grid(&[&["1", "2", "3"], &["4", "5", "6"]]);
        let rows = resolve_merges(&grid);
        assert_eq!(detect_header_rows(&rows, 3, &DetectionPolicy::default()), 1);
    }

    #[test]
    fn text_only_sheet_stops_at_max_rows() {
        let grid = text_grid(&[&["a"], &["b"], &["c"], &["d"]]);
        let rows = resolve_merges(&grid);
        let policy = DetectionPolicy {
            max_header_rows: 2,
            ..DetectionPolicy::default()
        };
        assert_eq!(detect_header_rows(&rows, 1, &policy), 2);
    }

    #[test]
    fn column_label_collapses_consecutive_repeats() {
        let rows = vec![
            vec![CellValue::from("Date")],
            vec![CellValue::from("Date")],
            vec![CellValue::from("  local   time ")],
        ];
        assert_eq!(column_label(&rows, 0), "Date local time");
    }

    #[test]
    fn fixed_span_is_clamped_to_grid() {
        let grid = text_grid(&[&["A", "B"]]);
        let headers = extract_headers(&grid, &HeaderSpan::Fixed(4)).unwrap();
        assert_eq!(headers.header_row_count, 1);
        let grid = text_grid(&[&["A", "B"], &["x", "y"]]);
        let headers = extract_headers(&grid, &HeaderSpan::Fixed(0)).unwrap();
        assert_eq!(headers.header_row_count, 1);
    }
}
