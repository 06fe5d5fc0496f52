//! Decoding spreadsheet files into raw grids.
//!
//! Two inputs are supported: delimited text (`.csv`, `.tsv`), which yields a
//! single sheet without merges, and JSON workbook documents of the form
//!
//! ```json
//! {"sheets": [{"name": "Feeding", "rows": [["Date", "Mass"], ["2024-01-01", 4.2]],
//!              "merges": [{"row": 0, "col": 1, "row_span": 1, "col_span": 2}]}]}
//! ```

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use sheetmap_model::{CellValue, MergeRegion, RawHeaderGrid};
use tracing::debug;

use crate::error::IngestError;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d.%m.%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M",
    "%d.%m.%Y %H:%M",
];

/// A named sheet and its decoded cells.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetGrid {
    pub name: String,
    pub grid: RawHeaderGrid,
}

#[derive(Debug, Deserialize)]
struct WorkbookDocument {
    sheets: Vec<SheetDocument>,
}

#[derive(Debug, Deserialize)]
struct SheetDocument {
    name: String,
    #[serde(default)]
    rows: Vec<Vec<serde_json::Value>>,
    #[serde(default)]
    merges: Vec<MergeRegion>,
}

/// Infer a typed cell from raw text.
pub fn infer_cell(raw: &str) -> CellValue {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    if trimmed.chars().any(|ch| ch.is_ascii_digit())
        && let Ok(number) = trimmed.parse::<f64>()
    {
        return CellValue::Number(number);
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return CellValue::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return CellValue::Bool(false);
    }
    if is_date(trimmed) {
        return CellValue::Date(trimmed.to_string());
    }
    CellValue::Text(trimmed.to_string())
}

fn is_date(value: &str) -> bool {
    DATE_FORMATS
        .iter()
        .any(|format| NaiveDate::parse_from_str(value, format).is_ok())
        || DATETIME_FORMATS
            .iter()
            .any(|format| NaiveDateTime::parse_from_str(value, format).is_ok())
}

fn json_cell(value: &serde_json::Value) -> CellValue {
    match value {
        serde_json::Value::Null => CellValue::Empty,
        serde_json::Value::Bool(flag) => CellValue::Bool(*flag),
        serde_json::Value::Number(number) => {
            number.as_f64().map_or(CellValue::Empty, CellValue::Number)
        }
        serde_json::Value::String(text) => infer_cell(text),
        other => CellValue::Text(other.to_string()),
    }
}

/// Read a delimited text file into a single grid.
///
/// Fully blank records are skipped.
pub fn read_delimited_grid(path: &Path, delimiter: u8) -> Result<RawHeaderGrid, IngestError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let row: Vec<CellValue> = record.iter().map(infer_cell).collect();
        if row.iter().all(CellValue::is_empty) {
            continue;
        }
        rows.push(row);
    }
    Ok(RawHeaderGrid::new(rows))
}

pub fn read_csv_grid(path: &Path) -> Result<RawHeaderGrid, IngestError> {
    read_delimited_grid(path, b',')
}

/// Parse a JSON workbook document. `source` is only used in error messages.
pub fn parse_workbook_json(contents: &str, source: &Path) -> Result<Vec<SheetGrid>, IngestError> {
    let document: WorkbookDocument =
        serde_json::from_str(contents).map_err(|e| IngestError::Json {
            path: source.to_path_buf(),
            source: e,
        })?;
    Ok(document
        .sheets
        .into_iter()
        .map(|sheet| SheetGrid {
            name: sheet.name,
            grid: RawHeaderGrid {
                rows: sheet
                    .rows
                    .iter()
                    .map(|row| row.iter().map(json_cell).collect())
                    .collect(),
                merges: sheet.merges,
            },
        })
        .collect())
}

pub fn read_workbook_json(path: &Path) -> Result<Vec<SheetGrid>, IngestError> {
    let contents = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_workbook_json(&contents, path)
}

/// Load every sheet of a supported input file, choosing the decoder by extension.
pub fn load_workbook(path: &Path) -> Result<Vec<SheetGrid>, IngestError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let sheets = match extension.as_str() {
        "csv" | "tsv" => {
            let delimiter = if extension == "tsv" { b'\t' } else { b',' };
            let name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("Sheet1")
                .to_string();
            vec![SheetGrid {
                name,
                grid: read_delimited_grid(path, delimiter)?,
            }]
        }
        "json" => read_workbook_json(path)?,
        _ => {
            return Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
    };
    debug!(path = %path.display(), sheets = sheets.len(), "loaded workbook");
    Ok(sheets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_cell_types() {
        assert_eq!(infer_cell("  "), CellValue::Empty);
        assert_eq!(infer_cell("12.5"), CellValue::Number(12.5));
        assert_eq!(infer_cell("TRUE"), CellValue::Bool(true));
        assert_eq!(infer_cell("2024-03-01"), CellValue::Date("2024-03-01".into()));
        assert_eq!(
            infer_cell("01.03.2024 08:15"),
            CellValue::Date("01.03.2024 08:15".into())
        );
        assert_eq!(infer_cell("Gas (m3)"), CellValue::Text("Gas (m3)".into()));
    }

    #[test]
    fn word_like_floats_stay_text() {
        assert_eq!(infer_cell("inf"), CellValue::Text("inf".into()));
        assert_eq!(infer_cell("NaN"), CellValue::Text("NaN".into()));
    }

    #[test]
    fn parses_workbook_document() {
        let sheets = parse_workbook_json(
            r#"{"sheets": [{"name": "Feeding",
                "rows": [["Date", "Mass", null], ["2024-01-01", 4.2, true]],
                "merges": [{"row": 0, "col": 1, "row_span": 1, "col_span": 2}]}]}"#,
            Path::new("book.json"),
        )
        .unwrap();
        assert_eq!(sheets.len(), 1);
        let grid = &sheets[0].grid;
        assert_eq!(grid.rows[0][2], CellValue::Empty);
        assert_eq!(grid.rows[1][0], CellValue::Date("2024-01-01".into()));
        assert_eq!(grid.rows[1][1], CellValue::Number(4.2));
        assert_eq!(grid.merges, vec![MergeRegion::new(0, 1, 1, 2)]);
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = load_workbook(Path::new("data.xlsx")).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
    }
}
