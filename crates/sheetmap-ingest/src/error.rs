//! Error types for grid decoding and header extraction.

use std::path::PathBuf;

use thiserror::Error;

/// Contract violations in a raw grid handed to the header extractor.
///
/// These indicate a bug in whatever decoded the grid and are not recoverable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("merge region anchored at ({row}, {col}) has an empty span")]
    EmptySpan { row: usize, col: usize },

    #[error(
        "merge region anchored at ({row}, {col}) spanning {row_span}x{col_span} \
         exceeds the {rows}x{cols} grid"
    )]
    OutOfBounds {
        row: usize,
        col: usize,
        row_span: usize,
        col_span: usize,
        rows: usize,
        cols: usize,
    },

    #[error("merge regions anchored at ({first_row}, {first_col}) and ({second_row}, {second_col}) overlap")]
    Overlapping {
        first_row: usize,
        first_col: usize,
        second_row: usize,
        second_col: usize,
    },
}

/// Failures while reading a spreadsheet file into grids.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to parse workbook JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported input format: {path} (expected .csv, .tsv or .json)")]
    UnsupportedFormat { path: PathBuf },
}
