pub mod error;
pub mod header;
pub mod workbook;

pub use error::{GridError, IngestError};
pub use header::{
    DEFAULT_DATA_ROW_MIN_FILL, DEFAULT_MAX_HEADER_ROWS, DetectionPolicy, HeaderSpan,
    SheetHeaders, extract_headers, validate_merges,
};
pub use workbook::{
    SheetGrid, infer_cell, load_workbook, parse_workbook_json, read_csv_grid,
    read_delimited_grid, read_workbook_json,
};
