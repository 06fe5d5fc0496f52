//! End-to-end mapping of sheets and workbooks.

use std::thread;

use serde::Serialize;
use sheetmap_ingest::{GridError, HeaderSpan, SheetGrid, extract_headers};
use sheetmap_model::{MappingResult, OverallSummary, RawHeaderGrid, SheetSummary};
use tracing::{debug, info, info_span};

use crate::engine::MatchingEngine;

/// Mapping outcome for one sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetReport {
    pub sheet_name: String,
    pub header_row_count: usize,
    pub total_columns: usize,
    pub mappings: Vec<MappingResult>,
    pub summary: SheetSummary,
}

/// Mapping outcome for every sheet of one input file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkbookReport {
    pub source: String,
    pub sheets: Vec<SheetReport>,
    pub overall_summary: OverallSummary,
}

/// Extract, resolve and summarize the headers of one sheet.
pub fn map_sheet(
    engine: &MatchingEngine,
    name: &str,
    grid: &RawHeaderGrid,
    span: &HeaderSpan,
) -> Result<SheetReport, GridError> {
    let _span = info_span!("sheet", sheet = name).entered();
    let extracted = extract_headers(grid, span)?;
    let mappings = engine.resolve_all(&extracted.headers);
    let summary = SheetSummary::from_results(&mappings);
    debug!(
        columns = mappings.len(),
        auto_mapped = summary.auto_mapped,
        needs_review = summary.needs_review,
        needs_manual = summary.needs_manual,
        "mapped sheet"
    );
    Ok(SheetReport {
        sheet_name: name.to_string(),
        header_row_count: extracted.header_row_count,
        total_columns: mappings.len(),
        mappings,
        summary,
    })
}

/// Map every sheet, one scoped thread per sheet.
///
/// Reports keep the input sheet order. The first sheet that fails (in that
/// order) fails the whole workbook.
pub fn map_workbook(
    engine: &MatchingEngine,
    source: &str,
    sheets: &[SheetGrid],
    span: &HeaderSpan,
) -> Result<WorkbookReport, GridError> {
    let results: Vec<Result<SheetReport, GridError>> = if sheets.len() <= 1 {
        sheets
            .iter()
            .map(|sheet| map_sheet(engine, &sheet.name, &sheet.grid, span))
            .collect()
    } else {
        thread::scope(|scope| {
            let handles: Vec<_> = sheets
                .iter()
                .map(|sheet| scope.spawn(move || map_sheet(engine, &sheet.name, &sheet.grid, span)))
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                })
                .collect()
        })
    };

    let sheets = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    let summaries: Vec<SheetSummary> = sheets.iter().map(|sheet| sheet.summary).collect();
    let overall_summary = OverallSummary::from_sheets(&summaries);
    info!(
        source,
        sheets = overall_summary.total_sheets,
        headers = overall_summary.total_headers,
        auto_mapped = overall_summary.total_auto_mapped,
        "mapped workbook"
    );
    Ok(WorkbookReport {
        source: source.to_string(),
        sheets,
        overall_summary,
    })
}
