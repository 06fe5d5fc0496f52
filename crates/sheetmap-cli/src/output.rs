//! Report file naming and writing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sheetmap_map::WorkbookReport;

const REPORT_SUFFIX: &str = "_mapping_result.json";

/// `<stem>_mapping_result.json` next to `input`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("workbook");
    input.with_file_name(format!("{stem}{REPORT_SUFFIX}"))
}

/// Write `report` as pretty JSON, creating parent directories.
pub fn write_report(path: &Path, report: &WorkbookReport) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(report).context("serialize report")?;
    std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_sits_next_to_input() {
        assert_eq!(
            default_output_path(Path::new("data/plant A.csv")),
            PathBuf::from("data/plant A_mapping_result.json")
        );
        assert_eq!(
            default_output_path(Path::new("book.json")),
            PathBuf::from("book_mapping_result.json")
        );
    }
}
