use std::fs;
use std::path::PathBuf;

use sheetmap_ingest::{HeaderSpan, extract_headers, load_workbook};
use sheetmap_model::CellValue;

fn unique_temp_dir(name: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "sheetmap-ingest-{}-{}-{}",
        name,
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn csv_file_becomes_single_sheet() {
    let dir = unique_temp_dir("csv");
    let path = dir.join("feeding.csv");
    fs::write(
        &path,
        "Date Time,Feed Mass,Remark\n,,\n2024-01-01 08:00:00,4.5,ok\n2024-01-02 08:00:00,4.7,\n",
    )
    .unwrap();

    let sheets = load_workbook(&path).expect("load csv");
    assert_eq!(sheets.len(), 1);
    assert_eq!(sheets[0].name, "feeding");
    let grid = &sheets[0].grid;
    assert_eq!(grid.row_count(), 3, "blank record is skipped");
    assert_eq!(grid.rows[1][1], CellValue::Number(4.5));

    let headers = extract_headers(grid, &HeaderSpan::default()).unwrap();
    let labels: Vec<_> = headers.headers.into_iter().map(|h| h.label).collect();
    assert_eq!(labels, vec!["Date Time", "Feed Mass", "Remark"]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn tsv_uses_tab_delimiter() {
    let dir = unique_temp_dir("tsv");
    let path = dir.join("tank.tsv");
    fs::write(&path, "Tank\tLevel (m)\nT1\t4.2\n").unwrap();

    let sheets = load_workbook(&path).expect("load tsv");
    assert_eq!(sheets[0].grid.rows[0].len(), 2);
    assert_eq!(sheets[0].grid.rows[0][1], CellValue::Text("Level (m)".into()));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn json_workbook_keeps_sheet_order_and_merges() {
    let dir = unique_temp_dir("json");
    let path = dir.join("plant.json");
    fs::write(
        &path,
        r#"{"sheets": [
            {"name": "Production",
             "rows": [["Date", "Production", null], [null, "Gas (m3)", "Biogas kg"], ["2024-01-01", 10, 20]],
             "merges": [{"row": 0, "col": 1, "row_span": 1, "col_span": 2}]},
            {"name": "Empty", "rows": []}
        ]}"#,
    )
    .unwrap();

    let sheets = load_workbook(&path).expect("load json");
    let names: Vec<_> = sheets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Production", "Empty"]);

    let headers = extract_headers(&sheets[0].grid, &HeaderSpan::default()).unwrap();
    let labels: Vec<_> = headers.headers.into_iter().map(|h| h.label).collect();
    assert_eq!(labels, vec!["Date", "Production Gas (m3)", "Production Biogas kg"]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_file_is_reported() {
    let dir = unique_temp_dir("missing");
    assert!(load_workbook(&dir.join("absent.json")).is_err());
    assert!(load_workbook(&dir.join("absent.csv")).is_err());
    let _ = fs::remove_dir_all(&dir);
}
