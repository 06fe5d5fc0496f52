//! End-to-end: schema and CSV on disk to a JSON report on disk.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use sheetmap_cli::config::{FlagOverrides, parse_file_config, resolve_settings};
use sheetmap_cli::output::{default_output_path, write_report};
use sheetmap_ingest::load_workbook;
use sheetmap_map::{MatchingEngine, map_workbook};
use sheetmap_schema::{AliasPolicy, SchemaRegistry};

fn unique_temp_dir(name: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "sheetmap-cli-{}-{}-{}",
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

const SCHEMA: &str = r#"{
  "date_time": {
    "canonicalName": "DateTime",
    "description": "Date and time of the measurement",
    "dataType": "date",
    "required": true,
    "aliases": ["Timestamp"]
  },
  "feed_mass": {
    "canonicalName": "FeedMass",
    "dataType": "number",
    "required": true,
    "aliases": ["Feed (t)"]
  },
  "remark": {
    "canonicalName": "Remark",
    "aliases": ["Comment"]
  }
}"#;

const SHEET: &str = "Date Time,Feed (t),Comment,Shift Lead\n\
                     2024-01-01 08:00:00,4.5,ok,Anna\n\
                     2024-01-02 08:00:00,4.7,,Ben\n";

#[test]
fn csv_is_mapped_and_written_next_to_input() {
    let dir = unique_temp_dir("report");
    let schema_path = dir.join("schema.json");
    let input = dir.join("feeding.csv");
    fs::write(&schema_path, SCHEMA).unwrap();
    fs::write(&input, SHEET).unwrap();

    let settings = resolve_settings(
        &parse_file_config("fuzzy_min_threshold = 60").unwrap(),
        &FlagOverrides::default(),
    )
    .unwrap();
    let registry = SchemaRegistry::load_file(&schema_path, AliasPolicy::FirstWins).unwrap();
    let engine = MatchingEngine::new(Arc::new(registry), settings.matching);
    let sheets = load_workbook(&input).unwrap();
    let report = map_workbook(&engine, "feeding.csv", &sheets, &settings.header_span).unwrap();

    let output = default_output_path(&input);
    assert_eq!(output, dir.join("feeding_mapping_result.json"));
    write_report(&output, &report).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let sheet = &written["sheets"][0];
    assert_eq!(sheet["sheet_name"], "feeding");
    assert_eq!(sheet["header_row_count"], 1);
    assert_eq!(sheet["total_columns"], 4);

    let mappings = sheet["mappings"].as_array().unwrap();
    assert_eq!(mappings[0]["canonicalColumn"], "DateTime");
    assert_eq!(mappings[0]["matchType"], "FuzzyMatch");
    assert_eq!(mappings[0]["recommendedAction"], "AutoMap");
    assert_eq!(mappings[1]["canonicalColumn"], "FeedMass");
    assert_eq!(mappings[1]["matchType"], "AliasMatch");
    assert_eq!(mappings[2]["canonicalColumn"], "Remark");
    assert_eq!(mappings[3]["recommendedAction"], "ManualMap");

    assert_eq!(written["overall_summary"]["total_headers"], 4);
    assert_eq!(written["overall_summary"]["total_auto_mapped"], 3);
    assert_eq!(written["overall_summary"]["auto_mapped_percentage"], 75.0);
}

#[test]
fn report_path_parents_are_created() {
    let dir = unique_temp_dir("nested");
    let schema_path = dir.join("schema.json");
    let input = dir.join("feeding.csv");
    fs::write(&schema_path, SCHEMA).unwrap();
    fs::write(&input, SHEET).unwrap();

    let registry = SchemaRegistry::load_file(&schema_path, AliasPolicy::FirstWins).unwrap();
    let engine = MatchingEngine::new(Arc::new(registry), Default::default());
    let sheets = load_workbook(&input).unwrap();
    let report = map_workbook(&engine, "feeding.csv", &sheets, &Default::default()).unwrap();

    let output = dir.join("out").join("deep").join("report.json");
    write_report(&output, &report).unwrap();
    assert!(output.is_file());
}
