#![deny(unsafe_code)]

//! Parsing of schema definition documents.
//!
//! A document is a JSON object mapping each column key to its definition:
//!
//! ```json
//! {
//!   "tank_temp": {
//!     "canonicalName": "TankTemperature",
//!     "description": "Digester tank temperature",
//!     "dataType": "number",
//!     "required": true,
//!     "exampleValues": ["38.5"],
//!     "aliases": ["Temp", "Tank Temp"]
//!   }
//! }
//! ```
//!
//! Key order in the document is kept; it defines registry order.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sheetmap_model::{DataType, SchemaColumn, fold_label};

use crate::error::SchemaError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ColumnDocument {
    canonical_name: String,
    description: String,
    data_type: String,
    required: bool,
    example_values: Vec<serde_json::Value>,
    aliases: Vec<String>,
}

/// Read and parse one schema document from disk.
pub fn read_schema_document(path: &Path) -> Result<Vec<SchemaColumn>, SchemaError> {
    let contents = std::fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;
    parse_schema_document(&contents, path)
}

/// Parse the contents of a schema document.
///
/// `source` is only used in error messages.
pub fn parse_schema_document(
    contents: &str,
    source: &Path,
) -> Result<Vec<SchemaColumn>, SchemaError> {
    let value: serde_json::Value =
        serde_json::from_str(contents).map_err(|e| SchemaError::Json {
            path: source.to_path_buf(),
            source: e,
        })?;
    let serde_json::Value::Object(entries) = value else {
        return Err(SchemaError::NotAnObject {
            path: source.to_path_buf(),
        });
    };

    let mut columns = Vec::with_capacity(entries.len());
    for (key, entry) in entries {
        columns.push(parse_column(source, key, entry)?);
    }
    Ok(columns)
}

fn parse_column(
    source: &Path,
    key: String,
    entry: serde_json::Value,
) -> Result<SchemaColumn, SchemaError> {
    let invalid = |key: &str, message: String| SchemaError::InvalidColumn {
        path: PathBuf::from(source),
        key: key.to_string(),
        message,
    };

    if key.trim().is_empty() {
        return Err(invalid(&key, "column key is empty".to_string()));
    }
    let doc: ColumnDocument =
        serde_json::from_value(entry).map_err(|e| invalid(&key, e.to_string()))?;
    let data_type: DataType = doc.data_type.parse().map_err(|e| invalid(&key, e))?;

    let canonical_name = if doc.canonical_name.trim().is_empty() {
        key.clone()
    } else {
        doc.canonical_name.trim().to_string()
    };

    Ok(SchemaColumn {
        key,
        canonical_name,
        description: doc.description.trim().to_string(),
        data_type,
        required: doc.required,
        example_values: doc.example_values.iter().map(example_text).collect(),
        aliases: dedupe_aliases(doc.aliases),
    })
}

fn example_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Drop blank aliases and case-insensitive repeats, keeping the first spelling.
fn dedupe_aliases(aliases: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::BTreeSet::new();
    aliases
        .into_iter()
        .map(|alias| alias.trim().to_string())
        .filter(|alias| !alias.is_empty() && seen.insert(fold_label(alias)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(contents: &str) -> Result<Vec<SchemaColumn>, SchemaError> {
        parse_schema_document(contents, Path::new("test.json"))
    }

    #[test]
    fn keeps_document_order() {
        let columns = parse(
            r#"{
                "zeta": {"canonicalName": "Zeta"},
                "alpha": {"canonicalName": "Alpha"},
                "mid": {"canonicalName": "Mid"}
            }"#,
        )
        .unwrap();
        let keys: Vec<&str> = columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn fills_defaults_and_falls_back_to_key() {
        let columns = parse(r#"{"ph": {}}"#).unwrap();
        let column = &columns[0];
        assert_eq!(column.canonical_name, "ph");
        assert_eq!(column.data_type, DataType::String);
        assert!(!column.required);
        assert!(column.aliases.is_empty());
    }

    #[test]
    fn dedupes_aliases_case_insensitively() {
        let columns =
            parse(r#"{"t": {"canonicalName": "Temp", "aliases": ["Temp C", "temp c", " ", "T"]}}"#)
                .unwrap();
        assert_eq!(columns[0].aliases, vec!["Temp C", "T"]);
    }

    #[test]
    fn stringifies_non_text_examples() {
        let columns =
            parse(r#"{"t": {"canonicalName": "Temp", "exampleValues": [38.5, "39", true]}}"#)
                .unwrap();
        assert_eq!(columns[0].example_values, vec!["38.5", "39", "true"]);
    }

    #[test]
    fn rejects_non_object_documents() {
        assert!(matches!(parse("[1, 2]"), Err(SchemaError::NotAnObject { .. })));
        assert!(matches!(parse("{ nope"), Err(SchemaError::Json { .. })));
    }

    #[test]
    fn rejects_unknown_data_type() {
        let err = parse(r#"{"t": {"canonicalName": "Temp", "dataType": "blob"}}"#).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidColumn { ref key, .. } if key == "t"));
    }
}
