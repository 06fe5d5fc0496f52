#![deny(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to read schema file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse schema JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("schema document {path} must be a JSON object keyed by column key")]
    NotAnObject { path: PathBuf },

    #[error("invalid column '{key}' in {path}: {message}")]
    InvalidColumn {
        path: PathBuf,
        key: String,
        message: String,
    },

    #[error("no schema documents were given")]
    NoDocuments,

    #[error("schema registry is empty: no columns were loaded")]
    Empty,

    #[error("alias '{alias}' is registered under both '{first_key}' and '{second_key}'")]
    AliasConflict {
        alias: String,
        first_key: String,
        second_key: String,
    },
}

impl SchemaError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
