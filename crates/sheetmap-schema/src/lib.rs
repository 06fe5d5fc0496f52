#![deny(unsafe_code)]

pub mod document;
pub mod error;
pub mod registry;

pub use crate::document::{parse_schema_document, read_schema_document};
pub use crate::error::SchemaError;
pub use crate::registry::{AliasConflict, AliasPolicy, LoadSummary, SchemaRegistry};
