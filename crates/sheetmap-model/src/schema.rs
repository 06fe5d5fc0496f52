//! Canonical column definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Value type a canonical column is expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[default]
    String,
    Number,
    Date,
    Boolean,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Number => "number",
            DataType::Date => "date",
            DataType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    /// Parse a data type name, accepting the common spellings found in schema files.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "string" | "text" | "str" => Ok(DataType::String),
            "number" | "numeric" | "int" | "integer" | "float" | "decimal" => Ok(DataType::Number),
            "date" | "datetime" | "timestamp" => Ok(DataType::Date),
            "boolean" | "bool" => Ok(DataType::Boolean),
            other => Err(format!("unknown data type: {other}")),
        }
    }
}

/// A canonical, schema-defined column that user headers are mapped onto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaColumn {
    /// Unique key of the column within the registry.
    pub key: String,
    /// Display name used for exact matching.
    pub canonical_name: String,
    pub description: String,
    pub data_type: DataType,
    /// Required columns need higher confidence before they are auto-mapped.
    pub required: bool,
    pub example_values: Vec<String>,
    /// Alternate spellings, compared case-insensitively.
    pub aliases: Vec<String>,
}

impl SchemaColumn {
    pub fn new(key: impl Into<String>, canonical_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            canonical_name: canonical_name.into(),
            description: String::new(),
            data_type: DataType::default(),
            required: false,
            example_values: Vec::new(),
            aliases: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_example_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.example_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Text describing the column as a whole: name, description and aliases.
    ///
    /// Used as the input for semantic embeddings.
    pub fn semantic_context(&self) -> String {
        let mut parts: Vec<&str> = vec![self.canonical_name.as_str()];
        if !self.description.trim().is_empty() {
            parts.push(self.description.as_str());
        }
        parts.extend(
            self.aliases
                .iter()
                .map(String::as_str)
                .filter(|alias| !alias.trim().is_empty()),
        );
        parts.join(" ")
    }
}
