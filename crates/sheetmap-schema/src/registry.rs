#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use sheetmap_model::{SchemaColumn, fold_label};
use tracing::{debug, info, warn};

use crate::document::read_schema_document;
use crate::error::SchemaError;

/// How to treat an alias registered under more than one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AliasPolicy {
    /// Keep every column; lookups resolve to the column first in registry order.
    #[default]
    FirstWins,
    /// Fail the load.
    Reject,
}

/// An alias shared by two columns.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AliasConflict {
    /// Case-folded alias text.
    pub alias: String,
    /// Column that wins lookups for this alias.
    pub first_key: String,
    /// Column whose alias is shadowed.
    pub second_key: String,
}

/// Summary of a registry load, for reporting.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LoadSummary {
    pub documents: Vec<PathBuf>,
    pub column_count: usize,
    pub required_count: usize,
    pub alias_count: usize,
    pub overridden_keys: Vec<String>,
    pub alias_conflicts: usize,
}

/// Immutable, ordered set of canonical columns.
///
/// Built once at startup and shared read-only (typically behind an `Arc`)
/// by every sheet being resolved.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    columns: Vec<SchemaColumn>,
    by_key: BTreeMap<String, usize>,
    by_canonical: BTreeMap<String, usize>,
    by_alias: BTreeMap<String, usize>,
    alias_conflicts: Vec<AliasConflict>,
}

impl SchemaRegistry {
    /// Load and merge schema documents, in order.
    ///
    /// A key defined again by a later document replaces the earlier
    /// definition and keeps its original position.
    pub fn load(paths: &[PathBuf], policy: AliasPolicy) -> Result<(Self, LoadSummary), SchemaError> {
        if paths.is_empty() {
            return Err(SchemaError::NoDocuments);
        }
        let mut columns = Vec::new();
        for path in paths {
            let document = read_schema_document(path)?;
            debug!(path = %path.display(), columns = document.len(), "read schema document");
            columns.extend(document);
        }
        let (registry, overridden_keys) = Self::build(columns, policy)?;

        let summary = LoadSummary {
            documents: paths.to_vec(),
            column_count: registry.len(),
            required_count: registry.columns.iter().filter(|c| c.required).count(),
            alias_count: registry.columns.iter().map(|c| c.aliases.len()).sum(),
            overridden_keys,
            alias_conflicts: registry.alias_conflicts.len(),
        };
        info!(
            documents = paths.len(),
            columns = summary.column_count,
            required = summary.required_count,
            "loaded schema registry"
        );
        Ok((registry, summary))
    }

    /// Load a single schema document.
    pub fn load_file(path: &Path, policy: AliasPolicy) -> Result<Self, SchemaError> {
        Self::load(&[path.to_path_buf()], policy).map(|(registry, _)| registry)
    }

    /// Build a registry from columns in load order.
    pub fn from_columns<I>(columns: I, policy: AliasPolicy) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = SchemaColumn>,
    {
        Self::build(columns.into_iter().collect(), policy).map(|(registry, _)| registry)
    }

    fn build(
        loaded: Vec<SchemaColumn>,
        policy: AliasPolicy,
    ) -> Result<(Self, Vec<String>), SchemaError> {
        let mut columns: Vec<SchemaColumn> = Vec::with_capacity(loaded.len());
        let mut by_key: BTreeMap<String, usize> = BTreeMap::new();
        let mut overridden = Vec::new();

        for column in loaded {
            match by_key.get(&column.key) {
                Some(&idx) => {
                    warn!(key = %column.key, "schema key redefined; later definition wins");
                    overridden.push(column.key.clone());
                    columns[idx] = column;
                }
                None => {
                    by_key.insert(column.key.clone(), columns.len());
                    columns.push(column);
                }
            }
        }

        if columns.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut by_canonical = BTreeMap::new();
        for (idx, column) in columns.iter().enumerate() {
            by_canonical
                .entry(fold_label(&column.canonical_name))
                .or_insert(idx);
        }

        let mut by_alias: BTreeMap<String, usize> = BTreeMap::new();
        let mut alias_conflicts = Vec::new();
        for (idx, column) in columns.iter().enumerate() {
            for alias in &column.aliases {
                let folded = fold_label(alias);
                if folded.is_empty() {
                    continue;
                }
                match by_alias.get(&folded) {
                    Some(&owner) if owner != idx => {
                        let conflict = AliasConflict {
                            alias: folded.clone(),
                            first_key: columns[owner].key.clone(),
                            second_key: column.key.clone(),
                        };
                        if policy == AliasPolicy::Reject {
                            return Err(SchemaError::AliasConflict {
                                alias: conflict.alias,
                                first_key: conflict.first_key,
                                second_key: conflict.second_key,
                            });
                        }
                        warn!(
                            alias = %conflict.alias,
                            winner = %conflict.first_key,
                            shadowed = %conflict.second_key,
                            "alias registered under two columns; first in load order wins"
                        );
                        alias_conflicts.push(conflict);
                    }
                    Some(_) => {}
                    None => {
                        by_alias.insert(folded, idx);
                    }
                }
            }
        }

        Ok((
            Self {
                columns,
                by_key,
                by_canonical,
                by_alias,
                alias_conflicts,
            },
            overridden,
        ))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns in registry order.
    pub fn columns(&self) -> &[SchemaColumn] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&SchemaColumn> {
        self.columns.get(index)
    }

    pub fn get(&self, key: &str) -> Option<&SchemaColumn> {
        self.by_key.get(key).map(|&idx| &self.columns[idx])
    }

    /// Index of the first column whose canonical name equals `label`, ignoring case.
    pub fn find_canonical(&self, label: &str) -> Option<usize> {
        self.by_canonical.get(&fold_label(label)).copied()
    }

    /// Index of the first column listing `label` as an alias, ignoring case.
    pub fn find_alias(&self, label: &str) -> Option<usize> {
        self.by_alias.get(&fold_label(label)).copied()
    }

    pub fn alias_conflicts(&self) -> &[AliasConflict] {
        &self.alias_conflicts
    }
}
