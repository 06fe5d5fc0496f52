//! Run settings: optional TOML file merged with command-line flags.
//!
//! ```toml
//! fuzzy_min_threshold = 70
//! max_header_rows = 3
//! # header_rows = 2
//! ```
//!
//! Flags given on the command line take precedence over file values.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use sheetmap_ingest::{DetectionPolicy, HeaderSpan};
use sheetmap_model::MatchingConfig;

/// Contents of a `--config` file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub fuzzy_min_threshold: Option<u8>,
    /// Fixed header span; disables detection.
    pub header_rows: Option<usize>,
    pub max_header_rows: Option<usize>,
}

/// Values taken from command-line flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagOverrides {
    pub fuzzy_min_threshold: Option<u8>,
    pub header_rows: Option<usize>,
    pub max_header_rows: Option<usize>,
}

/// Effective settings for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSettings {
    pub matching: MatchingConfig,
    pub header_span: HeaderSpan,
}

pub fn parse_file_config(contents: &str) -> Result<FileConfig> {
    toml::from_str(contents).context("parse config")
}

pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    parse_file_config(&contents).with_context(|| format!("in {}", path.display()))
}

/// Merge file values and flags into validated settings.
pub fn resolve_settings(file: &FileConfig, flags: &FlagOverrides) -> Result<RunSettings> {
    let threshold = flags
        .fuzzy_min_threshold
        .or(file.fuzzy_min_threshold)
        .unwrap_or(MatchingConfig::default().fuzzy_min_threshold);
    let matching = MatchingConfig::new(threshold).context("invalid matching config")?;

    let header_rows = flags.header_rows.or(file.header_rows);
    let max_header_rows = flags.max_header_rows.or(file.max_header_rows);
    let header_span = match header_rows {
        Some(0) => anyhow::bail!("header_rows must be at least 1"),
        Some(rows) => HeaderSpan::Fixed(rows),
        None => {
            let mut policy = DetectionPolicy::default();
            if let Some(max) = max_header_rows {
                if max == 0 {
                    anyhow::bail!("max_header_rows must be at least 1");
                }
                policy.max_header_rows = max;
            }
            HeaderSpan::Auto(policy)
        }
    };

    Ok(RunSettings {
        matching,
        header_span,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let file = parse_file_config("").unwrap();
        let settings = resolve_settings(&file, &FlagOverrides::default()).unwrap();
        assert_eq!(settings, RunSettings::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_file_config("fuzzy_threshold = 40").is_err());
    }
}
