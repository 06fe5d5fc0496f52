pub mod error;
pub mod grid;
pub mod mapping;
pub mod options;
pub mod schema;
pub mod summary;
pub mod text;

pub use error::ConfigError;
pub use grid::{CellValue, ExtractedHeader, MergeRegion, RawHeaderGrid};
pub use mapping::{
    ALIAS_CONFIDENCE, ActionThresholds, EXACT_CONFIDENCE, MappingAction, MappingResult,
    MatchCandidate, MatchType, score_to_confidence,
};
pub use options::{DEFAULT_FUZZY_MIN_THRESHOLD, MatchingConfig};
pub use schema::{DataType, SchemaColumn};
pub use summary::{OverallSummary, SheetSummary};
pub use text::{collapse_whitespace, fold_label};
