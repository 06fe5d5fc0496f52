//! Header resolution against a canonical schema.
//!
//! [`MatchingEngine`] runs each label through exact, alias, fuzzy and
//! semantic layers; [`map_sheet`] and [`map_workbook`] wire header
//! extraction, resolution and summaries together.

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod similarity;
pub mod utils;

pub use engine::{FUZZY_ACCEPT_BOUND, MatchLayer, MatchingEngine, SEMANTIC_MIN_SCORE};
pub use error::SimilarityError;
pub use pipeline::{SheetReport, WorkbookReport, map_sheet, map_workbook};
pub use similarity::{
    Embedder, LexicalScorer, NgramEmbedder, NoopEmbedder, RapidfuzzScorer, cosine,
};
pub use utils::normalize_text;
