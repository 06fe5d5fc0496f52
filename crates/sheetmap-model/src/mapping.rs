//! Mapping results and the action policy derived from confidence.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence assigned to an exact canonical-name match.
pub const EXACT_CONFIDENCE: f64 = 1.0;
/// Confidence assigned to an alias match.
pub const ALIAS_CONFIDENCE: f64 = 0.95;

/// Which matching layer produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MatchType {
    #[serde(rename = "ExactMatch")]
    Exact,
    #[serde(rename = "AliasMatch")]
    Alias,
    #[serde(rename = "FuzzyMatch")]
    Fuzzy,
    #[serde(rename = "SemanticMatch")]
    Semantic,
    #[serde(rename = "NoMatch")]
    None,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "ExactMatch",
            MatchType::Alias => "AliasMatch",
            MatchType::Fuzzy => "FuzzyMatch",
            MatchType::Semantic => "SemanticMatch",
            MatchType::None => "NoMatch",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Downstream disposition of a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MappingAction {
    AutoMap,
    Review,
    #[serde(rename = "ManualMap")]
    Manual,
}

impl MappingAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            MappingAction::AutoMap => "AutoMap",
            MappingAction::Review => "Review",
            MappingAction::Manual => "ManualMap",
        }
    }

    /// Recommend an action for a winning match.
    ///
    /// Required columns use [`ActionThresholds::REQUIRED`], optional columns
    /// use [`ActionThresholds::OPTIONAL`].
    pub fn recommend(confidence: f64, required: bool) -> Self {
        let thresholds = if required {
            ActionThresholds::REQUIRED
        } else {
            ActionThresholds::OPTIONAL
        };
        thresholds.categorize(confidence)
    }
}

impl fmt::Display for MappingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence boundaries between the three actions.
///
/// - At or above `auto_map`: [`MappingAction::AutoMap`]
/// - `review` to `auto_map`: [`MappingAction::Review`]
/// - Below `review`: [`MappingAction::Manual`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionThresholds {
    pub auto_map: f64,
    pub review: f64,
}

impl ActionThresholds {
    /// Policy for required columns.
    pub const REQUIRED: Self = Self {
        auto_map: 0.90,
        review: 0.75,
    };

    /// Policy for optional columns.
    pub const OPTIONAL: Self = Self {
        auto_map: 0.85,
        review: 0.70,
    };

    #[must_use]
    pub fn categorize(&self, confidence: f64) -> MappingAction {
        if confidence >= self.auto_map {
            MappingAction::AutoMap
        } else if confidence >= self.review {
            MappingAction::Review
        } else {
            MappingAction::Manual
        }
    }
}

/// A scored candidate produced by one matching layer.
///
/// Transient: the engine keeps at most one per layer and discards it once a
/// winner has been chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    /// Position of the column in registry order.
    pub schema_index: usize,
    pub match_type: MatchType,
    /// Score on a 0-100 scale.
    pub raw_score: f64,
    /// The schema text that produced the score.
    pub target: String,
}

impl MatchCandidate {
    /// Confidence implied by the candidate's layer and score.
    pub fn confidence(&self) -> f64 {
        match self.match_type {
            MatchType::Exact => EXACT_CONFIDENCE,
            MatchType::Alias => ALIAS_CONFIDENCE,
            MatchType::Fuzzy | MatchType::Semantic => score_to_confidence(self.raw_score),
            MatchType::None => 0.0,
        }
    }
}

/// Convert a 0-100 score into a confidence in [0, 1].
pub fn score_to_confidence(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    (score / 100.0).clamp(0.0, 1.0)
}

/// Final mapping decision for one user header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingResult {
    pub user_column: String,
    /// Canonical name of the winning column; `None` when nothing matched.
    pub canonical_column: Option<String>,
    pub confidence: f64,
    pub match_type: MatchType,
    pub match_details: String,
    pub recommended_action: MappingAction,
}

impl MappingResult {
    /// Result for a header that no layer could resolve.
    pub fn no_match(user_column: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            user_column: user_column.into(),
            canonical_column: None,
            confidence: 0.0,
            match_type: MatchType::None,
            match_details: details.into(),
            recommended_action: MappingAction::Manual,
        }
    }

    pub fn is_match(&self) -> bool {
        self.canonical_column.is_some()
    }
}
