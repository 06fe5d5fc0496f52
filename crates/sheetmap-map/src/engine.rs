//! Layered header resolution.
//!
//! Each label runs through [`MatchLayer::CHAIN`] in order. Exact and alias
//! hits are terminal. A fuzzy score at or above [`FUZZY_ACCEPT_BOUND`] is
//! terminal too; a weaker fuzzy score above the configured floor stays
//! provisional and competes with the semantic layer, which only wins when it
//! scores strictly higher.

use std::cmp::Ordering;
use std::sync::Arc;

use sheetmap_model::{
    ExtractedHeader, MappingAction, MappingResult, MatchCandidate, MatchType, MatchingConfig,
    collapse_whitespace, fold_label,
};
use sheetmap_schema::SchemaRegistry;
use tracing::{debug, info, trace, warn};

use crate::similarity::{Embedder, LexicalScorer, NgramEmbedder, RapidfuzzScorer, cosine};
use crate::utils::normalize_text;

/// Fuzzy scores at or above this (0-100) are accepted without consulting
/// the semantic layer.
pub const FUZZY_ACCEPT_BOUND: f64 = 75.0;
/// Lowest semantic score (0-100) that counts as a candidate.
pub const SEMANTIC_MIN_SCORE: f64 = 50.0;
/// Weight of the description token-set score relative to name scores.
const DESCRIPTION_WEIGHT: f64 = 0.5;

const EMPTY_LABEL: &str = "Empty header label";
const NO_MATCH: &str = "No suitable match found";

/// One stage of the resolution chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchLayer {
    Exact,
    Alias,
    Fuzzy,
    Semantic,
}

impl MatchLayer {
    /// Layers in priority order.
    pub const CHAIN: [MatchLayer; 4] = [
        MatchLayer::Exact,
        MatchLayer::Alias,
        MatchLayer::Fuzzy,
        MatchLayer::Semantic,
    ];
}

enum LayerOutcome {
    /// Terminal: stop the chain.
    Accepted(MatchCandidate),
    /// Keep going; the best provisional candidate wins if nothing is accepted.
    Provisional(MatchCandidate),
    Missed,
}

/// Lexical texts of a schema column, normalized once.
#[derive(Debug, Clone)]
struct ColumnTexts {
    canonical: String,
    aliases: Vec<(String, String)>,
    description: String,
}

/// Resolves user headers against a shared [`SchemaRegistry`].
///
/// Immutable after construction and safe to share across threads.
pub struct MatchingEngine {
    registry: Arc<SchemaRegistry>,
    config: MatchingConfig,
    lexical: Box<dyn LexicalScorer>,
    embedder: Box<dyn Embedder>,
    texts: Vec<ColumnTexts>,
    /// One vector per column, in registry order; `None` disables the semantic layer.
    embeddings: Option<Vec<Vec<f32>>>,
}

impl std::fmt::Debug for MatchingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchingEngine")
            .field("columns", &self.registry.len())
            .field("config", &self.config)
            .field("embedder", &self.embedder.name())
            .field("semantic", &self.embeddings.is_some())
            .finish_non_exhaustive()
    }
}

impl MatchingEngine {
    /// Engine with the rapidfuzz scorer and the n-gram embedder.
    pub fn new(registry: Arc<SchemaRegistry>, config: MatchingConfig) -> Self {
        Self::with_providers(
            registry,
            config,
            Box::new(RapidfuzzScorer),
            Box::new(NgramEmbedder::default()),
        )
    }

    /// Engine with explicit similarity providers.
    ///
    /// Schema embeddings are computed here, once. If the embedder fails for
    /// any column the semantic layer is switched off for this engine.
    pub fn with_providers(
        registry: Arc<SchemaRegistry>,
        config: MatchingConfig,
        lexical: Box<dyn LexicalScorer>,
        embedder: Box<dyn Embedder>,
    ) -> Self {
        let texts = registry
            .columns()
            .iter()
            .map(|column| ColumnTexts {
                canonical: normalize_text(&column.canonical_name),
                aliases: column
                    .aliases
                    .iter()
                    .map(|alias| (normalize_text(alias), alias.clone()))
                    .collect(),
                description: normalize_text(&column.description),
            })
            .collect();
        let embeddings = precompute_embeddings(&registry, embedder.as_ref());
        Self {
            registry,
            config,
            lexical,
            embedder,
            texts,
            embeddings,
        }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Whether layer 4 is active.
    pub fn semantic_enabled(&self) -> bool {
        self.embeddings.is_some()
    }

    /// Resolve one header label.
    pub fn resolve(&self, label: &str) -> MappingResult {
        let query = collapse_whitespace(label);
        if query.is_empty() {
            return MappingResult::no_match(label, EMPTY_LABEL);
        }

        let mut provisional: Option<MatchCandidate> = None;
        for layer in MatchLayer::CHAIN {
            match self.run_layer(layer, &query) {
                LayerOutcome::Accepted(candidate) => return self.finish(label, &candidate),
                LayerOutcome::Provisional(candidate) => {
                    provisional = match provisional {
                        Some(current) if current.raw_score >= candidate.raw_score => Some(current),
                        _ => Some(candidate),
                    };
                }
                LayerOutcome::Missed => {}
            }
        }

        match provisional {
            Some(candidate) => self.finish(label, &candidate),
            None => {
                trace!(label, "no layer matched");
                MappingResult::no_match(label, NO_MATCH)
            }
        }
    }

    /// Resolve every extracted header, keeping column order.
    pub fn resolve_all(&self, headers: &[ExtractedHeader]) -> Vec<MappingResult> {
        headers
            .iter()
            .map(|header| self.resolve(&header.label))
            .collect()
    }

    /// Up to `n` lexical candidates for `label`, one per schema column.
    ///
    /// Candidates below the fuzzy floor are left out. Sorted by confidence,
    /// registry order breaking ties.
    pub fn top_matches(&self, label: &str, n: usize) -> Vec<MappingResult> {
        let query = normalize_text(label);
        if query.is_empty() || n == 0 {
            return Vec::new();
        }
        let floor = self.config.fuzzy_min_score();
        let mut candidates: Vec<MatchCandidate> = self
            .texts
            .iter()
            .enumerate()
            .filter_map(|(idx, texts)| {
                let candidate = self.best_name_score(idx, texts, &query)?;
                (candidate.raw_score >= floor).then_some(candidate)
            })
            .collect();
        candidates.sort_by(|a, b| b.raw_score.partial_cmp(&a.raw_score).unwrap_or(Ordering::Equal));
        candidates
            .iter()
            .take(n)
            .map(|candidate| self.finish(label, candidate))
            .collect()
    }

    fn run_layer(&self, layer: MatchLayer, query: &str) -> LayerOutcome {
        match layer {
            MatchLayer::Exact => self.exact(query),
            MatchLayer::Alias => self.alias(query),
            MatchLayer::Fuzzy => self.fuzzy(query),
            MatchLayer::Semantic => self.semantic(query),
        }
    }

    fn exact(&self, query: &str) -> LayerOutcome {
        let Some(idx) = self.registry.find_canonical(query) else {
            return LayerOutcome::Missed;
        };
        let Some(column) = self.registry.column(idx) else {
            return LayerOutcome::Missed;
        };
        LayerOutcome::Accepted(MatchCandidate {
            schema_index: idx,
            match_type: MatchType::Exact,
            raw_score: 100.0,
            target: column.canonical_name.clone(),
        })
    }

    fn alias(&self, query: &str) -> LayerOutcome {
        let Some(idx) = self.registry.find_alias(query) else {
            return LayerOutcome::Missed;
        };
        let folded = fold_label(query);
        let Some(alias) = self
            .registry
            .column(idx)
            .and_then(|column| column.aliases.iter().find(|a| fold_label(a) == folded))
        else {
            return LayerOutcome::Missed;
        };
        LayerOutcome::Accepted(MatchCandidate {
            schema_index: idx,
            match_type: MatchType::Alias,
            raw_score: 100.0,
            target: alias.clone(),
        })
    }

    fn fuzzy(&self, query: &str) -> LayerOutcome {
        let query = normalize_text(query);
        let mut best: Option<MatchCandidate> = None;
        for (idx, texts) in self.texts.iter().enumerate() {
            if let Some(candidate) = self.best_name_score(idx, texts, &query) {
                keep_higher(&mut best, candidate);
            }
            if !texts.description.is_empty() {
                let score = description_score(
                    self.lexical.token_set_ratio(&query, &texts.description),
                );
                keep_higher(
                    &mut best,
                    MatchCandidate {
                        schema_index: idx,
                        match_type: MatchType::Fuzzy,
                        raw_score: score,
                        target: self.canonical_name(idx),
                    },
                );
            }
        }

        let Some(candidate) = best else {
            return LayerOutcome::Missed;
        };
        if candidate.raw_score < self.config.fuzzy_min_score() {
            return LayerOutcome::Missed;
        }
        if candidate.raw_score >= FUZZY_ACCEPT_BOUND {
            LayerOutcome::Accepted(candidate)
        } else {
            LayerOutcome::Provisional(candidate)
        }
    }

    fn semantic(&self, query: &str) -> LayerOutcome {
        let Some(embeddings) = &self.embeddings else {
            return LayerOutcome::Missed;
        };
        let vector = match self.embedder.embed(query) {
            Ok(vector) => vector,
            Err(error) => {
                debug!(label = query, %error, "semantic layer skipped for label");
                return LayerOutcome::Missed;
            }
        };

        let mut best: Option<MatchCandidate> = None;
        for (idx, column_vector) in embeddings.iter().enumerate() {
            let similarity = match cosine(&vector, column_vector) {
                Ok(similarity) => similarity,
                Err(error) => {
                    debug!(label = query, %error, "semantic layer skipped for label");
                    return LayerOutcome::Missed;
                }
            };
            keep_higher(
                &mut best,
                MatchCandidate {
                    schema_index: idx,
                    match_type: MatchType::Semantic,
                    raw_score: (similarity * 100.0).clamp(0.0, 100.0).round(),
                    target: self.canonical_name(idx),
                },
            );
        }

        match best {
            Some(candidate) if candidate.raw_score >= SEMANTIC_MIN_SCORE => {
                LayerOutcome::Provisional(candidate)
            }
            _ => LayerOutcome::Missed,
        }
    }

    /// Best rounded ratio over a column's canonical name and aliases.
    fn best_name_score(&self, idx: usize, texts: &ColumnTexts, query: &str) -> Option<MatchCandidate> {
        let mut best: Option<MatchCandidate> = None;
        let canonical = self.canonical_name(idx);
        let names = std::iter::once((texts.canonical.as_str(), canonical.as_str())).chain(
            texts
                .aliases
                .iter()
                .map(|(normalized, original)| (normalized.as_str(), original.as_str())),
        );
        for (normalized, original) in names {
            if normalized.is_empty() {
                continue;
            }
            keep_higher(
                &mut best,
                MatchCandidate {
                    schema_index: idx,
                    match_type: MatchType::Fuzzy,
                    raw_score: self.lexical.ratio(query, normalized).round(),
                    target: original.to_string(),
                },
            );
        }
        best
    }

    fn canonical_name(&self, idx: usize) -> String {
        self.registry
            .column(idx)
            .map(|column| column.canonical_name.clone())
            .unwrap_or_default()
    }

    fn finish(&self, label: &str, candidate: &MatchCandidate) -> MappingResult {
        let Some(column) = self.registry.column(candidate.schema_index) else {
            return MappingResult::no_match(label, NO_MATCH);
        };
        let confidence = candidate.confidence();
        let details = match candidate.match_type {
            MatchType::Exact => "Exact match to canonical name".to_string(),
            MatchType::Alias => format!("Matched alias: '{}'", candidate.target),
            MatchType::Fuzzy => format!(
                "Fuzzy match against '{}' (score: {})",
                candidate.target, candidate.raw_score
            ),
            MatchType::Semantic => format!(
                "Semantic match against '{}' (score: {})",
                candidate.target, candidate.raw_score
            ),
            MatchType::None => NO_MATCH.to_string(),
        };
        let result = MappingResult {
            user_column: label.to_string(),
            canonical_column: Some(column.canonical_name.clone()),
            confidence,
            match_type: candidate.match_type,
            match_details: details,
            recommended_action: MappingAction::recommend(confidence, column.required),
        };
        trace!(
            label,
            canonical = %column.canonical_name,
            match_type = %result.match_type,
            confidence,
            "resolved header"
        );
        result
    }
}

/// Replace `best` only on a strictly higher score, so the earliest column wins ties.
/// Whole-percent description score at half weight, rounded down.
fn description_score(token_set: f64) -> f64 {
    (token_set.round() * DESCRIPTION_WEIGHT).floor()
}

fn keep_higher(best: &mut Option<MatchCandidate>, candidate: MatchCandidate) {
    if best
        .as_ref()
        .is_none_or(|current| candidate.raw_score > current.raw_score)
    {
        *best = Some(candidate);
    }
}

fn precompute_embeddings(
    registry: &SchemaRegistry,
    embedder: &dyn Embedder,
) -> Option<Vec<Vec<f32>>> {
    if !embedder.is_enabled() {
        debug!(provider = embedder.name(), "semantic layer disabled");
        return None;
    }
    let mut embeddings = Vec::with_capacity(registry.len());
    for column in registry.columns() {
        match embedder.embed(&column.semantic_context()) {
            Ok(vector) => embeddings.push(vector),
            Err(error) => {
                warn!(
                    provider = embedder.name(),
                    key = %column.key,
                    %error,
                    "failed to embed schema column; semantic layer disabled"
                );
                return None;
            }
        }
    }
    info!(
        provider = embedder.name(),
        columns = embeddings.len(),
        "precomputed schema embeddings"
    );
    Some(embeddings)
}
