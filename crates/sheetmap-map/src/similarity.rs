//! Similarity providers used by the fuzzy and semantic layers.
//!
//! Lexical scoring is backed by rapidfuzz's Indel distance. Semantic scoring
//! goes through the [`Embedder`] trait; the bundled [`NgramEmbedder`] hashes
//! words and character trigrams into a fixed-size vector, which is enough to
//! relate "Gas Volume" to "Biogas volume produced" without any model files.

use std::collections::BTreeSet;

use rapidfuzz::distance::indel;

use crate::error::SimilarityError;
use crate::utils::normalize_text;

/// Lexical similarity on a 0-100 scale.
pub trait LexicalScorer: Send + Sync {
    /// Whole-string similarity.
    fn ratio(&self, left: &str, right: &str) -> f64;

    /// Similarity of the two token sets, ignoring order and repeats.
    fn token_set_ratio(&self, left: &str, right: &str) -> f64;
}

/// [`LexicalScorer`] backed by rapidfuzz.
#[derive(Debug, Clone, Copy, Default)]
pub struct RapidfuzzScorer;

impl LexicalScorer for RapidfuzzScorer {
    fn ratio(&self, left: &str, right: &str) -> f64 {
        if left.is_empty() || right.is_empty() {
            return 0.0;
        }
        indel::normalized_similarity(left.chars(), right.chars()) * 100.0
    }

    fn token_set_ratio(&self, left: &str, right: &str) -> f64 {
        let left_tokens: BTreeSet<&str> = left.split_whitespace().collect();
        let right_tokens: BTreeSet<&str> = right.split_whitespace().collect();
        if left_tokens.is_empty() || right_tokens.is_empty() {
            return 0.0;
        }

        let common = join_tokens(left_tokens.intersection(&right_tokens));
        let left_rest = join_tokens(left_tokens.difference(&right_tokens));
        let right_rest = join_tokens(right_tokens.difference(&left_tokens));

        // One side is a subset of the other.
        if !common.is_empty() && (left_rest.is_empty() || right_rest.is_empty()) {
            return 100.0;
        }

        let left_full = concat_tokens(&common, &left_rest);
        let right_full = concat_tokens(&common, &right_rest);
        let mut best = self.ratio(&left_full, &right_full);
        if !common.is_empty() {
            best = best
                .max(self.ratio(&common, &left_full))
                .max(self.ratio(&common, &right_full));
        }
        best
    }
}

fn join_tokens<'a, 'b: 'a>(tokens: impl Iterator<Item = &'a &'b str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

fn concat_tokens(common: &str, rest: &str) -> String {
    match (common.is_empty(), rest.is_empty()) {
        (true, _) => rest.to_string(),
        (_, true) => common.to_string(),
        _ => format!("{common} {rest}"),
    }
}

/// Maps text to a dense vector for semantic comparison.
pub trait Embedder: Send + Sync {
    /// Short provider name for logs and errors.
    fn name(&self) -> &str;

    /// A disabled embedder is skipped without warnings.
    fn is_enabled(&self) -> bool {
        true
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, SimilarityError>;
}

/// Embedder that never produces vectors; turns the semantic layer off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEmbedder;

impl Embedder for NoopEmbedder {
    fn name(&self) -> &str {
        "noop"
    }

    fn is_enabled(&self) -> bool {
        false
    }

    fn embed(&self, _text: &str) -> Result<Vec<f32>, SimilarityError> {
        Err(SimilarityError::Disabled(self.name().to_string()))
    }
}

const DEFAULT_DIMENSIONS: usize = 256;
const WORD_WEIGHT: f32 = 1.0;
const TRIGRAM_WEIGHT: f32 = 0.5;

/// Hashed bag of words and character trigrams, L2-normalized.
#[derive(Debug, Clone, Copy)]
pub struct NgramEmbedder {
    dimensions: usize,
}

impl Default for NgramEmbedder {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
        }
    }
}

impl NgramEmbedder {
    /// Create an embedder with `dimensions` buckets (at least one).
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn bucket(&self, feature: &str) -> usize {
        (fnv1a(feature.as_bytes()) % self.dimensions as u64) as usize
    }
}

impl Embedder for NgramEmbedder {
    fn name(&self) -> &str {
        "ngram"
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, SimilarityError> {
        let normalized = normalize_text(text);
        let mut vector = vec![0.0f32; self.dimensions];
        for word in normalized.split_whitespace() {
            vector[self.bucket(word)] += WORD_WEIGHT;
            let padded: Vec<char> = format!(" {word} ").chars().collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                vector[self.bucket(&trigram)] += TRIGRAM_WEIGHT;
            }
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        Ok(vector)
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(*byte)).wrapping_mul(PRIME))
}

/// Cosine similarity of two vectors, in [-1, 1].
///
/// Zero vectors compare as 0.0.
pub fn cosine(left: &[f32], right: &[f32]) -> Result<f64, SimilarityError> {
    if left.len() != right.len() {
        return Err(SimilarityError::DimensionMismatch {
            expected: left.len(),
            actual: right.len(),
        });
    }
    let mut dot = 0.0f64;
    let mut left_norm = 0.0f64;
    let mut right_norm = 0.0f64;
    for (l, r) in left.iter().zip(right) {
        let (l, r) = (f64::from(*l), f64::from(*r));
        dot += l * r;
        left_norm += l * l;
        right_norm += r * r;
    }
    if left_norm == 0.0 || right_norm == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (left_norm.sqrt() * right_norm.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_is_symmetric_and_bounded() {
        let scorer = RapidfuzzScorer;
        assert_eq!(scorer.ratio("gas volume", "gas volume"), 100.0);
        assert_eq!(scorer.ratio("", "gas"), 0.0);
        let forward = scorer.ratio("date time", "datetime");
        let backward = scorer.ratio("datetime", "date time");
        assert!((forward - backward).abs() < 1e-9);
        assert!(forward > 90.0 && forward < 100.0);
    }

    #[test]
    fn token_set_ignores_order_and_subsets() {
        let scorer = RapidfuzzScorer;
        assert_eq!(scorer.token_set_ratio("volume gas", "gas volume"), 100.0);
        assert_eq!(
            scorer.token_set_ratio("temperature", "digester temperature in celsius"),
            100.0
        );
        assert_eq!(scorer.token_set_ratio("", "gas"), 0.0);
        assert!(scorer.token_set_ratio("feed mass", "power output") < 60.0);
    }

    #[test]
    fn ngram_embeddings_are_normalized() {
        let embedder = NgramEmbedder::default();
        let vector = embedder.embed("Biogas Volume").unwrap();
        assert_eq!(vector.len(), embedder.dimensions());
        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
        assert!(embedder.embed("   ").unwrap().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn related_text_is_closer_than_unrelated_text() {
        let embedder = NgramEmbedder::default();
        let gas = embedder.embed("gas volume").unwrap();
        let biogas = embedder.embed("biogas volume produced").unwrap();
        let feed = embedder.embed("feed mass").unwrap();
        assert!(cosine(&gas, &biogas).unwrap() > cosine(&gas, &feed).unwrap());
    }

    #[test]
    fn cosine_rejects_mismatched_lengths() {
        assert_eq!(
            cosine(&[1.0, 0.0], &[1.0]),
            Err(SimilarityError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 0.0]), Ok(0.0));
    }

    #[test]
    fn noop_embedder_is_disabled() {
        assert!(!NoopEmbedder.is_enabled());
        assert!(NoopEmbedder.embed("x").is_err());
    }
}
