//! Similarity computation for embedding vectors.

use ordered_float::OrderedFloat;

use crate::Vector;
use crate::error::{EmbeddingError, Result};

/// Compute the cosine similarity between two vectors.
///
/// Returns a value between -1.0 and 1.0, where:
/// - 1.0 means identical direction
/// - 0.0 means orthogonal vectors
/// - -1.0 means opposite vectors
///
/// A zero-norm operand makes the metric undefined; that case evaluates to
/// 0.0 rather than NaN.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / (norm_a * norm_b))
}

/// Compute the dot product between two vectors.
pub fn dot_product(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    Ok(a.iter().zip(b.iter()).map(|(x, y)| x * y).sum())
}

/// Normalize a vector to unit length. A zero vector is left unchanged.
pub fn normalize(vector: &mut Vector) {
    let norm: f64 = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

/// Rank candidate vectors against a query by cosine similarity.
///
/// Returns `(candidate position, score)` pairs, at most `k`, in descending
/// score order. Candidates scoring strictly below `score_threshold` are
/// excluded. Ties keep the earlier candidate position first, so callers
/// iterating storage in insertion order get stable, deterministic ranking.
pub fn rank_top_k<'a, I>(
    query: &[f64],
    candidates: I,
    k: usize,
    score_threshold: Option<f64>,
) -> Result<Vec<(usize, f64)>>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let mut scores: Vec<(usize, f64)> = Vec::new();

    for (position, candidate) in candidates.into_iter().enumerate() {
        let score = cosine_similarity(query, candidate)?;
        if score_threshold.is_none_or(|threshold| score >= threshold) {
            scores.push((position, score));
        }
    }

    // Stable sort keeps insertion order for equal scores.
    scores.sort_by_key(|(_, score)| std::cmp::Reverse(OrderedFloat(*score)));
    scores.truncate(k);

    Ok(scores)
}
