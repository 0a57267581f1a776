// Similarity ranker
// Scores candidates against a query vector and selects the top N with a
// deterministic tie-break.


use std::cmp::Ordering;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;
use crate::index::IndexedItem;

/// Scores closer than this are treated as equal and fall through to the
/// popularity/id tie-break.
pub const SCORE_EPSILON: f32 = 1e-9;

/// One recommendation with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub item: CatalogItem,
    pub score: f32,
}

/// Ordered recommendations for one category, best first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub entries: Vec<RankedEntry>,
}

impl RankedResult {
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cosine similarity between two vectors, defined as 0 when either norm is 0
/// so that degenerate embeddings rank last instead of poisoning the sort.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Select the top `n` candidates by descending cosine similarity.
///
/// Ties within [`SCORE_EPSILON`] break by higher popularity, then by
/// lexicographically smaller id, so identical inputs always produce identical
/// orderings. Asking for more results than there are candidates returns them
/// all; an empty candidate set returns an empty result.
#[inline]
pub fn rank(query: &[f32], candidates: &[IndexedItem], n: usize) -> RankedResult {
    if n == 0 || candidates.is_empty() {
        return RankedResult::default();
    }

    let entries = candidates
        .iter()
        .map(|candidate| (cosine_similarity(query, &candidate.embedding), candidate))
        .sorted_by(compare_scored)
        .take(n)
        .map(|(score, candidate)| RankedEntry {
            item: candidate.item.clone(),
            score,
        })
        .collect();

    RankedResult { entries }
}

fn compare_scored(a: &(f32, &IndexedItem), b: &(f32, &IndexedItem)) -> Ordering {
    if (a.0 - b.0).abs() > SCORE_EPSILON {
        return b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal);
    }

    b.1.item
        .popularity
        .partial_cmp(&a.1.item.popularity)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.1.item.id.cmp(&b.1.item.id))
}
