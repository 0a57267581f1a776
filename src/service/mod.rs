// Recommendation service
// Orchestrates normalize -> encode -> rank per query against the shared
// catalog index.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{CatalogItem, Category, normalize_text};
use crate::embeddings::Embedder;
use crate::index::{CatalogIndex, SharedIndex};
use crate::ranker::{RankedResult, rank};
use crate::{RecError, Result};

/// Response for one query: ranked books and papers plus the categories the
/// index could actually serve, so an empty list is never mistaken for a
/// served-but-empty category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub query: String,
    pub books: RankedResult,
    pub papers: RankedResult,
    pub served_categories: Vec<Category>,
}

/// Query-time entry point. Holds the shared encoder and the swappable index;
/// safe to call concurrently, queries only ever read.
pub struct RecommendationService {
    embedder: Arc<dyn Embedder>,
    index: SharedIndex,
}

impl RecommendationService {
    #[inline]
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            index: SharedIndex::new(),
        }
    }

    /// Install a prebuilt index (typically loaded from a snapshot), replacing
    /// any currently served one. Rejects an index built with a different
    /// model than the encoder, since its vectors would not be comparable to
    /// query vectors.
    #[inline]
    pub fn install_index(&self, index: CatalogIndex) -> Result<()> {
        if index.total_count() > 0 && index.model() != self.embedder.model_name() {
            return Err(RecError::Config(format!(
                "Index was built with model '{}' but the encoder is '{}'",
                index.model(),
                self.embedder.model_name()
            )));
        }
        self.index.install(index);
        Ok(())
    }

    /// Rebuild trigger: embed the given items into a fresh index and swap it
    /// in. Readers mid-query keep the index they started with.
    #[inline]
    pub fn build_and_install(&self, items: Vec<CatalogItem>) -> Result<Arc<CatalogIndex>> {
        let index = CatalogIndex::build(items, self.embedder.as_ref())?;
        info!(
            "Rebuilt catalog index: {} items across {} categories",
            index.total_count(),
            index.categories().len()
        );
        Ok(self.index.install(index))
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.index.is_built()
    }

    /// Answer a query with up to `n_books` books and `n_papers` papers.
    ///
    /// Counts arrive as signed integers from the serving boundary; negative
    /// values are an invalid argument. An empty query is legal and ranks by
    /// whatever similarity the empty-text embedding produces.
    #[inline]
    pub fn recommend(&self, query: &str, n_books: i64, n_papers: i64) -> Result<Recommendations> {
        if n_books < 0 || n_papers < 0 {
            return Err(RecError::InvalidArgument(format!(
                "Result counts must be non-negative (got n_books={}, n_papers={})",
                n_books, n_papers
            )));
        }

        let index = self.index.load().ok_or(RecError::IndexNotBuilt)?;

        let normalized = normalize_text(query);
        debug!("Encoding query: {:?}", normalized);
        let query_vector = self.embedder.embed(&normalized)?;

        let books = rank(
            &query_vector,
            index.lookup(Category::Book),
            n_books as usize,
        );
        let papers = rank(
            &query_vector,
            index.lookup(Category::Paper),
            n_papers as usize,
        );

        debug!(
            "Query {:?} produced {} books and {} papers",
            normalized,
            books.len(),
            papers.len()
        );

        Ok(Recommendations {
            query: query.to_string(),
            books,
            papers,
            served_categories: index.categories(),
        })
    }
}
