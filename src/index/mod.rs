// Catalog index module
// Builds the immutable (item, vector) store, persists it as a snapshot, and
// hands out atomically swappable references for serving.


use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{CatalogItem, Category};
use crate::embeddings::Embedder;
use crate::{RecError, Result};

/// One catalog item together with its embedding vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedItem {
    pub item: CatalogItem,
    pub embedding: Vec<f32>,
}

/// Immutable store of embedded catalog items, partitioned by category.
/// Built once per dataset snapshot; "updating" means building a new index and
/// swapping it in through [`SharedIndex`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogIndex {
    model: String,
    dimension: usize,
    built_at: DateTime<Utc>,
    partitions: BTreeMap<Category, Vec<IndexedItem>>,
}

impl CatalogIndex {
    /// Embed every item's text blob in batch and assemble the index.
    ///
    /// Categories with no items are simply absent from the result; an empty
    /// item collection yields an index that answers every query with empty
    /// results. Duplicate ids within a category violate the ingestion
    /// contract and are rejected.
    #[inline]
    pub fn build(items: Vec<CatalogItem>, embedder: &dyn Embedder) -> Result<Self> {
        let mut grouped: BTreeMap<Category, Vec<CatalogItem>> = BTreeMap::new();
        for item in items {
            grouped.entry(item.category).or_default().push(item);
        }

        let mut partitions = BTreeMap::new();
        let mut dimension = 0usize;

        for (category, group) in grouped {
            let mut seen_ids: HashSet<&str> = HashSet::new();
            for item in &group {
                if !seen_ids.insert(item.id.as_str()) {
                    return Err(RecError::InvalidArgument(format!(
                        "Duplicate {} id in input: {}",
                        category, item.id
                    )));
                }
                debug_assert!(!item.raw_text.is_empty(), "catalog item has empty raw_text");
            }

            info!("Embedding {} {} items", group.len(), category);
            let texts: Vec<String> = group.iter().map(|i| i.raw_text.clone()).collect();
            let vectors = embedder.embed_batch(&texts)?;

            if vectors.len() != group.len() {
                return Err(RecError::ModelUnavailable(format!(
                    "Encoder returned {} vectors for {} inputs",
                    vectors.len(),
                    group.len()
                )));
            }

            for vector in &vectors {
                if vector.is_empty() {
                    return Err(RecError::ModelUnavailable(
                        "Encoder returned an empty vector".to_string(),
                    ));
                }
                if dimension == 0 {
                    dimension = vector.len();
                } else if vector.len() != dimension {
                    return Err(RecError::ModelUnavailable(format!(
                        "Inconsistent embedding dimensions: expected {}, got {}",
                        dimension,
                        vector.len()
                    )));
                }
            }

            let indexed = group
                .into_iter()
                .zip(vectors)
                .map(|(item, embedding)| IndexedItem { item, embedding })
                .collect();
            partitions.insert(category, indexed);
        }

        debug!(
            "Built catalog index: dimension {}, {} partitions",
            dimension,
            partitions.len()
        );

        Ok(Self {
            model: embedder.model_name().to_string(),
            dimension,
            built_at: Utc::now(),
            partitions,
        })
    }

    /// Read-only view of one category's items. An absent category is an empty
    /// slice, not an error.
    #[inline]
    pub fn lookup(&self, category: Category) -> &[IndexedItem] {
        self.partitions.get(&category).map_or(&[], Vec::as_slice)
    }

    /// Categories that have at least one indexed item.
    #[inline]
    pub fn categories(&self) -> Vec<Category> {
        self.partitions.keys().copied().collect()
    }

    #[inline]
    pub fn item_count(&self, category: Category) -> usize {
        self.lookup(category).len()
    }

    #[inline]
    pub fn total_count(&self) -> usize {
        self.partitions.values().map(Vec::len).sum()
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[inline]
    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Persist the index as JSON. serde_json emits the shortest
    /// round-trippable float representation, so reloaded vectors are
    /// bit-identical and ranking order survives persistence.
    #[inline]
    pub fn save_snapshot(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    RecError::Snapshot(format!("Failed to create snapshot directory: {}", e))
                })?;
            }
        }

        let json = serde_json::to_vec(self)
            .map_err(|e| RecError::Snapshot(format!("Failed to serialize snapshot: {}", e)))?;
        fs::write(path, json)
            .map_err(|e| RecError::Snapshot(format!("Failed to write snapshot: {}", e)))?;

        info!(
            "Saved index snapshot ({} items) to {}",
            self.total_count(),
            path.display()
        );
        Ok(())
    }

    /// Reload a snapshot written by [`save_snapshot`], re-validating the
    /// dimension invariant.
    #[inline]
    pub fn load_snapshot(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .map_err(|e| RecError::Snapshot(format!("Failed to read snapshot: {}", e)))?;
        let index: Self = serde_json::from_slice(&bytes)
            .map_err(|e| RecError::Snapshot(format!("Failed to parse snapshot: {}", e)))?;

        for (category, items) in &index.partitions {
            if items.is_empty() {
                return Err(RecError::Snapshot(format!(
                    "Snapshot has an empty {} partition",
                    category
                )));
            }
            for indexed in items {
                if indexed.embedding.len() != index.dimension {
                    return Err(RecError::Snapshot(format!(
                        "Snapshot vector for {} id {} has dimension {}, expected {}",
                        category,
                        indexed.item.id,
                        indexed.embedding.len(),
                        index.dimension
                    )));
                }
            }
        }

        info!(
            "Loaded index snapshot ({} items, model {}) from {}",
            index.total_count(),
            index.model,
            path.display()
        );
        Ok(index)
    }
}

/// Process-wide slot for the currently served index. Readers clone the Arc
/// and keep ranking against a consistent index even while a rebuild swaps in
/// a replacement.
#[derive(Debug, Default)]
pub struct SharedIndex {
    current: RwLock<Option<Arc<CatalogIndex>>>,
}

impl SharedIndex {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically replace the served index.
    #[inline]
    pub fn install(&self, index: CatalogIndex) -> Arc<CatalogIndex> {
        let index = Arc::new(index);
        *self.current.write() = Some(Arc::clone(&index));
        info!("Installed catalog index built at {}", index.built_at());
        index
    }

    /// The currently served index, if one has been built.
    #[inline]
    pub fn load(&self) -> Option<Arc<CatalogIndex>> {
        self.current.read().clone()
    }

    #[inline]
    pub fn is_built(&self) -> bool {
        self.current.read().is_some()
    }
}
