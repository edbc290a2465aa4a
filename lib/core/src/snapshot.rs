use crate::{CatalogIndex, Item, SimilarityMatrix, TermWeightMatrix, TfIdfVectorizer};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// Everything one training pass produces. Never mutated after construction;
/// a retrain builds a new snapshot and swaps it in whole.
#[derive(Debug)]
pub struct ModelSnapshot {
    items: Vec<Item>,
    weights: TermWeightMatrix,
    similarity: SimilarityMatrix,
    index: CatalogIndex,
    generation: u64,
    trained_at: DateTime<Utc>,
}

impl ModelSnapshot {
    /// Run composer, vectorizer, similarity and indexing over a non-empty
    /// catalog.
    pub fn build(items: Vec<Item>, generation: u64) -> Self {
        let contents: Vec<String> = items.iter().map(Item::content).collect();

        let mut vectorizer = TfIdfVectorizer::new();
        let weights = vectorizer.fit_transform(&contents);
        if vectorizer.vocabulary_size() == 0 {
            warn!(items = items.len(), "catalog has no indexable terms, all similarities are zero");
        }

        let similarity = SimilarityMatrix::from_weights(&weights);

        let index = CatalogIndex::build(&items);
        if index.duplicates() > 0 {
            warn!(
                duplicates = index.duplicates(),
                "duplicate item ids in catalog, keeping the last record for each"
            );
        }

        debug!(
            items = items.len(),
            terms = vectorizer.vocabulary_size(),
            generation,
            "model snapshot built"
        );

        Self {
            items,
            weights,
            similarity,
            index,
            generation,
            trained_at: Utc::now(),
        }
    }

    #[inline]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[inline]
    pub fn item(&self, row: usize) -> Option<&Item> {
        self.items.get(row)
    }

    #[inline]
    pub fn weights(&self) -> &TermWeightMatrix {
        &self.weights
    }

    #[inline]
    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    #[inline]
    pub fn index(&self) -> &CatalogIndex {
        &self.index
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_consistent_shapes() {
        let items = vec![
            Item::new("a", "red shoes", None, "Men", "Footwear"),
            Item::new("b", "blue shoes", Some("running".into()), "Men", "Footwear"),
        ];
        let snapshot = ModelSnapshot::build(items, 7);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.weights().n_rows(), 2);
        assert_eq!(snapshot.similarity().len(), 2);
        assert_eq!(snapshot.index().lookup("b"), Some(1));
        assert_eq!(snapshot.generation(), 7);
    }
}
