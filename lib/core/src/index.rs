use crate::Item;
use ahash::AHashMap;

/// Bidirectional id <-> row mapping for one catalog snapshot
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    by_id: AHashMap<String, usize>,
    ids: Vec<String>,
    duplicates: usize,
}

impl CatalogIndex {
    /// Build from an ordered catalog. A repeated id maps to its last row.
    pub fn build(items: &[Item]) -> Self {
        let mut by_id = AHashMap::with_capacity(items.len());
        let mut duplicates = 0;
        for (row, item) in items.iter().enumerate() {
            if by_id.insert(item.id.clone(), row).is_some() {
                duplicates += 1;
            }
        }

        Self {
            by_id,
            ids: items.iter().map(|item| item.id.clone()).collect(),
            duplicates,
        }
    }

    #[inline]
    pub fn lookup(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    #[inline]
    pub fn reverse(&self, row: usize) -> Option<&str> {
        self.ids.get(row).map(String::as_str)
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Number of rows whose id was already seen earlier in the catalog
    #[inline]
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
