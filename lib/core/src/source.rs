use crate::{Item, Result};
use async_trait::async_trait;
use parking_lot::RwLock;

/// Where a training pass gets its catalog from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the full, ordered catalog. An empty catalog is not an error.
    async fn fetch_catalog(&self) -> Result<Vec<Item>>;

    /// Short human-readable description for logs
    fn describe(&self) -> String {
        "catalog".to_string()
    }
}

/// In-memory catalog, replaceable at runtime
#[derive(Debug, Default)]
pub struct StaticCatalog {
    items: RwLock<Vec<Item>>,
}

impl StaticCatalog {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    pub fn replace(&self, items: Vec<Item>) {
        *self.items.write() = items;
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn fetch_catalog(&self) -> Result<Vec<Item>> {
        Ok(self.items.read().clone())
    }

    fn describe(&self) -> String {
        format!("static catalog ({} items)", self.len())
    }
}
