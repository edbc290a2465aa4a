use crate::record::decode_catalog;
use async_trait::async_trait;
use simrec_core::{CatalogSource, Error, Item, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Catalog read from a JSON file on every fetch
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for JsonFileSource {
    async fn fetch_catalog(&self) -> Result<Vec<Item>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| Error::Source(format!("failed to read {}: {}", self.path.display(), e)))?;
        let items = decode_catalog(&bytes)?;
        debug!(path = %self.path.display(), items = items.len(), "catalog file loaded");
        Ok(items)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_reads_catalog_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"_id": "a", "name": "Tee", "category": "Men", "subCategory": "Topwear"}}]"#
        )
        .unwrap();

        let source = JsonFileSource::new(file.path());
        let items = source.fetch_catalog().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Tee");
    }

    #[tokio::test]
    async fn test_missing_file_is_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileSource::new(dir.path().join("missing.json"));
        assert!(matches!(source.fetch_catalog().await, Err(Error::Source(_))));
    }
}
