use crate::record::decode_catalog;
use async_trait::async_trait;
use simrec_core::{CatalogSource, Error, Item, Result};
use std::time::Duration;
use tracing::debug;

/// Catalog fetched with a GET request, e.g. from the shop backend's product
/// list endpoint.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CatalogSource for HttpSource {
    async fn fetch_catalog(&self) -> Result<Vec<Item>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::Source(format!("failed to fetch catalog: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Source(format!(
                "failed to fetch catalog: HTTP {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Source(format!("failed to read catalog body: {}", e)))?;

        let items = decode_catalog(&bytes)?;
        debug!(url = %self.url, items = items.len(), "catalog fetched");
        Ok(items)
    }

    fn describe(&self) -> String {
        format!("url {}", self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_url_is_source_error() {
        let source = HttpSource::new("http://127.0.0.1:9/products", Duration::from_secs(2)).unwrap();
        assert!(matches!(source.fetch_catalog().await, Err(Error::Source(_))));
    }
}
