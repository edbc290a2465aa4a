//! # simrec
//!
//! Content-based product recommendations served from memory.
//!
//! simrec fits a TF-IDF model over the text of every product in a catalog,
//! precomputes pairwise similarity, and answers two queries: products similar
//! to one product, and products similar to a user's whole history minus what
//! they already have. Retraining builds a new model off to the side and swaps
//! it in atomically, so queries keep being served during a refresh.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! simrec --catalog-url http://localhost:4000/api/product/list --http-port 8000
//! curl localhost:8000/recommend/65f0c2
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use simrec::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> simrec::Result<()> {
//! let source = Arc::new(JsonFileSource::new("products.json"));
//! let recommender = Recommender::new(source, RecommenderConfig::default());
//! recommender.train().await?;
//!
//! let similar = recommender.recommend_similar("65f0c2", 5)?;
//! let for_user = recommender.recommend_for_history(&["65f0c2"], &["65f0c2"], 5)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Structure
//!
//! - `simrec-core` - Vectorizer, similarity matrix, snapshots, queries, lifecycle
//! - `simrec-source` - JSON file and HTTP catalog sources
//! - `simrec-api` - REST API

// Re-export core types
pub use simrec_core::{
    CatalogIndex, CatalogSource, EmptyCatalogPolicy, Error, HistoryPolicy, Item, ModelSnapshot,
    ModelStatus, Recommender, RecommenderConfig, Result, SimilarityMatrix, StaticCatalog,
    TfIdfVectorizer, TrainStatus,
};

// Re-export sources
pub use simrec_source::{HttpSource, JsonFileSource};

// Re-export API
pub use simrec_api::{ApiConfig, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ApiConfig, CatalogSource, EmptyCatalogPolicy, Error, HistoryPolicy, HttpSource, Item,
        JsonFileSource, Recommender, RecommenderConfig, RestApi, Result, StaticCatalog,
        TrainStatus,
    };
}
