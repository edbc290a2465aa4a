//! # simrec Core
//!
//! Core library for the simrec recommendation service.
//!
//! This crate provides the in-memory content-based recommendation engine:
//!
//! - [`Item`] - A catalog entry and its composed text content
//! - [`TfIdfVectorizer`] - Term weighting over the composed catalog text
//! - [`SimilarityMatrix`] - Dense pairwise similarity between all items
//! - [`CatalogIndex`] - Item id to matrix row mapping
//! - [`ModelSnapshot`] - Immutable result of one training pass
//! - [`Recommender`] - Training lifecycle and the two recommendation queries
//!
//! ## Example
//!
//! ```rust
//! use simrec_core::{Item, Recommender, RecommenderConfig, StaticCatalog};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(StaticCatalog::new(vec![
//!     Item::new("A", "red shoes sport", None, "", ""),
//!     Item::new("B", "blue shoes sport", None, "", ""),
//!     Item::new("C", "red jacket winter", None, "", ""),
//! ]));
//! let recommender = Recommender::new(catalog, RecommenderConfig::default());
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! runtime.block_on(recommender.train()).unwrap();
//!
//! assert_eq!(recommender.recommend_similar("A", 2).unwrap(), vec!["B", "C"]);
//! assert_eq!(
//!     recommender.recommend_for_history(&["A"], &["B"], 5).unwrap(),
//!     vec!["C"]
//! );
//! ```

pub mod engine;
pub mod error;
pub mod index;
pub mod item;
pub mod query;
pub mod similarity;
pub mod snapshot;
pub mod source;
pub mod text;
pub mod vectorizer;

pub use engine::{
    EmptyCatalogPolicy, ModelStatus, Recommender, RecommenderConfig, TrainStatus, TrainingPass,
};
pub use error::{Error, Result};
pub use index::CatalogIndex;
pub use item::Item;
pub use query::HistoryPolicy;
pub use similarity::SimilarityMatrix;
pub use snapshot::ModelSnapshot;
pub use source::{CatalogSource, StaticCatalog};
pub use vectorizer::{SparseRow, TermWeightMatrix, TfIdfVectorizer};
