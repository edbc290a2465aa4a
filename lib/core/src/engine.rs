use crate::{CatalogSource, Error, HistoryPolicy, Item, ModelSnapshot, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

/// What a refresh does with the live model when the catalog comes back empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyCatalogPolicy {
    /// Keep serving the previous model
    #[default]
    Retain,
    /// Drop the previous model; queries fail with `NotReady` until the next
    /// successful training pass
    Discard,
}

impl FromStr for EmptyCatalogPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "retain" => Ok(Self::Retain),
            "discard" => Ok(Self::Discard),
            other => Err(Error::InvalidConfig(format!(
                "unknown empty catalog policy '{other}', expected 'retain' or 'discard'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RecommenderConfig {
    pub empty_catalog: EmptyCatalogPolicy,
    pub history: HistoryPolicy,
}

/// Outcome of one training pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainStatus {
    pub trained: bool,
    pub item_count: usize,
    pub generation: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelStatus {
    pub ready: bool,
    pub item_count: usize,
    pub generation: u64,
    pub trained_at: Option<DateTime<Utc>>,
}

/// A fetched catalog waiting to be turned into a snapshot
#[derive(Debug)]
pub struct TrainingPass {
    generation: u64,
    items: Vec<Item>,
}

impl TrainingPass {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Default)]
struct Published {
    snapshot: Option<Arc<ModelSnapshot>>,
    generation: u64,
}

/// Owns the live model snapshot and its retrain lifecycle.
///
/// Readers clone the current `Arc<ModelSnapshot>` under a short read lock and
/// query it without holding any lock. Training builds a fresh snapshot off to
/// the side and swaps it in under a short write lock, so a reader sees either
/// the old model or the new one in full.
pub struct Recommender {
    config: RecommenderConfig,
    source: Arc<dyn CatalogSource>,
    published: RwLock<Published>,
    next_generation: AtomicU64,
}

impl Recommender {
    pub fn new(source: Arc<dyn CatalogSource>, config: RecommenderConfig) -> Self {
        Self {
            config,
            source,
            published: RwLock::new(Published::default()),
            next_generation: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Fetch the catalog and publish a new model built from it.
    pub async fn train(&self) -> Result<TrainStatus> {
        let pass = self.begin_training().await?;
        Ok(self.complete_training(pass))
    }

    pub async fn refresh(&self) -> Result<TrainStatus> {
        self.train().await
    }

    /// First half of [`train`](Self::train): take a generation ticket and
    /// fetch the catalog. Nothing is published yet, so dropping the future or
    /// failing here leaves the live model untouched.
    pub async fn begin_training(&self) -> Result<TrainingPass> {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!(generation, source = %self.source.describe(), "training pass started");

        let items = self.source.fetch_catalog().await.map_err(|e| {
            error!(generation, "catalog fetch failed: {}", e);
            e
        })?;

        Ok(TrainingPass { generation, items })
    }

    /// Second half of [`train`](Self::train): build and publish. CPU bound.
    pub fn complete_training(&self, pass: TrainingPass) -> TrainStatus {
        let TrainingPass { generation, items } = pass;

        if items.is_empty() {
            warn!(generation, "no products found in catalog, model cannot train");
            if self.config.empty_catalog == EmptyCatalogPolicy::Discard {
                let old = {
                    let mut published = self.published.write();
                    if generation > published.generation {
                        published.generation = generation;
                        published.snapshot.take()
                    } else {
                        None
                    }
                };
                if old.is_some() {
                    warn!(generation, "previous model discarded");
                }
            }
            return TrainStatus {
                trained: false,
                item_count: 0,
                generation,
                warning: Some("catalog is empty, model not trained".to_string()),
            };
        }

        let item_count = items.len();
        if self.is_superseded(generation) {
            return Self::superseded(generation, item_count);
        }

        let snapshot = Arc::new(ModelSnapshot::build(items, generation));

        let old = {
            let mut published = self.published.write();
            if generation < published.generation {
                None
            } else {
                published.generation = generation;
                Some(published.snapshot.replace(snapshot))
            }
        };

        match old {
            // the replaced snapshot is released after the write lock
            Some(_) => {
                info!(generation, items = item_count, "model trained and published");
                TrainStatus {
                    trained: true,
                    item_count,
                    generation,
                    warning: None,
                }
            }
            None => Self::superseded(generation, item_count),
        }
    }

    fn is_superseded(&self, generation: u64) -> bool {
        generation < self.published.read().generation
    }

    fn superseded(generation: u64, item_count: usize) -> TrainStatus {
        warn!(generation, "training pass superseded by a newer one, not published");
        TrainStatus {
            trained: false,
            item_count,
            generation,
            warning: Some("superseded by a newer training pass".to_string()),
        }
    }

    /// The live snapshot, or `NotReady` before the first successful training.
    pub fn snapshot(&self) -> Result<Arc<ModelSnapshot>> {
        self.published.read().snapshot.clone().ok_or(Error::NotReady)
    }

    pub fn is_ready(&self) -> bool {
        self.published.read().snapshot.is_some()
    }

    pub fn status(&self) -> ModelStatus {
        let published = self.published.read();
        match &published.snapshot {
            Some(snapshot) => ModelStatus {
                ready: true,
                item_count: snapshot.len(),
                generation: snapshot.generation(),
                trained_at: Some(snapshot.trained_at()),
            },
            None => ModelStatus {
                ready: false,
                item_count: 0,
                generation: published.generation,
                trained_at: None,
            },
        }
    }

    pub fn recommend_similar(&self, id: &str, k: usize) -> Result<Vec<String>> {
        self.snapshot()?.recommend_similar(id, k)
    }

    /// Like [`recommend_similar`](Self::recommend_similar) but returns the
    /// full records in ranked order.
    pub fn recommend_similar_items(&self, id: &str, k: usize) -> Result<Vec<Item>> {
        let snapshot = self.snapshot()?;
        let row = snapshot
            .index()
            .lookup(id)
            .ok_or_else(|| Error::ItemNotFound(id.to_string()))?;
        Ok(snapshot
            .similar_rows(row, k)
            .into_iter()
            .filter_map(|j| snapshot.item(j).cloned())
            .collect())
    }

    pub fn recommend_for_history<L, E>(&self, liked: &[L], exclude: &[E], k: usize) -> Result<Vec<String>>
    where
        L: AsRef<str>,
        E: AsRef<str>,
    {
        Ok(self
            .snapshot()?
            .recommend_for_history(liked, exclude, k, self.config.history))
    }
}
