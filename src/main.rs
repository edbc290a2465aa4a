use anyhow::Context;
use clap::Parser;
use simrec_api::{ApiConfig, RestApi};
use simrec_core::{
    CatalogSource, EmptyCatalogPolicy, Error, HistoryPolicy, Recommender, RecommenderConfig,
    TrainStatus,
};
use simrec_source::{HttpSource, JsonFileSource};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Content-based product recommendation service
#[derive(Parser, Debug)]
#[command(name = "simrec")]
#[command(about = "Serve TF-IDF product recommendations over HTTP", long_about = None)]
struct Args {
    /// JSON file holding the product catalog
    #[arg(long, env = "SIMREC_CATALOG_FILE", conflicts_with = "catalog_url")]
    catalog_file: Option<PathBuf>,

    /// URL returning the product catalog as JSON
    #[arg(long, env = "SIMREC_CATALOG_URL")]
    catalog_url: Option<String>,

    /// Timeout for catalog fetches over HTTP, in seconds
    #[arg(long, env = "SIMREC_FETCH_TIMEOUT_SECS", default_value_t = 30)]
    fetch_timeout_secs: u64,

    /// Address to bind the HTTP API to
    #[arg(long, env = "SIMREC_HOST", default_value = "0.0.0.0")]
    host: String,

    /// HTTP API port
    #[arg(long, env = "SIMREC_HTTP_PORT", default_value_t = 8000)]
    http_port: u16,

    /// Log level
    #[arg(long, env = "SIMREC_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// What a refresh does when the catalog is empty: retain or discard the live model
    #[arg(long, env = "SIMREC_EMPTY_CATALOG", default_value = "retain")]
    empty_catalog: EmptyCatalogPolicy,

    /// Allow liked products to appear in history recommendations
    #[arg(long, env = "SIMREC_INCLUDE_LIKED")]
    include_liked: bool,

    /// Number of recommendations returned when a request sets no limit
    #[arg(long, env = "SIMREC_DEFAULT_LIMIT", default_value_t = 5)]
    default_limit: usize,

    /// Upper bound on the limit a request may ask for
    #[arg(long, env = "SIMREC_MAX_LIMIT", default_value_t = 100)]
    max_limit: usize,

    /// Retrain on this interval in seconds; 0 disables scheduled refresh
    #[arg(long, env = "SIMREC_REFRESH_INTERVAL_SECS", default_value_t = 0)]
    refresh_interval_secs: u64,
}

impl Args {
    fn source(&self) -> simrec_core::Result<Arc<dyn CatalogSource>> {
        match (&self.catalog_file, &self.catalog_url) {
            (Some(path), None) => Ok(Arc::new(JsonFileSource::new(path))),
            (None, Some(url)) => Ok(Arc::new(HttpSource::new(
                url.clone(),
                Duration::from_secs(self.fetch_timeout_secs),
            )?)),
            _ => Err(Error::InvalidConfig(
                "exactly one of --catalog-file or --catalog-url is required".to_string(),
            )),
        }
    }

    fn api_config(&self) -> simrec_core::Result<ApiConfig> {
        if self.default_limit > self.max_limit {
            return Err(Error::InvalidConfig(format!(
                "--default-limit ({}) exceeds --max-limit ({})",
                self.default_limit, self.max_limit
            )));
        }
        Ok(ApiConfig {
            default_limit: self.default_limit,
            max_limit: self.max_limit,
        })
    }

    fn recommender_config(&self) -> RecommenderConfig {
        RecommenderConfig {
            empty_catalog: self.empty_catalog,
            history: if self.include_liked {
                HistoryPolicy::IncludeLiked
            } else {
                HistoryPolicy::ExcludeLiked
            },
        }
    }
}

/// Fetch on the runtime, build on the blocking pool.
async fn train(recommender: Arc<Recommender>) -> anyhow::Result<TrainStatus> {
    let pass = recommender.begin_training().await?;
    let status = tokio::task::spawn_blocking(move || recommender.complete_training(pass))
        .await
        .context("training task panicked")?;
    Ok(status)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting simrec v{}", env!("CARGO_PKG_VERSION"));

    let source = args.source()?;
    let api_config = args.api_config()?;
    info!("Catalog source: {}", source.describe());
    info!("HTTP API port: {}", args.http_port);

    let recommender = Arc::new(Recommender::new(source, args.recommender_config()));

    // a failed first pass leaves the service up but NotReady until /refresh succeeds
    match train(recommender.clone()).await {
        Ok(status) if status.trained => info!("Model trained on {} items", status.item_count),
        Ok(_) => warn!("Catalog is empty, serving NotReady until a refresh succeeds"),
        Err(e) => error!("Initial training failed: {:#}", e),
    }

    if args.refresh_interval_secs > 0 {
        let recommender = recommender.clone();
        let period = Duration::from_secs(args.refresh_interval_secs);
        info!("Scheduled refresh every {:?}", period);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = train(recommender.clone()).await {
                    error!("Scheduled refresh failed: {:#}", e);
                }
            }
        });
    }

    let recommender_http = recommender.clone();
    let host = args.host.clone();
    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on {}:{}", host, http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(recommender_http, api_config, host, http_port).await {
                error!("HTTP server error: {}", e);
            }
        })
    });

    info!("simrec started successfully");
    info!("HTTP API: http://{}:{}/", args.host, args.http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
