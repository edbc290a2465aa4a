use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::Deserialize;
use simrec_core::{Error, Recommender};
use std::sync::Arc;
use tracing::{error, info};

/// Result-size limits applied to every query route
#[derive(Debug, Clone, Copy)]
pub struct ApiConfig {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            default_limit: 5,
            max_limit: 100,
        }
    }
}

impl ApiConfig {
    fn limit(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_limit).min(self.max_limit)
    }
}

#[derive(Deserialize)]
struct LimitQuery {
    limit: Option<usize>,
}

/// History query body: ids the user likes and ids never to recommend
#[derive(Deserialize)]
struct RecommendationRequest {
    #[serde(default)]
    product_ids: Vec<String>,
    #[serde(default)]
    exclude_ids: Vec<String>,
    limit: Option<usize>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(
        recommender: Arc<Recommender>,
        config: ApiConfig,
        host: String,
        port: u16,
    ) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(recommender.clone()))
                .app_data(web::Data::new(config))
                .configure(Self::routes)
        })
        .bind((host, port))?
        .run()
        .await
    }

    pub fn routes(cfg: &mut web::ServiceConfig) {
        cfg.route("/recommend", web::post().to(recommend_for_history))
            .route("/recommend/{id}", web::get().to(recommend_similar))
            .route("/products/{id}/similar", web::get().to(similar_products))
            .route("/refresh", web::get().to(refresh))
            .route("/refresh", web::post().to(refresh))
            .route("/health", web::get().to(health));
    }
}

fn error_response(e: &Error) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        Error::NotReady => HttpResponse::ServiceUnavailable().json(body),
        Error::ItemNotFound(_) => HttpResponse::NotFound().json(body),
        Error::Source(_) | Error::Serialization(_) | Error::InvalidRecord(_) => {
            HttpResponse::BadGateway().json(body)
        }
        _ => HttpResponse::InternalServerError().json(body),
    }
}

async fn recommend_similar(
    recommender: web::Data<Arc<Recommender>>,
    config: web::Data<ApiConfig>,
    path: web::Path<String>,
    query: web::Query<LimitQuery>,
) -> ActixResult<HttpResponse> {
    let id = path.into_inner();
    let limit = config.limit(query.limit);

    match recommender.recommend_similar(&id, limit) {
        Ok(ids) => Ok(HttpResponse::Ok().json(ids)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn recommend_for_history(
    recommender: web::Data<Arc<Recommender>>,
    config: web::Data<ApiConfig>,
    req: web::Json<RecommendationRequest>,
) -> ActixResult<HttpResponse> {
    let limit = config.limit(req.limit);

    match recommender.recommend_for_history(&req.product_ids, &req.exclude_ids, limit) {
        Ok(ids) => Ok(HttpResponse::Ok().json(ids)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn similar_products(
    recommender: web::Data<Arc<Recommender>>,
    config: web::Data<ApiConfig>,
    path: web::Path<String>,
    query: web::Query<LimitQuery>,
) -> ActixResult<HttpResponse> {
    let id = path.into_inner();
    let limit = config.limit(query.limit);

    match recommender.recommend_similar_items(&id, limit) {
        Ok(items) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "result": items
        }))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn refresh(recommender: web::Data<Arc<Recommender>>) -> ActixResult<HttpResponse> {
    let pass = match recommender.begin_training().await {
        Ok(pass) => pass,
        Err(e) => return Ok(error_response(&e)),
    };

    // building the similarity matrix is CPU bound, keep it off the worker
    let recommender = recommender.get_ref().clone();
    let status = match web::block(move || recommender.complete_training(pass)).await {
        Ok(status) => status,
        Err(e) => {
            error!("training task failed: {}", e);
            return Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "training task failed"
            })));
        }
    };

    info!(
        trained = status.trained,
        items = status.item_count,
        generation = status.generation,
        "refresh finished"
    );

    let message = if status.trained {
        "Model Retrained"
    } else {
        "Model Not Retrained"
    };
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": message,
        "trained": status.trained,
        "item_count": status.item_count,
        "generation": status.generation,
        "warning": status.warning,
    })))
}

async fn health(recommender: web::Data<Arc<Recommender>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(recommender.status()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use simrec_core::{Item, RecommenderConfig, StaticCatalog};

    fn abc_catalog() -> Vec<Item> {
        vec![
            Item::new("A", "red shoes sport", None, "", ""),
            Item::new("B", "blue shoes sport", None, "", ""),
            Item::new("C", "red jacket winter", None, "", ""),
        ]
    }

    fn recommender(items: Vec<Item>) -> (Arc<StaticCatalog>, Arc<Recommender>) {
        let catalog = Arc::new(StaticCatalog::new(items));
        let recommender = Arc::new(Recommender::new(catalog.clone(), RecommenderConfig::default()));
        (catalog, recommender)
    }

    macro_rules! app {
        ($recommender:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($recommender.clone()))
                    .app_data(web::Data::new(ApiConfig::default()))
                    .configure(RestApi::routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_not_trained_returns_503() {
        let (_, rec) = recommender(abc_catalog());
        let app = app!(rec);

        let req = test::TestRequest::get().uri("/recommend/A").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let req = test::TestRequest::post()
            .uri("/recommend")
            .set_json(serde_json::json!({"product_ids": ["A"], "exclude_ids": []}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn test_single_item_route() {
        let (_, rec) = recommender(abc_catalog());
        rec.train().await.unwrap();
        let app = app!(rec);

        let req = test::TestRequest::get().uri("/recommend/A?limit=2").to_request();
        let ids: Vec<String> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ids, vec!["B", "C"]);

        let req = test::TestRequest::get().uri("/recommend/missing").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_history_route() {
        let (_, rec) = recommender(abc_catalog());
        rec.train().await.unwrap();
        let app = app!(rec);

        let req = test::TestRequest::post()
            .uri("/recommend")
            .set_json(serde_json::json!({"product_ids": ["A"], "exclude_ids": ["B"]}))
            .to_request();
        let ids: Vec<String> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ids, vec!["C"]);

        let req = test::TestRequest::post()
            .uri("/recommend")
            .set_json(serde_json::json!({"product_ids": [], "exclude_ids": []}))
            .to_request();
        let ids: Vec<String> = test::call_and_read_body_json(&app, req).await;
        assert!(ids.is_empty());
    }

    #[actix_web::test]
    async fn test_similar_products_are_hydrated() {
        let (_, rec) = recommender(abc_catalog());
        rec.train().await.unwrap();
        let app = app!(rec);

        let req = test::TestRequest::get().uri("/products/A/similar?limit=1").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["result"][0]["id"], "B");
        assert_eq!(body["result"][0]["name"], "blue shoes sport");
    }

    #[actix_web::test]
    async fn test_refresh_and_health() {
        let (catalog, rec) = recommender(Vec::new());
        let app = app!(rec);

        let req = test::TestRequest::get().uri("/refresh").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["trained"], false);
        assert!(body["warning"].is_string());

        catalog.replace(abc_catalog());
        let req = test::TestRequest::post().uri("/refresh").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "Model Retrained");
        assert_eq!(body["item_count"], 3);

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["ready"], true);
        assert_eq!(body["item_count"], 3);
    }

    #[actix_web::test]
    async fn test_limit_defaults_and_clamps() {
        let config = ApiConfig::default();
        assert_eq!(config.limit(None), 5);
        assert_eq!(config.limit(Some(2)), 2);
        assert_eq!(config.limit(Some(10_000)), 100);
    }
}
