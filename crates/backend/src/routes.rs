use axum::{middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::api::handlers::p950_tender_registry;
use crate::system;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // P950 TENDER REGISTRY
        // ========================================
        .route("/api/tenders/status", get(p950_tender_registry::status))
        .route("/api/tenders/data", get(p950_tender_registry::data))
        .route("/api/tenders/export", get(p950_tender_registry::export))
        .layer(middleware::from_fn(system::middleware::request_logger))
        .layer(cors)
}
