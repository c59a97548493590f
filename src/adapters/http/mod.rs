//! HTTP adapters - REST API implementations.
//!
//! `session` serves resolution and the optional live index, `content`
//! serves notes and files under `/:session_name`. [`app_router`] assembles
//! both with the shared layers.

pub mod content;
pub mod error;
pub mod session;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::application::handlers::content::ExportActiveFilesHandler;
use crate::application::handlers::session::{ListActiveSessionsHandler, ResolveSessionHandler};
use crate::config::AppConfig;
use crate::ports::{ContentRepository, SessionRegistry};

pub use content::{content_routes, ContentAppState};
pub use error::ErrorResponse;
pub use session::{session_routes, SessionHandlers};

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// GET /health
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// Builds the complete application router.
pub fn app_router(
    config: &AppConfig,
    registry: Arc<dyn SessionRegistry>,
    content: Arc<dyn ContentRepository>,
) -> Router {
    let session_handlers = SessionHandlers::new(
        Arc::new(ResolveSessionHandler::new(
            registry.clone(),
            config.retention.session_ttl(),
        )),
        Arc::new(ListActiveSessionsHandler::new(registry.clone())),
        Arc::new(ExportActiveFilesHandler::new(
            registry.clone(),
            content.clone(),
        )),
        Arc::new(config.server.clone()),
    )
    .with_retry_after(config.retention.sweep_interval_secs);

    let router = Router::new()
        .route("/health", get(health))
        .merge(session_routes(
            session_handlers,
            config.features.enable_session_index,
        ))
        .merge(content_routes(ContentAppState::new(registry, content)))
        .fallback(error::not_found_fallback)
        .layer(DefaultBodyLimit::max(config.server.max_upload_bytes))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server.cors_origins_list()));

    if config.features.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryContentRepository, InMemorySessionRegistry};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn router(config: &AppConfig) -> Router {
        app_router(
            config,
            Arc::new(InMemorySessionRegistry::new()),
            Arc::new(InMemoryContentRepository::new()),
        )
    }

    #[tokio::test]
    async fn health_reports_version() {
        let response = router(&AppConfig::default())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn unknown_route_uses_error_body() {
        let response = router(&AppConfig::default())
            .oneshot(Request::get("/a/b/c/d/e").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
    }

    #[test]
    fn cors_layer_skips_unparseable_origins() {
        let _ = cors_layer(&["https://ok.example".to_string(), "bad\norigin".to_string()]);
        let _ = cors_layer(&[]);
    }
}
