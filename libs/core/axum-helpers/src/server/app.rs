use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::{create_cors_layer, security_headers};
use axum::{Json, Router, middleware, routing::get};
use core_config::server::ServerConfig;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Creates the application router with documentation and common middleware.
///
/// This sets up:
/// - `/api-docs/openapi.json` serving the generated OpenAPI document
/// - `/scalar` serving an interactive API reference
/// - API routes nested under `/api`
/// - Tracing, security headers and response compression
/// - CORS, only when `server_config.cors_allowed_origins` is non-empty
/// - A JSON 404 fallback
///
/// Health endpoints are merged in by the app with [`super::health_router`].
///
/// # Errors
/// Returns `InvalidInput` if a configured CORS origin is not a valid header value.
pub fn create_router<T>(apis: Router, server_config: &ServerConfig) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    let openapi = T::openapi();

    let mut router = Router::new()
        .route(
            "/api-docs/openapi.json",
            get({
                let doc = openapi.clone();
                move || async move { Json(doc) }
            }),
        )
        .merge(Scalar::with_url("/scalar", openapi))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers));

    if let Some(cors_layer) = create_cors_layer(&server_config.cors_allowed_origins)? {
        info!(
            origins = ?server_config.cors_allowed_origins,
            "CORS configured"
        );
        router = router.layer(cors_layer);
    }

    Ok(router.layer(CompressionLayer::new()))
}

/// Serves `router` until SIGINT/SIGTERM, then runs `cleanup` bounded by
/// `shutdown_timeout`.
///
/// In-flight requests are allowed to finish before the function returns.
///
/// # Example
/// ```ignore
/// let cleanup = async move {
///     client.shutdown().await;
/// };
///
/// create_production_app(router, &config, Duration::from_secs(30), cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::default();
    let signal_listener = coordinator.clone();
    let mut cleanup_trigger = coordinator.subscribe();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_handle = tokio::spawn(async move {
        let _ = cleanup_trigger.recv().await;

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(_) => info!("Cleanup completed successfully"),
            Err(_) => {
                tracing::warn!(
                    "Cleanup exceeded timeout of {:?}, forcing shutdown",
                    shutdown_timeout
                );
            }
        }
    });

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { signal_listener.wait_for_signal().await })
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    // A server error also counts as shutdown so cleanup still runs.
    coordinator.shutdown();
    cleanup_handle.await.ok();

    serve_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi(info(title = "test"))]
    struct TestDoc;

    fn api() -> Router {
        Router::new().route("/ping", get(|| async { "pong" }))
    }

    #[tokio::test]
    async fn test_api_routes_are_nested() {
        let router = create_router::<TestDoc>(api(), &ServerConfig::default()).unwrap();

        let response = router
            .oneshot(Request::get("/api/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
            "nosniff"
        );
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let router = create_router::<TestDoc>(api(), &ServerConfig::default()).unwrap();

        let response = router
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let doc: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(doc["info"]["title"], "test");
    }

    #[tokio::test]
    async fn test_unknown_route_returns_json_404() {
        let router = create_router::<TestDoc>(api(), &ServerConfig::default()).unwrap();

        let response = router
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "NOT_FOUND");
    }

    #[test]
    fn test_invalid_cors_origin_fails_router_creation() {
        let mut config = ServerConfig::default();
        config.cors_allowed_origins = vec!["bad\u{7f}origin".to_string()];

        assert!(create_router::<TestDoc>(api(), &config).is_err());
    }
}
