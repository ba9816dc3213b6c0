//! Readiness endpoint

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use serde_json::Value;

use crate::state::AppState;

/// Create a readiness router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// Readiness check - verifies the MongoDB connection
async fn readiness_check(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let client = &state.mongo_client;
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "mongodb",
        Box::pin(async move {
            let status = database::mongodb::check_health_detailed(client).await;
            if status.healthy {
                Ok(())
            } else {
                Err(status.message.unwrap_or_else(|| "ping failed".to_string()))
            }
        }),
    )];

    run_health_checks(checks).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment, UsersConfig};
    use axum::body::Body;
    use axum::http::Request;
    use core_config::{app_info, server::ServerConfig};
    use database::mongodb::MongoConfig;
    use http_body_util::BodyExt;
    use std::time::Duration;
    use tower::ServiceExt;

    async fn unreachable_state() -> AppState {
        // Nothing listens on port 1; server selection gives up quickly.
        let url = "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200&connectTimeoutMS=200";
        let mongo_client = mongodb::Client::with_uri_str(url).await.unwrap();
        let db = mongo_client.database("users_test");

        AppState {
            config: Config {
                app: app_info!(),
                mongodb: MongoConfig::with_database(url, "users_test"),
                server: ServerConfig::default(),
                environment: Environment::Development,
                users: UsersConfig {
                    collection: "users".to_string(),
                    operation_timeout: Duration::from_secs(5),
                },
            },
            mongo_client,
            db,
        }
    }

    #[tokio::test]
    async fn test_ready_reports_unreachable_mongodb() {
        let app = router(unreachable_state().await);

        let response = app
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "not ready");
        assert_eq!(json["mongodb"], "disconnected");
    }

    #[tokio::test]
    async fn test_users_routes_map_store_outage_to_503() {
        let app = crate::api::routes(&unreachable_state().await);

        let response = app
            .oneshot(Request::get("/users").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
