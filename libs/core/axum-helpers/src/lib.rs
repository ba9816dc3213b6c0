//! # Axum Helpers
//!
//! Shared building blocks for the HTTP services in this workspace.
//!
//! ## Modules
//!
//! - **[`server`]**: Router assembly, health checks, graceful shutdown
//! - **[`http`]**: HTTP middleware (CORS, security headers)
//! - **[`errors`]**: Structured error responses with error codes
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_production_app, create_router};
//! use core_config::server::ServerConfig;
//! use std::time::Duration;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = ServerConfig::default();
//!     let router = create_router::<ApiDoc>(Router::new(), &config)?;
//!     create_production_app(router, &config, Duration::from_secs(30), async {}).await
//! }
//! ```

pub mod errors;
pub mod http;
pub mod server;

// Re-export server types
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

// Re-export HTTP middleware
pub use http::{create_cors_layer, security_headers};

// Re-export error types
pub use errors::{AppError, ErrorCode, ErrorResponse};
