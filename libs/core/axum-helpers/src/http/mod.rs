//! HTTP middleware module.
//!
//! This module provides HTTP-level middleware for:
//! - CORS configuration
//! - Security headers
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::http::{create_cors_layer, security_headers};
//!
//! let mut app = Router::new().layer(axum::middleware::from_fn(security_headers));
//! if let Some(cors) = create_cors_layer(&config.cors_allowed_origins)? {
//!     app = app.layer(cors);
//! }
//! ```

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::security_headers;
