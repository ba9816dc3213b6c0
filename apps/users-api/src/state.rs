//! Application state management.
//!
//! Shared state passed to the route builders: configuration plus the
//! MongoDB client and database handle.

use mongodb::{Client, Database};

/// Shared application state.
///
/// Cloning is cheap; the MongoDB client shares its connection pool.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// MongoDB client (cloneable, shares underlying connection pool)
    pub mongo_client: Client,
    /// MongoDB database instance
    pub db: Database,
}
