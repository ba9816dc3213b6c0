use mongodb::{Client, bson::doc, error::ErrorKind, options::ClientOptions};
use std::time::Duration;
use tracing::info;

use super::MongoConfig;
use crate::common::{RetryConfig, retry_with_backoff_if};

/// Error type for MongoDB connection setup
#[derive(Debug, thiserror::Error)]
pub enum MongoError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

impl MongoError {
    /// Whether another connection attempt could succeed.
    ///
    /// A malformed connection string or invalid option never will.
    pub fn is_transient(&self) -> bool {
        match self {
            MongoError::Mongo(e) => !matches!(
                *e.kind,
                ErrorKind::InvalidArgument { .. } | ErrorKind::Authentication { .. }
            ),
            MongoError::ConnectionFailed(_) => true,
        }
    }
}

/// Connect using a MongoConfig and verify the deployment answers a ping
pub async fn connect_from_config(config: &MongoConfig) -> Result<Client, MongoError> {
    info!(url = %config.redacted_url(), "Attempting to connect to MongoDB");

    let mut options = ClientOptions::parse(&config.url).await?;

    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));

    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }

    let client = Client::with_options(options)?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| MongoError::ConnectionFailed(e.to_string()))?;

    info!("Successfully connected to MongoDB");
    Ok(client)
}

/// Connect from config with exponential backoff, retrying only transient failures
pub async fn connect_from_config_with_retry(
    config: &MongoConfig,
    retry_config: Option<RetryConfig>,
) -> Result<Client, MongoError> {
    retry_with_backoff_if(
        || connect_from_config(config),
        retry_config.unwrap_or_default(),
        MongoError::is_transient,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failed_is_transient() {
        assert!(MongoError::ConnectionFailed("server selection timeout".into()).is_transient());
    }

    #[tokio::test]
    async fn test_invalid_url_is_not_retried() {
        let config = MongoConfig::new("not-a-mongodb-url");
        let result = connect_from_config_with_retry(
            &config,
            Some(RetryConfig::new().with_initial_delay(1).without_jitter()),
        )
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err, MongoError::Mongo(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_connect() {
        let mongo_url = std::env::var("MONGODB_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        assert!(connect_from_config(&MongoConfig::new(mongo_url)).await.is_ok());
    }
}
