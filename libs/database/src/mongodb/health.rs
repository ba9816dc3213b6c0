use mongodb::{Client, bson::doc};
use std::time::Instant;

/// Health check status for MongoDB
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    /// Error details when unhealthy
    pub message: Option<String>,
    pub response_time_ms: u64,
}

async fn ping(client: &Client) -> mongodb::error::Result<()> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
}

/// Check MongoDB health, reporting latency and any error message
pub async fn check_health_detailed(client: &Client) -> HealthStatus {
    let start = Instant::now();
    let result = ping(client).await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(()) => HealthStatus {
            healthy: true,
            message: None,
            response_time_ms,
        },
        Err(e) => HealthStatus {
            healthy: false,
            message: Some(e.to_string()),
            response_time_ms,
        },
    }
}
