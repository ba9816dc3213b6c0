//! MongoDB test infrastructure
//!
//! Provides a `TestMongo` helper that starts a MongoDB container for testing.

use mongodb::{Client, Database};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::mongo::Mongo;

/// Test MongoDB wrapper that owns the container for the lifetime of a test
///
/// The container is stopped and removed when this struct is dropped.
///
/// # Example
///
/// ```no_run
/// use test_utils::TestMongo;
///
/// # async fn example() {
/// let mongo = TestMongo::new().await;
/// let db = mongo.database("users_test");
/// # }
/// ```
pub struct TestMongo {
    #[allow(dead_code)]
    container: ContainerAsync<Mongo>,
    client: Client,
    pub connection_string: String,
}

impl TestMongo {
    /// Start a MongoDB 7 container and connect to it
    pub async fn new() -> Self {
        let container = Mongo::default()
            .with_tag("7")
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let host_port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");

        let connection_string = format!("mongodb://127.0.0.1:{}", host_port);

        let client = Client::with_uri_str(&connection_string)
            .await
            .expect("Failed to create MongoDB client");

        tracing::info!(port = host_port, "Test MongoDB ready (mongo:7)");

        Self {
            container,
            client,
            connection_string,
        }
    }

    /// Get a cloned client (shares the connection pool)
    pub fn client(&self) -> Client {
        self.client.clone()
    }

    /// Get a database handle; each test should use its own name
    pub fn database(&self, name: &str) -> Database {
        self.client.database(name)
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }
}

impl Drop for TestMongo {
    fn drop(&mut self) {
        tracing::debug!("Cleaning up test MongoDB container");
    }
}
