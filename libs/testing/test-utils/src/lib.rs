//! Shared test utilities for domain testing
//!
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongo")
//! - `TestDataBuilder`: deterministic test data generation
//! - `assertions`: custom assertion helpers
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{TestDataBuilder, TestMongo};
//!
//! #[tokio::test]
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let db = mongo.database(&builder.database_name());
//!     let email = builder.email("alice");
//! }
//! ```

#[cfg(feature = "mongo")]
mod mongo;

#[cfg(feature = "mongo")]
pub use mongo::TestMongo;

/// Builder for test data with deterministic randomization
///
/// Seeding from the test name keeps data reproducible and keeps parallel
/// tests from colliding on names.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (seed is the hash of the name)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_user");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// A unique name, e.g. `test-user-12345-main`
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// A unique e-mail address for `local`
    pub fn email(&self, local: &str) -> String {
        format!("{}+{}@example.test", local, self.seed)
    }

    /// Database name unique to this test
    pub fn database_name(&self) -> String {
        format!("test_{:x}", self.seed)
    }

    /// A well-formed 24-character hex identifier derived from the seed
    pub fn object_id_hex(&self) -> String {
        format!("{:024x}", self.seed)
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that a string is a 24-character lowercase hex identifier
    pub fn assert_object_id_hex(value: &str, context: &str) {
        assert!(
            value.len() == 24
                && value
                    .chars()
                    .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)),
            "{}: expected a 24-char lowercase hex id, got {:?}",
            context,
            value
        );
    }

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.object_id_hex(), builder2.object_id_hex());
        assert_eq!(builder1.name("user", "a"), builder2.name("user", "a"));
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.email("alice"), builder2.email("alice"));
        assert_ne!(builder1.database_name(), builder2.database_name());
    }

    #[test]
    fn test_object_id_hex_is_well_formed() {
        let builder = TestDataBuilder::from_test_name("hex");
        assertions::assert_object_id_hex(&builder.object_id_hex(), "object_id_hex");
        assertions::assert_object_id_hex(&TestDataBuilder::new(0).object_id_hex(), "zero seed");
    }
}
