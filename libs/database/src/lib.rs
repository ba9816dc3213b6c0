//! Database connectors and utilities.
//!
//! Only MongoDB is wired up; connection settings come from [`mongodb::MongoConfig`]
//! and connection attempts go through the retry helpers in [`common`].
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB support
//! - `config` - `core_config::FromEnv` implementations
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_from_config_with_retry};
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "users");
//! let client = connect_from_config_with_retry(&config, None).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;
