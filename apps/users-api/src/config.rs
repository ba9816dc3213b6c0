use core_config::{AppInfo, FromEnv, app_info, env_or_default, env_parse_or, server::ServerConfig};
use std::time::Duration;

// Import MongoDB config from the database library
use database::mongodb::MongoConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub users: UsersConfig,
}

/// Settings for the users collection and its per-request deadline
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsersConfig {
    pub collection: String,
    pub operation_timeout: Duration,
}

impl FromEnv for UsersConfig {
    /// - USERS_COLLECTION: users
    /// - USERS_OPERATION_TIMEOUT_MS: 5000
    fn from_env() -> Result<Self, core_config::ConfigError> {
        let collection = env_or_default("USERS_COLLECTION", domain_users::mongodb::DEFAULT_COLLECTION);
        let timeout_ms: u64 = env_parse_or("USERS_OPERATION_TIMEOUT_MS", 5000)?;

        Ok(Self {
            collection,
            operation_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;
        let users = UsersConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            environment,
            users,
        })
    }
}
