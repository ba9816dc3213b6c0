#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse_or};

const DEFAULT_MAX_POOL_SIZE: u32 = 100;
const DEFAULT_MIN_POOL_SIZE: u32 = 5;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SERVER_SELECTION_TIMEOUT_SECS: u64 = 30;

/// MongoDB connection settings.
///
/// # Example
///
/// ```ignore
/// use database::mongodb::MongoConfig;
///
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "users");
///
/// // From discrete host/credential settings
/// let config = MongoConfig::from_parts(
///     &MongoAddress::new("db.internal", 27017).with_credentials("svc", "s3cret", Some("admin")),
///     "users",
/// );
/// ```
#[derive(Clone, Debug)]
pub struct MongoConfig {
    /// Connection string: mongodb://[username:password@]host[:port][/database][?options]
    pub url: String,

    /// Database name to use
    pub database: String,

    /// Optional application name for server logs
    pub app_name: Option<String>,

    /// Maximum number of connections in the pool
    pub max_pool_size: u32,

    /// Minimum number of connections in the pool
    pub min_pool_size: u32,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Server selection timeout in seconds
    pub server_selection_timeout_secs: u64,
}

/// Host, port and optional credentials used to assemble a connection string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MongoAddress {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Authentication database (`authSource`)
    pub auth_db: Option<String>,
}

impl MongoAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            username: None,
            password: None,
            auth_db: None,
        }
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        auth_db: Option<&str>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self.auth_db = auth_db.map(str::to_string);
        self
    }

    /// Render as a `mongodb://` connection string; credentials are percent-encoded.
    pub fn to_url(&self) -> String {
        let credentials = match (&self.username, &self.password) {
            (Some(user), Some(pass)) if !user.is_empty() => format!(
                "{}:{}@",
                urlencoding::encode(user),
                urlencoding::encode(pass)
            ),
            (Some(user), None) if !user.is_empty() => format!("{}@", urlencoding::encode(user)),
            _ => String::new(),
        };

        let mut url = format!("mongodb://{}{}:{}", credentials, self.host, self.port);
        if let Some(auth_db) = self.auth_db.as_deref().filter(|db| !db.is_empty()) {
            url.push_str("/?authSource=");
            url.push_str(&urlencoding::encode(auth_db));
        }
        url
    }
}

impl MongoConfig {
    /// Create a config with just a URL and the `default` database
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_database(url, "default")
    }

    /// Create a config with a specific database name
    pub fn with_database(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            app_name: None,
            max_pool_size: DEFAULT_MAX_POOL_SIZE,
            min_pool_size: DEFAULT_MIN_POOL_SIZE,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            server_selection_timeout_secs: DEFAULT_SERVER_SELECTION_TIMEOUT_SECS,
        }
    }

    /// Create a config from discrete host and credential settings
    pub fn from_parts(address: &MongoAddress, database: impl Into<String>) -> Self {
        Self::with_database(address.to_url(), database)
    }

    /// Set custom pool bounds
    pub fn with_pool_size(mut self, max_pool_size: u32, min_pool_size: u32) -> Self {
        self.max_pool_size = max_pool_size;
        self.min_pool_size = min_pool_size;
        self
    }

    /// Set the application name for server logs
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Connection string with any password replaced by `***`, safe to log.
    pub fn redacted_url(&self) -> String {
        let Some(scheme_end) = self.url.find("://") else {
            return self.url.clone();
        };
        let rest = &self.url[scheme_end + 3..];
        let Some(at) = rest.rfind('@') else {
            return self.url.clone();
        };
        let user = rest[..at].split(':').next().unwrap_or_default();
        format!(
            "{}://{}:***@{}",
            &self.url[..scheme_end],
            user,
            &rest[at + 1..]
        )
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self::new("mongodb://localhost:27017")
    }
}

/// Load MongoConfig from environment variables
///
/// - `MONGODB_URL` or `MONGO_URL` - connection string; when neither is set the
///   string is assembled from `MONGODB_HOST` (required then), `MONGODB_PORT`
///   (default 27017), `MONGODB_USERNAME`, `MONGODB_PASSWORD`, `MONGODB_AUTH_DB`
/// - `MONGODB_DATABASE` or `MONGO_DATABASE` (required)
/// - `MONGODB_APP_NAME` (optional)
/// - `MONGODB_MAX_POOL_SIZE` (default 100), `MONGODB_MIN_POOL_SIZE` (default 5)
/// - `MONGODB_CONNECT_TIMEOUT_SECS` (default 10)
/// - `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (default 30)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = match std::env::var("MONGODB_URL").or_else(|_| std::env::var("MONGO_URL")) {
            Ok(url) => url,
            Err(_) => address_from_env()?.to_url(),
        };

        let database = std::env::var("MONGODB_DATABASE")
            .or_else(|_| std::env::var("MONGO_DATABASE"))
            .map_err(|_| {
                ConfigError::MissingEnvVar("MONGODB_DATABASE or MONGO_DATABASE".to_string())
            })?;

        Ok(Self {
            url,
            database,
            app_name: std::env::var("MONGODB_APP_NAME").ok(),
            max_pool_size: env_parse_or("MONGODB_MAX_POOL_SIZE", DEFAULT_MAX_POOL_SIZE)?,
            min_pool_size: env_parse_or("MONGODB_MIN_POOL_SIZE", DEFAULT_MIN_POOL_SIZE)?,
            connect_timeout_secs: env_parse_or(
                "MONGODB_CONNECT_TIMEOUT_SECS",
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )?,
            server_selection_timeout_secs: env_parse_or(
                "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
                DEFAULT_SERVER_SELECTION_TIMEOUT_SECS,
            )?,
        })
    }
}

#[cfg(feature = "config")]
fn address_from_env() -> Result<MongoAddress, ConfigError> {
    let host = std::env::var("MONGODB_HOST").map_err(|_| {
        ConfigError::MissingEnvVar("MONGODB_URL, MONGO_URL or MONGODB_HOST".to_string())
    })?;

    Ok(MongoAddress {
        host,
        port: env_parse_or("MONGODB_PORT", 27017u16)?,
        username: std::env::var("MONGODB_USERNAME").ok(),
        password: std::env::var("MONGODB_PASSWORD").ok(),
        auth_db: std::env::var("MONGODB_AUTH_DB").ok(),
    })
}
