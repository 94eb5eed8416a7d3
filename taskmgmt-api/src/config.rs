/// Configuration management for the API server
///
/// This module loads configuration from environment variables into a typed
/// struct. The struct is built once at startup and handed to the components
/// that need it; nothing reads the environment afterwards.
///
/// # Environment Variables
///
/// - `APP_ENV`: `local`, `dev` or `prod` (default: local)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `HTTP_TIMEOUT_SECS`: Request read/write timeout (default: 4)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `DATABASE_IDLE_TIMEOUT_SECS`: Idle pool connections are closed after this (default: 60)
/// - `RUST_LOG`: Overrides the log filter derived from `APP_ENV`
///
/// # Example
///
/// ```no_run
/// use taskmgmt_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::{env, fmt, str::FromStr, time::Duration};

/// Deployment environment
///
/// Controls log verbosity and format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Developer machine: human-readable logs at debug
    Local,

    /// Shared development: JSON logs at debug
    Dev,

    /// Production: JSON logs at info
    Prod,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }

    /// Log filter used when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Environment::Local | Environment::Dev => {
                "taskmgmt_api=debug,taskmgmt_shared=debug,tower_http=debug"
            }
            Environment::Prod => "taskmgmt_api=info,taskmgmt_shared=info,tower_http=info",
        }
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            other => anyhow::bail!("APP_ENV must be one of local, dev, prod (got {:?})", other),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Deployment environment
    pub environment: Environment,

    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Requests taking longer than this are answered with 408
    pub request_timeout_secs: u64,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,

    /// Idle connections are closed after this many seconds
    pub idle_timeout_secs: u64,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// A `.env` file in the working directory is loaded first, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a variable has an
    /// invalid value.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let environment = var("APP_ENV", "local").parse::<Environment>()?;

        let host = var("API_HOST", "0.0.0.0");
        let port = var("API_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("API_PORT is invalid: {}", e))?;
        let request_timeout_secs = var("HTTP_TIMEOUT_SECS", "4")
            .parse::<u64>()
            .map_err(|e| anyhow::anyhow!("HTTP_TIMEOUT_SECS is invalid: {}", e))?;

        let url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;
        let max_connections = var("DATABASE_MAX_CONNECTIONS", "10")
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("DATABASE_MAX_CONNECTIONS is invalid: {}", e))?;
        let idle_timeout_secs = var("DATABASE_IDLE_TIMEOUT_SECS", "60")
            .parse::<u64>()
            .map_err(|e| anyhow::anyhow!("DATABASE_IDLE_TIMEOUT_SECS is invalid: {}", e))?;

        if request_timeout_secs == 0 {
            anyhow::bail!("HTTP_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Self {
            environment,
            api: ApiConfig {
                host,
                port,
                request_timeout_secs,
            },
            database: DatabaseConfig {
                url,
                max_connections,
                idle_timeout_secs,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    /// Pool settings for the shared database layer
    pub fn pool_config(&self) -> taskmgmt_shared::db::pool::DatabaseConfig {
        taskmgmt_shared::db::pool::DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            idle_timeout_seconds: Some(self.database.idle_timeout_secs),
            ..Default::default()
        }
    }
}
