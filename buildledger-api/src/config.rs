/// Configuration management for the API server
///
/// Configuration is layered: built-in defaults first, then environment
/// variables prefixed with `BUILDLEDGER` and nested with `__`. A `.env` file is
/// loaded first when present.
///
/// # Environment Variables
///
/// - `BUILDLEDGER__API__HOST`: Host to bind to (default: 0.0.0.0)
/// - `BUILDLEDGER__API__PORT`: Port to bind to (default: 8080)
/// - `BUILDLEDGER__API__CORS_ORIGINS`: Comma-separated origins, `*` for any (default: *)
/// - `BUILDLEDGER__STORAGE__MODE`: `auto`, `file` or `remote` (default: auto)
/// - `BUILDLEDGER__STORAGE__DATA_DIR`: Partition file directory (default: ./data)
/// - `BUILDLEDGER__STORAGE__DATABASE_URL`: PostgreSQL connection string (optional)
/// - `BUILDLEDGER__STORAGE__MAX_CONNECTIONS`: Pool size (default: 10)
/// - `BUILDLEDGER__JWT__SECRET`: Secret key for JWT signing (required)
/// - `BUILDLEDGER__SEED__ADMIN_USERNAME`: Bootstrap admin (default: admin)
/// - `BUILDLEDGER__SEED__ADMIN_PASSWORD`: Bootstrap admin password (required)
/// - `RUST_LOG`: Log filter (default: buildledger_api=debug,buildledger_shared=info,tower_http=debug)
///
/// # Example
///
/// ```no_run
/// use buildledger_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use buildledger_shared::db::pool::DatabaseConfig;
use buildledger_shared::store::{SeedConfig, StorageModePreference, StoreConfig};
use config::Environment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Prefix of every configuration environment variable
pub const ENV_PREFIX: &str = "BUILDLEDGER";

/// Minimum JWT secret length
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Record store configuration
    pub storage: StorageConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Bootstrap admin account
    pub seed: SeedSettings,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Comma-separated allowed origins
    pub cors_origins: String,
}

/// Record store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub mode: StorageModePreference,

    /// Directory holding the partition files in file mode
    pub data_dir: PathBuf,

    /// PostgreSQL connection URL; required for `remote`, optional for `auto`
    #[serde(default)]
    pub database_url: Option<String>,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// Must be at least 32 bytes. Generate with: `openssl rand -hex 32`
    pub secret: String,
}

/// Bootstrap admin account, created per country on startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedSettings {
    pub admin_username: String,

    pub admin_password: String,

    #[serde(default)]
    pub admin_full_name: Option<String>,
}

impl Config {
    /// Loads configuration from `.env` and the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `BUILDLEDGER__JWT__SECRET` or `BUILDLEDGER__SEED__ADMIN_PASSWORD` is missing
    /// - A value cannot be parsed (port, storage mode, ...)
    /// - The JWT secret is shorter than 32 characters
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::load(Environment::with_prefix(ENV_PREFIX).separator("__"))
    }

    /// Builds configuration from defaults overlaid with `env`
    pub fn load(env: Environment) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .set_default("api.host", "0.0.0.0")?
            .set_default("api.port", 8080)?
            .set_default("api.cors_origins", "*")?
            .set_default("storage.mode", "auto")?
            .set_default("storage.data_dir", "./data")?
            .set_default("storage.max_connections", 10)?
            .set_default("seed.admin_username", "admin")?
            .set_default("seed.admin_full_name", "Administrator")?
            .add_source(env.try_parsing(true))
            .build()?;

        if settings.get_string("jwt.secret").is_err() {
            anyhow::bail!("{}__JWT__SECRET environment variable is required", ENV_PREFIX);
        }
        if settings.get_string("seed.admin_password").is_err() {
            anyhow::bail!(
                "{}__SEED__ADMIN_PASSWORD environment variable is required",
                ENV_PREFIX
            );
        }

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.jwt.secret.len() < MIN_JWT_SECRET_LEN {
            anyhow::bail!(
                "JWT secret must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            );
        }
        if self.storage.mode == StorageModePreference::Remote
            && self.storage.database_url.as_deref().map_or(true, str::is_empty)
        {
            anyhow::bail!("Remote storage mode requires {}__STORAGE__DATABASE_URL", ENV_PREFIX);
        }
        Ok(())
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Allowed CORS origins, trimmed and without empty entries
    pub fn cors_origins(&self) -> Vec<String> {
        self.api
            .cors_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Record store settings
    pub fn store_config(&self) -> StoreConfig {
        let database = self
            .storage
            .database_url
            .as_ref()
            .filter(|url| !url.is_empty())
            .map(|url| DatabaseConfig {
                url: url.clone(),
                max_connections: self.storage.max_connections,
                ..Default::default()
            });

        StoreConfig {
            mode: self.storage.mode,
            data_dir: self.storage.data_dir.clone(),
            database,
        }
    }

    /// Bootstrap admin settings
    pub fn seed_config(&self) -> SeedConfig {
        SeedConfig {
            admin_username: self.seed.admin_username.clone(),
            admin_password: self.seed.admin_password.clone(),
            admin_full_name: self.seed.admin_full_name.clone(),
        }
    }
}
