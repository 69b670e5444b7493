use std::path::PathBuf;
use std::str::FromStr;

use audition_core::ffmpeg::DEFAULT_FFMPEG_BIN;

use crate::auth::jwt::JwtConfig;
use crate::rate_limit::RateLimitConfig;

/// Error loading [`ServerConfig`] from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Filesystem locations used by the server and the migration tool.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    /// Directory holding the JSON documents.
    pub data_dir: PathBuf,
    /// Private media directory.
    pub uploads_dir: PathBuf,
    /// Scratch directory for concat manifests.
    pub tmp_dir: PathBuf,
    /// Old public upload directory, read by the migration tool.
    pub legacy_uploads_dir: PathBuf,
}

impl StoragePaths {
    /// | Env Var                     | Default              |
    /// |-----------------------------|----------------------|
    /// | `DATA_DIR`                  | `data`               |
    /// | `UPLOADS_DIR`               | `<DATA_DIR>/uploads` |
    /// | `TMP_DIR`                   | `tmp`                |
    /// | `LEGACY_PUBLIC_UPLOADS_DIR` | `public/uploads`     |
    pub fn from_env() -> Self {
        let data_dir = PathBuf::from(env_or("DATA_DIR", "data"));
        let uploads_dir = std::env::var("UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("uploads"));
        Self {
            data_dir,
            uploads_dir,
            tmp_dir: PathBuf::from(env_or("TMP_DIR", "tmp")),
            legacy_uploads_dir: PathBuf::from(env_or("LEGACY_PUBLIC_UPLOADS_DIR", "public/uploads")),
        }
    }
}

/// Account created when the users document is empty.
#[derive(Debug, Clone)]
pub struct AdminSeedConfig {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Timeout for the merge endpoint, which runs ffmpeg (default: `300`).
    pub merge_timeout_secs: u64,
    pub paths: StoragePaths,
    pub ffmpeg_path: String,
    /// JWT session token configuration.
    pub jwt: JwtConfig,
    /// Add `Secure` to the session cookie.
    pub cookie_secure: bool,
    pub admin: AdminSeedConfig,
    /// Origin used in links sent to webhooks.
    pub public_base_url: String,
    pub max_upload_bytes: usize,
    pub login_rate: RateLimitConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                  |
    /// |-----------------------------|--------------------------|
    /// | `HOST`                      | `0.0.0.0`                |
    /// | `PORT`                      | `3000`                   |
    /// | `CORS_ORIGINS`              | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                     |
    /// | `MERGE_TIMEOUT_SECS`        | `300`                    |
    /// | `FFMPEG_PATH`               | `ffmpeg`                 |
    /// | `COOKIE_SECURE`             | `false`                  |
    /// | `ADMIN_EMAIL`               | `admin@example.com`      |
    /// | `ADMIN_PASSWORD`            | `admin`                  |
    /// | `ADMIN_NAME`                | `Super Admin`            |
    /// | `PUBLIC_BASE_URL`           | `http://localhost:3000`  |
    /// | `MAX_UPLOAD_BYTES`          | `209715200`              |
    /// | `LOGIN_RATE_CAPACITY`       | `5`                      |
    /// | `LOGIN_RATE_REFILL_PER_MIN` | `5`                      |
    /// | `TRUST_PROXY`               | `false`                  |
    ///
    /// Storage paths are documented on [`StoragePaths::from_env`], JWT
    /// settings on [`JwtConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_parse("PORT", 3000)?,
            cors_origins,
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", 30)?,
            merge_timeout_secs: env_parse("MERGE_TIMEOUT_SECS", 300)?,
            paths: StoragePaths::from_env(),
            ffmpeg_path: env_or("FFMPEG_PATH", DEFAULT_FFMPEG_BIN),
            jwt: JwtConfig::from_env()?,
            cookie_secure: env_parse("COOKIE_SECURE", false)?,
            admin: AdminSeedConfig {
                email: env_or("ADMIN_EMAIL", "admin@example.com"),
                password: env_or("ADMIN_PASSWORD", "admin"),
                name: env_or("ADMIN_NAME", "Super Admin"),
            },
            public_base_url: env_or("PUBLIC_BASE_URL", "http://localhost:3000"),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", 200 * 1024 * 1024)?,
            login_rate: RateLimitConfig {
                capacity: env_parse("LOGIN_RATE_CAPACITY", 5.0)?,
                refill_per_min: env_parse("LOGIN_RATE_REFILL_PER_MIN", 5.0)?,
                trust_proxy: env_parse("TRUST_PROXY", false)?,
            },
        })
    }
}

/// Read `var`, falling back to `default` when unset.
pub(crate) fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

/// Parse `var`, falling back to `default` when unset.
pub(crate) fn env_parse<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}
