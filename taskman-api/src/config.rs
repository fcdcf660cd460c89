/// Configuration management for the API server
///
/// Configuration is read from environment variables. Before reading, the file
/// named by `ENV_FILE` (default `.env`) is loaded with `dotenvy` if it exists;
/// variables already set in the environment win.
///
/// # Environment Variables
///
/// - `APP_HOST` / `APP_PORT`: Bind address (default: 0.0.0.0:8080)
/// - `STORE_BACKEND`: `postgres` (default) or `memory`
/// - `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`, `DB_PASSWORD`: PostgreSQL connection
/// - `DB_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET_KEY`: HMAC secret, at least 32 characters (required)
/// - `ACCESS_TOKEN_LIFETIME` / `REFRESH_TOKEN_LIFETIME`: Token TTLs in minutes (default: 15 / 43200)
/// - `USE_HTTPS`: Mark cookies `Secure` and send HSTS (default: false)
/// - `CONTEXT_TIMEOUT`: Per store operation deadline in seconds (default: 10)
/// - `ENCRYPT_COOKIE_KEY`: AES key for cookie sealing, base64 or raw, 16/24/32 bytes
///
/// # Example
///
/// ```no_run
/// use taskman_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use taskman_shared::auth::cookies;
use taskman_shared::db::pool::DatabaseConfig;
use tracing::warn;

/// Minimum accepted length of `JWT_SECRET_KEY`
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Longest accepted token lifetime, in minutes
pub const MAX_TOKEN_MINUTES: i64 = 10 * 365 * 24 * 60;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub auth: AuthConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Which store implementation backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => anyhow::bail!("STORE_BACKEND must be 'postgres' or 'memory', got '{}'", other),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// PostgreSQL settings (unused by the memory backend)
    pub database: DatabaseConfig,

    /// Deadline applied to every store operation
    pub operation_timeout: Duration,
}

/// Token and cookie configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for HS256 tokens
    pub jwt_secret: String,

    /// Access token lifetime in minutes
    pub access_token_minutes: i64,

    /// Refresh token lifetime in minutes
    pub refresh_token_minutes: i64,

    /// Serve cookies with `Secure` and enable HSTS
    pub use_https: bool,

    /// AES key sealing cookie values
    pub cookie_key: Vec<u8>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("access_token_minutes", &self.access_token_minutes)
            .field("refresh_token_minutes", &self.refresh_token_minutes)
            .field("use_https", &self.use_https)
            .field("cookie_key", &format_args!("<{} bytes>", self.cookie_key.len()))
            .finish()
    }
}

impl Config {
    /// Loads configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT_SECRET_KEY` is missing or too short, or if any
    /// numeric, boolean or backend variable has an invalid value.
    pub fn from_env() -> anyhow::Result<Self> {
        let env_file = env::var("ENV_FILE").unwrap_or_else(|_| ".env".to_string());
        match dotenvy::from_filename(&env_file) {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e).with_context(|| format!("Failed to load {}", env_file)),
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let jwt_secret = lookup("JWT_SECRET_KEY")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET_KEY environment variable is required"))?;

        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            anyhow::bail!(
                "JWT_SECRET_KEY must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            );
        }

        let access_token_minutes: i64 = parse(&lookup, "ACCESS_TOKEN_LIFETIME", "15")?;
        let refresh_token_minutes: i64 = parse(&lookup, "REFRESH_TOKEN_LIFETIME", "43200")?;
        if access_token_minutes <= 0 || refresh_token_minutes <= 0 {
            anyhow::bail!("Token lifetimes must be positive");
        }
        if access_token_minutes > MAX_TOKEN_MINUTES || refresh_token_minutes > MAX_TOKEN_MINUTES {
            anyhow::bail!(
                "Token lifetimes must not exceed {} minutes (10 years)",
                MAX_TOKEN_MINUTES
            );
        }

        let timeout_seconds: u64 = parse(&lookup, "CONTEXT_TIMEOUT", "10")?;
        if timeout_seconds == 0 {
            anyhow::bail!("CONTEXT_TIMEOUT must be at least 1 second");
        }

        let cookie_key = match lookup("ENCRYPT_COOKIE_KEY") {
            Some(raw) => cookies::parse_key(&raw).unwrap_or_else(|| {
                warn!("ENCRYPT_COOKIE_KEY is not a 16, 24 or 32 byte key; generating a random one");
                cookies::generate_key()
            }),
            None => {
                warn!("ENCRYPT_COOKIE_KEY not set; generating a random key, sessions will not survive restarts");
                cookies::generate_key()
            }
        };

        Ok(Self {
            server: ServerConfig {
                host: var("APP_HOST", "0.0.0.0"),
                port: parse(&lookup, "APP_PORT", "8080")?,
            },
            store: StoreConfig {
                backend: parse(&lookup, "STORE_BACKEND", "postgres")?,
                database: DatabaseConfig {
                    host: var("DB_HOST", "localhost"),
                    port: parse(&lookup, "DB_PORT", "5432")?,
                    name: var("DB_NAME", "taskman"),
                    user: var("DB_USER", "taskman"),
                    password: var("DB_PASSWORD", ""),
                    max_connections: parse(&lookup, "DB_MAX_CONNECTIONS", "10")?,
                    ..DatabaseConfig::default()
                },
                operation_timeout: Duration::from_secs(timeout_seconds),
            },
            auth: AuthConfig {
                jwt_secret,
                access_token_minutes,
                refresh_token_minutes,
                use_https: parse_bool(&var("USE_HTTPS", "false"))
                    .ok_or_else(|| anyhow::anyhow!("USE_HTTPS must be true or false"))?,
                cookie_key,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse<T, F>(lookup: &F, key: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: '{}' ({})", key, raw, e))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
