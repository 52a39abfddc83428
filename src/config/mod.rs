//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `SHEETMATCH_*` environment variables
//! (the Gemini key is read from the conventional `GEMINI_API_KEY`).

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::time::Duration;

use crate::constants::{DEFAULT_EMBEDDING_MODEL, DEFAULT_VISION_MODEL};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SHEETMATCH_*` overrides on top of defaults.
#[derive(Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Postgres connection string for the product catalog.
    pub database_url: String,

    /// Catalog table name. Default: `products`.
    pub products_table: String,

    /// Gemini API key. `None` runs the embedder in stub mode and disables OCR.
    pub gemini_api_key: Option<String>,

    /// Gemini REST base URL.
    pub gemini_base_url: String,

    /// Embedding model name. Default: `text-embedding-004`.
    pub embedding_model: String,

    /// Vision model used for order-sheet OCR.
    pub vision_model: String,

    /// Upper bound for any single call to Gemini or the catalog. Default: 30s.
    pub request_timeout: Duration,

    /// Mentions matched in parallel per request. Default: `4`.
    pub match_concurrency: usize,

    /// Delay between consecutive backfill embedding requests. Default: 500ms.
    pub backfill_delay: Duration,

    /// Largest accepted upload. Default: 10 MiB.
    pub max_image_bytes: usize,

    /// Query embedding cache entries (0 disables). Default: `1024`.
    pub query_cache_capacity: u64,
}

/// Default Postgres URL used when `SHEETMATCH_DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "postgres://postgres@localhost:5432/webocr";

/// Default Gemini REST endpoint.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default per-call timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default backfill pacing in milliseconds.
pub const DEFAULT_BACKFILL_DELAY_MS: u64 = 500;

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            products_table: "products".to_string(),
            gemini_api_key: None,
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            match_concurrency: 4,
            backfill_delay: Duration::from_millis(DEFAULT_BACKFILL_DELAY_MS),
            max_image_bytes: 10 * 1024 * 1024,
            query_cache_capacity: 1024,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("bind_addr", &self.bind_addr)
            .field("products_table", &self.products_table)
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_base_url", &self.gemini_base_url)
            .field("embedding_model", &self.embedding_model)
            .field("vision_model", &self.vision_model)
            .field("request_timeout", &self.request_timeout)
            .field("match_concurrency", &self.match_concurrency)
            .field("backfill_delay", &self.backfill_delay)
            .field("max_image_bytes", &self.max_image_bytes)
            .field("query_cache_capacity", &self.query_cache_capacity)
            .finish_non_exhaustive()
    }
}

impl Config {
    const ENV_PORT: &'static str = "SHEETMATCH_PORT";
    const ENV_BIND_ADDR: &'static str = "SHEETMATCH_BIND_ADDR";
    const ENV_DATABASE_URL: &'static str = "SHEETMATCH_DATABASE_URL";
    const ENV_PRODUCTS_TABLE: &'static str = "SHEETMATCH_PRODUCTS_TABLE";
    const ENV_GEMINI_API_KEY: &'static str = "GEMINI_API_KEY";
    const ENV_GEMINI_BASE_URL: &'static str = "SHEETMATCH_GEMINI_BASE_URL";
    const ENV_EMBEDDING_MODEL: &'static str = "SHEETMATCH_EMBEDDING_MODEL";
    const ENV_VISION_MODEL: &'static str = "SHEETMATCH_VISION_MODEL";
    const ENV_REQUEST_TIMEOUT_SECS: &'static str = "SHEETMATCH_REQUEST_TIMEOUT_SECS";
    const ENV_MATCH_CONCURRENCY: &'static str = "SHEETMATCH_MATCH_CONCURRENCY";
    const ENV_BACKFILL_DELAY_MS: &'static str = "SHEETMATCH_BACKFILL_DELAY_MS";
    const ENV_MAX_IMAGE_BYTES: &'static str = "SHEETMATCH_MAX_IMAGE_BYTES";
    const ENV_QUERY_CACHE_CAPACITY: &'static str = "SHEETMATCH_QUERY_CACHE_CAPACITY";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let database_url = Self::parse_string_from_env(Self::ENV_DATABASE_URL, defaults.database_url);
        let products_table =
            Self::parse_string_from_env(Self::ENV_PRODUCTS_TABLE, defaults.products_table);
        let gemini_api_key = Self::parse_optional_string_from_env(Self::ENV_GEMINI_API_KEY);
        let gemini_base_url =
            Self::parse_string_from_env(Self::ENV_GEMINI_BASE_URL, defaults.gemini_base_url);
        let embedding_model =
            Self::parse_string_from_env(Self::ENV_EMBEDDING_MODEL, defaults.embedding_model);
        let vision_model = Self::parse_string_from_env(Self::ENV_VISION_MODEL, defaults.vision_model);
        let request_timeout = Duration::from_secs(Self::parse_u64_from_env(
            Self::ENV_REQUEST_TIMEOUT_SECS,
            defaults.request_timeout.as_secs(),
        )?);
        let match_concurrency = Self::parse_u64_from_env(
            Self::ENV_MATCH_CONCURRENCY,
            defaults.match_concurrency as u64,
        )? as usize;
        let backfill_delay = Duration::from_millis(Self::parse_u64_from_env(
            Self::ENV_BACKFILL_DELAY_MS,
            defaults.backfill_delay.as_millis() as u64,
        )?);
        let max_image_bytes = Self::parse_u64_from_env(
            Self::ENV_MAX_IMAGE_BYTES,
            defaults.max_image_bytes as u64,
        )? as usize;
        let query_cache_capacity = Self::parse_u64_from_env(
            Self::ENV_QUERY_CACHE_CAPACITY,
            defaults.query_cache_capacity,
        )?;

        Ok(Self {
            port,
            bind_addr,
            database_url,
            products_table,
            gemini_api_key,
            gemini_base_url,
            embedding_model,
            vision_model,
            request_timeout,
            match_concurrency,
            backfill_delay,
            max_image_bytes,
            query_cache_capacity,
        })
    }

    /// Validates basic invariants (does not contact any service).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.match_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_MATCH_CONCURRENCY,
                reason: "must be at least 1".to_string(),
            });
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_REQUEST_TIMEOUT_SECS,
                reason: "must be at least 1 second".to_string(),
            });
        }

        if !is_plain_identifier(&self.products_table) {
            return Err(ConfigError::InvalidTableName {
                value: self.products_table.clone(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Returns `true` if a Gemini key is configured.
    pub fn has_gemini_key(&self) -> bool {
        self.gemini_api_key.is_some()
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_u64_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::NumberParseError {
                    name: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }
}

/// `true` for names made of ASCII letters, digits and `_` that do not start with a digit.
pub(crate) fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
