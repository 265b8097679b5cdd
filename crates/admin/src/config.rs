//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_API_KEY` - Shopify app API key (OAuth client ID)
//! - `SHOPIFY_API_SECRET` - Shopify app API secret (OAuth client secret)
//! - `SCOPES` - Comma-separated access scopes (e.g., `read_products`)
//! - `SHOPIFY_APP_URL` - Public base URL of this app (OAuth redirect target)
//!
//! ## Optional
//! - `SHOP_CUSTOM_DOMAIN` - Custom shop domain overriding the one supplied
//!   at install time
//! - `SHOPIFY_API_VERSION` - Admin API version (default: 2024-10)
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3000)
//! - `PRODUCT_LIMIT` - Max products fetched per page load (default: 50)
//! - `SURFACE_FETCH_ERRORS` - When set to `true`/`1`, product fetch failures
//!   return 502 instead of rendering an empty listing
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sample rates (0.0-1.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const DEFAULT_API_VERSION: &str = "2024-10";
const DEFAULT_PRODUCT_LIMIT: i64 = 50;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive).
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Shopify app configuration.
    pub shopify: ShopifyConfig,
    /// Surface product fetch failures as 502 instead of an empty listing.
    ///
    /// Off by default to match the historical behavior, which silently
    /// rendered "no products" on any fetch failure.
    pub surface_fetch_errors: bool,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production").
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0).
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate (0.0 to 1.0).
    pub sentry_traces_sample_rate: f32,
}

/// Shopify app (OAuth client) configuration.
///
/// Implements `Debug` manually to redact the API secret.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// App API key (OAuth client ID).
    pub api_key: String,
    /// App API secret (OAuth client secret, also used for HMAC verification).
    pub api_secret: SecretString,
    /// Access scopes requested at install time.
    pub scopes: Vec<String>,
    /// Public base URL of the app, used to build the OAuth redirect URI.
    pub app_url: String,
    /// Custom shop domain, overriding the shop supplied at install time.
    pub custom_shop_domain: Option<String>,
    /// Admin API version (e.g., 2024-10).
    pub api_version: String,
    /// Max products fetched per page load (first page only, no pagination).
    pub product_limit: i64,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .field("app_url", &self.app_url)
            .field("custom_shop_domain", &self.custom_shop_domain)
            .field("api_version", &self.api_version)
            .field("product_limit", &self.product_limit)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API secret fails validation (placeholder detection, entropy).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ADMIN_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;

        let shopify = ShopifyConfig::from_env()?;

        let surface_fetch_errors = get_optional_env("SURFACE_FETCH_ERRORS")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            shopify,
            surface_fetch_errors,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ShopifyConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let scopes = get_required_env("SCOPES")?
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();
        if scopes.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "SCOPES".to_string(),
                "must contain at least one scope".to_string(),
            ));
        }

        let product_limit = get_env_or_default("PRODUCT_LIMIT", "50")
            .parse::<i64>()
            .map_err(|e| ConfigError::InvalidEnvVar("PRODUCT_LIMIT".to_string(), e.to_string()))?;
        if product_limit <= 0 {
            return Err(ConfigError::InvalidEnvVar(
                "PRODUCT_LIMIT".to_string(),
                "must be positive".to_string(),
            ));
        }

        Ok(Self {
            api_key: get_required_env("SHOPIFY_API_KEY")?,
            api_secret: get_validated_secret("SHOPIFY_API_SECRET")?,
            scopes,
            app_url: get_required_env("SHOPIFY_APP_URL")?,
            custom_shop_domain: get_optional_env("SHOP_CUSTOM_DOMAIN"),
            api_version: get_env_or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
            product_limit,
        })
    }

    /// Returns the OAuth redirect URI for the install callback.
    #[must_use]
    pub fn redirect_uri(&self) -> String {
        format!("{}/auth/callback", self.app_url.trim_end_matches('/'))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real Shopify API secrets are random hex and have high entropy
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
