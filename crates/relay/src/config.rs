//! Relay configuration loaded from environment variables.
//!
//! Configuration is read once at startup and handed to the router through
//! [`AppState`](crate::state::AppState). Nothing below the router reads the
//! process environment.
//!
//! # Environment Variables
//!
//! ## Credentials (checked on every request, not at startup)
//! - `SHOPIFY_STORE_DOMAIN` - Shopify store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_ACCESS_TOKEN` - Shopify Admin API access token (HIGH PRIVILEGE)
//! - `GEMINI_API_KEY` - Google Gemini API key
//!
//! ## Optional
//! - `RELAY_HOST` - Bind address (default: 127.0.0.1)
//! - `RELAY_PORT` - Listen port (default: 8888)
//! - `SHOPIFY_API_VERSION` - REST API version (default: 2024-07)
//! - `SHOPIFY_API_BASE_URL` - Replaces `https://{store}` (proxies, tests)
//! - `GEMINI_MODEL` - Gemini model ID (default: gemini-1.5-flash)
//! - `GEMINI_API_BASE_URL` - Gemini API origin (default: Google's public endpoint)
//! - `UPSTREAM_TIMEOUT_SECS` - Per-call timeout for outbound requests (default: 60)
//! - `CORS_ALLOWED_ORIGIN` - Restrict CORS to one dashboard origin (default: any)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

pub const SHOPIFY_STORE_DOMAIN: &str = "SHOPIFY_STORE_DOMAIN";
pub const SHOPIFY_ACCESS_TOKEN: &str = "SHOPIFY_ACCESS_TOKEN";
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

const DEFAULT_SHOPIFY_API_VERSION: &str = "2024-07";
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// One or more request-time credentials are not configured.
///
/// Holds the environment variable names of the missing credentials only,
/// in a fixed order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing required configuration: {}", .0.join(", "))]
pub struct MissingCredentials(pub Vec<&'static str>);

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Relay application configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopify Admin REST API configuration
    pub shopify: ShopifyConfig,
    /// Gemini API configuration
    pub gemini: GeminiConfig,
    /// Timeout applied to each outbound HTTP call
    pub upstream_timeout: Duration,
    /// Allowed CORS origin (any origin when unset)
    pub cors_allowed_origin: Option<String>,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Shopify Admin REST API configuration.
///
/// Implements `Debug` manually to redact the HIGH PRIVILEGE access token.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Store domain as configured (may still carry a scheme)
    pub store_domain: Option<String>,
    /// Admin API access token (HIGH PRIVILEGE - full store access)
    pub access_token: Option<SecretString>,
    /// REST API version (e.g., 2024-07)
    pub api_version: String,
    /// Origin override used instead of `https://{store_domain}`
    pub base_url: Option<String>,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("store_domain", &self.store_domain)
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("api_version", &self.api_version)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Gemini API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeminiConfig {
    /// Gemini API key
    pub api_key: Option<SecretString>,
    /// Model ID (e.g., gemini-1.5-flash)
    pub model: String,
    /// API origin
    pub base_url: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Borrowed view of the three request-time credentials, all present.
#[derive(Clone, Copy)]
pub struct Credentials<'a> {
    pub store_domain: &'a str,
    pub access_token: &'a SecretString,
    pub gemini_api_key: &'a SecretString,
}

impl RelayConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    /// Missing credentials are not an error here; they are reported per
    /// request by [`RelayConfig::credentials`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an optional variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an optional variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let host = env
            .or_default("RELAY_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("RELAY_HOST".to_string(), e.to_string()))?;
        let port = env
            .or_default("RELAY_PORT", "8888")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("RELAY_PORT".to_string(), e.to_string()))?;
        let timeout_secs = env.parsed_or("UPSTREAM_TIMEOUT_SECS", DEFAULT_UPSTREAM_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "UPSTREAM_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let shopify = ShopifyConfig {
            store_domain: env.optional(SHOPIFY_STORE_DOMAIN),
            access_token: env.secret(SHOPIFY_ACCESS_TOKEN),
            api_version: env.or_default("SHOPIFY_API_VERSION", DEFAULT_SHOPIFY_API_VERSION),
            base_url: env.optional("SHOPIFY_API_BASE_URL"),
        };
        let gemini = GeminiConfig {
            api_key: env.secret(GEMINI_API_KEY),
            model: env.or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            base_url: env.or_default("GEMINI_API_BASE_URL", DEFAULT_GEMINI_BASE_URL),
        };

        let log_format = match env.optional("LOG_FORMAT").as_deref() {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            host,
            port,
            shopify,
            gemini,
            upstream_timeout: Duration::from_secs(timeout_secs),
            cors_allowed_origin: env.optional("CORS_ALLOWED_ORIGIN"),
            log_format,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parsed_or("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: env.parsed_or("SENTRY_TRACES_SAMPLE_RATE", 1.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Log a warning for each configured secret that looks like a placeholder.
    ///
    /// Called after the tracing subscriber is installed.
    pub fn warn_on_placeholder_secrets(&self) {
        let secrets = [
            (SHOPIFY_ACCESS_TOKEN, self.shopify.access_token.as_ref()),
            (GEMINI_API_KEY, self.gemini.api_key.as_ref()),
        ];
        for (key, secret) in secrets {
            if let Some(pattern) = secret.and_then(|s| placeholder_pattern(s.expose_secret())) {
                tracing::warn!("{key} appears to be a placeholder (contains '{pattern}')");
            }
        }
    }

    /// Returns the request-time credentials, or the names of the missing ones.
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` listing exactly the absent variables.
    pub fn credentials(&self) -> Result<Credentials<'_>, MissingCredentials> {
        match (
            self.shopify.store_domain.as_deref(),
            self.shopify.access_token.as_ref(),
            self.gemini.api_key.as_ref(),
        ) {
            (Some(store_domain), Some(access_token), Some(gemini_api_key)) => Ok(Credentials {
                store_domain,
                access_token,
                gemini_api_key,
            }),
            (store_domain, access_token, gemini_api_key) => {
                let missing = [
                    (SHOPIFY_STORE_DOMAIN, store_domain.is_none()),
                    (SHOPIFY_ACCESS_TOKEN, access_token.is_none()),
                    (GEMINI_API_KEY, gemini_api_key.is_none()),
                ]
                .into_iter()
                .filter_map(|(key, absent)| absent.then_some(key))
                .collect();
                Err(MissingCredentials(missing))
            }
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Environment lookup with blank values treated as unset.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, using `default` when unset.
    fn parsed_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    /// Get an optional secret.
    fn secret(&self, key: &str) -> Option<SecretString> {
        self.optional(key).map(SecretString::from)
    }
}

/// Return the first placeholder pattern found in a secret, if any.
fn placeholder_pattern(secret: &str) -> Option<&'static str> {
    let lower = secret.to_lowercase();
    PLACEHOLDER_PATTERNS
        .iter()
        .copied()
        .find(|pattern| lower.contains(pattern))
}
