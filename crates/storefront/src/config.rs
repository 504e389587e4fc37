//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_STORE_DOMAIN` - Shopify store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_API_VERSION` - Storefront API version (e.g., 2025-01)
//! - `SHOPIFY_STOREFRONT_ACCESS_TOKEN` - Storefront API access token
//! - `COMPANY_NAME` - Legal company name shown by the frontend
//! - `SITE_NAME` - Public site name
//! - `NEXT_PUBLIC_GTM_ID` - Google Tag Manager container ID
//!
//! Only the first three are needed by [`ShopifyConfig::from_env`]; the site
//! identity is required by the server ([`StorefrontConfig::from_env`]).
//!
//! ## Optional
//! - `SHOPIFY_STOREFRONT_REVALIDATION_SECRET` - Shared secret for the cache
//!   revalidation webhook (legacy name `SHOPIFY_REVALIDATION_SECRET`)
//! - `SHOPIFY_HIDDEN_PRODUCT_TAG` - Tag hiding products from listings
//!   (default: nextjs-frontend-hidden)
//! - `SHOPIFY_HIDDEN_COLLECTION_PREFIX` - Handle prefix hiding collections
//!   (default: hidden)
//! - `SHOPIFY_FALLBACK_CURRENCY` - Currency for a missing cart tax amount (default: USD)
//! - `SHOPIFY_CACHE_TTL_SECS` - Response cache time-to-live (default: 300)
//! - `SHOPIFY_TIMEOUT_SECS` - Storefront API request timeout (default: 30)
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;
use vitrina_core::CurrencyCode;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

const DEFAULT_HIDDEN_PRODUCT_TAG: &str = "nextjs-frontend-hidden";
const DEFAULT_HIDDEN_COLLECTION_PREFIX: &str = "hidden";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
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

/// Storefront server configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopify Storefront API configuration
    pub shopify: ShopifyConfig,
    /// Public site identity
    pub site: SiteConfig,
    /// Shared secret for the revalidation webhook
    pub revalidation_secret: Option<SecretString>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g., production)
    pub sentry_environment: Option<String>,
}

/// Shopify Storefront API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Store domain including scheme (e.g., `https://your-store.myshopify.com`)
    pub domain: String,
    /// Storefront API version (e.g., 2025-01)
    pub api_version: String,
    /// GraphQL endpoint derived from domain and version
    pub endpoint: Url,
    /// Storefront API access token
    pub access_token: SecretString,
    /// Products carrying this tag are dropped from listings
    pub hidden_product_tag: String,
    /// Collections whose handle starts with this prefix are dropped from listings
    pub hidden_collection_prefix: String,
    /// Currency used when Shopify omits a cart's tax amount
    pub fallback_currency: CurrencyCode,
    /// Time-to-live of cached responses
    pub cache_ttl: Duration,
    /// Timeout for a single Storefront API request
    pub request_timeout: Duration,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("domain", &self.domain)
            .field("api_version", &self.api_version)
            .field("endpoint", &self.endpoint.as_str())
            .field("access_token", &"[REDACTED]")
            .field("hidden_product_tag", &self.hidden_product_tag)
            .field("hidden_collection_prefix", &self.hidden_collection_prefix)
            .field("fallback_currency", &self.fallback_currency)
            .field("cache_ttl", &self.cache_ttl)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Site identity exposed to the frontend.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    /// Legal company name
    pub company_name: String,
    /// Public site name
    pub site_name: String,
    /// Google Tag Manager container ID
    pub gtm_id: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let shopify = ShopifyConfig::from_lookup(&lookup)?;
        let site = SiteConfig::from_lookup(&lookup)?;

        let host = get_env_or_default(&lookup, "STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default(&lookup, "STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;

        let revalidation_secret = get_optional_secret(
            &lookup,
            &[
                "SHOPIFY_STOREFRONT_REVALIDATION_SECRET",
                "SHOPIFY_REVALIDATION_SECRET",
            ],
        )?;

        Ok(Self {
            host,
            port,
            shopify,
            site,
            revalidation_secret,
            sentry_dsn: get_optional_env(&lookup, "SENTRY_DSN"),
            sentry_environment: get_optional_env(&lookup, "SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ShopifyConfig {
    /// Load the Shopify settings alone, for tools that never serve HTTP.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    /// Build the Shopify settings from an arbitrary key lookup.
    ///
    /// The store domain is checked first so a missing domain is always the
    /// reported error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// does not parse.
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let domain = normalize_domain(&get_required_env(lookup, "SHOPIFY_STORE_DOMAIN")?);
        let api_version = get_required_env(lookup, "SHOPIFY_API_VERSION")?;
        let access_token =
            SecretString::from(get_required_env(lookup, "SHOPIFY_STOREFRONT_ACCESS_TOKEN")?);

        let endpoint = Url::parse(&format!("{domain}/api/{api_version}/graphql.json"))
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPIFY_STORE_DOMAIN".to_string(), e.to_string())
            })?;

        let fallback_currency = get_env_or_default(lookup, "SHOPIFY_FALLBACK_CURRENCY", "USD")
            .parse::<CurrencyCode>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPIFY_FALLBACK_CURRENCY".to_string(), e.to_string())
            })?;

        Ok(Self {
            domain,
            api_version,
            endpoint,
            access_token,
            hidden_product_tag: get_env_or_default(
                lookup,
                "SHOPIFY_HIDDEN_PRODUCT_TAG",
                DEFAULT_HIDDEN_PRODUCT_TAG,
            ),
            hidden_collection_prefix: get_env_or_default(
                lookup,
                "SHOPIFY_HIDDEN_COLLECTION_PREFIX",
                DEFAULT_HIDDEN_COLLECTION_PREFIX,
            ),
            fallback_currency,
            cache_ttl: get_duration_secs(lookup, "SHOPIFY_CACHE_TTL_SECS", 300)?,
            request_timeout: get_duration_secs(lookup, "SHOPIFY_TIMEOUT_SECS", 30)?,
        })
    }
}

impl SiteConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            company_name: get_required_env(lookup, "COMPANY_NAME")?,
            site_name: get_required_env(lookup, "SITE_NAME")?,
            gtm_id: get_required_env(lookup, "NEXT_PUBLIC_GTM_ID")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Prepend `https://` unless the domain already carries an http(s) scheme.
fn normalize_domain(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Get a required environment variable. Blank values count as missing.
fn get_required_env(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<String, ConfigError> {
    get_optional_env(lookup, key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Blank values count as unset.
fn get_optional_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> String {
    get_optional_env(lookup, key).unwrap_or_else(|| default.to_string())
}

/// Get a whole number of seconds as a `Duration`.
fn get_duration_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<Duration, ConfigError> {
    get_optional_env(lookup, key).map_or(Ok(Duration::from_secs(default)), |value| {
        value
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
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

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
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

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate the first secret set among `keys`.
fn get_optional_secret(
    lookup: &impl Fn(&str) -> Option<String>,
    keys: &[&str],
) -> Result<Option<SecretString>, ConfigError> {
    for key in keys {
        if let Some(value) = get_optional_env(lookup, key) {
            validate_secret_strength(&value, key)?;
            return Ok(Some(SecretString::from(value)));
        }
    }
    Ok(None)
}
