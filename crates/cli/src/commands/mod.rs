//! CLI command implementations.

pub mod cart;
pub mod catalog;

use serde::Serialize;
use thiserror::Error;
use vitrina_storefront::config::{ConfigError, ShopifyConfig};
use vitrina_storefront::shopify::{ShopifyError, StorefrontClient};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Shopify settings are missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The Storefront API call failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// The result could not be printed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Nothing matched the lookup.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Build a Storefront client from the environment.
///
/// # Errors
///
/// Returns an error if configuration is missing or the client cannot be built.
pub fn client() -> Result<StorefrontClient, CliError> {
    let config = ShopifyConfig::from_env()?;
    Ok(StorefrontClient::new(&config)?)
}

/// Print a value as pretty JSON on stdout.
#[allow(clippy::print_stdout)]
pub fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
