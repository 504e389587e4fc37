//! Shopify Storefront API client.
//!
//! # Architecture
//!
//! - Hand-written GraphQL documents sent through `graphql_client` envelopes
//! - Shopify is source of truth - NO local persistence, direct API calls
//! - In-memory response cache via `moka`, invalidated by cache tags
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrina_storefront::shopify::{CartLineInput, StorefrontClient};
//!
//! let client = StorefrontClient::new(&config.shopify)?;
//!
//! // Get a product
//! let product = client.get_product("bolsa-kraft").await?;
//!
//! // Create a cart and add items
//! let cart = client.create_cart(None).await?;
//! let cart = client.add_to_cart(&cart.id, vec![CartLineInput {
//!     merchandise_id: product.variants[0].id.clone(),
//!     quantity: 1,
//! }]).await?;
//! ```

pub mod storefront;
pub mod types;

pub use storefront::{
    CachePolicy, CacheTag, StorefrontClient, StorefrontRequest, StorefrontResponse,
};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with the Storefront API.
///
/// Variants produced by a request carry the GraphQL document that was sent,
/// available through [`ShopifyError::query`].
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),

    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {source}")]
    Http {
        #[source]
        source: reqwest::Error,
        query: &'static str,
    },

    /// Shopify answered with a non-success status code.
    #[error("HTTP {status}: {}", truncate(.body, 200))]
    Status {
        status: u16,
        body: String,
        query: &'static str,
    },

    /// GraphQL query returned errors. Only the first one is kept.
    #[error("GraphQL error: {error}")]
    GraphQL {
        error: GraphQLError,
        query: &'static str,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
        query: &'static str,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimited {
        retry_after: u64,
        query: &'static str,
    },

    /// User error from mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),
}

impl ShopifyError {
    /// The GraphQL document whose request produced this error.
    #[must_use]
    pub const fn query(&self) -> Option<&'static str> {
        match self {
            Self::Http { query, .. }
            | Self::Status { query, .. }
            | Self::GraphQL { query, .. }
            | Self::Parse { query, .. }
            | Self::RateLimited { query, .. } => Some(*query),
            Self::Client(_) | Self::NotFound(_) | Self::UserError(_) => None,
        }
    }
}

/// A GraphQL error returned by the Shopify API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

impl From<graphql_client::Error> for GraphQLError {
    fn from(e: graphql_client::Error) -> Self {
        Self {
            message: e.message,
            locations: e.locations.map_or_else(Vec::new, |locs| {
                locs.into_iter()
                    .map(|l| GraphQLErrorLocation {
                        line: i64::from(l.line),
                        column: i64::from(l.column),
                    })
                    .collect()
            }),
            path: e.path.map_or_else(Vec::new, |p| {
                p.into_iter()
                    .map(|fragment| match fragment {
                        graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                        graphql_client::PathFragment::Index(i) => {
                            serde_json::Value::Number(i.into())
                        }
                    })
                    .collect()
            }),
        }
    }
}

impl std::fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();

        if !self.message.is_empty() {
            parts.push(self.message.clone());
        }

        if !self.path.is_empty() {
            let path_str = self
                .path
                .iter()
                .map(|p| match p {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(".");
            parts.push(format!("path: {path_str}"));
        }

        if let Some(loc) = self.locations.first() {
            parts.push(format!("at line {}:{}", loc.line, loc.column));
        }

        if parts.is_empty() {
            f.write_str("(no details)")
        } else {
            f.write_str(&parts.join(" "))
        }
    }
}

/// First `max` characters of `s`, for logs and error messages.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUERY: &str = "query getMenu { menu { items { title } } }";

    #[test]
    fn test_shopify_error_display() {
        let err = ShopifyError::NotFound("cart payload".to_string());
        assert_eq!(err.to_string(), "Not found: cart payload");
    }

    #[test]
    fn test_graphql_error_formatting() {
        let err = ShopifyError::GraphQL {
            error: GraphQLError {
                message: "Field 'menuz' doesn't exist on type 'QueryRoot'".to_string(),
                locations: vec![],
                path: vec![],
            },
            query: QUERY,
        };
        assert_eq!(
            err.to_string(),
            "GraphQL error: Field 'menuz' doesn't exist on type 'QueryRoot'"
        );
        assert_eq!(err.query(), Some(QUERY));
    }

    #[test]
    fn test_graphql_error_path_and_location() {
        let error = GraphQLError {
            message: String::new(),
            locations: vec![GraphQLErrorLocation { line: 5, column: 10 }],
            path: vec![
                serde_json::Value::String("products".to_string()),
                serde_json::Value::Number(0.into()),
            ],
        };
        assert_eq!(error.to_string(), "path: products.0 at line 5:10");
    }

    #[test]
    fn test_graphql_error_no_details() {
        let error = GraphQLError {
            message: String::new(),
            locations: vec![],
            path: vec![],
        };
        assert_eq!(error.to_string(), "(no details)");
    }

    #[test]
    fn test_status_error_truncates_body() {
        let err = ShopifyError::Status {
            status: 503,
            body: "x".repeat(1000),
            query: QUERY,
        };
        assert_eq!(err.to_string().len(), "HTTP 503: ".len() + 200);
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ShopifyError::RateLimited {
            retry_after: 60,
            query: QUERY,
        };
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
        assert_eq!(err.query(), Some(QUERY));
    }
}
