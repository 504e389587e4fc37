//! Shopify Storefront API client implementation.
//!
//! Sends `graphql_client` request envelopes with `reqwest` 0.13. Responses of
//! cacheable requests are kept in a `moka` cache keyed by operation and
//! variables, and dropped by tag on revalidation.

mod cache;
pub mod conversions;
pub mod fragments;
pub mod queries;

use std::sync::Arc;

use chrono::Utc;
use graphql_client::{GraphQLQuery, Response};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{Span, debug, error, info, instrument};
use url::Url;
use vitrina_core::{CartId, CartLineId, CurrencyCode, ProductId};

use crate::config::ShopifyConfig;
use crate::shopify::types::{
    Cart, CartLineInput, CartLineUpdateInput, Collection, Menu, Product,
    ProductCollectionSortKey, ProductSortKey,
};
use crate::shopify::{GraphQLError, ShopifyError, truncate};

pub use cache::{CachePolicy, CacheTag, UnknownCacheTag};
use cache::{CachedResponse, ResponseCache};
use conversions::{
    all_collection, filter_products, reshape_cart, reshape_collection, reshape_collections,
    reshape_menu, reshape_product, reshape_products,
};
use queries::{
    AddToCart, CartMutation, CreateCart, EditCartItems, GetCart, GetCollection,
    GetCollectionProducts, GetCollections, GetMenu, GetProduct, GetProductRecommendations,
    GetProducts, RemoveFromCart, add_to_cart, create_cart, edit_cart_items, get_cart,
    get_collection, get_collection_products, get_collections, get_menu, get_product,
    get_product_recommendations, get_products, remove_from_cart,
};

/// Header carrying the Storefront API access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

// =============================================================================
// Request / Response
// =============================================================================

/// One GraphQL call: variables plus caching instructions.
pub struct StorefrontRequest<Q: GraphQLQuery> {
    variables: Q::Variables,
    cache: CachePolicy,
    tags: &'static [CacheTag],
}

impl<Q: GraphQLQuery> StorefrontRequest<Q> {
    /// A cacheable request without tags.
    #[must_use]
    pub const fn new(variables: Q::Variables) -> Self {
        Self {
            variables,
            cache: CachePolicy::ForceCache,
            tags: &[],
        }
    }

    /// Tags under which a cached response can be revalidated.
    #[must_use]
    pub const fn tags(mut self, tags: &'static [CacheTag]) -> Self {
        self.tags = tags;
        self
    }

    /// Bypass the cache for this request.
    #[must_use]
    pub const fn no_cache(mut self) -> Self {
        self.cache = CachePolicy::NoCache;
        self
    }
}

/// A successful response: HTTP status and the typed `data` payload.
#[derive(Debug, Clone)]
pub struct StorefrontResponse<T> {
    pub status: u16,
    pub body: T,
}

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Cheap to clone; clones share one connection pool and one response cache.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: Url,
    domain: String,
    access_token: SecretString,
    hidden_product_tag: String,
    hidden_collection_prefix: String,
    fallback_currency: CurrencyCode,
    cache: ResponseCache,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Client` if the HTTP client cannot be built.
    pub fn new(config: &ShopifyConfig) -> Result<Self, ShopifyError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ShopifyError::Client)?;

        Ok(Self {
            inner: Arc::new(StorefrontClientInner {
                client,
                endpoint: config.endpoint.clone(),
                domain: config.domain.clone(),
                access_token: config.access_token.clone(),
                hidden_product_tag: config.hidden_product_tag.clone(),
                hidden_collection_prefix: config.hidden_collection_prefix.clone(),
                fallback_currency: config.fallback_currency,
                cache: ResponseCache::new(config.cache_ttl),
            }),
        })
    }

    /// Execute a GraphQL operation.
    ///
    /// Cacheable requests are answered from the cache when an entry exists
    /// for the same operation and variables. Only successful bodies are
    /// stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, Shopify answers with a
    /// non-success status, the body cannot be decoded, or the body carries
    /// GraphQL errors (the first one is returned).
    #[instrument(skip_all, fields(operation = tracing::field::Empty))]
    pub async fn execute<Q: GraphQLQuery>(
        &self,
        request: StorefrontRequest<Q>,
    ) -> Result<StorefrontResponse<Q::ResponseData>, ShopifyError> {
        let body = Q::build_query(request.variables);
        let query = body.query;
        let operation = body.operation_name;
        Span::current().record("operation", operation);

        let cache_key = match request.cache {
            CachePolicy::ForceCache => {
                let variables = serde_json::to_string(&body.variables)
                    .map_err(|source| ShopifyError::Parse { source, query })?;
                let key = ResponseCache::key(operation, &variables);

                if let Some(cached) = self.inner.cache.get(&key).await {
                    debug!("Cache hit");
                    return Ok(StorefrontResponse {
                        status: cached.status,
                        body: parse_body(&cached.body, query)?,
                    });
                }
                Some((key, self.inner.cache.generation(request.tags)))
            }
            CachePolicy::NoCache => None,
        };

        let response = self
            .inner
            .client
            .post(self.inner.endpoint.as_str())
            .header(ACCESS_TOKEN_HEADER, self.inner.access_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|source| ShopifyError::Http { source, query })?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited { retry_after, query });
        }

        // Get response body as text first for better error diagnostics
        let text = response
            .text()
            .await
            .map_err(|source| ShopifyError::Http { source, query })?;

        if !status.is_success() {
            error!(
                status = %status,
                body = %truncate(&text, 500),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::Status {
                status: status.as_u16(),
                body: text,
                query,
            });
        }

        let data = parse_body(&text, query)?;

        if let Some((key, started)) = cache_key {
            let stored = self
                .inner
                .cache
                .insert(
                    key,
                    CachedResponse {
                        status: status.as_u16(),
                        body: Arc::from(text),
                        tags: Arc::from(request.tags),
                    },
                    started,
                )
                .await;
            if !stored {
                debug!("Tags revalidated in flight, response not cached");
            }
        }

        Ok(StorefrontResponse {
            status: status.as_u16(),
            body: data,
        })
    }

    /// Drop every cached response carrying any of `tags`.
    #[instrument(skip(self))]
    pub fn revalidate(&self, tags: &[CacheTag]) {
        self.inner.cache.revalidate(tags);
        debug!("Cache revalidated");
    }

    // =========================================================================
    // Menu
    // =========================================================================

    /// Get a navigation menu. A missing menu yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_menu(&self, handle: &str) -> Result<Vec<Menu>, ShopifyError> {
        let request = StorefrontRequest::<GetMenu>::new(get_menu::Variables {
            handle: handle.to_string(),
        })
        .tags(&[CacheTag::Collections]);

        let response = self.execute(request).await?;

        Ok(response
            .body
            .menu
            .map(|menu| reshape_menu(menu.items, &self.inner.domain))
            .unwrap_or_default())
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Search and list products. Hidden products are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(
        &self,
        query: Option<&str>,
        sort_key: ProductSortKey,
        reverse: bool,
    ) -> Result<Vec<Product>, ShopifyError> {
        let request = StorefrontRequest::<GetProducts>::new(get_products::Variables {
            query: query.map(String::from),
            reverse,
            sort_key,
        })
        .tags(&[CacheTag::Products]);

        let response = self.execute(request).await?;

        Ok(reshape_products(
            conversions::remove_edges_and_nodes(response.body.products),
            &self.inner.hidden_product_tag,
        ))
    }

    /// Get a product by its handle, hidden or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_product(&self, handle: &str) -> Result<Option<Product>, ShopifyError> {
        let request = StorefrontRequest::<GetProduct>::new(get_product::Variables {
            handle: handle.to_string(),
        })
        .tags(&[CacheTag::Products]);

        let response = self.execute(request).await?;

        Ok(response
            .body
            .product
            .and_then(|product| reshape_product(product, None)))
    }

    /// Get products Shopify recommends alongside `product_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product_recommendations(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<Product>, ShopifyError> {
        let request = StorefrontRequest::<GetProductRecommendations>::new(
            get_product_recommendations::Variables {
                product_id: product_id.clone(),
            },
        )
        .tags(&[CacheTag::Products]);

        let response = self.execute(request).await?;

        Ok(reshape_products(
            response.body.product_recommendations.unwrap_or_default(),
            &self.inner.hidden_product_tag,
        ))
    }

    // =========================================================================
    // Collection Methods
    // =========================================================================

    /// List collections: the synthetic "All" collection first, then the
    /// first 100 by title without hidden ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_collections(&self) -> Result<Vec<Collection>, ShopifyError> {
        let request =
            StorefrontRequest::<GetCollections>::new(get_collections::Variables::default())
                .tags(&[CacheTag::Collections]);

        let response = self.execute(request).await?;

        let mut collections = vec![all_collection(Utc::now())];
        collections.extend(reshape_collections(
            conversions::remove_edges_and_nodes(response.body.collections),
            &self.inner.hidden_collection_prefix,
        ));

        Ok(collections)
    }

    /// Get a collection by its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_collection(&self, handle: &str) -> Result<Option<Collection>, ShopifyError> {
        let request = StorefrontRequest::<GetCollection>::new(get_collection::Variables {
            handle: handle.to_string(),
        })
        .tags(&[CacheTag::Collections]);

        let response = self.execute(request).await?;

        Ok(response.body.collection.map(reshape_collection))
    }

    /// List the products of a collection, optionally narrowed by a
    /// case-insensitive substring `query`. A missing collection yields an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn get_collection_products(
        &self,
        handle: &str,
        sort_key: ProductSortKey,
        reverse: bool,
        query: Option<&str>,
    ) -> Result<Vec<Product>, ShopifyError> {
        let request =
            StorefrontRequest::<GetCollectionProducts>::new(get_collection_products::Variables {
                handle: handle.to_string(),
                reverse,
                sort_key: ProductCollectionSortKey::from(sort_key),
            })
            .tags(&[CacheTag::Collections, CacheTag::Products]);

        let response = self.execute(request).await?;

        let Some(collection) = response.body.collection else {
            info!("No collection found");
            return Ok(Vec::new());
        };

        let products = reshape_products(
            conversions::remove_edges_and_nodes(collection.products),
            &self.inner.hidden_product_tag,
        );

        Ok(filter_products(products, query))
    }

    // =========================================================================
    // Cart Methods
    // =========================================================================

    /// Get a cart. Absent IDs and carts Shopify no longer knows (checked-out
    /// carts become null) yield `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_cart(&self, cart_id: Option<&CartId>) -> Result<Option<Cart>, ShopifyError> {
        self.fetch_cart(cart_id, CachePolicy::ForceCache).await
    }

    /// Get a cart straight from Shopify, bypassing the response cache.
    ///
    /// Used before mutating, where a cached copy of a cart that has since
    /// been checked out would send the mutation to a dead cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_cart_uncached(
        &self,
        cart_id: Option<&CartId>,
    ) -> Result<Option<Cart>, ShopifyError> {
        self.fetch_cart(cart_id, CachePolicy::NoCache).await
    }

    async fn fetch_cart(
        &self,
        cart_id: Option<&CartId>,
        policy: CachePolicy,
    ) -> Result<Option<Cart>, ShopifyError> {
        let Some(cart_id) = cart_id else {
            return Ok(None);
        };

        let mut request = StorefrontRequest::<GetCart>::new(get_cart::Variables {
            cart_id: cart_id.clone(),
        })
        .tags(&[CacheTag::Cart]);
        if policy == CachePolicy::NoCache {
            request = request.no_cache();
        }

        let response = self.execute(request).await?;

        Ok(response
            .body
            .cart
            .map(|cart| reshape_cart(cart, self.inner.fallback_currency)))
    }

    /// Create a cart, optionally with initial lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails or user errors are returned.
    #[instrument(skip(self, lines))]
    pub async fn create_cart(&self, lines: Option<Vec<CartLineInput>>) -> Result<Cart, ShopifyError> {
        self.mutate_cart::<CreateCart>(create_cart::Variables { line_items: lines })
            .await
    }

    /// Add lines to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn add_to_cart(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, ShopifyError> {
        self.mutate_cart::<AddToCart>(add_to_cart::Variables {
            cart_id: cart_id.clone(),
            lines,
        })
        .await
    }

    /// Change quantities of existing cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn update_cart(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<Cart, ShopifyError> {
        self.mutate_cart::<EditCartItems>(edit_cart_items::Variables {
            cart_id: cart_id.clone(),
            lines,
        })
        .await
    }

    /// Remove lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation fails or user errors are returned.
    #[instrument(skip(self, line_ids), fields(cart_id = %cart_id))]
    pub async fn remove_from_cart(
        &self,
        cart_id: &CartId,
        line_ids: Vec<CartLineId>,
    ) -> Result<Cart, ShopifyError> {
        self.mutate_cart::<RemoveFromCart>(remove_from_cart::Variables {
            cart_id: cart_id.clone(),
            line_ids,
        })
        .await
    }

    /// Run a cart mutation once, uncached, and revalidate cached carts on
    /// success.
    async fn mutate_cart<M: CartMutation>(
        &self,
        variables: M::Variables,
    ) -> Result<Cart, ShopifyError> {
        let response = self
            .execute(StorefrontRequest::<M>::new(variables).no_cache())
            .await?;

        let payload = M::payload(response.body)
            .ok_or_else(|| ShopifyError::NotFound("cart mutation payload".to_string()))?;

        if !payload.user_errors.is_empty() {
            return Err(ShopifyError::UserError(
                payload
                    .user_errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; "),
            ));
        }

        let cart = payload
            .cart
            .ok_or_else(|| ShopifyError::NotFound("cart in mutation payload".to_string()))?;

        self.revalidate(&[CacheTag::Cart]);

        Ok(reshape_cart(cart, self.inner.fallback_currency))
    }
}

/// Decode a GraphQL response body into its `data` payload.
fn parse_body<T: DeserializeOwned>(text: &str, query: &'static str) -> Result<T, ShopifyError> {
    let response: Response<T> = serde_json::from_str(text).map_err(|source| {
        error!(
            error = %source,
            body = %truncate(text, 500),
            "Failed to parse Shopify GraphQL response"
        );
        ShopifyError::Parse { source, query }
    })?;

    if let Some(first) = response.errors.and_then(|errors| errors.into_iter().next()) {
        debug!(error = ?first, "GraphQL errors in response");
        return Err(ShopifyError::GraphQL {
            error: GraphQLError::from(first),
            query,
        });
    }

    response.data.ok_or_else(|| {
        error!(
            body = %truncate(text, 500),
            "Shopify GraphQL response has no data and no errors"
        );
        ShopifyError::GraphQL {
            error: GraphQLError {
                message: "No data in response".to_string(),
                locations: vec![],
                path: vec![],
            },
            query,
        }
    })
}
