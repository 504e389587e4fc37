//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Liveness check
//! GET  /api/site                            - Site identity
//! GET  /api/menu/{handle}                   - Navigation menu
//!
//! # Products
//! GET  /api/products?q=&sort=               - Product search
//! GET  /api/products/{handle}               - Product detail
//! GET  /api/recommendations?product_id=     - Related products
//!
//! # Collections
//! GET  /api/collections                     - Collection listing ("All" first)
//! GET  /api/collections/{handle}            - Collection detail
//! GET  /api/collections/{handle}/products   - Collection products (?q=&sort=)
//!
//! # Cart (cookie `cartId`)
//! GET  /api/cart                            - Current cart or null
//! POST /api/cart/items                      - Add item, sets cookie
//! POST /api/cart/items/update               - Change quantity (0 removes)
//! POST /api/cart/items/remove               - Remove item
//!
//! # Webhooks
//! POST /api/revalidate?secret=              - Shopify cache revalidation
//! ```

pub mod cart;
pub mod collections;
pub mod menu;
pub mod products;
pub mod revalidate;
pub mod site;

use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, header},
    middleware,
    routing::{get, post},
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Product routes.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{handle}", get(products::show))
}

/// Collection routes.
pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(collections::index))
        .route("/{handle}", get(collections::show))
        .route("/{handle}/products", get(collections::products))
}

/// Cart routes.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", post(cart::add))
        .route("/items/update", post(cart::update))
        .route("/items/remove", post(cart::remove))
}

/// All JSON API routes, to be nested under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/site", get(site::show))
        .route("/menu/{handle}", get(menu::show))
        .nest("/products", product_routes())
        .route("/recommendations", get(products::recommendations))
        .nest("/collections", collection_routes())
        .nest("/cart", cart_routes())
        .route("/revalidate", post(revalidate::revalidate))
}

/// Build the application router with tracing and request-id middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(site::health))
        .nest("/api", api_routes())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}
