//! Integration test support for Vitrina.
//!
//! Every test stands up a `wiremock` server playing the Shopify Storefront
//! API, so no real network traffic is made.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vitrina-integration-tests
//! ```

#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;

use serde_json::{Value, json};
use vitrina_storefront::config::{ShopifyConfig, StorefrontConfig};
use vitrina_storefront::shopify::StorefrontClient;
use vitrina_storefront::shopify::storefront::ACCESS_TOKEN_HEADER;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

/// Storefront API version used by every test.
pub const API_VERSION: &str = "2025-01";

/// GraphQL path on the mock server.
pub const API_PATH: &str = "/api/2025-01/graphql.json";

/// Storefront access token accepted by the mocks.
pub const TOKEN: &str = "f3a9c1e7b2d84605a9e1c3b7d5f20486";

/// Revalidation secret used by HTTP tests.
pub const REVALIDATION_SECRET: &str = "Qm9v4TzL8rXk2WcN7pHd";

/// Hidden product tag (the default).
pub const HIDDEN_TAG: &str = "nextjs-frontend-hidden";

/// Environment pointing the client at `server`.
#[must_use]
pub fn test_env(server: &MockServer) -> HashMap<String, String> {
    [
        ("SHOPIFY_STORE_DOMAIN", server.uri()),
        ("SHOPIFY_API_VERSION", API_VERSION.to_string()),
        ("SHOPIFY_STOREFRONT_ACCESS_TOKEN", TOKEN.to_string()),
        ("SHOPIFY_TIMEOUT_SECS", "5".to_string()),
        ("COMPANY_NAME", "Acme Envases".to_string()),
        ("SITE_NAME", "Acme".to_string()),
        ("NEXT_PUBLIC_GTM_ID", "GTM-TEST123".to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

/// Shopify settings for `server`.
#[must_use]
pub fn shopify_config(server: &MockServer) -> ShopifyConfig {
    let env = test_env(server);
    ShopifyConfig::from_lookup(&|key: &str| env.get(key).cloned())
        .expect("failed to build test ShopifyConfig")
}

/// Full server settings for `server`, with the revalidation secret set.
#[must_use]
pub fn storefront_config(server: &MockServer) -> StorefrontConfig {
    let mut env = test_env(server);
    env.insert(
        "SHOPIFY_STOREFRONT_REVALIDATION_SECRET".to_string(),
        REVALIDATION_SECRET.to_string(),
    );
    StorefrontConfig::from_lookup(|key| env.get(key).cloned())
        .expect("failed to build test StorefrontConfig")
}

/// Client talking to `server`.
#[must_use]
pub fn test_client(server: &MockServer) -> StorefrontClient {
    StorefrontClient::new(&shopify_config(server)).expect("failed to build test StorefrontClient")
}

/// Matcher for one GraphQL operation carrying the access token.
#[must_use]
pub fn graphql(operation: &str) -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(header(ACCESS_TOKEN_HEADER, TOKEN))
        .and(body_partial_json(json!({ "operationName": operation })))
}

/// A 200 response with `{ "data": data }`.
#[must_use]
pub fn data(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "data": data }))
}

/// Product node fixture.
#[must_use]
pub fn product_json(handle: &str, title: &str, tags: &[&str]) -> Value {
    json!({
        "id": format!("gid://shopify/Product/{handle}"),
        "handle": handle,
        "availableForSale": true,
        "title": title,
        "description": format!("{title} de calidad"),
        "descriptionHtml": format!("<p>{title} de calidad</p>"),
        "options": [{ "id": "gid://shopify/ProductOption/1", "name": "Tamaño", "values": ["S"] }],
        "priceRange": {
            "maxVariantPrice": { "amount": "9.90", "currencyCode": "EUR" },
            "minVariantPrice": { "amount": "9.90", "currencyCode": "EUR" }
        },
        "variants": { "edges": [
            { "node": {
                "id": format!("gid://shopify/ProductVariant/{handle}"),
                "title": "S",
                "availableForSale": true,
                "selectedOptions": [{ "name": "Tamaño", "value": "S" }],
                "price": { "amount": "9.90", "currencyCode": "EUR" }
            } }
        ] },
        "featuredImage": null,
        "images": { "edges": [
            { "node": {
                "url": format!("https://cdn.shopify.com/s/files/1/{handle}.jpg"),
                "altText": null,
                "width": 800,
                "height": 800
            } }
        ] },
        "seo": { "title": null, "description": null },
        "tags": tags,
        "updatedAt": "2024-05-01T10:00:00Z"
    })
}

/// Connection fixture wrapping `nodes`.
#[must_use]
pub fn connection(nodes: Vec<Value>) -> Value {
    json!({ "edges": nodes.into_iter().map(|node| json!({ "node": node })).collect::<Vec<_>>() })
}

/// Collection node fixture.
#[must_use]
pub fn collection_json(handle: &str, title: &str) -> Value {
    json!({
        "handle": handle,
        "title": title,
        "description": format!("{title} para tu negocio"),
        "seo": { "title": title, "description": null },
        "updatedAt": "2024-03-02T08:30:00Z"
    })
}

/// Cart line fixture for the variant of product `handle`.
#[must_use]
pub fn cart_line_json(line_id: &str, handle: &str, quantity: u32) -> Value {
    json!({
        "id": format!("gid://shopify/CartLine/{line_id}"),
        "quantity": quantity,
        "cost": { "totalAmount": { "amount": "9.90", "currencyCode": "EUR" } },
        "merchandise": {
            "id": format!("gid://shopify/ProductVariant/{handle}"),
            "title": "S",
            "selectedOptions": [{ "name": "Tamaño", "value": "S" }],
            "product": {
                "id": format!("gid://shopify/Product/{handle}"),
                "handle": handle,
                "title": handle,
                "featuredImage": null
            }
        }
    })
}

/// Cart fixture. A `None` tax leaves `totalTaxAmount` null.
#[must_use]
pub fn cart_json(cart_id: &str, lines: Vec<Value>, tax: Option<&str>) -> Value {
    let total_quantity: u64 = lines
        .iter()
        .filter_map(|line| line["quantity"].as_u64())
        .sum();

    json!({
        "id": cart_id,
        "checkoutUrl": "https://acme.myshopify.com/cart/c/abc",
        "cost": {
            "subtotalAmount": { "amount": "9.90", "currencyCode": "EUR" },
            "totalAmount": { "amount": "9.90", "currencyCode": "EUR" },
            "totalTaxAmount": tax.map(|amount| json!({ "amount": amount, "currencyCode": "EUR" }))
        },
        "lines": connection(lines),
        "totalQuantity": total_quantity
    })
}

/// Cart mutation payload fixture.
#[must_use]
pub fn cart_payload(cart: Option<Value>, user_errors: &[&str]) -> Value {
    json!({
        "cart": cart,
        "userErrors": user_errors
            .iter()
            .map(|message| json!({ "field": ["lines"], "message": message }))
            .collect::<Vec<_>>()
    })
}
