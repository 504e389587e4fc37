//! Integration tests for `StorefrontClient` against a mocked Storefront API.
//!
//! Covers reshaping as seen through the public operations, error mapping,
//! and the tag-based response cache.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::json;
use vitrina_core::{CartId, CurrencyCode, ProductId};
use vitrina_integration_tests::{
    HIDDEN_TAG, cart_json, cart_line_json, cart_payload, collection_json, connection, data,
    graphql, product_json, test_client,
};
use vitrina_storefront::config::{ConfigError, ShopifyConfig};
use vitrina_storefront::shopify::{CacheTag, ProductSortKey, ShopifyError};
use wiremock::{MockServer, ResponseTemplate};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn missing_store_domain_fails_before_any_request() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("SHOPIFY_API_VERSION", "2025-01"),
        ("SHOPIFY_STOREFRONT_ACCESS_TOKEN", "f3a9c1e7b2d84605a9e1c3b7d5f20486"),
    ]);

    let result = ShopifyConfig::from_lookup(&|key: &str| env.get(key).map(ToString::to_string));

    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref key)) if key == "SHOPIFY_STORE_DOMAIN"),
        "expected missing domain, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_products_drops_hidden_products_and_sends_variables() {
    let server = MockServer::start().await;

    graphql("getProducts")
        .and(wiremock::matchers::body_partial_json(json!({
            "variables": { "query": "bolsa", "reverse": true, "sortKey": "PRICE" }
        })))
        .respond_with(data(json!({
            "products": connection(vec![
                product_json("bolsa-kraft", "Bolsa Kraft", &[]),
                product_json("bolsa-muestra", "Bolsa Muestra", &[HIDDEN_TAG]),
                product_json("bolsa-blanca", "Bolsa Blanca", &["papel"]),
            ])
        })))
        .expect(1)
        .mount(&server)
        .await;

    let products = test_client(&server)
        .get_products(Some("bolsa"), ProductSortKey::Price, true)
        .await
        .expect("get_products failed");

    let handles: Vec<_> = products.iter().map(|p| p.handle.as_str()).collect();
    assert_eq!(handles, ["bolsa-kraft", "bolsa-blanca"]);
    assert_eq!(
        products[0].images[0].alt_text.as_deref(),
        Some("Bolsa Kraft - bolsa-kraft")
    );
    assert_eq!(products[0].variants.len(), 1);
}

#[tokio::test]
async fn get_product_returns_hidden_product() {
    let server = MockServer::start().await;

    graphql("getProduct")
        .respond_with(data(json!({
            "product": product_json("bolsa-muestra", "Bolsa Muestra", &[HIDDEN_TAG])
        })))
        .mount(&server)
        .await;

    let product = test_client(&server)
        .get_product("bolsa-muestra")
        .await
        .expect("get_product failed");

    assert_eq!(product.map(|p| p.handle).as_deref(), Some("bolsa-muestra"));
}

#[tokio::test]
async fn get_product_unknown_handle_is_none() {
    let server = MockServer::start().await;

    graphql("getProduct")
        .respond_with(data(json!({ "product": null })))
        .mount(&server)
        .await;

    let product = test_client(&server).get_product("nope").await.expect("get_product failed");
    assert!(product.is_none());
}

#[tokio::test]
async fn get_product_recommendations_drops_hidden_products() {
    let server = MockServer::start().await;

    graphql("getProductRecommendations")
        .and(wiremock::matchers::body_partial_json(json!({
            "variables": { "productId": "gid://shopify/Product/bolsa-kraft" }
        })))
        .respond_with(data(json!({
            "productRecommendations": [
                product_json("rollo-film", "Rollo Film", &[]),
                product_json("oculto", "Oculto", &[HIDDEN_TAG]),
            ]
        })))
        .mount(&server)
        .await;

    let products = test_client(&server)
        .get_product_recommendations(&ProductId::new("gid://shopify/Product/bolsa-kraft"))
        .await
        .expect("get_product_recommendations failed");

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].handle, "rollo-film");
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_collections_puts_all_first_and_drops_hidden_prefix() {
    let server = MockServer::start().await;

    graphql("getCollections")
        .respond_with(data(json!({
            "collections": connection(vec![
                collection_json("bolsas-papel", "Bolsas de papel"),
                collection_json("hidden-homepage-featured-items", "Featured"),
                collection_json("rollos", "Rollos"),
            ])
        })))
        .mount(&server)
        .await;

    let collections = test_client(&server)
        .get_collections()
        .await
        .expect("get_collections failed");

    let handles: Vec<_> = collections.iter().map(|c| c.handle.as_str()).collect();
    assert_eq!(handles, ["", "bolsas-papel", "rollos"]);
    assert_eq!(collections[0].title, "All");
    assert_eq!(collections[0].path, "/search");
    assert_eq!(collections[1].path, "/search/bolsas-papel");
    assert_eq!(collections.iter().filter(|c| c.title == "All").count(), 1);
}

#[tokio::test]
async fn get_collection_products_filters_by_query() {
    let server = MockServer::start().await;

    graphql("getCollectionProducts")
        .and(wiremock::matchers::body_partial_json(json!({
            "variables": { "handle": "bolsas-papel", "sortKey": "COLLECTION_DEFAULT" }
        })))
        .respond_with(data(json!({
            "collection": {
                "products": connection(vec![
                    product_json("rollo-kraft", "ROLLO Kraft", &[]),
                    product_json("bolsa-asa", "Bolsa con asa", &["rollo-compatible"]),
                    product_json("bolsa-plana", "Bolsa plana", &[]),
                    product_json("rollo-oculto", "Rollo oculto", &[HIDDEN_TAG]),
                ])
            }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server);

    let filtered = client
        .get_collection_products("bolsas-papel", ProductSortKey::Relevance, false, Some("rollo"))
        .await
        .expect("get_collection_products failed");
    let handles: Vec<_> = filtered.iter().map(|p| p.handle.as_str()).collect();
    assert_eq!(handles, ["rollo-kraft", "bolsa-asa"]);

    let all = client
        .get_collection_products("bolsas-papel", ProductSortKey::Relevance, false, None)
        .await
        .expect("get_collection_products failed");
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn get_collection_products_missing_collection_is_empty() {
    let server = MockServer::start().await;

    graphql("getCollectionProducts")
        .respond_with(data(json!({ "collection": null })))
        .mount(&server)
        .await;

    let products = test_client(&server)
        .get_collection_products("nope", ProductSortKey::BestSelling, false, None)
        .await
        .expect("get_collection_products failed");
    assert!(products.is_empty());
}

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_menu_strips_domain_and_pages() {
    let server = MockServer::start().await;
    let base = server.uri();

    graphql("getMenu")
        .respond_with(data(json!({
            "menu": { "items": [
                { "title": "Nosotros", "url": format!("{base}/pages/about"), "items": [] },
                { "title": "Productos", "url": format!("{base}/collections/all"), "items": [
                    { "title": "Bolsas", "url": format!("{base}/collections/bolsas") }
                ] }
            ] }
        })))
        .mount(&server)
        .await;

    let menu = test_client(&server).get_menu("main-menu").await.expect("get_menu failed");

    assert_eq!(menu[0].path, "/about");
    assert_eq!(menu[1].path, "/collections/all");
    assert_eq!(menu[1].items[0].path, "/collections/bolsas");
}

#[tokio::test]
async fn get_menu_unknown_handle_is_empty() {
    let server = MockServer::start().await;

    graphql("getMenu")
        .respond_with(data(json!({ "menu": null })))
        .mount(&server)
        .await;

    let menu = test_client(&server).get_menu("nope").await.expect("get_menu failed");
    assert!(menu.is_empty());
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn graphql_errors_keep_first_error_and_query() {
    let server = MockServer::start().await;

    graphql("getCollections")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [
                { "message": "Field 'colections' doesn't exist on type 'QueryRoot'" },
                { "message": "second" }
            ]
        })))
        .mount(&server)
        .await;

    let result = test_client(&server).get_collections().await;

    match result {
        Err(ShopifyError::GraphQL { error, query }) => {
            assert_eq!(
                error.message,
                "Field 'colections' doesn't exist on type 'QueryRoot'"
            );
            assert!(query.contains("query getCollections"));
        }
        other => panic!("expected GraphQL error, got: {other:?}"),
    }
}

#[tokio::test]
async fn non_success_status_is_reported_with_body() {
    let server = MockServer::start().await;

    graphql("getProducts")
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let result = test_client(&server)
        .get_products(None, ProductSortKey::Relevance, false)
        .await;

    assert!(
        matches!(
            result,
            Err(ShopifyError::Status { status: 500, ref body, .. }) if body == "upstream exploded"
        ),
        "expected status error, got: {result:?}"
    );
}

#[tokio::test]
async fn rate_limit_reads_retry_after() {
    let server = MockServer::start().await;

    graphql("getProducts")
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .mount(&server)
        .await;

    let result = test_client(&server)
        .get_products(None, ProductSortKey::Relevance, false)
        .await;

    let err = result.expect_err("expected rate limit");
    assert!(
        matches!(err, ShopifyError::RateLimited { retry_after: 7, .. }),
        "expected rate limit, got: {err:?}"
    );
    assert!(err.query().is_some_and(|q| q.contains("query getProducts(")));
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let server = MockServer::start().await;

    graphql("getCollection")
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = test_client(&server).get_collection("bolsas").await;
    assert!(
        matches!(result, Err(ShopifyError::Parse { .. })),
        "expected parse error, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cached_response_is_served_without_second_request() {
    let server = MockServer::start().await;

    graphql("getProducts")
        .respond_with(data(json!({
            "products": connection(vec![product_json("bolsa-kraft", "Bolsa Kraft", &[])])
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let first = client
        .get_products(Some("kraft"), ProductSortKey::Relevance, false)
        .await
        .expect("first call failed");
    let second = client
        .get_products(Some("kraft"), ProductSortKey::Relevance, false)
        .await
        .expect("second call failed");

    assert_eq!(first, second);
}

#[tokio::test]
async fn different_variables_are_cached_separately() {
    let server = MockServer::start().await;

    graphql("getProducts")
        .respond_with(data(json!({ "products": connection(vec![]) })))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server);
    client
        .get_products(Some("kraft"), ProductSortKey::Relevance, false)
        .await
        .expect("first call failed");
    client
        .get_products(Some("rollo"), ProductSortKey::Relevance, false)
        .await
        .expect("second call failed");
}

#[tokio::test]
async fn revalidating_a_tag_forces_a_fresh_request() {
    let server = MockServer::start().await;

    graphql("getCollections")
        .respond_with(data(json!({ "collections": connection(vec![]) })))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server);
    client.get_collections().await.expect("first call failed");
    client.revalidate(&[CacheTag::Products]);
    client.get_collections().await.expect("cached call failed");
    client.revalidate(&[CacheTag::Collections]);
    client.get_collections().await.expect("fresh call failed");
}

#[tokio::test]
async fn failed_responses_are_not_cached() {
    let server = MockServer::start().await;

    graphql("getCollections")
        .respond_with(ResponseTemplate::new(502))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server);
    assert!(client.get_collections().await.is_err());
    assert!(client.get_collections().await.is_err());
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

const CART_ID: &str = "gid://shopify/Cart/abc?key=def";

#[tokio::test]
async fn get_cart_defaults_missing_tax_to_fallback_currency() {
    let server = MockServer::start().await;

    graphql("getCart")
        .respond_with(data(json!({
            "cart": cart_json(CART_ID, vec![cart_line_json("l1", "bolsa-kraft", 1)], None)
        })))
        .mount(&server)
        .await;

    let cart = test_client(&server)
        .get_cart(Some(&CartId::new(CART_ID)))
        .await
        .expect("get_cart failed")
        .expect("cart missing");

    assert_eq!(cart.cost.total_tax_amount.amount.to_string(), "0.0");
    assert_eq!(cart.cost.total_tax_amount.currency_code, CurrencyCode::USD);
    assert_eq!(cart.lines.len(), 1);
    assert_eq!(cart.total_quantity, 1);
}

#[tokio::test]
async fn get_cart_without_id_makes_no_request() {
    let server = MockServer::start().await;

    graphql("getCart")
        .respond_with(data(json!({ "cart": null })))
        .expect(0)
        .mount(&server)
        .await;

    let cart = test_client(&server).get_cart(None).await.expect("get_cart failed");
    assert!(cart.is_none());
}

#[tokio::test]
async fn cart_mutations_bypass_cache_and_revalidate_cart() {
    let server = MockServer::start().await;
    let cart = cart_json(CART_ID, vec![cart_line_json("l1", "bolsa-kraft", 2)], Some("1.72"));

    graphql("getCart")
        .respond_with(data(json!({ "cart": cart.clone() })))
        .expect(2)
        .mount(&server)
        .await;
    graphql("addToCart")
        .respond_with(data(json!({ "cartLinesAdd": cart_payload(Some(cart), &[]) })))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let cart_id = CartId::new(CART_ID);
    let line = || {
        vec![vitrina_storefront::shopify::CartLineInput {
            merchandise_id: "gid://shopify/ProductVariant/bolsa-kraft".into(),
            quantity: 1,
        }]
    };

    client.get_cart(Some(&cart_id)).await.expect("get_cart failed");
    client.get_cart(Some(&cart_id)).await.expect("cached get_cart failed");

    let updated = client.add_to_cart(&cart_id, line()).await.expect("add failed");
    assert_eq!(updated.cost.total_tax_amount.amount.to_string(), "1.72");
    client.add_to_cart(&cart_id, line()).await.expect("second add failed");

    client.get_cart(Some(&cart_id)).await.expect("fresh get_cart failed");
}

#[tokio::test]
async fn cart_read_in_flight_during_mutation_is_not_cached() {
    let server = MockServer::start().await;
    let cart = cart_json(CART_ID, vec![cart_line_json("l1", "bolsa-kraft", 2)], None);

    graphql("getCart")
        .respond_with(
            data(json!({ "cart": cart.clone() })).set_delay(Duration::from_millis(300)),
        )
        .expect(2)
        .mount(&server)
        .await;
    graphql("addToCart")
        .respond_with(data(json!({ "cartLinesAdd": cart_payload(Some(cart), &[]) })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let cart_id = CartId::new(CART_ID);

    let slow_read = client.get_cart(Some(&cart_id));
    let mutation = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        client
            .add_to_cart(
                &cart_id,
                vec![vitrina_storefront::shopify::CartLineInput {
                    merchandise_id: "gid://shopify/ProductVariant/bolsa-kraft".into(),
                    quantity: 1,
                }],
            )
            .await
    };
    let (read, added) = tokio::join!(slow_read, mutation);
    read.expect("slow get_cart failed");
    added.expect("add failed");

    // The pre-mutation body must not have been cached.
    client.get_cart(Some(&cart_id)).await.expect("fresh get_cart failed");
}

#[tokio::test]
async fn get_cart_uncached_always_hits_shopify() {
    let server = MockServer::start().await;

    graphql("getCart")
        .respond_with(data(json!({
            "cart": cart_json(CART_ID, vec![], None)
        })))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let cart_id = CartId::new(CART_ID);

    client.get_cart_uncached(Some(&cart_id)).await.expect("first call failed");
    client.get_cart_uncached(Some(&cart_id)).await.expect("second call failed");
    // Uncached reads leave nothing behind for the cached path.
    client.get_cart(Some(&cart_id)).await.expect("cached call failed");
}

#[tokio::test]
async fn cart_user_errors_are_joined() {
    let server = MockServer::start().await;

    graphql("createCart")
        .respond_with(data(json!({
            "cartCreate": cart_payload(None, &["Variant is sold out", "Quantity too high"])
        })))
        .mount(&server)
        .await;

    let result = test_client(&server).create_cart(None).await;

    assert!(
        matches!(
            result,
            Err(ShopifyError::UserError(ref message))
                if message == "Variant is sold out; Quantity too high"
        ),
        "expected user error, got: {result:?}"
    );
}

#[tokio::test]
async fn remove_from_cart_sends_line_ids() {
    let server = MockServer::start().await;

    graphql("removeFromCart")
        .and(wiremock::matchers::body_partial_json(json!({
            "variables": { "cartId": CART_ID, "lineIds": ["gid://shopify/CartLine/l1"] }
        })))
        .respond_with(data(json!({
            "cartLinesRemove": cart_payload(Some(cart_json(CART_ID, vec![], None)), &[])
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cart = test_client(&server)
        .remove_from_cart(
            &CartId::new(CART_ID),
            vec!["gid://shopify/CartLine/l1".into()],
        )
        .await
        .expect("remove failed");

    assert!(cart.lines.is_empty());
    assert_eq!(cart.total_quantity, 0);
}

#[tokio::test]
async fn request_carries_access_token_header() {
    let server = MockServer::start().await;

    // `graphql` already requires the header; an unmatched request gets 404.
    graphql("getMenu")
        .respond_with(data(json!({ "menu": { "items": [] } })))
        .expect(1)
        .mount(&server)
        .await;

    let menu = test_client(&server).get_menu("main-menu").await.expect("get_menu failed");
    assert!(menu.is_empty());
}
