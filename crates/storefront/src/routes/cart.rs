//! Cart route handlers.
//!
//! The cart ID lives in the `cartId` cookie. Only adding an item can create
//! a cart, so only that handler sets the cookie.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
    response::{AppendHeaders, IntoResponse},
};
use serde::Deserialize;
use tracing::instrument;
use vitrina_core::{CartId, MerchandiseId};

use crate::error::Result;
use crate::shopify::Cart;
use crate::state::AppState;

/// Cookie holding the Shopify cart ID.
pub const CART_COOKIE: &str = "cartId";

/// Cart cookie lifetime: 7 days.
pub const CART_COOKIE_MAX_AGE_SECS: u64 = 7 * 24 * 60 * 60;

const fn default_quantity() -> u32 {
    1
}

/// Body of `POST /api/cart/items`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub merchandise_id: MerchandiseId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// Body of `POST /api/cart/items/update`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub merchandise_id: MerchandiseId,
    pub quantity: u32,
}

/// Body of `POST /api/cart/items/remove`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveItemRequest {
    pub merchandise_id: MerchandiseId,
}

/// Read the cart ID from the request cookies, percent-decoded.
#[must_use]
pub fn cart_id_from_headers(headers: &HeaderMap) -> Option<CartId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == CART_COOKIE)
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .filter(|value| !value.is_empty())
        .map(|value| CartId::new(value.into_owned()))
}

/// `Set-Cookie` value persisting `cart_id`.
#[must_use]
pub fn cart_cookie(cart_id: &CartId) -> String {
    format!(
        "{CART_COOKIE}={}; Path=/; Max-Age={CART_COOKIE_MAX_AGE_SECS}; SameSite=Lax; HttpOnly",
        urlencoding::encode(cart_id.as_str())
    )
}

/// The current cart, or `null` without one.
#[instrument(skip_all)]
pub async fn show(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Option<Cart>>> {
    let cart_id = cart_id_from_headers(&headers);
    Ok(Json(state.storefront().get_cart(cart_id.as_ref()).await?))
}

/// Add an item, creating the cart when needed.
#[instrument(skip(state, headers))]
pub async fn add(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<AddItemRequest>,
) -> Result<impl IntoResponse> {
    let cart_id = cart_id_from_headers(&headers);
    let cart = state
        .cart()
        .add_item(cart_id.as_ref(), body.merchandise_id, body.quantity)
        .await?;

    let cookie = cart_cookie(&cart.id);
    Ok((AppendHeaders([(header::SET_COOKIE, cookie)]), Json(cart)))
}

/// Change a line's quantity; zero removes it.
#[instrument(skip(state, headers))]
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Json<Cart>> {
    let cart_id = cart_id_from_headers(&headers);
    let cart = state
        .cart()
        .update_item_quantity(cart_id.as_ref(), body.merchandise_id, body.quantity)
        .await?;

    Ok(Json(cart))
}

/// Remove a line.
#[instrument(skip(state, headers))]
pub async fn remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<RemoveItemRequest>,
) -> Result<Json<Cart>> {
    let cart_id = cart_id_from_headers(&headers);
    let cart = state
        .cart()
        .remove_item(cart_id.as_ref(), body.merchandise_id)
        .await?;

    Ok(Json(cart))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_cart_id_is_percent_decoded() {
        let id = cart_id_from_headers(&headers(
            "theme=dark; cartId=gid%3A%2F%2Fshopify%2FCart%2Fc1%3Fkey%3Dabc; other=1",
        ))
        .unwrap();
        assert_eq!(id.as_str(), "gid://shopify/Cart/c1?key=abc");
    }

    #[test]
    fn test_missing_or_empty_cookie() {
        assert!(cart_id_from_headers(&HeaderMap::new()).is_none());
        assert!(cart_id_from_headers(&headers("theme=dark")).is_none());
        assert!(cart_id_from_headers(&headers("cartId=")).is_none());
        assert!(cart_id_from_headers(&headers("xcartId=abc")).is_none());
    }

    #[test]
    fn test_cart_cookie_round_trips_through_header() {
        let id = CartId::new("gid://shopify/Cart/c1?key=abc");
        let cookie = cart_cookie(&id);

        assert!(cookie.starts_with("cartId=gid%3A%2F%2Fshopify%2FCart%2Fc1%3Fkey%3Dabc;"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("HttpOnly"));

        let value = cookie.split(';').next().unwrap();
        assert_eq!(cart_id_from_headers(&headers(value)).unwrap(), id);
    }

    #[test]
    fn test_add_request_defaults_quantity() {
        let body: AddItemRequest =
            serde_json::from_str(r#"{"merchandiseId":"gid://shopify/ProductVariant/1"}"#).unwrap();
        assert_eq!(body.quantity, 1);
        assert_eq!(body.merchandise_id.as_str(), "gid://shopify/ProductVariant/1");
    }
}
