//! Wire shapes of the GraphQL fragments, as Shopify returns them.
//!
//! These mirror the fragment selections in `queries` field for field and are
//! only ever deserialized. Conversion into the domain types happens in
//! `conversions`.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use vitrina_core::{CartId, CartLineId, MerchandiseId, ProductId};

use crate::shopify::types::{
    Image, Money, PriceRange, ProductOption, ProductVariant, SelectedOption, Seo,
};

/// Paginated list shape: `{ edges: [{ node }] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

/// One entry of a [`Connection`].
#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

/// `fragment product on Product`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyProduct {
    pub id: ProductId,
    pub handle: String,
    pub available_for_sale: bool,
    pub title: String,
    pub description: String,
    pub description_html: String,
    pub options: Vec<ProductOption>,
    pub price_range: PriceRange,
    pub variants: Connection<ProductVariant>,
    pub featured_image: Option<Image>,
    pub images: Connection<Image>,
    #[serde(default)]
    pub seo: Seo,
    pub tags: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// `fragment collection on Collection`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyCollection {
    pub handle: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub seo: Seo,
    pub updated_at: DateTime<Utc>,
}

/// A menu entry with its absolute Shopify URL.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyMenuItem {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub items: Vec<ShopifyMenuItem>,
}

/// `fragment cart on Cart`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyCart {
    pub id: CartId,
    pub checkout_url: String,
    pub cost: ShopifyCartCost,
    pub lines: Connection<ShopifyCartItem>,
    pub total_quantity: u32,
}

/// Cart totals; `totalTaxAmount` is nullable and deprecated upstream.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyCartCost {
    pub subtotal_amount: Money,
    pub total_amount: Money,
    #[serde(default)]
    pub total_tax_amount: Option<Money>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyCartItem {
    pub id: CartLineId,
    pub quantity: u32,
    pub cost: ShopifyCartItemCost,
    pub merchandise: ShopifyMerchandise,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyCartItemCost {
    pub total_amount: Money,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyMerchandise {
    pub id: MerchandiseId,
    pub title: String,
    pub selected_options: Vec<SelectedOption>,
    pub product: ShopifyCartProduct,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopifyCartProduct {
    pub id: ProductId,
    pub handle: String,
    pub title: String,
    pub featured_image: Option<Image>,
}

/// `{ cart, userErrors }` payload shared by every cart mutation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutationPayload {
    pub cart: Option<ShopifyCart>,
    #[serde(default)]
    pub user_errors: Vec<CartUserError>,
}

/// A validation error reported by a cart mutation.
#[derive(Debug, Clone, Deserialize)]
pub struct CartUserError {
    /// Path to the offending input field.
    pub field: Option<Vec<String>>,
    /// Human-readable error message.
    pub message: String,
}
