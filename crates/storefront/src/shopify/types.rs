//! Domain types for the Shopify Storefront API.
//!
//! These are the reshaped values handed to callers: connections are already
//! flattened and defaults filled in. Raw wire shapes live in
//! `storefront::fragments`. Everything serializes in camelCase, like Shopify.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vitrina_core::{CartId, CartLineId, MerchandiseId, Price, ProductId};

// =============================================================================
// Money Types
// =============================================================================

/// Monetary amount with currency code (`MoneyV2`).
///
/// Amounts keep the precision Shopify sent (`"19.90"` stays `"19.90"`).
pub type Money = Price;

/// Price range for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    /// Maximum price among all variants.
    pub max_variant_price: Money,
    /// Minimum price among all variants.
    pub min_variant_price: Money,
}

// =============================================================================
// Image Types
// =============================================================================

/// Product or collection image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
    /// Image width in pixels.
    pub width: Option<u32>,
    /// Image height in pixels.
    pub height: Option<u32>,
}

// =============================================================================
// SEO Types
// =============================================================================

/// SEO metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seo {
    /// Page title for search engines.
    pub title: Option<String>,
    /// Meta description.
    pub description: Option<String>,
}

// =============================================================================
// Product Types
// =============================================================================

/// Selected option on a product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Size", "Color").
    pub name: String,
    /// Selected value (e.g., "Large", "Blue").
    pub value: String,
}

/// Product option definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    /// Option ID.
    pub id: String,
    /// Option name (e.g., "Size").
    pub name: String,
    /// Available values (e.g., `["Small", "Medium", "Large"]`).
    pub values: Vec<String>,
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Variant ID, used as the merchandise ID of cart lines.
    pub id: MerchandiseId,
    /// Variant title (e.g., "Large / Kraft").
    pub title: String,
    /// Whether the variant can be purchased.
    pub available_for_sale: bool,
    /// Options identifying this variant.
    pub selected_options: Vec<SelectedOption>,
    /// Variant price.
    pub price: Money,
}

/// A product with images and variants flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// URL handle.
    pub handle: String,
    /// Whether any variant can be purchased.
    pub available_for_sale: bool,
    /// Product title.
    pub title: String,
    /// Plain-text description.
    pub description: String,
    /// HTML description.
    pub description_html: String,
    /// Option definitions.
    pub options: Vec<ProductOption>,
    /// Price range across variants.
    pub price_range: PriceRange,
    /// Main image.
    pub featured_image: Option<Image>,
    /// SEO metadata.
    pub seo: Seo,
    /// Product tags.
    pub tags: Vec<String>,
    /// Images in display order, each with alt text.
    pub images: Vec<Image>,
    /// Variants in display order.
    pub variants: Vec<ProductVariant>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Collection Types
// =============================================================================

/// A product collection with its storefront browse path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// URL handle (empty for the synthetic "All" collection).
    pub handle: String,
    /// Collection title.
    pub title: String,
    /// Plain-text description.
    pub description: String,
    /// SEO metadata.
    pub seo: Seo,
    /// Browse path (`/search/<handle>`).
    pub path: String,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Menu Types
// =============================================================================

/// A navigation menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    /// Link text.
    pub title: String,
    /// Site-relative path.
    pub path: String,
    /// Submenu entries (one level deep).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Menu>,
}

// =============================================================================
// Cart Types
// =============================================================================

/// Product summary attached to a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
    /// Product ID.
    pub id: ProductId,
    /// URL handle.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Main image.
    pub featured_image: Option<Image>,
}

/// The variant a cart line refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchandise {
    /// Variant ID.
    pub id: MerchandiseId,
    /// Variant title.
    pub title: String,
    /// Options identifying the variant.
    pub selected_options: Vec<SelectedOption>,
    /// Parent product.
    pub product: CartProduct,
}

/// Cost of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemCost {
    /// Line total.
    pub total_amount: Money,
}

/// A cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Cart line ID.
    pub id: CartLineId,
    /// Quantity of the variant.
    pub quantity: u32,
    /// Line cost.
    pub cost: CartItemCost,
    /// Variant on this line.
    pub merchandise: Merchandise,
}

/// Cart totals. The tax amount is always present after reshaping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    /// Sum of line totals before taxes.
    pub subtotal_amount: Money,
    /// Amount due at checkout.
    pub total_amount: Money,
    /// Tax amount, zero in the fallback currency when Shopify omits it.
    pub total_tax_amount: Money,
}

/// A shopping cart with lines flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Cart ID, persisted by the client in the `cartId` cookie.
    pub id: CartId,
    /// Shopify-hosted checkout URL.
    pub checkout_url: String,
    /// Sum of line quantities.
    pub total_quantity: u32,
    /// Cart lines in order.
    pub lines: Vec<CartItem>,
    /// Cart totals.
    pub cost: CartCost,
}

impl Cart {
    /// Find the line holding the given variant.
    #[must_use]
    pub fn line_for(&self, merchandise_id: &MerchandiseId) -> Option<&CartItem> {
        self.lines
            .iter()
            .find(|line| &line.merchandise.id == merchandise_id)
    }
}

/// Input for adding a line to a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    /// Variant to add.
    pub merchandise_id: MerchandiseId,
    /// Quantity to add.
    pub quantity: u32,
}

/// Input for changing an existing cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineUpdateInput {
    /// Cart line to change.
    pub id: CartLineId,
    /// Variant on the line.
    pub merchandise_id: MerchandiseId,
    /// New quantity.
    pub quantity: u32,
}

// =============================================================================
// Sort Keys
// =============================================================================

/// Sort keys for product queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductSortKey {
    /// Sort by title.
    Title,
    /// Sort by product type.
    ProductType,
    /// Sort by vendor.
    Vendor,
    /// Sort by last update.
    UpdatedAt,
    /// Sort by creation date.
    CreatedAt,
    /// Sort by best selling.
    BestSelling,
    /// Sort by price.
    Price,
    /// Sort by ID.
    Id,
    /// Sort by relevance (for search).
    Relevance,
}

/// Sort keys for collection product queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductCollectionSortKey {
    /// Default collection order.
    CollectionDefault,
    /// Sort by title.
    Title,
    /// Sort by price.
    Price,
    /// Sort by best selling.
    BestSelling,
    /// Sort by creation date.
    Created,
    /// Sort by ID.
    Id,
    /// Sort manually.
    Manual,
    /// Sort by relevance.
    Relevance,
}

impl From<ProductSortKey> for ProductCollectionSortKey {
    /// Collections name the creation-date key `CREATED`; keys without a
    /// collection counterpart fall back to the collection's own order.
    fn from(key: ProductSortKey) -> Self {
        match key {
            ProductSortKey::Title => Self::Title,
            ProductSortKey::CreatedAt => Self::Created,
            ProductSortKey::BestSelling => Self::BestSelling,
            ProductSortKey::Price => Self::Price,
            ProductSortKey::Id => Self::Id,
            ProductSortKey::Relevance => Self::Relevance,
            ProductSortKey::ProductType | ProductSortKey::Vendor | ProductSortKey::UpdatedAt => {
                Self::CollectionDefault
            }
        }
    }
}

/// A named listing order selectable by URL slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortFilter {
    /// Human-readable label.
    pub title: &'static str,
    /// URL slug (`None` for the default order).
    pub slug: Option<&'static str>,
    /// Shopify sort key.
    pub sort_key: ProductSortKey,
    /// Whether to reverse the order.
    pub reverse: bool,
}

/// Default listing order.
pub const DEFAULT_SORT: SortFilter = SortFilter {
    title: "Relevance",
    slug: None,
    sort_key: ProductSortKey::Relevance,
    reverse: false,
};

/// All selectable listing orders.
pub const SORTING: &[SortFilter] = &[
    DEFAULT_SORT,
    SortFilter {
        title: "Trending",
        slug: Some("trending-desc"),
        sort_key: ProductSortKey::BestSelling,
        reverse: false,
    },
    SortFilter {
        title: "Latest arrivals",
        slug: Some("latest-desc"),
        sort_key: ProductSortKey::CreatedAt,
        reverse: true,
    },
    SortFilter {
        title: "Price: Low to high",
        slug: Some("price-asc"),
        sort_key: ProductSortKey::Price,
        reverse: false,
    },
    SortFilter {
        title: "Price: High to low",
        slug: Some("price-desc"),
        sort_key: ProductSortKey::Price,
        reverse: true,
    },
];

impl SortFilter {
    /// Resolve a URL slug. `relevance`, unknown and absent slugs give the
    /// default order.
    #[must_use]
    pub fn from_slug(slug: Option<&str>) -> Self {
        slug.and_then(|s| SORTING.iter().find(|f| f.slug == Some(s)))
            .copied()
            .unwrap_or(DEFAULT_SORT)
    }
}
