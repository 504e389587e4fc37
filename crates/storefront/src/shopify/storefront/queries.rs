//! GraphQL documents for the Storefront API.
//!
//! Each operation is a marker type implementing `graphql_client::GraphQLQuery`
//! with hand-written `Variables`/`ResponseData` in a module of the same name,
//! the layout `#[derive(GraphQLQuery)]` would generate. Documents are built
//! with `concat!` so each one carries only the fragments it spreads.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

use super::fragments::CartMutationPayload;

// =============================================================================
// Fragments
// =============================================================================

macro_rules! image_fragment {
    () => {
        r"
fragment image on Image {
  url
  altText
  width
  height
}
"
    };
}

macro_rules! seo_fragment {
    () => {
        r"
fragment seo on SEO {
  description
  title
}
"
    };
}

macro_rules! product_fragment {
    () => {
        r"
fragment product on Product {
  id
  handle
  availableForSale
  title
  description
  descriptionHtml
  options {
    id
    name
    values
  }
  priceRange {
    maxVariantPrice {
      amount
      currencyCode
    }
    minVariantPrice {
      amount
      currencyCode
    }
  }
  variants(first: 250) {
    edges {
      node {
        id
        title
        availableForSale
        selectedOptions {
          name
          value
        }
        price {
          amount
          currencyCode
        }
      }
    }
  }
  featuredImage {
    ...image
  }
  images(first: 20) {
    edges {
      node {
        ...image
      }
    }
  }
  seo {
    ...seo
  }
  tags
  updatedAt
}
"
    };
}

macro_rules! collection_fragment {
    () => {
        r"
fragment collection on Collection {
  handle
  title
  description
  seo {
    ...seo
  }
  updatedAt
}
"
    };
}

macro_rules! cart_fragment {
    () => {
        r"
fragment cart on Cart {
  id
  checkoutUrl
  cost {
    subtotalAmount {
      amount
      currencyCode
    }
    totalAmount {
      amount
      currencyCode
    }
    totalTaxAmount {
      amount
      currencyCode
    }
  }
  lines(first: 100) {
    edges {
      node {
        id
        quantity
        cost {
          totalAmount {
            amount
            currencyCode
          }
        }
        merchandise {
          ... on ProductVariant {
            id
            title
            selectedOptions {
              name
              value
            }
            product {
              id
              handle
              title
              featuredImage {
                ...image
              }
            }
          }
        }
      }
    }
  }
  totalQuantity
}
"
    };
}

macro_rules! storefront_operation {
    ($(#[$meta:meta])* $name:ident, $module:ident, $operation:literal, $document:expr) => {
        $(#[$meta])*
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $document,
                    operation_name: $operation,
                }
            }
        }
    };
}

/// Cart mutations all answer `{ cart, userErrors }` under a per-mutation field.
pub trait CartMutation: GraphQLQuery {
    /// Extract the mutation payload from the response data.
    fn payload(data: Self::ResponseData) -> Option<CartMutationPayload>;
}

// =============================================================================
// Menu
// =============================================================================

storefront_operation!(
    /// Navigation menu by handle.
    GetMenu,
    get_menu,
    "getMenu",
    r"
query getMenu($handle: String!) {
  menu(handle: $handle) {
    items {
      title
      url
      items {
        title
        url
      }
    }
  }
}
"
);

pub mod get_menu {
    use super::{Deserialize, Serialize};
    use crate::shopify::storefront::fragments::ShopifyMenuItem;

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub handle: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub menu: Option<Menu>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Menu {
        pub items: Vec<ShopifyMenuItem>,
    }
}

// =============================================================================
// Products
// =============================================================================

storefront_operation!(
    /// Product search and listing.
    GetProducts,
    get_products,
    "getProducts",
    concat!(
        r"
query getProducts($sortKey: ProductSortKeys, $reverse: Boolean, $query: String) {
  products(sortKey: $sortKey, reverse: $reverse, query: $query, first: 100) {
    edges {
      node {
        ...product
      }
    }
  }
}
",
        product_fragment!(),
        image_fragment!(),
        seo_fragment!()
    )
);

pub mod get_products {
    use super::{Deserialize, Serialize};
    use crate::shopify::storefront::fragments::{Connection, ShopifyProduct};
    use crate::shopify::types::ProductSortKey;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub query: Option<String>,
        pub reverse: bool,
        pub sort_key: ProductSortKey,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub products: Connection<ShopifyProduct>,
    }
}

storefront_operation!(
    /// Single product by handle.
    GetProduct,
    get_product,
    "getProduct",
    concat!(
        r"
query getProduct($handle: String!) {
  product(handle: $handle) {
    ...product
  }
}
",
        product_fragment!(),
        image_fragment!(),
        seo_fragment!()
    )
);

pub mod get_product {
    use super::{Deserialize, Serialize};
    use crate::shopify::storefront::fragments::ShopifyProduct;

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub handle: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub product: Option<ShopifyProduct>,
    }
}

storefront_operation!(
    /// Products Shopify recommends alongside a product.
    GetProductRecommendations,
    get_product_recommendations,
    "getProductRecommendations",
    concat!(
        r"
query getProductRecommendations($productId: ID!) {
  productRecommendations(productId: $productId) {
    ...product
  }
}
",
        product_fragment!(),
        image_fragment!(),
        seo_fragment!()
    )
);

pub mod get_product_recommendations {
    use super::{Deserialize, Serialize};
    use crate::shopify::storefront::fragments::ShopifyProduct;
    use vitrina_core::ProductId;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub product_id: ProductId,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub product_recommendations: Option<Vec<ShopifyProduct>>,
    }
}

// =============================================================================
// Collections
// =============================================================================

storefront_operation!(
    /// First 100 collections sorted by title.
    GetCollections,
    get_collections,
    "getCollections",
    concat!(
        r"
query getCollections {
  collections(first: 100, sortKey: TITLE) {
    edges {
      node {
        ...collection
      }
    }
  }
}
",
        collection_fragment!(),
        seo_fragment!()
    )
);

pub mod get_collections {
    use super::{Deserialize, Serialize};
    use crate::shopify::storefront::fragments::{Connection, ShopifyCollection};

    /// The query takes no variables; serializes as `{}`.
    #[derive(Debug, Clone, Default, Serialize)]
    pub struct Variables {}

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub collections: Connection<ShopifyCollection>,
    }
}

storefront_operation!(
    /// Single collection by handle.
    GetCollection,
    get_collection,
    "getCollection",
    concat!(
        r"
query getCollection($handle: String!) {
  collection(handle: $handle) {
    ...collection
  }
}
",
        collection_fragment!(),
        seo_fragment!()
    )
);

pub mod get_collection {
    use super::{Deserialize, Serialize};
    use crate::shopify::storefront::fragments::ShopifyCollection;

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub handle: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub collection: Option<ShopifyCollection>,
    }
}

storefront_operation!(
    /// First 100 products of a collection.
    GetCollectionProducts,
    get_collection_products,
    "getCollectionProducts",
    concat!(
        r"
query getCollectionProducts($handle: String!, $sortKey: ProductCollectionSortKeys, $reverse: Boolean) {
  collection(handle: $handle) {
    products(sortKey: $sortKey, reverse: $reverse, first: 100) {
      edges {
        node {
          ...product
        }
      }
    }
  }
}
",
        product_fragment!(),
        image_fragment!(),
        seo_fragment!()
    )
);

pub mod get_collection_products {
    use super::{Deserialize, Serialize};
    use crate::shopify::storefront::fragments::{Connection, ShopifyProduct};
    use crate::shopify::types::ProductCollectionSortKey;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub handle: String,
        pub reverse: bool,
        pub sort_key: ProductCollectionSortKey,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub collection: Option<CollectionProducts>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CollectionProducts {
        pub products: Connection<ShopifyProduct>,
    }
}

// =============================================================================
// Cart
// =============================================================================

storefront_operation!(
    /// Cart by ID.
    GetCart,
    get_cart,
    "getCart",
    concat!(
        r"
query getCart($cartId: ID!) {
  cart(id: $cartId) {
    ...cart
  }
}
",
        cart_fragment!(),
        image_fragment!()
    )
);

pub mod get_cart {
    use super::{Deserialize, Serialize};
    use crate::shopify::storefront::fragments::ShopifyCart;
    use vitrina_core::CartId;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartId,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub cart: Option<ShopifyCart>,
    }
}

storefront_operation!(
    /// Create a cart, optionally with initial lines.
    CreateCart,
    create_cart,
    "createCart",
    concat!(
        r"
mutation createCart($lineItems: [CartLineInput!]) {
  cartCreate(input: { lines: $lineItems }) {
    cart {
      ...cart
    }
    userErrors {
      field
      message
    }
  }
}
",
        cart_fragment!(),
        image_fragment!()
    )
);

pub mod create_cart {
    use super::{Deserialize, Serialize};
    use crate::shopify::storefront::fragments::CartMutationPayload;
    use crate::shopify::types::CartLineInput;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub line_items: Option<Vec<CartLineInput>>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_create: Option<CartMutationPayload>,
    }
}

impl CartMutation for CreateCart {
    fn payload(data: Self::ResponseData) -> Option<CartMutationPayload> {
        data.cart_create
    }
}

storefront_operation!(
    /// Add lines to a cart.
    AddToCart,
    add_to_cart,
    "addToCart",
    concat!(
        r"
mutation addToCart($cartId: ID!, $lines: [CartLineInput!]!) {
  cartLinesAdd(cartId: $cartId, lines: $lines) {
    cart {
      ...cart
    }
    userErrors {
      field
      message
    }
  }
}
",
        cart_fragment!(),
        image_fragment!()
    )
);

pub mod add_to_cart {
    use super::{Deserialize, Serialize};
    use crate::shopify::storefront::fragments::CartMutationPayload;
    use crate::shopify::types::CartLineInput;
    use vitrina_core::CartId;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartId,
        pub lines: Vec<CartLineInput>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_add: Option<CartMutationPayload>,
    }
}

impl CartMutation for AddToCart {
    fn payload(data: Self::ResponseData) -> Option<CartMutationPayload> {
        data.cart_lines_add
    }
}

storefront_operation!(
    /// Remove lines from a cart.
    RemoveFromCart,
    remove_from_cart,
    "removeFromCart",
    concat!(
        r"
mutation removeFromCart($cartId: ID!, $lineIds: [ID!]!) {
  cartLinesRemove(cartId: $cartId, lineIds: $lineIds) {
    cart {
      ...cart
    }
    userErrors {
      field
      message
    }
  }
}
",
        cart_fragment!(),
        image_fragment!()
    )
);

pub mod remove_from_cart {
    use super::{Deserialize, Serialize};
    use crate::shopify::storefront::fragments::CartMutationPayload;
    use vitrina_core::{CartId, CartLineId};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartId,
        pub line_ids: Vec<CartLineId>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_remove: Option<CartMutationPayload>,
    }
}

impl CartMutation for RemoveFromCart {
    fn payload(data: Self::ResponseData) -> Option<CartMutationPayload> {
        data.cart_lines_remove
    }
}

storefront_operation!(
    /// Change quantities of existing cart lines.
    EditCartItems,
    edit_cart_items,
    "editCartItems",
    concat!(
        r"
mutation editCartItems($cartId: ID!, $lines: [CartLineUpdateInput!]!) {
  cartLinesUpdate(cartId: $cartId, lines: $lines) {
    cart {
      ...cart
    }
    userErrors {
      field
      message
    }
  }
}
",
        cart_fragment!(),
        image_fragment!()
    )
);

pub mod edit_cart_items {
    use super::{Deserialize, Serialize};
    use crate::shopify::storefront::fragments::CartMutationPayload;
    use crate::shopify::types::CartLineUpdateInput;
    use vitrina_core::CartId;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartId,
        pub lines: Vec<CartLineUpdateInput>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_update: Option<CartMutationPayload>,
    }
}

impl CartMutation for EditCartItems {
    fn payload(data: Self::ResponseData) -> Option<CartMutationPayload> {
        data.cart_lines_update
    }
}
