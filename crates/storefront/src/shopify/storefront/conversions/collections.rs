//! Collection reshaping.

use chrono::{DateTime, Utc};

use crate::shopify::storefront::fragments::ShopifyCollection;
use crate::shopify::types::{Collection, Seo};

/// Attach the browse path `/search/<handle>`.
pub fn reshape_collection(collection: ShopifyCollection) -> Collection {
    Collection {
        path: format!("/search/{}", collection.handle),
        handle: collection.handle,
        title: collection.title,
        description: collection.description,
        seo: collection.seo,
        updated_at: collection.updated_at,
    }
}

/// Reshape collections, dropping those whose handle starts with `hidden_prefix`.
pub fn reshape_collections(
    collections: Vec<ShopifyCollection>,
    hidden_prefix: &str,
) -> Vec<Collection> {
    collections
        .into_iter()
        .filter(|c| !c.handle.starts_with(hidden_prefix))
        .map(reshape_collection)
        .collect()
}

/// The synthetic collection listing every product.
pub fn all_collection(now: DateTime<Utc>) -> Collection {
    Collection {
        handle: String::new(),
        title: "All".to_string(),
        description: "All products".to_string(),
        seo: Seo {
            title: Some("All products".to_string()),
            description: Some("All products".to_string()),
        },
        path: "/search".to_string(),
        updated_at: now,
    }
}
