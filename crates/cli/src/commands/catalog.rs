//! Menu, product and collection commands.

use vitrina_core::ProductId;
use vitrina_storefront::shopify::{SortFilter, StorefrontClient};

use super::{CliError, print_json};

pub async fn menu(client: &StorefrontClient, handle: &str) -> Result<(), CliError> {
    print_json(&client.get_menu(handle).await?)
}

pub async fn products(
    client: &StorefrontClient,
    query: Option<&str>,
    sort: Option<&str>,
) -> Result<(), CliError> {
    let sort = SortFilter::from_slug(sort);
    print_json(
        &client
            .get_products(query, sort.sort_key, sort.reverse)
            .await?,
    )
}

pub async fn product(client: &StorefrontClient, handle: &str) -> Result<(), CliError> {
    let product = client
        .get_product(handle)
        .await?
        .ok_or_else(|| CliError::NotFound(format!("product {handle}")))?;
    print_json(&product)
}

pub async fn collections(client: &StorefrontClient) -> Result<(), CliError> {
    print_json(&client.get_collections().await?)
}

pub async fn collection_products(
    client: &StorefrontClient,
    handle: &str,
    query: Option<&str>,
    sort: Option<&str>,
) -> Result<(), CliError> {
    let sort = SortFilter::from_slug(sort);
    print_json(
        &client
            .get_collection_products(handle, sort.sort_key, sort.reverse, query)
            .await?,
    )
}

pub async fn recommendations(
    client: &StorefrontClient,
    product_id: ProductId,
) -> Result<(), CliError> {
    print_json(&client.get_product_recommendations(&product_id).await?)
}
