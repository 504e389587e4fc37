//! Cart inspection.

use vitrina_core::CartId;
use vitrina_storefront::shopify::StorefrontClient;

use super::{CliError, print_json};

/// Print a cart. Checked-out or unknown carts are reported as not found.
pub async fn show(client: &StorefrontClient, cart_id: CartId) -> Result<(), CliError> {
    let cart = client
        .get_cart(Some(&cart_id))
        .await?
        .ok_or_else(|| CliError::NotFound(format!("cart {cart_id}")))?;
    print_json(&cart)
}
