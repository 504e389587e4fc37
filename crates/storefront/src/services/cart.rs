//! Cart operations addressed by merchandise.
//!
//! Clients only know variant (merchandise) IDs; Shopify mutations want cart
//! line IDs. This service resolves one to the other and creates a cart on
//! first add.

use thiserror::Error;
use tracing::{info, instrument};
use vitrina_core::{CartId, MerchandiseId};

use crate::shopify::{Cart, CartLineInput, CartLineUpdateInput, ShopifyError, StorefrontClient};

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartServiceError {
    /// The Storefront API call failed.
    #[error(transparent)]
    Shopify(#[from] ShopifyError),

    /// No cart ID was supplied, or Shopify no longer knows the cart.
    #[error("Missing cart")]
    MissingCart,

    /// The cart has no line for this merchandise.
    #[error("No cart line for merchandise {0}")]
    ItemNotFound(MerchandiseId),
}

/// Cart operations on top of [`StorefrontClient`].
#[derive(Clone)]
pub struct CartService {
    storefront: StorefrontClient,
}

impl CartService {
    #[must_use]
    pub const fn new(storefront: StorefrontClient) -> Self {
        Self { storefront }
    }

    /// Add `quantity` of a variant to the cart.
    ///
    /// Without a cart ID, or when the cart is gone (for example after
    /// checkout), a new cart holding the line is created. The caller persists
    /// the returned cart's ID.
    ///
    /// # Errors
    ///
    /// Returns an error if a Storefront call fails.
    #[instrument(skip(self), fields(merchandise_id = %merchandise_id))]
    pub async fn add_item(
        &self,
        cart_id: Option<&CartId>,
        merchandise_id: MerchandiseId,
        quantity: u32,
    ) -> Result<Cart, CartServiceError> {
        let lines = vec![CartLineInput {
            merchandise_id,
            quantity,
        }];

        match self.storefront.get_cart_uncached(cart_id).await? {
            Some(cart) => Ok(self.storefront.add_to_cart(&cart.id, lines).await?),
            None => {
                info!("Creating cart");
                Ok(self.storefront.create_cart(Some(lines)).await?)
            }
        }
    }

    /// Set the quantity of the line holding `merchandise_id`. Zero removes
    /// the line.
    ///
    /// # Errors
    ///
    /// Returns `MissingCart` or `ItemNotFound` when there is nothing to
    /// update, or an error if a Storefront call fails.
    #[instrument(skip(self), fields(merchandise_id = %merchandise_id))]
    pub async fn update_item_quantity(
        &self,
        cart_id: Option<&CartId>,
        merchandise_id: MerchandiseId,
        quantity: u32,
    ) -> Result<Cart, CartServiceError> {
        let cart = self.current_cart(cart_id).await?;
        let line_id = cart
            .line_for(&merchandise_id)
            .map(|line| line.id.clone())
            .ok_or_else(|| CartServiceError::ItemNotFound(merchandise_id.clone()))?;

        if quantity == 0 {
            return Ok(self
                .storefront
                .remove_from_cart(&cart.id, vec![line_id])
                .await?);
        }

        Ok(self
            .storefront
            .update_cart(
                &cart.id,
                vec![CartLineUpdateInput {
                    id: line_id,
                    merchandise_id,
                    quantity,
                }],
            )
            .await?)
    }

    /// Remove the line holding `merchandise_id`.
    ///
    /// # Errors
    ///
    /// Returns `MissingCart` or `ItemNotFound` when there is nothing to
    /// remove, or an error if a Storefront call fails.
    #[instrument(skip(self), fields(merchandise_id = %merchandise_id))]
    pub async fn remove_item(
        &self,
        cart_id: Option<&CartId>,
        merchandise_id: MerchandiseId,
    ) -> Result<Cart, CartServiceError> {
        let cart = self.current_cart(cart_id).await?;
        let line_id = cart
            .line_for(&merchandise_id)
            .map(|line| line.id.clone())
            .ok_or(CartServiceError::ItemNotFound(merchandise_id))?;

        Ok(self
            .storefront
            .remove_from_cart(&cart.id, vec![line_id])
            .await?)
    }

    async fn current_cart(&self, cart_id: Option<&CartId>) -> Result<Cart, CartServiceError> {
        self.storefront
            .get_cart_uncached(cart_id)
            .await?
            .ok_or(CartServiceError::MissingCart)
    }
}
