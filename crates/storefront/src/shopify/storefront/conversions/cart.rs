//! Cart reshaping.

use vitrina_core::CurrencyCode;

use crate::shopify::storefront::fragments::{ShopifyCart, ShopifyCartItem};
use crate::shopify::types::{
    Cart, CartCost, CartItem, CartItemCost, CartProduct, Merchandise, Money,
};

use super::remove_edges_and_nodes;

/// Flatten cart lines and default a missing tax amount to zero in
/// `fallback_currency`.
pub fn reshape_cart(cart: ShopifyCart, fallback_currency: CurrencyCode) -> Cart {
    let total_tax_amount = cart
        .cost
        .total_tax_amount
        .unwrap_or_else(|| Money::zero(fallback_currency));

    Cart {
        id: cart.id,
        checkout_url: cart.checkout_url,
        total_quantity: cart.total_quantity,
        lines: remove_edges_and_nodes(cart.lines)
            .into_iter()
            .map(convert_cart_item)
            .collect(),
        cost: CartCost {
            subtotal_amount: cart.cost.subtotal_amount,
            total_amount: cart.cost.total_amount,
            total_tax_amount,
        },
    }
}

fn convert_cart_item(line: ShopifyCartItem) -> CartItem {
    let merchandise = line.merchandise;

    CartItem {
        id: line.id,
        quantity: line.quantity,
        cost: CartItemCost {
            total_amount: line.cost.total_amount,
        },
        merchandise: Merchandise {
            id: merchandise.id,
            title: merchandise.title,
            selected_options: merchandise.selected_options,
            product: CartProduct {
                id: merchandise.product.id,
                handle: merchandise.product.handle,
                title: merchandise.product.title,
                featured_image: merchandise.product.featured_image,
            },
        },
    }
}
