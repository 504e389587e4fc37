//! Reshaping of Storefront API responses into domain types.
//!
//! Flattens `edges/node` connections, fills in image alt text, drops hidden
//! products and collections, and normalizes a missing cart tax amount.

pub mod cart;
pub mod collections;
pub mod menu;
pub mod products;

pub use cart::reshape_cart;
pub use collections::{all_collection, reshape_collection, reshape_collections};
pub use menu::reshape_menu;
pub use products::{filter_products, reshape_images, reshape_product, reshape_products};

use super::fragments::Connection;

/// Flatten a connection into its nodes, in source order.
pub fn remove_edges_and_nodes<T>(connection: Connection<T>) -> Vec<T> {
    connection.edges.into_iter().map(|edge| edge.node).collect()
}
