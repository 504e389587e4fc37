//! Business logic services for the storefront.
//!
//! - `cart` - cart edits addressed by merchandise ID

pub mod cart;

pub use cart::{CartService, CartServiceError};
