//! Vitrina storefront library.
//!
//! Shopify Storefront API client with response caching and reshaping, a cart
//! service, and the axum JSON API built on them.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;
