//! HTTP middleware for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added in `main`)
//! 2. `TraceLayer` (request span with an empty `request_id` field)
//! 3. Request ID (fills `request_id`, echoes it in the response)
//! 4. `X-Content-Type-Options: nosniff`

pub mod request_id;

pub use request_id::request_id_middleware;
