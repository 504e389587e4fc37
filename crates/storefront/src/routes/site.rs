//! Liveness and site identity.

use axum::{Json, extract::State};

use crate::config::SiteConfig;
use crate::state::AppState;

/// Liveness health check. Does not touch Shopify.
pub async fn health() -> &'static str {
    "ok"
}

/// Company name, site name and tag manager ID for the frontend shell.
pub async fn show(State(state): State<AppState>) -> Json<SiteConfig> {
    Json(state.config().site.clone())
}
