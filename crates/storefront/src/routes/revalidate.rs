//! Shopify webhook endpoint dropping cached responses.
//!
//! Point product and collection webhooks at
//! `/api/revalidate?secret=<SHOPIFY_STOREFRONT_REVALIDATION_SECRET>`.

use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
};
use chrono::Utc;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use tracing::{info, instrument, warn};

use crate::error::{AppError, Result};
use crate::shopify::CacheTag;
use crate::state::AppState;

/// Header carrying the webhook topic, e.g. `products/update`.
pub const TOPIC_HEADER: &str = "x-shopify-topic";

const COLLECTION_TOPICS: &[&str] = &[
    "collections/create",
    "collections/delete",
    "collections/update",
];

const PRODUCT_TOPICS: &[&str] = &["products/create", "products/delete", "products/update"];

#[derive(Debug, Deserialize)]
pub struct RevalidateQuery {
    pub secret: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RevalidateResponse {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revalidated: Option<bool>,
    /// Milliseconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub now: Option<i64>,
}

/// Cache tags a webhook topic invalidates, if any.
#[must_use]
pub fn tags_for_topic(topic: &str) -> Option<&'static [CacheTag]> {
    if COLLECTION_TOPICS.contains(&topic) {
        Some(&[CacheTag::Collections])
    } else if PRODUCT_TOPICS.contains(&topic) {
        Some(&[CacheTag::Products])
    } else {
        None
    }
}

fn secret_matches(provided: Option<&str>, expected: &str) -> bool {
    provided.is_some_and(|provided| provided.as_bytes().ct_eq(expected.as_bytes()).into())
}

/// Handle a Shopify webhook.
///
/// Unknown topics are acknowledged without touching the cache.
#[instrument(skip_all)]
pub async fn revalidate(
    State(state): State<AppState>,
    Query(query): Query<RevalidateQuery>,
    headers: HeaderMap,
) -> Result<Json<RevalidateResponse>> {
    let Some(expected) = state.config().revalidation_secret.as_ref() else {
        warn!("Revalidation requested but no secret is configured");
        return Err(AppError::Unauthorized("Invalid revalidation secret".to_string()));
    };

    if !secret_matches(query.secret.as_deref(), expected.expose_secret()) {
        warn!("Invalid revalidation secret");
        return Err(AppError::Unauthorized("Invalid revalidation secret".to_string()));
    }

    let topic = headers
        .get(TOPIC_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    let Some(tags) = tags_for_topic(topic) else {
        info!(topic, "Ignoring webhook topic");
        return Ok(Json(RevalidateResponse {
            status: 200,
            revalidated: None,
            now: None,
        }));
    };

    state.storefront().revalidate(tags);
    info!(topic, "Revalidated cache");

    Ok(Json(RevalidateResponse {
        status: 200,
        revalidated: Some(true),
        now: Some(Utc::now().timestamp_millis()),
    }))
}
