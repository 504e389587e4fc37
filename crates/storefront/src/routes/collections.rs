//! Collection route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use super::products::SearchQuery;
use crate::error::{AppError, Result};
use crate::shopify::{Collection, Product};
use crate::state::AppState;

/// All visible collections, "All" first.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Collection>>> {
    Ok(Json(state.storefront().get_collections().await?))
}

/// Collection detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<Collection>> {
    state
        .storefront()
        .get_collection(&handle)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("collection {handle}")))
}

/// Products of a collection, narrowed by `q` when given.
#[instrument(skip(state))]
pub async fn products(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>> {
    let sort = query.sort_filter();
    let products = state
        .storefront()
        .get_collection_products(&handle, sort.sort_key, sort.reverse, query.q.as_deref())
        .await?;

    Ok(Json(products))
}
