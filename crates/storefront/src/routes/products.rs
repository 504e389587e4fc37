//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;
use vitrina_core::ProductId;

use crate::error::{AppError, Result};
use crate::shopify::{Product, SortFilter};
use crate::state::AppState;

/// Search and sort parameters shared by product listings.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Search text.
    pub q: Option<String>,
    /// Sort slug such as `price-asc`; unknown slugs use the default order.
    pub sort: Option<String>,
}

impl SearchQuery {
    /// Resolve the sort slug.
    #[must_use]
    pub fn sort_filter(&self) -> SortFilter {
        SortFilter::from_slug(self.sort.as_deref())
    }
}

/// Query parameters for recommendations.
#[derive(Debug, Deserialize)]
pub struct RecommendationsQuery {
    pub product_id: String,
}

/// Product search.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>> {
    let sort = query.sort_filter();
    let products = state
        .storefront()
        .get_products(query.q.as_deref(), sort.sort_key, sort.reverse)
        .await?;

    Ok(Json(products))
}

/// Product detail. Hidden products are still served here.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<Product>> {
    state
        .storefront()
        .get_product(&handle)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {handle}")))
}

/// Products Shopify recommends alongside another.
#[instrument(skip(state))]
pub async fn recommendations(
    State(state): State<AppState>,
    Query(query): Query<RecommendationsQuery>,
) -> Result<Json<Vec<Product>>> {
    if query.product_id.trim().is_empty() {
        return Err(AppError::BadRequest("product_id is required".to_string()));
    }

    let product_id = ProductId::new(query.product_id);
    Ok(Json(
        state
            .storefront()
            .get_product_recommendations(&product_id)
            .await?,
    ))
}
