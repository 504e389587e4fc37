//! Menu route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::error::Result;
use crate::shopify::Menu;
use crate::state::AppState;

/// Navigation menu by handle; unknown menus give an empty list.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<Vec<Menu>>> {
    Ok(Json(state.storefront().get_menu(&handle).await?))
}
