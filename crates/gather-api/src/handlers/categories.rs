//! Category lookup for search filters and event forms.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use gather_core::models::Category;

use crate::error::HttpAppError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "events",
    responses(
        (status = 200, description = "All categories, alphabetical", body = ApiResponse<Vec<Category>>)
    )
)]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let categories = state.categories.list().await?;
    Ok(Json(ApiResponse::data(categories)))
}
