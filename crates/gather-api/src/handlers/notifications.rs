//! In-app notification feed for the authenticated user.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;

use gather_core::models::Notification;
use gather_core::{PageParams, Pagination};

use crate::auth::AuthUser;
use crate::error::HttpAppError;
use crate::handlers::attendees::PageQuery;
use crate::response::{ApiResponse, Paged};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    tag = "notifications",
    params(PageQuery),
    responses(
        (status = 200, description = "Caller's notifications, newest first", body = Paged<Notification>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let page = PageParams::normalize(query.page, query.limit);
    let (items, total) = state
        .notifications
        .list_for_user(&auth.id, page.limit, page.offset())
        .await?;
    Ok(Json(ApiResponse::data(Paged::new(
        items,
        Pagination::new(total, page),
    ))))
}
