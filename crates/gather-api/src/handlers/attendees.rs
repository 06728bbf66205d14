//! Public attendee registration and the organizer attendee list.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use gather_core::models::{Attendee, RegisterAttendeeRequest};
use gather_core::{AppError, PageParams};

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::response::{ApiResponse, Paged};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(default)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/register",
    tag = "registrations",
    params(("id" = String, Path, description = "Event id")),
    request_body = RegisterAttendeeRequest,
    responses(
        (status = 201, description = "Registered", body = Attendee),
        (status = 400, description = "Capacity reached or already registered", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(event_id = %id))]
pub async fn register_attendee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<RegisterAttendeeRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let attendee = state.registrations_service.register(&id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Registration confirmed", attendee)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/events/{id}/attendees",
    tag = "registrations",
    params(("id" = String, Path, description = "Event id"), PageQuery),
    responses(
        (status = 200, description = "Attendee page", body = Paged<Attendee>),
        (status = 403, description = "Not the event owner", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(event_id = %id, user_id = %auth.id))]
pub async fn list_attendees(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let event = state
        .events
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::EventNotFound(format!("Event not found: {}", id)))?;
    if event.created_by.as_deref() != Some(auth.id.as_str()) && !auth.is_admin() {
        return Err(HttpAppError(AppError::Forbidden(
            "Only the event owner can view attendees".to_string(),
        )));
    }

    let page = PageParams::normalize(query.page, query.limit);
    let (items, pagination) = state.registrations_service.list_attendees(&id, page).await?;
    Ok(Json(ApiResponse::data(Paged::new(items, pagination))))
}
