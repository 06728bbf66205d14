//! Event discovery and lifecycle endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use utoipa::IntoParams;

use gather_core::models::{
    CreateEventRequest, Event, EventSearchQuery, EventWithDistance, LocalizedEvent,
    UpdateEventRequest,
};
use gather_core::{AppError, PageParams};

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::response::{ApiResponse, Paged};
use crate::state::AppState;

const FEATURED_DEFAULT_LIMIT: i64 = 10;
const FEATURED_MAX_LIMIT: i64 = 50;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(default)]
pub struct ListEventsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// IANA timezone name; event times are additionally rendered in it.
    pub timezone: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(default)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

impl LimitQuery {
    fn clamped(&self) -> i64 {
        self.limit
            .unwrap_or(FEATURED_DEFAULT_LIMIT)
            .clamp(1, FEATURED_MAX_LIMIT)
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "Caller cannot create events", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(user_id = %auth.id))]
pub async fn create_event(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateEventRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    if !auth.can_manage_events() {
        return Err(HttpAppError(AppError::Forbidden(
            "Only organizers can create events".to_string(),
        )));
    }

    // Events created by an organization owner are attributed to it.
    let organization_id = state
        .organizations
        .get_by_owner(&auth.id)
        .await?
        .map(|org| org.id);

    let event = state
        .events_service
        .create(&auth.id, organization_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::data(event))))
}

#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "events",
    params(ListEventsQuery),
    responses(
        (status = 200, description = "Upcoming published events", body = Paged<LocalizedEvent>)
    )
)]
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListEventsQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let page = PageParams::normalize(query.page, query.limit);
    let (items, pagination) = state
        .events_service
        .upcoming(page, query.timezone.as_deref())
        .await?;
    Ok(Json(ApiResponse::data(Paged::new(items, pagination))))
}

#[utoipa::path(
    get,
    path = "/api/v1/events/search",
    tag = "events",
    params(EventSearchQuery),
    responses(
        (status = 200, description = "Matching events with optional distances", body = Paged<EventWithDistance>),
        (status = 400, description = "Invalid filter", body = ErrorResponse)
    )
)]
pub async fn search_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventSearchQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let filters = query.into_filters()?;
    let (items, pagination) = state.events_service.search(filters).await?;
    Ok(Json(ApiResponse::data(Paged::new(items, pagination))))
}

#[utoipa::path(
    get,
    path = "/api/v1/events/featured",
    tag = "events",
    params(LimitQuery),
    responses(
        (status = 200, description = "Featured events", body = Vec<Event>)
    )
)]
pub async fn featured_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let events = state.events_service.featured(query.clamped()).await?;
    Ok(Json(ApiResponse::data(events)))
}

#[utoipa::path(
    get,
    path = "/api/v1/events/trending",
    tag = "events",
    params(LimitQuery),
    responses(
        (status = 200, description = "Trending events by recent engagement", body = Vec<Event>)
    )
)]
pub async fn trending_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let events = state.events_service.trending(query.clamped()).await?;
    Ok(Json(ApiResponse::data(events)))
}

#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    tag = "events",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event detail", body = Event),
        (status = 404, description = "Event not found", body = ErrorResponse)
    )
)]
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let event = state.events_service.get(&id).await?;
    Ok(Json(ApiResponse::data(event)))
}

#[utoipa::path(
    get,
    path = "/api/v1/events/slug/{slug}",
    tag = "events",
    params(("slug" = String, Path, description = "Event slug")),
    responses(
        (status = 200, description = "Event detail", body = Event),
        (status = 404, description = "Event not found", body = ErrorResponse)
    )
)]
pub async fn get_event_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let event = state.events_service.get_by_slug(&slug).await?;
    Ok(Json(ApiResponse::data(event)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/events/{id}",
    tag = "events",
    params(("id" = String, Path, description = "Event id")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Updated event", body = Event),
        (status = 403, description = "Not the event owner", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(event_id = %id, user_id = %auth.id))]
pub async fn update_event(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateEventRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let event = state
        .events_service
        .update(&id, &auth.id, auth.role, request)
        .await?;
    Ok(Json(ApiResponse::data(event)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    tag = "events",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event deleted"),
        (status = 403, description = "Not the event owner", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(event_id = %id, user_id = %auth.id))]
pub async fn delete_event(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    state.events_service.delete(&id, &auth.id, auth.role).await?;
    Ok(Json(ApiResponse::message("Event deleted")))
}
