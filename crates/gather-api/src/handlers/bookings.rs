//! Ticket booking endpoints for authenticated users.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use gather_core::models::{Booking, BookingResponse, CreateBookingRequest};
use gather_core::PageParams;

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::attendees::PageQuery;
use crate::response::{ApiResponse, Paged};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created; paid bookings include a payment client secret", body = BookingResponse),
        (status = 400, description = "Capacity reached or invalid quantity", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 502, description = "Payment provider failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(user_id = %auth.id))]
pub async fn create_booking(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateBookingRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let response = state.bookings_service.create(&auth.id, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::data(response))))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "bookings",
    params(PageQuery),
    responses(
        (status = 200, description = "Caller's bookings, newest first", body = Paged<Booking>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_bookings(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let page = PageParams::normalize(query.page, query.limit);
    let (items, pagination) = state.bookings_service.list_for_user(&auth.id, page).await?;
    Ok(Json(ApiResponse::data(Paged::new(items, pagination))))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "bookings",
    params(("id" = String, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking detail", body = Booking),
        (status = 403, description = "Not the booking owner", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_booking(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let booking = state.bookings_service.get(&id, &auth.id, auth.role).await?;
    Ok(Json(ApiResponse::data(booking)))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/confirm",
    tag = "bookings",
    params(("id" = String, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking confirmed", body = Booking),
        (status = 400, description = "Booking is not pending", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(booking_id = %id, user_id = %auth.id))]
pub async fn confirm_booking(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let booking = state
        .bookings_service
        .confirm(&id, &auth.id, auth.role)
        .await?;
    Ok(Json(ApiResponse::with_message("Booking confirmed", booking)))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/cancel",
    tag = "bookings",
    params(("id" = String, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking cancelled; refunded when payment had settled", body = Booking),
        (status = 400, description = "Booking cannot be cancelled", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(booking_id = %id, user_id = %auth.id))]
pub async fn cancel_booking(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let booking = state
        .bookings_service
        .cancel(&id, &auth.id, auth.role)
        .await?;
    Ok(Json(ApiResponse::with_message("Booking cancelled", booking)))
}
