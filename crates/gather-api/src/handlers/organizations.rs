//! Organization management. One organization per owner; the subscription
//! tier gates feature flags surfaced in every response.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use gather_core::models::{
    CreateOrganizationRequest, OrganizationResponse, UpdateOrganizationRequest,
    UpdateSubscriptionRequest,
};
use gather_core::AppError;

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::response::ApiResponse;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/organizations",
    tag = "organizations",
    request_body = CreateOrganizationRequest,
    responses(
        (status = 201, description = "Organization created on the free tier", body = OrganizationResponse),
        (status = 400, description = "Caller already owns an organization", body = ErrorResponse),
        (status = 403, description = "Caller cannot create organizations", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(user_id = %auth.id))]
pub async fn create_organization(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateOrganizationRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    if !auth.can_manage_events() {
        return Err(HttpAppError(AppError::Forbidden(
            "Only organizers can create organizations".to_string(),
        )));
    }
    let organization = state
        .organizations
        .create(&auth.id, &request.name, request.description.as_deref())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(OrganizationResponse::from(organization))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/organizations/mine",
    tag = "organizations",
    responses(
        (status = 200, description = "Caller's organization", body = OrganizationResponse),
        (status = 404, description = "Caller owns no organization", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_my_organization(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let organization = state
        .organizations
        .get_by_owner(&auth.id)
        .await?
        .ok_or_else(|| {
            AppError::OrganizationNotFound("You do not own an organization".to_string())
        })?;
    Ok(Json(ApiResponse::data(OrganizationResponse::from(
        organization,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/organizations/{id}",
    tag = "organizations",
    params(("id" = String, Path, description = "Organization id")),
    responses(
        (status = 200, description = "Organization detail", body = OrganizationResponse),
        (status = 404, description = "Organization not found", body = ErrorResponse)
    )
)]
pub async fn get_organization(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let organization = state
        .organizations
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::OrganizationNotFound(format!("Organization not found: {}", id)))?;
    Ok(Json(ApiResponse::data(OrganizationResponse::from(
        organization,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/organizations/slug/{slug}",
    tag = "organizations",
    params(("slug" = String, Path, description = "Organization slug")),
    responses(
        (status = 200, description = "Organization detail", body = OrganizationResponse),
        (status = 404, description = "Organization not found", body = ErrorResponse)
    )
)]
pub async fn get_organization_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let organization = state
        .organizations
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| {
            AppError::OrganizationNotFound(format!("Organization not found: {}", slug))
        })?;
    Ok(Json(ApiResponse::data(OrganizationResponse::from(
        organization,
    ))))
}

async fn get_owned(
    state: &AppState,
    id: &str,
    auth: &AuthUser,
) -> Result<gather_core::models::Organization, AppError> {
    let organization = state
        .organizations
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::OrganizationNotFound(format!("Organization not found: {}", id)))?;
    if organization.owner_id != auth.id && !auth.is_admin() {
        return Err(AppError::Forbidden(
            "You do not own this organization".to_string(),
        ));
    }
    Ok(organization)
}

#[utoipa::path(
    patch,
    path = "/api/v1/organizations/{id}",
    tag = "organizations",
    params(("id" = String, Path, description = "Organization id")),
    request_body = UpdateOrganizationRequest,
    responses(
        (status = 200, description = "Updated organization", body = OrganizationResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Organization not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(organization_id = %id, user_id = %auth.id))]
pub async fn update_organization(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateOrganizationRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    get_owned(&state, &id, &auth).await?;
    let organization = state
        .organizations
        .update(&id, request.name.as_deref(), request.description.as_deref())
        .await?;
    Ok(Json(ApiResponse::data(OrganizationResponse::from(
        organization,
    ))))
}

#[utoipa::path(
    put,
    path = "/api/v1/organizations/{id}/subscription",
    tag = "organizations",
    params(("id" = String, Path, description = "Organization id")),
    request_body = UpdateSubscriptionRequest,
    responses(
        (status = 200, description = "Subscription tier changed", body = OrganizationResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Organization not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(organization_id = %id, user_id = %auth.id))]
pub async fn update_subscription(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateSubscriptionRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    get_owned(&state, &id, &auth).await?;
    let organization = state
        .organizations
        .set_subscription_tier(&id, request.tier)
        .await?;
    Ok(Json(ApiResponse::data(OrganizationResponse::from(
        organization,
    ))))
}
