//! Account registration, login, and the current-user profile.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use gather_core::models::{
    AuthResponse, LoginRequest, RegisterUserRequest, Reward, UpdateUserRequest, UserProfile,
    UserRole,
};
use gather_core::{AppError, PageParams, Pagination};

use crate::auth::{jwt, password, AuthUser};
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::attendees::PageQuery;
use crate::response::{ApiResponse, Paged};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid input or email taken", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RegisterUserRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let role = request.role.unwrap_or(UserRole::Attendee);
    if role == UserRole::Admin {
        return Err(HttpAppError(AppError::Validation(
            "Cannot self-register as admin".to_string(),
        )));
    }

    let hash = password::hash_password(&request.password)?;
    let user = state
        .users
        .create(&request.email, &hash, &request.name, role)
        .await?;

    let token = jwt::issue_token(&user, &state.config.jwt_secret, state.config.jwt_expiry_hours)?;
    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(AuthResponse {
            token,
            user: user.into(),
        })),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    // Same rejection for unknown email and wrong password.
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = state
        .users
        .get_by_email(&request.email)
        .await?
        .ok_or_else(invalid)?;
    if !password::verify_password(&request.password, &user.password_hash)? {
        return Err(HttpAppError(invalid()));
    }

    let token = jwt::issue_token(&user, &state.config.jwt_secret, state.config.jwt_expiry_hours)?;

    Ok(Json(ApiResponse::data(AuthResponse {
        token,
        user: user.into(),
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Current user profile", body = UserProfile),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = state
        .users
        .get_by_id(&auth.id)
        .await?
        .ok_or_else(|| AppError::UserNotFound(format!("User not found: {}", auth.id)))?;
    Ok(Json(ApiResponse::data(UserProfile::from(user))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    tag = "users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(user_id = %auth.id))]
pub async fn update_me(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let hash = request
        .password
        .as_deref()
        .map(password::hash_password)
        .transpose()?;
    let user = state
        .users
        .update_profile(&auth.id, request.name.as_deref(), hash.as_deref())
        .await?;
    Ok(Json(ApiResponse::data(UserProfile::from(user))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/me/rewards",
    tag = "users",
    params(PageQuery),
    responses(
        (status = 200, description = "Caller's reward ledger, newest first", body = Paged<Reward>),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_my_rewards(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let page = PageParams::normalize(query.page, query.limit);
    let (items, total) = state
        .users
        .list_rewards(&auth.id, page.limit, page.offset())
        .await?;
    Ok(Json(ApiResponse::data(Paged::new(
        items,
        Pagination::new(total, page),
    ))))
}
